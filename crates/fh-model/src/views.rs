//! Analytic outputs consumed by presentation.

use polars::prelude::DataFrame;

/// The three denormalized views produced by the merge stage.
///
/// Each run yields a fresh value; presentation treats it as read-only.
#[derive(Debug, Clone)]
pub struct AnalyticViews {
    /// One row per flight with aircraft, airline, airport and booking totals.
    pub flights: DataFrame,
    /// One row per passenger-group booking with every joined flight attribute.
    pub bookings: DataFrame,
    /// One row per airline with its optional feedback rating.
    pub airlines: DataFrame,
}

impl AnalyticViews {
    /// Look up a view by its presentation name.
    pub fn view(&self, name: &str) -> Option<&DataFrame> {
        match name {
            "flights" => Some(&self.flights),
            "bookings" => Some(&self.bookings),
            "airlines" => Some(&self.airlines),
            _ => None,
        }
    }
}
