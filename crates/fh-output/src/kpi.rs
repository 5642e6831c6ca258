//! Headline figures for the dashboard.

use chrono::Datelike;
use fh_common::any_to_timestamp;
use fh_model::names::columns;
use polars::prelude::{AnyValue, DataFrame};
use serde::Serialize;

use crate::error::{OutputError, Result};
use crate::filters::int_values;
use crate::insights::bookings_by;

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// The month before this one.
    pub fn previous(self) -> Self {
        if self.month <= 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

/// KPI block over a (possibly filtered) booking view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    /// Sum of `booking_count`.
    pub total_travelers: i64,
    /// Number of rows in the view.
    pub total_flights: usize,
    /// Destination city with the most travelers.
    pub preferred_destination: Option<String>,
    /// Latest booking month present.
    pub current_month: Option<YearMonth>,
    pub current_month_bookings: i64,
    pub previous_month_bookings: i64,
    /// Growth versus the previous month; `None` when that month had no bookings.
    pub growth_pct: Option<f64>,
}

impl DashboardKpis {
    /// Compute every KPI. Months are keyed on `booking_date`.
    pub fn compute(bookings: &DataFrame) -> Result<Self> {
        let counts: Vec<i64> = int_values(bookings, columns::BOOKING_COUNT)?
            .into_iter()
            .map(|count| count.unwrap_or(0))
            .collect();
        let total_travelers = counts.iter().sum();
        let preferred_destination = bookings_by(bookings, columns::DESTINATION_CITY)?
            .into_iter()
            .next()
            .map(|(city, _)| city);

        let dates = bookings
            .column(columns::BOOKING_DATE)
            .map_err(|_| OutputError::MissingColumn {
                column: columns::BOOKING_DATE.to_string(),
            })?;
        let months: Vec<Option<YearMonth>> = (0..bookings.height())
            .map(|idx| {
                any_to_timestamp(dates.get(idx).unwrap_or(AnyValue::Null)).map(|ts| YearMonth {
                    year: ts.year(),
                    month: ts.month(),
                })
            })
            .collect();

        let current_month = months.iter().flatten().max().copied();
        let sum_for = |target: Option<YearMonth>| -> i64 {
            let Some(target) = target else {
                return 0;
            };
            months
                .iter()
                .zip(&counts)
                .filter(|(month, _)| **month == Some(target))
                .map(|(_, count)| *count)
                .sum()
        };
        let current_month_bookings = sum_for(current_month);
        let previous_month_bookings = sum_for(current_month.map(YearMonth::previous));
        let growth_pct = (previous_month_bookings > 0).then(|| {
            (current_month_bookings - previous_month_bookings) as f64
                / previous_month_bookings as f64
                * 100.0
        });

        Ok(Self {
            total_travelers,
            total_flights: bookings.height(),
            preferred_destination,
            current_month,
            current_month_bookings,
            previous_month_bookings,
            growth_pct,
        })
    }
}
