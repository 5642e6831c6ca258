//! Cascading dashboard filters over the booking view.
//!
//! Levels apply in a fixed order: year, month, destination, age group,
//! airline. An empty selection places no constraint, and a level only takes
//! effect once every level before it has a selection.

use std::collections::BTreeSet;

use fh_common::{any_to_string_opt, column_i64_values, column_string_values, month_index};
use fh_model::AgeGroup;
use fh_model::names::columns;
use polars::prelude::{AnyValue, BooleanChunked, DataFrame, NewChunkedArray};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{OutputError, Result};

/// Selected values per filter level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFilter {
    pub years: Vec<i64>,
    pub months: Vec<String>,
    pub destinations: Vec<String>,
    pub age_groups: Vec<AgeGroup>,
    pub airlines: Vec<String>,
}

impl DashboardFilter {
    /// Number of leading levels that constrain the view.
    pub fn active_levels(&self) -> usize {
        [
            self.years.is_empty(),
            self.months.is_empty(),
            self.destinations.is_empty(),
            self.age_groups.is_empty(),
            self.airlines.is_empty(),
        ]
        .iter()
        .take_while(|empty| !**empty)
        .count()
    }

    /// Rows of `bookings` that pass every active level.
    pub fn apply(&self, bookings: &DataFrame) -> Result<DataFrame> {
        let mut df = bookings.clone();
        let active = self.active_levels();
        for level in 0..active {
            df = self.apply_level(&df, level)?;
        }
        debug!(active, rows = df.height(), "dashboard filter applied");
        Ok(df)
    }

    fn apply_level(&self, df: &DataFrame, level: usize) -> Result<DataFrame> {
        let keep: Vec<bool> = match level {
            0 => int_values(df, columns::DEPARTURE_YEAR)?
                .into_iter()
                .map(|year| year.is_some_and(|y| self.years.contains(&y)))
                .collect(),
            1 => matches_any(df, columns::DEPARTURE_MONTH, &self.months)?,
            2 => matches_any(df, columns::DESTINATION_CITY, &self.destinations)?,
            3 => {
                let labels: Vec<String> = self
                    .age_groups
                    .iter()
                    .map(|band| band.as_str().to_string())
                    .collect();
                matches_any(df, columns::PASSENGER_AGE, &labels)?
            }
            _ => matches_any(df, columns::AIRLINE_NAME, &self.airlines)?,
        };
        let mask = BooleanChunked::from_slice("filter".into(), &keep);
        Ok(df.filter(&mask)?)
    }
}

fn missing(column: &str) -> OutputError {
    OutputError::MissingColumn {
        column: column.to_string(),
    }
}

pub(crate) fn int_values(df: &DataFrame, column: &str) -> Result<Vec<Option<i64>>> {
    column_i64_values(df, column).ok_or_else(|| missing(column))
}

pub(crate) fn string_values(df: &DataFrame, column: &str) -> Result<Vec<Option<String>>> {
    column_string_values(df, column).ok_or_else(|| missing(column))
}

fn matches_any(df: &DataFrame, column: &str, wanted: &[String]) -> Result<Vec<bool>> {
    Ok(string_values(df, column)?
        .into_iter()
        .map(|value| value.is_some_and(|v| wanted.iter().any(|w| w == &v)))
        .collect())
}

/// Values available at each filter level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    /// Ascending.
    pub years: Vec<i64>,
    /// Calendar order.
    pub months: Vec<String>,
    /// Alphabetical.
    pub destinations: Vec<String>,
    /// Band order.
    pub age_groups: Vec<AgeGroup>,
    /// Alphabetical.
    pub airlines: Vec<String>,
}

impl FilterOptions {
    /// Options over the whole booking view.
    pub fn from_bookings(bookings: &DataFrame) -> Result<Self> {
        Self::cascading(bookings, &DashboardFilter::default())
    }

    /// Options as the sidebar shows them: each level lists the values left
    /// after every earlier active level is applied.
    pub fn cascading(bookings: &DataFrame, filter: &DashboardFilter) -> Result<Self> {
        let active = filter.active_levels();
        let mut df = bookings.clone();
        let mut options = Self::default();
        for level in 0..5 {
            match level {
                0 => options.years = distinct_years(&df)?,
                1 => options.months = distinct_months(&df)?,
                2 => options.destinations = distinct_strings(&df, columns::DESTINATION_CITY)?,
                3 => options.age_groups = distinct_age_groups(&df)?,
                _ => options.airlines = distinct_strings(&df, columns::AIRLINE_NAME)?,
            }
            if level < active {
                df = filter.apply_level(&df, level)?;
            }
        }
        Ok(options)
    }
}

fn distinct_years(df: &DataFrame) -> Result<Vec<i64>> {
    let years: BTreeSet<i64> = int_values(df, columns::DEPARTURE_YEAR)?
        .into_iter()
        .flatten()
        .collect();
    Ok(years.into_iter().collect())
}

fn distinct_months(df: &DataFrame) -> Result<Vec<String>> {
    let present: BTreeSet<(u32, String)> = string_values(df, columns::DEPARTURE_MONTH)?
        .into_iter()
        .flatten()
        .filter_map(|month| month_index(&month).map(|idx| (idx, month)))
        .collect();
    Ok(present.into_iter().map(|(_, month)| month).collect())
}

fn distinct_strings(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let values: BTreeSet<String> = string_values(df, column)?.into_iter().flatten().collect();
    Ok(values.into_iter().collect())
}

fn distinct_age_groups(df: &DataFrame) -> Result<Vec<AgeGroup>> {
    let column = df
        .column(columns::PASSENGER_AGE)
        .map_err(|_| missing(columns::PASSENGER_AGE))?;
    let bands: BTreeSet<AgeGroup> = (0..df.height())
        .filter_map(|idx| any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null)))
        .filter_map(|label| AgeGroup::from_label(&label))
        .collect();
    Ok(bands.into_iter().collect())
}
