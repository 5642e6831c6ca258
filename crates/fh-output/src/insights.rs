//! Grouped aggregates behind the dashboard charts.
//!
//! Traveler totals always sum `booking_count`; missing counts add nothing.

use std::collections::{BTreeMap, HashMap};

use fh_common::{column_f64_values, column_string_values, month_index, month_name};
use fh_model::AgeGroup;
use fh_model::names::columns;
use polars::prelude::DataFrame;
use serde::Serialize;

use crate::error::Result;
use crate::filters::{int_values, string_values};

/// Allowance in kg per seat class before a bag counts as extra weight.
pub const BAGGAGE_ALLOWANCE_KG: [(&str, f64); 3] =
    [("Economy", 23.0), ("Business", 30.0), ("First", 40.0)];

/// Allowance for seat classes not listed in [`BAGGAGE_ALLOWANCE_KG`].
pub const DEFAULT_ALLOWANCE_KG: f64 = 23.0;

/// Add-on columns holding `Y`/`N` flags.
pub const ADDON_COLUMNS: [&str; 3] = [
    columns::BUSINESS_LOUNGE,
    columns::INFLIGHT_ENTERTAINMENT,
    columns::INFLIGHT_FOOD,
];

/// Name reported for the derived extra-baggage add-on.
pub const EXTRA_WEIGHT_FLAG: &str = "extra_weight_flag";

fn booking_counts(df: &DataFrame) -> Result<Vec<i64>> {
    Ok(int_values(df, columns::BOOKING_COUNT)?
        .into_iter()
        .map(|count| count.unwrap_or(0))
        .collect())
}

/// Travelers per distinct value of `column`, largest first.
///
/// Ties are ordered by value. Rows with no value are left out.
pub fn bookings_by(df: &DataFrame, column: &str) -> Result<Vec<(String, i64)>> {
    let keys = string_values(df, column)?;
    let counts = booking_counts(df)?;
    let mut totals: BTreeMap<String, i64> = BTreeMap::new();
    for (key, count) in keys.into_iter().zip(counts) {
        if let Some(key) = key {
            *totals.entry(key).or_insert(0) += count;
        }
    }
    let mut ordered: Vec<(String, i64)> = totals.into_iter().collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(ordered)
}

/// Travelers per departure month with quarterly totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyBookings {
    /// Months present in the view, calendar order.
    pub months: Vec<(String, i64)>,
    /// Q1 to Q4 totals.
    pub quarter_totals: [i64; 4],
    pub busiest: Option<(String, i64)>,
    pub quietest: Option<(String, i64)>,
    /// Mean over the months present.
    pub average: Option<f64>,
}

/// Group travelers by `departure_month`.
pub fn monthly_bookings(df: &DataFrame) -> Result<MonthlyBookings> {
    let months = string_values(df, columns::DEPARTURE_MONTH)?;
    let counts = booking_counts(df)?;
    let mut totals: BTreeMap<u32, i64> = BTreeMap::new();
    for (month, count) in months.into_iter().zip(counts) {
        if let Some(idx) = month.as_deref().and_then(month_index) {
            *totals.entry(idx).or_insert(0) += count;
        }
    }

    let mut quarter_totals = [0i64; 4];
    for (idx, total) in &totals {
        if let Some(slot) = quarter_totals.get_mut(((idx - 1) / 3) as usize) {
            *slot += total;
        }
    }
    let months: Vec<(String, i64)> = totals
        .iter()
        .filter_map(|(idx, total)| month_name(*idx).map(|name| (name.to_string(), *total)))
        .collect();
    // first month wins ties, in calendar order
    let busiest = months
        .iter()
        .fold(None::<&(String, i64)>, |best, m| match best {
            Some(b) if b.1 >= m.1 => Some(b),
            _ => Some(m),
        })
        .cloned();
    let quietest = months
        .iter()
        .fold(None::<&(String, i64)>, |best, m| match best {
            Some(b) if b.1 <= m.1 => Some(b),
            _ => Some(m),
        })
        .cloned();
    let average = (!months.is_empty())
        .then(|| months.iter().map(|(_, total)| *total as f64).sum::<f64>() / months.len() as f64);

    Ok(MonthlyBookings {
        months,
        quarter_totals,
        busiest,
        quietest,
        average,
    })
}

/// Travelers for one age band and ticket type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketAgeCount {
    pub age_group: AgeGroup,
    pub ticket_type: String,
    pub travelers: i64,
}

/// Travelers per age band and ticket type, in band then ticket order.
pub fn ticket_type_by_age(df: &DataFrame) -> Result<Vec<TicketAgeCount>> {
    let ages = string_values(df, columns::PASSENGER_AGE)?;
    let tickets = string_values(df, columns::TICKET_TYPE)?;
    let counts = booking_counts(df)?;
    let mut totals: BTreeMap<(AgeGroup, String), i64> = BTreeMap::new();
    for ((age, ticket), count) in ages.into_iter().zip(tickets).zip(counts) {
        let (Some(band), Some(ticket)) = (age.as_deref().and_then(AgeGroup::from_label), ticket)
        else {
            continue;
        };
        *totals.entry((band, ticket)).or_insert(0) += count;
    }
    Ok(totals
        .into_iter()
        .map(|((age_group, ticket_type), travelers)| TicketAgeCount {
            age_group,
            ticket_type,
            travelers,
        })
        .collect())
}

/// Share of bookings taking each add-on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonRates {
    pub business_lounge: f64,
    pub inflight_entertainment: f64,
    pub inflight_food: f64,
    pub extra_weight_flag: f64,
}

impl AddonRates {
    fn named(&self) -> [(&'static str, f64); 4] {
        [
            (columns::BUSINESS_LOUNGE, self.business_lounge),
            (columns::INFLIGHT_ENTERTAINMENT, self.inflight_entertainment),
            (columns::INFLIGHT_FOOD, self.inflight_food),
            (EXTRA_WEIGHT_FLAG, self.extra_weight_flag),
        ]
    }
}

/// Add-on uptake per age band and overall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddonPreferences {
    pub by_age: Vec<(AgeGroup, AddonRates)>,
    pub overall: AddonRates,
    /// Add-on with the highest overall rate.
    pub most_popular: &'static str,
    /// Add-on with the lowest overall rate.
    pub least_popular: &'static str,
    /// Mean kg over allowance among bookings with a known weight, one decimal.
    pub average_extra_weight_kg: Option<f64>,
}

fn allowance(seat_class: Option<&str>) -> f64 {
    seat_class
        .and_then(|class| {
            BAGGAGE_ALLOWANCE_KG
                .iter()
                .find(|(name, _)| *name == class)
                .map(|(_, kg)| *kg)
        })
        .unwrap_or(DEFAULT_ALLOWANCE_KG)
}

fn yes_flags(df: &DataFrame, column: &str) -> Result<Vec<f64>> {
    Ok(string_values(df, column)?
        .into_iter()
        .map(|value| match value {
            Some(v) if v.trim().eq_ignore_ascii_case("y") => 1.0,
            _ => 0.0,
        })
        .collect())
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f64 }
}

fn rates(rows: &[usize], flags: &[Vec<f64>; 4]) -> AddonRates {
    let rate = |k: usize| mean(rows.iter().map(|&row| flags[k][row]));
    AddonRates {
        business_lounge: rate(0),
        inflight_entertainment: rate(1),
        inflight_food: rate(2),
        extra_weight_flag: rate(3),
    }
}

/// Y/N add-ons as 1/0, plus a flag for baggage over the seat-class allowance.
///
/// Without a `seat_class` column every bag gets the default allowance.
pub fn addon_preferences(df: &DataFrame) -> Result<AddonPreferences> {
    let lounge = yes_flags(df, columns::BUSINESS_LOUNGE)?;
    let entertainment = yes_flags(df, columns::INFLIGHT_ENTERTAINMENT)?;
    let food = yes_flags(df, columns::INFLIGHT_FOOD)?;
    let weights = column_f64_values(df, columns::WEIGHT_KG).unwrap_or_else(|| vec![None; df.height()]);
    let classes =
        column_string_values(df, columns::SEAT_CLASS).unwrap_or_else(|| vec![None; df.height()]);
    let ages = string_values(df, columns::PASSENGER_AGE)?;

    let extra: Vec<Option<f64>> = weights
        .iter()
        .zip(&classes)
        .map(|(weight, class)| weight.map(|w| (w - allowance(class.as_deref())).max(0.0)))
        .collect();
    let extra_flag: Vec<f64> = extra
        .iter()
        .map(|kg| if kg.is_some_and(|kg| kg > 0.0) { 1.0 } else { 0.0 })
        .collect();
    let flags = [lounge, entertainment, food, extra_flag];

    let mut rows_by_age: BTreeMap<AgeGroup, Vec<usize>> = BTreeMap::new();
    for (row, age) in ages.iter().enumerate() {
        if let Some(band) = age.as_deref().and_then(AgeGroup::from_label) {
            rows_by_age.entry(band).or_default().push(row);
        }
    }
    let by_age = rows_by_age
        .iter()
        .map(|(band, rows)| (*band, rates(rows, &flags)))
        .collect();

    let all_rows: Vec<usize> = (0..df.height()).collect();
    let overall = rates(&all_rows, &flags);
    let named = overall.named();
    let most_popular = named
        .iter()
        .fold(named[0], |best, cur| if cur.1 > best.1 { *cur } else { best })
        .0;
    let least_popular = named
        .iter()
        .fold(named[0], |worst, cur| if cur.1 < worst.1 { *cur } else { worst })
        .0;
    let known: Vec<f64> = extra.into_iter().flatten().collect();
    let average_extra_weight_kg =
        (!known.is_empty()).then(|| (mean(known.into_iter()) * 10.0).round() / 10.0);

    Ok(AddonPreferences {
        by_age,
        overall,
        most_popular,
        least_popular,
        average_extra_weight_kg,
    })
}

/// Ticket popularity and pricing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TicketInsights {
    /// Most frequent ticket type by booking rows; ties go to the first name.
    pub most_popular: Option<String>,
    /// Ticket type with the highest mean price, rounded to cents.
    pub highest_average_price: Option<(String, f64)>,
    pub lowest_average_price: Option<(String, f64)>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn ticket_insights(df: &DataFrame) -> Result<TicketInsights> {
    let tickets = string_values(df, columns::TICKET_TYPE)?;
    let prices = column_f64_values(df, columns::PRICE).unwrap_or_else(|| vec![None; df.height()]);

    let mut frequency: BTreeMap<&str, usize> = BTreeMap::new();
    let mut price_sums: HashMap<&str, (f64, usize)> = HashMap::new();
    for (ticket, price) in tickets.iter().zip(&prices) {
        let Some(ticket) = ticket.as_deref() else {
            continue;
        };
        *frequency.entry(ticket).or_insert(0) += 1;
        if let Some(price) = price {
            let entry = price_sums.entry(ticket).or_insert((0.0, 0));
            entry.0 += price;
            entry.1 += 1;
        }
    }

    let most_popular = frequency
        .iter()
        .fold(None::<(&str, usize)>, |best, (name, n)| match best {
            Some(b) if b.1 >= *n => Some(b),
            _ => Some((*name, *n)),
        })
        .map(|(name, _)| name.to_string());

    let mut averages: Vec<(String, f64)> = price_sums
        .into_iter()
        .map(|(name, (sum, n))| (name.to_string(), round2(sum / n as f64)))
        .collect();
    averages.sort_by(|a, b| a.0.cmp(&b.0));
    let highest_average_price = averages
        .iter()
        .fold(None::<&(String, f64)>, |best, cur| match best {
            Some(b) if b.1 >= cur.1 => Some(b),
            _ => Some(cur),
        })
        .cloned();
    let lowest_average_price = averages
        .iter()
        .fold(None::<&(String, f64)>, |best, cur| match best {
            Some(b) if b.1 <= cur.1 => Some(b),
            _ => Some(cur),
        })
        .cloned();

    Ok(TicketInsights {
        most_popular,
        highest_average_price,
        lowest_average_price,
    })
}

/// An airline and its feedback rating, if any.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AirlineRating {
    pub airline_name: String,
    pub rating: Option<f64>,
}

/// Ratings from the airline view, in table order.
pub fn airline_ratings(airlines: &DataFrame) -> Result<Vec<AirlineRating>> {
    let names = string_values(airlines, columns::AIRLINE_NAME)?;
    let ratings =
        column_f64_values(airlines, columns::RATING).unwrap_or_else(|| vec![None; airlines.height()]);
    Ok(names
        .into_iter()
        .zip(ratings)
        .filter_map(|(name, rating)| {
            name.map(|airline_name| AirlineRating {
                airline_name,
                rating,
            })
        })
        .collect())
}
