//! Consumers of the analytic views.
//!
//! - [`export`]: booking view as CSV or tab-delimited text
//! - [`filters`]: cascading dashboard filters and their option lists
//! - [`kpi`]: headline figures
//! - [`insights`]: grouped aggregates for charts
//! - [`insight`]: per-table diagnostic report

pub mod error;
pub mod export;
pub mod filters;
pub mod insight;
pub mod insights;
pub mod kpi;

pub use error::{OutputError, Result};
pub use export::{ExportArtifact, ExportFormat, export_bytes, export_to_dir};
pub use filters::{DashboardFilter, FilterOptions};
pub use insight::{NumericSummary, TableInsight, table_insight};
pub use insights::{
    AddonPreferences, AddonRates, AirlineRating, MonthlyBookings, TicketAgeCount, TicketInsights,
    addon_preferences, airline_ratings, bookings_by, monthly_bookings, ticket_insights,
    ticket_type_by_age,
};
pub use kpi::{DashboardKpis, YearMonth};
