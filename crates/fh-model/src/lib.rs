//! FlightHub data model.
//!
//! Tables loaded from the airline database travel through the pipeline as
//! [`TableSet`] values. Each stage receives one set and hands back a new one;
//! nothing is mutated in place between stages.
//!
//! # Modules
//!
//! - **table**: [`Table`] and [`TableSet`]
//! - **bands**: categorical buckets ([`Haul`], [`AgeGroup`])
//! - **views**: the three analytic outputs handed to presentation
//! - **names**: table and column names shared by every stage

pub mod bands;
pub mod names;
pub mod table;
pub mod views;

pub use bands::{AgeGroup, Haul};
pub use table::{INDEX_MARKER, Table, TableSet};
pub use views::AnalyticViews;
