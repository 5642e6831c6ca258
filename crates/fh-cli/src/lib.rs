//! Library side of the `flighthub` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
