//! Lead intake, column normalization, and heuristic scoring for mortgage brokerage pipelines.

pub mod config;
pub mod error;
pub mod leads;
pub mod telemetry;
