//! Shared ambient concerns: configuration loading and the error taxonomy
//! used across the ingestion/indexing/search pipeline.

pub mod config;
pub mod error;

pub use config::{Config, DatalakeType};
pub use error::{AppError, Result};
