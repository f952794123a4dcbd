//! Hipstars: bright-star extraction for star-map visualizations
//!
//! This crate queries the VizieR catalog service for the Hipparcos main
//! catalogue, drops incomplete rows, and writes a flat JSON list of
//! `{name, ra, dec, mag}` records.

use thiserror::Error;

pub mod catalogs;
pub mod data;
pub mod export;
pub mod pipeline;

// Re-export commonly used types
pub use catalogs::{HipparcosCatalog, StarRecord};
pub use data::{CatalogQuery, CatalogSource, TsvFileSource, VizierClient};
pub use pipeline::{export_star_map, extract_records};

/// Main error type for the hipstars library
#[derive(Debug, Error)]
pub enum HipstarsError {
    #[error("Data error: {0}")]
    DataError(String),

    #[error("Parse error on line {line}: {message}")]
    ParseError { line: usize, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type for hipstars operations
pub type Result<T> = std::result::Result<T, HipstarsError>;
