//! Data module for querying remote astronomical catalogs
//!
//! This module provides the catalog query description, the `CatalogSource`
//! seam, and the VizieR and saved-file implementations of it.

mod vizier;

pub use vizier::{
    CatalogQuery, CatalogSource, TsvFileSource, VizierClient, DEFAULT_TIMEOUT, VIZIER_URL,
};
