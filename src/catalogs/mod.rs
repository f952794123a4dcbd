//! Star catalogs module
//!
//! This module turns tabular catalog responses into star entries and the
//! flat records written for star-map consumers.

use serde::{Deserialize, Serialize};

pub mod hipparcos;
pub mod table;

pub use hipparcos::{HipparcosCatalog, HipparcosEntry};
pub use table::{parse_asu_tsv, CatalogTable, Column};

/// Trait for accessing star position data
pub trait StarPosition {
    /// Get star right ascension in degrees
    fn ra(&self) -> f64;

    /// Get star declination in degrees
    fn dec(&self) -> f64;
}

/// Format a star position as `RA <deg>°, Dec <deg>°`
pub fn format_position<S: StarPosition + ?Sized>(star: &S) -> String {
    format!("RA {:.4}°, Dec {:.4}°", star.ra(), star.dec())
}

/// One star as written to the output JSON
///
/// Field order is part of the output format: `name`, `ra`, `dec`, `mag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarRecord {
    /// Display name, e.g. `HIP 32349`
    pub name: String,
    /// Right ascension in degrees (ICRS)
    pub ra: f64,
    /// Declination in degrees (ICRS)
    pub dec: f64,
    /// Apparent visual magnitude (lower is brighter)
    pub mag: f64,
}

impl StarRecord {
    pub fn new(name: impl Into<String>, ra: f64, dec: f64, mag: f64) -> Self {
        Self {
            name: name.into(),
            ra,
            dec,
            mag,
        }
    }
}

impl StarPosition for StarRecord {
    fn ra(&self) -> f64 {
        self.ra
    }

    fn dec(&self) -> f64 {
        self.dec
    }
}
