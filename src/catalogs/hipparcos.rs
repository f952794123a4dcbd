//! Hipparcos star catalog implementation
//!
//! This module provides functionality for building Hipparcos entries from a
//! VizieR `I/239/hip_main` table and deriving star-map records from them.

use log::{debug, warn};

use super::table::CatalogTable;
use super::{StarPosition, StarRecord};
use crate::HipstarsError;
use crate::Result;

/// VizieR identifier of the Hipparcos main catalogue
pub const HIP_MAIN: &str = "I/239/hip_main";

/// Hipparcos identifier column
pub const HIP_COLUMN: &str = "HIP";
/// Right ascension column (ICRS, epoch J1991.25, degrees)
pub const RA_COLUMN: &str = "RAICRS";
/// Declination column (ICRS, epoch J1991.25, degrees)
pub const DEC_COLUMN: &str = "DEICRS";
/// Johnson V magnitude column
pub const MAG_COLUMN: &str = "Vmag";

/// Columns that must be present for a row to be kept
pub const REQUIRED_COLUMNS: [&str; 3] = [RA_COLUMN, DEC_COLUMN, MAG_COLUMN];

/// Struct representing an entry in the Hipparcos catalog
#[derive(Debug, Clone, PartialEq)]
pub struct HipparcosEntry {
    /// Hipparcos identifier
    pub hip: u32,
    /// Right ascension in degrees
    pub ra: f64,
    /// Declination in degrees
    pub dec: f64,
    /// Magnitude (brightness)
    pub mag: f64,
}

impl HipparcosEntry {
    /// Display name used in the star map
    pub fn display_name(&self) -> String {
        format!("HIP {}", self.hip)
    }

    pub fn to_record(&self) -> StarRecord {
        StarRecord::new(self.display_name(), self.ra, self.dec, self.mag)
    }
}

impl StarPosition for HipparcosEntry {
    fn ra(&self) -> f64 {
        self.ra
    }

    fn dec(&self) -> f64 {
        self.dec
    }
}

/// Hipparcos catalog, in the order the service returned it
#[derive(Debug, Clone, Default)]
pub struct HipparcosCatalog {
    stars: Vec<HipparcosEntry>,
}

impl HipparcosCatalog {
    /// Create a new empty Hipparcos catalog
    pub fn new() -> Self {
        Self { stars: Vec::new() }
    }

    /// Build from a catalog table, dropping rows without position or magnitude
    pub fn from_table(table: &CatalogTable) -> Result<Self> {
        let mut table = table.clone();
        let dropped = table.drop_incomplete(&REQUIRED_COLUMNS)?;

        let hip_idx = table.column_index(HIP_COLUMN).ok_or_else(|| {
            HipstarsError::DataError(format!("Column '{}' not present in catalog table", HIP_COLUMN))
        })?;
        let ra = table.f64_column(RA_COLUMN)?;
        let dec = table.f64_column(DEC_COLUMN)?;
        let mag = table.f64_column(MAG_COLUMN)?;

        let mut stars = Vec::with_capacity(table.len());
        let mut unnamed = 0;
        let mut non_finite = 0;

        for row in 0..table.len() {
            let Some(hip_text) = table.value(row, hip_idx) else {
                unnamed += 1;
                continue;
            };
            let hip = hip_text
                .parse::<u32>()
                .map_err(|e| HipstarsError::ParseError {
                    line: table.source_line(row),
                    message: format!("column {} value '{}': {}", HIP_COLUMN, hip_text, e),
                })?;

            // Cells are present after drop_incomplete; NaN/inf parse to None
            match (ra[row], dec[row], mag[row]) {
                (Some(ra), Some(dec), Some(mag)) => {
                    stars.push(HipparcosEntry { hip, ra, dec, mag })
                }
                _ => non_finite += 1,
            }
        }

        if unnamed > 0 {
            warn!("Skipped {} rows with no {} identifier", unnamed, HIP_COLUMN);
        }
        debug!(
            "Built Hipparcos catalog: {} stars kept, {} incomplete rows dropped",
            stars.len(),
            dropped + non_finite
        );

        Ok(Self { stars })
    }

    pub fn entries(&self) -> &[HipparcosEntry] {
        &self.stars
    }

    /// Get the number of stars in the catalog
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Star with the lowest magnitude, if any
    pub fn brightest(&self) -> Option<&HipparcosEntry> {
        self.stars.iter().min_by(|a, b| a.mag.total_cmp(&b.mag))
    }

    /// Convert every entry into an output record
    pub fn to_records(&self) -> Vec<StarRecord> {
        self.stars.iter().map(HipparcosEntry::to_record).collect()
    }
}

impl FromIterator<HipparcosEntry> for HipparcosCatalog {
    fn from_iter<I: IntoIterator<Item = HipparcosEntry>>(iter: I) -> Self {
        Self {
            stars: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs::table::Column;

    fn cell(text: &str) -> Option<String> {
        (!text.is_empty()).then(|| text.to_string())
    }

    fn hip_table(rows: &[[&str; 4]]) -> CatalogTable {
        let columns = [HIP_COLUMN, RA_COLUMN, DEC_COLUMN, MAG_COLUMN]
            .iter()
            .map(|name| Column {
                name: name.to_string(),
                unit: String::new(),
            })
            .collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| cell(c)).collect())
            .collect();
        CatalogTable::new(columns, rows)
    }

    #[test]
    fn test_from_table_drops_incomplete_rows() {
        let table = hip_table(&[
            ["32349", "101.28715533", "-16.71611586", "-1.44"],
            ["91262", "279.23473479", "+38.78368896", "0.03"],
            ["11767", "", "+89.26410897", "1.97"],
            ["27989", "088.79293899", "+07.40706400", ""],
        ]);

        let catalog = HipparcosCatalog::from_table(&table).unwrap();
        assert_eq!(catalog.len(), 2);

        let sirius = &catalog.entries()[0];
        assert_eq!(sirius.hip, 32349);
        assert_eq!(sirius.ra, 101.28715533);
        assert_eq!(sirius.dec, -16.71611586);
        assert_eq!(sirius.mag, -1.44);

        assert_eq!(catalog.entries()[1].dec, 38.78368896);
    }

    #[test]
    fn test_non_finite_rows_are_dropped() {
        let table = hip_table(&[
            ["1", "NaN", "2.0", "3.0"],
            ["2", "10.0", "inf", "3.0"],
            ["3", "10.0", "20.0", "nan"],
            ["91262", "279.23473479", "+38.78368896", "0.03"],
        ]);

        let catalog = HipparcosCatalog::from_table(&table).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].hip, 91262);
    }

    #[test]
    fn test_missing_identifier_is_skipped() {
        let table = hip_table(&[
            ["", "101.28715533", "-16.71611586", "-1.44"],
            ["91262", "279.23473479", "+38.78368896", "0.03"],
        ]);

        let catalog = HipparcosCatalog::from_table(&table).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.entries()[0].hip, 91262);
    }

    #[test]
    fn test_bad_identifier_is_error() {
        let table = hip_table(&[["HIP?", "1.0", "2.0", "3.0"]]);
        assert!(matches!(
            HipparcosCatalog::from_table(&table),
            Err(HipstarsError::ParseError { line: 1, .. })
        ));
    }

    #[test]
    fn test_records_and_brightest() {
        let catalog: HipparcosCatalog = vec![
            HipparcosEntry {
                hip: 91262,
                ra: 279.23473479,
                dec: 38.78368896,
                mag: 0.03,
            },
            HipparcosEntry {
                hip: 32349,
                ra: 101.28715533,
                dec: -16.71611586,
                mag: -1.44,
            },
        ]
        .into_iter()
        .collect();

        assert_eq!(catalog.brightest().map(|s| s.hip), Some(32349));

        let records = catalog.to_records();
        assert_eq!(records[0].name, "HIP 91262");
        assert_eq!(records[1].name, "HIP 32349");
        assert_eq!(records[1].mag, -1.44);
        assert_eq!(records[1].ra(), 101.28715533);
    }

    #[test]
    fn test_empty_catalog() {
        let catalog = HipparcosCatalog::new();
        assert!(catalog.is_empty());
        assert!(catalog.brightest().is_none());
        assert!(catalog.to_records().is_empty());
    }
}
