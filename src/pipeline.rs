//! The extraction pipeline: query, drop incomplete rows, derive records, write JSON

use std::path::Path;

use log::info;

use crate::catalogs::{format_position, HipparcosCatalog, StarRecord};
use crate::data::{CatalogQuery, CatalogSource};
use crate::export::write_records_json;
use crate::Result;

/// Query the source and turn the first returned table into star records
pub fn extract_records<S: CatalogSource + ?Sized>(
    source: &S,
    query: &CatalogQuery,
) -> Result<Vec<StarRecord>> {
    let table = source.fetch_first_table(query)?;
    info!("Catalog table has {} rows", table.len());

    let catalog = HipparcosCatalog::from_table(&table)?;
    if let Some(star) = catalog.brightest() {
        info!(
            "Kept {} stars, brightest {} (mag {:.2}) at {}",
            catalog.len(),
            star.display_name(),
            star.mag,
            format_position(star)
        );
    }

    Ok(catalog.to_records())
}

/// Run the full pipeline and return the number of records written
pub fn export_star_map<S, P>(source: &S, query: &CatalogQuery, output: P) -> Result<usize>
where
    S: CatalogSource + ?Sized,
    P: AsRef<Path>,
{
    let records = extract_records(source, query)?;
    write_records_json(&output, &records)?;
    info!(
        "Saved {} records to {}",
        records.len(),
        output.as_ref().display()
    );
    Ok(records.len())
}
