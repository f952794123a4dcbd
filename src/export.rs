//! JSON export of star records

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::catalogs::StarRecord;
use crate::Result;

/// Write records as a pretty-printed JSON array (2-space indentation)
///
/// The array is written to a temporary sibling file first and renamed into
/// place, so a failed run never leaves a truncated output behind.
pub fn write_records_json<P: AsRef<Path>>(path: P, records: &[StarRecord]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut writer = BufWriter::new(File::create(&temp_path)?);
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer.flush()?;
    drop(writer);

    fs::rename(&temp_path, path)?;
    debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Read records back from a JSON array file
pub fn read_records_json<P: AsRef<Path>>(path: P) -> Result<Vec<StarRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
