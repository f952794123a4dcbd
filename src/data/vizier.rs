//! VizieR catalog queries
//!
//! This module handles querying the CDS VizieR service through its ASU-TSV
//! endpoint, and reading saved responses of the same format from disk.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flate2::read::GzDecoder;
use log::{debug, info};

use crate::catalogs::hipparcos::{DEC_COLUMN, HIP_COLUMN, HIP_MAIN, MAG_COLUMN, RA_COLUMN};
use crate::catalogs::{parse_asu_tsv, CatalogTable};
use crate::HipstarsError;
use crate::Result;

/// Default VizieR mirror
pub const VIZIER_URL: &str = "https://vizier.cds.unistra.fr";

/// Path of the tab-separated ASU endpoint below the server root
const ASU_TSV_PATH: &str = "/viz-bin/asu-tsv";

/// Unlimited result queries of the full catalogue can take a while
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// A catalog query: which table, which columns, which row constraints
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogQuery {
    /// VizieR catalog identifier, e.g. `I/239/hip_main`
    pub catalog: String,
    /// Columns to return; empty means the service default set
    pub columns: Vec<String>,
    /// Per-column constraints in VizieR syntax, e.g. (`Vmag`, `<=5`)
    pub column_filters: Vec<(String, String)>,
    /// Maximum number of rows; `None` means unlimited
    pub row_limit: Option<usize>,
}

impl CatalogQuery {
    pub fn new(catalog: impl Into<String>) -> Self {
        Self {
            catalog: catalog.into(),
            columns: Vec::new(),
            column_filters: Vec::new(),
            row_limit: None,
        }
    }

    /// Query for Hipparcos stars at or brighter than `max_magnitude`
    pub fn hipparcos_bright(max_magnitude: f64) -> Self {
        Self::new(HIP_MAIN)
            .with_columns([HIP_COLUMN, RA_COLUMN, DEC_COLUMN, MAG_COLUMN])
            .with_filter(MAG_COLUMN, format!("<={}", max_magnitude))
    }

    /// Set the catalog identifier
    pub fn with_catalog(mut self, catalog: impl Into<String>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_filter(mut self, column: impl Into<String>, constraint: impl Into<String>) -> Self {
        self.column_filters.push((column.into(), constraint.into()));
        self
    }

    pub fn with_row_limit(mut self, limit: Option<usize>) -> Self {
        self.row_limit = limit;
        self
    }

    /// ASU request parameters for this query
    pub fn query_params(&self) -> Vec<(String, String)> {
        let mut params = vec![("-source".to_string(), self.catalog.clone())];

        if !self.columns.is_empty() {
            params.push(("-out".to_string(), self.columns.join(",")));
        }

        let max = match self.row_limit {
            Some(limit) => limit.to_string(),
            None => "unlimited".to_string(),
        };
        params.push(("-out.max".to_string(), max));

        for (column, constraint) in &self.column_filters {
            params.push((column.clone(), constraint.clone()));
        }

        params
    }
}

/// Anything that can answer a catalog query with parsed tables
pub trait CatalogSource {
    /// Run the query and return every table in the response
    fn fetch_tables(&self, query: &CatalogQuery) -> Result<Vec<CatalogTable>>;

    /// Run the query and return the first table of the response
    fn fetch_first_table(&self, query: &CatalogQuery) -> Result<CatalogTable> {
        self.fetch_tables(query)?.into_iter().next().ok_or_else(|| {
            HipstarsError::DataError(format!("No tables returned for catalog {}", query.catalog))
        })
    }
}

/// Server diagnostics VizieR embeds as `#***` / `#+++` comment lines
fn server_diagnostics(body: &str) -> Vec<&str> {
    body.lines()
        .filter(|line| line.starts_with("#***") || line.starts_with("#+++"))
        .map(|line| line.trim_start_matches(['#', '*', '+']).trim())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Blocking client for the VizieR ASU-TSV service
#[derive(Debug, Clone)]
pub struct VizierClient {
    base_url: String,
    timeout: Duration,
}

impl VizierClient {
    /// Create a client for the default mirror
    pub fn new() -> Self {
        Self {
            base_url: VIZIER_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different VizieR mirror
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the ASU-TSV endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), ASU_TSV_PATH)
    }

    fn fetch_body(&self, query: &CatalogQuery) -> Result<String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                HipstarsError::NetworkError(format!("Failed to create HTTP client: {}", e))
            })?;

        let url = self.endpoint();
        info!("Querying {} from {}", query.catalog, url);
        debug!("Query parameters: {:?}", query.query_params());

        let response = client
            .get(&url)
            .query(&query.query_params())
            .send()
            .map_err(|e| HipstarsError::NetworkError(format!("Failed to query catalog: {}", e)))?;

        if !response.status().is_success() {
            return Err(HipstarsError::NetworkError(format!(
                "Catalog query failed, status: {}",
                response.status()
            )));
        }

        response
            .text()
            .map_err(|e| HipstarsError::NetworkError(format!("Failed to read response: {}", e)))
    }
}

impl Default for VizierClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for VizierClient {
    fn fetch_tables(&self, query: &CatalogQuery) -> Result<Vec<CatalogTable>> {
        let body = self.fetch_body(query)?;
        debug!("Received {} bytes", body.len());

        let tables = parse_asu_tsv(&body)?;
        if tables.is_empty() {
            let diagnostics = server_diagnostics(&body);
            return Err(HipstarsError::DataError(if diagnostics.is_empty() {
                format!("No tables returned for catalog {}", query.catalog)
            } else {
                format!(
                    "No tables returned for catalog {}: {}",
                    query.catalog,
                    diagnostics.join("; ")
                )
            }));
        }

        info!("Received {} table(s) from VizieR", tables.len());
        Ok(tables)
    }
}

/// A saved ASU-TSV response on disk, optionally gzipped
///
/// Server-side constraints in the query are not re-applied; the file is
/// taken to be the answer to the query.
#[derive(Debug, Clone)]
pub struct TsvFileSource {
    path: PathBuf,
}

impl TsvFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn read_text(&self) -> Result<String> {
        let file = File::open(&self.path)?;
        let is_gzipped = self.path.to_string_lossy().ends_with(".gz");

        let mut reader: Box<dyn Read> = if is_gzipped {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(text)
    }
}

impl CatalogSource for TsvFileSource {
    fn fetch_tables(&self, query: &CatalogQuery) -> Result<Vec<CatalogTable>> {
        info!(
            "Reading saved {} response from {}",
            query.catalog,
            self.path.display()
        );
        parse_asu_tsv(&self.read_text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::tempdir;

    const RESPONSE: &str = "#Table\tI_239_hip_main:\n\
HIP\tRAICRS\tDEICRS\tVmag\n\
\tdeg\tdeg\tmag\n\
------\t------------\t------------\t-----\n\
 32349\t101.28715533\t-16.71611586\t-1.44\n";

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_hipparcos_query_params() {
        let params = CatalogQuery::hipparcos_bright(5.0).query_params();

        assert_eq!(params[0], ("-source".to_string(), "I/239/hip_main".to_string()));
        assert_eq!(param(&params, "-out"), Some("HIP,RAICRS,DEICRS,Vmag"));
        assert_eq!(param(&params, "-out.max"), Some("unlimited"));
        assert_eq!(param(&params, "Vmag"), Some("<=5"));
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_query_builder() {
        let query = CatalogQuery::new("I/311/hip2")
            .with_filter("Hpmag", "<6.5")
            .with_row_limit(Some(50));
        let params = query.query_params();

        assert_eq!(param(&params, "-out"), None);
        assert_eq!(param(&params, "-out.max"), Some("50"));
        assert_eq!(param(&params, "Hpmag"), Some("<6.5"));

        let renamed = query.with_catalog("I/239/hip_main");
        assert_eq!(renamed.catalog, "I/239/hip_main");
    }

    #[test]
    fn test_endpoint() {
        let client = VizierClient::new().with_base_url("http://vizier.example.org/");
        assert_eq!(client.endpoint(), "http://vizier.example.org/viz-bin/asu-tsv");
        assert_eq!(
            VizierClient::default().endpoint(),
            "https://vizier.cds.unistra.fr/viz-bin/asu-tsv"
        );
    }

    #[test]
    fn test_server_diagnostics() {
        let body = "#\n#***\n#*** Unknown catalog: I/999\n#+++ truncated\n";
        assert_eq!(
            server_diagnostics(body),
            vec!["Unknown catalog: I/999", "truncated"]
        );
    }

    #[test]
    fn test_file_source_plain_and_gzip() {
        let dir = tempdir().unwrap();
        let query = CatalogQuery::hipparcos_bright(5.0);

        let plain = dir.path().join("hip_main.tsv");
        std::fs::write(&plain, RESPONSE).unwrap();
        let table = TsvFileSource::new(&plain).fetch_first_table(&query).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, 0), Some("32349"));

        let gz = dir.path().join("hip_main.tsv.gz");
        let mut encoder = GzEncoder::new(File::create(&gz).unwrap(), Compression::default());
        encoder.write_all(RESPONSE.as_bytes()).unwrap();
        encoder.finish().unwrap();
        let table = TsvFileSource::new(&gz).fetch_first_table(&query).unwrap();
        assert_eq!(table.name(), Some("I_239_hip_main"));
    }

    #[test]
    fn test_file_source_without_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.tsv");
        std::fs::write(&path, "#\n# nothing here\n").unwrap();

        let result = TsvFileSource::new(&path).fetch_first_table(&CatalogQuery::new(HIP_MAIN));
        assert!(matches!(result, Err(HipstarsError::DataError(_))));
    }

    #[test]
    fn test_missing_file() {
        let source = TsvFileSource::new("/nonexistent/hip_main.tsv");
        let result = source.fetch_tables(&CatalogQuery::new(HIP_MAIN));
        assert!(matches!(result, Err(HipstarsError::IoError(_))));
    }

    // Skip this test in CI as it requires network access
    #[test]
    #[ignore]
    fn test_live_hipparcos_query() {
        let table = VizierClient::new()
            .fetch_first_table(&CatalogQuery::hipparcos_bright(2.0))
            .expect("Failed to query VizieR");
        println!("Received {} rows", table.len());
        assert!(table.len() > 50, "Too few bright stars: {}", table.len());
        assert!(table.column_index("Vmag").is_some());
    }
}
