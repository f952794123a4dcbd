//! Tabular form of a VizieR catalog response
//!
//! VizieR's ASU-TSV output is a sequence of tables. Each table is preceded by
//! `#` metadata lines and consists of a header line with tab-separated column
//! names, a units line, a dash separator line, and then the data rows.

use log::debug;

use crate::HipstarsError;
use crate::Result;

/// A single column of a catalog table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column label as returned by the service (e.g. `RAICRS`)
    pub name: String,
    /// Unit string, empty when the column is dimensionless
    pub unit: String,
}

/// One table from a catalog response, with blank cells stored as `None`
#[derive(Debug, Clone, Default)]
pub struct CatalogTable {
    name: Option<String>,
    columns: Vec<Column>,
    rows: Vec<Vec<Option<String>>>,
    /// Source line of each row in the response text
    lines: Vec<usize>,
}

impl CatalogTable {
    /// Build a table directly from columns and rows
    ///
    /// Rows built this way are numbered from 1 in error messages.
    pub fn new(columns: Vec<Column>, rows: Vec<Vec<Option<String>>>) -> Self {
        let lines = (1..=rows.len()).collect();
        Self {
            name: None,
            columns,
            rows,
            lines,
        }
    }

    /// VizieR table name, when the response declared one
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| {
            HipstarsError::DataError(format!(
                "Column '{}' not present in catalog table (have: {})",
                name,
                self.columns
                    .iter()
                    .map(|c| c.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }

    /// Cell value at `row`, `column`; `None` for blank cells or out of range
    pub fn value(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .and_then(|cell| cell.as_deref())
    }

    /// Line of the response text that `row` was read from
    pub fn source_line(&self, row: usize) -> usize {
        self.lines.get(row).copied().unwrap_or(row + 1)
    }

    /// Drop every row that is missing a value in any of the named columns
    ///
    /// Returns the number of rows removed.
    pub fn drop_incomplete(&mut self, columns: &[&str]) -> Result<usize> {
        let indices = columns
            .iter()
            .map(|name| self.require_column(name))
            .collect::<Result<Vec<_>>>()?;

        let before = self.rows.len();
        let (rows, lines): (Vec<_>, Vec<_>) = std::mem::take(&mut self.rows)
            .into_iter()
            .zip(std::mem::take(&mut self.lines))
            .filter(|(row, _)| indices.iter().all(|&i| matches!(row.get(i), Some(Some(_)))))
            .unzip();
        self.rows = rows;
        self.lines = lines;
        let dropped = before - self.rows.len();

        debug!(
            "Dropped {} of {} rows missing one of [{}]",
            dropped,
            before,
            columns.join(", ")
        );
        Ok(dropped)
    }

    /// Parse a whole column as floating point values
    ///
    /// Blank cells and non-finite values (`NaN`, `inf`) come back as `None`;
    /// a non-numeric cell is an error.
    pub fn f64_column(&self, name: &str) -> Result<Vec<Option<f64>>> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| match cells.get(idx).and_then(|c| c.as_deref()) {
                None => Ok(None),
                Some(text) => text
                    .parse::<f64>()
                    .map(|value| value.is_finite().then_some(value))
                    .map_err(|e| HipstarsError::ParseError {
                        line: self.source_line(row),
                        message: format!("column {} value '{}': {}", name, text, e),
                    }),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParseState {
    /// Between tables, skipping metadata
    Preamble,
    /// Header read, next line holds the units
    Units,
    /// Units read, next line is the dash separator
    Separator,
    /// Inside the data block
    Rows,
}

fn split_cells(line: &str) -> Vec<&str> {
    line.split('\t').collect()
}

/// Parse a VizieR ASU-TSV response into its tables
pub fn parse_asu_tsv(text: &str) -> Result<Vec<CatalogTable>> {
    let mut tables = Vec::new();
    let mut pending_name: Option<String> = None;
    let mut current: Option<CatalogTable> = None;
    let mut state = ParseState::Preamble;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end_matches('\r');

        match state {
            ParseState::Preamble => {
                if let Some(rest) = line.strip_prefix("#Table") {
                    let name = rest.trim().trim_end_matches(':').trim();
                    if !name.is_empty() {
                        pending_name = Some(name.to_string());
                    }
                    continue;
                }
                if line.starts_with('#') || line.trim().is_empty() {
                    continue;
                }

                let columns = split_cells(line)
                    .into_iter()
                    .map(|name| Column {
                        name: name.trim().to_string(),
                        unit: String::new(),
                    })
                    .collect();
                let mut table = CatalogTable::new(columns, Vec::new());
                table.name = pending_name.take();
                current = Some(table);
                state = ParseState::Units;
            }
            ParseState::Units => {
                if let Some(table) = current.as_mut() {
                    for (column, unit) in table.columns.iter_mut().zip(split_cells(line)) {
                        column.unit = unit.trim().to_string();
                    }
                }
                state = ParseState::Separator;
            }
            ParseState::Separator => {
                let is_separator = !line.trim().is_empty()
                    && line.chars().all(|c| c == '-' || c == '\t' || c == ' ');
                if !is_separator {
                    return Err(HipstarsError::ParseError {
                        line: line_no,
                        message: format!("expected dash separator line, found '{}'", line),
                    });
                }
                state = ParseState::Rows;
            }
            ParseState::Rows => {
                if line.trim().is_empty() || line.starts_with('#') {
                    if let Some(table) = current.take() {
                        tables.push(table);
                    }
                    state = ParseState::Preamble;
                    if let Some(rest) = line.strip_prefix("#Table") {
                        let name = rest.trim().trim_end_matches(':').trim();
                        if !name.is_empty() {
                            pending_name = Some(name.to_string());
                        }
                    }
                    continue;
                }

                let Some(table) = current.as_mut() else {
                    continue;
                };
                let cells = split_cells(line);
                if cells.len() != table.columns.len() {
                    return Err(HipstarsError::ParseError {
                        line: line_no,
                        message: format!(
                            "expected {} cells, found {}",
                            table.columns.len(),
                            cells.len()
                        ),
                    });
                }
                table.lines.push(line_no);
                table.rows.push(
                    cells
                        .into_iter()
                        .map(|cell| {
                            let cell = cell.trim();
                            (!cell.is_empty()).then(|| cell.to_string())
                        })
                        .collect(),
                );
            }
        }
    }

    match state {
        ParseState::Rows => {
            if let Some(table) = current.take() {
                tables.push(table);
            }
        }
        ParseState::Units | ParseState::Separator => {
            return Err(HipstarsError::ParseError {
                line: text.lines().count(),
                message: "response ended inside a table header".to_string(),
            });
        }
        ParseState::Preamble => {}
    }

    Ok(tables)
}
