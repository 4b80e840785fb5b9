//! In-memory tabular data read from CSV or Excel and written back as CSV

use crate::error::TableError;
use calamine::{open_workbook_auto, Data, Reader};
use std::io::{Read, Write};
use std::path::Path;

/// Upload formats the file endpoints accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Csv,
    Xlsx,
    Xls,
}

impl FileKind {
    /// Detect the format from a filename's extension, case-insensitively
    pub fn from_filename(name: &str) -> Option<Self> {
        let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            "xls" => Some(Self::Xls),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => ".csv",
            Self::Xlsx => ".xlsx",
            Self::Xls => ".xls",
        }
    }
}

/// A header row plus data rows; `None` cells are nulls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table, padding or truncating rows to the header width
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Read a table from disk in the given format
    pub fn read_path(path: &Path, kind: FileKind) -> Result<Self, TableError> {
        match kind {
            FileKind::Csv => Self::read_csv(std::fs::File::open(path)?),
            FileKind::Xlsx | FileKind::Xls => Self::read_workbook(path),
        }
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self, TableError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(reader);

        let headers = name_headers(rdr.headers()?.iter().map(str::to_string));

        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(
                record
                    .iter()
                    .map(|cell| (!cell.is_empty()).then(|| cell.to_string()))
                    .collect(),
            );
        }

        Ok(Self::new(headers, rows))
    }

    /// First worksheet of an .xlsx/.xls workbook, first row as header
    fn read_workbook(path: &Path) -> Result<Self, TableError> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or(TableError::EmptyWorkbook)??;

        let mut sheet_rows = range.rows();
        let headers = match sheet_rows.next() {
            Some(header_row) => name_headers(
                header_row
                    .iter()
                    .map(|cell| cell_text(cell).unwrap_or_default()),
            ),
            None => Vec::new(),
        };
        let rows = sheet_rows
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        Ok(Self::new(headers, rows))
    }

    /// Serialize as CSV; nulls become empty fields
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), TableError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(&self.headers)?;
        for row in &self.rows {
            wtr.write_record(row.iter().map(|cell| cell.as_deref().unwrap_or("")))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>, TableError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(buf)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of `name`, appending an all-null column if it does not exist yet
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            for row in &mut self.rows {
                row[idx] = None;
            }
            return idx;
        }
        self.headers.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.headers.len() - 1
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column)?.as_deref()
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: Option<String>) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(column)) {
            *cell = value;
        }
    }
}

/// Empty header cells get positional names, like `Unnamed: 2`
fn name_headers(raw: impl Iterator<Item = String>) -> Vec<String> {
    raw.enumerate()
        .map(|(i, h)| {
            if h.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                h
            }
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(f.to_string()),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}
