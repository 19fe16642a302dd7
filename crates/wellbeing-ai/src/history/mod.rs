//! Check-in history import from CSV exports.

mod parser;

use std::io::Read;
use std::path::Path;

use crate::assessment::DailyRecord;

#[derive(Debug)]
pub enum HistoryImportError {
    Io(std::io::Error),
    Csv(csv::Error),
}

impl std::fmt::Display for HistoryImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistoryImportError::Io(err) => write!(f, "failed to read history export: {}", err),
            HistoryImportError::Csv(err) => write!(f, "invalid history CSV data: {}", err),
        }
    }
}

impl std::error::Error for HistoryImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HistoryImportError::Io(err) => Some(err),
            HistoryImportError::Csv(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for HistoryImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HistoryImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub struct HistoryImporter;

impl HistoryImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<DailyRecord>, HistoryImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Parses an export into an oldest-first history. Dated rows are ordered by date; rows
    /// without a date follow them in file order.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<DailyRecord>, HistoryImportError> {
        let mut records = parser::parse_records(reader)?;
        // Stable sort keeps file order for equal dates and for undated rows.
        records.sort_by_key(|record| (record.date.is_none(), record.date));
        Ok(records)
    }
}
