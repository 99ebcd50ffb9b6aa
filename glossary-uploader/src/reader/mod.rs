//! Spreadsheet sources for glossary uploads
//!
//! A source is opened once and read one sheet at a time into a
//! [`DataFrame`]: the first row is the header, every later non-empty row is
//! data.

pub mod excel;

pub use excel::ExcelReader;

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;

/// Kind of file the terms are read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceType {
    /// xlsx, xls or ods workbook
    Excel,
    Csv,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceType::Excel => write!(f, "excel"),
            SourceType::Csv => write!(f, "csv"),
        }
    }
}

/// Where the glossary terms come from
#[derive(Debug, Clone)]
pub struct GlossarySourceConfig {
    pub kind: SourceType,
    pub path: PathBuf,
}

impl GlossarySourceConfig {
    pub fn new(kind: SourceType, path: impl Into<PathBuf>) -> Result<Self, SourceError> {
        let path = path.into();
        if !path.is_file() {
            return Err(SourceError::NotFound(path));
        }
        Ok(Self { kind, path })
    }
}

/// Errors raised while opening or reading a source
#[derive(Debug)]
pub enum SourceError {
    NotFound(PathBuf),
    Unsupported(SourceType),
    Workbook { path: PathBuf, message: String },
    SheetNotFound { sheet: String, available: Vec<String> },
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::NotFound(path) => {
                write!(f, "Source file does not exist: {}", path.display())
            }
            SourceError::Unsupported(kind) => {
                write!(f, "Source type '{}' is not supported yet", kind)
            }
            SourceError::Workbook { path, message } => {
                write!(f, "Failed to read workbook {}: {}", path.display(), message)
            }
            SourceError::SheetNotFound { sheet, available } => write!(
                f,
                "Sheet '{}' not found. Available sheets: {}",
                sheet,
                available.join(", ")
            ),
        }
    }
}

impl std::error::Error for SourceError {}

/// A sheet as a header row plus data rows
///
/// Every row has exactly `columns.len()` cells; empty cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataFrame {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
    /// 1-based sheet row of each entry in `rows`
    pub row_numbers: Vec<usize>,
}

impl DataFrame {
    /// Sheet row of data row `index`
    ///
    /// Frames built without row numbers are taken to start at row 2 with no
    /// gaps.
    pub fn row_number(&self, index: usize) -> usize {
        self.row_numbers.get(index).copied().unwrap_or(index + 2)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of the column named `name`
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Reads named sheets from an opened source
pub trait SheetReader {
    fn sheet_names(&self) -> Vec<String>;

    fn read_sheet(&mut self, name: &str) -> Result<DataFrame, SourceError>;
}

/// Open the reader for a source
pub fn open_reader(config: &GlossarySourceConfig) -> Result<Box<dyn SheetReader>, SourceError> {
    match config.kind {
        SourceType::Excel => Ok(Box::new(ExcelReader::open(&config.path)?)),
        SourceType::Csv => Err(SourceError::Unsupported(SourceType::Csv)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlossarySourceConfig::new(SourceType::Excel, dir.path().join("terms.xlsx"))
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_csv_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("terms.csv");
        std::fs::write(&path, "name,description\n").unwrap();

        let config = GlossarySourceConfig::new(SourceType::Csv, &path).unwrap();
        let err = open_reader(&config).err().unwrap();
        assert!(matches!(err, SourceError::Unsupported(SourceType::Csv)));
        assert_eq!(err.to_string(), "Source type 'csv' is not supported yet");
    }

    #[test]
    fn test_sheet_not_found_lists_alternatives() {
        let err = SourceError::SheetNotFound {
            sheet: "Terms".to_string(),
            available: vec!["공통표준용어".to_string(), "공통표준단어".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Sheet 'Terms' not found. Available sheets: 공통표준용어, 공통표준단어"
        );
    }
}
