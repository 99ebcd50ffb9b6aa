//! Excel workbook reader

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};

use super::{DataFrame, SheetReader, SourceError};

/// Workbook opened with calamine; the format is picked from the extension
pub struct ExcelReader {
    path: PathBuf,
    workbook: Sheets<BufReader<File>>,
}

impl ExcelReader {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let workbook = open_workbook_auto(path).map_err(|e| SourceError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            workbook,
        })
    }
}

impl SheetReader for ExcelReader {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn read_sheet(&mut self, name: &str) -> Result<DataFrame, SourceError> {
        let available = self.workbook.sheet_names();
        if !available.iter().any(|s| s == name) {
            return Err(SourceError::SheetNotFound {
                sheet: name.to_string(),
                available,
            });
        }

        let range = self
            .workbook
            .worksheet_range(name)
            .map_err(|e| SourceError::Workbook {
                path: self.path.clone(),
                message: format!("sheet '{}': {}", name, e),
            })?;

        // The range starts at the first used cell, not necessarily A1
        let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
        let mut rows = range.rows().enumerate();
        let columns: Vec<String> = match rows.next() {
            Some((_, header)) => header
                .iter()
                .map(|cell| cell_to_string(cell).unwrap_or_default().trim().to_string())
                .collect(),
            None => return Ok(DataFrame::default()),
        };

        let mut frame = DataFrame {
            columns,
            ..Default::default()
        };
        for (offset, row) in rows {
            let cells: Vec<Option<String>> = (0..frame.columns.len())
                .map(|i| row.get(i).and_then(cell_to_string))
                .collect();
            if cells.iter().all(Option::is_none) {
                continue;
            }
            frame.rows.push(cells);
            frame.row_numbers.push(first_row + offset + 1);
        }

        Ok(frame)
    }
}

/// Render a cell as text; empty and error cells are `None`
fn cell_to_string(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.is_empty() => None,
        Data::String(s) => Some(s.clone()),
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) => {
            // Whole numbers come back as floats
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Data::Bool(b) => Some(b.to_string()),
        Data::DateTime(dt) => Some(dt.to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn write_fixture(path: &Path) {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name("공통표준용어").unwrap();
        sheet.write_string(0, 0, "공통표준용어명").unwrap();
        sheet.write_string(0, 1, "공통표준용어설명").unwrap();
        sheet.write_string(0, 2, "번호").unwrap();
        sheet.write_string(1, 0, "가격").unwrap();
        sheet.write_string(1, 1, "물건의 값").unwrap();
        sheet.write_number(1, 2, 7.0).unwrap();
        // Row 2 left empty
        sheet.write_string(3, 0, "거래일자").unwrap();
        sheet.write_number(3, 2, 1.5).unwrap();

        let words = workbook.add_worksheet();
        words.set_name("공통표준단어").unwrap();
        words.write_string(0, 0, "공통표준단어명").unwrap();

        workbook.save(path).unwrap();
    }

    #[test]
    fn test_read_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standard.xlsx");
        write_fixture(&path);

        let mut reader = ExcelReader::open(&path).unwrap();
        let frame = reader.read_sheet("공통표준용어").unwrap();

        assert_eq!(frame.columns, vec!["공통표준용어명", "공통표준용어설명", "번호"]);
        assert_eq!(frame.len(), 2);
        assert_eq!(
            frame.rows[0],
            vec![
                Some("가격".to_string()),
                Some("물건의 값".to_string()),
                Some("7".to_string())
            ]
        );
        assert_eq!(
            frame.rows[1],
            vec![Some("거래일자".to_string()), None, Some("1.5".to_string())]
        );
        assert_eq!(frame.column_index("번호"), Some(2));
        // Sheet rows 2 and 4; the blank row 3 is dropped
        assert_eq!(frame.row_numbers, vec![2, 4]);
        assert_eq!(frame.row_number(1), 4);
    }

    #[test]
    fn test_header_only_sheet_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standard.xlsx");
        write_fixture(&path);

        let mut reader = ExcelReader::open(&path).unwrap();
        let frame = reader.read_sheet("공통표준단어").unwrap();
        assert_eq!(frame.columns, vec!["공통표준단어명"]);
        assert!(frame.is_empty());
    }

    #[test]
    fn test_missing_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("standard.xlsx");
        write_fixture(&path);

        let mut reader = ExcelReader::open(&path).unwrap();
        assert_eq!(reader.sheet_names(), vec!["공통표준용어", "공통표준단어"]);

        match reader.read_sheet("Sheet1") {
            Err(SourceError::SheetNotFound { sheet, available }) => {
                assert_eq!(sheet, "Sheet1");
                assert_eq!(available.len(), 2);
            }
            other => panic!("expected SheetNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_not_a_workbook() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.xlsx");
        std::fs::write(&path, b"not a zip archive").unwrap();

        assert!(matches!(
            ExcelReader::open(&path),
            Err(SourceError::Workbook { .. })
        ));
    }

    #[test]
    fn test_cell_to_string() {
        assert_eq!(cell_to_string(&Data::Empty), None);
        assert_eq!(cell_to_string(&Data::String(String::new())), None);
        assert_eq!(cell_to_string(&Data::Float(42.0)), Some("42".to_string()));
        assert_eq!(cell_to_string(&Data::Int(-3)), Some("-3".to_string()));
        assert_eq!(cell_to_string(&Data::Bool(true)), Some("true".to_string()));
    }
}
