//! Map public data standard spreadsheet rows to glossary term requests

use crate::api::CreateGlossaryTermRequest;

/// Sheets of the public data standard workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardSheet {
    /// 공통표준용어: standard terms
    Terminology,
    /// 공통표준단어: standard words
    Word,
}

pub mod terminology {
    pub const SHEET: &str = "공통표준용어";
    pub const NAME: &str = "공통표준용어명";
    pub const DESCRIPTION: &str = "공통표준용어설명";
    pub const ABBREVIATION: &str = "공통표준용어영문약어명";
    pub const SYNONYMS: &str = "용어 이음동의어 목록";
}

pub mod word {
    pub const SHEET: &str = "공통표준단어";
    pub const NAME: &str = "공통표준단어명";
    pub const DESCRIPTION: &str = "공통표준단어 설명";
    pub const ABBREVIATION: &str = "공통표준단어영문약어명";
    pub const SYNONYMS: &str = "이음동의어 목록";
}

/// Cell text meaning "no value"
const PLACEHOLDER: &str = "-";

impl StandardSheet {
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        match name {
            terminology::SHEET => Some(StandardSheet::Terminology),
            word::SHEET => Some(StandardSheet::Word),
            _ => None,
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            StandardSheet::Terminology => terminology::SHEET,
            StandardSheet::Word => word::SHEET,
        }
    }

    /// Column that must be filled for a row to be uploaded
    pub fn key_column(&self) -> &'static str {
        match self {
            StandardSheet::Terminology => terminology::NAME,
            StandardSheet::Word => word::NAME,
        }
    }

    fn description_column(&self) -> &'static str {
        match self {
            StandardSheet::Terminology => terminology::DESCRIPTION,
            StandardSheet::Word => word::DESCRIPTION,
        }
    }

    fn abbreviation_column(&self) -> &'static str {
        match self {
            StandardSheet::Terminology => terminology::ABBREVIATION,
            StandardSheet::Word => word::ABBREVIATION,
        }
    }

    fn list_column(&self) -> &'static str {
        match self {
            StandardSheet::Terminology => terminology::SYNONYMS,
            StandardSheet::Word => word::SYNONYMS,
        }
    }
}

/// Result of mapping one row
#[derive(Debug, Clone, PartialEq)]
pub enum TermDraft {
    Ready(Box<CreateGlossaryTermRequest>),
    /// Unknown sheet or no term name; the caller skips the row
    Uninitialized,
}

/// Build the term request for one row of `sheet_name`
///
/// `values` is aligned with `columns`. The English abbreviation becomes the
/// first synonym. On the terminology sheet the synonym list column adds
/// further synonyms; on the word sheet it fills `relatedTerms`.
pub fn build_term_request(
    glossary_fqn: &str,
    sheet_name: &str,
    columns: &[String],
    values: &[Option<String>],
) -> TermDraft {
    let Some(sheet) = StandardSheet::from_sheet_name(sheet_name) else {
        return TermDraft::Uninitialized;
    };

    let cell = |name| cell_value(columns, values, name);

    let Some(name) = cell(sheet.key_column()) else {
        return TermDraft::Uninitialized;
    };

    let mut request = CreateGlossaryTermRequest {
        glossary: glossary_fqn.to_string(),
        name: name.to_string(),
        display_name: Some(name.to_string()),
        description: cell(sheet.description_column())
            .unwrap_or(name)
            .to_string(),
        ..Default::default()
    };

    if let Some(abbreviation) = cell(sheet.abbreviation_column()).filter(|v| *v != PLACEHOLDER) {
        request.synonyms.push(abbreviation.to_string());
    }

    let listed = cell(sheet.list_column())
        .map(split_list)
        .unwrap_or_default();
    match sheet {
        StandardSheet::Terminology => request.synonyms.extend(listed),
        StandardSheet::Word => request.related_terms.extend(listed),
    }

    TermDraft::Ready(Box::new(request))
}

/// Trimmed, non-empty value of the column named `name`
fn cell_value<'a>(columns: &[String], values: &'a [Option<String>], name: &str) -> Option<&'a str> {
    let index = columns.iter().position(|c| c.trim() == name)?;
    values
        .get(index)?
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    if value == PLACEHOLDER {
        return Vec::new();
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty() && *piece != PLACEHOLDER)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(&str, Option<&str>)]) -> (Vec<String>, Vec<Option<String>>) {
        let columns = pairs.iter().map(|(c, _)| c.to_string()).collect();
        let values = pairs.iter().map(|(_, v)| v.map(str::to_string)).collect();
        (columns, values)
    }

    fn ready(draft: TermDraft) -> CreateGlossaryTermRequest {
        match draft {
            TermDraft::Ready(request) => *request,
            TermDraft::Uninitialized => panic!("expected a ready request"),
        }
    }

    #[test]
    fn test_terminology_row() {
        let (columns, values) = row(&[
            (terminology::NAME, Some("예시")),
            (terminology::DESCRIPTION, Some("설명")),
            (terminology::ABBREVIATION, Some("EX")),
            (terminology::SYNONYMS, Some("동의어1,동의어2")),
        ]);

        let request = ready(build_term_request(
            "PublicDataStandards",
            terminology::SHEET,
            &columns,
            &values,
        ));

        assert_eq!(request.glossary, "PublicDataStandards");
        assert_eq!(request.name, "예시");
        assert_eq!(request.display_name.as_deref(), Some("예시"));
        assert_eq!(request.description, "설명");
        assert_eq!(request.synonyms, vec!["EX", "동의어1", "동의어2"]);
        assert!(request.related_terms.is_empty());
    }

    #[test]
    fn test_values_are_trimmed_and_column_order_does_not_matter() {
        let (columns, values) = row(&[
            (terminology::SYNONYMS, Some(" 가 ,\n나 , ")),
            ("허용값", Some("0~9")),
            (terminology::ABBREVIATION, Some(" AB\n")),
            (terminology::NAME, Some("  가나\n")),
        ]);

        let request = ready(build_term_request("G", terminology::SHEET, &columns, &values));
        assert_eq!(request.name, "가나");
        assert_eq!(request.synonyms, vec!["AB", "가", "나"]);
        // No description column
        assert_eq!(request.description, "가나");
    }

    #[test]
    fn test_dash_means_no_synonyms() {
        let (columns, values) = row(&[
            (terminology::NAME, Some("가격")),
            (terminology::ABBREVIATION, Some("PRC")),
            (terminology::SYNONYMS, Some("-")),
        ]);

        let request = ready(build_term_request("G", terminology::SHEET, &columns, &values));
        assert_eq!(request.synonyms, vec!["PRC"]);
    }

    #[test]
    fn test_word_row_fills_related_terms() {
        let (columns, values) = row(&[
            (word::NAME, Some("가격")),
            (word::DESCRIPTION, Some("물건의 값")),
            (word::ABBREVIATION, Some("PRC")),
            (word::SYNONYMS, Some("값,금액")),
            ("금칙어 목록", Some("가액")),
        ]);

        let request = ready(build_term_request("G", word::SHEET, &columns, &values));
        assert_eq!(request.name, "가격");
        assert_eq!(request.description, "물건의 값");
        assert_eq!(request.synonyms, vec!["PRC"]);
        assert_eq!(request.related_terms, vec!["값", "금액"]);
    }

    #[test]
    fn test_unknown_sheet_is_uninitialized() {
        let (columns, values) = row(&[(terminology::NAME, Some("예시"))]);
        assert_eq!(
            build_term_request("G", "Sheet1", &columns, &values),
            TermDraft::Uninitialized
        );
    }

    #[test]
    fn test_blank_name_is_uninitialized() {
        let (columns, values) = row(&[
            (terminology::NAME, Some("   ")),
            (terminology::DESCRIPTION, Some("설명")),
        ]);
        assert_eq!(
            build_term_request("G", terminology::SHEET, &columns, &values),
            TermDraft::Uninitialized
        );

        let (columns, values) = row(&[(terminology::NAME, None)]);
        assert_eq!(
            build_term_request("G", terminology::SHEET, &columns, &values),
            TermDraft::Uninitialized
        );
    }

    #[test]
    fn test_sheet_lookup() {
        assert_eq!(
            StandardSheet::from_sheet_name("공통표준용어"),
            Some(StandardSheet::Terminology)
        );
        assert_eq!(StandardSheet::Word.key_column(), "공통표준단어명");
        assert_eq!(StandardSheet::Word.sheet_name(), word::SHEET);
        assert_eq!(StandardSheet::from_sheet_name("공통표준도메인"), None);
    }
}
