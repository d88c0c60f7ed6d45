// ============================================================
// CSV PARSER
// ============================================================
// Reads an exported test case CSV back into records

use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{TestCase, COLUMNS};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

/// Parser for the exporter's four-column layout. Values are never trimmed so
/// multi-line step cells come back byte-for-byte.
pub struct CsvParser {
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse_file(&self, path: &Path) -> Result<Vec<TestCase>> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.parse_content(&content)
    }

    pub fn parse_content(&self, content: &str) -> Result<Vec<TestCase>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::None)
            .from_reader(content.as_bytes());

        let headers = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .clone();
        if headers.iter().ne(COLUMNS.iter().copied()) {
            return Err(AppError::ParseError(format!(
                "Unexpected CSV headers: {:?}",
                headers.iter().collect::<Vec<_>>()
            )));
        }

        let mut cases = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            cases.push(Self::parse_row(&record));
        }

        Ok(cases)
    }

    fn parse_row(record: &StringRecord) -> TestCase {
        let field = |idx: usize| record.get(idx).unwrap_or("").to_string();
        TestCase {
            id: field(0),
            description: field(1),
            steps: field(2),
            expected_result: field(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_case::TestCaseBatch;
    use crate::infrastructure::csv::CsvExporter;

    #[test]
    fn test_round_trip_preserves_fields() {
        let steps = vec![
            "Open the app".to_string(),
            "Type \"admin\"".to_string(),
            "Press enter".to_string(),
        ];
        let original = vec![
            TestCase::new("TC001", "Login, happy path", &steps, "Dashboard shown"),
            TestCase::new("N/A", "No steps", &[], "N/A"),
        ];
        let bytes = CsvExporter::new()
            .render(&TestCaseBatch::from(original.clone()))
            .unwrap();

        let parsed = CsvParser::new()
            .parse_content(std::str::from_utf8(&bytes).unwrap())
            .unwrap();

        assert_eq!(parsed, original);
        assert_eq!(parsed[0].step_lines().len(), 3);
        assert_eq!(parsed[1].steps, "");
    }

    #[test]
    fn test_rejects_foreign_headers() {
        let err = CsvParser::new().parse_content("a,b,c,d\n1,2,3,4\n").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }
}
