// ============================================================
// CSV EXPORTER
// ============================================================
// Fixed four-column layout: ID, description, steps, expected result

use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{TestCaseBatch, COLUMNS};
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Renders a batch as CSV with CRLF record endings. The header is always
/// written, even for an empty batch; multi-line steps stay inside a single
/// quoted cell with their bare `\n` separators.
pub struct CsvExporter {
    delimiter: u8,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, batch: &TestCaseBatch) -> Result<Vec<u8>> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::CRLF)
            .from_writer(Vec::new());

        writer.write_record(COLUMNS)?;
        for case in batch.cases() {
            writer.write_record(case.as_row())?;
        }

        writer
            .into_inner()
            .map_err(|e| AppError::IoError(format!("Failed to flush CSV: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_case::TestCase;

    #[test]
    fn test_empty_batch_renders_header_only() {
        let bytes = CsvExporter::new().render(&TestCaseBatch::new()).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Test Case ID,Test Case Description,Steps,Expected Result\r\n"
        );
    }

    #[test]
    fn test_multiline_steps_are_quoted() {
        let steps = vec!["Open page".to_string(), "Submit, twice".to_string()];
        let batch = TestCaseBatch::from(vec![TestCase::new("TC001", "Form", &steps, "Saved")]);
        let text = String::from_utf8(CsvExporter::new().render(&batch).unwrap()).unwrap();
        assert!(text.ends_with("TC001,Form,\"Open page\nSubmit, twice\",Saved\r\n"));
    }

    #[test]
    fn test_empty_steps_render_empty_cell() {
        let batch = TestCaseBatch::from(vec![TestCase::new("TC001", "d", &[], "e")]);
        let text = String::from_utf8(CsvExporter::new().render(&batch).unwrap()).unwrap();
        assert!(text.ends_with("TC001,d,,e\r\n"));
    }
}
