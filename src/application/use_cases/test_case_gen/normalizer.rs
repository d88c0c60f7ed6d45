use super::hashing::preview_text;
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::{TestCase, FIELD_DEFAULT};
use serde_json::{Map, Value};
use tracing::error;

const TEST_CASES_KEY: &str = "test_cases";
const ID_KEY: &str = "test_case_id";
const DESCRIPTION_KEY: &str = "test_case_description";
const STEPS_KEY: &str = "steps";
const EXPECTED_KEY: &str = "expected_result";

/// Parses a payload into test cases. Absent or `null` fields are defaulted;
/// anything else that breaks the schema is a `ParseError` for the whole
/// payload, so a half-valid completion never contributes rows.
pub(crate) fn parse_test_case_output(payload: &str) -> Result<Vec<TestCase>> {
    let document: Value = serde_json::from_str(payload)
        .map_err(|e| AppError::ParseError(format!("Invalid test case JSON: {}", e)))?;

    let Value::Object(document) = document else {
        return Err(AppError::ParseError(
            "Test case payload is not a JSON object".to_string(),
        ));
    };

    let entries: &[Value] = match document.get(TEST_CASES_KEY) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(entries)) => entries.as_slice(),
        Some(_) => {
            return Err(AppError::ParseError(format!(
                "`{}` is not a list",
                TEST_CASES_KEY
            )))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| match entry {
            Value::Object(entry) => normalize_entry(entry),
            _ => Err(AppError::ParseError(format!(
                "Test case #{} is not an object",
                index + 1
            ))),
        })
        .collect()
}

/// Same as [`parse_test_case_output`] but a parse failure is logged and
/// becomes an empty list, so one bad completion never sinks the batch.
pub(crate) fn normalize_payload(payload: &str) -> Vec<TestCase> {
    match parse_test_case_output(payload) {
        Ok(cases) => cases,
        Err(err) => {
            error!(
                error = %err,
                payload = %preview_text(payload, 600),
                "Error parsing JSON output"
            );
            Vec::new()
        }
    }
}

fn normalize_entry(entry: &Map<String, Value>) -> Result<TestCase> {
    Ok(TestCase::new(
        text_field(entry, ID_KEY)?,
        text_field(entry, DESCRIPTION_KEY)?,
        &steps_field(entry)?,
        text_field(entry, EXPECTED_KEY)?,
    ))
}

fn text_field(entry: &Map<String, Value>, key: &str) -> Result<String> {
    match entry.get(key) {
        None | Some(Value::Null) => Ok(FIELD_DEFAULT.to_string()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(other) => Err(AppError::ParseError(format!(
            "`{}` must be a string, got {}",
            key,
            type_name(other)
        ))),
    }
}

fn steps_field(entry: &Map<String, Value>) -> Result<Vec<String>> {
    let steps = match entry.get(STEPS_KEY) {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(steps)) => steps,
        Some(other) => {
            return Err(AppError::ParseError(format!(
                "`{}` must be a list of strings, got {}",
                STEPS_KEY,
                type_name(other)
            )))
        }
    };

    steps
        .iter()
        .map(|step| match step {
            Value::String(text) => Ok(text.clone()),
            other => Err(AppError::ParseError(format!(
                "`{}` items must be strings, got {}",
                STEPS_KEY,
                type_name(other)
            ))),
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
