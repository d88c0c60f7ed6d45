use serde::{Deserialize, Serialize};

/// Placeholder for any field the model left out.
pub const FIELD_DEFAULT: &str = "N/A";

pub const COLUMN_ID: &str = "Test Case ID";
pub const COLUMN_DESCRIPTION: &str = "Test Case Description";
pub const COLUMN_STEPS: &str = "Steps";
pub const COLUMN_EXPECTED: &str = "Expected Result";

pub const COLUMNS: [&str; 4] = [COLUMN_ID, COLUMN_DESCRIPTION, COLUMN_STEPS, COLUMN_EXPECTED];

/// One generated test case. Steps are stored newline-joined, in the order the
/// model listed them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    pub description: String,
    pub steps: String,
    pub expected_result: String,
}

impl TestCase {
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        steps: &[String],
        expected_result: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            steps: steps.join("\n"),
            expected_result: expected_result.into(),
        }
    }

    pub fn step_lines(&self) -> Vec<&str> {
        if self.steps.is_empty() {
            return Vec::new();
        }
        self.steps.split('\n').collect()
    }

    pub fn as_row(&self) -> [&str; 4] {
        [
            self.id.as_str(),
            self.description.as_str(),
            self.steps.as_str(),
            self.expected_result.as_str(),
        ]
    }
}

/// Test cases for a whole request, in requirement order and then in the order
/// each payload listed them. IDs are not de-duplicated across requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCaseBatch {
    cases: Vec<TestCase>,
}

impl TestCaseBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, cases: Vec<TestCase>) {
        self.cases.extend(cases);
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

impl From<Vec<TestCase>> for TestCaseBatch {
    fn from(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }
}
