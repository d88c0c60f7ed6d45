use serde::{Deserialize, Serialize};

/// How the structured payload is located inside a raw completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStrategy {
    /// First JSON-parsable balanced `{...}` block, ignoring braces in strings.
    #[default]
    Balanced,
    /// Everything from the first `{` through the last `}`.
    FirstLast,
}
