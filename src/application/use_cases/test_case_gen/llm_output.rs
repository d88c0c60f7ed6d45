use crate::domain::extraction::ExtractionStrategy;
use serde_json::Value;

/// Upper bound on opening braces tried as payload starts.
const MAX_CANDIDATES: usize = 64;

const PAYLOAD_KEY: &str = "test_cases";

/// Locates the structured payload inside a raw completion. Never fails: when
/// nothing usable is found the result is an empty string, which the
/// normalizer turns into zero test cases.
pub(crate) fn extract_json_payload(output: &str, strategy: ExtractionStrategy) -> String {
    match strategy {
        ExtractionStrategy::FirstLast => first_last_slice(output).to_string(),
        ExtractionStrategy::Balanced => balanced_payload(output).to_string(),
    }
}

/// First `{` through last `}`, inclusive. Empty when either brace is missing
/// or the last `}` comes before the first `{`.
fn first_last_slice(output: &str) -> &str {
    match (output.find('{'), output.rfind('}')) {
        (Some(start), Some(end)) if start < end => &output[start..=end],
        _ => "",
    }
}

/// Preference order: a parsable object holding `test_cases`, then any parsable
/// object, then the first balanced block even if it does not parse.
fn balanced_payload(output: &str) -> &str {
    let mut first_parsable: Option<&str> = None;
    let mut first_balanced: Option<&str> = None;

    let starts = output
        .match_indices('{')
        .map(|(index, _)| index)
        .take(MAX_CANDIDATES);

    for start in starts {
        let Some(end) = matching_brace(output.as_bytes(), start) else {
            continue;
        };
        let candidate = &output[start..=end];
        first_balanced.get_or_insert(candidate);

        if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(candidate) {
            if map.contains_key(PAYLOAD_KEY) {
                return candidate;
            }
            first_parsable.get_or_insert(candidate);
        }
    }

    first_parsable.or(first_balanced).unwrap_or("")
}

/// Index of the `}` closing the `{` at `start`. Braces inside JSON string
/// literals are ignored.
fn matching_brace(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &byte) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(start + offset);
                }
            }
            _ => {}
        }
    }

    None
}
