/// Prompt for one requirement. The requirement is embedded verbatim and the
/// expected payload is spelled out by example; the output depends on nothing
/// but the requirement text.
pub(crate) fn build_test_case_prompt(requirement: &str) -> String {
    format!(
        r#"You are a QA engineer. Generate test cases in JSON format.

The requirement: "{}"

Output in this exact JSON format:
{{
  "test_cases": [
    {{
      "test_case_id": "TC001",
      "test_case_description": "Description here",
      "steps": ["Step 1", "Step 2", "Step 3"],
      "expected_result": "Expected result here"
    }}
  ]
}}"#,
        requirement
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_deterministic() {
        let requirement = "Users can reset their password via email";
        assert_eq!(
            build_test_case_prompt(requirement),
            build_test_case_prompt(requirement)
        );
    }

    #[test]
    fn test_prompt_embeds_requirement_and_schema() {
        let prompt = build_test_case_prompt("Cart total includes \"VAT\"\nand shipping");
        assert!(prompt.starts_with("You are a QA engineer."));
        assert!(prompt.contains("The requirement: \"Cart total includes \"VAT\"\nand shipping\""));
        for key in [
            "\"test_cases\"",
            "\"test_case_id\"",
            "\"test_case_description\"",
            "\"steps\"",
            "\"expected_result\"",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
    }

    #[test]
    fn test_schema_example_is_valid_json() {
        let prompt = build_test_case_prompt("anything");
        let start = prompt.find('{').unwrap();
        let example: serde_json::Value = serde_json::from_str(&prompt[start..]).unwrap();
        assert_eq!(example["test_cases"][0]["steps"].as_array().unwrap().len(), 3);
    }
}
