use super::{request_failed, require_candidates, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationConfig, LLMConfig};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
    #[serde(rename = "candidateCount")]
    candidate_count: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Deserialize)]
struct GeminiCandidatePart {
    text: String,
}

pub struct GeminiClient {
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::LLMError("Missing API key for Google provider".to_string()))
    }

    fn build_body(generation: &GenerationConfig, prompt: &str) -> GeminiRequest {
        let temperature = if generation.do_sample {
            generation.temperature as f64
        } else {
            0.0
        };

        GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature,
                max_output_tokens: generation.max_length,
                candidate_count: generation.num_return_sequences,
            },
        }
    }

    fn candidates(response: GeminiResponse) -> Vec<String> {
        response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .collect()
    }
}

#[async_trait]
impl LLMClient for GeminiClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        generation: &GenerationConfig,
        prompt: &str,
    ) -> Result<Vec<String>> {
        let api_key = Self::api_key(config)?;
        let base_url = config.base_url.trim_end_matches('/');
        let url = format!("{}/{}:generateContent", base_url, config.model.trim());

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header(API_KEY_HEADER, api_key)
            .json(&Self::build_body(generation, prompt))
            .send()
            .await
            .map_err(request_failed)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::LLMError(format!(
                "API error ({}): {}",
                status, text
            )));
        }

        let json: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))?;

        require_candidates(Self::candidates(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::llm_config::LLMProvider;

    #[test]
    fn test_body_maps_generation_config() {
        let generation = GenerationConfig {
            num_return_sequences: 2,
            ..GenerationConfig::default()
        };
        let value = serde_json::to_value(GeminiClient::build_body(&generation, "p")).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "p");
        assert_eq!(value["generationConfig"]["maxOutputTokens"], 512);
        assert_eq!(value["generationConfig"]["candidateCount"], 2);
    }

    #[test]
    fn test_candidates_take_first_part_of_each() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [
                {"content": {"parts": [{"text": "a"}, {"text": "ignored"}]}},
                {"content": {"parts": []}},
                {"content": {"parts": [{"text": "b"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(GeminiClient::candidates(response), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_transport_error_does_not_expose_api_key() {
        let config = LLMConfig {
            provider: LLMProvider::Google,
            base_url: "http://127.0.0.1:1/v1beta/models".to_string(),
            model: "gemini-pro".to_string(),
            api_key: Some("SUPERSECRET123".to_string()),
            request_timeout_secs: Some(5),
        };

        let err = GeminiClient::new(reqwest::Client::new())
            .generate(&config, &GenerationConfig::default(), "p")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::LLMError(_)));
        assert!(!err.to_string().contains("SUPERSECRET123"), "{err}");
    }
}
