use super::{join_url, require_candidates, send_json, LLMClient};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationConfig, LLMConfig};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

#[derive(Serialize)]
struct TextGenerationRequest<'a> {
    inputs: &'a str,
    parameters: TextGenerationParameters,
}

#[derive(Serialize)]
struct TextGenerationParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    num_return_sequences: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<u32>,
    return_full_text: bool,
}

/// Hugging Face hosted inference, `text-generation` task.
pub struct HuggingFaceClient {
    client: reqwest::Client,
}

impl HuggingFaceClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn api_key(config: &LLMConfig) -> Result<String> {
        config
            .api_key
            .clone()
            .ok_or_else(|| AppError::LLMError("Missing API key for Hugging Face".to_string()))
    }

    fn build_body<'a>(generation: &GenerationConfig, prompt: &'a str) -> TextGenerationRequest<'a> {
        TextGenerationRequest {
            inputs: prompt,
            parameters: TextGenerationParameters {
                max_new_tokens: generation.max_length,
                temperature: generation.temperature,
                do_sample: generation.do_sample,
                num_return_sequences: generation.num_return_sequences,
                truncate: generation.truncation.then_some(generation.max_length),
                return_full_text: false,
            },
        }
    }

    fn parse_candidates(json: &Value) -> Result<Vec<String>> {
        if let Some(message) = json.get("error").and_then(Value::as_str) {
            return Err(AppError::LLMError(format!("API error: {}", message)));
        }

        let items = match json {
            Value::Array(items) => items.iter().collect::<Vec<_>>(),
            Value::Object(_) => vec![json],
            _ => Vec::new(),
        };

        let candidates = items
            .into_iter()
            .filter_map(|item| item.get("generated_text").and_then(Value::as_str))
            .map(|text| text.to_string())
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Err(AppError::LLMError("Invalid response format".to_string()));
        }
        Ok(candidates)
    }
}

#[async_trait]
impl LLMClient for HuggingFaceClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        generation: &GenerationConfig,
        prompt: &str,
    ) -> Result<Vec<String>> {
        let api_key = Self::api_key(config)?;
        let url = join_url(&config.base_url, &config.model);
        let body = Self::build_body(generation, prompt);

        let json = send_json(self.client.post(&url).bearer_auth(api_key).json(&body)).await?;
        require_candidates(Self::parse_candidates(&json)?)
    }
}
