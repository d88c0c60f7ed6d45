use super::{join_url, require_candidates, send_json, LLMClient};
use crate::domain::error::Result;
use crate::domain::llm_config::{GenerationConfig, LLMConfig};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Any `/chat/completions` endpoint: OpenAI, OpenRouter, local servers.
pub struct OpenAIClient {
    client: reqwest::Client,
}

impl OpenAIClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    fn build_body(config: &LLMConfig, generation: &GenerationConfig, prompt: &str) -> Value {
        let temperature = if generation.do_sample {
            generation.temperature
        } else {
            0.0
        };

        json!({
            "model": config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "max_tokens": generation.max_length,
            "temperature": temperature,
            "n": generation.num_return_sequences,
        })
    }

    fn parse_candidates(json: &Value) -> Vec<String> {
        json["choices"]
            .as_array()
            .map(|choices| {
                choices
                    .iter()
                    .filter_map(|choice| choice["message"]["content"].as_str())
                    .map(|content| content.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl LLMClient for OpenAIClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        generation: &GenerationConfig,
        prompt: &str,
    ) -> Result<Vec<String>> {
        let url = join_url(&config.base_url, "chat/completions");
        let body = Self::build_body(config, generation, prompt);

        let mut request = self.client.post(&url);
        if let Some(api_key) = &config.api_key {
            request = request.bearer_auth(api_key);
        }

        let json = send_json(request.json(&body)).await?;
        require_candidates(Self::parse_candidates(&json))
    }
}
