pub mod gemini;
pub mod huggingface;
pub mod openai;

use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{GenerationConfig, LLMConfig, LLMProvider};
use async_trait::async_trait;
use gemini::GeminiClient;
use huggingface::HuggingFaceClient;
use openai::OpenAIClient;
use std::time::Duration;

/// A text-generation capability. Returns every candidate completion in the
/// order the provider produced them.
#[async_trait]
pub trait LLMClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        generation: &GenerationConfig,
        prompt: &str,
    ) -> Result<Vec<String>>;
}

pub struct RouterClient {
    huggingface: HuggingFaceClient,
    openai: OpenAIClient,
    gemini: GeminiClient,
}

impl RouterClient {
    pub fn new(config: &LLMConfig) -> Self {
        let http = build_http_client(config.request_timeout_secs);
        Self {
            huggingface: HuggingFaceClient::new(http.clone()),
            openai: OpenAIClient::new(http.clone()),
            gemini: GeminiClient::new(http),
        }
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(
        &self,
        config: &LLMConfig,
        generation: &GenerationConfig,
        prompt: &str,
    ) -> Result<Vec<String>> {
        match config.provider {
            LLMProvider::HuggingFace => self.huggingface.generate(config, generation, prompt).await,
            LLMProvider::OpenAI => self.openai.generate(config, generation, prompt).await,
            LLMProvider::Google => self.gemini.generate(config, generation, prompt).await,
        }
    }
}

fn build_http_client(timeout_secs: Option<u64>) -> reqwest::Client {
    let mut builder = reqwest::Client::builder();
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build().unwrap_or_else(|_| reqwest::Client::new())
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Transport errors can carry the request URL; it is dropped so query
/// parameters never reach a caller-visible message.
pub(crate) fn request_failed(err: reqwest::Error) -> AppError {
    AppError::LLMError(format!("Request failed: {}", err.without_url()))
}

pub(crate) async fn send_json(request: reqwest::RequestBuilder) -> Result<serde_json::Value> {
    let response = request.send().await.map_err(request_failed)?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(AppError::LLMError(format!(
            "API error ({}): {}",
            status, text
        )));
    }

    response
        .json()
        .await
        .map_err(|e| AppError::LLMError(format!("Failed to parse JSON: {}", e)))
}

pub(crate) fn require_candidates(candidates: Vec<String>) -> Result<Vec<String>> {
    if candidates.is_empty() {
        return Err(AppError::LLMError(
            "Model returned no candidates".to_string(),
        ));
    }
    Ok(candidates)
}
