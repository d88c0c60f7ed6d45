use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum LLMProvider {
    HuggingFace,
    OpenAI,
    Google,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    #[validate(length(min = 1))]
    pub base_url: String,
    #[validate(length(min = 1))]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Unset means the client waits for the model indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::HuggingFace,
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            model: "TinyLlama/TinyLlama-1.1B-Chat-v1.0".to_string(),
            api_key: None,
            request_timeout_secs: None,
        }
    }
}

/// Sampling parameters shared by every requirement in a batch.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct GenerationConfig {
    #[validate(range(min = 1))]
    pub max_length: u32,
    pub do_sample: bool,
    #[validate(range(min = 0.0, max = 2.0))]
    pub temperature: f32,
    #[validate(range(min = 1))]
    pub num_return_sequences: u32,
    pub truncation: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_length: 512,
            do_sample: true,
            temperature: 0.7,
            num_return_sequences: 1,
            truncation: true,
        }
    }
}
