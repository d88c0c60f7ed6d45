use crate::domain::error::{AppError, Result};
use crate::domain::extraction::ExtractionStrategy;
use crate::domain::llm_config::{GenerationConfig, LLMConfig};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use validator::Validate;

const DEFAULT_CONFIG_FILE: &str = "casegen.toml";
const CONFIG_PATH_VAR: &str = "CASEGEN_CONFIG";
const ENV_PREFIX: &str = "CASEGEN_";
const API_KEY_VAR: &str = "HUGGINGFACE_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub strategy: ExtractionStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExportConfig {
    pub path: PathBuf,
    #[validate(length(min = 1))]
    pub file_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("test_cases.csv"),
            file_name: "test_cases.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AppConfig {
    #[validate(nested)]
    pub server: ServerConfig,
    #[validate(nested)]
    pub llm: LLMConfig,
    #[validate(nested)]
    pub generation: GenerationConfig,
    pub extraction: ExtractionConfig,
    #[validate(nested)]
    pub export: ExportConfig,
}

pub struct ConfigService;

impl ConfigService {
    /// Defaults, then `casegen.toml` (or `$CASEGEN_CONFIG`), then `CASEGEN_*`
    /// variables. A `.env` file is loaded first when present.
    pub fn load() -> Result<AppConfig> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_PATH_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let figment = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::from_figment(figment, |name| std::env::var(name).ok())
    }

    pub fn from_figment(
        figment: Figment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<AppConfig> {
        let mut config: AppConfig = figment.extract()?;

        if config.llm.api_key.as_deref().map_or(true, str::is_empty) {
            config.llm.api_key = lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty());
        }
        if config.export.path.as_os_str().is_empty() {
            return Err(AppError::ConfigError("export.path must not be empty".to_string()));
        }

        config
            .validate()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;
        Ok(config)
    }
}
