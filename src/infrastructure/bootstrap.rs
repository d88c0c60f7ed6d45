use std::error::Error;
use std::sync::{Arc, Mutex};

use tracing::{error, info, warn};

use crate::application::TestCaseGenUseCase;
use crate::domain::llm_config::LLMConfig;
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::config::{AppConfig, ConfigService};
use crate::infrastructure::llm_clients::{LLMClient, RouterClient};
use crate::interfaces::http::{add_log, HttpState};

pub fn setup() -> Result<(AppConfig, HttpState), Box<dyn Error>> {
    let config = ConfigService::load().map_err(|err| {
        error!(error = %err, "Failed to load configuration");
        err
    })?;

    let state = build_state(&config);
    add_log(
        &state.logs,
        "INFO",
        "Bootstrap",
        &format!(
            "Using {:?} model {} (export: {})",
            config.llm.provider,
            config.llm.model,
            config.export.path.display()
        ),
    );

    Ok((config, state))
}

pub fn build_state(config: &AppConfig) -> HttpState {
    warn_if_missing_api_key(&config.llm);

    let llm_client: Arc<dyn LLMClient + Send + Sync> = Arc::new(RouterClient::new(&config.llm));
    let artifact_store = Arc::new(ArtifactStore::new(
        config.export.path.clone(),
        config.export.file_name.clone(),
    ));
    let use_case = Arc::new(TestCaseGenUseCase::new(
        llm_client,
        artifact_store.clone(),
        config.llm.clone(),
        config.generation.clone(),
        config.extraction.strategy,
    ));

    HttpState {
        use_case,
        artifact_store,
        logs: Arc::new(Mutex::new(Vec::new())),
    }
}

fn warn_if_missing_api_key(config: &LLMConfig) {
    if config.api_key.is_none() {
        warn!(
            provider = ?config.provider,
            "No API key configured; requests to hosted providers will fail"
        );
    } else {
        info!(provider = ?config.provider, model = %config.model, "Model client configured");
    }
}
