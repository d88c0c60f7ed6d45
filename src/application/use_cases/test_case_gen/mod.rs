mod hashing;
mod llm_output;
mod normalizer;
mod prompts;

use crate::domain::artifact::ExportArtifact;
use crate::domain::error::{AppError, Result};
use crate::domain::extraction::ExtractionStrategy;
use crate::domain::llm_config::{GenerationConfig, LLMConfig};
use crate::domain::test_case::{TestCase, TestCaseBatch};
use crate::infrastructure::artifact_store::ArtifactStore;
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::clean_llm_response;
use std::sync::Arc;
use tracing::{debug, error, info};

use hashing::{hash_value, preview_text};
use llm_output::extract_json_payload;
use normalizer::normalize_payload;
use prompts::build_test_case_prompt;

/// Requirements in, CSV out.
///
/// Requirements are processed one after another. A parse failure only drops
/// that requirement's test cases; a model failure aborts the whole batch and
/// nothing is exported.
pub struct TestCaseGenUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    artifact_store: Arc<ArtifactStore>,
    llm_config: LLMConfig,
    generation: GenerationConfig,
    strategy: ExtractionStrategy,
}

impl TestCaseGenUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        artifact_store: Arc<ArtifactStore>,
        llm_config: LLMConfig,
        generation: GenerationConfig,
        strategy: ExtractionStrategy,
    ) -> Self {
        Self {
            llm_client,
            artifact_store,
            llm_config,
            generation,
            strategy,
        }
    }

    pub async fn execute(&self, requirements: &[String]) -> Result<ExportArtifact> {
        let batch = self.generate_batch(requirements).await?;

        let artifact = self.artifact_store.publish(&batch).await.map_err(|err| {
            error!(
                error = %err,
                path = %self.artifact_store.path().display(),
                "Failed to save test cases"
            );
            err
        })?;

        info!(
            rows = artifact.rows,
            sha256 = %artifact.sha256,
            path = %artifact.path.display(),
            "Test cases saved"
        );
        Ok(artifact)
    }

    pub async fn generate_batch(&self, requirements: &[String]) -> Result<TestCaseBatch> {
        let mut batch = TestCaseBatch::new();
        for (index, requirement) in requirements.iter().enumerate() {
            let cases = self.generate_for_requirement(index, requirement).await?;
            batch.append(cases);
        }
        Ok(batch)
    }

    async fn generate_for_requirement(
        &self,
        index: usize,
        requirement: &str,
    ) -> Result<Vec<TestCase>> {
        info!(
            requirement_index = index,
            requirement = %preview_text(requirement, 120),
            "Generating test cases for requirement"
        );

        let prompt = build_test_case_prompt(requirement);
        let completion = self.invoke(index, &prompt).await?;

        let payload = extract_json_payload(&completion, self.strategy);
        debug!(
            requirement_index = index,
            strategy = ?self.strategy,
            payload = %preview_text(&payload, 600),
            "Extracted payload"
        );

        let cases = normalize_payload(&payload);
        info!(requirement_index = index, cases = cases.len(), "Parsed test cases");
        Ok(cases)
    }

    /// First candidate only, with reasoning blocks stripped and trimmed.
    async fn invoke(&self, index: usize, prompt: &str) -> Result<String> {
        let result = self
            .llm_client
            .generate(&self.llm_config, &self.generation, prompt)
            .await
            .and_then(|candidates| {
                candidates.into_iter().next().ok_or_else(|| {
                    AppError::LLMError("Model returned no candidates".to_string())
                })
            });

        match result {
            Ok(completion) => Ok(clean_llm_response(&completion)),
            Err(err) => {
                error!(
                    requirement_index = index,
                    provider = ?self.llm_config.provider,
                    model = %self.llm_config.model,
                    prompt_digest = %hash_value(prompt),
                    error = %err,
                    "Error generating test cases"
                );
                Err(err)
            }
        }
    }
}
