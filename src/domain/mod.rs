pub mod artifact;
pub mod error;
pub mod extraction;
pub mod llm_config;
pub mod test_case;
