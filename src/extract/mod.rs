//! Step extraction from transcript text
//!
//! The extraction collaborator is an external generative model with no
//! enforced output schema; [`parser`] is what turns its free-form response
//! into usable step records.

pub mod llama;
pub mod parser;
pub mod prompt;

use async_trait::async_trait;
use thiserror::Error;

pub use llama::LlamaExtractor;
pub use parser::parse_steps;
pub use prompt::build_extraction_prompt;

/// Error types for the extraction collaborator
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("model error: {0}")]
    Model(String),

    #[error("timeout after {0} seconds")]
    Timeout(u64),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Trait for the extraction collaborator - allows for different implementations
#[async_trait]
pub trait StepExtractor: Send + Sync {
    /// Send a prompt to the model and return its raw response text
    async fn extract(&self, prompt: &str) -> Result<String, ExtractError>;

    /// Whether the collaborator looks usable (e.g. its binary exists).
    /// Used for startup warnings, never as a hard gate.
    async fn is_available(&self) -> bool {
        true
    }
}
