//! Llama CLI subprocess client - runs the extraction model in one-shot mode

use crate::core::config::ExtractorConfig;
use crate::extract::{ExtractError, StepExtractor};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Client that executes a llama.cpp-style CLI as a subprocess.
///
/// The local model host only serves one generation at a time, so all calls
/// are serialized through an internal lock, shared across however many jobs
/// hold this client.
pub struct LlamaExtractor {
    /// Path to the llama executable
    binary: String,

    /// Model file passed through with `-m`
    model_path: Option<PathBuf>,

    /// Generation budget
    max_tokens: u32,

    /// Sampling temperature
    temperature: f32,

    /// Timeout for one generation in seconds
    timeout_secs: u64,

    /// Exclusive access to the model host
    gate: Mutex<()>,
}

impl LlamaExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            model_path: config.model_path.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
            timeout_secs: config.timeout_secs,
            gate: Mutex::new(()),
        }
    }

    #[cfg(test)]
    pub fn binary(&self) -> &str {
        &self.binary
    }
}

#[async_trait]
impl StepExtractor for LlamaExtractor {
    async fn extract(&self, prompt: &str) -> Result<String, ExtractError> {
        // One generation at a time; later jobs queue here.
        let _guard = self.gate.lock().await;

        debug!("spawning extraction subprocess, prompt length {}", prompt.len());

        let mut command = Command::new(&self.binary);
        if let Some(model) = &self.model_path {
            command.arg("-m").arg(model);
        }
        command
            .arg("-p")
            .arg(prompt)
            .args(["-n", &self.max_tokens.to_string()])
            .args(["--temp", &self.temperature.to_string()])
            .args(["--simple-io", "--no-display-prompt"])
            .kill_on_drop(true);

        let result = timeout(Duration::from_secs(self.timeout_secs), command.output())
            .await
            .map_err(|_| ExtractError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|e| {
            ExtractError::Internal(format!("failed to execute extraction subprocess: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            warn!("extractor exited with code {}: {}", exit_code, stderr.trim());
            return Err(ExtractError::Model(format!(
                "extractor exited with code {}: {}",
                exit_code,
                stderr.trim()
            )));
        }

        let content = String::from_utf8(output.stdout)
            .map_err(|e| ExtractError::Internal(format!("failed to decode extractor output: {}", e)))?;

        debug!("extractor returned {} bytes of output", content.len());

        Ok(content)
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}
