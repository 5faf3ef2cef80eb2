//! Whisper CLI subprocess client
//!
//! Runs a whisper.cpp-style executable and reads back its JSON transcript
//! file. Older builds only print timestamped segments on stdout, so there is
//! a console-parsing fallback for when the JSON file never materializes.

use crate::core::config::TranscriberConfig;
use crate::transcribe::{TranscribeError, Transcriber, TranscriptSegment, TranscriptionResult};
use async_trait::async_trait;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use uuid::Uuid;
use tracing::{debug, warn};

/// Stdout line shape of whisper-style tools:
/// `[00:00:00.000 --> 00:00:02.340]   some text`
const CONSOLE_SEGMENT_PATTERN: &str =
    r"(?m)^\[(\d{2}):(\d{2}):(\d{2})\.(\d{3}) --> (\d{2}):(\d{2}):(\d{2})\.(\d{3})\]\s*(.*)$";

/// Client for executing a whisper CLI as a subprocess
#[derive(Debug, Clone)]
pub struct WhisperTranscriber {
    /// Path to the whisper executable
    binary: String,

    /// Model file passed through with `-m`
    model_path: Option<PathBuf>,

    /// Default language when the caller does not force one
    language: Option<String>,

    /// Timeout for one transcription in seconds
    timeout_secs: u64,
}

impl WhisperTranscriber {
    pub fn new(config: &TranscriberConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            model_path: config.model_path.clone(),
            language: config.language.clone(),
            timeout_secs: config.timeout_secs,
        }
    }

    #[cfg(test)]
    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn parse_json_transcript(content: &str) -> Result<TranscriptionResult, TranscribeError> {
        let output: WhisperJson = serde_json::from_str(content)
            .map_err(|e| TranscribeError::InvalidOutput(format!("bad transcript JSON: {}", e)))?;

        let segments = output
            .transcription
            .into_iter()
            .map(|s| TranscriptSegment {
                start_time: s.offsets.from as f64 / 1000.0,
                end_time: s.offsets.to as f64 / 1000.0,
                text: s.text.trim().to_string(),
            })
            .collect();

        let language = output
            .result
            .map(|r| r.language)
            .unwrap_or_else(|| "unknown".to_string());

        Ok(TranscriptionResult::from_segments(segments, language))
    }

    /// Recover segments from stdout when no JSON file was produced.
    fn parse_console_transcript(stdout: &str, language: &str) -> Option<TranscriptionResult> {
        let pattern = Regex::new(CONSOLE_SEGMENT_PATTERN).ok()?;

        let segments: Vec<TranscriptSegment> = pattern
            .captures_iter(stdout)
            .map(|caps| TranscriptSegment {
                start_time: console_timestamp(&caps, 1),
                end_time: console_timestamp(&caps, 5),
                text: caps[9].trim().to_string(),
            })
            .collect();

        if segments.is_empty() {
            return None;
        }
        Some(TranscriptionResult::from_segments(
            segments,
            language.to_string(),
        ))
    }
}

fn console_timestamp(caps: &regex::Captures<'_>, first_group: usize) -> f64 {
    let part = |i: usize| caps[first_group + i].parse::<f64>().unwrap_or(0.0);
    part(0) * 3600.0 + part(1) * 60.0 + part(2) + part(3) / 1000.0
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let output_base = std::env::temp_dir().join(format!("flowscribe_{}", Uuid::new_v4()));
        let json_path = output_base.with_extension("json");

        debug!("spawning transcriber for {}", audio.display());

        let mut command = Command::new(&self.binary);
        if let Some(model) = &self.model_path {
            command.arg("-m").arg(model);
        }
        let language = language.or(self.language.as_deref());
        if let Some(lang) = language {
            command.args(["-l", lang]);
        }
        command
            .arg("-f")
            .arg(audio)
            .arg("--output-json")
            .arg("--output-file")
            .arg(&output_base)
            .kill_on_drop(true);

        let result = timeout(Duration::from_secs(self.timeout_secs), command.output())
            .await
            .map_err(|_| TranscribeError::Timeout(self.timeout_secs))?;

        let output = result.map_err(|e| {
            TranscribeError::Internal(format!("failed to execute transcriber subprocess: {}", e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let exit_code = output.status.code().unwrap_or(-1);
            warn!("transcriber exited with code {}: {}", exit_code, stderr.trim());
            return Err(TranscribeError::Tool(format!(
                "transcriber exited with code {}: {}",
                exit_code,
                stderr.trim()
            )));
        }

        match tokio::fs::read_to_string(&json_path).await {
            Ok(content) => {
                let _ = tokio::fs::remove_file(&json_path).await;
                Self::parse_json_transcript(&content)
            }
            Err(e) => {
                debug!("no JSON transcript at {}: {}", json_path.display(), e);
                let stdout = String::from_utf8_lossy(&output.stdout);
                Self::parse_console_transcript(&stdout, language.unwrap_or("unknown"))
                    .ok_or_else(|| {
                        TranscribeError::InvalidOutput(
                            "transcriber produced neither a JSON file nor console segments"
                                .to_string(),
                        )
                    })
            }
        }
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--help")
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }
}

/// JSON transcript file shape written by whisper.cpp-style tools
#[derive(Debug, Deserialize)]
struct WhisperJson {
    #[serde(default)]
    transcription: Vec<WhisperJsonSegment>,
    result: Option<WhisperJsonResult>,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonResult {
    language: String,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonSegment {
    offsets: WhisperJsonOffsets,
    text: String,
}

#[derive(Debug, Deserialize)]
struct WhisperJsonOffsets {
    from: u64,
    to: u64,
}
