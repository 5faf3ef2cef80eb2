//! Transcription collaborator boundary

pub mod whisper;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub use whisper::WhisperTranscriber;

/// Error types for the transcription collaborator
#[derive(Debug, Error)]
pub enum TranscribeError {
    #[error("transcriber error: {0}")]
    Tool(String),

    #[error("timeout after {0} seconds")]
    Timeout(u64),

    #[error("unreadable transcriber output: {0}")]
    InvalidOutput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// One time-stamped span of the transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Segment start in seconds from the beginning of the audio
    pub start_time: f64,

    /// Segment end in seconds
    pub end_time: f64,

    /// Transcribed text of the segment
    pub text: String,
}

/// Full result of one transcription run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    /// The complete transcript text
    pub full_text: String,

    /// Ordered time-stamped segments
    pub segments: Vec<TranscriptSegment>,

    /// Detected (or forced) language code
    pub language: String,

    /// Audio duration, taken from the last segment
    pub duration_seconds: f64,
}

impl TranscriptionResult {
    /// Assemble a result from segments, deriving full text and duration
    pub fn from_segments(segments: Vec<TranscriptSegment>, language: String) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let duration_seconds = segments.last().map(|s| s.end_time).unwrap_or(0.0);

        Self {
            full_text,
            segments,
            language,
            duration_seconds,
        }
    }

    /// Whether the transcript carries any usable text
    pub fn is_blank(&self) -> bool {
        self.full_text.trim().is_empty()
    }
}

/// Trait for the transcription collaborator
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file, optionally forcing a language
    async fn transcribe(
        &self,
        audio: &Path,
        language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscribeError>;

    /// Whether the collaborator looks usable (e.g. its binary exists).
    /// Used for startup warnings, never as a hard gate.
    async fn is_available(&self) -> bool {
        true
    }
}
