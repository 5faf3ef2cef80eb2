//! Application configuration from YAML

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration.
///
/// Every field has a default, so the CLI works with no config file at all;
/// a YAML file overrides selectively.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory where generated workflow documents and diagrams land
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Transcription collaborator settings
    #[serde(default)]
    pub transcriber: TranscriberConfig,

    /// Extraction collaborator settings
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Diagram rendering settings
    #[serde(default)]
    pub diagram: DiagramConfig,
}

/// Settings for the whisper-style transcription CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriberConfig {
    /// Transcriber executable (assumed on PATH when not absolute)
    #[serde(default = "default_whisper_binary")]
    pub binary: String,

    /// Model file to pass through; None uses the binary's default
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Force a transcript language; None lets the model detect it
    #[serde(default)]
    pub language: Option<String>,

    /// Timeout for one transcription run in seconds
    #[serde(default = "default_collaborator_timeout")]
    pub timeout_secs: u64,
}

/// Settings for the llama-style generation CLI
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Extractor executable (assumed on PATH when not absolute)
    #[serde(default = "default_llama_binary")]
    pub binary: String,

    /// Model file to pass through; None uses the binary's default
    #[serde(default)]
    pub model_path: Option<PathBuf>,

    /// Generation budget for one extraction
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Timeout for one extraction run in seconds
    #[serde(default = "default_collaborator_timeout")]
    pub timeout_secs: u64,
}

/// Settings for diagram rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagramConfig {
    /// Output image format for the graphviz strategy
    #[serde(default = "default_diagram_format")]
    pub format: String,

    /// Graphviz dot executable
    #[serde(default = "default_dot_binary")]
    pub dot_binary: String,
}

fn default_output_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("flowscribe")
        .join("workflows")
}

fn default_whisper_binary() -> String {
    "whisper-cli".to_string()
}

fn default_llama_binary() -> String {
    "llama-cli".to_string()
}

fn default_collaborator_timeout() -> u64 {
    600
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_temperature() -> f32 {
    0.7
}

fn default_diagram_format() -> String {
    "png".to_string()
}

fn default_dot_binary() -> String {
    "dot".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            transcriber: TranscriberConfig::default(),
            extractor: ExtractorConfig::default(),
            diagram: DiagramConfig::default(),
        }
    }
}

impl Default for TranscriberConfig {
    fn default() -> Self {
        Self {
            binary: default_whisper_binary(),
            model_path: None,
            language: None,
            timeout_secs: default_collaborator_timeout(),
        }
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            binary: default_llama_binary(),
            model_path: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_collaborator_timeout(),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            format: default_diagram_format(),
            dot_binary: default_dot_binary(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml)?;
        Ok(config)
    }
}
