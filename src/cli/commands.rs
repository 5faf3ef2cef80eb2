//! CLI command definitions

use clap::Args;

/// Generate a workflow from an audio recording
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Path to the audio file to transcribe
    #[arg(short, long)]
    pub audio: String,

    /// Workflow display name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Force a transcript language (e.g. "en"); autodetected otherwise
    #[arg(short, long)]
    pub language: Option<String>,
}

/// Generate a workflow from existing text
#[derive(Debug, Args, Clone)]
pub struct AnalyzeCommand {
    /// Path to a text file containing the process description
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<String>,

    /// Inline process description
    #[arg(short, long)]
    pub text: Option<String>,

    /// Workflow display name
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Show a previously generated workflow document
#[derive(Debug, Args, Clone)]
pub struct ShowCommand {
    /// Workflow id (as printed on completion)
    pub workflow_id: String,
}
