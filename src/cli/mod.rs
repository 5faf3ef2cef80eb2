//! Command-line interface

pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use commands::{AnalyzeCommand, RunCommand, ShowCommand};

/// Turns spoken process descriptions into BPMN workflow diagrams
#[derive(Debug, Parser, Clone)]
#[command(name = "flowscribe")]
#[command(author = "Flowscribe Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Turns spoken process descriptions into BPMN workflow diagrams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available commands
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Generate a workflow from an audio recording
    Run(RunCommand),

    /// Generate a workflow from existing text
    Analyze(AnalyzeCommand),

    /// Show a previously generated workflow document
    Show(ShowCommand),
}

impl Cli {
    /// Parse CLI arguments from the environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

use std::ffi::OsString;
