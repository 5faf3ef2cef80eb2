mod cli;
mod core;
mod diagram;
mod extract;
mod graph;
mod pipeline;
mod transcribe;

use anyhow::{Context, Result};
use cli::commands::{AnalyzeCommand, RunCommand, ShowCommand};
use cli::output::*;
use cli::{Cli, Command};
use crate::core::config::AppConfig;
use crate::core::job::JobStage;
use crate::diagram::DiagramSerializer;
use crate::extract::{LlamaExtractor, StepExtractor};
use crate::pipeline::{InMemoryJobStore, JobInput, JobRequest, PipelineOrchestrator};
use crate::transcribe::{Transcriber, WhisperTranscriber};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    // Load configuration
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path).context("Failed to load configuration")?,
        None => AppConfig::default(),
    };

    // Execute command
    match &cli.command {
        Command::Run(cmd) => run_from_audio(cmd, &config).await?,
        Command::Analyze(cmd) => run_from_text(cmd, &config).await?,
        Command::Show(cmd) => show_workflow(cmd, &config)?,
    }

    Ok(())
}

async fn run_from_audio(cmd: &RunCommand, config: &AppConfig) -> Result<()> {
    let orchestrator = build_orchestrator(config).await;

    let request = JobRequest {
        input: JobInput::Audio {
            path: PathBuf::from(&cmd.audio),
            language: cmd.language.clone(),
        },
        name: cmd.name.clone(),
    };

    execute_job(&orchestrator, request).await
}

async fn run_from_text(cmd: &AnalyzeCommand, config: &AppConfig) -> Result<()> {
    let text = match (&cmd.file, &cmd.text) {
        (Some(file), _) => {
            std::fs::read_to_string(file).context("Failed to read the text file")?
        }
        (None, Some(text)) => text.clone(),
        (None, None) => anyhow::bail!("provide either --file or --text"),
    };

    let orchestrator = build_orchestrator(config).await;

    let request = JobRequest {
        input: JobInput::Text(text),
        name: cmd.name.clone(),
    };

    execute_job(&orchestrator, request).await
}

fn show_workflow(cmd: &ShowCommand, config: &AppConfig) -> Result<()> {
    let serializer = DiagramSerializer::new(
        &config.output_dir,
        &config.diagram.dot_binary,
        &config.diagram.format,
    );

    match serializer.find_document(&cmd.workflow_id) {
        Some(path) => {
            println!("{} Document: {}", INFO, style(path.display()).bold());
            for extension in [config.diagram.format.as_str(), "svg"] {
                let image = config
                    .output_dir
                    .join(format!("workflow_{}.{}", cmd.workflow_id, extension));
                if image.exists() {
                    println!("{} Diagram:  {}", INFO, image.display());
                    break;
                }
            }
            Ok(())
        }
        None => {
            println!("{} Workflow {} not found", CROSS, style(&cmd.workflow_id).bold());
            std::process::exit(1);
        }
    }
}

async fn build_orchestrator(
    config: &AppConfig,
) -> Arc<PipelineOrchestrator<WhisperTranscriber, LlamaExtractor>> {
    let transcriber = Arc::new(WhisperTranscriber::new(&config.transcriber));
    let extractor = Arc::new(LlamaExtractor::new(&config.extractor));

    if !transcriber.is_available().await {
        println!(
            "{} Transcriber '{}' not found; audio jobs will fail",
            WARN, config.transcriber.binary
        );
    }
    if !extractor.is_available().await {
        println!(
            "{} Extractor '{}' not found; jobs will fail at extraction",
            WARN, config.extractor.binary
        );
    }

    let serializer = Arc::new(DiagramSerializer::new(
        &config.output_dir,
        &config.diagram.dot_binary,
        &config.diagram.format,
    ));

    Arc::new(PipelineOrchestrator::new(
        transcriber,
        extractor,
        serializer,
        Arc::new(InMemoryJobStore::new()),
    ))
}

async fn execute_job(
    orchestrator: &Arc<PipelineOrchestrator<WhisperTranscriber, LlamaExtractor>>,
    request: JobRequest,
) -> Result<()> {
    let job_id = orchestrator.submit(request).await;
    println!(
        "{} Job {} submitted",
        ROCKET,
        style(&job_id.to_string()[..8]).dim()
    );

    // Poll the registry until the job settles, echoing stage changes
    let mut last_stage = JobStage::Pending;
    loop {
        let Some(job) = orchestrator.status(job_id).await else {
            anyhow::bail!("job {} vanished from the registry", job_id);
        };

        if job.stage != last_stage && !job.stage.is_terminal() {
            println!("{} {}", SPINNER, format_stage(job.stage));
            last_stage = job.stage;
        }

        if job.stage.is_terminal() {
            match job.stage {
                JobStage::Completed => {
                    let artifact = job
                        .artifact
                        .context("completed job has no artifact")?;
                    println!("\n{}", format_artifact(&artifact));
                }
                _ => {
                    println!(
                        "\n{} Job {} {}",
                        CROSS,
                        style(&job_id.to_string()[..8]).dim(),
                        style("failed").red()
                    );
                    if let Some(error) = &job.error {
                        println!("  {}", style(error).red());
                    }
                    std::process::exit(1);
                }
            }
            return Ok(());
        }

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
    }
}
