//! CLI output formatting

use crate::core::job::{JobStage, JobStatus, PipelineJob, WorkflowArtifact};
use console::Emoji;

// Re-export style
pub use console::style;

// Emojis for output
pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "!");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");

/// Format a job stage for display
pub fn format_stage(stage: JobStage) -> String {
    match stage {
        JobStage::Pending => style("PENDING").dim().to_string(),
        JobStage::Transcribing => style("TRANSCRIBING").yellow().to_string(),
        JobStage::Extracting => style("EXTRACTING").yellow().to_string(),
        JobStage::Normalizing => style("NORMALIZING").yellow().to_string(),
        JobStage::Serializing => style("SERIALIZING").yellow().to_string(),
        JobStage::Completed => style("COMPLETED").green().to_string(),
        JobStage::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a coarse job status for display
pub fn format_status(status: JobStatus) -> String {
    match status {
        JobStatus::Pending => style("pending").dim().to_string(),
        JobStatus::Processing => style("processing").yellow().to_string(),
        JobStatus::Completed => style("completed").green().to_string(),
        JobStatus::Failed => style("failed").red().to_string(),
    }
}

/// One-line job summary
pub fn format_job(job: &PipelineJob) -> String {
    let icon = match job.stage {
        JobStage::Completed => CHECK,
        JobStage::Failed => CROSS,
        JobStage::Pending => INFO,
        _ => SPINNER,
    };
    format!(
        "{} {} - {} - {}",
        icon,
        style(&job.id.to_string()[..8]).dim(),
        format_stage(job.stage),
        job.message
    )
}

/// Multi-line artifact summary printed on completion
pub fn format_artifact(artifact: &WorkflowArtifact) -> String {
    let mut out = format!(
        "{} Workflow {} ({})\n  Nodes: {}\n  Document: {}",
        CHECK,
        style(&artifact.name).bold(),
        style(&artifact.workflow_id).dim(),
        style(artifact.graph.len()).cyan(),
        artifact.bpmn_path.display()
    );
    match &artifact.diagram_path {
        Some(path) => out.push_str(&format!("\n  Diagram: {}", path.display())),
        None => out.push_str(&format!(
            "\n  Diagram: {}",
            style("not rendered (no renderer available)").dim()
        )),
    }
    out
}
