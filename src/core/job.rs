//! Job state models for the extraction pipeline

use crate::core::graph::WorkflowGraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Stage of a pipeline job. Transitions are strictly forward; a job never
/// re-enters an earlier stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStage {
    /// Job accepted but not yet started
    Pending,
    /// Waiting on the transcription collaborator
    Transcribing,
    /// Waiting on the extraction collaborator / parsing its response
    Extracting,
    /// Repairing the raw step records into a workflow graph
    Normalizing,
    /// Writing the BPMN document and rendering the diagram
    Serializing,
    /// Job finished with an artifact
    Completed,
    /// Job aborted; see the error message
    Failed,
}

impl JobStage {
    /// Check if the stage is terminal
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStage::Completed | JobStage::Failed)
    }

    /// Position in the forward stage order, used to reject backward moves
    pub(crate) fn order(&self) -> u8 {
        match self {
            JobStage::Pending => 0,
            JobStage::Transcribing => 1,
            JobStage::Extracting => 2,
            JobStage::Normalizing => 3,
            JobStage::Serializing => 4,
            JobStage::Completed => 5,
            JobStage::Failed => 5,
        }
    }

    /// Coarse status exposed to callers
    pub fn status(&self) -> JobStatus {
        match self {
            JobStage::Pending => JobStatus::Pending,
            JobStage::Completed => JobStatus::Completed,
            JobStage::Failed => JobStatus::Failed,
            _ => JobStatus::Processing,
        }
    }

    /// Lowercase stage label for messages and logs
    pub fn label(&self) -> &'static str {
        match self {
            JobStage::Pending => "pending",
            JobStage::Transcribing => "transcribing",
            JobStage::Extracting => "extracting",
            JobStage::Normalizing => "normalizing",
            JobStage::Serializing => "serializing",
            JobStage::Completed => "completed",
            JobStage::Failed => "failed",
        }
    }
}

/// Coarse job status surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// The product of a completed job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowArtifact {
    /// Workflow identifier (distinct from the job id)
    pub workflow_id: String,

    /// Workflow display name
    pub name: String,

    /// The transcript the workflow was extracted from
    pub transcript: String,

    /// The normalized process graph
    pub graph: WorkflowGraph,

    /// Path of the persisted BPMN document
    pub bpmn_path: PathBuf,

    /// Path of the rendered diagram, when a renderer was available
    pub diagram_path: Option<PathBuf>,

    pub created_at: DateTime<Utc>,
}

/// A single pipeline job, owned by its orchestrator task for its lifetime.
/// Callers only ever see cloned snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineJob {
    /// Unique job ID
    pub id: Uuid,

    /// Current stage
    pub stage: JobStage,

    /// Human-readable progress message
    pub message: String,

    /// Error string, set when the job failed
    pub error: Option<String>,

    /// Result, set when the job completed
    pub artifact: Option<WorkflowArtifact>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PipelineJob {
    /// Create a new pending job
    pub fn new(id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            stage: JobStage::Pending,
            message: "Job accepted".to_string(),
            error: None,
            artifact: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Move to a later stage. Backward or terminal-escaping moves are ignored.
    pub fn advance(&mut self, stage: JobStage, message: &str) {
        if self.stage.is_terminal() || stage.order() <= self.stage.order() {
            return;
        }
        self.stage = stage;
        self.message = message.to_string();
        self.updated_at = Utc::now();
    }

    /// Mark the job completed with its artifact
    pub fn complete(&mut self, artifact: WorkflowArtifact) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = JobStage::Completed;
        self.message = "Workflow generated successfully".to_string();
        self.artifact = Some(artifact);
        self.updated_at = Utc::now();
    }

    /// Mark the job failed at the given stage
    pub fn fail(&mut self, stage: JobStage, error: &str) {
        if self.stage.is_terminal() {
            return;
        }
        self.stage = JobStage::Failed;
        self.message = format!("Job failed while {}", stage.label());
        self.error = Some(error.to_string());
        self.updated_at = Utc::now();
    }
}
