//! Pipeline orchestrator - sequences one job's stage chain
//!
//! Stages run strictly forward: transcribe, extract, normalize, serialize.
//! Any stage can fail the job; nothing is retried and nothing runs out of
//! order. Each submitted job gets its own task, so jobs only contend on the
//! collaborator adapters and the registry.

use crate::core::job::{JobStage, PipelineJob, WorkflowArtifact};
use crate::diagram::{DiagramError, DiagramSerializer};
use crate::extract::{build_extraction_prompt, parse_steps, ExtractError, StepExtractor};
use crate::graph::normalize;
use crate::pipeline::registry::JobStore;
use crate::transcribe::{TranscribeError, Transcriber};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};
use uuid::Uuid;

/// What a job should process
#[derive(Debug, Clone)]
pub enum JobInput {
    /// An audio file to transcribe first
    Audio {
        path: PathBuf,
        language: Option<String>,
    },
    /// Pre-supplied text; transcription is skipped
    Text(String),
}

/// A job submission
#[derive(Debug, Clone)]
pub struct JobRequest {
    pub input: JobInput,
    /// Workflow display name; defaulted when absent
    pub name: Option<String>,
}

/// Fatal job errors, each tied to the stage it aborts
#[derive(Debug, Error)]
pub enum JobError {
    #[error("transcription returned no text")]
    TranscriptionEmpty,

    #[error("extraction produced no workflow steps")]
    ExtractionEmpty,

    #[error(transparent)]
    Transcription(#[from] TranscribeError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Serialization(#[from] DiagramError),
}

impl JobError {
    /// The stage this error aborts
    pub fn stage(&self) -> JobStage {
        match self {
            JobError::TranscriptionEmpty | JobError::Transcription(_) => JobStage::Transcribing,
            JobError::ExtractionEmpty | JobError::Extraction(_) => JobStage::Extracting,
            JobError::Serialization(_) => JobStage::Serializing,
        }
    }
}

/// Orchestrates the transcribe -> extract -> normalize -> serialize chain
pub struct PipelineOrchestrator<T, E> {
    transcriber: Arc<T>,
    extractor: Arc<E>,
    serializer: Arc<DiagramSerializer>,
    store: Arc<dyn JobStore>,
}

// Cloning shares the collaborators and the registry; each spawned job chain
// carries its own handle.
impl<T, E> Clone for PipelineOrchestrator<T, E> {
    fn clone(&self) -> Self {
        Self {
            transcriber: Arc::clone(&self.transcriber),
            extractor: Arc::clone(&self.extractor),
            serializer: Arc::clone(&self.serializer),
            store: Arc::clone(&self.store),
        }
    }
}

impl<T, E> PipelineOrchestrator<T, E>
where
    T: Transcriber + 'static,
    E: StepExtractor + 'static,
{
    pub fn new(
        transcriber: Arc<T>,
        extractor: Arc<E>,
        serializer: Arc<DiagramSerializer>,
        store: Arc<dyn JobStore>,
    ) -> Self {
        Self {
            transcriber,
            extractor,
            serializer,
            store,
        }
    }

    /// Register a job and run its stage chain on its own task.
    ///
    /// Once spawned the chain runs to a terminal stage; there is no
    /// cancellation path (extension point).
    pub async fn submit(&self, request: JobRequest) -> Uuid {
        let job_id = Uuid::new_v4();
        self.store.insert(PipelineJob::new(job_id)).await;

        let orchestrator = self.clone();
        tokio::spawn(async move {
            let _ = orchestrator.run(job_id, request).await;
        });

        job_id
    }

    /// Point-in-time snapshot of a job
    pub async fn status(&self, job_id: Uuid) -> Option<PipelineJob> {
        self.store.get(job_id).await
    }

    /// Run the full stage chain for an already-registered job.
    ///
    /// Recoverable conditions (unparseable extraction output, orphan steps,
    /// dangling edges, missing diagram renderers) never surface here; the
    /// owning components absorb them. Whatever error is returned has already
    /// been recorded against the job.
    pub async fn run(
        &self,
        job_id: Uuid,
        request: JobRequest,
    ) -> Result<WorkflowArtifact, JobError> {
        let workflow_id = Uuid::new_v4().to_string();
        let name = request
            .name
            .clone()
            .unwrap_or_else(|| "Generated Workflow".to_string());

        info!("job {}: starting workflow generation ({})", job_id, workflow_id);

        // Stage 1: obtain a transcript
        let (transcript, description) = match &request.input {
            JobInput::Audio { path, language } => {
                self.store
                    .advance(job_id, JobStage::Transcribing, "Transcribing audio")
                    .await;
                let result = self
                    .transcriber
                    .transcribe(path, language.as_deref())
                    .await;
                match result {
                    Ok(transcription) => {
                        info!(
                            "job {}: transcribed {} segment(s), {:.2}s, language '{}'",
                            job_id,
                            transcription.segments.len(),
                            transcription.duration_seconds,
                            transcription.language
                        );
                        (
                            transcription.full_text,
                            "Auto-generated from audio transcription",
                        )
                    }
                    Err(e) => return self.abort(job_id, e.into()).await,
                }
            }
            JobInput::Text(text) => (text.clone(), "Auto-generated from supplied text"),
        };

        if transcript.trim().is_empty() {
            return self.abort(job_id, JobError::TranscriptionEmpty).await;
        }
        debug!("job {}: transcript: {:.200}", job_id, transcript);

        // Stage 2: extract step records
        self.store
            .advance(job_id, JobStage::Extracting, "Extracting workflow steps")
            .await;
        let prompt = build_extraction_prompt(&transcript, None);
        let response = match self.extractor.extract(&prompt).await {
            Ok(response) => response,
            Err(e) => return self.abort(job_id, e.into()).await,
        };

        let records = parse_steps(&response);
        if records.is_empty() {
            return self.abort(job_id, JobError::ExtractionEmpty).await;
        }
        info!("job {}: extracted {} step(s)", job_id, records.len());

        // Stage 3: repair into a workflow graph (total, never fails)
        self.store
            .advance(job_id, JobStage::Normalizing, "Normalizing workflow graph")
            .await;
        let graph = normalize(records);
        info!(
            "job {}: normalized graph with {} node(s), {} edge(s)",
            job_id,
            graph.len(),
            graph.edges().len()
        );

        // Stage 4: persist the document; a missing diagram image is fine,
        // a write failure is not
        self.store
            .advance(job_id, JobStage::Serializing, "Serializing BPMN document")
            .await;
        let serialized = match self
            .serializer
            .serialize(&graph, &workflow_id, &name, description)
            .await
        {
            Ok(serialized) => serialized,
            Err(e) => return self.abort(job_id, e.into()).await,
        };

        // Stage 5: done
        let artifact = WorkflowArtifact {
            workflow_id,
            name,
            transcript,
            graph,
            bpmn_path: serialized.bpmn_path,
            diagram_path: serialized.diagram_path,
            created_at: Utc::now(),
        };
        self.store.complete(job_id, artifact.clone()).await;
        info!("job {}: completed", job_id);

        Ok(artifact)
    }

    async fn abort(
        &self,
        job_id: Uuid,
        err: JobError,
    ) -> Result<WorkflowArtifact, JobError> {
        error!(
            "job {} failed while {}: {}",
            job_id,
            err.stage().label(),
            err
        );
        self.store.fail(job_id, err.stage(), &err.to_string()).await;
        Err(err)
    }
}
