//! flowscribe - turns spoken process descriptions into BPMN workflow diagrams

pub mod cli;
pub mod core;
pub mod diagram;
pub mod extract;
pub mod graph;
pub mod pipeline;
pub mod transcribe;

// Re-export commonly used types
pub use crate::core::config::AppConfig;
pub use crate::core::graph::{Node, NodeKind, WorkflowGraph};
pub use crate::core::job::{JobStage, JobStatus, PipelineJob, WorkflowArtifact};
pub use crate::core::record::StepRecord;
pub use crate::diagram::{DiagramError, DiagramSerializer};
pub use crate::extract::{ExtractError, LlamaExtractor, StepExtractor};
pub use crate::graph::normalize;
pub use crate::pipeline::{
    InMemoryJobStore, JobError, JobInput, JobRequest, JobStore, PipelineOrchestrator,
};
pub use crate::transcribe::{
    TranscribeError, Transcriber, TranscriptSegment, TranscriptionResult, WhisperTranscriber,
};
