//! Job registry
//!
//! The registry is the only shared mutable state in the system. Writes for
//! a given job id come exclusively from that job's owning orchestrator
//! task; everyone else gets cloned point-in-time snapshots. Unbounded by
//! design; eviction is a caller concern.

use crate::core::job::{JobStage, PipelineJob, WorkflowArtifact};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Trait for job registries, so an external key-value store can stand in
/// for the in-memory map.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Register a new job record
    async fn insert(&self, job: PipelineJob);

    /// Move a job to a later stage
    async fn advance(&self, id: Uuid, stage: JobStage, message: &str);

    /// Mark a job completed with its artifact
    async fn complete(&self, id: Uuid, artifact: WorkflowArtifact);

    /// Mark a job failed at the given stage
    async fn fail(&self, id: Uuid, stage: JobStage, error: &str);

    /// Snapshot of one job
    async fn get(&self, id: Uuid) -> Option<PipelineJob>;

    /// Snapshot of all jobs
    async fn list(&self) -> Vec<PipelineJob>;
}

/// In-memory job registry
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<Uuid, PipelineJob>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobStore for InMemoryJobStore {
    async fn insert(&self, job: PipelineJob) {
        let mut jobs = self.jobs.write().await;
        jobs.insert(job.id, job);
    }

    async fn advance(&self, id: Uuid, stage: JobStage, message: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(&id) {
            job.advance(stage, message);
        }
    }

    async fn complete(&self, id: Uuid, artifact: WorkflowArtifact) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(&id) {
            job.complete(artifact);
        }
    }

    async fn fail(&self, id: Uuid, stage: JobStage, error: &str) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.get_mut(&id) {
            job.fail(stage, error);
        }
    }

    async fn get(&self, id: Uuid) -> Option<PipelineJob> {
        let jobs = self.jobs.read().await;
        jobs.get(&id).cloned()
    }

    async fn list(&self) -> Vec<PipelineJob> {
        let jobs = self.jobs.read().await;
        jobs.values().cloned().collect()
    }
}
