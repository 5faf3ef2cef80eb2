//! Test utility functions for flowscribe

use async_trait::async_trait;
use flowscribe::diagram::renderer::SvgRenderer;
use flowscribe::{
    DiagramSerializer, ExtractError, InMemoryJobStore, JobInput, JobRequest, JobStage,
    PipelineJob, PipelineOrchestrator, StepExtractor, TranscribeError, Transcriber,
    TranscriptSegment, TranscriptionResult,
};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Mock transcriber that returns predefined transcripts
pub struct MockTranscriber {
    transcripts: Arc<Vec<String>>,
    index: Arc<AtomicUsize>,
}

impl MockTranscriber {
    pub fn new(transcripts: Vec<String>) -> Self {
        Self {
            transcripts: Arc::new(transcripts),
            index: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Transcriber that always returns the same text
    pub fn fixed(text: &str) -> Self {
        Self::new(vec![text.to_string()])
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscribeError> {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        let text = self
            .transcripts
            .get(idx)
            .or_else(|| self.transcripts.last())
            .ok_or_else(|| {
                TranscribeError::Internal("MockTranscriber: no transcript configured".to_string())
            })?;

        Ok(TranscriptionResult::from_segments(
            vec![TranscriptSegment {
                start_time: 0.0,
                end_time: 5.0,
                text: text.clone(),
            }],
            "en".to_string(),
        ))
    }
}

/// Transcriber that always fails, for error-path tests
pub struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(
        &self,
        _audio: &Path,
        _language: Option<&str>,
    ) -> Result<TranscriptionResult, TranscribeError> {
        Err(TranscribeError::Tool(
            "transcriber exited with code 1: model file missing".to_string(),
        ))
    }
}

/// Mock extractor that returns predefined responses
pub struct MockExtractor {
    responses: Arc<Vec<String>>,
    index: Arc<AtomicUsize>,
}

impl MockExtractor {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(responses),
            index: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Extractor that always returns the same response
    pub fn fixed(response: &str) -> Self {
        Self::new(vec![response.to_string()])
    }

    /// Number of extraction calls made so far
    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    /// Shared handle on the call counter, usable after the extractor has
    /// been moved into an orchestrator
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.index)
    }
}

#[async_trait]
impl StepExtractor for MockExtractor {
    async fn extract(&self, _prompt: &str) -> Result<String, ExtractError> {
        let idx = self.index.fetch_add(1, Ordering::SeqCst);
        self.responses
            .get(idx)
            .or_else(|| self.responses.last())
            .cloned()
            .ok_or_else(|| {
                ExtractError::Internal("MockExtractor: no response configured".to_string())
            })
    }
}

/// Extractor that always fails, for error-path tests
pub struct FailingExtractor;

#[async_trait]
impl StepExtractor for FailingExtractor {
    async fn extract(&self, _prompt: &str) -> Result<String, ExtractError> {
        Err(ExtractError::Model("model host unreachable".to_string()))
    }
}

/// A scratch output directory that cleans up after itself
pub struct ScratchDir {
    pub path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!("flowscribe_it_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&path).expect("failed to create scratch dir");
        Self { path }
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.path).ok();
    }
}

/// Build an orchestrator over mock collaborators and the built-in SVG
/// renderer, writing into `dir`.
pub fn orchestrator_with<T, E>(
    transcriber: T,
    extractor: E,
    dir: &Path,
) -> Arc<PipelineOrchestrator<T, E>>
where
    T: Transcriber + 'static,
    E: StepExtractor + 'static,
{
    let serializer = Arc::new(DiagramSerializer::with_renderers(
        dir,
        vec![Box::new(SvgRenderer)],
    ));
    Arc::new(PipelineOrchestrator::new(
        Arc::new(transcriber),
        Arc::new(extractor),
        serializer,
        Arc::new(InMemoryJobStore::new()),
    ))
}

/// Submit an audio job with a placeholder path
pub async fn submit_audio<T, E>(orchestrator: &Arc<PipelineOrchestrator<T, E>>, name: &str) -> Uuid
where
    T: Transcriber + 'static,
    E: StepExtractor + 'static,
{
    orchestrator
        .submit(JobRequest {
            input: JobInput::Audio {
                path: PathBuf::from("recording.wav"),
                language: None,
            },
            name: Some(name.to_string()),
        })
        .await
}

/// Poll until a job reaches a terminal stage
pub async fn wait_for_terminal<T, E>(
    orchestrator: &Arc<PipelineOrchestrator<T, E>>,
    job_id: Uuid,
) -> PipelineJob
where
    T: Transcriber + 'static,
    E: StepExtractor + 'static,
{
    for _ in 0..200 {
        if let Some(job) = orchestrator.status(job_id).await {
            if job.stage.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    panic!("job {} never reached a terminal stage", job_id);
}

/// Assert a job completed and hand back its artifact
pub fn assert_completed(job: &PipelineJob) -> flowscribe::WorkflowArtifact {
    assert_eq!(
        job.stage,
        JobStage::Completed,
        "job should be completed but was {:?} (error: {:?})",
        job.stage,
        job.error
    );
    job.artifact.clone().expect("completed job has no artifact")
}

/// Assert a job failed with an error containing the given text
pub fn assert_failed(job: &PipelineJob, expected_error: &str) {
    assert_eq!(
        job.stage,
        JobStage::Failed,
        "job should have failed but was {:?}",
        job.stage
    );
    let error = job.error.as_deref().unwrap_or("");
    assert!(
        error.contains(expected_error),
        "job error:\n{}\n\ndoes not contain:\n{}",
        error,
        expected_error
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_extractor_sticks_to_last_response() {
        let extractor = MockExtractor::new(vec!["one".to_string(), "two".to_string()]);
        assert_eq!(extractor.extract("").await.unwrap(), "one");
        assert_eq!(extractor.extract("").await.unwrap(), "two");
        assert_eq!(extractor.extract("").await.unwrap(), "two");
        assert_eq!(extractor.calls(), 3);
    }

    #[tokio::test]
    async fn test_mock_transcriber_produces_segments() {
        let transcriber = MockTranscriber::fixed("hello world");
        let result = transcriber
            .transcribe(Path::new("x.wav"), None)
            .await
            .unwrap();
        assert_eq!(result.full_text, "hello world");
        assert_eq!(result.segments.len(), 1);
        assert_eq!(result.language, "en");
    }

    #[test]
    fn test_scratch_dir_cleanup() {
        let path = {
            let scratch = ScratchDir::new();
            assert!(scratch.path.exists());
            scratch.path.clone()
        };
        assert!(!path.exists());
    }
}
