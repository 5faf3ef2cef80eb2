//! Test: fatal stage failures mark the job failed and stop the chain

use crate::helpers::*;
use flowscribe::{JobInput, JobRequest, JobStatus};

#[tokio::test]
async fn test_empty_transcript_fails_the_job() {
    let scratch = ScratchDir::new();
    let extractor = MockExtractor::fixed("should never be called");
    let calls = extractor.call_counter();
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("   \n  "),
        extractor,
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Silence").await;
    let job = wait_for_terminal(&orchestrator, job_id).await;

    assert_failed(&job, "no text");
    assert_eq!(job.stage.status(), JobStatus::Failed);
    assert!(job.artifact.is_none());
    // The chain stopped before extraction
    assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_transcriber_error_fails_the_job() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with(
        FailingTranscriber,
        MockExtractor::fixed("unused"),
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Broken").await;
    let job = wait_for_terminal(&orchestrator, job_id).await;

    assert_failed(&job, "model file missing");
    assert_eq!(job.message, "Job failed while transcribing");
}

#[tokio::test]
async fn test_extractor_error_fails_the_job() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("A perfectly good transcript."),
        FailingExtractor,
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "No Model").await;
    let job = wait_for_terminal(&orchestrator, job_id).await;

    assert_failed(&job, "model host unreachable");
    assert_eq!(job.message, "Job failed while extracting");
}

#[tokio::test]
async fn test_text_input_skips_transcription_entirely() {
    let scratch = ScratchDir::new();
    // A transcriber that would fail if it were consulted
    let orchestrator = orchestrator_with(
        FailingTranscriber,
        MockExtractor::fixed(r#"[{"step_id": "a", "name": "A"}]"#),
        &scratch.path,
    );

    let job_id = orchestrator
        .submit(JobRequest {
            input: JobInput::Text("Fill the form then send it.".to_string()),
            name: None,
        })
        .await;
    let job = wait_for_terminal(&orchestrator, job_id).await;
    let artifact = assert_completed(&job);

    assert_eq!(artifact.transcript, "Fill the form then send it.");
    assert_eq!(artifact.name, "Generated Workflow");
}
