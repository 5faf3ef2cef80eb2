//! Test: jobs run as independent tasks over a shared registry

use crate::helpers::*;
use flowscribe::{JobInput, JobRequest, JobStage};
use std::path::PathBuf;

#[tokio::test]
async fn test_concurrent_jobs_complete_independently() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("Fill the form, verify it, send it."),
        MockExtractor::fixed(
            r#"[{"step_id": "a", "name": "Fill", "next_steps": ["b"]}, {"step_id": "b", "name": "Send"}]"#,
        ),
        &scratch.path,
    );

    let first = submit_audio(&orchestrator, "Job One").await;
    let second = submit_audio(&orchestrator, "Job Two").await;
    assert_ne!(first, second);

    let first_job = wait_for_terminal(&orchestrator, first).await;
    let second_job = wait_for_terminal(&orchestrator, second).await;

    let first_artifact = assert_completed(&first_job);
    let second_artifact = assert_completed(&second_job);

    // Each job produced its own workflow under its own id
    assert_ne!(first_artifact.workflow_id, second_artifact.workflow_id);
    assert!(first_artifact.bpmn_path.exists());
    assert!(second_artifact.bpmn_path.exists());
    assert_ne!(first_artifact.bpmn_path, second_artifact.bpmn_path);
}

#[tokio::test]
async fn test_failed_job_does_not_disturb_others() {
    let scratch = ScratchDir::new();
    // First transcript is blank (fails the first job), the second is fine
    let orchestrator = orchestrator_with(
        MockTranscriber::new(vec!["  ".to_string(), "Fill the form.".to_string()]),
        MockExtractor::fixed(r#"[{"step_id": "a", "name": "Fill"}]"#),
        &scratch.path,
    );

    let failing = submit_audio(&orchestrator, "Blank").await;
    let failing_job = wait_for_terminal(&orchestrator, failing).await;
    assert_failed(&failing_job, "no text");

    let healthy = submit_audio(&orchestrator, "Healthy").await;
    let healthy_job = wait_for_terminal(&orchestrator, healthy).await;
    assert_completed(&healthy_job);

    // The registry still holds both records, untouched by each other
    let failed_snapshot = orchestrator.status(failing).await.unwrap();
    assert_eq!(failed_snapshot.stage, JobStage::Failed);
    let healthy_snapshot = orchestrator.status(healthy).await.unwrap();
    assert_eq!(healthy_snapshot.stage, JobStage::Completed);
}

#[tokio::test]
async fn test_text_jobs_share_the_extractor_safely() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("unused"),
        MockExtractor::fixed(r#"[{"step_id": "a", "name": "A"}]"#),
        &scratch.path,
    );

    let mut job_ids = Vec::new();
    for i in 0..4 {
        let job_id = orchestrator
            .submit(JobRequest {
                input: JobInput::Text(format!("Process variant {}.", i)),
                name: Some(format!("Variant {}", i)),
            })
            .await;
        job_ids.push(job_id);
    }

    for job_id in job_ids {
        let job = wait_for_terminal(&orchestrator, job_id).await;
        assert_completed(&job);
    }
}
