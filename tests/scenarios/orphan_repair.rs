//! Test: unreachable steps are wired back into the process

use crate::helpers::*;

#[tokio::test]
async fn test_orphan_island_is_attached_to_the_start() {
    let scratch = ScratchDir::new();
    // "archive" is disconnected from the main chain entirely
    let response = r#"[
        {"step_id": "intake", "name": "Start intake", "step_type": "event", "next_steps": ["review"]},
        {"step_id": "review", "name": "Review request", "step_type": "task", "next_steps": ["close"]},
        {"step_id": "close", "name": "End of process", "step_type": "event", "next_steps": []},
        {"step_id": "archive", "name": "Archive paperwork", "step_type": "task", "next_steps": []}
    ]"#;
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("Intake, review, close. Also archive the paperwork."),
        MockExtractor::fixed(response),
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Requests").await;
    let artifact = assert_completed(&wait_for_terminal(&orchestrator, job_id).await);

    // No synthesis needed: boundaries existed. The orphan was attached to
    // the existing start node instead of being dropped.
    assert_eq!(artifact.graph.len(), 4);
    assert!(artifact.graph.edges().contains(&("intake", "archive")));

    // And it shows up in the document as a real flow
    let xml = std::fs::read_to_string(&artifact.bpmn_path).unwrap();
    assert!(xml.contains(r#"sourceRef="intake" targetRef="archive""#));
}

#[tokio::test]
async fn test_duplicate_ids_from_extraction_are_uniquified() {
    let scratch = ScratchDir::new();
    let response = r#"[
        {"step_id": "step", "name": "First", "step_type": "task", "next_steps": []},
        {"step_id": "step", "name": "Second", "step_type": "task", "next_steps": []}
    ]"#;
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("Do the first thing, then the second."),
        MockExtractor::fixed(response),
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Duplicates").await;
    let artifact = assert_completed(&wait_for_terminal(&orchestrator, job_id).await);

    assert!(artifact.graph.contains("step"));
    assert!(artifact.graph.contains("step_2"));

    // Unique ids mean unique shape elements in the document
    let xml = std::fs::read_to_string(&artifact.bpmn_path).unwrap();
    assert!(xml.contains(r#"id="shape_step""#));
    assert!(xml.contains(r#"id="shape_step_2""#));
}
