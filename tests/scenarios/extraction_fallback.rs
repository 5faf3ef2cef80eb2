//! Test: unusable extraction output degrades to the placeholder workflow

use crate::helpers::*;

#[tokio::test]
async fn test_unstructured_response_yields_placeholder_workflow() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("Some rambling that confused the model."),
        MockExtractor::fixed("I'm sorry, I cannot produce a workflow for this."),
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Confused").await;
    let job = wait_for_terminal(&orchestrator, job_id).await;

    // Unparseable extraction is NOT fatal; the job completes with the
    // canonical placeholder chain.
    let artifact = assert_completed(&job);
    let ids: Vec<&str> = artifact
        .graph
        .nodes()
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, vec!["step_1", "step_2", "step_3"]);
    assert_eq!(artifact.graph.nodes()[1].name, "Analysis Required");
    assert_eq!(
        artifact.graph.edges(),
        vec![("step_1", "step_2"), ("step_2", "step_3")]
    );
}

#[tokio::test]
async fn test_partial_garbage_is_recovered_not_discarded() {
    let scratch = ScratchDir::new();
    let response = r#"Thinking... [{"step_id": "a", "name": "Check stock", "step_type": "task", "next_steps": ["b"]}, {"step_id": "b", "name": "Ship order", "step_type": "task", "next_steps": ["ghost"]}] (and some notes"#;
    let orchestrator = orchestrator_with(
        MockTranscriber::fixed("Check stock, then ship the order."),
        MockExtractor::fixed(response),
        &scratch.path,
    );

    let job_id = submit_audio(&orchestrator, "Orders").await;
    let artifact = assert_completed(&wait_for_terminal(&orchestrator, job_id).await);

    // Both real steps survived; the dangling "ghost" reference did not
    assert!(artifact.graph.contains("a"));
    assert!(artifact.graph.contains("b"));
    assert!(!artifact.graph.contains("ghost"));
    assert!(!artifact
        .graph
        .edges()
        .iter()
        .any(|(_, target)| *target == "ghost"));
}
