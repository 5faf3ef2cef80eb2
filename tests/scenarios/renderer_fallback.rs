//! Test: diagram rendering is best-effort, never fatal

use crate::helpers::*;
use async_trait::async_trait;
use flowscribe::diagram::renderer::{DiagramRenderer, RenderError, SvgRenderer};
use flowscribe::{DiagramSerializer, InMemoryJobStore, PipelineOrchestrator, WorkflowGraph};
use flowscribe::diagram::layout::DiagramLayout;
use std::path::{Path, PathBuf};
use std::sync::Arc;

struct MissingTool;

#[async_trait]
impl DiagramRenderer for MissingTool {
    fn name(&self) -> &'static str {
        "missing-tool"
    }
    async fn is_available(&self) -> bool {
        false
    }
    async fn render(
        &self,
        _graph: &WorkflowGraph,
        _layout: &DiagramLayout,
        _output_base: &Path,
    ) -> Result<PathBuf, RenderError> {
        unreachable!("unavailable renderer must not be invoked")
    }
}

struct BrokenTool;

#[async_trait]
impl DiagramRenderer for BrokenTool {
    fn name(&self) -> &'static str {
        "broken-tool"
    }
    async fn is_available(&self) -> bool {
        true
    }
    async fn render(
        &self,
        _graph: &WorkflowGraph,
        _layout: &DiagramLayout,
        _output_base: &Path,
    ) -> Result<PathBuf, RenderError> {
        Err(RenderError::Tool("segfault, probably".to_string()))
    }
}

fn orchestrator_with_renderers(
    dir: &Path,
    renderers: Vec<Box<dyn DiagramRenderer>>,
) -> Arc<PipelineOrchestrator<MockTranscriber, MockExtractor>> {
    let serializer = Arc::new(DiagramSerializer::with_renderers(dir, renderers));
    Arc::new(PipelineOrchestrator::new(
        Arc::new(MockTranscriber::fixed("Fill the form, then send it.")),
        Arc::new(MockExtractor::fixed(
            r#"[{"step_id": "a", "name": "Fill", "next_steps": ["b"]}, {"step_id": "b", "name": "Send"}]"#,
        )),
        serializer,
        Arc::new(InMemoryJobStore::new()),
    ))
}

#[tokio::test]
async fn test_exhausted_renderer_chain_still_completes_the_job() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with_renderers(
        &scratch.path,
        vec![Box::new(MissingTool), Box::new(BrokenTool)],
    );

    let job_id = submit_audio(&orchestrator, "No Diagram").await;
    let job = wait_for_terminal(&orchestrator, job_id).await;
    let artifact = assert_completed(&job);

    // Document persisted, diagram absent
    assert!(artifact.bpmn_path.exists());
    assert!(artifact.diagram_path.is_none());
}

#[tokio::test]
async fn test_later_strategy_wins_when_earlier_ones_skip() {
    let scratch = ScratchDir::new();
    let orchestrator = orchestrator_with_renderers(
        &scratch.path,
        vec![
            Box::new(MissingTool),
            Box::new(BrokenTool),
            Box::new(SvgRenderer),
        ],
    );

    let job_id = submit_audio(&orchestrator, "Svg Wins").await;
    let artifact = assert_completed(&wait_for_terminal(&orchestrator, job_id).await);

    let diagram = artifact.diagram_path.expect("svg strategy should have rendered");
    assert!(diagram.exists());
    assert_eq!(diagram.extension().unwrap(), "svg");
}
