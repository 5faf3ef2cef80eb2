//! Workflow document serialization and diagram rendering

pub mod bpmn;
pub mod layout;
pub mod renderer;

use crate::core::graph::WorkflowGraph;
use layout::DiagramLayout;
use renderer::{render_with_fallback, DiagramRenderer, GraphvizRenderer, SvgRenderer};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub use layout::{Bounds, FlowEdge, Point};
pub use renderer::{sanitize_id, RenderError};

/// Error types for document serialization.
///
/// An I/O failure while persisting the document is fatal to the job; a
/// missing diagram image never is (that is the renderer chain's problem,
/// and exhaustion there just means no artifact).
#[derive(Debug, Error)]
pub enum DiagramError {
    #[error("failed to persist workflow document: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML serialization error: {0}")]
    Xml(String),
}

/// Paths of one serialized workflow
#[derive(Debug, Clone)]
pub struct SerializedWorkflow {
    /// The persisted BPMN document
    pub bpmn_path: PathBuf,

    /// The rendered diagram image, when some renderer succeeded
    pub diagram_path: Option<PathBuf>,
}

/// Serializes normalized graphs into BPMN documents plus a best-effort
/// diagram image.
pub struct DiagramSerializer {
    output_dir: PathBuf,
    renderers: Vec<Box<dyn DiagramRenderer>>,
}

impl DiagramSerializer {
    /// Create a serializer with the default renderer chain:
    /// graphviz first, built-in SVG as the safety net.
    pub fn new(output_dir: &Path, dot_binary: &str, image_format: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            renderers: vec![
                Box::new(GraphvizRenderer::new(dot_binary, image_format)),
                Box::new(SvgRenderer),
            ],
        }
    }

    /// Create a serializer with an explicit renderer chain (tests, embedders)
    pub fn with_renderers(output_dir: &Path, renderers: Vec<Box<dyn DiagramRenderer>>) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            renderers,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Serialize a graph: compute the layout, persist the BPMN document,
    /// then try the renderer chain for an image.
    pub async fn serialize(
        &self,
        graph: &WorkflowGraph,
        workflow_id: &str,
        name: &str,
        description: &str,
    ) -> Result<SerializedWorkflow, DiagramError> {
        let diagram_layout = DiagramLayout::of(graph);
        let xml = bpmn::to_xml(graph, &diagram_layout, workflow_id, name, description)?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let bpmn_path = bpmn::document_path(&self.output_dir, workflow_id);
        tokio::fs::write(&bpmn_path, xml).await?;
        info!("BPMN document written: {}", bpmn_path.display());

        let image_base = self.output_dir.join(format!("workflow_{}", workflow_id));
        let diagram_path =
            render_with_fallback(&self.renderers, graph, &diagram_layout, &image_base).await;
        if diagram_path.is_none() {
            info!("no diagram renderer available for workflow {}", workflow_id);
        }

        Ok(SerializedWorkflow {
            bpmn_path,
            diagram_path,
        })
    }

    /// Look up an already-persisted document by workflow id
    pub fn find_document(&self, workflow_id: &str) -> Option<PathBuf> {
        bpmn::find_document(&self.output_dir, workflow_id)
    }
}
