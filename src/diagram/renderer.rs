//! Diagram renderer strategies
//!
//! Rendering a picture of the workflow is best-effort: strategies are tried
//! in order, an unavailable tool is a skip rather than an error, and when
//! every strategy fails the job simply has no diagram artifact.

use crate::core::graph::{NodeKind, WorkflowGraph};
use crate::diagram::layout::DiagramLayout;
use async_trait::async_trait;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, warn};

/// Error types for renderer strategies
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("render tool error: {0}")]
    Tool(String),

    #[error("render output error: {0}")]
    Output(String),
}

/// One way of turning a laid-out graph into an image file
#[async_trait]
pub trait DiagramRenderer: Send + Sync {
    /// Strategy name, for logs
    fn name(&self) -> &'static str;

    /// Whether the strategy can run at all (e.g. its external tool exists)
    async fn is_available(&self) -> bool;

    /// Render to a file next to `output_base`; the strategy picks the
    /// extension and returns the final path.
    async fn render(
        &self,
        graph: &WorkflowGraph,
        layout: &DiagramLayout,
        output_base: &Path,
    ) -> Result<PathBuf, RenderError>;
}

/// Try each renderer in order; first available strategy that succeeds wins.
/// Returns `None` when the chain is exhausted.
pub async fn render_with_fallback(
    renderers: &[Box<dyn DiagramRenderer>],
    graph: &WorkflowGraph,
    layout: &DiagramLayout,
    output_base: &Path,
) -> Option<PathBuf> {
    for renderer in renderers {
        if !renderer.is_available().await {
            debug!("renderer '{}' unavailable, skipping", renderer.name());
            continue;
        }
        match renderer.render(graph, layout, output_base).await {
            Ok(path) => {
                debug!("renderer '{}' produced {}", renderer.name(), path.display());
                return Some(path);
            }
            Err(e) => warn!("renderer '{}' failed: {}", renderer.name(), e),
        }
    }
    None
}

/// Make a node id safe for renderers with stricter token rules: every
/// non-alphanumeric character becomes an underscore, a leading digit gets an
/// underscore prefix, and the result is lowercased. Must be applied to node
/// declarations and edge endpoints alike so references stay consistent.
pub fn sanitize_id(raw: &str) -> String {
    let mut out: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out.to_ascii_lowercase()
}

/// Graphviz `dot` subprocess strategy
pub struct GraphvizRenderer {
    dot_binary: String,
    format: String,
}

impl GraphvizRenderer {
    pub fn new(dot_binary: &str, format: &str) -> Self {
        Self {
            dot_binary: dot_binary.to_string(),
            format: format.to_string(),
        }
    }

    fn dot_source(graph: &WorkflowGraph) -> String {
        let mut out = String::new();
        out.push_str("digraph workflow {\n");
        out.push_str("  rankdir=TB;\n");
        out.push_str("  node [style=filled];\n");

        for node in graph.nodes() {
            let id = sanitize_id(&node.id);
            let label = node.name.replace('\\', "\\\\").replace('"', "\\\"");
            let attrs = match node.kind {
                NodeKind::Event => {
                    if node.has_start_name() {
                        "shape=ellipse, fillcolor=lightgreen"
                    } else {
                        "shape=ellipse, fillcolor=lightcoral"
                    }
                }
                NodeKind::Gateway => "shape=diamond, fillcolor=lightyellow",
                NodeKind::Task => "shape=box, fillcolor=lightblue",
            };
            out.push_str(&format!("  {} [label=\"{}\", {}];\n", id, label, attrs));
        }

        for (source, target) in graph.edges() {
            out.push_str(&format!(
                "  {} -> {};\n",
                sanitize_id(source),
                sanitize_id(target)
            ));
        }

        out.push_str("}\n");
        out
    }
}

#[async_trait]
impl DiagramRenderer for GraphvizRenderer {
    fn name(&self) -> &'static str {
        "graphviz"
    }

    async fn is_available(&self) -> bool {
        Command::new(&self.dot_binary)
            .arg("-V")
            .output()
            .await
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    async fn render(
        &self,
        graph: &WorkflowGraph,
        _layout: &DiagramLayout,
        output_base: &Path,
    ) -> Result<PathBuf, RenderError> {
        let dot_path = output_base.with_extension("dot");
        let output_path = output_base.with_extension(&self.format);

        tokio::fs::write(&dot_path, Self::dot_source(graph)).await?;

        let result = Command::new(&self.dot_binary)
            .arg(format!("-T{}", self.format))
            .arg("-o")
            .arg(&output_path)
            .arg(&dot_path)
            .kill_on_drop(true)
            .output()
            .await;

        // The intermediate dot file is scratch either way
        let _ = tokio::fs::remove_file(&dot_path).await;

        let output = result?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RenderError::Tool(format!(
                "dot exited with code {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            )));
        }

        Ok(output_path)
    }
}

/// Built-in SVG strategy; always available, draws straight from the layout
pub struct SvgRenderer;

impl SvgRenderer {
    fn svg_source(graph: &WorkflowGraph, layout: &DiagramLayout) -> Result<String, RenderError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        let extent = layout.extent();

        let width = format!("{}", extent.x);
        let height = format!("{}", extent.y);
        let mut svg = BytesStart::new("svg");
        svg.push_attribute(("xmlns", "http://www.w3.org/2000/svg"));
        svg.push_attribute(("width", width.as_str()));
        svg.push_attribute(("height", height.as_str()));
        write(&mut writer, Event::Start(svg))?;

        for edge in layout.edges() {
            let x1 = format!("{}", edge.waypoints[0].x);
            let y1 = format!("{}", edge.waypoints[0].y);
            let x2 = format!("{}", edge.waypoints[1].x);
            let y2 = format!("{}", edge.waypoints[1].y);
            let mut line = BytesStart::new("line");
            line.push_attribute(("x1", x1.as_str()));
            line.push_attribute(("y1", y1.as_str()));
            line.push_attribute(("x2", x2.as_str()));
            line.push_attribute(("y2", y2.as_str()));
            line.push_attribute(("stroke", "#444444"));
            write(&mut writer, Event::Empty(line))?;
        }

        for node in graph.nodes() {
            let Some(bounds) = layout.bounds(&node.id) else {
                continue;
            };

            match node.kind {
                NodeKind::Event => {
                    let cx = format!("{}", bounds.x + bounds.width / 2.0);
                    let cy = format!("{}", bounds.y + bounds.height / 2.0);
                    let r = format!("{}", bounds.width / 2.0);
                    let fill = if node.has_start_name() {
                        "lightgreen"
                    } else {
                        "lightcoral"
                    };
                    let mut circle = BytesStart::new("circle");
                    circle.push_attribute(("cx", cx.as_str()));
                    circle.push_attribute(("cy", cy.as_str()));
                    circle.push_attribute(("r", r.as_str()));
                    circle.push_attribute(("fill", fill));
                    circle.push_attribute(("stroke", "#444444"));
                    write(&mut writer, Event::Empty(circle))?;
                }
                NodeKind::Task | NodeKind::Gateway => {
                    let x = format!("{}", bounds.x);
                    let y = format!("{}", bounds.y);
                    let w = format!("{}", bounds.width);
                    let h = format!("{}", bounds.height);
                    let fill = if node.kind == NodeKind::Gateway {
                        "lightyellow"
                    } else {
                        "lightblue"
                    };
                    let mut rect = BytesStart::new("rect");
                    rect.push_attribute(("x", x.as_str()));
                    rect.push_attribute(("y", y.as_str()));
                    rect.push_attribute(("width", w.as_str()));
                    rect.push_attribute(("height", h.as_str()));
                    rect.push_attribute(("rx", "6"));
                    rect.push_attribute(("fill", fill));
                    rect.push_attribute(("stroke", "#444444"));
                    write(&mut writer, Event::Empty(rect))?;
                }
            }

            let tx = format!("{}", bounds.x + bounds.width / 2.0);
            let ty = format!("{}", bounds.y + bounds.height + 14.0);
            let mut text = BytesStart::new("text");
            text.push_attribute(("x", tx.as_str()));
            text.push_attribute(("y", ty.as_str()));
            text.push_attribute(("text-anchor", "middle"));
            text.push_attribute(("font-size", "12"));
            write(&mut writer, Event::Start(text))?;
            write(&mut writer, Event::Text(BytesText::new(&node.name)))?;
            write(&mut writer, Event::End(BytesEnd::new("text")))?;
        }

        write(&mut writer, Event::End(BytesEnd::new("svg")))?;

        String::from_utf8(writer.into_inner()).map_err(|e| RenderError::Output(e.to_string()))
    }
}

#[async_trait]
impl DiagramRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn render(
        &self,
        graph: &WorkflowGraph,
        layout: &DiagramLayout,
        output_base: &Path,
    ) -> Result<PathBuf, RenderError> {
        let output_path = output_base.with_extension("svg");
        let source = Self::svg_source(graph, layout)?;
        tokio::fs::write(&output_path, source).await?;
        Ok(output_path)
    }
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), RenderError> {
    writer
        .write_event(event)
        .map_err(|e| RenderError::Output(e.to_string()))
}
