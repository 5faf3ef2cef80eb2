//! BPMN 2.0 document writer
//!
//! Produces a `definitions` document with one `process` section and a
//! parallel `bpmndi` diagram section carrying the grid layout. Output is
//! fully deterministic for a given graph.

use crate::core::graph::{Node, NodeKind, WorkflowGraph};
use crate::diagram::layout::DiagramLayout;
use crate::diagram::DiagramError;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::path::{Path, PathBuf};

const BPMN_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";
const BPMNDI_NS: &str = "http://www.omg.org/spec/BPMN/20100524/DI";
const DC_NS: &str = "http://www.omg.org/spec/DD/20100524/DC";
const DI_NS: &str = "http://www.omg.org/spec/DD/20100524/DI";
const TARGET_NS: &str = "http://flowscribe.dev/workflows";

/// Canonical document file name for a workflow id
pub fn document_path(dir: &Path, workflow_id: &str) -> PathBuf {
    dir.join(format!("workflow_{}.bpmn", workflow_id))
}

/// Locate a previously persisted document, accepting the legacy `.xml`
/// extension used by earlier releases.
pub fn find_document(dir: &Path, workflow_id: &str) -> Option<PathBuf> {
    let bpmn = document_path(dir, workflow_id);
    if bpmn.exists() {
        return Some(bpmn);
    }
    let legacy = dir.join(format!("workflow_{}.xml", workflow_id));
    legacy.exists().then_some(legacy)
}

/// Serialize a normalized graph and its layout into BPMN XML
pub fn to_xml(
    graph: &WorkflowGraph,
    layout: &DiagramLayout,
    workflow_id: &str,
    name: &str,
    description: &str,
) -> Result<String, DiagramError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    write(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;

    let definitions_id = format!("definitions_{}", workflow_id);
    let mut definitions = BytesStart::new("definitions");
    definitions.push_attribute(("xmlns", BPMN_NS));
    definitions.push_attribute(("xmlns:bpmndi", BPMNDI_NS));
    definitions.push_attribute(("xmlns:dc", DC_NS));
    definitions.push_attribute(("xmlns:di", DI_NS));
    definitions.push_attribute(("id", definitions_id.as_str()));
    definitions.push_attribute(("targetNamespace", TARGET_NS));
    write(&mut writer, Event::Start(definitions))?;

    write_process(&mut writer, graph, layout, workflow_id, name, description)?;
    write_diagram(&mut writer, graph, layout, workflow_id)?;

    write(&mut writer, Event::End(BytesEnd::new("definitions")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| DiagramError::Xml(e.to_string()))
}

fn write_process(
    writer: &mut Writer<Vec<u8>>,
    graph: &WorkflowGraph,
    layout: &DiagramLayout,
    workflow_id: &str,
    name: &str,
    description: &str,
) -> Result<(), DiagramError> {
    let process_id = format!("process_{}", workflow_id);
    let mut process = BytesStart::new("process");
    process.push_attribute(("id", process_id.as_str()));
    process.push_attribute(("name", name));
    process.push_attribute(("isExecutable", "false"));
    write(writer, Event::Start(process))?;

    if !description.is_empty() {
        write_documentation(writer, description)?;
    }

    for node in graph.nodes() {
        let element = element_name(node);
        let mut start = BytesStart::new(element);
        start.push_attribute(("id", node.id.as_str()));
        start.push_attribute(("name", node.name.as_str()));

        if node.description.is_empty() {
            write(writer, Event::Empty(start))?;
        } else {
            write(writer, Event::Start(start))?;
            write_documentation(writer, &node.description)?;
            write(writer, Event::End(BytesEnd::new(element)))?;
        }
    }

    for edge in layout.edges() {
        let mut flow = BytesStart::new("sequenceFlow");
        flow.push_attribute(("id", edge.id.as_str()));
        flow.push_attribute(("sourceRef", edge.source.as_str()));
        flow.push_attribute(("targetRef", edge.target.as_str()));
        write(writer, Event::Empty(flow))?;
    }

    write(writer, Event::End(BytesEnd::new("process")))
}

fn write_diagram(
    writer: &mut Writer<Vec<u8>>,
    graph: &WorkflowGraph,
    layout: &DiagramLayout,
    workflow_id: &str,
) -> Result<(), DiagramError> {
    let diagram_id = format!("diagram_{}", workflow_id);
    let mut diagram = BytesStart::new("bpmndi:BPMNDiagram");
    diagram.push_attribute(("id", diagram_id.as_str()));
    write(writer, Event::Start(diagram))?;

    let plane_id = format!("plane_{}", workflow_id);
    let plane_element = format!("process_{}", workflow_id);
    let mut plane = BytesStart::new("bpmndi:BPMNPlane");
    plane.push_attribute(("id", plane_id.as_str()));
    plane.push_attribute(("bpmnElement", plane_element.as_str()));
    write(writer, Event::Start(plane))?;

    for node in graph.nodes() {
        // Every node was laid out, so the lookup cannot miss; a missing
        // bounds entry means the layout and graph disagree.
        let Some(bounds) = layout.bounds(&node.id) else {
            return Err(DiagramError::Xml(format!(
                "no layout bounds for node {}",
                node.id
            )));
        };

        let shape_id = format!("shape_{}", node.id);
        let mut shape = BytesStart::new("bpmndi:BPMNShape");
        shape.push_attribute(("id", shape_id.as_str()));
        shape.push_attribute(("bpmnElement", node.id.as_str()));
        write(writer, Event::Start(shape))?;

        let x = format_number(bounds.x);
        let y = format_number(bounds.y);
        let width = format_number(bounds.width);
        let height = format_number(bounds.height);
        let mut rect = BytesStart::new("dc:Bounds");
        rect.push_attribute(("x", x.as_str()));
        rect.push_attribute(("y", y.as_str()));
        rect.push_attribute(("width", width.as_str()));
        rect.push_attribute(("height", height.as_str()));
        write(writer, Event::Empty(rect))?;

        write(writer, Event::End(BytesEnd::new("bpmndi:BPMNShape")))?;
    }

    for edge in layout.edges() {
        let edge_id = format!("edge_{}", edge.id);
        let mut shape = BytesStart::new("bpmndi:BPMNEdge");
        shape.push_attribute(("id", edge_id.as_str()));
        shape.push_attribute(("bpmnElement", edge.id.as_str()));
        write(writer, Event::Start(shape))?;

        for point in &edge.waypoints {
            let x = format_number(point.x);
            let y = format_number(point.y);
            let mut waypoint = BytesStart::new("di:waypoint");
            waypoint.push_attribute(("x", x.as_str()));
            waypoint.push_attribute(("y", y.as_str()));
            write(writer, Event::Empty(waypoint))?;
        }

        write(writer, Event::End(BytesEnd::new("bpmndi:BPMNEdge")))?;
    }

    write(writer, Event::End(BytesEnd::new("bpmndi:BPMNPlane")))?;
    write(writer, Event::End(BytesEnd::new("bpmndi:BPMNDiagram")))
}

/// BPMN element name for a node. Events are split into start/end by the
/// same name sniff the normalizer classifies with.
fn element_name(node: &Node) -> &'static str {
    match node.kind {
        NodeKind::Task => "task",
        NodeKind::Gateway => "exclusiveGateway",
        NodeKind::Event => {
            if node.has_start_name() {
                "startEvent"
            } else {
                "endEvent"
            }
        }
    }
}

fn write_documentation(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), DiagramError> {
    write(writer, Event::Start(BytesStart::new("documentation")))?;
    write(writer, Event::Text(BytesText::new(text)))?;
    write(writer, Event::End(BytesEnd::new("documentation")))
}

fn write(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<(), DiagramError> {
    writer
        .write_event(event)
        .map_err(|e| DiagramError::Xml(e.to_string()))
}

fn format_number(value: f64) -> String {
    format!("{}", value)
}
