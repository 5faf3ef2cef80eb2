//! Deterministic grid layout for workflow diagrams
//!
//! Positions depend only on node index: three nodes per row, fixed pitch.
//! Serializing the same graph twice must produce byte-identical geometry.

use crate::core::graph::{NodeKind, WorkflowGraph};
use std::collections::HashMap;

/// Nodes per grid row before wrapping
pub const NODES_PER_ROW: usize = 3;

/// Horizontal distance between cell origins
const H_PITCH: f64 = 180.0;
/// Vertical distance between cell origins
const V_PITCH: f64 = 140.0;
/// Top-left origin of the grid
const ORIGIN_X: f64 = 60.0;
const ORIGIN_Y: f64 = 60.0;

/// Event footprint (small square, BPMN convention)
const EVENT_SIZE: f64 = 36.0;
/// Task/gateway footprint
const TASK_WIDTH: f64 = 120.0;
const TASK_HEIGHT: f64 = 80.0;

/// A point in diagram coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding rectangle of one node shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Anchor for outgoing edges
    pub fn right_center(&self) -> Point {
        Point {
            x: self.x + self.width,
            y: self.y + self.height / 2.0,
        }
    }

    /// Anchor for incoming edges
    pub fn left_center(&self) -> Point {
        Point {
            x: self.x,
            y: self.y + self.height / 2.0,
        }
    }
}

/// A resolved sequence flow with its synthesized id and geometry
#[derive(Debug, Clone, PartialEq)]
pub struct FlowEdge {
    /// Synthesized flow id (`flow_<ordinal>`, 1-based, in edge order)
    pub id: String,
    pub source: String,
    pub target: String,
    /// Source right-center and target left-center anchors
    pub waypoints: [Point; 2],
}

/// Layout of a whole graph: one bounds entry per node, one edge per flow
#[derive(Debug, Clone)]
pub struct DiagramLayout {
    bounds: HashMap<String, Bounds>,
    edges: Vec<FlowEdge>,
}

impl DiagramLayout {
    /// Compute the layout for a graph
    pub fn of(graph: &WorkflowGraph) -> Self {
        let mut bounds = HashMap::new();

        for (index, node) in graph.nodes().iter().enumerate() {
            let column = index % NODES_PER_ROW;
            let row = index / NODES_PER_ROW;
            let cell_x = ORIGIN_X + column as f64 * H_PITCH;
            let cell_y = ORIGIN_Y + row as f64 * V_PITCH;

            let rect = match node.kind {
                // Events get a small square, centered in the cell
                NodeKind::Event => Bounds {
                    x: cell_x + (TASK_WIDTH - EVENT_SIZE) / 2.0,
                    y: cell_y + (TASK_HEIGHT - EVENT_SIZE) / 2.0,
                    width: EVENT_SIZE,
                    height: EVENT_SIZE,
                },
                NodeKind::Task | NodeKind::Gateway => Bounds {
                    x: cell_x,
                    y: cell_y,
                    width: TASK_WIDTH,
                    height: TASK_HEIGHT,
                },
            };
            bounds.insert(node.id.clone(), rect);
        }

        let edges = graph
            .edges()
            .iter()
            .enumerate()
            .map(|(index, (source, target))| FlowEdge {
                id: format!("flow_{}", index + 1),
                source: source.to_string(),
                target: target.to_string(),
                waypoints: [
                    bounds[*source].right_center(),
                    bounds[*target].left_center(),
                ],
            })
            .collect();

        Self { bounds, edges }
    }

    /// Bounds of a node shape
    pub fn bounds(&self, id: &str) -> Option<&Bounds> {
        self.bounds.get(id)
    }

    /// All flow edges, in graph edge order
    pub fn edges(&self) -> &[FlowEdge] {
        &self.edges
    }

    /// Overall diagram extent (for SVG canvas sizing)
    pub fn extent(&self) -> Point {
        let max_x = self
            .bounds
            .values()
            .map(|b| b.x + b.width)
            .fold(0.0, f64::max);
        let max_y = self
            .bounds
            .values()
            .map(|b| b.y + b.height)
            .fold(0.0, f64::max);
        Point {
            x: max_x + ORIGIN_X,
            y: max_y + ORIGIN_Y,
        }
    }
}
