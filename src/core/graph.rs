//! Validated workflow graph model

use crate::core::record::StepRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Kind of a process node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A unit of work
    Task,
    /// A process boundary (start or end)
    Event,
    /// A branching point
    Gateway,
}

impl NodeKind {
    /// Map a free-form extracted label onto a node kind.
    ///
    /// Unknown labels become tasks; "decision" is accepted as an alias for
    /// gateway since models use both interchangeably.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "event" => NodeKind::Event,
            "gateway" | "decision" => NodeKind::Gateway,
            _ => NodeKind::Task,
        }
    }

    /// Canonical lowercase label for this kind
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Task => "task",
            NodeKind::Event => "event",
            NodeKind::Gateway => "gateway",
        }
    }
}

/// A validated process-graph vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique, non-empty, stable identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Optional longer description (empty string when absent)
    pub description: String,

    /// Node kind
    pub kind: NodeKind,

    /// Ordered outgoing edges; each entry resolves to an existing node id
    pub outgoing: Vec<String>,
}

impl Node {
    /// Whether the display name marks this node as a start ("start" substring,
    /// case-insensitive). Deliberately string-based; this is part of the
    /// classification contract, fragile as it is.
    pub fn has_start_name(&self) -> bool {
        self.name.to_lowercase().contains("start")
    }

    /// Whether the display name marks this node as an end
    pub fn has_end_name(&self) -> bool {
        self.name.to_lowercase().contains("end")
    }
}

/// An ordered sequence of nodes forming a normalized process graph.
///
/// The invariants documented on [`crate::graph::normalize`] hold for any
/// graph produced by normalization; this type itself does not re-verify them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    nodes: Vec<Node>,
}

impl WorkflowGraph {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look up a node by id
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Event nodes with no incoming edge
    pub fn start_nodes(&self) -> Vec<&Node> {
        let targeted = self.targeted_ids();
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Event && !targeted.contains(n.id.as_str()))
            .collect()
    }

    /// Event nodes with no outgoing edge
    pub fn end_nodes(&self) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Event && n.outgoing.is_empty())
            .collect()
    }

    /// All resolved edges as (source, target) pairs, in node order then
    /// outgoing order. This ordering drives flow-id synthesis, so it must
    /// stay deterministic.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.nodes
            .iter()
            .flat_map(|n| {
                n.outgoing
                    .iter()
                    .map(move |t| (n.id.as_str(), t.as_str()))
            })
            .collect()
    }

    /// Ids that appear as a target of some node's outgoing list
    pub fn targeted_ids(&self) -> HashSet<&str> {
        self.nodes
            .iter()
            .flat_map(|n| n.outgoing.iter().map(String::as_str))
            .collect()
    }

    /// Lower the graph back to step records, e.g. to feed it through
    /// normalization again.
    pub fn to_records(&self) -> Vec<StepRecord> {
        self.nodes
            .iter()
            .map(|n| {
                StepRecord::new(
                    &n.id,
                    &n.name,
                    &n.description,
                    n.kind.label(),
                    n.outgoing.iter().map(String::as_str).collect(),
                )
            })
            .collect()
    }
}
