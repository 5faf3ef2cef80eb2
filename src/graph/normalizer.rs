//! Repair of raw step records into a well-formed workflow graph
//!
//! Extraction output is untrusted: ids collide, edges dangle, entry and exit
//! points are usually missing. `normalize` turns any batch of records into a
//! graph with at least one start, at least one end, and only resolvable
//! edges. It is a total function; bad input degrades, it never errors.

use crate::core::graph::{Node, NodeKind, WorkflowGraph};
use crate::core::record::StepRecord;
use std::collections::{HashSet, VecDeque};
use tracing::{debug, warn};

/// Normalize a batch of step records into a workflow graph.
///
/// Guarantees on the output:
/// - node ids are unique and non-empty,
/// - at least one start and one end node exist (synthesized when absent),
/// - every outgoing entry resolves to an existing node id,
/// - input ordering is preserved (synthesized start first, end last).
///
/// Unreachable nodes are repaired by attaching the first orphan, in input
/// order, to the first start node. Only that single edge is added per call;
/// reachability is not recomputed afterwards, so disjoint orphan clusters
/// may need another pass (each pass attaches at least one, so repeated
/// normalization converges).
pub fn normalize(records: Vec<StepRecord>) -> WorkflowGraph {
    if records.is_empty() {
        return minimal_graph();
    }

    let mut nodes = intake(records);

    // Start candidates: events nothing points at, or anything named like a
    // start. The name sniff is deliberate; it is part of the classification
    // contract, fragile as it is.
    let targeted: HashSet<String> = nodes
        .iter()
        .flat_map(|n| n.outgoing.iter().cloned())
        .collect();

    let mut start_ids: Vec<String> = nodes
        .iter()
        .filter(|n| {
            (n.kind == NodeKind::Event && !targeted.contains(&n.id)) || n.has_start_name()
        })
        .map(|n| n.id.clone())
        .collect();

    if start_ids.is_empty() {
        let first_id = nodes[0].id.clone();
        let id = unique_id("start", &nodes);
        debug!("no start candidate found; synthesizing start event '{}'", id);
        nodes.insert(
            0,
            Node {
                id: id.clone(),
                name: "Start".to_string(),
                description: "Process initiation".to_string(),
                kind: NodeKind::Event,
                outgoing: vec![first_id],
            },
        );
        start_ids.push(id);
    }

    // End candidates: events with nowhere to go, or anything named like an
    // end. When none exist, every non-event leaf is wired into a new one.
    let has_end = nodes
        .iter()
        .any(|n| (n.kind == NodeKind::Event && n.outgoing.is_empty()) || n.has_end_name());

    if !has_end {
        let id = unique_id("end", &nodes);
        debug!("no end candidate found; synthesizing end event '{}'", id);
        for node in nodes.iter_mut() {
            if node.kind != NodeKind::Event && node.outgoing.is_empty() {
                node.outgoing.push(id.clone());
            }
        }
        nodes.push(Node {
            id,
            name: "End".to_string(),
            description: "Process completion".to_string(),
            kind: NodeKind::Event,
            outgoing: vec![],
        });
    }

    // Drop edges pointing at ids that do not exist.
    let ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
    for node in nodes.iter_mut() {
        node.outgoing.retain(|target| {
            let resolves = ids.contains(target);
            if !resolves {
                debug!("pruning dangling edge {} -> {}", node.id, target);
            }
            resolves
        });
    }

    // Reachability from the start set. Iterative on purpose: input graphs
    // can be arbitrarily deep or cyclic, and the visited set handles cycles.
    let mut visited: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<String> = start_ids.iter().cloned().collect();
    while let Some(id) = queue.pop_front() {
        if !visited.insert(id.clone()) {
            continue;
        }
        if let Some(node) = nodes.iter().find(|n| n.id == id) {
            for target in &node.outgoing {
                if !visited.contains(target) {
                    queue.push_back(target.clone());
                }
            }
        }
    }

    // Orphan repair: attach the first unreachable node (input order) to the
    // first start node. One edge per pass, no reconfirmation sweep.
    let orphan = nodes
        .iter()
        .map(|n| n.id.clone())
        .find(|id| !visited.contains(id));
    if let Some(orphan_id) = orphan {
        let unreachable = nodes.iter().filter(|n| !visited.contains(&n.id)).count();
        warn!(
            "{} unreachable node(s); attaching '{}' to the first start node",
            unreachable, orphan_id
        );
        if let Some(start) = nodes.iter_mut().find(|n| start_ids.contains(&n.id)) {
            start.outgoing.push(orphan_id);
        }
    }

    WorkflowGraph::new(nodes)
}

/// The graph produced for empty input: a start event wired to an end event.
fn minimal_graph() -> WorkflowGraph {
    WorkflowGraph::new(vec![
        Node {
            id: "start".to_string(),
            name: "Start".to_string(),
            description: "Process initiation".to_string(),
            kind: NodeKind::Event,
            outgoing: vec!["end".to_string()],
        },
        Node {
            id: "end".to_string(),
            name: "End".to_string(),
            description: "Process completion".to_string(),
            kind: NodeKind::Event,
            outgoing: vec![],
        },
    ])
}

/// Convert records to nodes, repairing blank and colliding ids in input
/// order. Edges referencing a renamed duplicate keep pointing at its first
/// occurrence.
fn intake(records: Vec<StepRecord>) -> Vec<Node> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut nodes = Vec::with_capacity(records.len());

    for (index, record) in records.into_iter().enumerate() {
        let base = if record.id.trim().is_empty() {
            format!("step_{}", index + 1)
        } else {
            record.id
        };

        let id = if seen.contains(&base) {
            let mut counter = 2;
            let mut candidate = format!("{}_{}", base, counter);
            while seen.contains(&candidate) {
                counter += 1;
                candidate = format!("{}_{}", base, counter);
            }
            warn!("duplicate step id '{}' renamed to '{}'", base, candidate);
            candidate
        } else {
            base
        };

        seen.insert(id.clone());
        nodes.push(Node {
            id,
            name: record.name,
            description: record.description,
            kind: NodeKind::from_label(&record.kind),
            outgoing: record.next,
        });
    }

    nodes
}

fn unique_id(base: &str, nodes: &[Node]) -> String {
    if !nodes.iter().any(|n| n.id == base) {
        return base.to_string();
    }
    let mut counter = 2;
    loop {
        let candidate = format!("{}_{}", base, counter);
        if !nodes.iter().any(|n| n.id == candidate) {
            return candidate;
        }
        counter += 1;
    }
}
