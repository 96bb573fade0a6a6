use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::document::{RawLink, RawNode};
use crate::schema::{GraphEdge, GraphNode};

/// Post-processing applied to a joined edge table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphRepair {
    None,
    /// The renderer sometimes omits the focal node's own label, which leaves
    /// the first row with a blank target name and every later name binding
    /// one column off. Shift target names back into the source column.
    #[default]
    ShiftedTargetNames,
}

impl GraphRepair {
    pub fn apply(&self, edges: Vec<GraphEdge>) -> Vec<GraphEdge> {
        match self {
            GraphRepair::None => edges,
            GraphRepair::ShiftedTargetNames => shift_target_names(edges),
        }
    }
}

fn shift_target_names(mut edges: Vec<GraphEdge>) -> Vec<GraphEdge> {
    let Some(first) = edges.first() else {
        return edges;
    };
    if !first.target_name.trim().is_empty() {
        return edges;
    }

    let anchor = first.target_name.clone();
    let n = edges.len();
    // even tables: the second half carries the real rows; odd: all but the first
    let start = if n % 2 == 0 { n / 2 } else { 1 };

    debug!(rows = n, kept = n - start, "repairing shifted network names");

    for edge in &mut edges[start..] {
        edge.source_name = std::mem::take(&mut edge.target_name);
        edge.target_name = anchor.clone();
    }
    edges.split_off(start)
}

/// Display name with the renderer's leading glyph removed.
fn strip_glyph(raw: &str) -> String {
    let mut chars = raw.chars();
    chars.next();
    chars.as_str().to_string()
}

/// Rebuilds the relationship network of one company page.
#[derive(Debug, Clone, Default)]
pub struct NetworkReconstructor {
    repair: GraphRepair,
}

impl NetworkReconstructor {
    pub fn new(repair: GraphRepair) -> Self {
        Self { repair }
    }

    /// Node table keyed by id. The first element with a given id wins.
    pub fn node_table(&self, nodes: &[RawNode]) -> HashMap<String, GraphNode> {
        let mut table = HashMap::with_capacity(nodes.len());
        for node in nodes {
            table.entry(node.id.clone()).or_insert_with(|| GraphNode {
                node_id: node.id.clone(),
                display_name: strip_glyph(&node.raw_name),
                external_link: node.link.clone(),
            });
        }
        table
    }

    /// Join links with their descriptions and node names, then repair.
    pub fn reconstruct<F>(
        &self,
        nodes: &[RawNode],
        links: &[RawLink],
        describe: F,
        party_id: &str,
    ) -> Vec<GraphEdge>
    where
        F: Fn(&str, &str) -> Option<String>,
    {
        let table = self.node_table(nodes);
        let name_of = |id: &str| {
            table
                .get(id)
                .map(|node| node.display_name.clone())
                .unwrap_or_default()
        };

        let mut seen = HashSet::new();
        let edges: Vec<GraphEdge> = links
            .iter()
            .filter(|link| seen.insert((link.source_id.as_str(), link.target_id.as_str())))
            .map(|link| GraphEdge {
                party_id: party_id.to_string(),
                source_id: link.source_id.clone(),
                target_id: link.target_id.clone(),
                source_name: name_of(&link.source_id),
                target_name: name_of(&link.target_id),
                description: describe(&link.source_id, &link.target_id).unwrap_or_default(),
            })
            .collect();

        self.repair.apply(edges)
    }
}
