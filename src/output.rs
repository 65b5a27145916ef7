//! Serializable scan output.
//!
//! Description cleanup happens here and only here. The graph itself keeps
//! descriptions exactly as discovered, since overlap classification reads
//! them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::assembler::{AssembledGraph, OverlapEntry};
use crate::graph::{Edge, Node, NodeType};

pub const MAX_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub nodes: usize,
    pub edges: usize,
    pub overlaps: usize,
    pub by_type: BTreeMap<NodeType, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanOutput {
    pub generated: DateTime<Utc>,
    pub stats: ScanStats,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub overlaps: Vec<OverlapEntry>,
}

impl ScanOutput {
    pub fn new(graph: AssembledGraph) -> Self {
        Self::at(graph, Utc::now())
    }

    pub fn at(graph: AssembledGraph, generated: DateTime<Utc>) -> Self {
        let stats = ScanStats {
            nodes: graph.nodes.len(),
            edges: graph.edges.len(),
            overlaps: graph.overlaps.len(),
            by_type: graph.counts_by_type(),
        };
        let nodes = graph
            .nodes
            .into_iter()
            .map(|mut node| {
                node.description = clean_description(&node.description);
                node
            })
            .collect();

        Self {
            generated,
            stats,
            nodes,
            edges: graph.edges,
            overlaps: graph.overlaps,
        }
    }

    pub fn to_json(&self, pretty: bool) -> crate::Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// Collapses whitespace, strips one layer of surrounding quotes and
/// truncates to [`MAX_DESCRIPTION_CHARS`] with an ellipsis.
pub fn clean_description(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let unquoted = ['"', '\'']
        .iter()
        .find_map(|q| {
            collapsed
                .strip_prefix(*q)
                .and_then(|s| s.strip_suffix(*q))
        })
        .map(str::trim)
        .unwrap_or(collapsed.as_str());

    if unquoted.chars().count() <= MAX_DESCRIPTION_CHARS {
        return unquoted.to_string();
    }
    let mut truncated: String = unquoted.chars().take(MAX_DESCRIPTION_CHARS - 1).collect();
    truncated.truncate(truncated.trim_end().len());
    truncated.push('…');
    truncated
}
