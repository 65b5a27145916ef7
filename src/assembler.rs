//! Graph assembly: infrastructure, component feed, overlap pass, resolution.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use crate::graph::{Edge, EdgeType, GraphBuilder, Node, NodeType};
use crate::overlap::OverlapScorer;

/// One component as delivered by the manifest feed.
///
/// `node` is registered first, then `children`, then `edges`. `deferred`
/// edges are staged until the whole node set is known.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    pub node: Node,
    pub children: Vec<Node>,
    pub edges: Vec<Edge>,
    pub deferred: Vec<Edge>,
}

impl ComponentRecord {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
            edges: Vec::new(),
            deferred: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.node.id
    }

    pub fn child(mut self, node: Node) -> Self {
        self.children.push(node);
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    pub fn deferred(mut self, edge: Edge) -> Self {
        self.deferred.push(edge);
        self
    }

    /// Registers `child` and an edge of `edge_type` from this component to it.
    pub fn provides(self, child: Node, edge_type: EdgeType) -> Self {
        let edge = Edge::new(self.node.id.clone(), child.id.clone(), edge_type);
        self.child(child).edge(edge)
    }
}

/// A single row of the overlap report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlapEntry {
    pub source: String,
    pub target: String,
    pub source_label: String,
    pub target_label: String,
    pub score: f64,
    pub domains: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssembledGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub overlaps: Vec<OverlapEntry>,
}

impl AssembledGraph {
    pub fn counts_by_type(&self) -> BTreeMap<NodeType, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            *counts.entry(node.node_type).or_insert(0) += 1;
        }
        counts
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edges_of_type(&self, edge_type: EdgeType) -> impl Iterator<Item = &Edge> {
        self.edges.iter().filter(move |e| e.edge_type == edge_type)
    }
}

/// Projects `overlaps-with` edges into the report, sorted by score
/// descending and then by source id ascending.
pub fn overlap_report(nodes: &[Node], edges: &[Edge]) -> Vec<OverlapEntry> {
    let label = |id: &str| {
        nodes
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.label.clone())
            .unwrap_or_else(|| id.to_string())
    };

    let mut entries: Vec<OverlapEntry> = edges
        .iter()
        .filter(|e| e.edge_type == EdgeType::OverlapsWith)
        .map(|e| {
            let meta = e.meta.as_ref();
            let score = meta
                .and_then(|m| m.get("score"))
                .and_then(serde_json::Value::as_f64)
                .unwrap_or(0.0);
            let domains = meta
                .and_then(|m| m.get("domains"))
                .and_then(serde_json::Value::as_array)
                .map(|a| {
                    a.iter()
                        .filter_map(|d| d.as_str().map(String::from))
                        .collect()
                })
                .unwrap_or_default();
            OverlapEntry {
                source: e.source.clone(),
                target: e.target.clone(),
                source_label: label(&e.source),
                target_label: label(&e.target),
                score,
                domains,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.source.cmp(&b.source))
    });
    entries
}

/// Owns the registries for one run.
///
/// ```
/// use interchart::{ComponentRecord, GraphAssembler, OverlapScorer};
/// use interchart::graph::{Node, NodeType};
///
/// let mut assembler = GraphAssembler::new(OverlapScorer::builtin());
/// assembler.ingest(ComponentRecord::new(
///     Node::new("alpha", NodeType::Plugin, "alpha").description("analytics dashboard"),
/// ));
/// let graph = assembler.assemble();
/// assert_eq!(graph.nodes.len(), 1);
/// assert!(graph.overlaps.is_empty());
/// ```
pub struct GraphAssembler {
    builder: GraphBuilder,
    scorer: Option<OverlapScorer>,
}

impl GraphAssembler {
    pub fn new(scorer: OverlapScorer) -> Self {
        Self {
            builder: GraphBuilder::new(),
            scorer: Some(scorer),
        }
    }

    /// Assembler that skips the overlap pass.
    pub fn without_overlaps() -> Self {
        Self {
            builder: GraphBuilder::new(),
            scorer: None,
        }
    }

    /// Registers fixed components unconditionally, before any feed record.
    pub fn register_infrastructure(&mut self, components: impl IntoIterator<Item = ComponentRecord>) {
        for component in components {
            self.ingest(component);
        }
    }

    pub fn ingest(&mut self, record: ComponentRecord) {
        let ComponentRecord {
            node,
            children,
            edges,
            deferred,
        } = record;

        self.builder.add_node(node);
        for child in children {
            self.builder.add_node(child);
        }
        for edge in edges {
            self.builder.add_edge(edge);
        }
        for edge in deferred {
            self.builder.defer_edge(edge);
        }
    }

    /// Consumes a fallible feed. A failed record contributes nothing and the
    /// run continues with the rest.
    pub fn ingest_all<I, E>(&mut self, feed: I) -> usize
    where
        I: IntoIterator<Item = Result<ComponentRecord, E>>,
        E: Display,
    {
        let mut skipped = 0;
        for item in feed {
            match item {
                Ok(record) => self.ingest(record),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping component");
                    skipped += 1;
                }
            }
        }
        skipped
    }

    pub fn builder(&self) -> &GraphBuilder {
        &self.builder
    }

    /// Runs the overlap pass, resolves deferred edges and builds the report.
    pub fn assemble(mut self) -> AssembledGraph {
        if let Some(scorer) = &self.scorer {
            let added = scorer.apply(&mut self.builder);
            tracing::debug!(overlaps = added, "Overlap pass complete");
        }

        let pending = self.builder.pending_deferred();
        let promoted = self.builder.resolve_deferred();
        if pending > promoted {
            tracing::debug!(
                pending,
                promoted,
                "Some deferred edges were dropped or already present"
            );
        }

        let graph = self.builder.finish();
        let overlaps = overlap_report(&graph.nodes, &graph.edges);
        AssembledGraph {
            nodes: graph.nodes,
            edges: graph.edges,
            overlaps,
        }
    }
}
