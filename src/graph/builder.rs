use serde::Serialize;

use super::{Edge, EdgeRegistry, Node, NodeRegistry};

/// Owned aggregate of both registries plus the deferred-edge staging queue.
///
/// Edges whose endpoints may not exist yet are staged with
/// [`GraphBuilder::defer_edge`] and promoted by a single
/// [`GraphBuilder::resolve_deferred`] pass once the node set is final.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: NodeRegistry,
    edges: EdgeRegistry,
    deferred: Vec<Edge>,
}

/// A resolved graph: unique node ids, unique edge keys, nothing deferred.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: Node) -> bool {
        self.nodes.register(node)
    }

    pub fn add_edge(&mut self, edge: Edge) -> bool {
        self.edges.register(&self.nodes, edge)
    }

    /// Stages an edge without checking its endpoints.
    pub fn defer_edge(&mut self, edge: Edge) {
        self.deferred.push(edge);
    }

    pub fn pending_deferred(&self) -> usize {
        self.deferred.len()
    }

    /// Promotes every staged edge whose endpoints now exist and drops the rest.
    ///
    /// Returns the number of edges promoted. Promotion goes through the same
    /// key de-duplication as ordinary registration.
    pub fn resolve_deferred(&mut self) -> usize {
        let staged = std::mem::take(&mut self.deferred);
        let mut promoted = 0;
        for edge in staged {
            if !self.nodes.exists(&edge.source) || !self.nodes.exists(&edge.target) {
                tracing::debug!(
                    source = %edge.source,
                    target = %edge.target,
                    edge_type = %edge.edge_type,
                    "Dropping unresolved deferred edge"
                );
                continue;
            }
            if self.edges.register(&self.nodes, edge) {
                promoted += 1;
            }
        }
        promoted
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.exists(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn nodes(&self) -> &[Node] {
        self.nodes.all()
    }

    pub fn edges(&self) -> &[Edge] {
        self.edges.all()
    }

    /// Resolves anything still staged and hands over the final graph.
    pub fn finish(mut self) -> Graph {
        self.resolve_deferred();
        Graph {
            nodes: self.nodes.into_vec(),
            edges: self.edges.into_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeType, NodeType};

    fn plugin(id: &str) -> Node {
        Node::new(id, NodeType::Plugin, id)
    }

    #[test]
    fn test_registration_is_idempotent() {
        let mut once = GraphBuilder::new();
        once.add_node(plugin("a"));
        once.add_node(plugin("b"));
        once.add_edge(Edge::new("a", "b", EdgeType::DependsOn));

        let mut twice = GraphBuilder::new();
        for _ in 0..2 {
            twice.add_node(plugin("a"));
            twice.add_node(plugin("b"));
            twice.add_edge(Edge::new("a", "b", EdgeType::DependsOn));
        }

        assert_eq!(once.nodes(), twice.nodes());
        assert_eq!(once.edges(), twice.edges());
    }

    #[test]
    fn test_deferred_edge_resolves_when_target_arrives_later() {
        let mut builder = GraphBuilder::new();
        builder.add_node(plugin("interpeer"));
        builder.defer_edge(Edge::new("interpeer", "clavain", EdgeType::CompanionOf));
        builder.add_node(Node::new("clavain", NodeType::Hub, "clavain"));

        assert_eq!(builder.pending_deferred(), 1);
        assert_eq!(builder.resolve_deferred(), 1);
        assert_eq!(builder.pending_deferred(), 0);

        let graph = builder.finish();
        let companions: Vec<_> = graph
            .edges
            .iter()
            .filter(|e| e.edge_type == EdgeType::CompanionOf)
            .collect();
        assert_eq!(companions.len(), 1);
        assert_eq!(companions[0].target, "clavain");
    }

    #[test]
    fn test_unresolved_deferred_edge_is_dropped() {
        let mut builder = GraphBuilder::new();
        builder.add_node(plugin("interpeer"));
        builder.defer_edge(Edge::new("interpeer", "clavain", EdgeType::CompanionOf));

        assert_eq!(builder.resolve_deferred(), 0);
        let graph = builder.finish();
        assert!(graph.edges.is_empty());
    }

    #[test]
    fn test_deferred_duplicates_collapse() {
        let mut builder = GraphBuilder::new();
        builder.add_node(plugin("a"));
        builder.add_node(plugin("hub"));
        builder.add_edge(Edge::new("a", "hub", EdgeType::CompanionOf));
        builder.defer_edge(Edge::new("a", "hub", EdgeType::CompanionOf));
        builder.defer_edge(Edge::new("a", "hub", EdgeType::CompanionOf));

        assert_eq!(builder.resolve_deferred(), 0);
        assert_eq!(builder.edges().len(), 1);
    }

    #[test]
    fn test_finish_resolves_pending() {
        let mut builder = GraphBuilder::new();
        builder.defer_edge(Edge::new("a", "hub", EdgeType::CompanionOf));
        builder.add_node(plugin("a"));
        builder.add_node(plugin("hub"));

        let graph = builder.finish();
        assert_eq!(graph.edges.len(), 1);
    }
}
