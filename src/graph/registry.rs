use std::collections::{HashMap, HashSet};

use super::{Edge, EdgeType, Node};

/// Insertion-ordered node store. The first registration of an id wins.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node, returning `false` when the id is already taken.
    ///
    /// A duplicate is ignored entirely: no metadata merge, no overwrite.
    pub fn register(&mut self, node: Node) -> bool {
        if self.index.contains_key(&node.id) {
            return false;
        }
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        true
    }

    pub fn exists(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// All nodes in first-registration order.
    pub fn all(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<Node> {
        self.nodes
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source: String,
    pub target: String,
    pub edge_type: EdgeType,
}

impl EdgeKey {
    pub fn new(source: &str, target: &str, edge_type: EdgeType) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            edge_type,
        }
    }
}

/// Edge store keyed by `(source, target, type)`.
#[derive(Debug, Default)]
pub struct EdgeRegistry {
    edges: Vec<Edge>,
    keys: HashSet<EdgeKey>,
}

impl EdgeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an edge against `nodes`.
    ///
    /// Returns `false` without recording anything when either endpoint is
    /// unknown or the key is already present.
    pub fn register(&mut self, nodes: &NodeRegistry, edge: Edge) -> bool {
        if !nodes.exists(&edge.source) || !nodes.exists(&edge.target) {
            return false;
        }
        if !self.keys.insert(edge.key()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    pub fn contains(&self, source: &str, target: &str, edge_type: EdgeType) -> bool {
        self.keys.contains(&EdgeKey::new(source, target, edge_type))
    }

    pub fn all(&self) -> &[Edge] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub(crate) fn into_vec(self) -> Vec<Edge> {
        self.edges
    }
}
