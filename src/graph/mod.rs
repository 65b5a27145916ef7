//! Graph data model and idempotent registries.
//!
//! Nodes are keyed by a globally unique id and kept in first-registration
//! order. Edges are keyed by `(source, target, type)`. Both registries treat
//! repeated registration as a silent no-op, which lets several discovery
//! paths report the same component without coordination.

mod builder;
mod registry;

pub use builder::{Graph, GraphBuilder};
pub use registry::{EdgeKey, EdgeRegistry, NodeRegistry};

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Open-ended node/edge metadata.
pub type Meta = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    Monorepo,
    Hub,
    Plugin,
    Skill,
    Agent,
    McpServer,
    HookEvent,
    Kernel,
    Service,
    Sdk,
    Tui,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Monorepo => "monorepo",
            Self::Hub => "hub",
            Self::Plugin => "plugin",
            Self::Skill => "skill",
            Self::Agent => "agent",
            Self::McpServer => "mcp-server",
            Self::HookEvent => "hook-event",
            Self::Kernel => "kernel",
            Self::Service => "service",
            Self::Sdk => "sdk",
            Self::Tui => "tui",
        }
    }

    /// Component-level types that take part in overlap scoring.
    pub fn is_component(&self) -> bool {
        matches!(
            self,
            Self::Hub | Self::Plugin | Self::Kernel | Self::Service | Self::Sdk | Self::Tui
        )
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeType {
    PartOf,
    DependsOn,
    ProvidesSkill,
    ProvidesAgent,
    ProvidesMcp,
    FiresHook,
    CompanionOf,
    OverlapsWith,
}

impl EdgeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PartOf => "part-of",
            Self::DependsOn => "depends-on",
            Self::ProvidesSkill => "provides-skill",
            Self::ProvidesAgent => "provides-agent",
            Self::ProvidesMcp => "provides-mcp",
            Self::FiresHook => "fires-hook",
            Self::CompanionOf => "companion-of",
            Self::OverlapsWith => "overlaps-with",
        }
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub meta: Meta,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            description: String::new(),
            meta: Meta::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn meta(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta.insert(key.into(), value.into());
        self
    }

    /// Like [`Node::meta`], skipping `None`.
    pub fn meta_opt<V: Into<Value>>(self, key: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(v) => self.meta(key, v),
            None => self,
        }
    }

    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta.get(key).and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            edge_type,
            meta: None,
        }
    }

    pub fn with_meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }

    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source, &self.target, self.edge_type)
    }
}
