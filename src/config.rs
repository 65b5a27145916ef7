//! Scan configuration.
//!
//! Loaded from a JSON file with camelCase keys. Every field has a default, so
//! a partial file only overrides what it names:
//!
//! ```json
//! {
//!   "exclude": ["interchart", "scratch"],
//!   "overlap": { "threshold": 3.0 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::graph::{Edge, EdgeType, Node, NodeType};
use crate::overlap::OverlapConfig;

pub const DEFAULT_CONFIG_FILE: &str = "interchart.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeSpec {
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
}

impl EdgeSpec {
    pub fn new(target: impl Into<String>, edge_type: EdgeType) -> Self {
        Self {
            target: target.into(),
            edge_type,
        }
    }

    pub fn from_source(&self, source: &str) -> Edge {
        Edge::new(source, self.target.clone(), self.edge_type)
    }
}

/// A fixed component registered before anything is discovered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfraSpec {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    pub label: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edges: Vec<EdgeSpec>,
    /// Directory (relative to the scan root) whose absence marks the
    /// component as external: it keeps its node but loses path and edges.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_description: Option<String>,
}

impl InfraSpec {
    pub fn new(id: impl Into<String>, node_type: NodeType, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type,
            label: label.into(),
            description: String::new(),
            path: None,
            edges: Vec::new(),
            marker: None,
            missing_description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn edge(mut self, target: impl Into<String>, edge_type: EdgeType) -> Self {
        self.edges.push(EdgeSpec::new(target, edge_type));
        self
    }

    pub fn marker(mut self, marker: impl Into<String>, missing_description: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self.missing_description = Some(missing_description.into());
        self
    }

    pub fn to_node(&self) -> Node {
        Node::new(self.id.clone(), self.node_type, self.label.clone())
            .description(self.description.clone())
            .meta_opt("path", self.path.clone())
    }
}

/// How a description names the hub it accompanies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanionRule {
    /// Case-insensitive regex matched against the manifest description.
    pub pattern: String,
    /// Fixed target id. When unset, the first capture group (lowercased) is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl Default for CompanionRule {
    fn default() -> Self {
        Self {
            pattern: r"companion\s+plugin\s+for\s+([a-z0-9][a-z0-9_-]*)".into(),
            target: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanConfig {
    /// Directory holding one plugin per subdirectory, relative to the root.
    pub plugins_dir: PathBuf,
    /// Hub directories, relative to the root.
    pub hub_dirs: Vec<PathBuf>,
    /// Plugin directory names to skip.
    pub exclude: Vec<String>,
    pub infrastructure: Vec<InfraSpec>,
    /// Structural edges added from every hub.
    pub hub_edges: Vec<EdgeSpec>,
    /// Structural edges added from every plugin.
    pub plugin_edges: Vec<EdgeSpec>,
    pub companion: CompanionRule,
    pub overlap: OverlapConfig,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            plugins_dir: PathBuf::from("plugins"),
            hub_dirs: vec![PathBuf::from("hub").join("clavain")],
            exclude: vec!["interchart".into()],
            infrastructure: default_infrastructure(),
            hub_edges: vec![
                EdgeSpec::new("interverse", EdgeType::PartOf),
                EdgeSpec::new("intercore", EdgeType::DependsOn),
            ],
            plugin_edges: vec![EdgeSpec::new("interverse", EdgeType::PartOf)],
            companion: CompanionRule::default(),
            overlap: OverlapConfig::default(),
        }
    }
}

impl ScanConfig {
    /// Loads configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load(path: &Path) -> crate::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content).map_err(|e| {
            crate::Error::Config(format!("Invalid config {}: {}", path.display(), e))
        })
    }

    /// Configuration for a scan of `root`.
    ///
    /// An `explicit` path must exist. Without one, `root/interchart.json` is
    /// used when present and defaults otherwise.
    pub fn resolve(root: &Path, explicit: Option<&Path>) -> crate::Result<Self> {
        match explicit {
            Some(path) if !path.is_file() => Err(crate::Error::Config(format!(
                "config file not found: {}",
                path.display()
            ))),
            Some(path) => Self::load(path),
            None => Self::load(&root.join(DEFAULT_CONFIG_FILE)),
        }
    }

    pub fn from_json(content: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::Result<()> {
        if !self.overlap.threshold.is_finite() || self.overlap.threshold < 0.0 {
            return Err(crate::Error::Config(format!(
                "overlap.threshold must be a non-negative number, got {}",
                self.overlap.threshold
            )));
        }
        if self.overlap.min_shared_domains == 0 {
            return Err(crate::Error::Config(
                "overlap.minSharedDomains must be at least 1".into(),
            ));
        }
        if let Some(rule) = self.overlap.rules.iter().find(|r| !r.weight.is_finite()) {
            return Err(crate::Error::Config(format!(
                "overlap rule '{}' has a non-finite weight",
                rule.domain
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for infra in &self.infrastructure {
            if !seen.insert(infra.id.as_str()) {
                return Err(crate::Error::Config(format!(
                    "duplicate infrastructure id '{}'",
                    infra.id
                )));
            }
        }
        Ok(())
    }
}

pub fn default_infrastructure() -> Vec<InfraSpec> {
    vec![
        InfraSpec::new("interverse", NodeType::Monorepo, "Interverse")
            .description("Monorepo for the inter-module ecosystem"),
        InfraSpec::new("intercore", NodeType::Kernel, "Intercore")
            .description("Kernel — phases, gates, runs, dispatches, state machine")
            .path("infra/intercore")
            .edge("interverse", EdgeType::PartOf),
        InfraSpec::new("intermute-service", NodeType::Service, "Intermute")
            .description("Multi-agent coordination service (Go)")
            .path("services/intermute")
            .edge("interverse", EdgeType::PartOf),
        InfraSpec::new("interbase-sdk", NodeType::Sdk, "Interbase")
            .description("Shared integration SDK for dual-mode plugins")
            .path("sdk/interbase")
            .edge("interverse", EdgeType::PartOf),
        InfraSpec::new("autarch", NodeType::Tui, "Autarch")
            .description("TUI frontend — desktop application for the agent rig")
            .path("Interforge")
            .edge("interverse", EdgeType::PartOf)
            .edge("intercore", EdgeType::DependsOn)
            .marker("Interforge", "TUI frontend (external)"),
    ]
}
