//! Filesystem feed: turns a monorepo tree into component records.
//!
//! # Directory Structure
//!
//! ```text
//! <root>/
//! ├── plugins/
//! │   └── interflux/
//! │       ├── .claude-plugin/
//! │       │   └── plugin.json
//! │       ├── skills/
//! │       │   └── flux-drive/
//! │       │       └── SKILL.md
//! │       ├── agents/
//! │       │   └── fd-safety.md
//! │       └── hooks/
//! │           └── hooks.json
//! └── hub/
//!     └── clavain/
//!         └── .claude-plugin/
//!             └── plugin.json
//! ```
//!
//! A plugin whose manifest cannot be read contributes nothing; the scan
//! carries on with the rest.

mod companion;
mod error;
mod frontmatter;
mod hooks;
pub mod ids;
mod loader;
mod manifest;

pub use companion::CompanionMatcher;
pub use error::ScanError;
pub use frontmatter::{Frontmatter, parse_frontmatter};
pub use loader::ComponentKind;
pub use manifest::{McpServerEntry, PluginManifest};

use std::path::{Path, PathBuf};

use crate::assembler::{AssembledGraph, ComponentRecord, GraphAssembler};
use crate::config::ScanConfig;
use crate::overlap::OverlapScorer;
use loader::{ComponentLoader, subdirectories};

pub struct Scanner {
    root: PathBuf,
    config: ScanConfig,
    companion: CompanionMatcher,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>, config: ScanConfig) -> crate::Result<Self> {
        let companion = CompanionMatcher::new(&config.companion)?;
        Ok(Self {
            root: root.into(),
            config,
            companion,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Configured infrastructure as records.
    ///
    /// A component with a marker directory that does not exist under the
    /// root is kept as an external reference without path or edges.
    pub fn infrastructure(&self) -> Vec<ComponentRecord> {
        self.config
            .infrastructure
            .iter()
            .map(|spec| {
                let present = spec
                    .marker
                    .as_ref()
                    .is_none_or(|marker| self.root.join(marker).is_dir());
                if present {
                    spec.edges.iter().fold(ComponentRecord::new(spec.to_node()), |record, e| {
                        record.edge(e.from_source(&spec.id))
                    })
                } else {
                    tracing::warn!(
                        id = %spec.id,
                        marker = spec.marker.as_deref().unwrap_or_default(),
                        "Marker directory not found, adding as external reference"
                    );
                    let mut node = spec.to_node();
                    node.meta.clear();
                    if let Some(description) = &spec.missing_description {
                        node.description = description.clone();
                    }
                    ComponentRecord::new(node)
                }
            })
            .collect()
    }

    /// Every plugin directory (sorted, minus exclusions) followed by the hubs.
    pub fn components(&self) -> Vec<Result<ComponentRecord, ScanError>> {
        let loader = ComponentLoader {
            root: &self.root,
            companion: &self.companion,
            hub_edges: &self.config.hub_edges,
            plugin_edges: &self.config.plugin_edges,
        };
        let mut records = Vec::new();

        let plugins_dir = self.root.join(&self.config.plugins_dir);
        if !plugins_dir.is_dir() {
            tracing::warn!(path = %plugins_dir.display(), "Plugins directory not found");
        }
        for dir in subdirectories(&plugins_dir) {
            let excluded = dir
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.config.exclude.iter().any(|e| e == n));
            if excluded {
                tracing::debug!(path = %dir.display(), "Skipping excluded plugin");
                continue;
            }
            records.push(loader.load(&dir, ComponentKind::Plugin));
        }

        for hub_dir in &self.config.hub_dirs {
            let dir = self.root.join(hub_dir);
            if !dir.is_dir() {
                tracing::warn!(path = %dir.display(), "Hub directory not found");
                continue;
            }
            records.push(loader.load(&dir, ComponentKind::Hub));
        }

        records
    }

    /// Scans the tree with the configured overlap rules.
    pub fn scan(&self) -> crate::Result<AssembledGraph> {
        let scorer = OverlapScorer::new(&self.config.overlap)?;
        Ok(self.assemble_with(GraphAssembler::new(scorer)))
    }

    /// Feeds infrastructure and components into `assembler` and finishes it.
    pub fn assemble_with(&self, mut assembler: GraphAssembler) -> AssembledGraph {
        let _span = crate::observability::scan_span(&self.root).entered();
        assembler.register_infrastructure(self.infrastructure());
        let skipped = assembler.ingest_all(self.components());
        let graph = assembler.assemble();
        tracing::info!(
            root = %self.root.display(),
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            overlaps = graph.overlaps.len(),
            skipped,
            "Scan complete"
        );
        graph
    }
}
