//! # interchart
//!
//! Builds a dependency and functional-overlap graph for a Claude plugin
//! ecosystem: plugins, skills, agents, MCP servers, hook events and the
//! infrastructure they sit on.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use interchart::{ScanConfig, ScanOutput, Scanner};
//!
//! fn main() -> Result<(), interchart::Error> {
//!     let config = ScanConfig::load(Path::new("interverse/interchart.json"))?;
//!     let graph = Scanner::new("interverse", config)?.scan()?;
//!     for overlap in &graph.overlaps {
//!         println!("{} <-> {} ({})", overlap.source, overlap.target, overlap.score);
//!     }
//!     println!("{}", ScanOutput::new(graph).to_json(true)?);
//!     Ok(())
//! }
//! ```
//!
//! ## Assembling Without a Filesystem
//!
//! ```rust
//! use interchart::{ComponentRecord, GraphAssembler, OverlapScorer};
//! use interchart::graph::{Node, NodeType};
//!
//! let mut assembler = GraphAssembler::new(OverlapScorer::builtin());
//! assembler.ingest(ComponentRecord::new(
//!     Node::new("alpha", NodeType::Plugin, "alpha").description("lint and review, tests"),
//! ));
//! assembler.ingest(ComponentRecord::new(
//!     Node::new("beta", NodeType::Plugin, "beta").description("code review with tdd"),
//! ));
//! let graph = assembler.assemble();
//! assert_eq!(graph.overlaps.len(), 1);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod assembler;
pub mod config;
pub mod graph;
pub mod observability;
pub mod output;
pub mod overlap;
pub mod scan;

pub use assembler::{AssembledGraph, ComponentRecord, GraphAssembler, OverlapEntry, overlap_report};
pub use config::{CompanionRule, EdgeSpec, InfraSpec, ScanConfig};
pub use graph::{Edge, EdgeType, Graph, GraphBuilder, Node, NodeType};
pub use observability::{TracingConfig, TracingLevel, init_tracing};
pub use output::{ScanOutput, ScanStats};
pub use overlap::{
    DomainRule, DomainRuleSpec, DomainRuleTable, ForcedOverlapGroup, OverlapConfig, OverlapScore,
    OverlapScorer,
};
pub use scan::{ScanError, Scanner};

/// Error type for interchart operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A domain or companion pattern failed to compile.
    #[error("Invalid pattern '{pattern}' for {domain}: {source}")]
    Pattern {
        domain: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// File system operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Config(_) | Error::Pattern { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Scans `root` with `config` and returns the assembled graph.
pub fn scan_tree(root: impl Into<std::path::PathBuf>, config: ScanConfig) -> Result<AssembledGraph> {
    Scanner::new(root, config)?.scan()
}
