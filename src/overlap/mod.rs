//! Functional-overlap inference between components.
//!
//! Every component-level node is classified into weighted domain tags by
//! matching its text against an ordered [`DomainRuleTable`]. Two nodes
//! qualify as overlapping when any of the following hold:
//!
//! - both are members of a curated [`ForcedOverlapGroup`]
//! - they share at least `min_shared_domains` text domains
//! - their rounded total score reaches `threshold`
//!
//! A pair with no domains at all never qualifies.

mod classifier;
mod rules;
mod scorer;

pub use classifier::{DomainWeights, text_blob};
pub use rules::{
    DomainRule, DomainRuleSpec, DomainRuleTable, ForcedOverlapGroup, builtin_forced_groups,
    builtin_rules,
};
pub use scorer::{OverlapScore, OverlapScorer};

use serde::{Deserialize, Serialize};

use crate::graph::NodeType;

pub const DEFAULT_THRESHOLD: f64 = 2.4;
pub const DEFAULT_MIN_SHARED_DOMAINS: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OverlapConfig {
    pub threshold: f64,
    pub min_shared_domains: usize,
    pub eligible_types: Vec<NodeType>,
    pub rules: Vec<DomainRuleSpec>,
    pub forced_groups: Vec<ForcedOverlapGroup>,
}

impl Default for OverlapConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            min_shared_domains: DEFAULT_MIN_SHARED_DOMAINS,
            eligible_types: vec![
                NodeType::Hub,
                NodeType::Plugin,
                NodeType::Kernel,
                NodeType::Service,
                NodeType::Sdk,
                NodeType::Tui,
            ],
            rules: builtin_rules(),
            forced_groups: builtin_forced_groups(),
        }
    }
}
