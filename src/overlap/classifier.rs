use std::collections::BTreeMap;

use super::DomainRuleTable;
use crate::graph::Node;

/// Domain tag to weight, at most one entry per domain.
pub type DomainWeights = BTreeMap<String, f64>;

/// Lowercased id, label, description, `meta.path` and `meta.plugin`, in that order.
pub fn text_blob(node: &Node) -> String {
    let mut parts = vec![node.id.as_str(), node.label.as_str(), node.description.as_str()];
    parts.extend(node.meta_str("path"));
    parts.extend(node.meta_str("plugin"));
    parts.join(" ").to_lowercase()
}

impl DomainRuleTable {
    /// Tags `node` with every rule that has at least one matching pattern.
    pub fn classify(&self, node: &Node) -> DomainWeights {
        let blob = text_blob(node);
        let mut weights = DomainWeights::new();
        for rule in self.rules() {
            if rule.matches(&blob) {
                weights.entry(rule.domain.clone()).or_insert(rule.weight);
            }
        }
        weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeType;
    use crate::overlap::{DomainRuleSpec, builtin_rules};

    fn table() -> DomainRuleTable {
        DomainRuleTable::compile(&builtin_rules()).unwrap()
    }

    #[test]
    fn test_text_blob_order_and_case() {
        let node = Node::new("Interflux", NodeType::Plugin, "InterFlux")
            .description("Multi-Agent Review")
            .meta("path", "plugins/interflux")
            .meta("plugin", "owner");
        assert_eq!(
            text_blob(&node),
            "interflux interflux multi-agent review plugins/interflux owner"
        );
    }

    #[test]
    fn test_classify_single_domain() {
        let alpha = Node::new("alpha", NodeType::Plugin, "alpha")
            .description("analytics and telemetry dashboard");
        let beta = Node::new("beta", NodeType::Plugin, "beta")
            .description("quality review and audit tooling");

        let a = table().classify(&alpha);
        let b = table().classify(&beta);
        assert_eq!(a, DomainWeights::from([("analytics-observability".into(), 1.2)]));
        assert_eq!(b, DomainWeights::from([("quality-review".into(), 1.2)]));
    }

    #[test]
    fn test_multiple_pattern_hits_are_not_cumulative() {
        let node = Node::new("x", NodeType::Plugin, "x")
            .description("analytics telemetry metrics observability dashboard");
        let weights = table().classify(&node);
        assert_eq!(weights.get("analytics-observability"), Some(&1.2));
        assert_eq!(weights.len(), 1);
    }

    #[test]
    fn test_several_rules_tag_one_node() {
        let node = Node::new("intercore", NodeType::Kernel, "Intercore")
            .description("Kernel — phases, gates, runs, dispatches, state machine");
        let weights = table().classify(&node);
        assert!(weights.contains_key("phase-gates"));
        assert!(weights.contains_key("planning-orchestration"));
    }

    #[test]
    fn test_meta_fields_contribute() {
        let rules = DomainRuleTable::compile(&[DomainRuleSpec::new("owned", 0.5, ["^.*acme"])])
            .unwrap();
        let bare = Node::new("skill", NodeType::Skill, "skill");
        let owned = bare.clone().meta("plugin", "acme");
        assert!(rules.classify(&bare).is_empty());
        assert_eq!(rules.classify(&owned).get("owned"), Some(&0.5));
    }

    #[test]
    fn test_duplicate_domain_keeps_first_rule_weight() {
        let rules = DomainRuleTable::compile(&[
            DomainRuleSpec::new("dup", 0.7, ["foo"]),
            DomainRuleSpec::new("dup", 2.0, ["foo"]),
        ])
        .unwrap();
        let node = Node::new("foo", NodeType::Plugin, "foo");
        assert_eq!(rules.classify(&node).get("dup"), Some(&0.7));
    }
}
