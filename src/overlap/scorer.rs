use std::collections::BTreeSet;
use std::sync::LazyLock;

use serde_json::json;

use super::{DomainRuleTable, DomainWeights, ForcedOverlapGroup, OverlapConfig};
use crate::graph::{Edge, EdgeType, GraphBuilder, Meta, Node, NodeType};

/// Pairwise overlap evaluation. Pure; never persisted on its own.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapScore {
    pub qualifies: bool,
    /// `text + forced boost`, rounded to two decimals.
    pub total_score: f64,
    /// Shared text domains plus forced-group domains.
    pub domains: BTreeSet<String>,
    pub shared_domains: usize,
    pub forced_groups: usize,
}

impl OverlapScore {
    pub fn to_meta(&self) -> Meta {
        let mut meta = Meta::new();
        meta.insert("score".into(), json!(self.total_score));
        meta.insert("domains".into(), json!(self.domains));
        meta
    }
}

static BUILTIN_SCORER: LazyLock<OverlapScorer> = LazyLock::new(|| {
    OverlapScorer::new(&OverlapConfig::default()).expect("builtin domain rules compile")
});

#[derive(Debug, Clone)]
pub struct OverlapScorer {
    rules: DomainRuleTable,
    forced_groups: Vec<ForcedOverlapGroup>,
    eligible: BTreeSet<NodeType>,
    threshold: f64,
    min_shared_domains: usize,
}

impl OverlapScorer {
    pub fn new(config: &OverlapConfig) -> crate::Result<Self> {
        Ok(Self {
            rules: DomainRuleTable::compile(&config.rules)?,
            forced_groups: config.forced_groups.clone(),
            eligible: config.eligible_types.iter().copied().collect(),
            threshold: config.threshold,
            min_shared_domains: config.min_shared_domains,
        })
    }

    /// Scorer over the built-in rule table and forced groups, compiled once
    /// per process.
    pub fn builtin() -> Self {
        BUILTIN_SCORER.clone()
    }

    pub fn rules(&self) -> &DomainRuleTable {
        &self.rules
    }

    pub fn is_eligible(&self, node: &Node) -> bool {
        self.eligible.contains(&node.node_type)
    }

    pub fn classify(&self, node: &Node) -> DomainWeights {
        self.rules.classify(node)
    }

    pub fn score(&self, a: &Node, b: &Node) -> OverlapScore {
        self.score_classified(&a.id, &self.classify(a), &b.id, &self.classify(b))
    }

    /// Scores two already-classified nodes.
    pub fn score_classified(
        &self,
        a_id: &str,
        a: &DomainWeights,
        b_id: &str,
        b: &DomainWeights,
    ) -> OverlapScore {
        let mut domains = BTreeSet::new();
        let mut text_score = 0.0;
        for (domain, weight_a) in a {
            if let Some(weight_b) = b.get(domain) {
                // Weights are per rule, so both sides carry the same value today.
                text_score += weight_a.min(*weight_b);
                domains.insert(domain.clone());
            }
        }
        let shared_domains = domains.len();

        let mut forced_boost = 0.0;
        let mut forced_groups = 0;
        for group in &self.forced_groups {
            if group.contains_pair(a_id, b_id) {
                forced_boost += group.boost;
                forced_groups += 1;
                domains.insert(group.domain.clone());
            }
        }

        let total_score = round2(text_score + forced_boost);
        let qualifies = !domains.is_empty()
            && (forced_groups > 0
                || shared_domains >= self.min_shared_domains
                || total_score >= self.threshold);

        OverlapScore {
            qualifies,
            total_score,
            domains,
            shared_domains,
            forced_groups,
        }
    }

    /// Scores every unordered pair of eligible nodes once, in registration
    /// order, and registers an `overlaps-with` edge from the earlier node to
    /// the later one for each qualifying pair.
    ///
    /// Returns the number of overlap edges added.
    pub fn apply(&self, builder: &mut GraphBuilder) -> usize {
        let classified: Vec<(&str, DomainWeights)> = builder
            .nodes()
            .iter()
            .filter(|n| self.is_eligible(n))
            .map(|n| (n.id.as_str(), self.classify(n)))
            .collect();

        let mut overlaps = Vec::new();
        for (i, (a_id, a)) in classified.iter().enumerate() {
            for (b_id, b) in &classified[i + 1..] {
                let score = self.score_classified(a_id, a, b_id, b);
                if score.qualifies {
                    tracing::debug!(
                        source = %a_id,
                        target = %b_id,
                        score = score.total_score,
                        "Overlap detected"
                    );
                    overlaps.push(
                        Edge::new(*a_id, *b_id, EdgeType::OverlapsWith).with_meta(score.to_meta()),
                    );
                }
            }
        }

        overlaps
            .into_iter()
            .map(|edge| builder.add_edge(edge))
            .filter(|added| *added)
            .count()
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlap::DomainRuleSpec;

    fn plugin(id: &str, description: &str) -> Node {
        Node::new(id, NodeType::Plugin, id).description(description)
    }

    fn weights(entries: &[(&str, f64)]) -> DomainWeights {
        entries.iter().map(|(d, w)| (d.to_string(), *w)).collect()
    }

    fn scorer_without_groups() -> OverlapScorer {
        OverlapScorer::new(&OverlapConfig {
            forced_groups: Vec::new(),
            ..OverlapConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_single_shared_domain_below_threshold() {
        let scorer = scorer_without_groups();
        let a = weights(&[("analytics-observability", 1.2)]);
        let score = scorer.score_classified("a", &a, "b", &a.clone());

        assert_eq!(score.total_score, 1.2);
        assert_eq!(score.shared_domains, 1);
        assert!(!score.qualifies);
    }

    #[test]
    fn test_two_shared_domains_reach_threshold() {
        let scorer = scorer_without_groups();
        let a = weights(&[("analytics-observability", 1.2), ("quality-review", 1.2)]);
        let score = scorer.score_classified("a", &a, "b", &a.clone());

        assert_eq!(score.total_score, 2.4);
        assert_eq!(score.shared_domains, 2);
        assert!(score.qualifies);
    }

    #[test]
    fn test_single_heavy_domain_crosses_threshold() {
        let config = OverlapConfig {
            rules: vec![DomainRuleSpec::new("heavy", 2.5, ["heavy"])],
            forced_groups: Vec::new(),
            ..OverlapConfig::default()
        };
        let scorer = OverlapScorer::new(&config).unwrap();
        let score = scorer.score(&plugin("a", "heavy"), &plugin("b", "heavy"));

        assert_eq!(score.shared_domains, 1);
        assert!(score.qualifies);
    }

    #[test]
    fn test_min_of_weights_is_used() {
        let scorer = scorer_without_groups();
        let a = weights(&[("x", 1.5), ("y", 0.4)]);
        let b = weights(&[("x", 0.9), ("y", 2.0), ("z", 3.0)]);
        let score = scorer.score_classified("a", &a, "b", &b);

        assert_eq!(score.total_score, 1.3);
        assert_eq!(score.domains, BTreeSet::from(["x".to_string(), "y".to_string()]));
    }

    #[test]
    fn test_forced_group_qualifies_without_text() {
        let scorer = OverlapScorer::builtin();
        let score = scorer.score(
            &Node::new("clavain", NodeType::Hub, "clavain"),
            &Node::new("intercore", NodeType::Kernel, "intercore"),
        );

        assert!(score.qualifies);
        assert_eq!(score.forced_groups, 1);
        assert!(score.domains.contains("phase-gates"));
    }

    #[test]
    fn test_multiple_forced_groups_sum_boosts() {
        let config = OverlapConfig {
            rules: Vec::new(),
            forced_groups: vec![
                ForcedOverlapGroup::new("one", 0.25, ["a", "b"]),
                ForcedOverlapGroup::new("two", 0.5, ["a", "b", "c"]),
                ForcedOverlapGroup::new("three", 9.0, ["a", "c"]),
            ],
            ..OverlapConfig::default()
        };
        let scorer = OverlapScorer::new(&config).unwrap();
        let score = scorer.score(&plugin("a", ""), &plugin("b", ""));

        assert_eq!(score.total_score, 0.75);
        assert_eq!(score.forced_groups, 2);
        assert_eq!(
            score.domains,
            BTreeSet::from(["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_zero_domains_never_qualify() {
        let config = OverlapConfig {
            threshold: 0.0,
            forced_groups: Vec::new(),
            ..OverlapConfig::default()
        };
        let scorer = OverlapScorer::new(&config).unwrap();
        let score = scorer.score(&plugin("a", ""), &plugin("b", ""));

        assert_eq!(score.total_score, 0.0);
        assert!(!score.qualifies);
    }

    #[test]
    fn test_score_is_deterministic() {
        let scorer = OverlapScorer::builtin();
        let a = plugin("interflux", "Multi-agent review and research orchestration");
        let b = plugin("interpeer", "Cross-model review with research dispatch");
        assert_eq!(scorer.score(&a, &b), scorer.score(&a, &b));
    }

    #[test]
    fn test_builtin_matches_default_config() {
        let builtin = OverlapScorer::builtin();
        let configured = OverlapScorer::new(&OverlapConfig::default()).unwrap();
        assert_eq!(builtin.rules().len(), configured.rules().len());

        let a = plugin("a", "lint and review with tests");
        let b = plugin("b", "code review plus tdd");
        assert_eq!(builtin.score(&a, &b), configured.score(&a, &b));
    }

    #[test]
    fn test_rounding() {
        assert_eq!(round2(1.1 + 1.3), 2.4);
        assert_eq!(round2(0.1 + 0.2), 0.3);
        assert_eq!(round2(2.345_6), 2.35);
    }

    #[test]
    fn test_apply_stores_each_pair_once() {
        let scorer = OverlapScorer::builtin();
        let mut builder = GraphBuilder::new();
        builder.add_node(plugin("a", "code review and quality audits, test verification"));
        builder.add_node(plugin("b", "quality review with tests"));
        builder.add_node(
            Node::new("a:skill", NodeType::Skill, "skill").description("review quality tests"),
        );

        assert_eq!(scorer.apply(&mut builder), 1);
        // Second pass finds the same pairs and adds nothing.
        assert_eq!(scorer.apply(&mut builder), 0);

        let overlaps: Vec<_> = builder
            .edges()
            .iter()
            .filter(|e| e.edge_type == EdgeType::OverlapsWith)
            .collect();
        assert_eq!(overlaps.len(), 1);
        assert_eq!((overlaps[0].source.as_str(), overlaps[0].target.as_str()), ("a", "b"));

        let meta = overlaps[0].meta.as_ref().unwrap();
        assert_eq!(meta["score"], json!(2.2));
        assert_eq!(meta["domains"], json!(["quality-review", "testing-verification"]));
    }
}
