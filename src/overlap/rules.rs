//! Domain rule table and curated forced-overlap groups.

use std::collections::BTreeSet;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Uncompiled rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainRuleSpec {
    pub domain: String,
    pub weight: f64,
    pub patterns: Vec<String>,
}

impl DomainRuleSpec {
    pub fn new(
        domain: impl Into<String>,
        weight: f64,
        patterns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            domain: domain.into(),
            weight,
            patterns: patterns.into_iter().map(Into::into).collect(),
        }
    }

    pub fn compile(&self) -> crate::Result<DomainRule> {
        let patterns = self
            .patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| crate::Error::Pattern {
                        domain: self.domain.clone(),
                        pattern: p.clone(),
                        source,
                    })
            })
            .collect::<crate::Result<Vec<_>>>()?;

        Ok(DomainRule {
            domain: self.domain.clone(),
            weight: self.weight,
            patterns,
        })
    }
}

#[derive(Debug, Clone)]
pub struct DomainRule {
    pub domain: String,
    pub weight: f64,
    patterns: Vec<Regex>,
}

impl DomainRule {
    /// True if any pattern matches. Extra matches do not add weight.
    pub fn matches(&self, text: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(text))
    }
}

/// Ordered, compiled rule list.
#[derive(Debug, Clone, Default)]
pub struct DomainRuleTable {
    rules: Vec<DomainRule>,
}

impl DomainRuleTable {
    pub fn compile(specs: &[DomainRuleSpec]) -> crate::Result<Self> {
        let rules = specs
            .iter()
            .map(DomainRuleSpec::compile)
            .collect::<crate::Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[DomainRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Curated set of component ids that always overlap with each other.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForcedOverlapGroup {
    pub domain: String,
    pub boost: f64,
    pub members: BTreeSet<String>,
}

impl ForcedOverlapGroup {
    pub fn new(
        domain: impl Into<String>,
        boost: f64,
        members: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            domain: domain.into(),
            boost,
            members: members.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains_pair(&self, a: &str, b: &str) -> bool {
        self.members.contains(a) && self.members.contains(b)
    }
}

pub fn builtin_rules() -> Vec<DomainRuleSpec> {
    vec![
        DomainRuleSpec::new(
            "phase-gates",
            1.3,
            [r"\bphases?\b", r"\bgates?\b", r"\bsprints?\b", r"state machine"],
        ),
        DomainRuleSpec::new(
            "analytics-observability",
            1.2,
            [r"analytics", r"telemetry", r"observab", r"dashboard", r"\bmetrics?\b"],
        ),
        DomainRuleSpec::new(
            "quality-review",
            1.2,
            [r"\breview", r"\bquality\b", r"\baudit", r"\blint"],
        ),
        DomainRuleSpec::new(
            "agent-coordination",
            1.1,
            [r"coordinat", r"multi-agent", r"\bmessag", r"\bmailbox", r"file locks?\b"],
        ),
        DomainRuleSpec::new(
            "planning-orchestration",
            1.1,
            [r"\bplan(s|ning)?\b", r"orchestrat", r"\bdispatch", r"\bworkflows?\b"],
        ),
        DomainRuleSpec::new(
            "security-guardrails",
            1.1,
            [r"\bsecurity\b", r"guardrail", r"\bsecrets?\b", r"\bsandbox"],
        ),
        DomainRuleSpec::new(
            "memory-context",
            1.0,
            [r"\bmemory\b", r"\bcontext\b", r"\brecall\b", r"knowledge"],
        ),
        DomainRuleSpec::new(
            "testing-verification",
            1.0,
            [r"\btests?\b", r"\btesting\b", r"\bverif", r"\btdd\b"],
        ),
        DomainRuleSpec::new(
            "token-efficiency",
            1.0,
            [r"\btokens?\b", r"compress", r"\bbudget"],
        ),
        DomainRuleSpec::new(
            "visualization",
            1.0,
            [r"visuali[sz]", r"\bdiagram", r"\bcharts?\b", r"\bgraph\b"],
        ),
        DomainRuleSpec::new(
            "research-docs",
            0.9,
            [r"\bresearch", r"documentation", r"\bdocs\b"],
        ),
        DomainRuleSpec::new(
            "git-workflow",
            0.9,
            [r"\bgit\b", r"\bcommits?\b", r"\bbranch", r"pull request"],
        ),
        DomainRuleSpec::new(
            "search-discovery",
            0.8,
            [r"\bsearch", r"\bdiscover", r"\bindex(ing)?\b"],
        ),
    ]
}

pub fn builtin_forced_groups() -> Vec<ForcedOverlapGroup> {
    vec![
        ForcedOverlapGroup::new("phase-gates", 1.0, ["clavain", "intercore"]),
        ForcedOverlapGroup::new(
            "agent-coordination",
            1.0,
            ["interlock", "intermute-service"],
        ),
    ]
}
