use regex::{Regex, RegexBuilder};

use crate::config::CompanionRule;

/// Compiled [`CompanionRule`].
#[derive(Debug, Clone)]
pub struct CompanionMatcher {
    pattern: Regex,
    target: Option<String>,
}

impl CompanionMatcher {
    pub fn new(rule: &CompanionRule) -> crate::Result<Self> {
        let pattern = RegexBuilder::new(&rule.pattern)
            .case_insensitive(true)
            .build()
            .map_err(|source| crate::Error::Pattern {
                domain: "companion".into(),
                pattern: rule.pattern.clone(),
                source,
            })?;

        if rule.target.is_none() && pattern.captures_len() < 2 {
            return Err(crate::Error::Config(format!(
                "companion pattern '{}' needs a capture group or a fixed target",
                rule.pattern
            )));
        }

        Ok(Self {
            pattern,
            target: rule.target.clone(),
        })
    }

    /// The hub id a description declares itself a companion of, if any.
    pub fn target(&self, description: &str) -> Option<String> {
        let captures = self.pattern.captures(description)?;
        match &self.target {
            Some(target) => Some(target.clone()),
            None => captures.get(1).map(|m| m.as_str().to_lowercase()),
        }
    }
}
