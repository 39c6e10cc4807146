//! Heuristic domain gate restricting questions to patent topics.
//!
//! The gate is a rule-based binary classifier: a question is in-domain
//! when it contains any configured keyword (case-insensitive substring)
//! or matches any configured regex pattern. It is a pure function of the
//! question text and its configuration, and it is heuristic by nature:
//! legitimate patent phrasing can be rejected and incidental keyword
//! hits accepted. The keyword and pattern sets are configuration, not
//! code, so they can be tuned (or the whole gate swapped for a learned
//! classifier) without touching callers.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

/// Reply returned verbatim when a question is rejected by the gate.
pub const DEFAULT_REFUSAL: &str = "I'm a specialized Patent Assistant and can only answer \
    questions related to patents, intellectual property, or the patent application process. \
    Please ask a question related to these topics.";

/// Configuration for the [`DomainGate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Keywords matched as case-insensitive substrings.
    pub keywords: Vec<String>,
    /// Regex patterns matched against the lowercased question.
    pub patterns: Vec<String>,
    /// The fixed reply for rejected questions.
    pub refusal: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        let keywords = [
            "patent",
            "intellectual property",
            "ip",
            "invention",
            "inventor",
            "claim",
            "prior art",
            "novelty",
            "non-obvious",
            "utility",
            "provisional",
            "pct",
            "uspto",
            "epo",
            "wipo",
            "trademark",
            "copyright",
            "trade secret",
            "infringement",
            "licensing",
            "royalty",
            "assignee",
            "assignor",
            "filing",
            "examination",
            "prosecution",
            "office action",
            "rejection",
            "allowance",
            "grant",
            "issue",
            "maintenance",
            "term",
            "expiration",
            "invalidation",
            "reexamination",
            "continuation",
            "divisional",
            "cip",
            "rce",
            "ipr",
            "pgr",
            "interference",
            "opposition",
            "appeal",
            "litigation",
            "injunction",
            "damages",
        ];
        let patterns = [
            r"\b[a-z]{2}\d{6,}\b",     // patent number, e.g. us7654321
            r"\b\d{2}/\d{3},\d{3}\b",  // application number format
            r"\b35 u\.?s\.?c\.?\b",    // US patent statute reference
            r"\bpatentable\b",
            r"\binvent\w*\b",
        ];
        Self {
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            patterns: patterns.iter().map(|p| p.to_string()).collect(),
            refusal: DEFAULT_REFUSAL.to_string(),
        }
    }
}

/// Rule-based classifier deciding whether a question is in scope.
///
/// Stateless after construction; safe to share across concurrent
/// requests.
#[derive(Debug)]
pub struct DomainGate {
    keywords: Vec<String>,
    patterns: Vec<Regex>,
    refusal: String,
}

impl DomainGate {
    /// Compile a gate from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] when a pattern is not a valid regex.
    pub fn new(config: GateConfig) -> Result<Self> {
        let patterns = config
            .patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| RagError::Config(format!("invalid gate pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            patterns,
            refusal: config.refusal,
        })
    }

    /// Decide whether `question` is in the allowed domain.
    pub fn is_in_domain(&self, question: &str) -> bool {
        let lowered = question.to_lowercase();
        if self.keywords.iter().any(|k| lowered.contains(k.as_str())) {
            return true;
        }
        self.patterns.iter().any(|p| p.is_match(&lowered))
    }

    /// The fixed reply for rejected questions.
    pub fn refusal(&self) -> &str {
        &self.refusal
    }
}

impl Default for DomainGate {
    fn default() -> Self {
        // The default configuration compiles; the expect cannot trigger
        // outside of a broken edit to the pattern table above.
        Self::new(GateConfig::default()).expect("default gate configuration must compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_keyword_question() {
        let gate = DomainGate::default();
        assert!(gate.is_in_domain("What are the patent claims for US1234567?"));
        assert!(gate.is_in_domain("How do I license my INVENTION?"));
    }

    #[test]
    fn accepts_pattern_only_question() {
        let gate = DomainGate::default();
        assert!(gate.is_in_domain("Tell me about us7654321"));
        assert!(gate.is_in_domain("What does 35 U.S.C. say here?"));
    }

    #[test]
    fn rejects_unrelated_question() {
        let gate = DomainGate::default();
        assert!(!gate.is_in_domain("What's the weather today?"));
        assert!(!gate.is_in_domain("How tall is the Eiffel Tower?"));
    }

    #[test]
    fn substring_matching_over_triggers_on_embedded_keywords() {
        // Known limitation of the heuristic: "recipe" contains "ip".
        let gate = DomainGate::default();
        assert!(gate.is_in_domain("Best pasta recipe?"));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let gate = DomainGate::default();
        assert!(gate.is_in_domain("USPTO guidance?"));
        assert!(gate.is_in_domain("uspto guidance?"));
    }

    #[test]
    fn custom_keyword_list_changes_gating() {
        let config = GateConfig {
            keywords: vec!["weather".to_string()],
            patterns: Vec::new(),
            refusal: "out of scope".to_string(),
        };
        let gate = DomainGate::new(config).unwrap();
        assert!(gate.is_in_domain("What's the weather today?"));
        assert!(!gate.is_in_domain("What are the patent claims for US1234567?"));
        assert_eq!(gate.refusal(), "out of scope");
    }

    #[test]
    fn invalid_pattern_is_a_config_error() {
        let config = GateConfig {
            keywords: Vec::new(),
            patterns: vec!["(unclosed".to_string()],
            refusal: String::new(),
        };
        assert!(matches!(DomainGate::new(config), Err(RagError::Config(_))));
    }
}
