//! Compliance policy store
//!
//! Loads the ordered rule list from a JSON document at startup. A missing
//! or malformed document is a startup failure; rules are read-only for the
//! life of the process.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::{EngagementError, Result};
use crate::models::Rule;

/// On-disk shape of the policy document: `{"rules": [...]}`
#[derive(Debug, Deserialize)]
struct PolicyDocument {
    rules: Vec<Rule>,
}

/// Ordered, read-only set of compliance rules
#[derive(Debug, Clone)]
pub struct PolicyStore {
    rules: Vec<Rule>,
}

impl PolicyStore {
    /// Load and validate the policy document at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            EngagementError::Policy(format!("cannot read policy document {}: {e}", path.display()))
        })?;
        let document: PolicyDocument = serde_json::from_str(&raw).map_err(|e| {
            EngagementError::Policy(format!("malformed policy document {}: {e}", path.display()))
        })?;
        let store = Self::from_rules(document.rules)?;
        info!(rule_count = store.rules.len(), path = %path.display(), "Compliance policy loaded");
        Ok(store)
    }

    /// Build a store from already-parsed rules, validating each entry
    ///
    /// Rule order is preserved; it is the evaluation order of the
    /// classifier and the tie-break order for matched rules.
    pub fn from_rules(rules: Vec<Rule>) -> Result<Self> {
        for rule in &rules {
            if rule.name.trim().is_empty() {
                return Err(EngagementError::Policy(format!("rule {} has an empty name", rule.id)));
            }
            if rule.keywords_any.is_empty() {
                return Err(EngagementError::Policy(format!(
                    "rule {} ({}) has no trigger keywords",
                    rule.id, rule.name
                )));
            }
            if rule.keywords_any.iter().any(|k| k.trim().is_empty()) {
                return Err(EngagementError::Policy(format!(
                    "rule {} ({}) has an empty trigger keyword",
                    rule.id, rule.name
                )));
            }
            if rule.requires_append.as_deref().is_some_and(|a| a.trim().is_empty()) {
                return Err(EngagementError::Policy(format!(
                    "rule {} ({}) has an empty requires_append text",
                    rule.id, rule.name
                )));
            }
        }
        Ok(Self { rules })
    }

    /// The rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of loaded rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True when no rules are configured
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RuleAction;

    fn rule(id: i64, name: &str, keywords: &[&str]) -> Rule {
        Rule {
            id,
            name: name.to_string(),
            keywords_any: keywords.iter().map(ToString::to_string).collect(),
            action: None,
            requires_append: None,
        }
    }

    #[test]
    fn test_from_rules_accepts_valid_rules() {
        let store = PolicyStore::from_rules(vec![rule(1, "dosing", &["dosing", "titration"])])
            .expect("valid rules");
        assert_eq!(store.len(), 1);
        assert_eq!(store.rules()[0].name, "dosing");
    }

    #[test]
    fn test_from_rules_rejects_empty_keywords() {
        assert!(PolicyStore::from_rules(vec![rule(1, "dosing", &[])]).is_err());
        assert!(PolicyStore::from_rules(vec![rule(1, "dosing", &["dosing", " "])]).is_err());
    }

    #[test]
    fn test_from_rules_rejects_empty_name() {
        assert!(PolicyStore::from_rules(vec![rule(7, "", &["price"])]).is_err());
    }

    #[test]
    fn test_document_rejects_unknown_action() {
        let raw = r#"{"rules": [{"id": 1, "name": "x", "keywords_any": ["y"], "action": "escalate"}]}"#;
        assert!(serde_json::from_str::<PolicyDocument>(raw).is_err());
    }

    #[test]
    fn test_document_parses_actions_and_appends() {
        let raw = r#"{"rules": [
            {"id": 1, "name": "off-label", "keywords_any": ["off-label"], "action": "reject"},
            {"id": 2, "name": "dosing", "keywords_any": ["dosing"], "requires_append": "See PI for full safety info"}
        ]}"#;
        let document: PolicyDocument = serde_json::from_str(raw).expect("valid document");
        assert_eq!(document.rules[0].action, Some(RuleAction::Reject));
        assert_eq!(
            document.rules[1].requires_append.as_deref(),
            Some("See PI for full safety info")
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let missing = Path::new("does/not/exist/policies.json");
        assert!(PolicyStore::load(missing).is_err());
    }
}
