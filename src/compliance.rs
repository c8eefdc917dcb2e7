//! Rule-based compliance classification
//!
//! A single pass over the policy rules: case-insensitive substring matching
//! against the message text, disclaimer accumulation, and fixed-priority
//! action resolution. Pure over its inputs; no storage or HTTP involved.

use crate::models::{Classification, MatchedRule, Rule, RuleAction};

/// Classify `text` against `rules` in store order.
///
/// A rule matches when any of its keywords occurs as a case-insensitive
/// substring of `text`. Matched rules are reported in store order. Each
/// matched rule's `requires_append` text is appended (space-separated)
/// unless it is already a substring of the text accumulated so far, so
/// disclaimers stack across rules but never duplicate. `action_required`
/// resolves by fixed priority (reject > flag > route_to_rep) regardless of
/// which rule matched first.
#[must_use]
pub fn classify(text: &str, rules: &[Rule]) -> Classification {
    let haystack = text.to_lowercase();

    let mut matched_rules = Vec::new();
    let mut actions = Vec::new();
    let mut modified = text.to_string();

    for rule in rules {
        let hit = rule
            .keywords_any
            .iter()
            .any(|keyword| haystack.contains(&keyword.to_lowercase()));
        if !hit {
            continue;
        }

        matched_rules.push(MatchedRule {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
        });

        if let Some(action) = rule.action {
            actions.push(action);
        }

        if let Some(append) = rule.requires_append.as_deref() {
            if !modified.contains(append) {
                modified.push(' ');
                modified.push_str(append);
            }
        }
    }

    let action_required = RuleAction::PRIORITY
        .into_iter()
        .find(|action| actions.contains(action));

    let modified_text = if modified == text { None } else { Some(modified) };

    Classification {
        matched_rules,
        action_required,
        modified_text,
    }
}
