//! Unit tests for the compliance classifier's contract.

use engagement_api::compliance::classify;
use engagement_api::models::{MatchedRule, Rule, RuleAction};
use proptest::prelude::*;

fn rule(id: i64, name: &str, keywords: &[&str]) -> Rule {
    Rule {
        id,
        name: name.to_string(),
        keywords_any: keywords.iter().map(ToString::to_string).collect(),
        action: None,
        requires_append: None,
    }
}

/// A small but representative policy set: appends, all three actions.
fn rules_fixture() -> Vec<Rule> {
    let mut dosing = rule(1, "dosing", &["dosing", "titration"]);
    dosing.requires_append = Some("See PI for full safety info".to_string());

    let mut off_label = rule(2, "off_label", &["off-label", "unapproved use"]);
    off_label.action = Some(RuleAction::Reject);

    let mut adverse = rule(3, "adverse_event", &["adverse event", "side effect"]);
    adverse.action = Some(RuleAction::Flag);

    let mut pricing = rule(4, "pricing", &["price", "rebate"]);
    pricing.action = Some(RuleAction::RouteToRep);

    vec![dosing, off_label, adverse, pricing]
}

#[test]
fn test_no_match_yields_null_everything() {
    let result = classify("Looking forward to the conference.", &rules_fixture());
    assert!(result.matched_rules.is_empty());
    assert_eq!(result.action_required, None);
    assert_eq!(result.modified_text, None);
}

#[test]
fn test_dosing_scenario() {
    let result = classify("Clarify dosing schedule and titration.", &rules_fixture());
    assert_eq!(
        result.matched_rules,
        vec![MatchedRule {
            rule_id: 1,
            rule_name: "dosing".to_string()
        }]
    );
    assert_eq!(result.action_required, None);
    assert_eq!(
        result.modified_text.as_deref(),
        Some("Clarify dosing schedule and titration. See PI for full safety info")
    );
}

#[test]
fn test_reject_beats_flag_when_both_match() {
    let result = classify(
        "Patient reported a side effect after unapproved use.",
        &rules_fixture(),
    );
    assert_eq!(result.action_required, Some(RuleAction::Reject));
}

#[test]
fn test_flag_beats_route_to_rep_when_both_match() {
    let result = classify("Asking about the price after a side effect.", &rules_fixture());
    assert_eq!(result.action_required, Some(RuleAction::Flag));
}

#[test]
fn test_append_already_present_is_not_duplicated() {
    let text = "Dosing question. See PI for full safety info";
    let result = classify(text, &rules_fixture());
    assert_eq!(result.matched_rules.len(), 1);
    assert_eq!(result.modified_text, None);
}

#[test]
fn test_matched_rule_order_follows_store_order() {
    // Text hits pricing (id 4), adverse (id 3), and dosing (id 1);
    // output order must be store order 1, 3, 4.
    let result = classify(
        "Rebate on dosing kits caused an adverse event.",
        &rules_fixture(),
    );
    let ids: Vec<i64> = result.matched_rules.iter().map(|m| m.rule_id).collect();
    assert_eq!(ids, vec![1, 3, 4]);
}

proptest! {
    #[test]
    fn classify_is_idempotent(text in ".{0,120}") {
        let rules = rules_fixture();
        let first = classify(&text, &rules);
        let second = classify(&text, &rules);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn matched_rules_equal_store_order_restricted_to_matches(text in "[a-z\\- ]{0,80}") {
        let rules = rules_fixture();
        let result = classify(&text, &rules);

        let haystack = text.to_lowercase();
        let expected: Vec<i64> = rules
            .iter()
            .filter(|r| r.keywords_any.iter().any(|k| haystack.contains(&k.to_lowercase())))
            .map(|r| r.id)
            .collect();

        let ids: Vec<i64> = result.matched_rules.iter().map(|m| m.rule_id).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn unmatched_text_is_never_modified(text in "[A-Za-z0-9 ]{0,60}") {
        let rules = rules_fixture();
        let result = classify(&text, &rules);
        if result.matched_rules.is_empty() {
            prop_assert_eq!(result.action_required, None);
            prop_assert_eq!(result.modified_text, None);
        }
    }
}
