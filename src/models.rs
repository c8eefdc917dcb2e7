//! Data models for physicians, messages, and compliance screening
//!
//! This module contains all data structures used throughout the application,
//! including database rows, query filters, policy rules, and classification
//! results.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Physician reference data
///
/// Immutable once loaded; replaced wholesale by the bulk loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Physician {
    /// Primary key
    pub physician_id: i64,
    /// National Provider Identifier (unique)
    pub npi: String,
    /// Physician's first name
    pub first_name: String,
    /// Physician's last name
    pub last_name: String,
    /// Medical specialty
    pub specialty: String,
    /// Two-letter state code, stored uppercase
    pub state: String,
    /// True if the physician opted in to outreach
    pub consent_opt_in: bool,
    /// Preferred contact channel (sms, email, ...)
    pub preferred_channel: String,
}

impl Physician {
    /// Display name used in denormalized message listings
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// An engagement message as stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Primary key
    pub message_id: i64,
    /// Foreign reference to the physician
    pub physician_id: i64,
    /// Delivery channel (sms, email, ...)
    pub channel: String,
    /// Message direction (inbound or outbound)
    pub direction: String,
    /// Timestamp when the message was sent or received
    pub timestamp: NaiveDateTime,
    /// Free message text
    pub message_text: String,
    /// Campaign identifier
    pub campaign_id: String,
    /// Pre-labeled topic
    pub topic: String,
    /// Pre-labeled compliance tag
    pub compliance_tag: String,
    /// Pre-labeled sentiment
    pub sentiment: String,
    /// Delivery status (delivered, failed, ...)
    pub delivery_status: String,
    /// Response latency in seconds; absent until a response is recorded
    pub response_latency_sec: Option<f64>,
}

/// A message enriched with its physician's display fields
///
/// Produced by the inner join in message listings; messages whose
/// physician_id has no physician row never appear as records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Primary key
    pub message_id: i64,
    /// Foreign reference to the physician
    pub physician_id: i64,
    /// Physician's full name
    pub physician_name: String,
    /// Physician's specialty
    pub specialty: String,
    /// Physician's state code
    pub state: String,
    /// Delivery channel
    pub channel: String,
    /// Message direction
    pub direction: String,
    /// Timestamp when the message was sent or received
    pub timestamp: NaiveDateTime,
    /// Free message text
    pub message_text: String,
    /// Campaign identifier
    pub campaign_id: String,
    /// Pre-labeled topic
    pub topic: String,
    /// Pre-labeled compliance tag
    pub compliance_tag: String,
    /// Pre-labeled sentiment
    pub sentiment: String,
    /// Delivery status
    pub delivery_status: String,
    /// Response latency in seconds
    pub response_latency_sec: Option<f64>,
}

/// Optional filters for message listings; all present filters AND-combine
#[derive(Debug, Default, Clone)]
pub struct MessageFilter {
    /// Restrict to a single physician
    pub physician_id: Option<i64>,
    /// Inclusive lower timestamp bound
    pub start: Option<NaiveDateTime>,
    /// Inclusive upper timestamp bound
    pub end: Option<NaiveDateTime>,
    /// Topic label equality
    pub topic: Option<String>,
    /// Sentiment label equality
    pub sentiment: Option<String>,
    /// Substring match on message text
    pub message_text: Option<String>,
    /// Physician specialty equality (via join)
    pub specialty: Option<String>,
    /// Physician state equality, case-insensitive (via join)
    pub state: Option<String>,
}

/// Minimum and maximum message dates across the whole table
///
/// Both fields are None when no messages are stored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MessageDateRange {
    /// Date of the oldest message
    pub min_date: Option<NaiveDate>,
    /// Date of the newest message
    pub max_date: Option<NaiveDate>,
}

/// Action a compliance rule can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleAction {
    /// Block the message outright
    Reject,
    /// Keep the message but mark it for review
    Flag,
    /// Hand the conversation to a field rep
    RouteToRep,
}

impl RuleAction {
    /// Fixed resolution priority when multiple matched rules carry actions
    pub const PRIORITY: [Self; 3] = [Self::Reject, Self::Flag, Self::RouteToRep];

    /// Wire representation of the action
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Flag => "flag",
            Self::RouteToRep => "route_to_rep",
        }
    }
}

/// A compliance policy rule
///
/// Rules are static configuration: loaded once at startup, read-only
/// thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    /// Rule identifier
    pub id: i64,
    /// Human-readable rule name
    pub name: String,
    /// Trigger keywords; any case-insensitive substring hit matches the rule
    pub keywords_any: Vec<String>,
    /// Action demanded when the rule matches
    #[serde(default)]
    pub action: Option<RuleAction>,
    /// Disclaimer text that must be appended when the rule matches
    #[serde(default)]
    pub requires_append: Option<String>,
}

/// A rule hit recorded during classification, in store order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedRule {
    /// Identifier of the matched rule
    pub rule_id: i64,
    /// Name of the matched rule
    pub rule_name: String,
}

/// Outcome of classifying one piece of text against the policy store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Rules that matched, in store order
    pub matched_rules: Vec<MatchedRule>,
    /// Resolved action, highest priority among matched rules' actions
    pub action_required: Option<RuleAction>,
    /// Text with required disclaimers appended; None when nothing was added
    pub modified_text: Option<String>,
}

/// Classification of a stored message, as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Identifier of the classified message
    pub message_id: i64,
    /// Original message text
    pub message_text: String,
    /// Rules that matched, in store order
    pub matched_rules: Vec<MatchedRule>,
    /// Resolved action, if any matched rule demanded one
    pub action_required: Option<RuleAction>,
    /// Text with required disclaimers appended; None when unchanged
    pub modified_text: Option<String>,
}

impl ClassificationResult {
    /// Attach a message id and its original text to a classification
    #[must_use]
    pub fn from_classification(message_id: i64, message_text: String, classification: Classification) -> Self {
        Self {
            message_id,
            message_text,
            matched_rules: classification.matched_rules,
            action_required: classification.action_required,
            modified_text: classification.modified_text,
        }
    }
}
