//! Database schema definitions
//!
//! This module provides constants for table and column names used with rusqlite.

/// Physicians table schema
pub mod physicians {
    /// Table name
    pub const TABLE: &str = "physicians";
    /// Primary key column
    pub const PHYSICIAN_ID: &str = "physician_id";
    /// National Provider Identifier column
    pub const NPI: &str = "npi";
    /// First name column
    pub const FIRST_NAME: &str = "first_name";
    /// Last name column
    pub const LAST_NAME: &str = "last_name";
    /// Specialty column
    pub const SPECIALTY: &str = "specialty";
    /// State code column
    pub const STATE: &str = "state";
    /// Consent flag column
    pub const CONSENT_OPT_IN: &str = "consent_opt_in";
    /// Preferred contact channel column
    pub const PREFERRED_CHANNEL: &str = "preferred_channel";
}

/// Messages table schema
pub mod messages {
    /// Table name
    pub const TABLE: &str = "messages";
    /// Primary key column
    pub const MESSAGE_ID: &str = "message_id";
    /// Foreign reference to physicians column
    pub const PHYSICIAN_ID: &str = "physician_id";
    /// Delivery channel column
    pub const CHANNEL: &str = "channel";
    /// Direction column (inbound/outbound)
    pub const DIRECTION: &str = "direction";
    /// Timestamp column
    pub const TIMESTAMP: &str = "timestamp";
    /// Message text column
    pub const MESSAGE_TEXT: &str = "message_text";
    /// Campaign identifier column
    pub const CAMPAIGN_ID: &str = "campaign_id";
    /// Topic label column
    pub const TOPIC: &str = "topic";
    /// Compliance tag column
    pub const COMPLIANCE_TAG: &str = "compliance_tag";
    /// Sentiment label column
    pub const SENTIMENT: &str = "sentiment";
    /// Delivery status column
    pub const DELIVERY_STATUS: &str = "delivery_status";
    /// Response latency column (seconds, nullable)
    pub const RESPONSE_LATENCY_SEC: &str = "response_latency_sec";
}
