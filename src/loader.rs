//! CSV bulk loading
//!
//! Reads `physicians.csv` and `messages.csv` with the fixed export schema
//! and replaces each table's contents wholesale. Intended to run with no
//! concurrent API traffic; each table swap happens inside one transaction.

use std::path::Path;

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::error::{EngagementError, Result};
use crate::logging::OperationTimer;
use crate::models::{Message, Physician};
use crate::validation::InputValidator;

/// One row of physicians.csv
#[derive(Debug, Deserialize)]
struct PhysicianCsvRow {
    physician_id: i64,
    npi: String,
    first_name: String,
    last_name: String,
    specialty: String,
    state: String,
    consent_opt_in: String,
    preferred_channel: String,
}

/// One row of messages.csv
#[derive(Debug, Deserialize)]
struct MessageCsvRow {
    message_id: i64,
    physician_id: i64,
    channel: String,
    direction: String,
    timestamp: String,
    message_text: String,
    campaign_id: String,
    topic: String,
    compliance_tag: String,
    sentiment: String,
    delivery_status: String,
    response_latency_sec: Option<f64>,
}

/// Boolean columns are exported as `True`/`False`
fn parse_csv_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Timestamps are exported as ISO with or without a `T` separator
fn parse_csv_timestamp(value: &str) -> Result<NaiveDateTime> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S%.f"))
        .map_err(|_| EngagementError::InvalidDate(value.to_string()))
}

/// Load physicians from CSV, replacing the table contents
pub fn load_physicians(db: &Database, path: &Path) -> Result<usize> {
    let timer = OperationTimer::new("load_physicians");
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: PhysicianCsvRow = record?;

        if InputValidator::validate_npi(&row.npi).is_err() {
            warn!(physician_id = row.physician_id, npi = %row.npi, "Physician has a malformed NPI");
        }
        if InputValidator::validate_state(&row.state).is_err() {
            warn!(physician_id = row.physician_id, state = %row.state, "Physician has a malformed state code");
        }

        rows.push(Physician {
            physician_id: row.physician_id,
            npi: row.npi,
            first_name: row.first_name,
            last_name: row.last_name,
            specialty: row.specialty,
            state: InputValidator::normalize_state(&row.state),
            consent_opt_in: parse_csv_bool(&row.consent_opt_in),
            preferred_channel: row.preferred_channel,
        });
    }

    let loaded = db.replace_physicians(&rows)?;
    timer.finish();
    info!(rows = loaded, path = %path.display(), "Loaded physicians");
    Ok(loaded)
}

/// Load messages from CSV, replacing the table contents
pub fn load_messages(db: &Database, path: &Path) -> Result<usize> {
    let timer = OperationTimer::new("load_messages");
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: MessageCsvRow = record?;

        rows.push(Message {
            message_id: row.message_id,
            physician_id: row.physician_id,
            channel: row.channel,
            direction: row.direction,
            timestamp: parse_csv_timestamp(&row.timestamp)?,
            message_text: row.message_text,
            campaign_id: row.campaign_id,
            topic: row.topic,
            compliance_tag: row.compliance_tag,
            sentiment: row.sentiment,
            delivery_status: row.delivery_status,
            response_latency_sec: row.response_latency_sec,
        });
    }

    let loaded = db.replace_messages(&rows)?;
    timer.finish();
    info!(rows = loaded, path = %path.display(), "Loaded messages");
    Ok(loaded)
}

/// Load both source files, physicians first
pub fn load_all(db: &Database, physicians_path: &Path, messages_path: &Path) -> Result<(usize, usize)> {
    let physicians = load_physicians(db, physicians_path)?;
    let messages = load_messages(db, messages_path)?;
    Ok((physicians, messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_bool() {
        assert!(parse_csv_bool("True"));
        assert!(parse_csv_bool("true"));
        assert!(parse_csv_bool("1"));
        assert!(!parse_csv_bool("False"));
        assert!(!parse_csv_bool(""));
    }

    #[test]
    fn test_parse_csv_timestamp() {
        assert!(parse_csv_timestamp("2025-07-25T07:14:32").is_ok());
        assert!(parse_csv_timestamp("2025-07-25 07:14:32").is_ok());
        assert!(parse_csv_timestamp("07/25/2025").is_err());
    }
}
