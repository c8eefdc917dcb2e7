use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EngagementError, Result};

/// Validation utilities for query filters and loader input
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

/// Timestamp formats accepted by the date filters, tried in order
const DATETIME_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only formats accepted by the date filters, tried in order
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

impl InputValidator {
    /// Parse a `start_date` filter value
    ///
    /// Date-only input binds to the start of that day so the resulting
    /// window is inclusive.
    pub fn parse_start_bound(input: &str) -> Result<NaiveDateTime> {
        Self::parse_bound(input, NaiveTime::MIN)
    }

    /// Parse an `end_date` filter value
    ///
    /// Date-only input binds to the last second of that day so the
    /// resulting window is inclusive.
    pub fn parse_end_bound(input: &str) -> Result<NaiveDateTime> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        Self::parse_bound(input, end_of_day)
    }

    /// Parse flexible date/time text; `date_only_time` fills in the time
    /// component when the input carries no time of its own.
    fn parse_bound(input: &str, date_only_time: NaiveTime) -> Result<NaiveDateTime> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(EngagementError::InvalidDate(input.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(dt.naive_utc());
        }

        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
                return Ok(dt);
            }
        }

        for format in DATE_FORMATS {
            if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
                return Ok(date.and_time(date_only_time));
            }
        }

        Err(EngagementError::InvalidDate(input.to_string()))
    }

    /// Normalize a state filter or column value to its stored form
    #[must_use]
    pub fn normalize_state(state: &str) -> String {
        state.trim().to_uppercase()
    }

    /// Validate a two-letter state code
    pub fn validate_state(state: &str) -> Result<()> {
        let normalized = Self::normalize_state(state);
        if normalized.len() != 2 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(EngagementError::Other(format!(
                "Invalid state code: {state}. Expected a two-letter code"
            )));
        }
        Ok(())
    }

    /// Validate a National Provider Identifier (ten digits)
    pub fn validate_npi(npi: &str) -> Result<()> {
        if npi.len() != 10 || !npi.chars().all(|c| c.is_ascii_digit()) {
            return Err(EngagementError::Other(format!(
                "Invalid NPI: {npi}. Expected ten digits"
            )));
        }
        Ok(())
    }
}
