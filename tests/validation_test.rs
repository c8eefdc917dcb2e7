//! Unit tests for validation.rs: filter-date parsing and loader checks.

use chrono::{NaiveDate, Timelike};
use engagement_api::validation::InputValidator;

#[test]
fn test_parse_start_bound_date_only_binds_to_day_start() {
    let parsed = InputValidator::parse_start_bound("2025-07-01").expect("parse");
    assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 7, 1).expect("date"));
    assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (0, 0, 0));
}

#[test]
fn test_parse_end_bound_date_only_binds_to_day_end() {
    let parsed = InputValidator::parse_end_bound("2025-07-31").expect("parse");
    assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 7, 31).expect("date"));
    assert_eq!((parsed.hour(), parsed.minute(), parsed.second()), (23, 59, 59));
}

#[test]
fn test_parse_bound_accepts_datetime_forms() {
    let iso_t = InputValidator::parse_start_bound("2025-07-25T07:14:32").expect("parse");
    assert_eq!((iso_t.hour(), iso_t.minute(), iso_t.second()), (7, 14, 32));

    let iso_space = InputValidator::parse_start_bound("2025-07-25 07:14:32").expect("parse");
    assert_eq!(iso_space, iso_t);

    let rfc3339 = InputValidator::parse_start_bound("2025-07-25T07:14:32Z").expect("parse");
    assert_eq!(rfc3339, iso_t);
}

#[test]
fn test_parse_bound_accepts_us_date_form() {
    let parsed = InputValidator::parse_start_bound("07/04/2025").expect("parse");
    assert_eq!(parsed.date(), NaiveDate::from_ymd_opt(2025, 7, 4).expect("date"));
}

#[test]
fn test_parse_bound_trims_whitespace() {
    assert!(InputValidator::parse_start_bound(" 2025-07-01 ").is_ok());
}

#[test]
fn test_parse_bound_rejects_garbage() {
    assert!(InputValidator::parse_start_bound("not-a-date").is_err());
    assert!(InputValidator::parse_start_bound("2025-13-40").is_err());
    assert!(InputValidator::parse_start_bound("").is_err());
    assert!(InputValidator::parse_end_bound("   ").is_err());
}

#[test]
fn test_normalize_state() {
    assert_eq!(InputValidator::normalize_state("ma"), "MA");
    assert_eq!(InputValidator::normalize_state(" tx "), "TX");
    assert_eq!(InputValidator::normalize_state("CA"), "CA");
}

#[test]
fn test_validate_state() {
    assert!(InputValidator::validate_state("MA").is_ok());
    assert!(InputValidator::validate_state("ma").is_ok());
    assert!(InputValidator::validate_state("Mass").is_err());
    assert!(InputValidator::validate_state("M1").is_err());
    assert!(InputValidator::validate_state("").is_err());
}

#[test]
fn test_validate_npi() {
    assert!(InputValidator::validate_npi("1089250953").is_ok());
    assert!(InputValidator::validate_npi("123").is_err());
    assert!(InputValidator::validate_npi("10892509531").is_err());
    assert!(InputValidator::validate_npi("10892509ab").is_err());
}
