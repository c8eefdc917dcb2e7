//! Metrics collection
//!
//! Metric names and recording helpers. Metrics are no-ops until a recorder
//! is installed by the embedding process (e.g. a Prometheus exporter).

use std::time::Duration;

use metrics::{counter, histogram};

/// HTTP requests served, labeled by endpoint
pub const HTTP_REQUESTS_TOTAL: &str = "engagement_http_requests_total";
/// Classifications performed, labeled by resolved action
pub const CLASSIFICATIONS_TOTAL: &str = "engagement_classifications_total";
/// Database query durations in seconds, labeled by operation
pub const DB_QUERY_DURATION: &str = "engagement_db_query_duration_seconds";
/// Rows written by the bulk loader, labeled by table
pub const ROWS_LOADED_TOTAL: &str = "engagement_rows_loaded_total";

/// Record one served HTTP request
pub fn record_request(endpoint: &'static str) {
    counter!(HTTP_REQUESTS_TOTAL, "endpoint" => endpoint).increment(1);
}

/// Record one classification and its resolved action
pub fn record_classification(action: Option<&'static str>) {
    counter!(CLASSIFICATIONS_TOTAL, "action" => action.unwrap_or("none")).increment(1);
}

/// Record the duration of a database operation
pub fn record_db_query(operation: &'static str, duration: Duration) {
    histogram!(DB_QUERY_DURATION, "operation" => operation).record(duration.as_secs_f64());
}

/// Record rows written during a bulk load
pub fn record_rows_loaded(table: &'static str, rows: u64) {
    counter!(ROWS_LOADED_TOTAL, "table" => table).increment(rows);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        // No recorder installed in tests; calls must not panic.
        record_request("/physicians");
        record_classification(Some("reject"));
        record_classification(None);
        record_db_query("get_messages", Duration::from_millis(3));
        record_rows_loaded("physicians", 25);
    }
}
