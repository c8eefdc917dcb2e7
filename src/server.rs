//! HTTP API surface
//!
//! Stateless axum handlers over a shared, read-mostly application state:
//! the database handle and the compliance policy store, both constructed at
//! startup and injected here. Each request performs at most one database
//! call and one classification.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::compliance::classify;
use crate::config::ServerConfig;
use crate::db::Database;
use crate::error::{ApiError, EngagementError};
use crate::metrics;
use crate::models::{
    ClassificationResult, MessageDateRange, MessageFilter, MessageRecord, Physician, RuleAction,
};
use crate::policy::PolicyStore;
use crate::validation::InputValidator;

/// Shared state injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub policies: Arc<PolicyStore>,
}

impl AppState {
    pub fn new(db: Database, policies: PolicyStore) -> Self {
        Self {
            db: Arc::new(db),
            policies: Arc::new(policies),
        }
    }
}

/// Query parameters for `GET /physicians`
#[derive(Debug, Default, Deserialize)]
pub struct PhysicianQuery {
    pub state: Option<String>,
    pub specialty: Option<String>,
}

/// Query parameters for `GET /messages`
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub physician_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub topic: Option<String>,
    pub sentiment: Option<String>,
    pub message_text: Option<String>,
    pub specialty: Option<String>,
    pub state: Option<String>,
}

/// Treat empty query values the same as absent ones
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// GET / returns service identity and version
async fn root() -> Json<serde_json::Value> {
    metrics::record_request("/");
    Json(json!({
        "message": "Physician Engagement Reporting API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// GET /physicians - list physicians with optional state/specialty filters
async fn get_physicians(
    State(state): State<AppState>,
    Query(query): Query<PhysicianQuery>,
) -> Result<Json<Vec<Physician>>, ApiError> {
    metrics::record_request("/physicians");
    let state_filter = non_empty(query.state);
    let specialty_filter = non_empty(query.specialty);
    let physicians = state
        .db
        .get_physicians(state_filter.as_deref(), specialty_filter.as_deref())?;
    Ok(Json(physicians))
}

/// GET /messages/date-range - min/max message dates for the date picker
async fn get_date_range(State(state): State<AppState>) -> Result<Json<MessageDateRange>, ApiError> {
    metrics::record_request("/messages/date-range");
    Ok(Json(state.db.message_date_range()?))
}

/// GET /messages - denormalized message listing, newest first
async fn get_messages(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageRecord>>, ApiError> {
    metrics::record_request("/messages");

    let mut filter = MessageFilter {
        physician_id: query.physician_id,
        topic: non_empty(query.topic),
        sentiment: non_empty(query.sentiment),
        message_text: non_empty(query.message_text),
        specialty: non_empty(query.specialty),
        state: non_empty(query.state),
        ..MessageFilter::default()
    };

    if let Some(raw) = non_empty(query.start_date) {
        filter.start = Some(InputValidator::parse_start_bound(&raw)?);
    }
    if let Some(raw) = non_empty(query.end_date) {
        filter.end = Some(InputValidator::parse_end_bound(&raw)?);
    }

    Ok(Json(state.db.get_messages(&filter)?))
}

/// POST /classify/:message_id - classify a stored message's text
async fn classify_message(
    State(state): State<AppState>,
    Path(message_id): Path<i64>,
) -> Result<Json<ClassificationResult>, ApiError> {
    metrics::record_request("/classify");

    let message = state
        .db
        .get_message_by_id(message_id)?
        .ok_or(EngagementError::MessageNotFound(message_id))?;

    let classification = classify(&message.message_text, state.policies.rules());
    metrics::record_classification(classification.action_required.map(RuleAction::as_str));

    Ok(Json(ClassificationResult::from_classification(
        message_id,
        message.message_text,
        classification,
    )))
}

/// CORS layer for the dashboard frontend origins
fn cors_layer(origins: &[String]) -> CorsLayer {
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Build and return the full router
pub fn build_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/physicians", get(get_physicians))
        .route("/messages/date-range", get(get_date_range))
        .route("/messages", get(get_messages))
        .route("/classify/:message_id", post(classify_message))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the API server; binds to `config.host:config.port`.
///
/// Blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state, &config.cors_origins);

    let bind_addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {bind_addr}"))?;
    info!("engagement api listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server exited")?;
    info!("server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutdown signal received, draining connections");
}
