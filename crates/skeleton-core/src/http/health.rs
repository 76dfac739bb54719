use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::kernel::constants;

/// Set once the application has started, cleared when shutdown begins.
#[derive(Debug, Default)]
pub struct Readiness {
    ready: AtomicBool,
}

impl Readiness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::SeqCst);
    }

    pub fn mark_not_ready(&self) {
        self.ready.store(false, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }
}

#[derive(Clone)]
struct HealthState {
    app_name: Arc<str>,
    readiness: Arc<Readiness>,
}

/// `/health`, `/health/live` and `/health/ready`.
///
/// Readiness answers 503 until [`Readiness::mark_ready`] is called.
pub fn health_routes(app_name: &str, readiness: Arc<Readiness>) -> Router {
    let state = HealthState {
        app_name: Arc::from(app_name),
        readiness,
    };
    Router::new()
        .route("/health", get(health))
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .with_state(state)
}

async fn health(State(state): State<HealthState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "app": &*state.app_name,
        "version": constants::APP_VERSION,
        "ready": state.readiness.is_ready(),
    }))
}

async fn live() -> impl IntoResponse {
    Json(json!({ "status": "alive" }))
}

async fn ready(State(state): State<HealthState>) -> impl IntoResponse {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "not ready" })),
        )
    }
}
