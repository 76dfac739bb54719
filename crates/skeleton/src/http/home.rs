use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use skeleton_core::kernel::constants::APP_VERSION;

/// `GET /` welcome message.
pub fn home_routes(app_name: &str) -> Router {
    let message = format!("Welcome to {app_name}!");
    Router::new().route(
        "/",
        get(move || async move {
            Json(json!({
                "message": message,
                "version": APP_VERSION,
            }))
        }),
    )
}
