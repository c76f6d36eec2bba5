use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::health::health;
use super::render::{render_email_template, render_template};

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(health))
        // Render endpoints
        .route("/api/render", post(render_template))
        .route("/api/render/email", post(render_email_template))
}
