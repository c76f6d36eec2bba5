//! API layer - HTTP endpoint handlers.

mod health;
mod render;
mod routes;

// Re-export handlers and request payloads for library consumers
pub use health::{health, HealthResponse};
pub use render::{render_email_template, render_template, RenderEmailRequest, RenderRequest};
pub use routes::api_routes;
