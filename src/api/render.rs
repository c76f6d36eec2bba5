//! Template render endpoints.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::value::RawValue;

use crate::renderer::{self, RenderEmailResponse, RenderResponse};

/// Request payload for `POST /api/render`.
#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Template text to compile and execute.
    #[serde(default)]
    pub template: String,
    /// Raw JSON context payload, forwarded to the renderer untouched.
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

/// Request payload for `POST /api/render/email`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEmailRequest {
    #[serde(default)]
    pub subject_template: String,
    #[serde(default)]
    pub body_template: String,
    #[serde(default)]
    pub data: Option<Box<RawValue>>,
}

fn raw_data(data: &Option<Box<RawValue>>) -> &str {
    data.as_deref().map_or("", RawValue::get)
}

fn invalid_body_message(rejection: &JsonRejection) -> String {
    format!("Invalid request body: {}", rejection.body_text())
}

/// Render one template against a JSON payload.
///
/// Render failures still produce the response envelope, with a 400 status
/// and the error message in place of output.
#[tracing::instrument(name = "http.render", skip_all)]
pub async fn render_template(
    payload: Result<Json<RenderRequest>, JsonRejection>,
) -> (StatusCode, Json<RenderResponse>) {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            let response = RenderResponse {
                output: String::new(),
                error: Some(invalid_body_message(&rejection)),
                line: None,
                column: None,
            };
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    let response = renderer::render(&request.template, raw_data(&request.data));
    let status = if response.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (status, Json(response))
}

/// Render a subject/body template pair against one shared JSON payload.
#[tracing::instrument(name = "http.render_email", skip_all)]
pub async fn render_email_template(
    payload: Result<Json<RenderEmailRequest>, JsonRejection>,
) -> (StatusCode, Json<RenderEmailResponse>) {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => {
            let message = invalid_body_message(&rejection);
            let response = RenderEmailResponse {
                subject_error: Some(message.clone()),
                body_error: Some(message),
                ..Default::default()
            };
            return (StatusCode::BAD_REQUEST, Json(response));
        }
    };

    let response = renderer::render_email(
        &request.subject_template,
        &request.body_template,
        raw_data(&request.data),
    );
    let status = if response.is_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::OK
    };

    (status, Json(response))
}
