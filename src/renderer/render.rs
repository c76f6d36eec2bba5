//! Render orchestration for single templates and subject/body pairs.

use serde::Serialize;

use super::context::resolve_context;
use super::engine;
use super::position::extract_position;

/// Engine-facing name for the single-template mode.
const TEMPLATE_NAME: &str = "template";
/// Engine-facing names for the email mode.
const SUBJECT_NAME: &str = "subject";
const BODY_NAME: &str = "body";

/// Outcome of a single-template render.
///
/// Exactly one of `output` or `error` is meaningful; `line` and `column`
/// are only set when the error message carries a source position.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderResponse {
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl RenderResponse {
    fn success(output: String) -> Self {
        RenderResponse { output, error: None, line: None, column: None }
    }

    /// Failure carrying whatever position its message exposes.
    fn failure(message: String) -> Self {
        let position = extract_position(&message);
        RenderResponse {
            output: String::new(),
            error: Some(message),
            line: (position.line > 0).then_some(position.line),
            column: position.column.filter(|&c| c > 0),
        }
    }

    /// Failure with no position, for errors outside the template text.
    fn data_failure(message: String) -> Self {
        RenderResponse { output: String::new(), error: Some(message), line: None, column: None }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Outcome of a subject/body render; the two channels fail independently.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEmailResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_column: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_column: Option<u32>,
}

impl RenderEmailResponse {
    fn set_subject_failure(&mut self, message: String) {
        let position = extract_position(&message);
        self.subject_error = Some(message);
        self.subject_line = (position.line > 0).then_some(position.line);
        self.subject_column = position.column.filter(|&c| c > 0);
    }

    fn set_body_failure(&mut self, message: String) {
        let position = extract_position(&message);
        self.body_error = Some(message);
        self.body_line = (position.line > 0).then_some(position.line);
        self.body_column = position.column.filter(|&c| c > 0);
    }

    pub fn is_error(&self) -> bool {
        self.subject_error.is_some() || self.body_error.is_some()
    }
}

/// Render `template` against `data`, a raw JSON payload that may be empty.
///
/// A parse failure is reported before the payload is even looked at, so
/// template authoring errors surface the same way regardless of data.
pub fn render(template: &str, data: &str) -> RenderResponse {
    let compiled = match engine::compile(TEMPLATE_NAME, template) {
        Ok(compiled) => compiled,
        Err(err) => return RenderResponse::failure(err.to_string()),
    };

    let context = match resolve_context(data) {
        Ok(resolved) => resolved.into_value(),
        Err(err) => return RenderResponse::data_failure(err.to_string()),
    };

    match compiled.execute(&context) {
        Ok(output) => RenderResponse::success(output),
        Err(err) => RenderResponse::failure(err.to_string()),
    }
}

/// Render a subject/body template pair against one shared payload.
///
/// A subject parse failure stops the whole render. A body parse failure is
/// recorded on the body channel while the subject proceeds. The context is
/// resolved once, so both channels observe the same `Now`.
pub fn render_email(subject_template: &str, body_template: &str, data: &str) -> RenderEmailResponse {
    let mut response = RenderEmailResponse::default();

    let subject = match engine::compile(SUBJECT_NAME, subject_template) {
        Ok(compiled) => compiled,
        Err(err) => {
            response.set_subject_failure(err.to_string());
            return response;
        }
    };

    let body = match engine::compile(BODY_NAME, body_template) {
        Ok(compiled) => Some(compiled),
        Err(err) => {
            response.set_body_failure(err.to_string());
            None
        }
    };

    let context = match resolve_context(data) {
        Ok(resolved) => resolved.into_value(),
        Err(err) => {
            let message = err.to_string();
            response.subject_error = Some(message.clone());
            if response.body_error.is_none() {
                response.body_error = Some(message);
            }
            return response;
        }
    };

    match subject.execute(&context) {
        Ok(output) => response.subject_output = Some(output),
        Err(err) => response.set_subject_failure(err.to_string()),
    }

    if let Some(body) = body {
        match body.execute(&context) {
            Ok(output) => response.body_output = Some(output),
            Err(err) => response.set_body_failure(err.to_string()),
        }
    }

    response
}
