//! Payload classification: typed notification context or generic mapping.

use chrono::Utc;
use serde_json::{Map, Value};
use thiserror::Error;

use super::model::NotificationContext;

/// Failure to turn a payload into any usable template context.
#[derive(Debug, Error)]
#[error("Data parse error: {source}")]
pub struct ContextError {
    #[from]
    source: serde_json::Error,
}

/// Outcome of context resolution: the typed envelope when the payload
/// matches it strictly, otherwise a generic key/value mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedContext {
    Notification(NotificationContext),
    Generic(Map<String, Value>),
}

impl ResolvedContext {
    /// True when the strict branch produced this context.
    pub fn is_notification(&self) -> bool {
        matches!(self, ResolvedContext::Notification(_))
    }

    /// The JSON object handed to the template engine.
    pub fn into_value(self) -> Value {
        match self {
            ResolvedContext::Notification(ctx) => ctx.render_value(),
            ResolvedContext::Generic(map) => Value::Object(map),
        }
    }
}

/// Resolve raw JSON text into a template context.
///
/// The typed branch requires every key in the payload, at the top level and
/// inside each event, to match a known field; anything else falls back to a
/// generic mapping. Both branches guarantee a `Now` entry. Empty,
/// whitespace-only and literal `null` payloads resolve to a mapping holding
/// only `Now`.
pub fn resolve_context(raw: &str) -> Result<ResolvedContext, ContextError> {
    let trimmed = raw.trim();
    let absent = trimmed.is_empty() || trimmed == "null";

    if !absent {
        if let Ok(mut ctx) = serde_json::from_str::<NotificationContext>(trimmed) {
            ctx.ensure_now();
            return Ok(ResolvedContext::Notification(ctx));
        }
    }

    let mut generic = if absent {
        Map::new()
    } else {
        serde_json::from_str::<Map<String, Value>>(trimmed)?
    };

    if !generic.contains_key("Now") {
        generic.insert("Now".to_string(), serde_json::to_value(Utc::now())?);
    }

    Ok(ResolvedContext::Generic(generic))
}
