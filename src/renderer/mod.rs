//! Template rendering core.
//!
//! A payload is first resolved into a context ([`resolve_context`]): the
//! strict typed envelope when every key matches, a generic mapping
//! otherwise, with a `Now` timestamp guaranteed either way. Templates are
//! compiled and executed through a narrow engine facade whose failures are
//! flattened to `template: <name>:<line>:<column>: <reason>` messages, and
//! [`extract_position`] recovers the line and column from those messages
//! for the response. [`render`] and [`render_email`] tie the steps
//! together; email renders keep their subject and body channels
//! independent.

mod context;
mod engine;
mod functions;
mod model;
mod position;
mod render;

pub use context::{resolve_context, ContextError, ResolvedContext};
pub use model::{Event, EventDetail, EventDetails, NotificationContext};
pub use position::{extract_position, ErrorPosition};
pub use render::{render, render_email, RenderEmailResponse, RenderResponse};
