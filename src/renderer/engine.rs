//! Narrow facade over the tera templating engine.
//!
//! Engine failures are flattened into single-line messages shaped
//! `template: <name>:<line>:<column>: <reason>` whenever the parser
//! reports a source position, so downstream code can localize errors
//! without ever touching engine types.

use std::error::Error as _;

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use tera::Tera;
use thiserror::Error;

use super::functions;

lazy_static! {
    /// Engine carrying the registered filter set; cloned per compilation.
    static ref BASE_ENGINE: Tera = {
        let mut tera = Tera::default();
        functions::register_filters(&mut tera);
        tera
    };

    /// Source position marker inside parser errors: ` --> line:column`.
    static ref PARSER_POSITION_RE: Regex = Regex::new(r"-->\s*(\d+):(\d+)").unwrap();
}

/// Failure reported by the engine, flattened to a display message.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The template text could not be parsed.
    #[error("{0}")]
    Parse(String),
    /// The template could not be evaluated against its context.
    #[error("{0}")]
    Execution(String),
}

/// A parsed template bound to the engine instance holding it.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    name: String,
    tera: Tera,
}

/// Parse `source` as a template called `name`.
pub fn compile(name: &str, source: &str) -> Result<CompiledTemplate, EngineError> {
    let mut tera = BASE_ENGINE.clone();
    tera.add_raw_template(name, source)
        .map_err(|err| EngineError::Parse(parse_message(name, &err)))?;

    Ok(CompiledTemplate { name: name.to_string(), tera })
}

impl CompiledTemplate {
    /// Render against a JSON object context.
    pub fn execute(&self, context: &Value) -> Result<String, EngineError> {
        let context = tera::Context::from_value(context.clone())
            .map_err(|err| EngineError::Execution(execution_message(&self.name, &err)))?;

        self.tera
            .render(&self.name, &context)
            .map_err(|err| EngineError::Execution(execution_message(&self.name, &err)))
    }
}

/// `template: <name>:<line>:<column>: <reason>` when the parser reported a
/// position, otherwise `template: <name>: <detail>`.
fn parse_message(name: &str, err: &tera::Error) -> String {
    for cause in error_chain(err) {
        if let Some(caps) = PARSER_POSITION_RE.captures(&cause) {
            return format!(
                "template: {}:{}:{}: {}",
                name,
                &caps[1],
                &caps[2],
                parser_reason(&cause)
            );
        }
    }

    format!("template: {}: {}", name, flattened(err))
}

fn execution_message(name: &str, err: &tera::Error) -> String {
    format!("template: {}: {}", name, flattened(err))
}

/// Display strings of the error and every cause under it.
fn error_chain(err: &tera::Error) -> Vec<String> {
    let mut chain = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push(cause.to_string());
        source = cause.source();
    }
    chain
}

/// Cause chain joined into one line, skipping the outermost wrapper when an
/// underlying cause exists.
fn flattened(err: &tera::Error) -> String {
    let chain = error_chain(err);
    let causes = if chain.len() > 1 { &chain[1..] } else { &chain[..] };

    causes
        .iter()
        .map(|cause| collapse_whitespace(cause))
        .filter(|cause| !cause.is_empty())
        .collect::<Vec<_>>()
        .join(": ")
}

/// The `= <reason>` trailer of a parser error display, else the collapsed
/// full text.
fn parser_reason(cause: &str) -> String {
    cause
        .lines()
        .rev()
        .find_map(|line| line.trim().strip_prefix("= "))
        .map(str::to_string)
        .unwrap_or_else(|| collapse_whitespace(cause))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
