//! Output for the helper responses
//!
//! This module provides:
//! - The `{"result": ...}` / `{"error": "..."}` response envelope
//! - JSON output of responses and manifest summaries
//! - Verbose diagnostics on stderr

mod json;
mod log;

pub use json::{JsonFormatter, ModFileJson, ModuleJson, ModuleVersionJson, ReplaceJson, RequireJson};
pub use log::Reporter;

use serde::Serialize;
use serde_json::Value;
use std::io::Write;

/// One helper response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Function result on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    /// Error message on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A successful response
    pub fn success(result: Value) -> Self {
        Self {
            result: Some(result),
            error: None,
        }
    }

    /// A failed response
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: None,
            error: Some(message.into()),
        }
    }

    /// Returns true if the response carries an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Trait for response formatters
pub trait OutputFormatter {
    /// Write a response to the given writer
    fn format(&self, response: &Response, writer: &mut dyn Write) -> std::io::Result<()>;
}
