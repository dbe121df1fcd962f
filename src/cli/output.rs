//! Output formatting for CLI commands

use serde::Serialize;

use crate::engine::ErrorResponse;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Output helper for consistent formatting
pub struct Output {
    format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Prints structured data
    pub fn data<T: Serialize>(&self, data: &T) {
        match self.format {
            OutputFormat::Text => {
                // For text format, we expect the caller to handle it
                // This is a fallback that pretty-prints JSON
                if let Ok(json) = serde_json::to_string_pretty(data) {
                    println!("{}", json);
                }
            }
            OutputFormat::Json => {
                if let Ok(json) = serde_json::to_string(data) {
                    println!("{}", json);
                }
            }
        }
    }

    /// Prints an `{"error": ...}` document to stdout (JSON only)
    ///
    /// Text-mode errors are reported on stderr by `main`.
    pub fn error_document(&self, response: &ErrorResponse) {
        if self.is_json() {
            self.data(response);
        }
    }

    /// Returns true if using JSON format
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Emits a debug event (shown with --verbose)
    pub fn verbose(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    /// Emits a debug event tagged with a command context
    pub fn verbose_ctx(&self, context: &str, message: &str) {
        tracing::debug!(context, "{}", message);
    }
}
