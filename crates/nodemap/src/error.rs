//! Error types for nodemap operations.
//!
//! [`NodemapError`] wraps everything that can fail around a layout run:
//! reading and parsing graph documents, editing the graph and loading
//! configuration. Layout passes themselves never fail, and analytics report
//! missing paths as data rather than errors.

use std::io;

use thiserror::Error;

use nodemap_core::GraphError;

/// The main error type for nodemap operations.
///
/// # Diagnostic Variants
///
/// The `Document` variant keeps the JSON text that failed to parse, so
/// front ends can point at the offending line and column.
#[derive(Debug, Error)]
pub enum NodemapError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid graph document: {err}")]
    Document { err: serde_json::Error, src: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl NodemapError {
    /// Create a new `Document` error with the associated source text.
    pub fn new_document_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Document {
            err,
            src: src.into(),
        }
    }
}
