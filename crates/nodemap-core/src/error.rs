//! Errors raised by graph editing and (de)serialization.

use thiserror::Error;

/// Errors produced by [`Graph`](crate::graph::Graph) operations.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Node not found: {0}")]
    MissingNode(String),

    #[error("Box not found: {0}")]
    MissingBox(String),

    #[error("Node {node} is already owned by box {owner}")]
    AlreadyOwned { node: String, owner: String },
}
