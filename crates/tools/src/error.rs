//! Error type for tool dispatch.

use chroma_core::ColorError;
use thiserror::Error;

/// Errors produced while resolving, validating or running a tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool is registered under this name.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The params did not match the tool's request shape or allowed ranges.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// The color computation itself failed.
    #[error(transparent)]
    Color(#[from] ColorError),

    /// The response could not be turned into JSON.
    #[error("serialization error: {0}")]
    Serialization(String),
}
