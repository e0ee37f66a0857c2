//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: color error (unparsable color, bad weights, bad gradient positions)
//! - 12: input error (unknown tool, bad JSON params, out-of-range flags)
//! - 13: serialization error

use chroma_tools::ToolError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A color computation failed.
    Color(String),
    /// A user input error (unknown tool, bad JSON params, bad flag values).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Color(_) => 10,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Color(msg) => write!(f, "{msg}"),
            CliError::Input(msg) => write!(f, "{msg}"),
            CliError::Serialization(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<ToolError> for CliError {
    fn from(e: ToolError) -> Self {
        match e {
            ToolError::Color(_) => CliError::Color(e.to_string()),
            ToolError::Serialization(_) => CliError::Serialization(e.to_string()),
            ToolError::UnknownTool(_) | ToolError::InvalidParams(_) => {
                CliError::Input(e.to_string())
            }
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}
