//! Error types for looppar-analysis
//!
//! Hard failures only. A loop that cannot be proven parallel is not an error:
//! it is reported as a `RejectReason` and the run continues.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for looppar operations
#[derive(Debug, Error)]
pub enum LoopParError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Textual IR could not be read
    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Method violates a flow-toolkit precondition (e.g. no body)
    #[error("Malformed method {signature}: {reason}")]
    MalformedMethod { signature: String, reason: String },

    /// Annotation map (de)serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Solver backend could not be created
    #[error("Solver error: {0}")]
    Solver(String),
}

impl LoopParError {
    /// Create a parse error
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        LoopParError::Parse {
            line,
            message: message.into(),
        }
    }

    /// Create a malformed-method error
    pub fn malformed(signature: impl Into<String>, reason: impl Into<String>) -> Self {
        LoopParError::MalformedMethod {
            signature: signature.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for looppar operations
pub type Result<T> = std::result::Result<T, LoopParError>;
