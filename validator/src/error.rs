//! Infrastructure errors of the validation engine.
//!
//! Rejected statements are never errors: they come back as an
//! [`Outcome`](crate::report::Outcome). An [`EngineError`] means the engine
//! could not do its job at all.

use std::path::PathBuf;

use pbconf_ontology::KbError;
use thiserror::Error;

/// Failures that abort an engine operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The knowledge base failed underneath the engine.
    #[error("Knowledge base failure: {0}")]
    Store(#[from] KbError),

    /// The engine configuration does not fit the knowledge base.
    #[error("Invalid engine configuration: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
    },

    /// A configuration file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A configuration document is not valid JSON for its type.
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Another thread panicked while holding the knowledge-base lock.
    #[error("Knowledge base lock poisoned by a panicked validation pass")]
    Poisoned,
}

impl EngineError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
