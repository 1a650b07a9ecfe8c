//! # Store Errors
//!
//! Failures reported by a data store backend.

use thiserror::Error;

/// Result type for data store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Data store errors
///
/// The display form is the backend's own message, unmodified; handlers pass it
/// straight through to API clients.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store answered and refused the query
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The store could not be reached
    #[error("{0}")]
    Transport(String),

    /// The store answered with a body that could not be decoded
    #[error("{0}")]
    Decode(String),

    /// The query named a table the store does not have
    #[error("relation \"{0}\" does not exist")]
    UnknownTable(String),
}

impl StoreError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// The message surfaced to API clients
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}
