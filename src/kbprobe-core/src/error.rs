use crate::models::ConnectionMode;
use std::fmt;

/// Errors raised by a vector store backend
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {status} - {message}")]
    Server { status: u16, message: String },

    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response from server")]
    InvalidResponse,

    #[error("Collection `{0}` already exists")]
    CollectionExists(String),

    #[error("Collection `{0}` not found")]
    CollectionNotFound(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// One connection mode that could not be opened or validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeFailure {
    pub mode: ConnectionMode,
    pub reason: String,
}

impl fmt::Display for ModeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.mode, self.reason)
    }
}

/// Errors surfaced to the caller of the connector, initializer and inspector
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Vector store unavailable, all connection modes failed: {}", join_failures(.0))]
    StoreUnavailable(Vec<ModeFailure>),

    #[error("No connection modes configured")]
    NoConnectionModes,

    #[error("Failed to list collections: {0}")]
    List(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, Error>;

fn join_failures(failures: &[ModeFailure]) -> String {
    failures
        .iter()
        .map(ModeFailure::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_names_every_mode() {
        let err = Error::StoreUnavailable(vec![
            ModeFailure {
                mode: ConnectionMode::networked("db.internal", 6333),
                reason: "connection refused".to_string(),
            },
            ModeFailure {
                mode: ConnectionMode::embedded("/var/lib/kb"),
                reason: "permission denied".to_string(),
            },
        ]);

        let msg = err.to_string();
        assert!(msg.contains("networked (db.internal:6333): connection refused"));
        assert!(msg.contains("embedded (/var/lib/kb): permission denied"));
    }
}
