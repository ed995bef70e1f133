//! Error types for homelab-db

use thiserror::Error;

/// Errors that can occur while reading machine records
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Failed to reach the database server
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Server rejected the credentials
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Query was accepted by the server but failed
    #[error("query failed: {0}")]
    QueryFailed(String),

    /// A fetched record lacks a required field
    #[error("record {index} is missing required field `{field}`")]
    MissingField {
        /// Position of the record in the result set
        index: usize,
        /// Name of the missing field
        field: String,
    },

    /// A fetched record has a field of the wrong shape
    #[error("record {index} has an invalid field: {reason}")]
    InvalidField {
        /// Position of the record in the result set
        index: usize,
        /// Decoder message
        reason: String,
    },

    /// Fixture data could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// Invalid connection settings
    #[error("invalid configuration: {0}")]
    ConfigError(String),
}

impl StoreError {
    /// Check if the store could not be reached or refused us
    #[must_use]
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StoreError::ConnectionFailed(_) | StoreError::AuthenticationFailed(_)
        )
    }

    /// Check if a record failed to decode
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            StoreError::MissingField { .. } | StoreError::InvalidField { .. }
        )
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        use mongodb::error::ErrorKind;

        match err.kind.as_ref() {
            ErrorKind::Authentication { .. } => StoreError::AuthenticationFailed(err.to_string()),
            ErrorKind::ServerSelection { .. }
            | ErrorKind::Io(_)
            | ErrorKind::ConnectionPoolCleared { .. }
            | ErrorKind::DnsResolve { .. } => StoreError::ConnectionFailed(err.to_string()),
            ErrorKind::InvalidArgument { .. } => StoreError::ConfigError(err.to_string()),
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}
