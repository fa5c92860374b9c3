//! Unified error type for the catalog service.
//!
//! Every layer (store, services, rotation task, HTTP surface) returns [`Result`].
//! The HTTP mapping of each variant lives in `api::error`.

use crate::auth::AuthError;
use std::fmt;
use thiserror::Error;

/// Write operations whose affected-row count is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOperation {
    /// Admin insert
    Insert,
    /// Admin update of display fields
    Update,
    /// Admin delete
    Delete,
    /// Setting the bean of the day flag
    SetBotd,
}

impl fmt::Display for WriteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::SetBotd => "set bean of the day on",
        };
        f.write_str(verb)
    }
}

/// Every failure the service can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad settings or seed data
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Any `SeaORM` failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem or socket failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Authentication failed; the cause is logged, never shown
    #[error("Authorization invalid for request")]
    Auth(#[from] AuthError),

    /// Rejected request input
    #[error("{message}")]
    Validation {
        /// Message returned to the client
        message: String,
    },

    /// No bean is currently the bean of the day
    #[error("No bean of the day found")]
    BotdNotFound,

    /// No bean has this id
    #[error("Bean not found: {id}")]
    BeanNotFound {
        /// Requested id
        id: String,
    },

    /// A write affected zero rows
    #[error("Failed to {operation} bean {id}")]
    WriteFailed {
        /// Which write
        operation: WriteOperation,
        /// Target bean id
        id: String,
    },
}

impl Error {
    /// Builds a validation error from any message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Builds a write failure for the given operation and bean id.
    pub fn write_failed(operation: WriteOperation, id: impl Into<String>) -> Self {
        Self::WriteFailed {
            operation,
            id: id.into(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
