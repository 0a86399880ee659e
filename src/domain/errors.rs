//! Domain error types
//!
//! These errors are framework-agnostic and represent business-level failures.
//! Constraint violations raised by the database are classified here so that
//! callers can tell a duplicate email from a blocked delete.

use std::fmt;

use sea_orm::{DbErr, SqlErr};

#[derive(Debug)]
pub enum DomainError {
    /// Resource not found
    NotFound,
    /// Validation error with message
    Validation(String),
    /// Unique constraint violated (e.g. duplicate customer email)
    Conflict(String),
    /// Delete rejected because dependent rows still reference the record
    Protected(String),
    /// Database/persistence error
    Database(String),
    /// Generic internal error
    Internal(String),
}

impl DomainError {
    /// A foreign-key failure on insert or update means the caller pointed at
    /// a parent that does not exist, which is a bad input rather than a
    /// blocked delete.
    pub fn on_write(self) -> Self {
        match self {
            DomainError::Protected(msg) => {
                DomainError::Validation(format!("Referenced record does not exist ({})", msg))
            }
            other => other,
        }
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainError::NotFound => write!(f, "Resource not found"),
            DomainError::Validation(msg) => write!(f, "Validation error: {}", msg),
            DomainError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            DomainError::Protected(msg) => write!(f, "Protected: {}", msg),
            DomainError::Database(msg) => write!(f, "Database error: {}", msg),
            DomainError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

// Conversion from SeaORM errors (used in infrastructure layer)
impl From<DbErr> for DomainError {
    fn from(e: DbErr) -> Self {
        match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(msg)) => DomainError::Conflict(msg),
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => DomainError::Protected(msg),
            _ => {
                // SQLite reports extended result codes inconsistently across
                // driver versions, the message text is stable.
                let msg = e.to_string();
                if msg.contains("UNIQUE constraint failed") {
                    DomainError::Conflict(msg)
                } else if msg.contains("FOREIGN KEY constraint failed") {
                    DomainError::Protected(msg)
                } else {
                    DomainError::Database(msg)
                }
            }
        }
    }
}
