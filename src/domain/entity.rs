//! Domain Layer - Core Entity Trait
//!
//! Every synced record is keyed by the opaque id the remote system issued.
//! Errors for the whole crate live here as well.

use serde::{Deserialize, Serialize};

/// Core trait for records identified by a remote id
pub trait Entity {
    /// Returns the remote-issued identifier
    fn id(&self) -> &str;
}

/// Position of the record with `id`, if present
pub fn position_of<T: Entity>(records: &[T], id: &str) -> Option<usize> {
    records.iter().position(|record| record.id() == id)
}

/// Mutable lookup by id
pub fn find_mut<'a, T: Entity>(records: &'a mut [T], id: &str) -> Option<&'a mut T> {
    records.iter_mut().find(|record| record.id() == id)
}

/// Common result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DomainError {
    /// Network failure or non-success status on a read call
    Transport(String),
    /// Response body did not match the expected shape
    Decode(String),
    /// A required result was empty
    NotFound(String),
    /// The remote refused a mutation
    RemoteRejected { status: u16 },
    /// Engine used before the database id was resolved
    NotReady(String),
    /// Snapshot store or config file failure
    Store(String),
    InvalidInput(String),
}

impl DomainError {
    /// Whether the failure came from the remote side rather than local state
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            DomainError::Transport(_)
                | DomainError::Decode(_)
                | DomainError::NotFound(_)
                | DomainError::RemoteRejected { .. }
        )
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DomainError::Transport(msg) => write!(f, "Transport error: {}", msg),
            DomainError::Decode(msg) => write!(f, "Decode error: {}", msg),
            DomainError::NotFound(msg) => write!(f, "Not found: {}", msg),
            DomainError::RemoteRejected { status } => {
                write!(f, "Remote rejected update with status {}", status)
            }
            DomainError::NotReady(msg) => write!(f, "Not ready: {}", msg),
            DomainError::Store(msg) => write!(f, "Store error: {}", msg),
            DomainError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
        }
    }
}

impl std::error::Error for DomainError {}

impl From<reqwest::Error> for DomainError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            DomainError::Decode(err.to_string())
        } else {
            DomainError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Decode(err.to_string())
    }
}

impl From<rusqlite::Error> for DomainError {
    fn from(err: rusqlite::Error) -> Self {
        DomainError::Store(err.to_string())
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Store(err.to_string())
    }
}
