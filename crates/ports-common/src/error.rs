//! Error types for port records

use thiserror::Error;

/// Result type alias for port record operations
pub type Result<T> = std::result::Result<T, PortsError>;

/// Errors raised while building or validating a [`crate::Port`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortsError {
    #[error("port identifier must not be empty")]
    MissingId,

    #[error("coordinates must be a [longitude, latitude] pair, got {0} values")]
    InvalidCoordinates(usize),
}
