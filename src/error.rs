//! Error types for the itembus client

use thiserror::Error;

/// Errors that can occur when authenticating or running an items session
#[derive(Error, Debug)]
pub enum ItembusError {
    /// The local signing key could not be read
    #[error("signing key unavailable: {0}")]
    KeyFile(#[from] std::io::Error),

    /// Token decryption or validation failed
    #[error("authentication failed: {0}")]
    Authentication(#[from] jsonwebtoken::errors::Error),

    /// The token verified but carries no company claim
    #[error("token has no company claim")]
    MissingCompanyClaim,

    /// The supplied client options are invalid
    #[error("invalid client options: {0}")]
    Configuration(String),

    /// Failure while opening the bridge or registering the update handler
    #[error("transport setup failed: {0}")]
    TransportSetup(String),

    /// `connect()` called while a connection attempt or open session exists
    #[error("already connected")]
    AlreadyConnected,

    /// `connect()` called on a closed session; sessions are not reusable
    #[error("session closed")]
    Closed,

    /// `disconnect()` called without an active transport handle
    #[error("not connected")]
    NotConnected,

    /// Failed to serialize/deserialize a message
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for itembus operations
pub type Result<T> = std::result::Result<T, ItembusError>;
