//! Error types for device communication

use std::io;
use thiserror::Error;

/// Result type for device operations
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Errors raised while talking to the relay board
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The board could not be reached
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// Relay index outside the board's range
    #[error("invalid relay {0}: must be between 0 and 15")]
    InvalidRelay(i64),

    /// Writing a command frame failed
    #[error("failed to send command: {0}")]
    Send(#[source] io::Error),

    /// Reading a response frame failed
    #[error("failed to read response: {0}")]
    Read(#[source] io::Error),

    /// The board answered with a frame that does not follow the protocol
    #[error("malformed response frame: {0}")]
    Protocol(String),

    /// Releasing the connection failed
    #[error("failed to close connection: {0}")]
    Close(#[source] io::Error),
}

impl DeviceError {
    /// Whether the error happened before a connection was established
    pub fn is_connect(&self) -> bool {
        matches!(self, DeviceError::Connect { .. })
    }

    /// Whether the error happened while releasing the connection
    pub fn is_close(&self) -> bool {
        matches!(self, DeviceError::Close(_))
    }

    /// Whether the error happened while receiving a frame
    pub fn is_read(&self) -> bool {
        matches!(self, DeviceError::Read(_) | DeviceError::Protocol(_))
    }
}
