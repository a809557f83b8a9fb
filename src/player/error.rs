//! Error types for the remote player client.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by playback operations.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// No device has been assigned by the streaming service yet
    #[error("Device not ready yet")]
    NotReady,

    /// The session playlist has no tracks
    #[error("No tracks available to play")]
    EmptyPlaylist,

    /// The service answered with something other than the expected status
    #[error("Remote player error ({status}): {body}")]
    Remote { status: u16, body: String },

    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Failed to parse a response body
    #[error("Failed to parse response: {0}")]
    Decode(String),

    /// Device never showed up in the device list
    #[error("No playback device appeared within {0:?}")]
    DeviceTimeout(Duration),
}

/// Result type for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
