//! Standard errors that may occur while running the relay.

use thiserror::Error;

/// Relay runtime errors.
#[derive(Debug, Error)]
pub enum RelayError {
    /// A socket or file operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A WAV container couldn't be read or written.
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
    /// The message audio isn't 8kHz 16-bit integer mono.
    #[error("unsupported audio: {sample_rate}Hz, {channels} channel(s), {bits} bits (need 8000Hz 16-bit mono)")]
    UnsupportedAudio {
        sample_rate: u32,
        channels: u16,
        bits: u16,
    },
    /// A peer specification couldn't be parsed.
    #[error("invalid peer specification: {0}")]
    InvalidPeer(String),
    /// A peer host name couldn't be resolved to an address.
    #[error("could not resolve {0}")]
    Resolve(String),
}

/// Standard result using `RelayError`.
pub type Result<T> = std::result::Result<T, RelayError>;
