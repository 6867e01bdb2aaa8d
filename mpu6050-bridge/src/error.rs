//! Error types for the bridge.

use thiserror::Error;

use crate::bus::BusError;
use crate::config::ConfigError;
use crate::publisher::PublishError;

/// Result type alias using [`BridgeError`].
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Any error that stops the bridge. None of them is recovered from.
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Invalid configuration, detected before touching the bus.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Register read/write failed.
    #[error("Bus error: {0}")]
    Bus(#[from] BusError),

    /// Connecting to or sending on the rosbridge session failed.
    #[error("Publish error: {0}")]
    Publish(#[from] PublishError),
}

impl BridgeError {
    /// Short machine-friendly category, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config",
            Self::Bus(_) => "bus",
            Self::Publish(PublishError::Connection { .. }) => "connection",
            Self::Publish(_) => "send",
        }
    }
}
