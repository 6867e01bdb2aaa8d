//! IMU Bridge Common Library
//!
//! This crate provides shared types and utilities for bridges that publish
//! sensor data to a rosbridge server:
//!
//! - [`message`] - rosbridge protocol messages (`Advertisement`, `TopicMessage`, `Vector3`)
//! - [`serialization`] - JSON text frame encoding and decoding
//! - [`config`] - Configuration loading (JSON5 format)
//! - [`session`] - WebSocket session management
//! - [`error`] - Error types

pub mod config;
pub mod error;
pub mod message;
pub mod serialization;
pub mod session;

// Re-export commonly used types at the crate root
pub use config::{
    DEFAULT_ROSBRIDGE_PORT, LogFormat, LoggingConfig, RosbridgeConfig, load_config, parse_config,
};
pub use error::{Error, Result};
pub use message::{Advertisement, Op, TopicMessage, VECTOR3_TYPE, Vector3};
pub use serialization::{decode, encode, peek_op};
pub use session::{WsStream, connect};

/// Initialize tracing with the given configuration.
///
/// Supports two output formats:
/// - `LogFormat::Text` (default): Human-readable text format
/// - `LogFormat::Json`: Structured JSON format for log aggregation systems
///
/// `RUST_LOG` takes precedence over the configured level.
///
/// # Example
///
/// ```ignore
/// use imu_bridge_common::{LoggingConfig, LogFormat, init_tracing};
///
/// let config = LoggingConfig {
///     level: "info".to_string(),
///     format: LogFormat::Json,
/// };
/// init_tracing(&config)?;
/// ```
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format {
        LogFormat::Text => {
            tracing_subscriber::registry()
                .with(fmt::layer())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(fmt::layer().json())
                .with(filter)
                .try_init()
                .map_err(|e| Error::Config(format!("Failed to initialize tracing: {}", e)))?;
        }
    }

    Ok(())
}
