//! MPU6050 to rosbridge bridge.
//!
//! This bridge reads the gyroscope and accelerometer of an MPU6050 over I2C
//! and publishes them to ROS through a rosbridge WebSocket server.
//!
//! # Topics
//!
//! ```text
//! /MPU6050/Accel   geometry_msgs/Vector3
//! /MPU6050/Gyro    geometry_msgs/Vector3
//! ```
//!
//! Gyro values are in °/s. Accel values are raw counts divided by
//! `2^(11 - AFS_SEL)`.

pub mod args;
pub mod bus;
pub mod config;
pub mod error;
pub mod mock;
pub mod publisher;
pub mod sampler;
pub mod sensor;
#[cfg(unix)]
pub mod shutdown;

pub use error::{BridgeError, Result};
