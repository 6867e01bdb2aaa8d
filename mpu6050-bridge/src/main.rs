//! MPU6050 to rosbridge bridge.
//!
//! Reads the gyroscope and accelerometer over I2C and publishes them to a
//! rosbridge server as `geometry_msgs/Vector3` messages.

use anyhow::{Context, Result};
use clap::Parser;
use imu_bridge_common::{RosbridgeConfig, WsStream};
use mpu6050_bridge::args::Args;
use mpu6050_bridge::bus::I2cRegisterBus;
use mpu6050_bridge::publisher::{ACCEL_TOPIC, GYRO_TOPIC, RosbridgePublisher};
use mpu6050_bridge::sampler::Sampler;
use mpu6050_bridge::sensor::Mpu6050;
use mpu6050_bridge::shutdown;
use tracing::{error, info};

/// Open the session and advertise both topics.
async fn open_session(config: &RosbridgeConfig) -> Result<RosbridgePublisher<WsStream>> {
    info!("Connecting to rosbridge at {}...", config.url());
    let mut publisher = RosbridgePublisher::connect(config)
        .await
        .context("Failed to connect to rosbridge")?;
    info!("Connected to rosbridge");

    publisher
        .advertise(&ACCEL_TOPIC)
        .await
        .context("Failed to advertise accel topic")?;
    publisher
        .advertise(&GYRO_TOPIC)
        .await
        .context("Failed to advertise gyro topic")?;

    Ok(publisher)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Configuration errors surface before any bus or network I/O
    let config = args.resolve().context("Invalid configuration")?;

    imu_bridge_common::init_tracing(&config.logging)
        .map_err(|e| anyhow::anyhow!("Failed to init tracing: {}", e))?;

    info!("Starting mpu6050-bridge");
    if let Some(path) = &args.config {
        info!("Loaded configuration from {:?}", path);
    }

    // Listen for Ctrl+C from here on, not only once sampling starts
    let stop = shutdown::interrupt().context("Failed to install SIGINT handler")?;
    tokio::pin!(stop);

    let gyro_range = config.sensor.gyro_range()?;
    let accel_range = config.sensor.accel_range()?;
    let period = config.sensor.sample_delay()?;

    let bus = I2cRegisterBus::open(config.sensor.i2c_bus, config.sensor.i2c_address)
        .context("Failed to open I2C bus")?;
    let sensor =
        Mpu6050::new(bus, gyro_range, accel_range).context("Failed to configure MPU6050")?;

    let publisher = tokio::select! {
        publisher = open_session(&config.bridge) => publisher?,
        _ = &mut stop => {
            info!("mpu6050-bridge stopped before sampling started");
            return Ok(());
        }
    };

    let mut sampler = Sampler::new(sensor, publisher, period, config.debug);

    match sampler.run(stop).await {
        Ok(report) => {
            info!(
                cycles = report.cycles,
                overruns = report.overruns,
                sent = sampler.publisher().sent(),
                "Sampling finished"
            );
            sampler.into_publisher().close().await;
            info!("mpu6050-bridge stopped");
            Ok(())
        }
        Err(e) => {
            error!(kind = e.kind(), error = %e, "Sampling failed");
            Err(e).context("Bridge stopped on error")
        }
    }
}
