//! Fixed-cadence sampling and publishing loop.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use futures_util::{FutureExt, Sink};
use imu_bridge_common::{TopicMessage, Vector3};
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info};

use crate::bus::RegisterBus;
use crate::error::Result;
use crate::publisher::{ACCEL_TOPIC, GYRO_TOPIC, RosbridgePublisher};
use crate::sensor::{Mpu6050, RawSample, pitch, roll};

/// Clears the terminal and homes the cursor.
const CLEAR_SCREEN: &str = "\x1B[2J\x1B[1;1H";

/// Time left in the current cycle, or `None` if the cycle already used up
/// the whole period.
pub fn remaining_delay(period: Duration, elapsed: Duration) -> Option<Duration> {
    period.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Largest scaled acceleration seen on each axis since the loop started.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelMaxima {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl AccelMaxima {
    pub fn update(&mut self, accel: &Vector3) {
        self.x = self.x.max(accel.x);
        self.y = self.y.max(accel.y);
        self.z = self.z.max(accel.z);
    }
}

/// One frame of the `--debug` console dashboard.
#[derive(Debug, Clone, Copy)]
pub struct DebugFrame {
    pub gyro_raw: RawSample,
    pub gyro: Vector3,
    pub accel_raw: RawSample,
    pub accel: Vector3,
    pub maxima: AccelMaxima,
}

impl fmt::Display for DebugFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "gyro data")?;
        writeln!(f, "---------")?;
        writeln!(f, "gyro_xout: {} scaled: {}", self.gyro_raw.x, self.gyro.x)?;
        writeln!(f, "gyro_yout: {} scaled: {}", self.gyro_raw.y, self.gyro.y)?;
        writeln!(f, "gyro_zout: {} scaled: {}", self.gyro_raw.z, self.gyro.z)?;
        writeln!(f)?;
        writeln!(f, "accelerometer data")?;
        writeln!(f, "------------------")?;
        writeln!(f, "accel_xout: {} scaled: {}", self.accel_raw.x, self.accel.x)?;
        writeln!(f, "accel_yout: {} scaled: {}", self.accel_raw.y, self.accel.y)?;
        writeln!(f, "accel_zout: {} scaled: {}", self.accel_raw.z, self.accel.z)?;
        writeln!(f, "accel_xout_scaled_max: {}", self.maxima.x)?;
        writeln!(f, "accel_yout_scaled_max: {}", self.maxima.y)?;
        writeln!(f, "accel_zout_scaled_max: {}", self.maxima.z)?;
        let Vector3 { x, y, z } = self.accel;
        writeln!(f, "x rotation: {}", roll(x, y, z))?;
        writeln!(f, "y rotation: {}", pitch(x, y, z))
    }
}

/// Counters reported when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerReport {
    /// Completed read-and-publish cycles.
    pub cycles: u64,
    /// Cycles that took at least the whole period.
    pub overruns: u64,
}

/// Reads the sensor and publishes both topics at a fixed cadence.
pub struct Sampler<B, S> {
    sensor: Mpu6050<B>,
    publisher: RosbridgePublisher<S>,
    period: Duration,
    debug: bool,
    accel_msg: TopicMessage,
    gyro_msg: TopicMessage,
}

impl<B, S> Sampler<B, S>
where
    B: RegisterBus,
    S: Sink<Message> + Unpin,
    S::Error: fmt::Display,
{
    /// Both topics must already be advertised on `publisher`.
    pub fn new(
        sensor: Mpu6050<B>,
        publisher: RosbridgePublisher<S>,
        period: Duration,
        debug: bool,
    ) -> Self {
        Self {
            sensor,
            publisher,
            period,
            debug,
            accel_msg: ACCEL_TOPIC.message(),
            gyro_msg: GYRO_TOPIC.message(),
        }
    }

    /// Run until `shutdown` completes or an error occurs.
    ///
    /// `shutdown` is raced against the inter-cycle sleep and checked after a
    /// cycle that overran; bus reads and sends are never interrupted.
    pub async fn run<F>(&mut self, shutdown: F) -> Result<SamplerReport>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        let mut maxima = AccelMaxima::default();
        let mut report = SamplerReport::default();

        info!(
            period_ms = self.period.as_millis() as u64,
            debug = self.debug,
            "Sampler started"
        );

        loop {
            let start = Instant::now();

            self.cycle(&mut maxima).await?;
            report.cycles += 1;

            let elapsed = start.elapsed();
            match remaining_delay(self.period, elapsed) {
                Some(remaining) => {
                    tokio::select! {
                        _ = tokio::time::sleep(remaining) => {}
                        _ = &mut shutdown => break,
                    }
                }
                None => {
                    report.overruns += 1;
                    debug!(
                        elapsed_ms = elapsed.as_millis() as u64,
                        period_ms = self.period.as_millis() as u64,
                        "Cycle overran its period"
                    );
                    if shutdown.as_mut().now_or_never().is_some() {
                        break;
                    }
                }
            }
        }

        info!(
            cycles = report.cycles,
            overruns = report.overruns,
            "Sampler stopped"
        );
        Ok(report)
    }

    /// One read-and-publish cycle.
    async fn cycle(&mut self, maxima: &mut AccelMaxima) -> Result<()> {
        let gyro_raw = self.sensor.read_gyro_raw()?;
        self.gyro_msg
            .set(gyro_raw.scaled(self.sensor.gyro_scale()).into());

        let accel_raw = self.sensor.read_accel_raw()?;
        self.accel_msg
            .set(accel_raw.scaled(self.sensor.accel_scale()).into());

        if self.debug {
            maxima.update(&self.accel_msg.msg);
            let frame = DebugFrame {
                gyro_raw,
                gyro: self.gyro_msg.msg,
                accel_raw,
                accel: self.accel_msg.msg,
                maxima: *maxima,
            };
            print!("{}{}", CLEAR_SCREEN, frame);
        }

        self.publisher.send(&self.accel_msg).await?;
        self.publisher.send(&self.gyro_msg).await?;

        Ok(())
    }

    pub fn publisher(&self) -> &RosbridgePublisher<S> {
        &self.publisher
    }

    /// The driver, for inspecting its bus after a run.
    pub fn sensor(&self) -> &Mpu6050<B> {
        &self.sensor
    }

    /// Tear down the sampler, returning the publisher so the session can be
    /// closed.
    pub fn into_publisher(self) -> RosbridgePublisher<S> {
        self.publisher
    }
}
