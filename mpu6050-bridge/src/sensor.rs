//! MPU6050 driver: wake-up, range configuration and scaled axis reads.
//!
//! Register numbers and scale factors follow the MPU-6000/6050 register map
//! and product specification.

use std::fmt;

use tracing::{info, trace};

use crate::bus::{BusError, RegisterBus};
use crate::config::ConfigError;

/// Power management 1.
pub const PWR_MGMT_1: u8 = 0x6B;
/// Gyroscope configuration (FS_SEL in bits 4:3).
pub const GYRO_CONFIG: u8 = 0x1B;
/// Accelerometer configuration (AFS_SEL in bits 4:3).
pub const ACCEL_CONFIG: u8 = 0x1C;

pub const ACCEL_XOUT_H: u8 = 0x3B;
pub const ACCEL_YOUT_H: u8 = 0x3D;
pub const ACCEL_ZOUT_H: u8 = 0x3F;
pub const GYRO_XOUT_H: u8 = 0x43;
pub const GYRO_YOUT_H: u8 = 0x45;
pub const GYRO_ZOUT_H: u8 = 0x47;

const ACCEL_AXES: [u8; 3] = [ACCEL_XOUT_H, ACCEL_YOUT_H, ACCEL_ZOUT_H];
const GYRO_AXES: [u8; 3] = [GYRO_XOUT_H, GYRO_YOUT_H, GYRO_ZOUT_H];

/// Gyroscope full-scale range (FS_SEL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GyroRange {
    /// ±250 °/s
    Dps250,
    /// ±500 °/s
    Dps500,
    /// ±1000 °/s
    Dps1000,
    /// ±2000 °/s
    Dps2000,
}

impl GyroRange {
    /// FS_SEL value (0-3).
    pub fn selector(&self) -> u8 {
        match self {
            GyroRange::Dps250 => 0,
            GyroRange::Dps500 => 1,
            GyroRange::Dps1000 => 2,
            GyroRange::Dps2000 => 3,
        }
    }

    /// LSB per °/s: `131 / 2^FS_SEL`.
    pub fn scale(&self) -> f64 {
        131.0 / f64::from(1u8 << self.selector())
    }

    pub fn full_scale_dps(&self) -> u32 {
        250 << self.selector()
    }
}

impl TryFrom<u8> for GyroRange {
    type Error = ConfigError;

    fn try_from(fs_sel: u8) -> Result<Self, Self::Error> {
        match fs_sel {
            0 => Ok(GyroRange::Dps250),
            1 => Ok(GyroRange::Dps500),
            2 => Ok(GyroRange::Dps1000),
            3 => Ok(GyroRange::Dps2000),
            other => Err(ConfigError::GyroSelector(other)),
        }
    }
}

/// Accelerometer full-scale range (AFS_SEL).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelRange {
    /// ±2 g
    G2,
    /// ±4 g
    G4,
    /// ±8 g
    G8,
    /// ±16 g
    G16,
}

impl AccelRange {
    /// AFS_SEL value (0-3).
    pub fn selector(&self) -> u8 {
        match self {
            AccelRange::G2 => 0,
            AccelRange::G4 => 1,
            AccelRange::G8 => 2,
            AccelRange::G16 => 3,
        }
    }

    /// LSB per g: `2^(11 - AFS_SEL)`.
    ///
    /// Eight times smaller than the datasheet sensitivity (16384 LSB/g at
    /// ±2 g), so published values read 8.0 per g.
    pub fn scale(&self) -> f64 {
        f64::from(1u16 << (11 - self.selector()))
    }

    pub fn full_scale_g(&self) -> u32 {
        2 << self.selector()
    }
}

impl TryFrom<u8> for AccelRange {
    type Error = ConfigError;

    fn try_from(afs_sel: u8) -> Result<Self, Self::Error> {
        match afs_sel {
            0 => Ok(AccelRange::G2),
            1 => Ok(AccelRange::G4),
            2 => Ok(AccelRange::G8),
            3 => Ok(AccelRange::G16),
            other => Err(ConfigError::AccelSelector(other)),
        }
    }
}

/// Decode a 16-bit two's-complement register value.
pub fn decode_twos_complement(raw: u16) -> i32 {
    if raw >= 0x8000 {
        -((65535 - i32::from(raw)) + 1)
    } else {
        i32::from(raw)
    }
}

/// Signed raw counts for three axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawSample {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl RawSample {
    /// Divide every axis by `scale`.
    pub fn scaled(&self, scale: f64) -> [f64; 3] {
        [
            f64::from(self.x) / scale,
            f64::from(self.y) / scale,
            f64::from(self.z) / scale,
        ]
    }
}

impl fmt::Display for RawSample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Configured MPU6050.
#[derive(Debug)]
pub struct Mpu6050<B> {
    bus: B,
    gyro_range: GyroRange,
    accel_range: AccelRange,
    gyro_scale: f64,
    accel_scale: f64,
}

impl<B: RegisterBus> Mpu6050<B> {
    /// Wake the device and program both full-scale ranges.
    ///
    /// The selector bits are OR-ed into the current register contents, so a
    /// device that was previously configured for a wider range keeps those
    /// bits set.
    pub fn new(
        mut bus: B,
        gyro_range: GyroRange,
        accel_range: AccelRange,
    ) -> Result<Self, BusError> {
        bus.write_byte(PWR_MGMT_1, 0)?;

        let gyro_config = bus.read_byte(GYRO_CONFIG)?;
        bus.write_byte(GYRO_CONFIG, gyro_config | (gyro_range.selector() << 3))?;

        let accel_config = bus.read_byte(ACCEL_CONFIG)?;
        bus.write_byte(ACCEL_CONFIG, accel_config | (accel_range.selector() << 3))?;

        info!(
            gyro_range_dps = gyro_range.full_scale_dps(),
            accel_range_g = accel_range.full_scale_g(),
            gyro_scale = gyro_range.scale(),
            accel_scale = accel_range.scale(),
            "MPU6050 configured"
        );

        Ok(Self {
            bus,
            gyro_range,
            accel_range,
            gyro_scale: gyro_range.scale(),
            accel_scale: accel_range.scale(),
        })
    }

    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    pub fn accel_range(&self) -> AccelRange {
        self.accel_range
    }

    pub fn gyro_scale(&self) -> f64 {
        self.gyro_scale
    }

    pub fn accel_scale(&self) -> f64 {
        self.accel_scale
    }

    /// Read one signed axis whose high byte lives at `register`.
    pub fn read_axis(&mut self, register: u8) -> Result<i32, BusError> {
        let raw = self.bus.read_word(register)?;
        Ok(decode_twos_complement(raw))
    }

    fn read_triple(&mut self, registers: [u8; 3]) -> Result<RawSample, BusError> {
        let sample = RawSample {
            x: self.read_axis(registers[0])?,
            y: self.read_axis(registers[1])?,
            z: self.read_axis(registers[2])?,
        };
        trace!(x = sample.x, y = sample.y, z = sample.z, "raw sample");
        Ok(sample)
    }

    pub fn read_gyro_raw(&mut self) -> Result<RawSample, BusError> {
        self.read_triple(GYRO_AXES)
    }

    pub fn read_accel_raw(&mut self) -> Result<RawSample, BusError> {
        self.read_triple(ACCEL_AXES)
    }

    /// Angular rate in °/s.
    pub fn read_gyro(&mut self) -> Result<[f64; 3], BusError> {
        Ok(self.read_gyro_raw()?.scaled(self.gyro_scale))
    }

    /// Acceleration, scaled by [`AccelRange::scale`].
    pub fn read_accel(&mut self) -> Result<[f64; 3], BusError> {
        Ok(self.read_accel_raw()?.scaled(self.accel_scale))
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

/// Euclidean norm of two components.
pub fn dist(a: f64, b: f64) -> f64 {
    (a * a + b * b).sqrt()
}

/// Rotation about the y axis, in degrees, from an acceleration vector.
pub fn pitch(x: f64, y: f64, z: f64) -> f64 {
    -x.atan2(dist(y, z)).to_degrees()
}

/// Rotation about the x axis, in degrees, from an acceleration vector.
pub fn roll(x: f64, y: f64, z: f64) -> f64 {
    y.atan2(dist(x, z)).to_degrees()
}
