//! Byte-addressed register access to a device on an I2C bus.

use embedded_hal::i2c::I2c;
use thiserror::Error;

/// Errors raised by register I/O.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("Failed to open {path}: {message}")]
    Open { path: String, message: String },
    #[error("Read of register 0x{register:02X} failed: {message}")]
    Read { register: u8, message: String },
    #[error("Write of register 0x{register:02X} failed: {message}")]
    Write { register: u8, message: String },
}

/// Register-level access to a single device.
///
/// The device address is bound when the bus is created, so callers only deal
/// with register numbers.
pub trait RegisterBus {
    /// Read one register.
    fn read_byte(&mut self, register: u8) -> Result<u8, BusError>;

    /// Write one register.
    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), BusError>;

    /// Read a big-endian 16-bit value stored at `register` (high byte) and
    /// `register + 1` (low byte).
    fn read_word(&mut self, register: u8) -> Result<u16, BusError> {
        let high = self.read_byte(register)?;
        let low = self.read_byte(register.wrapping_add(1))?;
        Ok(u16::from_be_bytes([high, low]))
    }
}

/// [`RegisterBus`] over any `embedded-hal` I2C implementation.
#[derive(Debug)]
pub struct I2cRegisterBus<I> {
    i2c: I,
    address: u8,
}

impl<I: I2c> I2cRegisterBus<I> {
    pub fn new(i2c: I, address: u8) -> Self {
        Self { i2c, address }
    }

    /// 7-bit device address.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying I2C device.
    pub fn into_inner(self) -> I {
        self.i2c
    }
}

#[cfg(target_os = "linux")]
impl I2cRegisterBus<linux_embedded_hal::I2cdev> {
    /// Open `/dev/i2c-<bus>` for the device at `address`.
    pub fn open(bus: u32, address: u8) -> Result<Self, BusError> {
        let path = format!("/dev/i2c-{}", bus);
        let i2c = linux_embedded_hal::I2cdev::new(&path).map_err(|e| BusError::Open {
            path: path.clone(),
            message: e.to_string(),
        })?;

        tracing::info!(path = %path, address = %format!("0x{:02x}", address), "Opened I2C bus");

        Ok(Self::new(i2c, address))
    }
}

impl<I: I2c> RegisterBus for I2cRegisterBus<I> {
    fn read_byte(&mut self, register: u8) -> Result<u8, BusError> {
        let mut buf = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buf)
            .map_err(|e| BusError::Read {
                register,
                message: format!("{:?}", e),
            })?;
        Ok(buf[0])
    }

    fn write_byte(&mut self, register: u8, value: u8) -> Result<(), BusError> {
        self.i2c
            .write(self.address, &[register, value])
            .map_err(|e| BusError::Write {
                register,
                message: format!("{:?}", e),
            })
    }
}
