//! Configuration for the MPU6050 bridge.

use imu_bridge_common::config::{LoggingConfig, RosbridgeConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::sensor::{AccelRange, GyroRange};

/// Default 7-bit I2C address of the MPU6050 (AD0 pulled low).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x68;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] imu_bridge_common::Error),
    #[error("FS_SEL must be 0-3, got {0}")]
    GyroSelector(u8),
    #[error("AFS_SEL must be 0-3, got {0}")]
    AccelSelector(u8),
    #[error("rosbridge url is required (use --url or bridge.host)")]
    MissingUrl,
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Complete bridge configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImuBridgeConfig {
    /// rosbridge endpoint
    #[serde(default)]
    pub bridge: RosbridgeConfig,

    /// Sensor and sampling settings
    #[serde(default)]
    pub sensor: SensorSettings,

    /// Print a live dashboard of raw/scaled values to stdout
    #[serde(default)]
    pub debug: bool,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sensor wiring, ranges and sampling cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSettings {
    /// I2C bus number, as listed by `i2cdetect -l` (`/dev/i2c-<n>`)
    #[serde(default = "default_i2c_bus")]
    pub i2c_bus: u32,

    /// 7-bit device address, as shown by `i2cdetect -y <bus>`
    #[serde(default = "default_i2c_address")]
    pub i2c_address: u8,

    /// Gyroscope full-scale selector (0-3)
    #[serde(default)]
    pub fs_sel: u8,

    /// Accelerometer full-scale selector (0-3)
    #[serde(default = "default_afs_sel")]
    pub afs_sel: u8,

    /// Seconds between cycle starts
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
}

fn default_i2c_bus() -> u32 {
    1
}

fn default_i2c_address() -> u8 {
    DEFAULT_I2C_ADDRESS
}

fn default_afs_sel() -> u8 {
    3
}

fn default_delay_secs() -> f64 {
    0.1
}

impl Default for SensorSettings {
    fn default() -> Self {
        Self {
            i2c_bus: default_i2c_bus(),
            i2c_address: default_i2c_address(),
            fs_sel: 0,
            afs_sel: default_afs_sel(),
            delay_secs: default_delay_secs(),
        }
    }
}

impl SensorSettings {
    /// Gyroscope range for the configured selector.
    pub fn gyro_range(&self) -> Result<GyroRange, ConfigError> {
        GyroRange::try_from(self.fs_sel)
    }

    /// Accelerometer range for the configured selector.
    pub fn accel_range(&self) -> Result<AccelRange, ConfigError> {
        AccelRange::try_from(self.afs_sel)
    }

    /// Target period between cycle starts.
    pub fn sample_delay(&self) -> Result<Duration, ConfigError> {
        if !(self.delay_secs > 0.0) {
            return Err(ConfigError::Validation(format!(
                "delay must be a positive number of seconds, got {}",
                self.delay_secs
            )));
        }
        Duration::try_from_secs_f64(self.delay_secs)
            .map_err(|e| ConfigError::Validation(format!("invalid delay {}: {}", self.delay_secs, e)))
    }
}

impl ImuBridgeConfig {
    /// Load configuration from a JSON5 file. Validation is left to the
    /// caller so CLI overrides can be applied first.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Ok(imu_bridge_common::load_config(path)?)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge.host.trim().is_empty() {
            return Err(ConfigError::MissingUrl);
        }

        if self.bridge.port == 0 {
            return Err(ConfigError::Validation(
                "rosbridge port must be non-zero".to_string(),
            ));
        }

        if self.sensor.i2c_address > 0x7F {
            return Err(ConfigError::Validation(format!(
                "i2c_address 0x{:02x} is not a 7-bit address",
                self.sensor.i2c_address
            )));
        }

        self.sensor.gyro_range()?;
        self.sensor.accel_range()?;
        self.sensor.sample_delay()?;

        Ok(())
    }
}

/// Parse an I2C address given as hexadecimal digits.
///
/// `i2cdetect` prints addresses in hex without a prefix, so `68` means
/// `0x68`. A `0x` prefix is accepted as well.
pub fn parse_hex_address(s: &str) -> Result<u8, String> {
    let digits = s
        .trim()
        .strip_prefix("0x")
        .or_else(|| s.trim().strip_prefix("0X"))
        .unwrap_or(s.trim());

    let address = u8::from_str_radix(digits, 16)
        .map_err(|e| format!("invalid hex I2C address '{}': {}", s, e))?;

    if address > 0x7F {
        return Err(format!("I2C address 0x{:02x} is not a 7-bit address", address));
    }

    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> ImuBridgeConfig {
        ImuBridgeConfig {
            bridge: RosbridgeConfig::new("192.168.1.20"),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_full_config() {
        let json = r#"{
            bridge: { host: "192.168.1.20", port: 9091 },
            sensor: {
                i2c_bus: 0,
                i2c_address: 105,
                fs_sel: 2,
                afs_sel: 1,
                delay_secs: 0.02,
            },
            debug: true,
            logging: { level: "debug" },
        }"#;

        let config: ImuBridgeConfig = json5::from_str(json).unwrap();
        config.validate().unwrap();

        assert_eq!(config.bridge.url(), "ws://192.168.1.20:9091");
        assert_eq!(config.sensor.i2c_bus, 0);
        assert_eq!(config.sensor.i2c_address, 0x69);
        assert_eq!(config.sensor.gyro_range().unwrap(), GyroRange::Dps1000);
        assert_eq!(config.sensor.accel_range().unwrap(), AccelRange::G4);
        assert_eq!(
            config.sensor.sample_delay().unwrap(),
            Duration::from_millis(20)
        );
        assert!(config.debug);
    }

    #[test]
    fn test_defaults() {
        let config: ImuBridgeConfig = json5::from_str("{}").unwrap();

        assert_eq!(config.sensor, SensorSettings::default());
        assert_eq!(config.sensor.i2c_bus, 1);
        assert_eq!(config.sensor.i2c_address, 0x68);
        assert_eq!(config.sensor.fs_sel, 0);
        assert_eq!(config.sensor.afs_sel, 3);
        assert_eq!(config.sensor.delay_secs, 0.1);
        assert_eq!(config.bridge.port, 9090);
        assert!(!config.debug);
    }

    #[test]
    fn test_validate_missing_url() {
        let config = ImuBridgeConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingUrl)));
    }

    #[test]
    fn test_validate_selectors() {
        let mut config = valid_config();
        config.sensor.fs_sel = 4;
        assert!(matches!(config.validate(), Err(ConfigError::GyroSelector(4))));

        let mut config = valid_config();
        config.sensor.afs_sel = 9;
        assert!(matches!(config.validate(), Err(ConfigError::AccelSelector(9))));
    }

    #[test]
    fn test_validate_delay() {
        for delay in [0.0, -0.5, f64::NAN, f64::INFINITY] {
            let mut config = valid_config();
            config.sensor.delay_secs = delay;
            assert!(
                matches!(config.validate(), Err(ConfigError::Validation(_))),
                "delay {} should be rejected",
                delay
            );
        }
    }

    #[test]
    fn test_validate_address() {
        let mut config = valid_config();
        config.sensor.i2c_address = 0x80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_hex_address() {
        assert_eq!(parse_hex_address("68"), Ok(0x68));
        assert_eq!(parse_hex_address("0x68"), Ok(0x68));
        assert_eq!(parse_hex_address("0X69"), Ok(0x69));
        assert_eq!(parse_hex_address(" 1e "), Ok(0x1E));
        assert!(parse_hex_address("zz").is_err());
        assert!(parse_hex_address("80").is_err());
        assert!(parse_hex_address("").is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{ bridge: {{ host: "robot" }}, sensor: {{ fs_sel: 1 }} }}"#).unwrap();

        let config = ImuBridgeConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.bridge.host, "robot");
        assert_eq!(config.sensor.fs_sel, 1);
        config.validate().unwrap();
    }

    #[test]
    fn test_load_invalid_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{ bridge: ").unwrap();

        let result = ImuBridgeConfig::load_from_file(file.path());
        assert!(matches!(result, Err(ConfigError::Load(_))));
    }
}
