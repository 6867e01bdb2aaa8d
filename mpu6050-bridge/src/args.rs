//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::config::{ConfigError, ImuBridgeConfig, parse_hex_address};

/// Sends MPU6050 data to ROS using websocket+rosbridge.
#[derive(Parser, Debug, Clone)]
#[command(name = "mpu6050-bridge")]
#[command(about = "Sends MPU6050 data to ROS using websocket+rosbridge")]
#[command(version)]
pub struct Args {
    /// Rosbridge host (IP address or hostname)
    #[arg(long, required_unless_present = "config")]
    pub url: Option<String>,

    /// Rosbridge WebSocket port [default: 9090]
    #[arg(long)]
    pub port: Option<u16>,

    /// Seconds between the start of two reads [default: 0.1]
    #[arg(long)]
    pub delay: Option<f64>,

    /// Gyroscope full-scale range, 0-3 for ±250/500/1000/2000 °/s [default: 0]
    #[arg(long = "FS_SEL")]
    pub fs_sel: Option<u8>,

    /// Accelerometer full-scale range, 0-3 for ±2/4/8/16 g [default: 3]
    #[arg(long = "AFS_SEL")]
    pub afs_sel: Option<u8>,

    /// I2C bus number, from `i2cdetect -l` [default: 1]
    #[arg(long = "i2c_bus")]
    pub i2c_bus: Option<u32>,

    /// I2C address in hex, from `i2cdetect -y <i2c_bus>` [default: 68]
    #[arg(long = "i2c_address", value_parser = parse_hex_address)]
    pub i2c_address: Option<u8>,

    /// Print the values
    #[arg(long)]
    pub debug: bool,

    /// Path to configuration file (JSON5 format)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl Args {
    /// Build the effective configuration: defaults, then the config file,
    /// then command-line flags. The result is validated.
    pub fn resolve(&self) -> Result<ImuBridgeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ImuBridgeConfig::load_from_file(path)?,
            None => ImuBridgeConfig::default(),
        };

        self.apply(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Overlay the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ImuBridgeConfig) {
        if let Some(url) = &self.url {
            config.bridge.host = url.clone();
        }
        if let Some(port) = self.port {
            config.bridge.port = port;
        }
        if let Some(delay) = self.delay {
            config.sensor.delay_secs = delay;
        }
        if let Some(fs_sel) = self.fs_sel {
            config.sensor.fs_sel = fs_sel;
        }
        if let Some(afs_sel) = self.afs_sel {
            config.sensor.afs_sel = afs_sel;
        }
        if let Some(bus) = self.i2c_bus {
            config.sensor.i2c_bus = bus;
        }
        if let Some(address) = self.i2c_address {
            config.sensor.i2c_address = address;
        }
        if self.debug {
            config.debug = true;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("mpu6050-bridge").chain(args.iter().copied()))
    }

    #[test]
    fn test_url_only_uses_defaults() {
        let config = parse(&["--url", "192.168.1.20"]).unwrap().resolve().unwrap();

        assert_eq!(config.bridge.url(), "ws://192.168.1.20:9090");
        assert_eq!(config.sensor.delay_secs, 0.1);
        assert_eq!(config.sensor.fs_sel, 0);
        assert_eq!(config.sensor.afs_sel, 3);
        assert_eq!(config.sensor.i2c_bus, 1);
        assert_eq!(config.sensor.i2c_address, 0x68);
        assert!(!config.debug);
    }

    #[test]
    fn test_all_flags() {
        let args = parse(&[
            "--url",
            "robot.local",
            "--port",
            "9091",
            "--delay",
            "0.05",
            "--FS_SEL",
            "3",
            "--AFS_SEL",
            "0",
            "--i2c_bus",
            "0",
            "--i2c_address",
            "69",
            "--debug",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = args.resolve().unwrap();

        assert_eq!(config.bridge.url(), "ws://robot.local:9091");
        assert_eq!(config.sensor.delay_secs, 0.05);
        assert_eq!(config.sensor.fs_sel, 3);
        assert_eq!(config.sensor.afs_sel, 0);
        assert_eq!(config.sensor.i2c_bus, 0);
        assert_eq!(config.sensor.i2c_address, 0x69);
        assert!(config.debug);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_url_is_required_without_config() {
        let err = parse(&["--delay", "0.2"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_out_of_range_selector_is_a_config_error() {
        let args = parse(&["--url", "localhost", "--FS_SEL", "4"]).unwrap();
        assert!(matches!(args.resolve(), Err(ConfigError::GyroSelector(4))));

        let args = parse(&["--url", "localhost", "--AFS_SEL", "7"]).unwrap();
        assert!(matches!(args.resolve(), Err(ConfigError::AccelSelector(7))));
    }

    #[test]
    fn test_bad_address_is_rejected_by_parser() {
        assert!(parse(&["--url", "localhost", "--i2c_address", "g1"]).is_err());
        assert!(parse(&["--url", "localhost", "--i2c_address", "ff"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{
                bridge: {{ host: "from-file", port: 9000 }},
                sensor: {{ fs_sel: 1, delay_secs: 0.5 }},
            }}"#
        )
        .unwrap();
        let path = file.path().to_str().unwrap();

        let config = parse(&["--config", path]).unwrap().resolve().unwrap();
        assert_eq!(config.bridge.host, "from-file");
        assert_eq!(config.sensor.fs_sel, 1);

        let config = parse(&["--config", path, "--url", "cli-host", "--delay", "0.25"])
            .unwrap()
            .resolve()
            .unwrap();
        assert_eq!(config.bridge.url(), "ws://cli-host:9000");
        assert_eq!(config.sensor.delay_secs, 0.25);
        assert_eq!(config.sensor.fs_sel, 1);
    }
}
