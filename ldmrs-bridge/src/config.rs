//! Configuration for the LD-MRS bridge
//!
//! Loads configuration from a TOML file. Every key has a default, so an empty
//! file (or no file at all) yields a working LD-MRS setup.
//!
//! ```toml
//! [device]
//! name = "LDMRS-1"
//! source_id = 1
//! sensor_type = "ldmrs"
//!
//! [driver]
//! start_angle = 0.872664   # 50°
//! end_angle = -1.047198    # -60°
//! frame_id = "ldmrs"
//! scan_frequency = 1250    # 1250 | 2500 | 5000
//!
//! [validation]
//! angle_margin_ticks = 1
//!
//! [simulation]
//! enabled = true
//! scanner_heads = 2
//! points_per_scan = 600
//!
//! [logging]
//! level = "info"
//! ```

use crate::core::device::SourceType;
use crate::core::driver_config::DriverConfiguration;
use crate::error::{Error, Result};
use crate::reconfig::ConfigValidator;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub device: DeviceConfig,
    /// Initial driver configuration applied at startup
    #[serde(default)]
    pub driver: DriverConfiguration,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Device identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// Human-readable device name
    #[serde(default = "default_device_name")]
    pub name: String,
    /// Source id reported in payloads from this device
    #[serde(default = "default_source_id")]
    pub source_id: u16,
    /// Type under which the scanner is looked up in the device manager
    #[serde(default)]
    pub sensor_type: SourceType,
}

fn default_device_name() -> String {
    "LDMRS-1".to_string()
}
fn default_source_id() -> u16 {
    1
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: default_device_name(),
            source_id: default_source_id(),
            sensor_type: SourceType::Ldmrs,
        }
    }
}

/// Angle validation tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ValidationConfig {
    /// Minimum gap between corrected start angle and end angle, in device ticks
    #[serde(default = "default_angle_margin_ticks")]
    pub angle_margin_ticks: u32,
}

fn default_angle_margin_ticks() -> u32 {
    1
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            angle_margin_ticks: default_angle_margin_ticks(),
        }
    }
}

impl ValidationConfig {
    /// Build the validator described by this section
    pub fn validator(&self) -> ConfigValidator {
        ConfigValidator::with_margin_ticks(self.angle_margin_ticks)
    }
}

/// Mock payload generator settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Run the payload generator
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Scanner heads contributing to each scan
    #[serde(default = "default_scanner_heads")]
    pub scanner_heads: u8,
    /// Points reported per scan
    #[serde(default = "default_points_per_scan")]
    pub points_per_scan: usize,
}

fn default_true() -> bool {
    true
}
fn default_scanner_heads() -> u8 {
    2
}
fn default_points_per_scan() -> usize {
    600
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            scanner_heads: default_scanner_heads(),
            points_per_scan: default_points_per_scan(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file
    ///
    /// # Example
    /// ```no_run
    /// use ldmrs_bridge::config::AppConfig;
    ///
    /// let config = AppConfig::from_file("ldmrs-bridge.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.check()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Reject values that can never work. Angle ordering is not checked here:
    /// the validator corrects it at apply time.
    fn check(&self) -> Result<()> {
        if !self.driver.start_angle.is_finite() || !self.driver.end_angle.is_finite() {
            return Err(Error::Config("scan angles must be finite".to_string()));
        }
        if self.driver.frame_id.is_empty() {
            return Err(Error::Config("frame_id must not be empty".to_string()));
        }
        Ok(())
    }
}
