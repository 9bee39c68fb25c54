//! LD-MRS bridge - dispatch and live reconfiguration core for SICK LD-MRS
//! laser scanners
//!
//! Sits between the device manager (connection and protocol handling) and
//! the application:
//!
//! - [`dispatch`]: Classifies every payload the device manager delivers and logs a summary
//! - [`reconfig`]: Validates scan-parameter changes and applies them to the live scanner
//! - [`devices::mock`]: Hardware-free device manager for tests and demos

pub mod app;
pub mod config;
pub mod core;
pub mod devices;
pub mod dispatch;
pub mod error;
pub mod reconfig;

// Re-export commonly used types
pub use config::AppConfig;
pub use crate::core::device::{DeviceManager, PayloadSink, ScannerDevice, SourceType};
pub use crate::core::driver_config::{DriverConfiguration, ScanAngleWindow};
pub use crate::core::types::SensorPayload;
pub use error::{ApplyError, Error, Result};
