//! Core abstractions shared by the dispatcher and the reconfiguration controller.
//!
//! - [`types`]: Sensor payloads, datatype tags and timestamps
//! - [`driver_config`]: The live driver configuration
//! - [`device`]: Traits the device manager implements

pub mod device;
pub mod driver_config;
pub mod types;
