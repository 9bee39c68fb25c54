//! Live reconfiguration of scan parameters
//!
//! - [`validator`]: Normalizes requested configurations (`start_angle > end_angle`)
//! - [`frequency`]: Selector to Hz table
//! - [`controller`]: Owns the current configuration and applies it to the device
//! - [`server`]: Message-passing entry point serializing apply requests

pub mod controller;
pub mod frequency;
pub mod server;
pub mod validator;

pub use controller::{ApplyOutcome, ReconfigureController};
pub use frequency::ScanFrequency;
pub use server::{ReconfigureHandle, ReconfigureServer};
pub use validator::{ConfigValidator, ANGLE_TICK_RAD};

/// Log target for reconfiguration records
pub const LOG_TARGET: &str = "ldmrs_bridge::reconfig";
