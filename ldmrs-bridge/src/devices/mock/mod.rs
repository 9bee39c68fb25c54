//! Mock device manager for hardware-free operation and tests
//!
//! | Component | Role |
//! |-----------|------|
//! | [`MockScanner`] | Records angle/frequency commands, enforces `start > end`, injectable rejections |
//! | [`MockDeviceManager`] | Connect/disconnect a scanner at runtime, fan payloads out to sinks |
//! | [`PayloadGenerator`] | Thread pushing one scan plus one rotating payload kind per scan period |

pub mod generator;
pub mod manager;
pub mod scanner;

pub use generator::{scan_period_payloads, synthetic_payload, PayloadGenerator};
pub use manager::MockDeviceManager;
pub use scanner::{DeviceCall, MockScanner};
