//! Device-manager boundary traits

use crate::core::types::SensorPayload;
use crate::error::DeviceError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Sensor type tag used to look devices up in the device manager.
///
/// In TOML: `sensor_type = "ldmrs"` or `sensor_type = { other = 5 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// SICK LD-MRS laser scanner
    #[default]
    Ldmrs,
    /// Any other device type known to the manager
    Other(u16),
}

/// Command channel to one connected scanner.
///
/// Implementations are owned by the device manager. This crate only borrows a
/// handle for the duration of one reconfiguration.
pub trait ScannerDevice: Send + Sync {
    /// Set the scan angle window in radians. Both boundaries are sent in one
    /// command; the device requires `start > end` after every command.
    fn set_scan_angles(&self, start: f64, end: f64) -> Result<(), DeviceError>;

    /// Set the scan frequency in Hz
    fn set_scan_frequency(&self, hz: f64) -> Result<(), DeviceError>;
}

/// Device manager lookup used by the reconfiguration controller
pub trait DeviceManager: Send + Sync {
    /// First connected device of the given type, if any.
    ///
    /// The handle is held only for the duration of one reconfiguration.
    fn first_device_by_type(&self, kind: SourceType) -> Option<Arc<dyn ScannerDevice>>;
}

/// Receiver of payloads pushed by the device manager, one call per payload.
///
/// Must not block beyond formatting and logging, and must never fail.
pub trait PayloadSink: Send + Sync {
    fn on_payload(&self, payload: &SensorPayload);
}
