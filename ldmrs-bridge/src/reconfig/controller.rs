//! Reconfiguration controller
//!
//! Owns the live [`DriverConfiguration`] and pushes it to the scanner.
//!
//! # Apply sequence
//!
//! ```text
//! requested ──▶ validate ──▶ store as current ──▶ lookup device
//!                                                   │
//!                          none ◀───────────────────┤ (warn, Ok(NoDevice))
//!                                                   ▼
//!                                         set scan angles (1 or 2 calls)
//!                                                   ▼
//!                                         map selector ──▶ set scan frequency
//! ```
//!
//! The current configuration advances before any device command is sent, so
//! after a device failure the stored configuration and the device state may
//! differ. The error returned to the caller reports the first failing step.
//!
//! # Angle ordering
//!
//! The device rejects any window with `start <= end`, even transiently. When
//! the new window does not overlap the active one, one boundary is moved
//! first so every intermediate window stays ordered:
//!
//! | Condition | Commands |
//! |-----------|----------|
//! | `new.start < active.end` | `(active.start, new.end)`, then `(new.start, new.end)` |
//! | `new.end >= active.start` | `(new.start, active.end)`, then `(new.start, new.end)` |
//! | otherwise | `(new.start, new.end)` |
//!
//! The active window is the last one the connected device accepted. A failed
//! lookup or a different device handle falls back to the previously stored
//! configuration.

use super::frequency::ScanFrequency;
use super::validator::ConfigValidator;
use super::LOG_TARGET;
use crate::core::device::{DeviceManager, ScannerDevice, SourceType};
use crate::core::driver_config::{DriverConfiguration, ScanAngleWindow};
use crate::error::ApplyError;
use parking_lot::{Mutex, RwLock};
use std::sync::{Arc, Weak};

/// Successful result of [`ReconfigureController::apply_configuration`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// Angles and frequency were sent to the device
    Applied,
    /// No device connected; only the stored configuration changed
    NoDevice,
}

/// Window last accepted by a specific device
struct AppliedWindow {
    device: Weak<dyn ScannerDevice>,
    window: ScanAngleWindow,
}

/// Owns the current configuration and applies it to the live device.
///
/// Callers must serialize `apply_configuration`; readers of
/// [`current_configuration`](Self::current_configuration) may run concurrently
/// and always observe a complete, validated configuration.
pub struct ReconfigureController {
    manager: Arc<dyn DeviceManager>,
    source_type: SourceType,
    validator: ConfigValidator,
    current: RwLock<DriverConfiguration>,
    /// Last window accepted by the connected device
    applied: Mutex<Option<AppliedWindow>>,
}

impl ReconfigureController {
    /// Create a controller. `initial` is validated before being stored.
    pub fn new(
        manager: Arc<dyn DeviceManager>,
        initial: DriverConfiguration,
        validator: ConfigValidator,
    ) -> Self {
        Self {
            manager,
            source_type: SourceType::Ldmrs,
            current: RwLock::new(validator.validate(initial)),
            validator,
            applied: Mutex::new(None),
        }
    }

    /// Look devices up under a different sensor type
    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.source_type = source_type;
        self
    }

    /// Snapshot of the current configuration
    pub fn current_configuration(&self) -> DriverConfiguration {
        self.current.read().clone()
    }

    /// Validate, store and apply a new configuration
    pub fn apply_configuration(
        &self,
        requested: DriverConfiguration,
    ) -> Result<ApplyOutcome, ApplyError> {
        let config = self.validator.validate(requested);
        let previous = std::mem::replace(&mut *self.current.write(), config.clone());

        log::info!(
            target: LOG_TARGET,
            "Configuration: start_angle={:.6} end_angle={:.6} frame_id={} scan_frequency={}",
            config.start_angle,
            config.end_angle,
            config.frame_id,
            config.scan_frequency
        );

        let Some(device) = self.manager.first_device_by_type(self.source_type) else {
            // Whatever connects next starts from the stored configuration
            *self.applied.lock() = None;
            log::warn!(target: LOG_TARGET, "update_config: no connection to LD-MRS!");
            return Ok(ApplyOutcome::NoDevice);
        };

        let active = self
            .active_window(&device)
            .unwrap_or_else(|| previous.window());
        self.apply_angles(&device, active, config.window())?;
        Self::apply_frequency(device.as_ref(), config.scan_frequency)?;

        Ok(ApplyOutcome::Applied)
    }

    /// Window `device` last accepted from this controller, if it is the same
    /// device that accepted it
    fn active_window(&self, device: &Arc<dyn ScannerDevice>) -> Option<ScanAngleWindow> {
        let current = Arc::downgrade(device);
        self.applied
            .lock()
            .as_ref()
            .filter(|applied| applied.device.ptr_eq(&current))
            .map(|applied| applied.window)
    }

    fn apply_angles(
        &self,
        device: &Arc<dyn ScannerDevice>,
        active: ScanAngleWindow,
        target: ScanAngleWindow,
    ) -> Result<(), ApplyError> {
        for window in angle_commands(active, target) {
            log::debug!(
                target: LOG_TARGET,
                "Setting scan angles: start={:.6} end={:.6}",
                window.start,
                window.end
            );
            if let Err(e) = device.set_scan_angles(window.start, window.end) {
                log::error!(target: LOG_TARGET, "Failed to set scan angles: {}", e);
                return Err(e.into());
            }
            *self.applied.lock() = Some(AppliedWindow {
                device: Arc::downgrade(device),
                window,
            });
        }
        Ok(())
    }

    fn apply_frequency(device: &dyn ScannerDevice, selector: i32) -> Result<(), ApplyError> {
        let frequency = ScanFrequency::try_from(selector).inspect_err(|_| {
            log::error!(target: LOG_TARGET, "Unknown scan frequency: {}", selector);
        })?;

        if let Err(e) = device.set_scan_frequency(frequency.hz()) {
            log::error!(
                target: LOG_TARGET,
                "Failed to set scan frequency {} Hz: {}",
                frequency.hz(),
                e
            );
            return Err(e.into());
        }
        Ok(())
    }
}

/// Angle windows to send, in order, to move the device from `active` to `target`
fn angle_commands(active: ScanAngleWindow, target: ScanAngleWindow) -> Vec<ScanAngleWindow> {
    if target.start < active.end {
        vec![ScanAngleWindow::new(active.start, target.end), target]
    } else if target.end >= active.start {
        vec![ScanAngleWindow::new(target.start, active.end), target]
    } else {
        vec![target]
    }
}
