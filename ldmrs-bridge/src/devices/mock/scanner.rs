//! Mock LD-MRS command channel

use crate::core::device::ScannerDevice;
use crate::core::driver_config::ScanAngleWindow;
use crate::error::DeviceError;
use parking_lot::Mutex;

/// Device-level command recorded by [`MockScanner`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceCall {
    /// `(start, end)` in radians
    SetScanAngles(f64, f64),
    /// Frequency in Hz
    SetScanFrequency(f64),
}

#[derive(Debug, Default)]
struct MockScannerState {
    calls: Vec<DeviceCall>,
    window: Option<ScanAngleWindow>,
    frequency_hz: Option<f64>,
    reject_angles: Option<String>,
    reject_frequency: Option<String>,
}

/// Scanner that records every command and enforces the firmware's angle
/// ordering check (`start > end` after each command).
#[derive(Debug, Default)]
pub struct MockScanner {
    state: Mutex<MockScannerState>,
}

impl MockScanner {
    /// Create a new mock scanner
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands received so far, including rejected ones
    pub fn calls(&self) -> Vec<DeviceCall> {
        self.state.lock().calls.clone()
    }

    /// Drain recorded commands
    pub fn take_calls(&self) -> Vec<DeviceCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    /// Recorded set-angle commands as `(start, end)`
    pub fn angle_calls(&self) -> Vec<(f64, f64)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::SetScanAngles(start, end) => Some((start, end)),
                DeviceCall::SetScanFrequency(_) => None,
            })
            .collect()
    }

    /// Recorded set-frequency commands in Hz
    pub fn frequency_calls(&self) -> Vec<f64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                DeviceCall::SetScanFrequency(hz) => Some(hz),
                DeviceCall::SetScanAngles(..) => None,
            })
            .collect()
    }

    /// Window the device currently holds
    pub fn window(&self) -> Option<ScanAngleWindow> {
        self.state.lock().window
    }

    /// Frequency the device currently runs at
    pub fn frequency_hz(&self) -> Option<f64> {
        self.state.lock().frequency_hz
    }

    /// Reject subsequent set-angle commands with `reason`; `None` accepts again
    pub fn reject_angles(&self, reason: Option<&str>) {
        self.state.lock().reject_angles = reason.map(str::to_string);
    }

    /// Reject subsequent set-frequency commands with `reason`; `None` accepts again
    pub fn reject_frequency(&self, reason: Option<&str>) {
        self.state.lock().reject_frequency = reason.map(str::to_string);
    }
}

impl ScannerDevice for MockScanner {
    fn set_scan_angles(&self, start: f64, end: f64) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(DeviceCall::SetScanAngles(start, end));

        if let Some(reason) = &state.reject_angles {
            return Err(DeviceError::new(reason.clone()));
        }

        let window = ScanAngleWindow::new(start, end);
        if !window.is_ordered() {
            return Err(DeviceError::new(format!(
                "start angle {:.6} must be greater than end angle {:.6}",
                start, end
            )));
        }

        state.window = Some(window);
        log::trace!("Mock scanner angles set: {:.6} .. {:.6}", start, end);
        Ok(())
    }

    fn set_scan_frequency(&self, hz: f64) -> Result<(), DeviceError> {
        let mut state = self.state.lock();
        state.calls.push(DeviceCall::SetScanFrequency(hz));

        if let Some(reason) = &state.reject_frequency {
            return Err(DeviceError::new(reason.clone()));
        }

        state.frequency_hz = Some(hz);
        log::trace!("Mock scanner frequency set: {} Hz", hz);
        Ok(())
    }
}
