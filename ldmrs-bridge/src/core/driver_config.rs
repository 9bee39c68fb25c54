//! Driver configuration: scan angle window, frequency selector and
//! pass-through display parameters.

use serde::{Deserialize, Serialize};

/// Default start angle (50°)
pub const DEFAULT_START_ANGLE: f64 = 50.0 * std::f64::consts::PI / 180.0;
/// Default end angle (-60°)
pub const DEFAULT_END_ANGLE: f64 = -60.0 * std::f64::consts::PI / 180.0;
/// Default scan frequency selector (12.5 Hz)
pub const DEFAULT_SCAN_FREQUENCY: i32 = 1250;

/// Active azimuth sweep in radians.
///
/// The device's angle convention decreases across the sweep, so a valid window
/// has `start > end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanAngleWindow {
    pub start: f64,
    pub end: f64,
}

impl ScanAngleWindow {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// `start > end`, strictly
    pub fn is_ordered(&self) -> bool {
        self.start > self.end
    }
}

/// Complete driver configuration. Exactly one is live at a time, owned by the
/// [`crate::reconfig::ReconfigureController`].
///
/// `scan_frequency` is kept as the raw selector so an out-of-range value can
/// reach the controller and be reported rather than failing to deserialize.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DriverConfiguration {
    /// Start angle (rad)
    #[serde(default = "default_start_angle")]
    pub start_angle: f64,

    /// End angle (rad)
    #[serde(default = "default_end_angle")]
    pub end_angle: f64,

    /// Frame label attached to published data
    #[serde(default = "default_frame_id")]
    pub frame_id: String,

    /// Scan frequency selector: 1250, 2500 or 5000
    #[serde(default = "default_scan_frequency")]
    pub scan_frequency: i32,

    /// Angle offset for the sync signal (rad)
    #[serde(default)]
    pub sync_angle_offset: f64,

    /// Angular resolution type (0 focused, 1 constant, 2 flexible)
    #[serde(default = "default_angular_resolution_type")]
    pub angular_resolution_type: i32,

    /// Layer range reduction mode
    #[serde(default)]
    pub layer_range_reduction: i32,

    /// Ignore near-range echoes
    #[serde(default)]
    pub ignore_near_range: bool,

    /// Reduce sensitivity in case of dazzle
    #[serde(default)]
    pub sensitivity_control: bool,
}

fn default_start_angle() -> f64 {
    DEFAULT_START_ANGLE
}
fn default_end_angle() -> f64 {
    DEFAULT_END_ANGLE
}
fn default_frame_id() -> String {
    "ldmrs".to_string()
}
fn default_scan_frequency() -> i32 {
    DEFAULT_SCAN_FREQUENCY
}
fn default_angular_resolution_type() -> i32 {
    1
}

impl DriverConfiguration {
    /// Scan angle window of this configuration
    pub fn window(&self) -> ScanAngleWindow {
        ScanAngleWindow::new(self.start_angle, self.end_angle)
    }
}

impl Default for DriverConfiguration {
    fn default() -> Self {
        Self {
            start_angle: default_start_angle(),
            end_angle: default_end_angle(),
            frame_id: default_frame_id(),
            scan_frequency: default_scan_frequency(),
            sync_angle_offset: 0.0,
            angular_resolution_type: default_angular_resolution_type(),
            layer_range_reduction: 0,
            ignore_near_range: false,
            sensitivity_control: false,
        }
    }
}
