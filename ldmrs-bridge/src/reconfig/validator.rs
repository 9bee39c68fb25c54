//! Configuration validation
//!
//! Normalizes a requested configuration instead of rejecting it. The only
//! invariant enforced here is the angle ordering `start_angle > end_angle`
//! with both angles finite:
//!
//! - a non-finite `end_angle` is replaced by the LD-MRS default end angle
//! - a `start_angle` that is not finite or not above `end_angle` moves to
//!   `end_angle + margin`, or to the next representable value above
//!   `end_angle` when the margin is lost to rounding
//!
//! Each replacement logs one warning.

use crate::core::driver_config::{DriverConfiguration, DEFAULT_END_ANGLE};

use super::LOG_TARGET;

/// Encoder ticks per full rotation of the LD-MRS mirror
pub const TICKS_PER_ROTATION: u32 = 11520;

/// One angular tick in radians (1/32 degree)
pub const ANGLE_TICK_RAD: f64 = 2.0 * std::f64::consts::PI / TICKS_PER_ROTATION as f64;

/// Angle-ordering validator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfigValidator {
    margin: f64,
}

impl ConfigValidator {
    /// Validator with a margin of `ticks` device angle ticks (at least one)
    pub fn with_margin_ticks(ticks: u32) -> Self {
        Self {
            margin: ticks.max(1) as f64 * ANGLE_TICK_RAD,
        }
    }

    /// Margin added above `end_angle` when correcting (rad)
    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Normalize a requested configuration. Never fails.
    pub fn validate(&self, mut requested: DriverConfiguration) -> DriverConfiguration {
        if !requested.end_angle.is_finite() {
            log::warn!(
                target: LOG_TARGET,
                "End angle {} is not finite. Using default end_angle {:.6}",
                requested.end_angle,
                DEFAULT_END_ANGLE
            );
            requested.end_angle = DEFAULT_END_ANGLE;
        }

        // Negated so NaN takes the correction path
        if !(requested.start_angle.is_finite() && requested.start_angle > requested.end_angle) {
            let corrected = self.corrected_start(requested.end_angle);
            log::warn!(
                target: LOG_TARGET,
                "Start angle must be greater than end angle. Adjusting start_angle from {:.6} to {:.6} (end_angle {:.6})",
                requested.start_angle,
                corrected,
                requested.end_angle
            );
            requested.start_angle = corrected;
        }
        requested
    }

    /// Smallest start angle this validator accepts above a finite `end`
    fn corrected_start(&self, end: f64) -> f64 {
        let start = end + self.margin;
        if start > end {
            start
        } else {
            next_above(end)
        }
    }
}

/// Next representable `f64` above a finite `x`
fn next_above(x: f64) -> f64 {
    if x == 0.0 {
        return f64::from_bits(1);
    }
    let bits = x.to_bits();
    if x > 0.0 {
        f64::from_bits(bits + 1)
    } else {
        f64::from_bits(bits - 1)
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::with_margin_ticks(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(start: f64, end: f64) -> DriverConfiguration {
        DriverConfiguration {
            start_angle: start,
            end_angle: end,
            ..DriverConfiguration::default()
        }
    }

    #[test]
    fn test_valid_config_is_identity() {
        let validator = ConfigValidator::default();
        let requested = config(0.8, -1.0);
        assert_eq!(validator.validate(requested.clone()), requested);
    }

    #[test]
    fn test_inverted_angles_are_corrected_strictly() {
        let validator = ConfigValidator::default();
        for (start, end) in [(1.0, 2.0), (0.5, 0.5), (-1.0, 0.0), (0.0, 0.0)] {
            let validated = validator.validate(config(start, end));
            assert!(validated.start_angle > validated.end_angle);
            assert_eq!(validated.end_angle, end);
            assert!((validated.start_angle - (end + ANGLE_TICK_RAD)).abs() < 1e-12);
        }
    }

    #[test]
    fn test_other_fields_pass_through() {
        let validator = ConfigValidator::default();
        let requested = DriverConfiguration {
            start_angle: 0.1,
            end_angle: 0.2,
            frame_id: "front_lidar".to_string(),
            scan_frequency: 9999,
            ignore_near_range: true,
            ..DriverConfiguration::default()
        };
        let validated = validator.validate(requested.clone());
        assert_eq!(validated.frame_id, "front_lidar");
        assert_eq!(validated.scan_frequency, 9999);
        assert!(validated.ignore_near_range);
        assert_eq!(validated.end_angle, requested.end_angle);
    }

    #[test]
    fn test_nan_start_is_corrected() {
        let validator = ConfigValidator::default();
        let validated = validator.validate(config(f64::NAN, 0.5));
        assert!(validated.start_angle > validated.end_angle);
        assert_eq!(validated.end_angle, 0.5);
        assert!((validated.start_angle - (0.5 + ANGLE_TICK_RAD)).abs() < 1e-12);
    }

    #[test]
    fn test_infinite_start_is_corrected() {
        let validator = ConfigValidator::default();
        let validated = validator.validate(config(f64::INFINITY, -0.5));
        assert!(validated.start_angle.is_finite());
        assert!(validated.start_angle > validated.end_angle);
    }

    #[test]
    fn test_non_finite_end_falls_back_to_default() {
        let validator = ConfigValidator::default();
        for end in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let validated = validator.validate(config(0.5, end));
            assert_eq!(validated.end_angle, DEFAULT_END_ANGLE);
            assert_eq!(validated.start_angle, 0.5);
        }

        let validated = validator.validate(config(f64::NAN, f64::NAN));
        assert_eq!(validated.end_angle, DEFAULT_END_ANGLE);
        assert!(validated.start_angle > validated.end_angle);
    }

    #[test]
    fn test_large_magnitude_stays_strict() {
        let validator = ConfigValidator::default();
        for end in [1e17, -1e17, 1e300, f64::MAX / 2.0] {
            let validated = validator.validate(config(end, end));
            assert_eq!(validated.end_angle, end);
            assert!(validated.start_angle.is_finite());
            assert!(validated.start_angle > validated.end_angle);
        }
    }

    #[test]
    fn test_next_above() {
        assert!(next_above(0.0) > 0.0);
        assert!(next_above(-0.0) > 0.0);
        for x in [1.0, -1.0, 1e17, -1e17, f64::MIN_POSITIVE] {
            assert!(next_above(x) > x);
        }
        assert_eq!(next_above(-f64::MIN_POSITIVE * f64::EPSILON), -0.0);
    }

    #[test]
    fn test_margin_ticks() {
        assert_eq!(ConfigValidator::with_margin_ticks(0).margin(), ANGLE_TICK_RAD);
        let two = ConfigValidator::with_margin_ticks(2);
        assert!((two.margin() - 2.0 * ANGLE_TICK_RAD).abs() < 1e-15);
    }
}
