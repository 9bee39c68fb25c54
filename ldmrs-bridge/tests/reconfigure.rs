mod common;

use common::{init_capture, take_matching, take_records};
use ldmrs_bridge::devices::mock::{DeviceCall, MockDeviceManager, MockScanner};
use ldmrs_bridge::reconfig::{
    ApplyOutcome, ConfigValidator, ReconfigureController, ANGLE_TICK_RAD, LOG_TARGET,
};
use ldmrs_bridge::{ApplyError, DriverConfiguration, SourceType};
use log::Level;
use std::sync::Arc;

fn config(start: f64, end: f64, freq: i32) -> DriverConfiguration {
    DriverConfiguration {
        start_angle: start,
        end_angle: end,
        scan_frequency: freq,
        ..DriverConfiguration::default()
    }
}

fn connected_controller(
    initial: DriverConfiguration,
) -> (ReconfigureController, Arc<MockScanner>) {
    let manager = Arc::new(MockDeviceManager::new());
    let scanner = manager.connect(SourceType::Ldmrs);
    let controller = ReconfigureController::new(manager, initial, ConfigValidator::default());
    (controller, scanner)
}

#[test]
fn validator_warns_once_on_inverted_angles() {
    init_capture();
    let validator = ConfigValidator::default();

    let corrected = validator.validate(config(0.2, 0.7, 1250));
    assert!(corrected.start_angle > corrected.end_angle);
    assert_eq!(take_matching(LOG_TARGET, Level::Warn).len(), 1);

    let equal = validator.validate(config(0.7, 0.7, 1250));
    assert!(equal.start_angle > equal.end_angle);
    assert_eq!(take_matching(LOG_TARGET, Level::Warn).len(), 1);
}

#[test]
fn validator_is_silent_identity_on_valid_angles() {
    init_capture();
    let requested = config(0.9, -0.9, 2500);
    let validated = ConfigValidator::default().validate(requested.clone());
    assert_eq!(validated, requested);
    assert!(take_records().is_empty());
}

#[test]
fn no_device_updates_config_and_warns() {
    init_capture();
    let manager = Arc::new(MockDeviceManager::new());
    let controller = ReconfigureController::new(
        manager,
        DriverConfiguration::default(),
        ConfigValidator::default(),
    );
    take_records();

    let result = controller.apply_configuration(config(1.0, 2.0, 2500));
    assert_eq!(result, Ok(ApplyOutcome::NoDevice));

    let current = controller.current_configuration();
    assert!(current.start_angle > current.end_angle);
    assert_eq!(current.end_angle, 2.0);
    assert!((current.start_angle - (2.0 + ANGLE_TICK_RAD)).abs() < 1e-12);
    assert_eq!(current.scan_frequency, 2500);

    let warnings = take_matching(LOG_TARGET, Level::Warn);
    let missing_device: Vec<_> = warnings
        .iter()
        .filter(|r| r.message.contains("no connection"))
        .collect();
    assert_eq!(missing_device.len(), 1);
    // The other warning is the angle correction
    assert_eq!(warnings.len(), 2);
}

#[test]
fn end_angle_applied_first_when_new_start_below_active_end() {
    init_capture();
    let (controller, scanner) = connected_controller(config(1.5, 1.0, 1250));

    let result = controller.apply_configuration(config(0.5, -0.5, 1250));
    assert_eq!(result, Ok(ApplyOutcome::Applied));
    assert_eq!(
        scanner.calls(),
        vec![
            DeviceCall::SetScanAngles(1.5, -0.5),
            DeviceCall::SetScanAngles(0.5, -0.5),
            DeviceCall::SetScanFrequency(12.5),
        ]
    );
    assert_eq!(scanner.window().map(|w| (w.start, w.end)), Some((0.5, -0.5)));
    assert!(take_matching(LOG_TARGET, Level::Error).is_empty());
}

#[test]
fn unknown_selector_applies_angles_then_fails() {
    init_capture();
    let (controller, scanner) = connected_controller(config(0.5, -0.5, 1250));

    let result = controller.apply_configuration(config(0.6, -0.6, 9999));
    assert_eq!(result, Err(ApplyError::UnknownFrequency(9999)));
    assert_eq!(scanner.calls(), vec![DeviceCall::SetScanAngles(0.6, -0.6)]);
    assert!(scanner.frequency_calls().is_empty());
    assert_eq!(controller.current_configuration().scan_frequency, 9999);

    let errors = take_matching(LOG_TARGET, Level::Error);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].message, "Unknown scan frequency: 9999");
}

#[test]
fn each_selector_sends_exactly_one_frequency() {
    for (selector, hz) in [(1250, 12.5), (2500, 25.0), (5000, 50.0)] {
        let (controller, scanner) = connected_controller(config(0.5, -0.5, 1250));
        controller
            .apply_configuration(config(0.5, -0.5, selector))
            .unwrap();
        assert_eq!(scanner.frequency_calls(), vec![hz]);
        assert_eq!(scanner.frequency_hz(), Some(hz));
    }
}

#[test]
fn repeated_apply_is_idempotent() {
    let (controller, scanner) = connected_controller(DriverConfiguration::default());
    let requested = config(0.4, -0.7, 5000);

    controller.apply_configuration(requested.clone()).unwrap();
    let state_after_first = controller.current_configuration();
    let first = scanner.take_calls();

    controller.apply_configuration(requested).unwrap();
    assert_eq!(controller.current_configuration(), state_after_first);
    assert_eq!(scanner.take_calls(), first);
}

#[test]
fn device_rejection_is_surfaced_and_config_still_advances() {
    init_capture();
    let (controller, scanner) = connected_controller(config(0.5, -0.5, 1250));
    scanner.reject_frequency(Some("frequency locked"));

    let result = controller.apply_configuration(config(0.5, -0.5, 2500));
    assert_eq!(
        result,
        Err(ApplyError::DeviceRejected("frequency locked".to_string()))
    );
    assert_eq!(controller.current_configuration().scan_frequency, 2500);
    assert_eq!(take_matching(LOG_TARGET, Level::Error).len(), 1);
}
