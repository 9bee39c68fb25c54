//! Mock device manager

use super::scanner::MockScanner;
use crate::core::device::{DeviceManager, PayloadSink, ScannerDevice, SourceType};
use crate::core::types::SensorPayload;
use parking_lot::RwLock;
use std::sync::Arc;

/// Device manager holding at most one scanner and any number of payload sinks.
///
/// The scanner can be connected and disconnected at runtime to exercise the
/// reconfiguration path while the device is unavailable.
#[derive(Default)]
pub struct MockDeviceManager {
    device: RwLock<Option<(SourceType, Arc<MockScanner>)>>,
    sinks: RwLock<Vec<Arc<dyn PayloadSink>>>,
}

impl MockDeviceManager {
    /// Create a manager with no device connected
    pub fn new() -> Self {
        Self::default()
    }

    /// Connect a fresh scanner of the given type and return it
    pub fn connect(&self, kind: SourceType) -> Arc<MockScanner> {
        let scanner = Arc::new(MockScanner::new());
        self.attach(kind, Arc::clone(&scanner));
        scanner
    }

    /// Connect an existing scanner (e.g. after a simulated cable pull)
    pub fn attach(&self, kind: SourceType, scanner: Arc<MockScanner>) {
        log::info!("Mock device connected: {:?}", kind);
        *self.device.write() = Some((kind, scanner));
    }

    /// Disconnect the current scanner, if any
    pub fn disconnect(&self) {
        if let Some((kind, _)) = self.device.write().take() {
            log::info!("Mock device disconnected: {:?}", kind);
        }
    }

    /// True if a scanner is connected
    pub fn is_connected(&self) -> bool {
        self.device.read().is_some()
    }

    /// Register an application to receive payloads
    pub fn add_sink(&self, sink: Arc<dyn PayloadSink>) {
        self.sinks.write().push(sink);
    }

    /// Forward one payload to every registered sink
    pub fn deliver(&self, payload: &SensorPayload) {
        for sink in self.sinks.read().iter() {
            sink.on_payload(payload);
        }
    }
}

impl DeviceManager for MockDeviceManager {
    fn first_device_by_type(&self, kind: SourceType) -> Option<Arc<dyn ScannerDevice>> {
        match &*self.device.read() {
            Some((device_kind, scanner)) if *device_kind == kind => {
                Some(Arc::clone(scanner) as Arc<dyn ScannerDevice>)
            }
            _ => None,
        }
    }
}
