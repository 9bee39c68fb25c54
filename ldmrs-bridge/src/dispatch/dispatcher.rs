//! Data dispatcher - the single entry point for payloads from the device manager

use super::classifier::classify;
use crate::core::device::PayloadSink;
use crate::core::types::{Datatype, SensorPayload};

/// Log target for payload records
pub const LOG_TARGET: &str = "ldmrs_bridge::dispatch";

/// Classifies each payload and logs its summary.
///
/// Stateless; safe to share between delivery threads. Downstream consumers
/// (e.g. point cloud publishing) hook in here, after classification.
#[derive(Debug, Default, Clone, Copy)]
pub struct DataDispatcher;

impl DataDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl PayloadSink for DataDispatcher {
    fn on_payload(&self, payload: &SensorPayload) {
        let classification = classify(payload);

        // Start times precede the summary line
        for start in classification.start_timestamps() {
            log::info!(target: LOG_TARGET, "Scan start time: {}", start);
        }

        log::info!(
            target: LOG_TARGET,
            "Received data of type {} from ID {}",
            classification,
            classification.source_id
        );

        if let Datatype::Unknown(tag) = payload.datatype() {
            log::debug!(
                target: LOG_TARGET,
                "Undecoded datatype 0x{:04X} from ID {}",
                tag,
                classification.source_id
            );
        }
    }
}
