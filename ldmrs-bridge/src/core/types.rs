//! Sensor payload data model.
//!
//! Key types:
//! - [`SensorPayload`]: One unit of data delivered by the device manager
//! - [`Datatype`]: LD-MRS datatype tags identifying each payload kind
//! - [`NtpTime`]: 64-bit NTP timestamp used for scan start/end times
//!
//! Payloads are transient. The device manager creates one per received unit,
//! hands a reference to the [`crate::core::device::PayloadSink`] and drops it
//! afterwards; nothing in this crate keeps them.

use std::fmt;
use std::time::Duration;

/// Seconds between the NTP epoch (1900) and the Unix epoch (1970)
pub const NTP_UNIX_OFFSET_SECS: u64 = 2_208_988_800;

/// Identifier of the logical device/channel that produced a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceId(pub u16);

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 64-bit NTP timestamp: upper 32 bits seconds, lower 32 bits binary fraction
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NtpTime(u64);

impl NtpTime {
    /// Create from the raw 64-bit wire value
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Create from separate seconds and fraction words
    pub const fn from_parts(seconds: u32, fraction: u32) -> Self {
        Self(((seconds as u64) << 32) | fraction as u64)
    }

    /// Convert a duration since the Unix epoch
    pub fn from_unix_duration(since_epoch: Duration) -> Self {
        let seconds = since_epoch.as_secs() + NTP_UNIX_OFFSET_SECS;
        let fraction = ((since_epoch.subsec_nanos() as u64) << 32) / 1_000_000_000;
        Self::from_parts(seconds as u32, fraction as u32)
    }

    /// Raw 64-bit value
    pub const fn raw(&self) -> u64 {
        self.0
    }

    /// Whole seconds
    pub const fn seconds(&self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// Fractional part in units of 2^-32 s
    pub const fn fraction(&self) -> u32 {
        self.0 as u32
    }

    /// Fractional part converted to microseconds (truncated)
    pub fn micros(&self) -> u32 {
        ((self.fraction() as u64 * 1_000_000) >> 32) as u32
    }

    /// Timestamp as floating-point seconds
    pub fn as_secs_f64(&self) -> f64 {
        self.seconds() as f64 + self.fraction() as f64 / 4_294_967_296.0
    }
}

impl fmt::Display for NtpTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:06}", self.seconds(), self.micros())
    }
}

/// Per-head information attached to a scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScannerInfo {
    /// Scanner head id within the device
    pub device_id: u8,
    /// Time the head started this sweep
    pub start_timestamp: NtpTime,
    /// Time the head finished this sweep
    pub end_timestamp: NtpTime,
}

/// Scan payload
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scan {
    pub source: SourceId,
    pub num_points: usize,
    /// One entry per scanner head contributing to this scan
    pub scanner_infos: Vec<ScannerInfo>,
}

impl Scan {
    /// Start timestamps in head order. Re-derived on every call.
    pub fn start_timestamps(&self) -> impl Iterator<Item = NtpTime> + '_ {
        self.scanner_infos.iter().map(|info| info.start_timestamp)
    }
}

/// Monitoring field definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub number: u16,
    /// Field has a valid shape and is in use
    pub valid: bool,
}

/// One unit of sensor data as delivered by the device manager
#[derive(Debug, Clone, PartialEq)]
pub enum SensorPayload {
    Scan(Scan),
    ObjectList { source: SourceId, object_count: usize },
    FieldSet { source: SourceId, fields: Vec<Field> },
    EvalCaseSet { source: SourceId, case_count: usize },
    EvalCaseResultSet { source: SourceId, result_count: usize },
    Message { source: SourceId, text: String },
    MeasurementList { source: SourceId, entry_count: usize },
    /// Datatype this crate does not decode; `datatype` is the raw tag
    Unknown { source: SourceId, datatype: u16 },
}

impl SensorPayload {
    /// Source that produced this payload
    pub fn source(&self) -> SourceId {
        match self {
            SensorPayload::Scan(scan) => scan.source,
            SensorPayload::ObjectList { source, .. }
            | SensorPayload::FieldSet { source, .. }
            | SensorPayload::EvalCaseSet { source, .. }
            | SensorPayload::EvalCaseResultSet { source, .. }
            | SensorPayload::Message { source, .. }
            | SensorPayload::MeasurementList { source, .. }
            | SensorPayload::Unknown { source, .. } => *source,
        }
    }

    /// Datatype tag of this payload
    pub fn datatype(&self) -> Datatype {
        match self {
            SensorPayload::Scan(_) => Datatype::Scan,
            SensorPayload::ObjectList { .. } => Datatype::Objects,
            SensorPayload::FieldSet { .. } => Datatype::Fields,
            SensorPayload::EvalCaseSet { .. } => Datatype::EvalCases,
            SensorPayload::EvalCaseResultSet { .. } => Datatype::EvalCaseResults,
            SensorPayload::Message { .. } => Datatype::Msg,
            SensorPayload::MeasurementList { .. } => Datatype::MeasurementList,
            SensorPayload::Unknown { datatype, .. } => Datatype::Unknown(*datatype),
        }
    }
}

/// LD-MRS datatype tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Scan,
    Objects,
    Fields,
    EvalCases,
    EvalCaseResults,
    Msg,
    MeasurementList,
    Unknown(u16),
}

impl Datatype {
    /// Map a raw tag to a datatype. Total: unrecognised tags become `Unknown`.
    pub fn from_tag(tag: u16) -> Self {
        match tag {
            0x2202 => Datatype::Scan,
            0x2221 => Datatype::Objects,
            0x7000 => Datatype::Fields,
            0x7100 => Datatype::EvalCases,
            0x7200 => Datatype::EvalCaseResults,
            0x7300 => Datatype::Msg,
            0x7400 => Datatype::MeasurementList,
            other => Datatype::Unknown(other),
        }
    }

    /// Raw tag value
    pub fn tag(&self) -> u16 {
        match self {
            Datatype::Scan => 0x2202,
            Datatype::Objects => 0x2221,
            Datatype::Fields => 0x7000,
            Datatype::EvalCases => 0x7100,
            Datatype::EvalCaseResults => 0x7200,
            Datatype::Msg => 0x7300,
            Datatype::MeasurementList => 0x7400,
            Datatype::Unknown(tag) => *tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ntp_time_parts() {
        let t = NtpTime::from_parts(3_600, 0x8000_0000);
        assert_eq!(t.seconds(), 3_600);
        assert_eq!(t.fraction(), 0x8000_0000);
        assert_eq!(t.micros(), 500_000);
        assert!((t.as_secs_f64() - 3_600.5).abs() < 1e-9);
        assert_eq!(t.to_string(), "3600.500000");
    }

    #[test]
    fn test_ntp_time_from_unix() {
        let t = NtpTime::from_unix_duration(Duration::from_millis(1_250));
        assert_eq!(t.seconds() as u64, NTP_UNIX_OFFSET_SECS + 1);
        assert_eq!(t.micros(), 250_000);
    }

    #[test]
    fn test_ntp_time_raw_roundtrip() {
        let t = NtpTime::from_parts(1, 2);
        assert_eq!(NtpTime::from_raw(t.raw()), t);
    }

    #[test]
    fn test_datatype_tags() {
        assert_eq!(Datatype::from_tag(0x2202), Datatype::Scan);
        assert_eq!(Datatype::from_tag(0x7400), Datatype::MeasurementList);
        assert_eq!(Datatype::from_tag(0x1234), Datatype::Unknown(0x1234));
        assert_eq!(Datatype::Fields.tag(), 0x7000);
    }

    #[test]
    fn test_payload_source_and_datatype() {
        let payload = SensorPayload::Message {
            source: SourceId(7),
            text: "hello".to_string(),
        };
        assert_eq!(payload.source(), SourceId(7));
        assert_eq!(payload.datatype(), Datatype::Msg);
    }

    #[test]
    fn test_scan_start_timestamps_in_head_order() {
        let scan = Scan {
            source: SourceId(1),
            num_points: 10,
            scanner_infos: vec![
                ScannerInfo {
                    device_id: 0,
                    start_timestamp: NtpTime::from_parts(10, 0),
                    end_timestamp: NtpTime::from_parts(11, 0),
                },
                ScannerInfo {
                    device_id: 1,
                    start_timestamp: NtpTime::from_parts(5, 0),
                    end_timestamp: NtpTime::from_parts(6, 0),
                },
            ],
        };
        let stamps: Vec<u32> = scan.start_timestamps().map(|t| t.seconds()).collect();
        assert_eq!(stamps, vec![10, 5]);
        // Safe to derive again
        assert_eq!(scan.start_timestamps().count(), 2);
    }
}
