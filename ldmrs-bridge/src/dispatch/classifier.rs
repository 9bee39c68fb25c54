//! Payload classification
//!
//! Turns any [`SensorPayload`] into a short, human-auditable summary:
//!
//! | Variant | Label | Detail |
//! |---------|-------|--------|
//! | Scan | `Scan` | `<n> points` |
//! | ObjectList | `Objects` | `<n> objects` |
//! | FieldSet | `Fields` | `<n> fields, <v> of which are valid` |
//! | EvalCaseSet | `EvalCases` | `<n> cases` |
//! | EvalCaseResultSet | `EvalCaseResults` | `<n> case results` |
//! | Message | `Msg` | message text |
//! | MeasurementList | `MeasurementList` | `<n> entries` |
//! | Unknown | `unknown` | empty |
//!
//! Classification is total and pure: it never fails and never mutates the payload.

use crate::core::types::{NtpTime, ScannerInfo, SensorPayload};
use std::fmt;

/// Label used for payloads of an undecoded datatype
pub const UNKNOWN_LABEL: &str = "unknown";

/// Result of classifying one payload
#[derive(Debug, Clone, PartialEq)]
pub struct Classification<'a> {
    pub kind_label: &'static str,
    pub source_id: String,
    pub detail: String,
    scanner_infos: &'a [ScannerInfo],
}

impl<'a> Classification<'a> {
    /// Start timestamps, one per scanner head, in head order.
    ///
    /// Empty for every variant other than Scan. Borrowed from the payload, so
    /// it can be iterated as many times as needed.
    pub fn start_timestamps(&self) -> impl Iterator<Item = NtpTime> + 'a {
        self.scanner_infos.iter().map(|info| info.start_timestamp)
    }

    /// True when the payload kind was not recognised
    pub fn is_unknown(&self) -> bool {
        self.kind_label == UNKNOWN_LABEL
    }
}

impl fmt::Display for Classification<'_> {
    /// `<label> (<detail>)`, or just the label when there is no detail
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.kind_label)
        } else {
            write!(f, "{} ({})", self.kind_label, self.detail)
        }
    }
}

/// Classify a payload
pub fn classify(payload: &SensorPayload) -> Classification<'_> {
    let mut scanner_infos: &[ScannerInfo] = &[];

    let (kind_label, detail) = match payload {
        SensorPayload::Scan(scan) => {
            scanner_infos = &scan.scanner_infos;
            ("Scan", format!("{} points", scan.num_points))
        }
        SensorPayload::ObjectList { object_count, .. } => {
            ("Objects", format!("{} objects", object_count))
        }
        SensorPayload::FieldSet { fields, .. } => {
            let valid = fields.iter().filter(|f| f.valid).count();
            (
                "Fields",
                format!("{} fields, {} of which are valid", fields.len(), valid),
            )
        }
        SensorPayload::EvalCaseSet { case_count, .. } => {
            ("EvalCases", format!("{} cases", case_count))
        }
        SensorPayload::EvalCaseResultSet { result_count, .. } => {
            ("EvalCaseResults", format!("{} case results", result_count))
        }
        SensorPayload::Message { text, .. } => ("Msg", text.clone()),
        SensorPayload::MeasurementList { entry_count, .. } => {
            ("MeasurementList", format!("{} entries", entry_count))
        }
        SensorPayload::Unknown { .. } => (UNKNOWN_LABEL, String::new()),
    };

    Classification {
        kind_label,
        source_id: payload.source().to_string(),
        detail,
        scanner_infos,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Field, Scan, SourceId};

    fn known_payloads() -> Vec<SensorPayload> {
        let source = SourceId(1);
        vec![
            SensorPayload::Scan(Scan {
                source,
                num_points: 0,
                scanner_infos: Vec::new(),
            }),
            SensorPayload::ObjectList {
                source,
                object_count: 0,
            },
            SensorPayload::FieldSet {
                source,
                fields: Vec::new(),
            },
            SensorPayload::EvalCaseSet {
                source,
                case_count: 0,
            },
            SensorPayload::EvalCaseResultSet {
                source,
                result_count: 0,
            },
            SensorPayload::Message {
                source,
                text: String::new(),
            },
            SensorPayload::MeasurementList {
                source,
                entry_count: 0,
            },
        ]
    }

    #[test]
    fn test_known_variants_have_distinct_labels() {
        let labels: Vec<&str> = known_payloads()
            .iter()
            .map(|p| classify(p).kind_label)
            .collect();
        for label in &labels {
            assert!(!label.is_empty());
            assert_ne!(*label, UNKNOWN_LABEL);
        }
        let mut unique = labels.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_unknown_has_empty_detail() {
        for tag in [0u16, 0x2202, 0xFFFF] {
            let payload = SensorPayload::Unknown {
                source: SourceId(3),
                datatype: tag,
            };
            let c = classify(&payload);
            assert_eq!(c.kind_label, "unknown");
            assert!(c.detail.is_empty());
            assert_eq!(c.source_id, "3");
            assert!(c.is_unknown());
            assert_eq!(c.to_string(), "unknown");
        }
    }

    #[test]
    fn test_scan_detail_and_timestamps() {
        let payload = SensorPayload::Scan(Scan {
            source: SourceId(1),
            num_points: 742,
            scanner_infos: (0..3)
                .map(|i| ScannerInfo {
                    device_id: i,
                    start_timestamp: NtpTime::from_parts(100 + i as u32, 0),
                    end_timestamp: NtpTime::from_parts(101 + i as u32, 0),
                })
                .collect(),
        });
        let c = classify(&payload);
        assert_eq!(c.kind_label, "Scan");
        assert_eq!(c.detail, "742 points");
        assert_eq!(c.to_string(), "Scan (742 points)");
        let secs: Vec<u32> = c.start_timestamps().map(|t| t.seconds()).collect();
        assert_eq!(secs, vec![100, 101, 102]);
        assert_eq!(c.start_timestamps().count(), 3);
    }

    #[test]
    fn test_field_set_counts_valid_fields() {
        let payload = SensorPayload::FieldSet {
            source: SourceId(2),
            fields: vec![
                Field { number: 1, valid: true },
                Field { number: 2, valid: false },
                Field { number: 3, valid: true },
            ],
        };
        let c = classify(&payload);
        assert_eq!(c.detail, "3 fields, 2 of which are valid");
        assert_eq!(c.start_timestamps().count(), 0);
    }

    #[test]
    fn test_message_and_measurement_detail() {
        let msg = SensorPayload::Message {
            source: SourceId(1),
            text: "contamination warning".to_string(),
        };
        assert_eq!(classify(&msg).to_string(), "Msg (contamination warning)");

        let list = SensorPayload::MeasurementList {
            source: SourceId(1),
            entry_count: 12,
        };
        assert_eq!(classify(&list).detail, "12 entries");
    }

    #[test]
    fn test_classify_does_not_mutate() {
        let payload = SensorPayload::ObjectList {
            source: SourceId(9),
            object_count: 4,
        };
        let before = payload.clone();
        let _ = classify(&payload);
        assert_eq!(payload, before);
    }
}
