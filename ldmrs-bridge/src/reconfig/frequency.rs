//! Scan frequency selector table

use crate::error::ApplyError;

/// Scan frequency classes supported by the LD-MRS
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanFrequency {
    /// Selector 1250
    Hz12_5,
    /// Selector 2500
    Hz25,
    /// Selector 5000
    Hz50,
}

impl ScanFrequency {
    /// All selectable frequencies
    pub const ALL: [ScanFrequency; 3] = [
        ScanFrequency::Hz12_5,
        ScanFrequency::Hz25,
        ScanFrequency::Hz50,
    ];

    /// Selector value as used in configuration
    pub fn selector(self) -> i32 {
        match self {
            ScanFrequency::Hz12_5 => 1250,
            ScanFrequency::Hz25 => 2500,
            ScanFrequency::Hz50 => 5000,
        }
    }

    /// Physical frequency sent to the device
    pub fn hz(self) -> f64 {
        match self {
            ScanFrequency::Hz12_5 => 12.5,
            ScanFrequency::Hz25 => 25.0,
            ScanFrequency::Hz50 => 50.0,
        }
    }
}

impl TryFrom<i32> for ScanFrequency {
    type Error = ApplyError;

    fn try_from(selector: i32) -> Result<Self, Self::Error> {
        match selector {
            1250 => Ok(ScanFrequency::Hz12_5),
            2500 => Ok(ScanFrequency::Hz25),
            5000 => Ok(ScanFrequency::Hz50),
            other => Err(ApplyError::UnknownFrequency(other)),
        }
    }
}
