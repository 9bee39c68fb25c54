//! Error types for the LD-MRS bridge

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Crate-level error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// Semantically invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Reconfiguration request failed on the device
    #[error("Reconfiguration failed: {0}")]
    Apply(#[from] ApplyError),

    /// Worker thread could not be spawned or panicked
    #[error("Thread error: {0}")]
    Thread(String),

    /// A channel peer has gone away
    #[error("Channel closed: {0}")]
    ChannelClosed(&'static str),
}

/// Failure of [`crate::reconfig::ReconfigureController::apply_configuration`]
///
/// A disconnected device is not represented here as a returned error: it is the
/// [`crate::reconfig::ApplyOutcome::NoDevice`] outcome. The `NoDevice` variant
/// exists so callers that need an error value (e.g. to refuse a request that
/// must reach hardware) can name the condition.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApplyError {
    /// No device of the requested sensor type is connected
    #[error("no connection to LD-MRS")]
    NoDevice,

    /// Scan frequency selector outside {1250, 2500, 5000}
    #[error("unknown scan frequency selector: {0}")]
    UnknownFrequency(i32),

    /// Device refused a set-angle or set-frequency command
    #[error("device rejected command: {0}")]
    DeviceRejected(String),
}

/// Reason reported by a device-level command
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct DeviceError(pub String);

impl DeviceError {
    /// Create a device error from any displayable reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl From<DeviceError> for ApplyError {
    fn from(e: DeviceError) -> Self {
        ApplyError::DeviceRejected(e.0)
    }
}
