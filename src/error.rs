use thiserror::Error;

/// Error type for drive setup and configuration.
///
/// Runtime faults on the serial links (failed open, failed write) are not
/// errors at this level: the control loop logs them and retries on the next
/// tick, it never exits on its own.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Serial port operation failed.
    #[error("serial error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
