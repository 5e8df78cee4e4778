//! Driver error type

/// Errors returned by the ADS114S0x driver.
///
/// Validation errors (`InvalidAddress`, `InvalidChannel`,
/// `InvalidConfiguration`, `NotStreaming`, `Parse`, `InvalidValue`,
/// `Unsupported`) are raised before any bus traffic. `Transport` and `Gpio` abort the sequence
/// in flight; the device is left in a defined state and stays usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SPI transfer failed.
    #[error("bus transfer failed")]
    Transport,
    /// The reset line could not be driven.
    #[error("reset line could not be driven")]
    Gpio,
    /// Register address or name outside the register map.
    #[error("invalid register address")]
    InvalidAddress,
    /// Channel index outside `[0, num_channels)`.
    #[error("invalid channel")]
    InvalidChannel,
    /// Streaming requested with no channel enabled in the scan mask.
    #[error("no channel enabled in scan mask")]
    InvalidConfiguration,
    /// Trigger delivered while no streaming session is running.
    #[error("no streaming session running")]
    NotStreaming,
    /// Attribute value is not a decimal integer.
    #[error("value is not a decimal integer")]
    Parse,
    /// Attribute value does not fit the target register.
    #[error("value out of range for register")]
    InvalidValue,
    /// Requested channel information is not provided by this driver.
    #[error("unsupported channel information")]
    Unsupported,
    /// Device name not present in the identity table.
    #[error("unknown device identity")]
    UnknownDevice,
    /// A transaction description does not fit the scratch buffer.
    #[error("transaction exceeds scratch buffer")]
    Framing,
}

/// Driver result alias.
pub type Result<T> = core::result::Result<T, Error>;
