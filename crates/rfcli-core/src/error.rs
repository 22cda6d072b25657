//! Error types shared across rfcli crates

use thiserror::Error;

/// Errors produced while declaring flags, constructing a device, or
/// configuring it after construction.
///
/// Backend-specific hardware errors are carried verbatim in
/// [`Error::Device`]; everything else is a parse or wiring failure in the
/// CLI layer itself.
#[derive(Debug, Error)]
pub enum Error {
    /// The selector flag named a backend that was not registered
    /// (or was excluded at build time).
    #[error("unknown sdr backend: {0}")]
    UnknownBackend(String),

    /// The automatic-gain flag held something other than "on", "manual",
    /// or the empty string.
    #[error("unknown gain mode: {0} (expected \"on\" or \"manual\")")]
    InvalidGainMode(String),

    /// A gain-specification token was malformed (missing `=` or a
    /// non-numeric value).
    #[error("can't parse gain setting: {0}")]
    InvalidGainSpec(String),

    /// A frequency string did not parse as a number with an optional
    /// Hz/kHz/MHz/GHz/THz suffix.
    #[error("can't parse frequency: {0}")]
    InvalidFrequency(String),

    /// A flag was read before it was declared. This is a defect in the
    /// caller's wiring, not a user error.
    #[error("flag {0} was not declared before use")]
    FlagRead(String),

    /// I/O failure talking to a device.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific error, passed through verbatim.
    #[error("{0}")]
    Device(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Wrap a backend-specific error for verbatim propagation.
    pub fn device<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Device(err.into())
    }
}

pub type Result<T> = core::result::Result<T, Error>;
