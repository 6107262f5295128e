//! Typed errors for the kettle firmware.
//!
//! The control domain itself has no recoverable errors: a pump or heat
//! request that cannot be honoured is a *refused transition* surfaced as an
//! event, never an `Err` (the caller must not retry without a state
//! change). What remains are the startup-time failures: invalid
//! configuration and peripheral bring-up.

use core::fmt;

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration failed range validation at startup.
    /// The `&'static str` names the offending field.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
