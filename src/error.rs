//! Error types and methods for the relay controller.

use core::fmt;
use ufmt::{uWrite, uwriteln};

/// Top level error type for the controller. Every failure is returned
/// synchronously to the immediate caller, and nothing is retried.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Error caused by a low level peripheral driver
    DriverError(&'static str),
    /// Error caused by a faulty configuration
    ConfigurationError(&'static str),
    /// Channel index outside of the configured relay range
    InvalidChannel,
    /// The channel's availability flag is cleared, so it rejects state changes
    ChannelUnavailable,
    /// The non-volatile medium rejected or failed a read or write
    StorageFault,
    /// A driven pin didn't reach the requested level
    PinFault,
}

/// Implemented by driver errors that can be reported as a controller [`Error`].
pub trait Convertible {
    fn into(self) -> Error;
}

impl<T: Convertible> From<T> for Error {
    fn from(t: T) -> Self { Convertible::into(t) }
}

impl Error {
    /// Reports error via abstract serial device
    pub fn report<S: uWrite>(&self, serial: &mut S) {
        match self {
            Error::DriverError(text) => uwriteln!(serial, "[Driver Error] -> {}", *text),
            Error::ConfigurationError(text) => {
                uwriteln!(serial, "[Configuration Error] -> {}", *text)
            }
            Error::InvalidChannel => {
                uwriteln!(serial, "[Logic Error] -> Relay channel doesn't exist")
            }
            Error::ChannelUnavailable => {
                uwriteln!(serial, "[Logic Error] -> Relay channel is unavailable")
            }
            Error::StorageFault => uwriteln!(serial, "[Device Error] -> EEPROM access failed"),
            Error::PinFault => {
                uwriteln!(serial, "[Device Error] -> Relay pin didn't reach the requested level")
            }
        }
        .ok();
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DriverError(text) => write!(f, "driver error: {}", text),
            Error::ConfigurationError(text) => write!(f, "configuration error: {}", text),
            Error::InvalidChannel => f.write_str("relay channel doesn't exist"),
            Error::ChannelUnavailable => f.write_str("relay channel is unavailable"),
            Error::StorageFault => f.write_str("EEPROM access failed"),
            Error::PinFault => f.write_str("relay pin didn't reach the requested level"),
        }
    }
}
