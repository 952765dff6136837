//! Test doubles for the HAL interfaces.

pub mod eeprom;
pub mod error;
pub mod gpio;
pub mod serial;
