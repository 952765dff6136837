//! Hardware Abstraction Layer, containing interfaces
//! for the low level primitives the controller is built on.

pub mod eeprom;
pub mod gpio;

#[cfg(test)]
#[doc(hidden)]
pub mod doubles;
