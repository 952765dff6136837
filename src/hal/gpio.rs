//! # Simple GPIO interface
//!
//! Separate interfaces to Input and Output pins. An output pin that can
//! read back its own latched level (as AVR and SAMD ports can) implements
//! both.

/// Interface to a writable pin.
pub trait OutputPin {
    fn set_low(&mut self);
    fn set_high(&mut self);
}

/// Interface to a readable pin.
pub trait InputPin {
    fn is_high(&self) -> bool;
    fn is_low(&self) -> bool { !self.is_high() }
}
