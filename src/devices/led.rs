//! Board status LED.
//!
//! The LED mirrors the relay bank: it is lit while at least one relay is
//! energized, so the board shows at a glance whether any load is powered.
use crate::hal::gpio::OutputPin;

/// Electrical polarity of the LED pin.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Logic {
    /// Pin high lights the LED.
    Direct,
    /// Pin low lights the LED.
    Inverted,
}

pub struct StatusLed<Pin: OutputPin> {
    pin: Pin,
    logic: Logic,
    lit: bool,
}

impl<Pin: OutputPin> StatusLed<Pin> {
    /// Starts dark whatever level the pin powered up with.
    pub fn new(pin: Pin, logic: Logic) -> Self {
        let mut led = Self { pin, logic, lit: true };
        led.write(false);
        led
    }

    pub fn is_lit(&self) -> bool { self.lit }

    /// Lights or darkens the LED. The pin is only written on a change.
    pub fn set(&mut self, lit: bool) {
        if lit != self.lit {
            self.write(lit);
        }
    }

    fn write(&mut self, lit: bool) {
        match (lit, self.logic) {
            (true, Logic::Direct) | (false, Logic::Inverted) => self.pin.set_high(),
            (false, Logic::Direct) | (true, Logic::Inverted) => self.pin.set_low(),
        }
        self.lit = lit;
    }
}
