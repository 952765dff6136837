//! Modules with the business logic of the relay controller, laid on top
//! of the abstract HAL interfaces. Devices are generic, while board
//! specifics (pin map, EEPROM size) are handled in the `ports` module.

pub mod board;
pub mod cli;
pub mod flag_store;
pub mod led;
pub mod relay;

/// General purpose traits that summarize requirements on devices.
pub mod traits {
    use crate::hal::gpio::{InputPin, OutputPin};
    use marker_blanket::marker_blanket;

    /// A relay pin is an output that can read back its latched level,
    /// which is what toggling and pin verification rely on.
    #[marker_blanket]
    pub trait RelayPin: OutputPin + InputPin {}
}
