//! Board port. The pin map, EEPROM size and MAC of the selected ProDino
//! variant are generated at build time from a `prodino_config`
//! configuration file (see `build.rs`), and the generic devices are
//! fixed to those dimensions here.

use crate::devices::board::Board;
use static_assertions::const_assert;

/// Constants generated from the board configuration.
pub mod board {
    include!(concat!(env!("OUT_DIR"), "/board.rs"));
}

pub use board::{EEPROM_SIZE, INPUT_COUNT, MAC, RELAY_COUNT};

// Both flag classes must fit in the EEPROM, one byte per relay each.
const_assert!(RELAY_COUNT > 0);
const_assert!(2 * RELAY_COUNT <= EEPROM_SIZE);

/// Full board sized for the configured port.
pub type PortBoard<E, P, I, L, S> = Board<E, P, I, L, S, RELAY_COUNT, INPUT_COUNT>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn generated_pin_map_is_consistent() {
        assert_eq!(RELAY_COUNT, board::RELAY_PINS.len());
        assert_eq!(INPUT_COUNT, board::INPUT_PINS.len());
        assert!(!board::RELAY_PINS.contains(&board::STATUS_LED_PIN));
    }

    #[test]
    fn flag_region_fits_the_eeprom() {
        assert!(2 * RELAY_COUNT <= EEPROM_SIZE);
        assert_ne!(&MAC[3..], &[0, 0, 0]);
    }
}
