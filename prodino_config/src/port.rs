use std::fmt::Display;

use enum_iterator::IntoEnumIterator;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, IntoEnumIterator)]
pub enum Port {
    /// ATmega32u4 based board with 1KB of internal EEPROM.
    ProDinoLeonardo,
    /// SAMD21 based board, EEPROM emulated in a reserved flash region.
    ProDinoMkrZero,
}

impl Default for Port {
    fn default() -> Self { Self::ProDinoLeonardo }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Family {
    Avr,
    Samd,
}

impl Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Port::ProDinoLeonardo => "prodino_leonardo",
            Port::ProDinoMkrZero => "prodino_mkr_zero",
        })
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Family::Avr => "avr",
            Family::Samd => "samd",
        })
    }
}

impl Port {
    pub fn family(&self) -> Family {
        match self {
            Port::ProDinoLeonardo => Family::Avr,
            Port::ProDinoMkrZero => Family::Samd,
        }
    }

    /// Size of the byte-addressable non-volatile medium when the
    /// configuration doesn't override it.
    pub fn default_eeprom_size(&self) -> usize {
        match self {
            Port::ProDinoLeonardo => 1024,
            Port::ProDinoMkrZero => 256,
        }
    }
}
