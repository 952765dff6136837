//! This sub-crate contains all definitions that describe a ProDino board
//! to the relay controller.
//!
//! NOTE: This code is not included anywhere from the controller itself! It
//! is a dependency of the controller's **build script**, which uses it to
//! turn a RON configuration file into compile-time board constants (relay
//! pin map, EEPROM size, MAC address).

use std::{collections::HashSet, fmt::Display};

use port::Port;
use serde::{Deserialize, Serialize};

pub mod codegen;
pub mod port;

/// Wiznet MAC prefix used by every ProDino Ethernet module.
pub const WIZNET_MAC_PREFIX: [u8; 3] = [0x00, 0x08, 0xDC];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub port: Port,
    /// Output pin driving each relay, indexed by channel.
    pub relay_pins: Vec<u8>,
    /// Optocoupled input pins, indexed by input number.
    pub input_pins: Vec<u8>,
    pub status_led_pin: u8,
    /// Overrides the port's default EEPROM size.
    pub eeprom_size: Option<usize>,
    pub mac: [u8; 6],
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            port: Port::ProDinoLeonardo,
            relay_pins: vec![0x04, 0x0C, 0x0B, 0x07],
            input_pins: vec![20, 21, 22, 23],
            status_led_pin: 0x0D,
            eeprom_size: None,
            mac: [WIZNET_MAC_PREFIX[0], WIZNET_MAC_PREFIX[1], WIZNET_MAC_PREFIX[2], 0, 0, 0],
        }
    }
}

impl Configuration {
    pub fn relay_count(&self) -> usize { self.relay_pins.len() }

    pub fn eeprom_size(&self) -> usize {
        self.eeprom_size.unwrap_or_else(|| self.port.default_eeprom_size())
    }

    /// Bytes occupied by the availability and security flag tables.
    pub fn flag_region_size(&self) -> usize { 2 * self.relay_count() }

    pub fn complete(&self) -> bool { self.required_configuration_steps().count() == 0 }

    pub fn required_configuration_steps(&self) -> impl Iterator<Item = RequiredConfigurationStep> {
        let all_pins = self
            .relay_pins
            .iter()
            .chain(self.input_pins.iter())
            .chain(std::iter::once(&self.status_led_pin));
        let unique_pins: HashSet<_> = all_pins.clone().collect();

        [
            self.relay_pins.is_empty().then(|| RequiredConfigurationStep::RelayPins),
            (self.relay_count() > u8::MAX as usize).then(|| RequiredConfigurationStep::TooManyRelays),
            (unique_pins.len() != all_pins.count()).then(|| RequiredConfigurationStep::DuplicatePins),
            (self.flag_region_size() > self.eeprom_size())
                .then(|| RequiredConfigurationStep::EepromTooSmall),
            (self.mac[3..].iter().all(|b| *b == 0)).then(|| RequiredConfigurationStep::MacAddress),
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RequiredConfigurationStep {
    RelayPins,
    TooManyRelays,
    DuplicatePins,
    EepromTooSmall,
    MacAddress,
}

impl Display for RequiredConfigurationStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            RequiredConfigurationStep::RelayPins => "[Pins] Define at least one relay pin",
            RequiredConfigurationStep::TooManyRelays => "[Pins] At most 255 relays are supported",
            RequiredConfigurationStep::DuplicatePins => "[Pins] Every pin must be assigned only once",
            RequiredConfigurationStep::EepromTooSmall => {
                "[Memory] EEPROM can't hold the relay flag tables"
            }
            RequiredConfigurationStep::MacAddress => "[Network] Provide a device specific MAC suffix",
        })
    }
}
