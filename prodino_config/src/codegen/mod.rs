use anyhow::{anyhow, Result};
use quote::quote;
use std::{fs::OpenOptions, io::Write, path::Path};

use crate::Configuration;

pub mod prettify;

/// Name of the generated module, relative to the output directory.
pub const BOARD_MODULE: &str = "board.rs";

/// Generates the board constants module consumed by the controller's
/// `ports` module. Refuses incomplete configurations.
pub fn generate_modules<P: AsRef<Path>>(
    output_directory: P,
    configuration: &Configuration,
) -> Result<()> {
    if let Some(step) = configuration.required_configuration_steps().next() {
        return Err(anyhow!("Configuration incomplete: {}", step));
    }

    let filename = output_directory.as_ref().join(BOARD_MODULE);
    let mut file = OpenOptions::new().write(true).create(true).truncate(true).open(&filename)?;
    file.write_all(board_constants(configuration).as_bytes())?;
    // Formatting is cosmetic; a missing rustfmt must not fail the build.
    prettify::prettify_file(&filename).ok();
    Ok(())
}

fn board_constants(configuration: &Configuration) -> String {
    let port = configuration.port.to_string();
    let family = configuration.port.family().to_string();
    let relay_count = configuration.relay_count();
    let input_count = configuration.input_pins.len();
    let relay_pins = &configuration.relay_pins;
    let input_pins = &configuration.input_pins;
    let status_led_pin = configuration.status_led_pin;
    let eeprom_size = configuration.eeprom_size();
    let mac = configuration.mac.iter();

    let code = quote! {
        pub const PORT: &str = #port;
        pub const FAMILY: &str = #family;
        pub const RELAY_COUNT: usize = #relay_count;
        pub const INPUT_COUNT: usize = #input_count;
        pub const RELAY_PINS: [u8; RELAY_COUNT] = [#(#relay_pins),*];
        pub const INPUT_PINS: [u8; INPUT_COUNT] = [#(#input_pins),*];
        pub const STATUS_LED_PIN: u8 = #status_led_pin;
        pub const EEPROM_SIZE: usize = #eeprom_size;
        pub const MAC: [u8; 6] = [#(#mac),*];
    };
    format!("{}", code)
}
