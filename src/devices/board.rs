//! Board level aggregate: relays, optocoupled inputs and the status LED.
//!
//! Construction is the equivalent of the board's bring-up: the status LED
//! is switched off, input pins are only ever read, and relay pins keep
//! their power-on level until commanded. Afterwards the status LED follows
//! the relays through [`Board::sync_status_led`].
use super::{
    led::{Logic, StatusLed},
    relay::{RelayState, Relays},
    traits::RelayPin,
};
use crate::{
    error::Error,
    hal::{
        eeprom,
        gpio::{InputPin, OutputPin},
    },
};
use ufmt::{uDisplay, uWrite, uwriteln, Formatter};

/// Name under which the board announces itself.
pub const PRODUCT_NAME: &str = "KMPDINO";

binary_flag!(
    /// Level read on an optocoupled input.
    InputLevel { Low = "LOW", High = "HIGH" }
);

/// Device serial, derived from the device specific half of the MAC.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ProductSerial {
    digits: [u8; 6],
}

impl ProductSerial {
    /// Six uppercase hex digits spelling the last three MAC bytes.
    pub fn from_mac(mac: &[u8; 6]) -> Self {
        const HEX: &[u8; 16] = b"0123456789ABCDEF";
        let mut digits = [0u8; 6];
        for (pair, byte) in digits.chunks_mut(2).zip(&mac[3..]) {
            pair[0] = HEX[(byte >> 4) as usize];
            pair[1] = HEX[(byte & 0x0F) as usize];
        }
        Self { digits }
    }

    pub fn as_str(&self) -> &str { core::str::from_utf8(&self.digits).unwrap_or("") }
}

impl uDisplay for ProductSerial {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.as_str())
    }
}

pub struct Board<E, P, I, L, S, const N: usize, const M: usize>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
    P: RelayPin,
    I: InputPin,
    L: OutputPin,
    S: uWrite,
{
    relays: Relays<E, P, S, N>,
    inputs: [I; M],
    status_led: StatusLed<L>,
    serial: ProductSerial,
}

impl<E, P, I, L, S, const N: usize, const M: usize> Board<E, P, I, L, S, N, M>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
    P: RelayPin,
    I: InputPin,
    L: OutputPin,
    S: uWrite,
{
    pub fn new(
        relays: Relays<E, P, S, N>,
        inputs: [I; M],
        status_led_pin: L,
        logic: Logic,
        mac: &[u8; 6],
    ) -> Self {
        Self {
            relays,
            inputs,
            status_led: StatusLed::new(status_led_pin, logic),
            serial: ProductSerial::from_mac(mac),
        }
    }

    pub fn relays(&self) -> &Relays<E, P, S, N> { &self.relays }
    pub fn relays_mut(&mut self) -> &mut Relays<E, P, S, N> { &mut self.relays }
    pub fn status_led(&self) -> &StatusLed<L> { &self.status_led }
    pub fn product_serial(&self) -> ProductSerial { self.serial }

    /// Announces the board as `KMPDINO 0ABC01`.
    pub fn identify<W: uWrite>(&self, serial: &mut W) {
        uwriteln!(serial, "{} {}", PRODUCT_NAME, self.serial).ok();
    }

    /// Lights the status LED while any relay is energized.
    pub fn sync_status_led(&mut self) {
        let energized = (0..N).any(|channel| {
            self.relays.state(channel).map(RelayState::is_set).unwrap_or(false)
        });
        self.status_led.set(energized);
    }

    pub fn input(&self, index: usize) -> Result<InputLevel, Error> {
        let pin = self.inputs.get(index).ok_or(Error::InvalidChannel)?;
        Ok(InputLevel::from(pin.is_high()))
    }

    /// Levels of every optocoupled input, in pin order.
    pub fn inputs(&self) -> impl Iterator<Item = InputLevel> + '_ {
        self.inputs.iter().map(|pin| InputLevel::from(pin.is_high()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hal::doubles::{eeprom::FakeEeprom, gpio::MockPin, serial::RecordingSerial};

    type TestBoard = Board<FakeEeprom, MockPin, MockPin, MockPin, RecordingSerial, 4, 4>;

    fn board() -> TestBoard {
        let relays =
            Relays::new(FakeEeprom::new(1024, 0x00), Default::default(), Default::default())
                .unwrap();
        let inputs = [MockPin::default(), MockPin::high(), MockPin::default(), MockPin::high()];
        Board::new(relays, inputs, MockPin::high(), Logic::Direct, &[0x00, 0x08, 0xDC, 0x0A, 0xBC, 0x01])
    }

    #[test]
    fn serial_spells_the_device_half_of_the_mac() {
        assert_eq!("0ABC01", board().product_serial().as_str());
        assert_eq!("FFFFFF", ProductSerial::from_mac(&[0, 0, 0, 255, 255, 255]).as_str());
    }

    #[test]
    fn status_led_follows_the_relays() {
        // Given
        let mut board = board();
        board.relays_mut().set_available(1, true).unwrap();
        board.relays_mut().set_available(2, true).unwrap();
        board.sync_status_led();
        assert!(!board.status_led().is_lit());

        // When
        board.relays_mut().set_state(1, RelayState::On).unwrap();
        board.relays_mut().set_state(2, RelayState::On).unwrap();
        board.relays_mut().set_state(1, RelayState::Off).unwrap();
        board.sync_status_led();

        // Then
        assert!(board.status_led().is_lit());

        // When
        board.relays_mut().toggle_state(2).unwrap();
        board.sync_status_led();

        // Then
        assert!(!board.status_led().is_lit());
    }

    #[test]
    fn board_identifies_with_name_and_serial() {
        let mut serial = RecordingSerial::default();
        board().identify(&mut serial);
        assert_eq!("KMPDINO 0ABC01\n", serial.text);
    }

    #[test]
    fn inputs_are_read_by_index() {
        let board = board();
        assert_eq!(Ok(InputLevel::High), board.input(1));
        assert_eq!(Ok(InputLevel::Low), board.input(2));
        assert_eq!(Err(Error::InvalidChannel), board.input(4));
        let levels: Vec<_> = board.inputs().collect();
        assert_eq!(
            vec![InputLevel::Low, InputLevel::High, InputLevel::Low, InputLevel::High],
            levels
        );
    }

    #[test]
    fn relays_are_reachable_through_the_board() {
        let mut board = board();
        board.relays_mut().set_available(0, true).unwrap();
        board.relays_mut().set_state(0, RelayState::On).unwrap();
        assert_eq!(RelayState::On, board.relays().state(0).unwrap());
    }
}
