//! # Byte-addressed non-volatile storage
//!
//! Interfaces to an EEPROM-like medium: individually writable bytes,
//! no erase step, and a bounded number of write cycles per cell.
//! Addresses are plain byte offsets starting at zero.
use core::fmt;

/// Reads a range of bytes starting at an address.
pub trait Read {
    type Error: Clone + Copy + fmt::Debug;
    fn read(&mut self, address: usize, bytes: &mut [u8]) -> nb::Result<(), Self::Error>;
    /// Total number of addressable bytes.
    fn capacity(&self) -> usize;
}

/// Writes a range of bytes starting at an address. Every byte written
/// costs one write cycle of the underlying cell, whether it changes or not.
pub trait Write {
    type Error: Clone + Copy + fmt::Debug;
    fn write(&mut self, address: usize, bytes: &[u8]) -> nb::Result<(), Self::Error>;
}

pub trait ReadWrite: Read + Write<Error = <Self as Read>::Error> {}
impl<E> ReadWrite for E where E: Read + Write<Error = <E as Read>::Error> {}

/// Writes only the bytes that differ from the stored content, saving
/// write cycles on cells that already hold the right value.
pub trait Update: ReadWrite {
    fn update(&mut self, address: usize, bytes: &[u8]) -> nb::Result<(), <Self as Read>::Error> {
        for (offset, byte) in bytes.iter().enumerate() {
            let mut stored = [0u8];
            self.read(address + offset, &mut stored)?;
            if stored[0] != *byte {
                self.write(address + offset, core::slice::from_ref(byte))?;
            }
        }
        Ok(())
    }
}
impl<E: ReadWrite> Update for E {}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hal::doubles::eeprom::FakeEeprom;

    #[test]
    fn update_skips_bytes_already_stored() {
        // Given
        let mut eeprom = FakeEeprom::new(16, 0x00);
        nb::block!(eeprom.write(0, &[1, 2, 3])).unwrap();
        let writes_before = eeprom.write_count;

        // When
        nb::block!(eeprom.update(0, &[1, 5, 3])).unwrap();

        // Then
        assert_eq!(writes_before + 1, eeprom.write_count);
        let mut bytes = [0u8; 3];
        nb::block!(eeprom.read(0, &mut bytes)).unwrap();
        assert_eq!([1, 5, 3], bytes);
    }

    #[test]
    fn update_propagates_read_faults() {
        let mut eeprom = FakeEeprom::new(16, 0xFF);
        eeprom.fail_reads = true;
        assert!(nb::block!(eeprom.update(0, &[0])).is_err());
        assert_eq!(0, eeprom.write_count);
    }
}
