//! Persistent per-channel flags.
//!
//! Two boolean flag tables live at the start of the EEPROM, one byte per
//! channel each:
//!
//! ```text
//! address: 0        N        2N                 capacity
//!          [ avail. ][ secure ][ unused by flags ... ]
//! ```
//!
//! Flags are full bytes rather than packed bits, so updating one flag never
//! needs a read-modify-write of its neighbours. Multi-flag updates are
//! independent single-byte writes; there is no cross-flag transaction.
use crate::{
    error::Error,
    hal::eeprom::{self, Update},
};
use nb::block;

/// Address of the availability table.
pub const AVAILABILITY_OFFSET: usize = 0;

/// Which of the two flag tables an operation targets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlagClass {
    Availability,
    Security,
}

impl FlagClass {
    /// Start of this class's table for a board with `relay_count` relays.
    pub const fn offset(self, relay_count: usize) -> usize {
        match self {
            FlagClass::Availability => AVAILABILITY_OFFSET,
            FlagClass::Security => relay_count,
        }
    }
}

pub struct FlagStore<E, const N: usize>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
{
    eeprom: E,
}

impl<E, const N: usize> FlagStore<E, N>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
{
    /// Number of bytes occupied by both flag tables.
    pub const FLAG_REGION_SIZE: usize = 2 * N;

    pub fn new(eeprom: E) -> Result<Self, Error> {
        if Self::FLAG_REGION_SIZE > eeprom.capacity() {
            return Err(Error::ConfigurationError("EEPROM can't hold the relay flag tables"));
        }
        Ok(Self { eeprom })
    }

    /// EEPROM address holding a channel's flag of the given class.
    pub fn address(channel: usize, class: FlagClass) -> Result<usize, Error> {
        if channel >= N {
            return Err(Error::InvalidChannel);
        }
        Ok(channel + class.offset(N))
    }

    /// Stores a flag as a single 0 or 1 byte. The byte is only written
    /// when it differs from the stored one, but callers must still not
    /// write flags in a loop: every change costs a write cycle.
    pub fn write_flag(&mut self, channel: usize, class: FlagClass, value: bool) -> Result<(), Error> {
        let address = Self::address(channel, class)?;
        block!(self.eeprom.update(address, &[value as u8])).map_err(|e| {
            trace_warn!("EEPROM update failed at {}", address);
            Error::from(e)
        })
    }

    /// Any nonzero byte reads as `true`. Cells never written return whatever
    /// the medium holds after erase.
    pub fn read_flag(&mut self, channel: usize, class: FlagClass) -> Result<bool, Error> {
        Ok(self.read_byte(Self::address(channel, class)?)? != 0)
    }

    /// Writes zero to every address of the medium, flag tables or not.
    /// Costs one write cycle per byte of capacity; reserved for factory resets.
    pub fn clear_all(&mut self) -> Result<(), Error> {
        for address in 0..self.eeprom.capacity() {
            block!(self.eeprom.write(address, &[0])).map_err(|e| {
                trace_warn!("EEPROM clear failed at {}", address);
                Error::from(e)
            })?;
        }
        Ok(())
    }

    /// Resets every flag byte that holds neither 0 nor 1 (a never
    /// provisioned cell) to 0. Returns how many bytes were rewritten.
    pub fn provision(&mut self) -> Result<usize, Error> {
        let mut provisioned = 0;
        for address in 0..Self::FLAG_REGION_SIZE {
            if self.read_byte(address)? > 1 {
                block!(self.eeprom.write(address, &[0]))?;
                provisioned += 1;
            }
        }
        Ok(provisioned)
    }

    /// Size of the whole medium in bytes.
    pub fn capacity(&self) -> usize { self.eeprom.capacity() }

    /// Gives back the underlying medium.
    pub fn release(self) -> E { self.eeprom }

    fn read_byte(&mut self, address: usize) -> Result<u8, Error> {
        let mut byte = [0u8];
        block!(self.eeprom.read(address, &mut byte)).map_err(|e| {
            trace_warn!("EEPROM read failed at {}", address);
            Error::from(e)
        })?;
        Ok(byte[0])
    }
}
