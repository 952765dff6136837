use super::error::FakeError;
use crate::hal::eeprom;

/// Vector-backed EEPROM. Cells start at `erase_value`, mimicking
/// whatever a never-written medium holds.
#[derive(Clone, Debug)]
pub struct FakeEeprom {
    pub data: Vec<u8>,
    pub write_count: usize,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl FakeEeprom {
    pub fn new(capacity: usize, erase_value: u8) -> Self {
        Self { data: vec![erase_value; capacity], write_count: 0, fail_reads: false, fail_writes: false }
    }
}

impl eeprom::Read for FakeEeprom {
    type Error = FakeError;

    fn read(&mut self, address: usize, bytes: &mut [u8]) -> nb::Result<(), Self::Error> {
        if self.fail_reads || address + bytes.len() > self.data.len() {
            return Err(nb::Error::Other(FakeError));
        }
        bytes.copy_from_slice(&self.data[address..address + bytes.len()]);
        Ok(())
    }

    fn capacity(&self) -> usize { self.data.len() }
}

impl eeprom::Write for FakeEeprom {
    type Error = FakeError;

    fn write(&mut self, address: usize, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        if self.fail_writes || address + bytes.len() > self.data.len() {
            return Err(nb::Error::Other(FakeError));
        }
        self.data[address..address + bytes.len()].copy_from_slice(bytes);
        self.write_count += bytes.len();
        Ok(())
    }
}
