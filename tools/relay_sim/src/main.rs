//! Runs the relay controller on the host. The EEPROM is a plain file, so
//! availability and security flags survive between invocations exactly as
//! they would survive a power cycle on the board.

extern crate clap;
use clap::clap_app;

use anyhow::{anyhow, Context};
use prodino_lib::{
    devices::{board::Board, cli::Cli, led::Logic, relay::Relays},
    error::{Convertible, Error},
    hal::{
        eeprom,
        gpio::{InputPin, OutputPin},
    },
    ports::{
        board::{FAMILY, INPUT_PINS, PORT, RELAY_PINS, STATUS_LED_PIN},
        PortBoard, EEPROM_SIZE, INPUT_COUNT, MAC,
    },
};
use std::{
    fs,
    io::{self, BufRead, Write},
    path::PathBuf,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum FileEepromError {
    OutOfBounds,
    Io,
}

impl Convertible for FileEepromError {
    fn into(self) -> Error {
        match self {
            FileEepromError::OutOfBounds => Error::DriverError("[File EEPROM] Address out of bounds"),
            FileEepromError::Io => Error::StorageFault,
        }
    }
}

/// EEPROM image kept in memory and written through to a file.
struct FileEeprom {
    path: PathBuf,
    data: Vec<u8>,
}

impl FileEeprom {
    /// Opens an existing image, or starts a fresh one filled with
    /// `erase_value` the way a never-written part would read.
    fn open(path: PathBuf, capacity: usize, erase_value: u8) -> anyhow::Result<Self> {
        let mut data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e).with_context(|| format!("Failed to read {}", path.display())),
        };
        if data.len() > capacity {
            return Err(anyhow!(
                "{} holds {} bytes, but the board EEPROM is {} bytes",
                path.display(),
                data.len(),
                capacity
            ));
        }
        data.resize(capacity, erase_value);
        Ok(Self { path, data })
    }

    fn range(&self, address: usize, length: usize) -> Result<std::ops::Range<usize>, FileEepromError> {
        let end = address.checked_add(length).ok_or(FileEepromError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(FileEepromError::OutOfBounds);
        }
        Ok(address..end)
    }
}

impl eeprom::Read for FileEeprom {
    type Error = FileEepromError;

    fn read(&mut self, address: usize, bytes: &mut [u8]) -> nb::Result<(), Self::Error> {
        let range = self.range(address, bytes.len())?;
        bytes.copy_from_slice(&self.data[range]);
        Ok(())
    }

    fn capacity(&self) -> usize { self.data.len() }
}

impl eeprom::Write for FileEeprom {
    type Error = FileEepromError;

    fn write(&mut self, address: usize, bytes: &[u8]) -> nb::Result<(), Self::Error> {
        let range = self.range(address, bytes.len())?;
        let mut image = self.data.clone();
        image[range].copy_from_slice(bytes);
        fs::write(&self.path, &image).map_err(|_| FileEepromError::Io)?;
        self.data = image;
        Ok(())
    }
}

/// Output that echoes every level change to stderr. Also serves as a
/// fixed level input.
struct SimulatedPin {
    number: u8,
    high: bool,
}

impl SimulatedPin {
    fn new(number: u8) -> Self { Self { number, high: false } }
    fn with_level(number: u8, high: bool) -> Self { Self { number, high } }
}

impl OutputPin for SimulatedPin {
    fn set_low(&mut self) {
        self.high = false;
        eprintln!("PIN > D{} LOW", self.number);
    }

    fn set_high(&mut self) {
        self.high = true;
        eprintln!("PIN > D{} HIGH", self.number);
    }
}

impl InputPin for SimulatedPin {
    fn is_high(&self) -> bool { self.high }
}

/// `uWrite` adapter over a std stream.
struct Console<T: Write>(T);

impl<T: Write> ufmt::uWrite for Console<T> {
    type Error = io::Error;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.write_all(s.as_bytes())?;
        self.0.flush()
    }
}

type SimulatedBoard =
    PortBoard<FileEeprom, SimulatedPin, SimulatedPin, SimulatedPin, Console<io::Stderr>>;

/// Input levels from a string of `0`/`1` characters, one per input.
/// Missing trailing inputs read low.
fn parse_inputs(levels: &str) -> anyhow::Result<[bool; INPUT_COUNT]> {
    if levels.len() > INPUT_COUNT {
        return Err(anyhow!("The board has only {} inputs", INPUT_COUNT));
    }
    let mut parsed = [false; INPUT_COUNT];
    for (level, c) in parsed.iter_mut().zip(levels.chars()) {
        *level = match c {
            '0' => false,
            '1' => true,
            other => return Err(anyhow!("Input levels are 0 or 1, found '{}'", other)),
        };
    }
    Ok(parsed)
}

fn run(mut board: SimulatedBoard, commands: Option<Vec<String>>) -> anyhow::Result<()> {
    let mut cli = Cli::new(Console(io::stdout()));
    eprintln!("SYS > Simulating {} ({}), {} bytes of EEPROM", PORT, FAMILY, EEPROM_SIZE);
    cli.greet(&board);
    match commands {
        Some(commands) => {
            for command in commands {
                cli.process_line(&mut board, &command);
            }
            println!();
        }
        None => {
            for line in io::stdin().lock().lines() {
                cli.process_line(&mut board, &line.context("Failed to read stdin")?);
            }
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let matches = clap_app!(app =>
        (name: env!("CARGO_PKG_NAME"))
        (version: env!("CARGO_PKG_VERSION"))
        (about: env!("CARGO_PKG_DESCRIPTION"))
        (@arg eeprom: -e --eeprom +takes_value "File backing the EEPROM (default: eeprom.bin).")
        (@arg erase_value: --("erase-value") +takes_value
            "Byte a fresh EEPROM image is filled with (default: 255).")
        (@arg command: -c --command +takes_value +multiple
            "Command to run instead of reading stdin. May be repeated.")
        (@arg inputs: -i --inputs +takes_value
            "Input levels as 0/1 characters, first input first (default: all low).")
    )
    .get_matches();

    let path = PathBuf::from(matches.value_of("eeprom").unwrap_or("eeprom.bin"));
    let erase_value = match matches.value_of("erase_value") {
        Some(value) => value.parse::<u8>().context("Erase value must be a byte")?,
        None => 0xFF,
    };
    let commands =
        matches.values_of("command").map(|values| values.map(String::from).collect::<Vec<_>>());

    let levels = parse_inputs(matches.value_of("inputs").unwrap_or(""))?;

    let eeprom = FileEeprom::open(path, EEPROM_SIZE, erase_value)?;
    let pins = RELAY_PINS.map(SimulatedPin::new);
    let relays = Relays::new(eeprom, pins, Console(io::stderr()))
        .map_err(|e| anyhow!("Failed to bring up relays: {}", e))?;
    let mut levels = levels.into_iter();
    let inputs =
        INPUT_PINS.map(|number| SimulatedPin::with_level(number, levels.next().unwrap_or(false)));
    let status_led = SimulatedPin::new(STATUS_LED_PIN);
    let board = Board::new(relays, inputs, status_led, Logic::Direct, &MAC);

    run(board, commands)
}

#[cfg(test)]
mod test {
    use super::*;
    use prodino_lib::hal::eeprom::{Read, Write};

    #[test]
    fn failed_file_writes_leave_the_image_untouched() {
        // Given
        let path = std::env::temp_dir().join("relay_sim_missing_directory").join("eeprom.bin");
        let mut eeprom = FileEeprom::open(path, 16, 0xFF).unwrap();

        // When
        let result = nb::block!(eeprom.write(3, &[0x01]));

        // Then
        assert_eq!(Err(FileEepromError::Io), result);
        let mut byte = [0u8];
        nb::block!(eeprom.read(3, &mut byte)).unwrap();
        assert_eq!([0xFF], byte);
    }

    #[test]
    fn writes_persist_across_reopening() {
        let path = std::env::temp_dir().join("relay_sim_persisted_eeprom.bin");
        fs::remove_file(&path).ok();
        let mut eeprom = FileEeprom::open(path.clone(), 16, 0xFF).unwrap();
        nb::block!(eeprom.write(5, &[0x01])).unwrap();

        let mut reopened = FileEeprom::open(path.clone(), 16, 0xFF).unwrap();
        let mut bytes = [0u8; 2];
        nb::block!(reopened.read(5, &mut bytes)).unwrap();
        assert_eq!([0x01, 0xFF], bytes);
        fs::remove_file(&path).ok();
    }

    #[test]
    fn input_levels_are_parsed_in_pin_order() {
        let levels = parse_inputs("1").unwrap();
        assert!(levels[0]);
        assert!(levels[1..].iter().all(|level| !level));
        assert!(parse_inputs("2").is_err());
        assert!(parse_inputs(&"0".repeat(INPUT_COUNT + 1)).is_err());
    }
}
