//! Line based command interpreter.
//!
//! This is the entry point a dispatch layer (serial console, network
//! command handler) uses to reach the board. Every argument is parsed and
//! range checked here before it reaches pins or storage, and every failure
//! is reported back as a [`Error`] rather than silently ignored.
//!
//! Command syntax is `name [flag] [key=value]...`, e.g.
//! `set relay=2 state=on`.
#![macro_use]
use crate::{
    devices::{board::Board, relay::RelayCommand, traits::RelayPin},
    hal::{
        eeprom,
        gpio::{InputPin, OutputPin},
    },
};
use core::str::{FromStr, SplitWhitespace};
use ufmt::{uWrite, uwrite, uwriteln};

macro_rules! commands {
    (
        $cli:ident, $board:ident, $names:ident, $helpstrings:ident [
            $(
                $c:ident [$h:expr] ($($a:ident$(: $t:ty)? [$ah:expr],)*) $command:block,
            )+
        ]
    ) => {
        const NAMES: &[Name<'static>] = &[$(stringify!($c),)+];
        const HELP_STRINGS: &[HelpString] = &[$(($h, &[$((stringify!($a), $ah),)*]),)+];

        pub(super) fn run<W, E, P, I, L, S, const N: usize, const M: usize>(
            $cli: &mut Cli<W>,
            $board: &mut Board<E, P, I, L, S, N, M>,
            name: Name<'_>,
            arguments: Arguments<'_>,
        ) -> Result<(), Error>
        where
            W: uWrite,
            E: eeprom::ReadWrite,
            crate::error::Error: From<<E as eeprom::Read>::Error>,
            P: RelayPin,
            I: InputPin,
            L: OutputPin,
            S: uWrite,
        {
            #[allow(unused_variables)]
            let ($names, $helpstrings) = (NAMES, HELP_STRINGS);
            match name {
                $(
                    stringify!($c) => {
                        $(
                            // If argument is just a flag, get as bool
                            #[allow(unused_variables)]
                            let $a = arguments.is_set(stringify!($a));
                            // If not a flag, shadow with its value
                            $(let $a: Option<$t> = arguments.get_value(stringify!($a))?;)?
                        )*
                        $command
                    },
                )+
                _ => Err(Error::CommandUnknown),
            }
        }
    };
}

mod commands;

pub const GREETING: &str = "--=ProDino CLI=--";
const PROMPT: &str = "> ";

/// Command help text, followed by the name and help text of each argument.
type HelpString = (&'static str, &'static [(&'static str, &'static str)]);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    CommandEmpty,
    CommandUnknown,
    MalformedArguments,
    CharactersNotAllowed,
    MissingArgument,
    /// The command reached the relays, which refused it.
    Application(crate::error::Error),
}

impl From<crate::error::Error> for Error {
    fn from(error: crate::error::Error) -> Self { Error::Application(error) }
}

impl Error {
    pub fn report<W: uWrite>(&self, serial: &mut W) {
        match self {
            Error::CommandEmpty => uwriteln!(serial, "[CLI Error] -> Command is empty"),
            Error::CommandUnknown => {
                uwriteln!(serial, "[CLI Error] -> Unknown command, try `help`")
            }
            Error::MalformedArguments => uwriteln!(serial, "[CLI Error] -> Malformed arguments"),
            Error::CharactersNotAllowed => {
                uwriteln!(serial, "[CLI Error] -> Command contains illegal characters")
            }
            Error::MissingArgument => uwriteln!(serial, "[CLI Error] -> Missing argument"),
            Error::Application(error) => {
                error.report(serial);
                Ok(())
            }
        }
        .ok();
    }
}

pub struct Cli<W: uWrite> {
    serial: W,
}

type Name<'a> = &'a str;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Argument<'a> {
    Single(&'a str),
    Pair(&'a str, &'a str),
}

#[derive(Clone)]
struct Arguments<'a> {
    tokens: SplitWhitespace<'a>,
}

impl<'a> Iterator for Arguments<'a> {
    type Item = Argument<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.tokens.next()?;
        Some(match token.split_once(ARGUMENT_SEPARATOR) {
            Some((name, value)) => Argument::Pair(name, value),
            None => Argument::Single(token),
        })
    }
}

impl<'a> Arguments<'a> {
    fn is_set(&self, name: &str) -> bool {
        self.clone().any(|arg| match arg {
            Argument::Pair(n, _) => n == name,
            Argument::Single(n) => n == name,
        })
    }

    /// Locates a specific pair-argument value given its name and type.
    /// Absent arguments are `None`; present but unparsable ones (or bare
    /// flags where a value is expected) are malformed.
    fn get_value<T: FromStr>(&self, name: &str) -> Result<Option<T>, Error> {
        match self.clone().find(|arg| match arg {
            Argument::Pair(n, _) => *n == name,
            Argument::Single(n) => *n == name,
        }) {
            Some(Argument::Pair(_, value)) => {
                value.parse().map(Some).map_err(|_| Error::MalformedArguments)
            }
            Some(Argument::Single(_)) => Err(Error::MalformedArguments),
            None => Ok(None),
        }
    }
}

impl FromStr for RelayCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" | "ON" | "1" => Ok(RelayCommand::On),
            "off" | "OFF" | "0" => Ok(RelayCommand::Off),
            "toggle" | "TOGGLE" => Ok(RelayCommand::Toggle),
            _ => Err(Error::MalformedArguments),
        }
    }
}

const ARGUMENT_SEPARATOR: char = '=';
const ALLOWED_TOKENS: &str = " =_";

impl<W: uWrite> Cli<W> {
    pub fn new(serial: W) -> Self { Self { serial } }

    /// Prints the greeting, the board identity and the first prompt.
    pub fn greet<E, P, I, L, S, const N: usize, const M: usize>(
        &mut self,
        board: &Board<E, P, I, L, S, N, M>,
    ) where
        E: eeprom::ReadWrite,
        crate::error::Error: From<<E as eeprom::Read>::Error>,
        P: RelayPin,
        I: InputPin,
        L: OutputPin,
        S: uWrite,
    {
        uwriteln!(self.serial, "{}", GREETING).ok();
        board.identify(&mut self.serial);
        uwrite!(self.serial, "{}", PROMPT).ok();
    }

    /// Interprets a line and reports any failure on the serial, then
    /// prompts for the next one. The status LED is resynchronized whether
    /// or not the command succeeded.
    pub fn process_line<E, P, I, L, S, const N: usize, const M: usize>(
        &mut self,
        board: &mut Board<E, P, I, L, S, N, M>,
        line: &str,
    ) where
        E: eeprom::ReadWrite,
        crate::error::Error: From<<E as eeprom::Read>::Error>,
        P: RelayPin,
        I: InputPin,
        L: OutputPin,
        S: uWrite,
    {
        if let Err(error) = self.interpret_line(board, line) {
            error.report(&mut self.serial);
        }
        board.sync_status_led();
        uwrite!(self.serial, "{}", PROMPT).ok();
    }

    pub fn interpret_line<E, P, I, L, S, const N: usize, const M: usize>(
        &mut self,
        board: &mut Board<E, P, I, L, S, N, M>,
        line: &str,
    ) -> Result<(), Error>
    where
        E: eeprom::ReadWrite,
        crate::error::Error: From<<E as eeprom::Read>::Error>,
        P: RelayPin,
        I: InputPin,
        L: OutputPin,
        S: uWrite,
    {
        let (name, arguments) = Self::parse(line)?;
        commands::run(self, board, name, arguments)
    }

    pub fn release(self) -> W { self.serial }

    fn parse(text: &str) -> Result<(Name<'_>, Arguments<'_>), Error> {
        let text = text.trim_end_matches(|c: char| "\r\n ".contains(c));
        if !text.chars().all(|c| c.is_alphanumeric() || ALLOWED_TOKENS.contains(c)) {
            return Err(Error::CharactersNotAllowed);
        }

        let mut tokens = text.split_whitespace();
        let name = tokens.next().ok_or(Error::CommandEmpty)?;
        if !tokens.clone().all(|t| t.split(ARGUMENT_SEPARATOR).count() <= 2) {
            return Err(Error::MalformedArguments);
        }
        Ok((name, Arguments { tokens }))
    }

    fn print_help(&mut self, names: &[Name<'_>], helpstrings: &[HelpString]) {
        uwriteln!(self.serial, "Available commands:").ok();
        for (name, (help, arguments)) in names.iter().zip(helpstrings) {
            uwriteln!(self.serial, "  {} - {}", *name, *help).ok();
            for (argument, argument_help) in arguments.iter() {
                uwriteln!(self.serial, "      {}: {}", *argument, *argument_help).ok();
            }
        }
    }
}
