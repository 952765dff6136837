//! Relay control surface.
//!
//! Owns the relay pins, the persistent flag store and the diagnostic
//! channel. The availability flag is the single policy gate: a channel
//! whose flag is cleared rejects every state change and its pin is left
//! untouched. The security flag is advisory and never consulted here.
//!
//! Every operation validates the channel index before touching pins or
//! storage.
use super::{
    flag_store::{FlagClass, FlagStore},
    traits::RelayPin,
};
use crate::{error::Error, hal::eeprom};
use ufmt::{uDisplay, uWrite, uwrite, Formatter};

binary_flag!(
    /// Physical level of a relay's output pin. Not persisted.
    RelayState { Off = "OFF", On = "ON" }
);

binary_flag!(
    /// Whether a channel accepts state changes.
    Availability { Unavailable = "OFFLINE", Available = "ONLINE" }
);

binary_flag!(
    /// Advisory security classification, consumed by external policy.
    Security { Insecure = "INSECURE", Secure = "SECURE" }
);

/// What a dispatch layer may ask a relay to do.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RelayCommand {
    Off,
    On,
    Toggle,
}

impl RelayCommand {
    pub const fn name(self) -> &'static str {
        match self {
            RelayCommand::Off => "OFF",
            RelayCommand::On => "ON",
            RelayCommand::Toggle => "TOGGLE",
        }
    }
}

impl From<RelayState> for RelayCommand {
    fn from(state: RelayState) -> Self {
        match state {
            RelayState::Off => RelayCommand::Off,
            RelayState::On => RelayCommand::On,
        }
    }
}

impl uDisplay for RelayCommand {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// Snapshot of everything known about a channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChannelStatus {
    pub channel: usize,
    pub state: RelayState,
    pub availability: Availability,
    pub security: Security,
}

impl uDisplay for ChannelStatus {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uwrite!(f, "[{}] {} {} {}", self.channel, self.state, self.availability, self.security)
    }
}

pub struct Relays<E, P, S, const N: usize>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
    P: RelayPin,
    S: uWrite,
{
    flags: FlagStore<E, N>,
    pins: [P; N],
    serial: S,
}

impl<E, P, S, const N: usize> Relays<E, P, S, N>
where
    E: eeprom::ReadWrite,
    Error: From<<E as eeprom::Read>::Error>,
    P: RelayPin,
    S: uWrite,
{
    /// Takes ownership of the relay pins, indexed by channel. Pins keep
    /// their power-on level until a channel is explicitly driven.
    pub fn new(eeprom: E, pins: [P; N], serial: S) -> Result<Self, Error> {
        Ok(Self { flags: FlagStore::new(eeprom)?, pins, serial })
    }

    pub const fn relay_count(&self) -> usize { N }

    pub fn set_available(&mut self, channel: usize, available: bool) -> Result<(), Error> {
        self.flags.write_flag(channel, FlagClass::Availability, available)?;
        diagnostic!(self.serial, "IO > Set relay {} to {}", channel, Availability::from(available));
        Ok(())
    }

    pub fn is_available(&mut self, channel: usize) -> Result<bool, Error> {
        let available = self.flags.read_flag(channel, FlagClass::Availability)?;
        #[cfg(feature = "verbose-io")]
        diagnostic!(self.serial, "IO > Relay {} is {}", channel, Availability::from(available));
        Ok(available)
    }

    pub fn set_secure(&mut self, channel: usize, secure: bool) -> Result<(), Error> {
        self.flags.write_flag(channel, FlagClass::Security, secure)?;
        diagnostic!(self.serial, "IO > Set relay {} to {}", channel, Security::from(secure));
        Ok(())
    }

    pub fn is_secure(&mut self, channel: usize) -> Result<bool, Error> {
        let secure = self.flags.read_flag(channel, FlagClass::Security)?;
        #[cfg(feature = "verbose-io")]
        diagnostic!(self.serial, "IO > Relay {} is {}", channel, Security::from(secure));
        Ok(secure)
    }

    /// Drives a channel's pin. Unavailable channels are rejected with
    /// [`Error::ChannelUnavailable`] and their pin is not touched.
    pub fn set_state(&mut self, channel: usize, state: RelayState) -> Result<(), Error> {
        self.ensure_available(channel)?;
        self.drive(channel, state)?;
        diagnostic!(self.serial, "IO > Set relay {} to {}", channel, state);
        Ok(())
    }

    /// Drives a channel's pin to the complement of its current level,
    /// returning the new state. The new level is derived from an immediate
    /// read of the pin, so toggles on the same channel must be serialized.
    pub fn toggle_state(&mut self, channel: usize) -> Result<RelayState, Error> {
        self.ensure_available(channel)?;
        let state = !self.state(channel)?;
        self.drive(channel, state)?;
        diagnostic!(self.serial, "IO > Toggle relay {} to {}", channel, state);
        Ok(state)
    }

    /// Physical level of a channel's pin. Reading is allowed regardless
    /// of availability.
    pub fn state(&self, channel: usize) -> Result<RelayState, Error> {
        let pin = self.pins.get(channel).ok_or(Error::InvalidChannel)?;
        Ok(RelayState::from(pin.is_high()))
    }

    /// Runs a dispatch layer command, returning the resulting state.
    pub fn apply(&mut self, channel: usize, command: RelayCommand) -> Result<RelayState, Error> {
        match command {
            RelayCommand::Off => self.set_state(channel, RelayState::Off).map(|_| RelayState::Off),
            RelayCommand::On => self.set_state(channel, RelayState::On).map(|_| RelayState::On),
            RelayCommand::Toggle => self.toggle_state(channel),
        }
    }

    pub fn status(&mut self, channel: usize) -> Result<ChannelStatus, Error> {
        Ok(ChannelStatus {
            channel,
            state: self.state(channel)?,
            availability: self.is_available(channel)?.into(),
            security: self.is_secure(channel)?.into(),
        })
    }

    /// Factory reset: zeroes the whole EEPROM, leaving every channel
    /// unavailable and insecure. Pin levels are not changed.
    pub fn clear_persistent_store(&mut self) -> Result<(), Error> {
        diagnostic!(self.serial, "SYS > Clearing EEPROM ({} bytes)", self.flags.capacity());
        self.flags.clear_all()?;
        diagnostic!(self.serial, "SYS > EEPROM cleared!");
        Ok(())
    }

    /// First boot provisioning: any flag byte the medium still holds in its
    /// erased state is explicitly written as cleared.
    pub fn provision(&mut self) -> Result<usize, Error> {
        let provisioned = self.flags.provision()?;
        if provisioned > 0 {
            diagnostic!(self.serial, "SYS > Provisioned {} flag bytes", provisioned);
        }
        Ok(provisioned)
    }

    /// Gives back the EEPROM, pins and diagnostic channel.
    pub fn release(self) -> (E, [P; N], S) { (self.flags.release(), self.pins, self.serial) }

    fn ensure_available(&mut self, channel: usize) -> Result<(), Error> {
        if self.is_available(channel)? {
            Ok(())
        } else {
            Err(Error::ChannelUnavailable)
        }
    }

    fn drive(&mut self, channel: usize, state: RelayState) -> Result<(), Error> {
        let pin = self.pins.get_mut(channel).ok_or(Error::InvalidChannel)?;
        match state {
            RelayState::On => pin.set_high(),
            RelayState::Off => pin.set_low(),
        }
        if pin.is_high() == state.is_set() {
            Ok(())
        } else {
            trace_warn!("Relay {} didn't reach {}", channel, state);
            Err(Error::PinFault)
        }
    }
}
