use super::{Arguments, Cli, Error, HelpString, Name};
use crate::{
    devices::{board::Board, relay::RelayCommand, traits::RelayPin},
    hal::{
        eeprom,
        gpio::{InputPin, OutputPin},
    },
};
use ufmt::{uWrite, uwriteln};

commands!( cli, board, names, helpstrings [

    help ["Displays a list of commands."] () {
        cli.print_help(names, helpstrings);
        Ok(())
    },

    status ["Lists relay state, availability and security."] (
        relay: usize ["Optional relay index, all relays if omitted."],
    ) {
        match relay {
            Some(relay) => {
                let status = board.relays_mut().status(relay)?;
                uwriteln!(cli.serial, "{}", status).ok();
            }
            None => {
                for relay in 0..board.relays().relay_count() {
                    let status = board.relays_mut().status(relay)?;
                    uwriteln!(cli.serial, "{}", status).ok();
                }
            }
        }
        Ok(())
    },

    inputs ["Lists the levels of the optocoupled inputs."] () {
        for (index, level) in board.inputs().enumerate() {
            uwriteln!(cli.serial, "[{}] {}", index, level).ok();
        }
        Ok(())
    },

    set ["Drives an available relay."] (
        relay: usize ["Relay index."],
        state: RelayCommand ["on, off or toggle."],
    ) {
        let relay = relay.ok_or(Error::MissingArgument)?;
        let state = board.relays_mut().apply(relay, state.ok_or(Error::MissingArgument)?)?;
        uwriteln!(cli.serial, "Relay {} is {}", relay, state).ok();
        Ok(())
    },

    toggle ["Flips an available relay."] (
        relay: usize ["Relay index."],
    ) {
        let relay = relay.ok_or(Error::MissingArgument)?;
        let state = board.relays_mut().toggle_state(relay)?;
        uwriteln!(cli.serial, "Relay {} is {}", relay, state).ok();
        Ok(())
    },

    available ["Allows or forbids state changes on a relay. Persisted."] (
        relay: usize ["Relay index."],
        value: bool ["true or false."],
    ) {
        let relay = relay.ok_or(Error::MissingArgument)?;
        board.relays_mut().set_available(relay, value.ok_or(Error::MissingArgument)?)?;
        Ok(())
    },

    secure ["Marks a relay as security sensitive. Persisted."] (
        relay: usize ["Relay index."],
        value: bool ["true or false."],
    ) {
        let relay = relay.ok_or(Error::MissingArgument)?;
        board.relays_mut().set_secure(relay, value.ok_or(Error::MissingArgument)?)?;
        Ok(())
    },

    provision ["Clears flags still in their erased, never written state."] () {
        let provisioned = board.relays_mut().provision()?;
        uwriteln!(cli.serial, "{} flag bytes provisioned", provisioned).ok();
        Ok(())
    },

    clear ["Erases the whole EEPROM, disabling every relay."] (
        confirm ["Required, as this can't be undone."],
    ) {
        if !confirm {
            return Err(Error::MissingArgument);
        }
        board.relays_mut().clear_persistent_store()?;
        uwriteln!(cli.serial, "EEPROM cleared").ok();
        Ok(())
    },

]);
