//! # ProDino Relay Controller Library
//!
//! This crate contains the relay control surface of the ProDino
//! board family in library form: persistent availability and security
//! flags, gated relay operations, and the line based CLI that exposes
//! them.
#![cfg_attr(test, allow(unused_imports))]
#![cfg_attr(not(test), no_std)]

extern crate static_assertions;

#[macro_use]
pub mod utilities {
    mod macros;
}

pub mod hal;
pub mod devices;
pub mod ports;
pub mod error;
