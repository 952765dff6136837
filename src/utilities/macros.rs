//! Convenience macros for the relay controller
#![macro_use]

/// Writes a line to the diagnostic side channel.
///
/// The channel is write-only and best effort: a failing sink never
/// fails the operation that emits to it.
///
/// # Example
/// ```ignore
/// diagnostic!(self.serial, "IO > Set relay {} to {}", channel, state);
/// // Expands into:
/// ufmt::uwriteln!(self.serial, "IO > Set relay {} to {}", channel, state).ok();
/// ```
#[macro_export]
macro_rules! diagnostic {
    ($serial:expr, $($arg:tt)*) => {
        ufmt::uwriteln!($serial, $($arg)*).ok()
    };
}

/// Emits a `defmt` log when the `defmt` feature is enabled; expands
/// to nothing otherwise.
#[macro_export]
macro_rules! trace_warn {
    ($($arg:tt)*) => {
        #[cfg(feature = "defmt")]
        defmt::warn!($($arg)*);
    };
}

/// Defines a two-state flag type convertible to and from `bool`, with
/// an explicit name for each state.
///
/// # Example
/// ```ignore
/// binary_flag!(
///     /// Physical relay state.
///     RelayState { Off = "OFF", On = "ON" }
/// );
/// // Expands into an enum where `RelayState::from(true) == RelayState::On`
/// // and `RelayState::On.name() == "ON"`.
/// ```
#[macro_export]
macro_rules! binary_flag {
    ($(#[$meta:meta])* $name:ident { $cleared:ident = $cleared_name:literal, $set:ident = $set_name:literal }) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        #[cfg_attr(feature = "defmt", derive(defmt::Format))]
        pub enum $name {
            $cleared,
            $set,
        }

        impl $name {
            pub const fn name(self) -> &'static str {
                match self {
                    $name::$cleared => $cleared_name,
                    $name::$set => $set_name,
                }
            }

            pub const fn is_set(self) -> bool { matches!(self, $name::$set) }
        }

        impl From<bool> for $name {
            fn from(value: bool) -> Self { if value { $name::$set } else { $name::$cleared } }
        }

        impl From<$name> for bool {
            fn from(value: $name) -> bool { value.is_set() }
        }

        impl core::ops::Not for $name {
            type Output = Self;
            fn not(self) -> Self { Self::from(!self.is_set()) }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl ufmt::uDisplay for $name {
            fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
            where
                W: ufmt::uWrite + ?Sized,
            {
                f.write_str(self.name())
            }
        }
    };
}
