//! Advisory conditions raised by the state machine.
//!
//! Nothing in the core is fatal. Each variant describes an input that was
//! rejected; the machine logs it, records it, and keeps running.
//! We avoid `alloc` - all variants carry only fixed-size data.

/// A rejected input, reported through the log and `Machine::take_advisory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Advisory {
    /// The string already holds `STRING_CAPACITY` characters.
    BufferFull,

    /// A save was requested before all eight bits were entered.
    IncompleteByte {
        /// Bits entered so far.
        bits: u8,
    },

    /// A bit was entered while the character already has eight bits.
    ByteComplete,
}

impl core::fmt::Display for Advisory {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Advisory::BufferFull => f.write_str("string buffer full"),
            Advisory::IncompleteByte { bits } => {
                write!(f, "need 8 bits to save character (currently have {})", bits)
            }
            Advisory::ByteComplete => f.write_str("character already has 8 bits"),
        }
    }
}
