//! Bit-by-bit character assembly and the fixed-capacity string buffer.

use crate::config::{BITS_PER_CHAR, STRING_CAPACITY};
use crate::error::Advisory;

/// A character being entered one bit at a time, least significant bit first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByteAssembler {
    value: u8,
    bit_count: u8,
}

impl ByteAssembler {
    pub const fn new() -> Self {
        Self {
            value: 0,
            bit_count: 0,
        }
    }

    /// Start a new character whose bit 0 is already `bit`.
    pub const fn starting_with(bit: bool) -> Self {
        Self {
            value: bit as u8,
            bit_count: 1,
        }
    }

    /// Append the next bit. Rejected once eight bits are in.
    pub fn push_bit(&mut self, bit: bool) -> Result<(), Advisory> {
        if self.is_complete() {
            return Err(Advisory::ByteComplete);
        }
        if bit {
            self.value |= 1 << self.bit_count;
        }
        self.bit_count += 1;
        Ok(())
    }

    /// The finished character, or why it is not ready yet.
    pub fn complete(&self) -> Result<u8, Advisory> {
        if self.is_complete() {
            Ok(self.value)
        } else {
            Err(Advisory::IncompleteByte {
                bits: self.bit_count,
            })
        }
    }

    pub fn is_complete(&self) -> bool {
        self.bit_count >= BITS_PER_CHAR
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Bits committed so far (the partial character value).
    pub fn value(&self) -> u8 {
        self.value
    }

    pub fn bit_count(&self) -> u8 {
        self.bit_count
    }
}

/// The composed string: up to `STRING_CAPACITY` bytes followed by a zero
/// terminator, which is always present at `bytes[len]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StringBuffer {
    bytes: [u8; STRING_CAPACITY + 1],
    len: usize,
}

impl Default for StringBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl StringBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; STRING_CAPACITY + 1],
            len: 0,
        }
    }

    pub fn push(&mut self, byte: u8) -> Result<(), Advisory> {
        if self.is_full() {
            return Err(Advisory::BufferFull);
        }
        self.bytes[self.len] = byte;
        self.len += 1;
        self.bytes[self.len] = 0;
        Ok(())
    }

    /// Zero the whole buffer.
    pub fn wipe(&mut self) {
        self.bytes = [0; STRING_CAPACITY + 1];
        self.len = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// The contents including the trailing terminator.
    pub fn as_bytes_with_terminator(&self) -> &[u8] {
        &self.bytes[..=self.len]
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len >= STRING_CAPACITY
    }
}

/// Character shown in logs for a byte: itself when printable, `?` otherwise.
pub fn printable(byte: u8) -> char {
    if byte >= 32 {
        byte as char
    } else {
        '?'
    }
}
