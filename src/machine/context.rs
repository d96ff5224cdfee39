//! Long-lived data shared by all states.

use super::StateId;
use crate::bits::{ByteAssembler, StringBuffer};
use crate::config::STANDBY_HOLD_TICKS;
use crate::error::Advisory;
use crate::hold::HoldGuard;

/// Everything that survives state transitions.
///
/// Per-state data (blink timers, indicators, the standby ramp) lives in the
/// state structs instead and is rebuilt on every entry.
#[derive(Clone, Debug)]
pub struct MachineContext {
    pub(crate) active_state: StateId,
    pub(crate) previous_state: StateId,
    pub(crate) string: StringBuffer,
    pub(crate) byte: ByteAssembler,
    pub(crate) guard: HoldGuard,
    pub(crate) last_advisory: Option<Advisory>,
}

impl Default for MachineContext {
    fn default() -> Self {
        Self::new()
    }
}

impl MachineContext {
    pub const fn new() -> Self {
        Self {
            active_state: StateId::CharEntry,
            previous_state: StateId::CharEntry,
            string: StringBuffer::new(),
            byte: ByteAssembler::new(),
            guard: HoldGuard::new(STANDBY_HOLD_TICKS),
            last_advisory: None,
        }
    }

    pub fn active_state(&self) -> StateId {
        self.active_state
    }

    /// The state standby returns to.
    pub fn previous_state(&self) -> StateId {
        self.previous_state
    }

    pub fn string(&self) -> &StringBuffer {
        &self.string
    }

    pub fn byte(&self) -> &ByteAssembler {
        &self.byte
    }

    pub fn current_char(&self) -> u8 {
        self.byte.value()
    }

    pub fn bit_count(&self) -> u8 {
        self.byte.bit_count()
    }

    pub fn guard(&self) -> &HoldGuard {
        &self.guard
    }

    pub fn last_advisory(&self) -> Option<Advisory> {
        self.last_advisory
    }

    /// Log and record a rejected input.
    pub(crate) fn raise(&mut self, advisory: Advisory) {
        warn!("{}", advisory);
        self.last_advisory = Some(advisory);
    }

    /// Append the completed character to the string and start a new one.
    ///
    /// On rejection nothing changes: an incomplete character stays as it is
    /// and a full buffer keeps the pending character.
    pub(crate) fn commit_byte(&mut self) -> Result<u8, Advisory> {
        let byte = self.byte.complete()?;
        self.string.push(byte)?;
        self.byte.reset();
        info!(
            "Character saved: '{}' ({:#x}), string is {} chars",
            crate::bits::printable(byte),
            byte,
            self.string.len()
        );
        Ok(byte)
    }
}
