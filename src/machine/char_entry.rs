//! CHAR_ENTRY - enter the first character of a string, bit by bit.
//!
//! Zero/One append a bit (LSB first), Clear restarts the character, Commit
//! saves a complete character and moves on to building the string.

use super::feedback::BitFeedback;
use super::{Entry, MachineContext, StateBehavior, StateId};
use crate::config::CHAR_ENTRY_BLINK_TICKS;
use crate::io::{Button, Buttons, Io, Leds, TransmitSink};

#[derive(Clone, Copy, Debug)]
pub struct CharEntry {
    feedback: BitFeedback,
}

impl Default for CharEntry {
    fn default() -> Self {
        Self::new()
    }
}

impl CharEntry {
    pub const fn new() -> Self {
        Self {
            feedback: BitFeedback::new(CHAR_ENTRY_BLINK_TICKS),
        }
    }

    fn enter_bit<L: Leds>(&mut self, ctx: &mut MachineContext, leds: &mut L, bit: bool) {
        match ctx.byte.push_bit(bit) {
            Ok(()) => {
                self.feedback.flash(leds, bit);
                debug!(
                    "Bit {}: {} | Current char: {:#x} ({} bits)",
                    ctx.byte.bit_count() - 1,
                    bit as u8,
                    ctx.byte.value(),
                    ctx.byte.bit_count()
                );
            }
            Err(advisory) => ctx.raise(advisory),
        }
    }
}

impl StateBehavior for CharEntry {
    fn enter<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>, entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Entering CHAR_ENTRY state ===");
        info!("Zero/One: enter a bit | Clear: reset character | Commit: save character");

        if entry == Entry::Fresh {
            ctx.byte.reset();
        }
        self.feedback = BitFeedback::new(CHAR_ENTRY_BLINK_TICKS);
        io.leds.all_off();
    }

    fn run<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>) -> Option<StateId>
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        self.feedback.step(&mut io.leds);

        if io.pressed(Button::Zero) {
            self.enter_bit(ctx, &mut io.leds, false);
        }

        if io.pressed(Button::One) {
            self.enter_bit(ctx, &mut io.leds, true);
        }

        if io.pressed(Button::Clear) {
            info!("Character reset");
            ctx.byte.reset();
        }

        if io.pressed(Button::Commit) {
            match ctx.commit_byte() {
                Ok(_) => return Some(StateId::StringBuild),
                Err(advisory) => ctx.raise(advisory),
            }
        }

        None
    }

    fn exit<B, L, S>(&mut self, _ctx: &mut MachineContext, _io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Exiting CHAR_ENTRY state ===");
    }
}
