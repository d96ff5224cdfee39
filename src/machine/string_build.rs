//! STRING_BUILD - keep appending characters, or finalize the string.
//!
//! Once a character has eight bits, the next Zero/One press saves it and
//! becomes bit 0 of a new character, so no press is lost. Clear deletes the
//! whole string; Commit saves any complete character and finalizes.

use super::feedback::BitFeedback;
use super::{Entry, MachineContext, StateBehavior, StateId};
use crate::bits::ByteAssembler;
use crate::config::STRING_BUILD_BLINK_TICKS;
use crate::io::{Button, Buttons, Io, Leds, TransmitSink};

#[derive(Clone, Copy, Debug)]
pub struct StringBuild {
    feedback: BitFeedback,
}

impl Default for StringBuild {
    fn default() -> Self {
        Self::new()
    }
}

impl StringBuild {
    pub const fn new() -> Self {
        Self {
            feedback: BitFeedback::new(STRING_BUILD_BLINK_TICKS),
        }
    }

    fn enter_bit<L: Leds>(&mut self, ctx: &mut MachineContext, leds: &mut L, bit: bool) {
        if ctx.byte.is_complete() {
            // Auto-save the finished character; this press starts the next one.
            if let Err(advisory) = ctx.commit_byte() {
                ctx.raise(advisory);
                return;
            }
            ctx.byte = ByteAssembler::starting_with(bit);
        } else if let Err(advisory) = ctx.byte.push_bit(bit) {
            ctx.raise(advisory);
            return;
        }

        self.feedback.flash(leds, bit);
        debug!(
            "Bit {}: {} | Current char: {:#x} ({} bits)",
            ctx.byte.bit_count() - 1,
            bit as u8,
            ctx.byte.value(),
            ctx.byte.bit_count()
        );
    }
}

impl StateBehavior for StringBuild {
    fn enter<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>, entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Entering STRING_BUILD state ===");
        info!(
            "Current string: \"{=[u8]:a}\" ({} chars)",
            ctx.string.as_bytes(),
            ctx.string.len()
        );
        info!("Zero/One: add another character | Clear: delete string | Commit: finalize string");

        if entry == Entry::Fresh {
            ctx.byte.reset();
        }
        self.feedback = BitFeedback::new(STRING_BUILD_BLINK_TICKS);
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
            info!("String deleted");
            ctx.string.wipe();
            return Some(StateId::CharEntry);
        }

        if io.pressed(Button::Commit) {
            if ctx.byte.is_complete() {
                if let Err(advisory) = ctx.commit_byte() {
                    ctx.raise(advisory);
                }
            } else if ctx.byte.bit_count() > 0 {
                debug!("Discarding partial character ({} bits)", ctx.byte.bit_count());
                ctx.byte.reset();
            }
            info!("String finalized: \"{=[u8]:a}\"", ctx.string.as_bytes());
            return Some(StateId::StringConfirm);
        }

        None
    }

    fn exit<B, L, S>(&mut self, _ctx: &mut MachineContext, _io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Exiting STRING_BUILD state ===");
    }
}
