//! STRING_CONFIRM - send the finalized string, or throw it away.

use super::feedback::step_heartbeat;
use super::{Entry, MachineContext, StateBehavior, StateId};
use crate::config::STRING_CONFIRM_BLINK_TICKS;
use crate::io::{Button, Buttons, Io, Leds, TransmitSink};
use crate::timing::BlinkTimer;

#[derive(Clone, Copy, Debug)]
pub struct StringConfirm {
    heartbeat: BlinkTimer,
}

impl Default for StringConfirm {
    fn default() -> Self {
        Self::new()
    }
}

impl StringConfirm {
    pub const fn new() -> Self {
        Self {
            heartbeat: BlinkTimer::new(STRING_CONFIRM_BLINK_TICKS),
        }
    }
}

impl StateBehavior for StringConfirm {
    fn enter<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>, _entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Entering STRING_CONFIRM state ===");
        info!("String ready: \"{=[u8]:a}\"", ctx.string.as_bytes());
        info!("Clear: delete and restart | Commit: send");

        self.heartbeat = BlinkTimer::new(STRING_CONFIRM_BLINK_TICKS);
        io.leds.all_off();
    }

    fn run<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>) -> Option<StateId>
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        step_heartbeat(&mut self.heartbeat, &mut io.leds);

        // Bit buttons do nothing here; drain them so a stray press does not
        // turn into a bit after returning to CHAR_ENTRY.
        io.pressed(Button::Zero);
        io.pressed(Button::One);

        if io.pressed(Button::Clear) {
            info!("String deleted, returning to entry mode");
            ctx.string.wipe();
            return Some(StateId::CharEntry);
        }

        if io.pressed(Button::Commit) {
            io.sink.emit(ctx.string.as_bytes());
            info!("TRANSMITTED STRING: \"{=[u8]:a}\"", ctx.string.as_bytes());
            ctx.string.wipe();
            return Some(StateId::CharEntry);
        }

        None
    }

    fn exit<B, L, S>(&mut self, _ctx: &mut MachineContext, _io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Exiting STRING_CONFIRM state ===");
    }
}
