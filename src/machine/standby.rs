//! STANDBY - all LEDs pulse until any button is pressed, then the machine
//! resumes the state it was suspended from.
//!
//! Standby never touches the string or the character in progress.

use super::{Entry, MachineContext, StateBehavior, StateId};
use crate::io::{Buttons, Io, Leds, TransmitSink};
use crate::timing::PwmRamp;

#[derive(Clone, Copy, Debug, Default)]
pub struct Standby {
    ramp: PwmRamp,
}

impl Standby {
    pub const fn new() -> Self {
        Self {
            ramp: PwmRamp::new(),
        }
    }

    pub fn ramp(&self) -> &PwmRamp {
        &self.ramp
    }
}

impl StateBehavior for Standby {
    fn enter<B, L, S>(&mut self, _ctx: &mut MachineContext, io: &mut Io<B, L, S>, _entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Entering STANDBY state ===");
        info!("All LEDs pulsing. Press any button to return.");

        self.ramp = PwmRamp::new();
        io.leds.all_duty(0);
    }

    fn run<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>) -> Option<StateId>
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        let duty = self.ramp.step();
        io.leds.all_duty(duty);
        trace!("Standby duty {}%", duty);

        // Read every button: the waking press, single or chorded, is
        // consumed here and never reaches the resumed state.
        if io.discard_edges() {
            info!("Exiting standby, returning to {}", ctx.previous_state);
            return Some(ctx.previous_state);
        }

        None
    }

    fn exit<B, L, S>(&mut self, _ctx: &mut MachineContext, io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        info!("=== Exiting STANDBY state ===");
        io.leds.all_off();
    }
}
