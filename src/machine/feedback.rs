//! LED feedback shared by the two bit-entry states: a heartbeat blink and a
//! short flash on the matching LED for every accepted bit.

use crate::config::INDICATOR_TICKS;
use crate::io::{Led, Leds, Level};
use crate::timing::{BlinkTimer, Indicator};

#[derive(Clone, Copy, Debug)]
pub struct BitFeedback {
    heartbeat: BlinkTimer,
    zero: Indicator,
    one: Indicator,
}

impl BitFeedback {
    pub const fn new(blink_period: u32) -> Self {
        Self {
            heartbeat: BlinkTimer::new(blink_period),
            zero: Indicator::new(),
            one: Indicator::new(),
        }
    }

    /// Advance the heartbeat and let expired indicators go dark.
    pub fn step<L: Leds>(&mut self, leds: &mut L) {
        step_heartbeat(&mut self.heartbeat, leds);
        if self.zero.step(INDICATOR_TICKS) {
            leds.set_level(Led::Zero, Level::Off);
        }
        if self.one.step(INDICATOR_TICKS) {
            leds.set_level(Led::One, Level::Off);
        }
    }

    /// Light the indicator for an accepted bit.
    pub fn flash<L: Leds>(&mut self, leds: &mut L, bit: bool) {
        let (led, indicator) = if bit {
            (Led::One, &mut self.one)
        } else {
            (Led::Zero, &mut self.zero)
        };
        leds.set_level(led, Level::On);
        indicator.start();
    }
}

/// Advance a heartbeat blink and mirror any toggle onto the heartbeat LED.
pub fn step_heartbeat<L: Leds>(blink: &mut BlinkTimer, leds: &mut L) {
    if let Some(lit) = blink.step() {
        leds.set_level(Led::Heartbeat, lit.into());
    }
}
