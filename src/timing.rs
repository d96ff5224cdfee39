//! Tick-based timing primitives shared by every state.
//!
//! All timers count ticks of the state machine rather than wall-clock time,
//! so tests can simulate any duration by calling `tick()` in a loop.

use crate::config::{PWM_MAX, PWM_STEP};

/// A point on the wrapping 32-bit tick counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick(pub u32);

impl Tick {
    /// Ticks elapsed since `earlier`, correct across counter wraparound.
    pub const fn elapsed_since(self, earlier: Tick) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn wrapping_add(self, ticks: u32) -> Tick {
        Tick(self.0.wrapping_add(ticks))
    }
}

/// Monotonic tick source.
pub trait Clock {
    fn now(&self) -> Tick;
}

/// A tick counter advanced explicitly by its owner.
///
/// The firmware uses the embassy clock instead; this one drives host tests
/// and any loop that counts its own ticks.
#[derive(Clone, Copy, Debug, Default)]
pub struct TickCounter {
    now: Tick,
}

impl TickCounter {
    pub const fn new() -> Self {
        Self { now: Tick(0) }
    }

    /// Start counting from an arbitrary value (e.g. just before wraparound).
    pub const fn starting_at(start: u32) -> Self {
        Self { now: Tick(start) }
    }

    pub fn advance(&mut self, ticks: u32) {
        self.now = self.now.wrapping_add(ticks);
    }
}

impl Clock for TickCounter {
    fn now(&self) -> Tick {
        self.now
    }
}

/// Periodic on/off toggler for the heartbeat LED.
#[derive(Clone, Copy, Debug)]
pub struct BlinkTimer {
    period: u32,
    counter: u32,
    lit: bool,
}

impl BlinkTimer {
    /// Toggle once every `period` steps (a full on/off cycle is `2 * period`).
    pub const fn new(period: u32) -> Self {
        Self {
            period,
            counter: 0,
            lit: false,
        }
    }

    /// Advance one tick. Returns the new level when the output toggles.
    pub fn step(&mut self) -> Option<bool> {
        self.counter += 1;
        if self.counter >= self.period {
            self.counter = 0;
            self.lit = !self.lit;
            Some(self.lit)
        } else {
            None
        }
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

/// One-shot timer that keeps a press-feedback LED lit for a fixed time.
///
/// Idle at zero. `start` sets it to one; each step then counts up until the
/// duration is reached, at which point it reports expiry and goes idle.
#[derive(Clone, Copy, Debug, Default)]
pub struct Indicator {
    elapsed: u32,
}

impl Indicator {
    pub const fn new() -> Self {
        Self { elapsed: 0 }
    }

    pub fn start(&mut self) {
        self.elapsed = 1;
    }

    pub fn is_active(&self) -> bool {
        self.elapsed > 0
    }

    /// Advance one tick. Returns `true` on the tick the LED must go dark.
    pub fn step(&mut self, duration: u32) -> bool {
        if self.elapsed == 0 {
            return false;
        }
        self.elapsed += 1;
        if self.elapsed >= duration {
            self.elapsed = 0;
            true
        } else {
            false
        }
    }
}

/// Triangular duty-cycle ramp for the standby pulse: 0 → 100 → 0 → ...
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PwmRamp {
    duty: u8,
    increasing: bool,
}

impl Default for PwmRamp {
    fn default() -> Self {
        Self::new()
    }
}

impl PwmRamp {
    pub const fn new() -> Self {
        Self {
            duty: 0,
            increasing: true,
        }
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn is_increasing(&self) -> bool {
        self.increasing
    }

    /// Advance one tick and return the duty to apply.
    ///
    /// The ramp sits at each end for one extra tick while it turns around.
    pub fn step(&mut self) -> u8 {
        if self.increasing {
            self.duty = self.duty.saturating_add(PWM_STEP);
            if self.duty >= PWM_MAX {
                self.duty = PWM_MAX;
                self.increasing = false;
            }
        } else if self.duty >= PWM_STEP {
            self.duty -= PWM_STEP;
        } else {
            self.duty = 0;
            self.increasing = true;
        }
        self.duty
    }
}
