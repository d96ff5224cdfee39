//! Dual-button long-press detection for entering standby.
//!
//! Each of the two designated buttons has its own hold timer, started the
//! first tick the button is seen down and cleared the first tick it is seen
//! up. The guard fires once both timers are running and each has been
//! running for at least the threshold. The buttons do not have to go down
//! on the same tick.

use crate::timing::Tick;

/// Tracks one button's continuous hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HoldTimer {
    held: bool,
    /// Valid only while `held`.
    hold_start: Tick,
}

impl HoldTimer {
    pub const fn new() -> Self {
        Self {
            held: false,
            hold_start: Tick(0),
        }
    }

    /// Feed the current level.
    pub fn update(&mut self, pressed: bool, now: Tick) {
        if pressed {
            if !self.held {
                self.held = true;
                self.hold_start = now;
            }
        } else {
            self.held = false;
        }
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Ticks since the hold began, or `None` when not held.
    pub fn held_for(&self, now: Tick) -> Option<u32> {
        self.held.then(|| now.elapsed_since(self.hold_start))
    }

    pub fn clear(&mut self) {
        self.held = false;
    }
}

/// The standby long-press guard over two buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HoldGuard {
    first: HoldTimer,
    second: HoldTimer,
    threshold: u32,
}

impl HoldGuard {
    pub const fn new(threshold: u32) -> Self {
        Self {
            first: HoldTimer::new(),
            second: HoldTimer::new(),
            threshold,
        }
    }

    /// Feed both levels for this tick. Returns `true` when standby must be
    /// entered; both timers are then cleared so a fresh hold is required
    /// before the guard can fire again.
    pub fn check(&mut self, first_pressed: bool, second_pressed: bool, now: Tick) -> bool {
        self.first.update(first_pressed, now);
        self.second.update(second_pressed, now);

        let (Some(first), Some(second)) = (self.first.held_for(now), self.second.held_for(now))
        else {
            return false;
        };

        if first >= self.threshold && second >= self.threshold {
            self.first.clear();
            self.second.clear();
            return true;
        }
        false
    }

    pub fn first(&self) -> &HoldTimer {
        &self.first
    }

    pub fn second(&self) -> &HoldTimer {
        &self.second
    }
}
