//! Tick-sampled button debouncing with edge latching.
//!
//! The firmware samples every button pin once per tick. A level change is
//! accepted only after it has been seen for `debounce` further consecutive
//! samples. An accepted press latches an edge that stays pending until
//! `poll_and_clear_edge` consumes it, so a press is reported exactly once no
//! matter how many callers poll within the same tick.

use crate::io::{Button, Buttons};
use embedded_hal::digital::InputPin;

/// Debounced level plus a read-and-clear press latch for one button.
#[derive(Clone, Copy, Debug)]
pub struct EdgeLatch {
    debounce: u8,
    raw: bool,
    stable_for: u8,
    pressed: bool,
    edge: bool,
}

impl EdgeLatch {
    pub const fn new(debounce: u8) -> Self {
        Self {
            debounce,
            raw: false,
            stable_for: 0,
            pressed: false,
            edge: false,
        }
    }

    /// Feed one raw sample (`true` = pressed).
    pub fn sample(&mut self, raw: bool) {
        if raw != self.raw {
            self.raw = raw;
            self.stable_for = 0;
        } else if self.stable_for < self.debounce {
            self.stable_for += 1;
        }

        if self.stable_for >= self.debounce && self.raw != self.pressed {
            self.pressed = self.raw;
            if self.pressed {
                self.edge = true;
            }
        }
    }

    /// Debounced level.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Returns a pending press once, then clears it.
    pub fn take_edge(&mut self) -> bool {
        core::mem::take(&mut self.edge)
    }
}

/// Four GPIO buttons in `Button` order.
pub struct ButtonBank<P> {
    pins: [P; 4],
    latches: [EdgeLatch; 4],
    active_low: bool,
}

impl<P: InputPin> ButtonBank<P> {
    /// Buttons that pull the line low when pressed (internal pull-up).
    pub fn active_low(pins: [P; 4], debounce: u8) -> Self {
        Self {
            pins,
            latches: [EdgeLatch::new(debounce); 4],
            active_low: true,
        }
    }

    /// Buttons that drive the line high when pressed (pull-down).
    pub fn active_high(pins: [P; 4], debounce: u8) -> Self {
        Self {
            pins,
            latches: [EdgeLatch::new(debounce); 4],
            active_low: false,
        }
    }

    /// Read every pin once. Call exactly once per tick, before the machine.
    ///
    /// A failed read repeats the previous raw level.
    pub fn sample(&mut self) {
        for (pin, latch) in self.pins.iter_mut().zip(self.latches.iter_mut()) {
            let raw = match pin.is_high() {
                Ok(high) => high != self.active_low,
                Err(_) => latch.raw,
            };
            latch.sample(raw);
        }
    }
}

impl<P: InputPin> Buttons for ButtonBank<P> {
    fn is_held(&self, button: Button) -> bool {
        self.latches[button.index()].is_pressed()
    }

    fn poll_and_clear_edge(&mut self, button: Button) -> bool {
        self.latches[button.index()].take_edge()
    }
}
