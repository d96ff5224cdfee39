//! Library interface for bit2ascii.
//!
//! Everything except the hardware glue lives here so it can be tested on
//! the host (no embedded hardware required):
//!
//! - [`machine`] - the four-state string-entry machine and its core loop
//! - [`timing`] - ticks, blink/indicator timers, the standby PWM ramp
//! - [`hold`] - dual-button long-press detection
//! - [`bits`] - LSB-first character assembly and the string buffer
//! - [`buttons`] - tick-sampled debouncing over `embedded-hal` input pins
//! - [`io`] - the button, LED and transmit capabilities the machine drives
//!
//! Usage: `cargo test --lib` or `cargo test`
//!
//! Note: The embedded binary uses main.rs with #![no_std] and #![no_main]
//! and is only built with the `embedded` feature.

#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

pub mod bits;
pub mod buttons;
pub mod config;
pub mod error;
pub mod hold;
pub mod io;
pub mod machine;
pub mod timing;
pub mod transmit;

pub use error::Advisory;
pub use io::{Button, Buttons, Io, Led, Leds, Level, TransmitSink};
pub use machine::{Machine, StateId};
pub use timing::{Clock, Tick, TickCounter};
