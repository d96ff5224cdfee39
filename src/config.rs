//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, buffer sizes, pin assignments and USB identity
//! strings live here so they can be tuned in one place.
//!
//! Every duration is expressed in ticks. The firmware drives the state
//! machine from a fixed 1 ms ticker, so one tick is one millisecond.

// Tick loop

/// Period of the state-machine tick (ms).
pub const TICK_PERIOD_MS: u64 = 1;

// Hold-Guard

/// How long both bit buttons must be held before entering standby (ticks).
pub const STANDBY_HOLD_TICKS: u32 = 3000;

// Feedback LEDs

/// How long a bit-indicator LED stays lit after a press (ticks).
pub const INDICATOR_TICKS: u32 = 100;

/// Heartbeat toggle period while entering the first character (ticks).
/// 500 ticks on, 500 ticks off = 1 Hz.
pub const CHAR_ENTRY_BLINK_TICKS: u32 = 500;

/// Heartbeat toggle period while building the string (ticks). ~4 Hz.
pub const STRING_BUILD_BLINK_TICKS: u32 = 125;

/// Heartbeat toggle period while awaiting confirmation (ticks). ~16 Hz.
pub const STRING_CONFIRM_BLINK_TICKS: u32 = 31;

// Standby animation

/// Duty-cycle change per tick of the standby pulse (percent).
pub const PWM_STEP: u8 = 2;

/// Upper bound of the standby pulse (percent).
pub const PWM_MAX: u8 = 100;

// String storage

/// Maximum number of characters in the composed string.
///
/// The buffer holds one more slot for the terminator.
pub const STRING_CAPACITY: usize = 63;

/// Number of bits that make up one character.
pub const BITS_PER_CHAR: u8 = 8;

// GPIO pin assignments (nRF52840-DK defaults)
//
//   Button 1 (bit 0)       → P0.11
//   Button 2 (bit 1)       → P0.12
//   Button 3 (reset/clear) → P0.24
//   Button 4 (save/send)   → P0.25
//   LED 1 (bit 0 feedback) → P0.13
//   LED 2 (bit 1 feedback) → P0.14
//   LED 3 (unused)         → P0.15
//   LED 4 (heartbeat)      → P0.16
//
// Buttons and LEDs on the DK are both active-low.

/// Number of consecutive agreeing samples before a button level is accepted.
pub const BUTTON_DEBOUNCE_TICKS: u8 = 20;

/// LEDs light when their pin is driven low.
pub const LED_ACTIVE_LOW: bool = true;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0002;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "bit2ascii";
pub const USB_PRODUCT: &str = "Binary ASCII Entry";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// CDC-ACM bulk endpoint packet size (bytes).
pub const USB_SERIAL_PACKET_SIZE: u16 = 64;

/// Finalized strings waiting for the USB serial writer.
pub const TRANSMIT_QUEUE_DEPTH: usize = 4;
