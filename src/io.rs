//! Capabilities the state machine consumes: buttons, LEDs and the
//! transmit sink.
//!
//! The core never touches hardware directly. The firmware implements these
//! traits on top of GPIO, PWM and USB; tests implement them with plain
//! arrays.

/// The four physical input buttons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Enter a `0` bit. One of the two standby-hold buttons.
    Zero,
    /// Enter a `1` bit. One of the two standby-hold buttons.
    One,
    /// Reset the character, or delete the string.
    Clear,
    /// Save the character, finalize, or send the string.
    Commit,
}

impl Button {
    pub const ALL: [Button; 4] = [Button::Zero, Button::One, Button::Clear, Button::Commit];

    /// Position of this button in a four-element bank.
    pub const fn index(self) -> usize {
        match self {
            Button::Zero => 0,
            Button::One => 1,
            Button::Clear => 2,
            Button::Commit => 3,
        }
    }
}

/// The four feedback LEDs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Led {
    /// Flashes when a `0` bit is entered.
    Zero,
    /// Flashes when a `1` bit is entered.
    One,
    /// Only used by the standby pulse.
    Aux,
    /// Blinks at a per-state rate.
    Heartbeat,
}

impl Led {
    pub const ALL: [Led; 4] = [Led::Zero, Led::One, Led::Aux, Led::Heartbeat];

    pub const fn index(self) -> usize {
        match self {
            Led::Zero => 0,
            Led::One => 1,
            Led::Aux => 2,
            Led::Heartbeat => 3,
        }
    }
}

/// Binary LED level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Off,
    On,
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on {
            Level::On
        } else {
            Level::Off
        }
    }
}

/// Button input.
pub trait Buttons {
    /// Instantaneous (debounced) level: `true` while the button is down.
    fn is_held(&self, button: Button) -> bool;

    /// Returns `true` at most once per press, then clears the latch.
    fn poll_and_clear_edge(&mut self, button: Button) -> bool;
}

/// LED output.
pub trait Leds {
    fn set_level(&mut self, led: Led, level: Level);

    /// Drive the LED with a PWM duty cycle in percent (0..=100).
    fn set_duty(&mut self, led: Led, percent: u8);

    fn all_off(&mut self) {
        for led in Led::ALL {
            self.set_level(led, Level::Off);
        }
    }

    fn all_duty(&mut self, percent: u8) {
        for led in Led::ALL {
            self.set_duty(led, percent);
        }
    }
}

/// Consumer of finalized strings.
pub trait TransmitSink {
    fn emit(&mut self, text: &[u8]);
}

/// Everything the state machine drives, bundled so states take one argument.
pub struct Io<B, L, S> {
    pub buttons: B,
    pub leds: L,
    pub sink: S,
}

impl<B, L, S> Io<B, L, S>
where
    B: Buttons,
    L: Leds,
    S: TransmitSink,
{
    pub fn new(buttons: B, leds: L, sink: S) -> Self {
        Self { buttons, leds, sink }
    }

    /// Consume a pending press of `button`.
    pub fn pressed(&mut self, button: Button) -> bool {
        self.buttons.poll_and_clear_edge(button)
    }

    /// Drop every pending press. Returns `true` if any was pending.
    pub fn discard_edges(&mut self) -> bool {
        Button::ALL
            .iter()
            .fold(false, |any, &button| self.pressed(button) | any)
    }
}
