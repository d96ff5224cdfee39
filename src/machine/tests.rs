//! Scenario tests for the state machine.
//!
//! These run on the host against in-memory buttons, LEDs and sink, with the
//! clock advanced by one tick per `tick()`.

use super::{Machine, State, StateId};
use crate::bits::StringBuffer;
use crate::config::{
    CHAR_ENTRY_BLINK_TICKS, INDICATOR_TICKS, STANDBY_HOLD_TICKS, STRING_BUILD_BLINK_TICKS,
    STRING_CAPACITY, STRING_CONFIRM_BLINK_TICKS,
};
use crate::error::Advisory;
use crate::io::{Button, Buttons, Io, Led, Leds, Level, TransmitSink};
use crate::timing::{Clock, TickCounter};

// ═══════════════════════════════════════════════════════════════════════════
// Fakes
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct FakeButtons {
    held: [bool; 4],
    edges: [bool; 4],
}

impl Buttons for FakeButtons {
    fn is_held(&self, button: Button) -> bool {
        self.held[button.index()]
    }

    fn poll_and_clear_edge(&mut self, button: Button) -> bool {
        core::mem::take(&mut self.edges[button.index()])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Output {
    Level(Level),
    Duty(u8),
}

struct FakeLeds {
    outputs: [Output; 4],
}

impl Default for FakeLeds {
    fn default() -> Self {
        Self {
            outputs: [Output::Level(Level::Off); 4],
        }
    }
}

impl Leds for FakeLeds {
    fn set_level(&mut self, led: Led, level: Level) {
        self.outputs[led.index()] = Output::Level(level);
    }

    fn set_duty(&mut self, led: Led, percent: u8) {
        self.outputs[led.index()] = Output::Duty(percent);
    }
}

#[derive(Default)]
struct RecordingSink {
    sent: std::vec::Vec<std::vec::Vec<u8>>,
}

impl TransmitSink for RecordingSink {
    fn emit(&mut self, text: &[u8]) {
        self.sent.push(text.to_vec());
    }
}

type TestMachine = Machine<FakeButtons, FakeLeds, RecordingSink, TickCounter>;

struct Harness {
    machine: TestMachine,
}

impl Harness {
    fn new() -> Self {
        let io = Io::new(
            FakeButtons::default(),
            FakeLeds::default(),
            RecordingSink::default(),
        );
        let mut machine = Machine::new(io, TickCounter::new());
        machine.init();
        Self { machine }
    }

    fn tick(&mut self) {
        self.machine.clock_mut().advance(1);
        self.machine.tick();
    }

    fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    /// Press and release `button` within a single tick.
    fn tap(&mut self, button: Button) {
        let buttons = &mut self.machine.io_mut().buttons;
        buttons.held[button.index()] = true;
        buttons.edges[button.index()] = true;
        self.tick();
        self.machine.io_mut().buttons.held[button.index()] = false;
    }

    /// Press several buttons within the same tick.
    fn chord(&mut self, chord: &[Button]) {
        let buttons = &mut self.machine.io_mut().buttons;
        for &button in chord {
            buttons.held[button.index()] = true;
            buttons.edges[button.index()] = true;
        }
        self.tick();
        for &button in chord {
            self.machine.io_mut().buttons.held[button.index()] = false;
        }
    }

    fn bit(&mut self, bit: bool) {
        self.tap(if bit { Button::One } else { Button::Zero });
    }

    /// Enter the eight bits of `byte`, least significant first.
    fn enter_byte(&mut self, byte: u8) {
        for i in 0..8 {
            self.bit(byte >> i & 1 == 1);
        }
    }

    /// Set the level of both standby buttons without generating edges.
    fn hold_levels(&mut self, zero: bool, one: bool) {
        let buttons = &mut self.machine.io_mut().buttons;
        buttons.held[Button::Zero.index()] = zero;
        buttons.held[Button::One.index()] = one;
    }

    /// Hold both standby buttons long enough to trigger, then release.
    fn enter_standby(&mut self) {
        self.hold_levels(true, true);
        // First tick records the hold start; the threshold is reached
        // STANDBY_HOLD_TICKS later.
        self.run(STANDBY_HOLD_TICKS + 1);
        self.hold_levels(false, false);
        assert_eq!(self.state(), StateId::Standby);
    }

    fn state(&self) -> StateId {
        self.machine.state_id()
    }

    fn string(&self) -> &[u8] {
        self.machine.context().string().as_bytes()
    }

    fn led(&self, led: Led) -> Output {
        self.machine.io().leds.outputs[led.index()]
    }

    fn sent(&self) -> &[std::vec::Vec<u8>] {
        &self.machine.io().sink.sent
    }

    /// CHAR_ENTRY with `first` saved, now in STRING_BUILD.
    fn with_first_char(first: u8) -> Self {
        let mut h = Harness::new();
        h.enter_byte(first);
        h.tap(Button::Commit);
        assert_eq!(h.state(), StateId::StringBuild);
        h
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Init
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn init_enters_char_entry_with_empty_context() {
    let h = Harness::new();
    assert_eq!(h.state(), StateId::CharEntry);
    assert_eq!(h.machine.context().bit_count(), 0);
    assert_eq!(h.machine.context().current_char(), 0);
    assert!(h.string().is_empty());
    for led in Led::ALL {
        assert_eq!(h.led(led), Output::Level(Level::Off));
    }
}

#[test]
fn init_resets_a_used_machine() {
    let mut h = Harness::with_first_char(b'Q');
    h.machine.init();
    assert_eq!(h.state(), StateId::CharEntry);
    assert!(h.string().is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// CHAR_ENTRY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn char_entry_scenario_saves_0x09() {
    let mut h = Harness::new();
    for button in [
        Button::One,
        Button::Zero,
        Button::Zero,
        Button::One,
        Button::Zero,
        Button::Zero,
        Button::Zero,
        Button::Zero,
    ] {
        h.tap(button);
    }
    assert_eq!(h.machine.context().current_char(), 0x09);
    assert_eq!(h.machine.context().bit_count(), 8);

    h.tap(Button::Commit);
    assert_eq!(h.string(), &[0x09]);
    assert_eq!(h.state(), StateId::StringBuild);
}

#[test]
fn char_entry_bits_are_lsb_first_for_every_byte() {
    for byte in [0x00u8, 0x01, 0x41, 0x7E, 0x80, 0xA5, 0xFF] {
        let mut h = Harness::new();
        h.enter_byte(byte);
        h.tap(Button::Commit);
        assert_eq!(h.string(), &[byte], "byte {:#04x}", byte);
    }
}

#[test]
fn char_entry_ignores_ninth_bit() {
    let mut h = Harness::new();
    h.enter_byte(0x0F);
    h.bit(true);
    assert_eq!(h.machine.context().current_char(), 0x0F);
    assert_eq!(h.machine.context().bit_count(), 8);
    assert_eq!(h.machine.take_advisory(), Some(Advisory::ByteComplete));
    assert_eq!(h.state(), StateId::CharEntry);
}

#[test]
fn char_entry_clear_is_idempotent() {
    let mut h = Harness::new();
    h.bit(true);
    h.bit(true);
    h.bit(false);
    for _ in 0..3 {
        h.tap(Button::Clear);
        assert_eq!(h.machine.context().bit_count(), 0);
        assert_eq!(h.machine.context().current_char(), 0);
    }
    assert_eq!(h.state(), StateId::CharEntry);
}

#[test]
fn char_entry_rejects_incomplete_save() {
    let mut h = Harness::new();
    h.bit(true);
    h.bit(false);
    h.bit(true);
    h.tap(Button::Commit);
    assert_eq!(h.state(), StateId::CharEntry);
    assert!(h.string().is_empty());
    assert_eq!(h.machine.context().bit_count(), 3);
    assert_eq!(h.machine.context().current_char(), 0b101);
    assert_eq!(
        h.machine.take_advisory(),
        Some(Advisory::IncompleteByte { bits: 3 })
    );
    assert_eq!(h.machine.take_advisory(), None);
}

#[test]
fn char_entry_heartbeat_blinks_at_1hz() {
    let mut h = Harness::new();
    h.run(CHAR_ENTRY_BLINK_TICKS - 1);
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::Off));
    h.tick();
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::On));
    h.run(CHAR_ENTRY_BLINK_TICKS);
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::Off));
}

#[test]
fn bit_indicator_lights_then_decays() {
    let mut h = Harness::new();
    h.bit(false);
    assert_eq!(h.led(Led::Zero), Output::Level(Level::On));
    assert_eq!(h.led(Led::One), Output::Level(Level::Off));

    h.run(INDICATOR_TICKS - 2);
    assert_eq!(h.led(Led::Zero), Output::Level(Level::On));
    h.tick();
    assert_eq!(h.led(Led::Zero), Output::Level(Level::Off));
}

#[test]
fn one_bit_lights_its_own_indicator() {
    let mut h = Harness::new();
    h.bit(true);
    assert_eq!(h.led(Led::One), Output::Level(Level::On));
    assert_eq!(h.led(Led::Zero), Output::Level(Level::Off));
}

// ═══════════════════════════════════════════════════════════════════════════
// STRING_BUILD
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn string_build_starts_a_fresh_character() {
    let h = Harness::with_first_char(b'H');
    assert_eq!(h.machine.context().bit_count(), 0);
    assert_eq!(h.machine.context().current_char(), 0);
    assert_eq!(h.string(), b"H");
}

#[test]
fn string_build_auto_saves_on_next_bit() {
    let mut h = Harness::with_first_char(b'H');
    h.enter_byte(b'i');
    assert_eq!(h.string(), b"H");

    // The ninth press saves 'i' and is bit 0 of the next character.
    h.bit(true);
    assert_eq!(h.string(), b"Hi");
    assert_eq!(h.machine.context().bit_count(), 1);
    assert_eq!(h.machine.context().current_char(), 0x01);
    assert_eq!(h.led(Led::One), Output::Level(Level::On));

    let mut h = Harness::with_first_char(b'H');
    h.enter_byte(b'i');
    h.bit(false);
    assert_eq!(h.string(), b"Hi");
    assert_eq!(h.machine.context().bit_count(), 1);
    assert_eq!(h.machine.context().current_char(), 0x00);
}

#[test]
fn string_build_commit_appends_pending_character() {
    let mut h = Harness::with_first_char(b'o');
    h.enter_byte(b'k');
    let before = h.string().len();
    h.tap(Button::Commit);
    assert_eq!(h.state(), StateId::StringConfirm);
    assert_eq!(h.string().len(), before + 1);
    assert_eq!(h.string(), b"ok");
}

#[test]
fn string_build_commit_discards_partial_character() {
    let mut h = Harness::with_first_char(b'o');
    h.bit(true);
    h.bit(true);
    h.tap(Button::Commit);
    assert_eq!(h.state(), StateId::StringConfirm);
    assert_eq!(h.string(), b"o");
    assert_eq!(h.machine.context().bit_count(), 0);
}

#[test]
fn string_build_clear_deletes_everything() {
    let mut h = Harness::with_first_char(b'x');
    h.enter_byte(b'y');
    h.bit(true);
    h.tap(Button::Clear);
    assert_eq!(h.state(), StateId::CharEntry);
    assert!(h.string().is_empty());
    assert_eq!(*h.machine.context().string(), StringBuffer::new());
    assert_eq!(h.machine.context().bit_count(), 0);
}

#[test]
fn string_build_heartbeat_blinks_at_4hz() {
    let mut h = Harness::with_first_char(b'a');
    h.run(STRING_BUILD_BLINK_TICKS - 1);
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::Off));
    h.tick();
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::On));
}

#[test]
fn capacity_is_enforced() {
    let mut h = Harness::with_first_char(b'a');
    // Characters 2..=64: each new character auto-saves the previous one.
    for i in 1..=STRING_CAPACITY {
        h.enter_byte(b'a' + (i % 26) as u8);
    }
    assert_eq!(h.string().len(), STRING_CAPACITY);
    assert_eq!(h.machine.context().bit_count(), 8);

    // No room for the pending character: the press is dropped.
    h.bit(false);
    assert_eq!(h.machine.take_advisory(), Some(Advisory::BufferFull));
    assert_eq!(h.string().len(), STRING_CAPACITY);
    assert_eq!(h.machine.context().bit_count(), 8);

    // Finalizing still works, without the pending character.
    h.tap(Button::Commit);
    assert_eq!(h.machine.take_advisory(), Some(Advisory::BufferFull));
    assert_eq!(h.state(), StateId::StringConfirm);
    assert_eq!(h.string().len(), STRING_CAPACITY);

    h.tap(Button::Commit);
    assert_eq!(h.sent()[0].len(), STRING_CAPACITY);
}

// ═══════════════════════════════════════════════════════════════════════════
// STRING_CONFIRM
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn confirm_commit_transmits_and_wipes() {
    let mut h = Harness::with_first_char(b'O');
    h.enter_byte(b'K');
    h.tap(Button::Commit);
    assert_eq!(h.state(), StateId::StringConfirm);

    h.tap(Button::Commit);
    assert_eq!(h.sent(), &[b"OK".to_vec()]);
    assert!(h.string().is_empty());
    assert_eq!(h.state(), StateId::CharEntry);
}

#[test]
fn confirm_clear_discards_without_sending() {
    let mut h = Harness::with_first_char(b'O');
    h.tap(Button::Commit);
    h.tap(Button::Clear);
    assert!(h.sent().is_empty());
    assert!(h.string().is_empty());
    assert_eq!(h.state(), StateId::CharEntry);
}

#[test]
fn confirm_ignores_bit_buttons() {
    let mut h = Harness::with_first_char(b'O');
    h.tap(Button::Commit);
    h.bit(true);
    h.bit(false);
    assert_eq!(h.state(), StateId::StringConfirm);
    assert_eq!(h.string(), b"O");

    // The drained presses do not reappear as bits after restarting.
    h.tap(Button::Clear);
    h.tick();
    assert_eq!(h.machine.context().bit_count(), 0);
}

#[test]
fn confirm_heartbeat_blinks_at_16hz() {
    let mut h = Harness::with_first_char(b'a');
    h.tap(Button::Commit);
    h.run(STRING_CONFIRM_BLINK_TICKS - 1);
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::Off));
    h.tick();
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::On));
    h.run(STRING_CONFIRM_BLINK_TICKS);
    assert_eq!(h.led(Led::Heartbeat), Output::Level(Level::Off));
}

#[test]
fn full_round_trip_twice() {
    let mut h = Harness::new();
    for word in [&b"hey"[..], &b"yo"[..]] {
        h.enter_byte(word[0]);
        h.tap(Button::Commit);
        for &c in &word[1..] {
            h.enter_byte(c);
        }
        h.tap(Button::Commit);
        h.tap(Button::Commit);
    }
    assert_eq!(h.sent(), &[b"hey".to_vec(), b"yo".to_vec()]);
}

// ═══════════════════════════════════════════════════════════════════════════
// Hold-Guard and STANDBY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn hold_enters_standby_from_every_state() {
    let mut h = Harness::new();
    h.enter_standby();
    assert_eq!(h.machine.context().previous_state(), StateId::CharEntry);

    let mut h = Harness::with_first_char(b'a');
    h.enter_standby();
    assert_eq!(h.machine.context().previous_state(), StateId::StringBuild);

    let mut h = Harness::with_first_char(b'a');
    h.tap(Button::Commit);
    h.enter_standby();
    assert_eq!(h.machine.context().previous_state(), StateId::StringConfirm);
}

#[test]
fn hold_just_short_of_threshold_does_nothing() {
    let mut h = Harness::new();
    h.hold_levels(true, true);
    h.run(STANDBY_HOLD_TICKS);
    assert_eq!(h.state(), StateId::CharEntry);
    h.tick();
    assert_eq!(h.state(), StateId::Standby);
}

#[test]
fn releasing_one_button_restarts_its_timer() {
    let mut h = Harness::new();
    h.hold_levels(true, true);
    h.run(2500);
    h.hold_levels(true, false);
    h.tick();
    h.hold_levels(true, true);
    h.run(STANDBY_HOLD_TICKS);
    assert_eq!(h.state(), StateId::CharEntry);
    h.tick();
    assert_eq!(h.state(), StateId::Standby);
}

#[test]
fn single_button_hold_never_suspends() {
    let mut h = Harness::new();
    h.hold_levels(false, true);
    h.run(3 * STANDBY_HOLD_TICKS);
    assert_eq!(h.state(), StateId::CharEntry);
}

#[test]
fn standby_pulses_all_leds() {
    let mut h = Harness::new();
    h.enter_standby();
    for led in Led::ALL {
        assert_eq!(h.led(led), Output::Duty(0));
    }
    h.tick();
    for led in Led::ALL {
        assert_eq!(h.led(led), Output::Duty(2));
    }
    h.run(49);
    assert_eq!(h.led(Led::Aux), Output::Duty(100));
    h.tick();
    assert_eq!(h.led(Led::Aux), Output::Duty(98));
    match h.machine.state() {
        State::Standby(standby) => assert!(!standby.ramp().is_increasing()),
        other => panic!("expected standby, got {:?}", other.id()),
    }
}

#[test]
fn standby_ignores_held_buttons_without_edges() {
    let mut h = Harness::new();
    h.enter_standby();
    h.hold_levels(true, true);
    h.run(2 * STANDBY_HOLD_TICKS);
    assert_eq!(h.state(), StateId::Standby);
}

#[test]
fn any_button_resumes_with_context_intact() {
    for wake in Button::ALL {
        let mut h = Harness::with_first_char(b'Z');
        h.bit(true);
        h.bit(false);
        h.bit(true);
        let string_before = *h.machine.context().string();
        let char_before = h.machine.context().current_char();
        let bits_before = h.machine.context().bit_count();

        h.enter_standby();
        h.run(123);
        h.tap(wake);

        assert_eq!(h.state(), StateId::StringBuild);
        assert_eq!(*h.machine.context().string(), string_before);
        assert_eq!(h.machine.context().current_char(), char_before);
        assert_eq!(h.machine.context().bit_count(), bits_before);
        for led in Led::ALL {
            assert_eq!(h.led(led), Output::Level(Level::Off));
        }
    }
}

#[test]
fn resumed_state_keeps_working() {
    let mut h = Harness::new();
    h.bit(true);
    h.bit(true);
    h.bit(true);
    h.enter_standby();
    h.tap(Button::Clear);
    assert_eq!(h.state(), StateId::CharEntry);
    // The waking Clear press was consumed by standby, not by CHAR_ENTRY.
    assert_eq!(h.machine.context().bit_count(), 3);

    for _ in 0..5 {
        h.bit(false);
    }
    h.tap(Button::Commit);
    assert_eq!(h.string(), &[0x07]);
}

#[test]
fn confirm_survives_standby_and_still_sends() {
    let mut h = Harness::with_first_char(b'!');
    h.tap(Button::Commit);
    h.enter_standby();
    h.tap(Button::Zero);
    assert_eq!(h.state(), StateId::StringConfirm);
    h.tap(Button::Commit);
    assert_eq!(h.sent(), &[b"!".to_vec()]);
}

#[test]
fn guard_requires_fresh_hold_after_resume() {
    let mut h = Harness::new();
    h.hold_levels(true, true);
    h.run(STANDBY_HOLD_TICKS + 1);
    assert_eq!(h.state(), StateId::Standby);

    // Still holding both; wake with Clear.
    h.tap(Button::Clear);
    assert_eq!(h.state(), StateId::CharEntry);
    h.run(STANDBY_HOLD_TICKS - 1);
    assert_eq!(h.state(), StateId::CharEntry);
    h.run(2);
    assert_eq!(h.state(), StateId::Standby);
}

#[test]
fn chorded_wake_leaves_context_untouched() {
    let mut h = Harness::new();
    h.bit(true);
    h.bit(true);
    h.bit(true);
    h.enter_standby();

    h.chord(&[Button::Zero, Button::One]);
    assert_eq!(h.state(), StateId::CharEntry);
    h.run(2);
    assert_eq!(h.machine.context().bit_count(), 3);
    assert_eq!(h.machine.context().current_char(), 0x07);
    assert_eq!(h.machine.take_advisory(), None);
}

#[test]
fn waking_with_every_button_consumes_all_of_them() {
    let mut h = Harness::with_first_char(b'k');
    h.bit(false);
    h.enter_standby();

    h.chord(&Button::ALL);
    assert_eq!(h.state(), StateId::StringBuild);
    h.run(2);
    assert_eq!(h.state(), StateId::StringBuild);
    assert_eq!(h.string(), b"k");
    assert_eq!(h.machine.context().bit_count(), 1);
    assert!(h.machine.io().buttons.edges.iter().all(|&edge| !edge));
}

// ═══════════════════════════════════════════════════════════════════════════
// Presses within one tick
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn bits_in_one_tick_apply_in_button_order() {
    let mut h = Harness::new();
    h.chord(&[Button::One, Button::Zero]);
    assert_eq!(h.machine.context().bit_count(), 2);
    assert_eq!(h.machine.context().current_char(), 0b10);
}

#[test]
fn last_bit_and_commit_in_one_tick_save_the_character() {
    let mut h = Harness::new();
    for _ in 0..7 {
        h.bit(false);
    }
    h.chord(&[Button::One, Button::Commit]);
    assert_eq!(h.state(), StateId::StringBuild);
    assert_eq!(h.string(), &[0x80]);
}

#[test]
fn clear_and_commit_together_in_string_build_only_clear() {
    let mut h = Harness::with_first_char(b'q');
    h.chord(&[Button::Clear, Button::Commit]);
    assert_eq!(h.state(), StateId::CharEntry);
    assert!(h.string().is_empty());

    h.tick();
    assert_eq!(h.state(), StateId::CharEntry);
    assert_eq!(h.machine.take_advisory(), None);
}

#[test]
fn clear_and_commit_together_in_confirm_only_clear() {
    let mut h = Harness::with_first_char(b'q');
    h.tap(Button::Commit);
    h.chord(&[Button::Clear, Button::Commit]);
    assert_eq!(h.state(), StateId::CharEntry);
    assert!(h.sent().is_empty());
    assert!(h.string().is_empty());

    h.tick();
    assert_eq!(h.machine.take_advisory(), None);
}

#[test]
fn clock_is_driven_by_the_harness() {
    let mut h = Harness::new();
    h.run(10);
    assert_eq!(h.machine.clock().now().0, 10);
}
