//! The string-entry state machine.
//!
//! ```text
//!  CHAR_ENTRY --Commit(8 bits)--> STRING_BUILD --Commit--> STRING_CONFIRM
//!      ^                              |                        |
//!      +-----------Clear--------------+------Clear / Commit----+
//!
//!  any state except STANDBY --hold Zero+One 3 s--> STANDBY --any press--> back
//! ```
//!
//! The `Machine` owns the context, the active state and the I/O. Each call
//! to `tick()` runs the standby Hold-Guard, then the active state's `run`
//! step; a requested transition runs `exit` on the old state and `enter` on
//! the new one before `tick()` returns. Presses still pending when a state
//! hands over are dropped, so they never act on the next state.

mod char_entry;
mod context;
mod feedback;
mod standby;
mod string_build;
mod string_confirm;

#[cfg(test)]
mod tests;

pub use char_entry::CharEntry;
pub use context::MachineContext;
pub use standby::Standby;
pub use string_build::StringBuild;
pub use string_confirm::StringConfirm;

use crate::error::Advisory;
use crate::io::{Button, Buttons, Io, Leds, TransmitSink};
use crate::timing::{Clock, Tick};

/// Identity of each state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StateId {
    CharEntry,
    StringBuild,
    StringConfirm,
    Standby,
}

/// How a state is being entered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Entry {
    /// Normal transition: the state starts from a clean slate.
    Fresh,
    /// Returning from standby: only LEDs and timers are reset, the
    /// character in progress is kept.
    Resumed,
}

/// Entry, run and exit callbacks of one state.
pub trait StateBehavior {
    fn enter<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>, entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink;

    /// One tick of work. Returns the state to switch to, if any.
    fn run<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>) -> Option<StateId>
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink;

    fn exit<B, L, S>(&mut self, _ctx: &mut MachineContext, _io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
    }
}

/// The active state together with its private data.
#[derive(Clone, Copy, Debug)]
pub enum State {
    CharEntry(CharEntry),
    StringBuild(StringBuild),
    StringConfirm(StringConfirm),
    Standby(Standby),
}

impl State {
    fn for_id(id: StateId) -> Self {
        match id {
            StateId::CharEntry => State::CharEntry(CharEntry::new()),
            StateId::StringBuild => State::StringBuild(StringBuild::new()),
            StateId::StringConfirm => State::StringConfirm(StringConfirm::new()),
            StateId::Standby => State::Standby(Standby::new()),
        }
    }

    pub fn id(&self) -> StateId {
        match self {
            State::CharEntry(_) => StateId::CharEntry,
            State::StringBuild(_) => StateId::StringBuild,
            State::StringConfirm(_) => StateId::StringConfirm,
            State::Standby(_) => StateId::Standby,
        }
    }
}

impl StateBehavior for State {
    fn enter<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>, entry: Entry)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        match self {
            State::CharEntry(s) => s.enter(ctx, io, entry),
            State::StringBuild(s) => s.enter(ctx, io, entry),
            State::StringConfirm(s) => s.enter(ctx, io, entry),
            State::Standby(s) => s.enter(ctx, io, entry),
        }
    }

    fn run<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>) -> Option<StateId>
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        match self {
            State::CharEntry(s) => s.run(ctx, io),
            State::StringBuild(s) => s.run(ctx, io),
            State::StringConfirm(s) => s.run(ctx, io),
            State::Standby(s) => s.run(ctx, io),
        }
    }

    fn exit<B, L, S>(&mut self, ctx: &mut MachineContext, io: &mut Io<B, L, S>)
    where
        B: Buttons,
        L: Leds,
        S: TransmitSink,
    {
        match self {
            State::CharEntry(s) => s.exit(ctx, io),
            State::StringBuild(s) => s.exit(ctx, io),
            State::StringConfirm(s) => s.exit(ctx, io),
            State::Standby(s) => s.exit(ctx, io),
        }
    }
}

/// The state machine core.
pub struct Machine<B, L, S, C> {
    io: Io<B, L, S>,
    clock: C,
    ctx: MachineContext,
    state: State,
}

impl<B, L, S, C> Machine<B, L, S, C>
where
    B: Buttons,
    L: Leds,
    S: TransmitSink,
    C: Clock,
{
    /// Create an idle machine. Call [`Machine::init`] before the first tick.
    pub fn new(io: Io<B, L, S>, clock: C) -> Self {
        Self {
            io,
            clock,
            ctx: MachineContext::new(),
            state: State::CharEntry(CharEntry::new()),
        }
    }

    /// Reset the context and enter CHAR_ENTRY.
    pub fn init(&mut self) {
        self.ctx = MachineContext::new();
        self.state = State::CharEntry(CharEntry::new());
        self.state.enter(&mut self.ctx, &mut self.io, Entry::Fresh);
    }

    /// Run one tick: the Hold-Guard, then the active state.
    pub fn tick(&mut self) {
        let now = self.clock.now();

        if self.hold_guard(now) {
            return;
        }

        if let Some(next) = self.state.run(&mut self.ctx, &mut self.io) {
            let entry = if self.ctx.active_state == StateId::Standby {
                Entry::Resumed
            } else {
                Entry::Fresh
            };
            self.transition(next, entry);
        }
    }

    /// Returns `true` when the guard moved the machine into standby.
    fn hold_guard(&mut self, now: Tick) -> bool {
        if self.ctx.active_state == StateId::Standby {
            return false;
        }

        let zero = self.io.buttons.is_held(Button::Zero);
        let one = self.io.buttons.is_held(Button::One);
        if !self.ctx.guard.check(zero, one, now) {
            return false;
        }

        info!("Zero + One held, suspending {}", self.ctx.active_state);
        self.ctx.previous_state = self.ctx.active_state;
        self.transition(StateId::Standby, Entry::Fresh);
        true
    }

    fn transition(&mut self, next: StateId, entry: Entry) {
        // Presses left over from the tick that caused the switch belong to
        // the old state; the new one starts with no pending edges.
        if self.io.discard_edges() {
            debug!("Discarded presses pending at {} exit", self.ctx.active_state);
        }
        self.state.exit(&mut self.ctx, &mut self.io);
        debug!("{} -> {} ({})", self.ctx.active_state, next, entry);
        self.ctx.active_state = next;
        self.state = State::for_id(next);
        self.state.enter(&mut self.ctx, &mut self.io, entry);
    }

    pub fn state_id(&self) -> StateId {
        self.ctx.active_state
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn context(&self) -> &MachineContext {
        &self.ctx
    }

    pub fn io(&self) -> &Io<B, L, S> {
        &self.io
    }

    pub fn io_mut(&mut self) -> &mut Io<B, L, S> {
        &mut self.io
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// The most recent advisory, cleared by reading it.
    pub fn take_advisory(&mut self) -> Option<Advisory> {
        self.ctx.last_advisory.take()
    }
}
