#![forbid(unsafe_code)]

//! Page-lifetime coordinator.
//!
//! [`Session`] wires the prompt controller, gesture latch and unlock engine
//! together and turns host events into [`Command`]s. The host owns the
//! actual timers and DOM nodes and executes commands in order.
//!
//! ```text
//! ready ──▶ prompt watcher (500 ms) ──first gesture──▶ unlock poller (1 s)
//!                                                         │
//!                                     completed ──▶ celebrate (once)
//! ```

use core::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::engine::{EngineState, MutationFlags, TickOutcome, UnlockEngine};
use crate::gesture::{GestureDetector, GestureSource};
use crate::locator::targets_present;
use crate::page::Page;
use crate::prompt::{PROMPT_WATCH_INTERVAL, PromptController, PromptState, PromptStep};

/// Side effect requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Arm the prompt watcher at the given cadence (no-op if armed).
    StartPromptWatch(Duration),
    /// Cancel the prompt watcher (no-op if not armed).
    StopPromptWatch,
    /// Attach and fade in the prompt overlay.
    ShowPrompt,
    /// Fade out and detach the prompt overlay.
    HidePrompt,
    /// Arm the unlock poller at the given cadence (no-op if armed).
    StartPolling(Duration),
    /// Cancel the unlock poller (no-op if not armed).
    StopPolling,
    /// Run the celebration animation.
    Celebrate,
}

/// Serializable snapshot for in-page debugging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    pub prompt: &'static str,
    pub gesture_started: bool,
    pub engine: &'static str,
    pub flags: MutationFlags,
}

#[derive(Debug, Clone)]
pub struct Session {
    config: Config,
    prompt: PromptController,
    gesture: GestureDetector,
    engine: UnlockEngine,
}

impl Session {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            engine: UnlockEngine::new(config.clone()),
            config,
            prompt: PromptController::new(),
            gesture: GestureDetector::new(),
        }
    }

    #[must_use]
    pub const fn prompt_state(&self) -> PromptState {
        self.prompt.state()
    }

    #[must_use]
    pub const fn engine_state(&self) -> EngineState {
        self.engine.state()
    }

    #[must_use]
    pub const fn flags(&self) -> MutationFlags {
        self.engine.flags()
    }

    #[must_use]
    pub const fn gesture_started(&self) -> bool {
        self.gesture.started()
    }

    #[must_use]
    pub fn status(&self) -> Status {
        Status {
            prompt: self.prompt.state().label(),
            gesture_started: self.gesture.started(),
            engine: self.engine.state().label(),
            flags: self.engine.flags(),
        }
    }

    /// Document is ready: begin watching for the gate.
    pub fn on_ready(&mut self) -> Vec<Command> {
        if self.prompt.start() {
            vec![Command::StartPromptWatch(PROMPT_WATCH_INTERVAL)]
        } else {
            Vec::new()
        }
    }

    /// One prompt-watcher tick.
    pub fn on_prompt_tick<P: Page>(&mut self, page: &P) -> Vec<Command> {
        let started = self.gesture.started();
        let watching = matches!(
            self.prompt.state(),
            PromptState::Watching | PromptState::Shown
        );
        let present = watching && !started && targets_present(page, &self.config);

        match self.prompt.tick(started, present) {
            PromptStep::Unchanged => Vec::new(),
            PromptStep::Show => vec![Command::ShowPrompt],
            PromptStep::Hide => vec![Command::HidePrompt],
            PromptStep::Stop { hide: true } => {
                vec![Command::HidePrompt, Command::StopPromptWatch]
            }
            PromptStep::Stop { hide: false } => vec![Command::StopPromptWatch],
        }
    }

    /// A scroll gesture at host time `now`. Only the first one has effects.
    pub fn on_gesture(&mut self, source: GestureSource, now: Duration) -> Vec<Command> {
        if !self.gesture.fire(source) {
            return Vec::new();
        }
        let mut commands = Vec::with_capacity(3);
        if self.prompt.stop() {
            commands.push(Command::HidePrompt);
        }
        commands.push(Command::StopPromptWatch);
        if self.engine.start(now) {
            commands.push(Command::StartPolling(self.config.poll_interval()));
        }
        commands
    }

    /// One unlock-poller tick at host time `now`.
    pub fn on_poll_tick<P: Page>(&mut self, page: &mut P, now: Duration) -> Vec<Command> {
        let outcome = self.engine.tick(page, now);
        let mut commands = Vec::new();
        if outcome.stops_polling() {
            commands.push(Command::StopPolling);
        }
        if outcome == TickOutcome::Completed {
            commands.push(Command::Celebrate);
        }
        commands
    }
}
