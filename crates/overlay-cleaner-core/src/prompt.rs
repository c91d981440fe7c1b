#![forbid(unsafe_code)]

//! "Scroll to unlock" hint lifecycle.
//!
//! The controller only decides *when* the hint is shown; building and
//! fading the overlay is the host's job (see `overlay-cleaner-web`).
//!
//! | From       | Event                       | To       | Step        |
//! |------------|-----------------------------|----------|-------------|
//! | `Idle`     | `start()`                   | Watching | (arm timer) |
//! | `Watching` | tick, gesture started       | Stopped  | `Stop`      |
//! | `Watching` | tick, targets present       | Shown    | `Show`      |
//! | `Shown`    | tick, gesture started       | Stopped  | `Stop`      |
//! | `Shown`    | tick, targets gone          | Watching | `Hide`      |
//! | any        | `stop()`                    | Stopped  | -           |
//!
//! `Stopped` is terminal.

use core::time::Duration;

/// Cadence of the watcher loop.
pub const PROMPT_WATCH_INTERVAL: Duration = Duration::from_millis(500);
/// Fade-out time before the overlay node is detached.
pub const PROMPT_FADE_OUT: Duration = Duration::from_millis(220);

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PromptState {
    #[default]
    Idle,
    Watching,
    Shown,
    Stopped,
}

impl PromptState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Watching => "watching",
            Self::Shown => "shown",
            Self::Stopped => "stopped",
        }
    }
}

/// What the host must do after a watcher tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStep {
    /// Nothing changed.
    Unchanged,
    /// Attach and fade in the overlay.
    Show,
    /// Fade out and detach the overlay; keep watching.
    Hide,
    /// Cancel the watcher. `hide` is set when the overlay was visible.
    Stop { hide: bool },
}

#[derive(Debug, Default, Clone)]
pub struct PromptController {
    state: PromptState,
}

impl PromptController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn state(&self) -> PromptState {
        self.state
    }

    #[must_use]
    pub const fn is_visible(&self) -> bool {
        matches!(self.state, PromptState::Shown)
    }

    /// Returns `true` when the host should arm the watcher timer.
    pub fn start(&mut self) -> bool {
        if self.state != PromptState::Idle {
            return false;
        }
        self.state = PromptState::Watching;
        true
    }

    pub fn tick(&mut self, gesture_started: bool, targets_present: bool) -> PromptStep {
        match self.state {
            PromptState::Idle | PromptState::Stopped => PromptStep::Unchanged,
            _ if gesture_started => PromptStep::Stop { hide: self.stop() },
            PromptState::Watching if targets_present => {
                self.state = PromptState::Shown;
                #[cfg(feature = "tracing")]
                tracing::debug!("scroll prompt shown");
                PromptStep::Show
            }
            PromptState::Shown if !targets_present => {
                self.state = PromptState::Watching;
                #[cfg(feature = "tracing")]
                tracing::debug!("scroll prompt hidden; targets gone");
                PromptStep::Hide
            }
            PromptState::Watching | PromptState::Shown => PromptStep::Unchanged,
        }
    }

    /// Stop watching for good. Returns `true` if the overlay was visible and
    /// must be hidden.
    pub fn stop(&mut self) -> bool {
        let was_shown = self.is_visible();
        self.state = PromptState::Stopped;
        was_shown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_arms_once() {
        let mut prompt = PromptController::new();
        assert!(prompt.start());
        assert!(!prompt.start());
        assert_eq!(prompt.state(), PromptState::Watching);
    }

    #[test]
    fn idle_ticks_do_nothing() {
        let mut prompt = PromptController::new();
        assert_eq!(prompt.tick(false, true), PromptStep::Unchanged);
        assert_eq!(prompt.state(), PromptState::Idle);
    }

    #[test]
    fn toggles_with_target_presence() {
        let mut prompt = PromptController::new();
        prompt.start();
        assert_eq!(prompt.tick(false, false), PromptStep::Unchanged);
        assert_eq!(prompt.tick(false, true), PromptStep::Show);
        assert!(prompt.is_visible());
        assert_eq!(prompt.tick(false, true), PromptStep::Unchanged);
        assert_eq!(prompt.tick(false, false), PromptStep::Hide);
        assert_eq!(prompt.state(), PromptState::Watching);
        assert_eq!(prompt.tick(false, true), PromptStep::Show);
    }

    #[test]
    fn gesture_stops_watcher() {
        let mut prompt = PromptController::new();
        prompt.start();
        prompt.tick(false, true);
        assert_eq!(prompt.tick(true, true), PromptStep::Stop { hide: true });
        assert_eq!(prompt.state(), PromptState::Stopped);
        assert_eq!(prompt.tick(false, true), PromptStep::Unchanged);

        let mut hidden = PromptController::new();
        hidden.start();
        assert_eq!(hidden.tick(true, false), PromptStep::Stop { hide: false });
    }

    #[test]
    fn stopped_is_terminal() {
        let mut prompt = PromptController::new();
        assert!(!prompt.stop());
        assert!(!prompt.start());
        assert_eq!(prompt.state(), PromptState::Stopped);
    }
}
