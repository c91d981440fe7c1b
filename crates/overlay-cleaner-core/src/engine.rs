#![forbid(unsafe_code)]

//! Unlock engine: the poll loop that clears the gate.
//!
//! ```text
//!              start()              all flags set
//! NotStarted ─────────▶ Polling ───────────────────▶ Completed
//!                         │  │
//!                         │  └── elapsed > poll_max ─▶ TimedOut
//!                         └───── page error ─────────▶ Halted
//! ```
//!
//! Every state other than `Polling` is inert: ticks return
//! [`TickOutcome::Inactive`] and never touch the page. Each target is settled
//! at most once; a settled target is not queried again.

use core::time::Duration;

use serde::Serialize;

use crate::config::Config;
use crate::page::{Page, PageError};

/// One of the three elements the engine acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// Gate container; its overflow and positioning are overridden.
    Lock,
    /// Messaging banner; detached.
    Banner,
    /// Gradient sibling; detached.
    Gradient,
}

impl Target {
    pub const ALL: [Self; 3] = [Self::Lock, Self::Banner, Self::Gradient];

    #[must_use]
    pub fn selector(self, config: &Config) -> &str {
        match self {
            Self::Lock => &config.lock_selector,
            Self::Banner => &config.banner_selector,
            Self::Gradient => &config.gradient_selector,
        }
    }

    fn apply<P: Page>(self, page: &mut P, node: &P::Node) -> Result<(), PageError> {
        match self {
            Self::Lock => {
                page.set_style_important(node, "overflow", "visible")?;
                page.set_style_important(node, "position", "static")
            }
            Self::Banner | Self::Gradient => page.detach(node),
        }
    }
}

/// One-way record of which mutations have been applied.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationFlags {
    pub unlocked_scroll: bool,
    pub removed_banner: bool,
    pub removed_gradient: bool,
}

impl MutationFlags {
    #[must_use]
    pub const fn get(self, target: Target) -> bool {
        match target {
            Target::Lock => self.unlocked_scroll,
            Target::Banner => self.removed_banner,
            Target::Gradient => self.removed_gradient,
        }
    }

    fn set(&mut self, target: Target) {
        match target {
            Target::Lock => self.unlocked_scroll = true,
            Target::Banner => self.removed_banner = true,
            Target::Gradient => self.removed_gradient = true,
        }
    }

    #[must_use]
    pub const fn all(self) -> bool {
        self.unlocked_scroll && self.removed_banner && self.removed_gradient
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NotStarted,
    Polling { started_at: Duration },
    Completed,
    TimedOut,
    /// A tick failed; polling stopped for good.
    Halted,
}

impl EngineState {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::Polling { .. } => "polling",
            Self::Completed => "completed",
            Self::TimedOut => "timed_out",
            Self::Halted => "halted",
        }
    }
}

/// Result of one [`UnlockEngine::tick`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The engine was not polling; nothing was done.
    Inactive,
    /// Still polling. `changed` reports whether this tick applied a mutation.
    Pending { changed: bool },
    /// All three mutations are in place. Returned exactly once.
    Completed,
    /// The poll window elapsed before completion.
    TimedOut,
    /// The tick failed; the engine will not poll again.
    Halted(PageError),
}

impl TickOutcome {
    /// Whether the host should cancel the poll timer.
    #[must_use]
    pub const fn stops_polling(&self) -> bool {
        !matches!(self, Self::Inactive | Self::Pending { .. })
    }
}

#[derive(Debug, Clone)]
pub struct UnlockEngine {
    config: Config,
    flags: MutationFlags,
    state: EngineState,
}

impl UnlockEngine {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            flags: MutationFlags::default(),
            state: EngineState::NotStarted,
        }
    }

    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub const fn flags(&self) -> MutationFlags {
        self.flags
    }

    /// Begin polling at `now`. Returns `false` (and does nothing) unless the
    /// engine has never been started.
    pub fn start(&mut self, now: Duration) -> bool {
        if self.state != EngineState::NotStarted {
            return false;
        }
        self.state = EngineState::Polling { started_at: now };
        #[cfg(feature = "tracing")]
        tracing::debug!(?now, "unlock polling started");
        true
    }

    /// Apply every outstanding mutation whose element is present.
    ///
    /// Targets are independent: an absent element is simply retried on the
    /// next pass. Returns whether anything changed.
    pub fn scan_and_act<P: Page>(&mut self, page: &mut P) -> Result<bool, PageError> {
        let mut changed = false;
        for target in Target::ALL {
            if self.flags.get(target) {
                continue;
            }
            let selector = target.selector(&self.config);
            if selector.is_empty() {
                continue;
            }
            let Some(node) = page.query(selector)? else {
                continue;
            };
            target.apply(page, &node)?;
            self.flags.set(target);
            changed = true;
            #[cfg(feature = "tracing")]
            tracing::debug!(?target, "target settled");
        }
        Ok(changed)
    }

    /// One poll tick at host time `now`.
    pub fn tick<P: Page>(&mut self, page: &mut P, now: Duration) -> TickOutcome {
        let EngineState::Polling { started_at } = self.state else {
            return TickOutcome::Inactive;
        };

        let changed = match self.scan_and_act(page) {
            Ok(changed) => changed,
            Err(err) => {
                self.state = EngineState::Halted;
                #[cfg(feature = "tracing")]
                tracing::warn!(error = %err, "unlock tick failed; polling halted");
                return TickOutcome::Halted(err);
            }
        };

        if self.flags.all() {
            self.state = EngineState::Completed;
            #[cfg(feature = "tracing")]
            tracing::info!(elapsed = ?now.saturating_sub(started_at), "gate cleared");
            return TickOutcome::Completed;
        }

        if now.saturating_sub(started_at) > self.config.poll_max() {
            self.state = EngineState::TimedOut;
            #[cfg(feature = "tracing")]
            tracing::info!(flags = ?self.flags, "unlock polling timed out");
            return TickOutcome::TimedOut;
        }

        TickOutcome::Pending { changed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_page::MemoryPage;
    use pretty_assertions::assert_eq;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn full_page(config: &Config) -> MemoryPage {
        let mut page = MemoryPage::new();
        page.insert(&[config.lock_selector.as_str()]);
        page.insert(&[config.banner_selector.as_str()]);
        page.insert(&[config.gradient_selector.as_str()]);
        page
    }

    #[test]
    fn start_is_one_shot() {
        let mut engine = UnlockEngine::new(Config::default());
        assert!(engine.start(secs(1)));
        assert!(!engine.start(secs(2)));
        assert_eq!(
            engine.state(),
            EngineState::Polling {
                started_at: secs(1)
            }
        );
    }

    #[test]
    fn tick_before_start_is_inert() {
        let config = Config::default();
        let mut page = full_page(&config);
        let mut engine = UnlockEngine::new(config.clone());
        assert_eq!(engine.tick(&mut page, secs(0)), TickOutcome::Inactive);
        assert_eq!(page.query_count(&config.lock_selector), 0);
        assert_eq!(engine.flags(), MutationFlags::default());
    }

    #[test]
    fn lock_gets_important_overrides() {
        let config = Config::default();
        let mut page = MemoryPage::new();
        let lock = page.insert(&[config.lock_selector.as_str()]);
        let mut engine = UnlockEngine::new(config);
        assert_eq!(engine.scan_and_act(&mut page), Ok(true));

        let overflow = page.style(lock, "overflow").unwrap();
        assert_eq!(overflow.value, "visible");
        assert!(overflow.important);
        let position = page.style(lock, "position").unwrap();
        assert_eq!(position.value, "static");
        assert!(position.important);
        assert!(page.is_attached(lock));
    }

    #[test]
    fn scan_is_idempotent() {
        let config = Config::default();
        let mut page = full_page(&config);
        let mut engine = UnlockEngine::new(config.clone());

        assert_eq!(engine.scan_and_act(&mut page), Ok(true));
        for _ in 0..5 {
            assert_eq!(engine.scan_and_act(&mut page), Ok(false));
        }
        assert!(engine.flags().all());
        assert_eq!(page.style_writes(), 2);
        assert_eq!(page.detaches(), 2);
        for target in Target::ALL {
            assert_eq!(page.query_count(target.selector(&config)), 1);
        }
    }

    #[test]
    fn targets_settle_independently() {
        let config = Config::default();
        let mut page = MemoryPage::new();
        page.insert(&[config.banner_selector.as_str()]);
        let mut engine = UnlockEngine::new(config.clone());
        engine.start(secs(0));

        assert_eq!(
            engine.tick(&mut page, secs(1)),
            TickOutcome::Pending { changed: true }
        );
        assert_eq!(
            engine.flags(),
            MutationFlags {
                unlocked_scroll: false,
                removed_banner: true,
                removed_gradient: false,
            }
        );

        page.insert(&[config.lock_selector.as_str()]);
        page.insert(&[config.gradient_selector.as_str()]);
        assert_eq!(engine.tick(&mut page, secs(2)), TickOutcome::Completed);
        assert!(engine.flags().all());
        assert_eq!(page.query_count(&config.banner_selector), 1);
    }

    #[test]
    fn completion_is_reported_once() {
        let config = Config::default();
        let mut page = full_page(&config);
        let mut engine = UnlockEngine::new(config);
        engine.start(secs(0));

        assert_eq!(engine.tick(&mut page, secs(1)), TickOutcome::Completed);
        assert_eq!(engine.tick(&mut page, secs(2)), TickOutcome::Inactive);
        assert_eq!(engine.tick(&mut page, secs(3)), TickOutcome::Inactive);
        assert_eq!(engine.state(), EngineState::Completed);
    }

    #[test]
    fn times_out_strictly_after_max() {
        let config = Config::default();
        let mut page = MemoryPage::new();
        let mut engine = UnlockEngine::new(config.clone());
        engine.start(secs(10));

        assert_eq!(
            engine.tick(&mut page, secs(70)),
            TickOutcome::Pending { changed: false }
        );
        assert_eq!(
            engine.tick(&mut page, secs(70) + Duration::from_millis(1)),
            TickOutcome::TimedOut
        );

        // Targets showing up afterwards are left alone.
        let lock = page.insert(&[config.lock_selector.as_str()]);
        page.insert(&[config.banner_selector.as_str()]);
        page.insert(&[config.gradient_selector.as_str()]);
        assert_eq!(engine.tick(&mut page, secs(72)), TickOutcome::Inactive);
        assert_eq!(page.style(lock, "overflow"), None);
        assert_eq!(engine.flags(), MutationFlags::default());
    }

    #[test]
    fn completion_wins_over_timeout_on_the_same_tick() {
        let config = Config::default();
        let mut page = full_page(&config);
        let mut engine = UnlockEngine::new(config);
        engine.start(secs(0));
        assert_eq!(engine.tick(&mut page, secs(600)), TickOutcome::Completed);
    }

    #[test]
    fn page_error_halts_for_good() {
        let config = Config::default();
        let mut page = full_page(&config);
        page.fail_queries_for(&config.gradient_selector);
        let mut engine = UnlockEngine::new(config.clone());
        engine.start(secs(0));

        let outcome = engine.tick(&mut page, secs(1));
        assert_eq!(
            outcome,
            TickOutcome::Halted(PageError::InvalidSelector(
                config.gradient_selector.clone()
            ))
        );
        assert!(outcome.stops_polling());
        assert_eq!(engine.state(), EngineState::Halted);

        // Lock and banner were handled before the failing query.
        assert!(engine.flags().unlocked_scroll);
        assert!(engine.flags().removed_banner);
        assert_eq!(engine.tick(&mut page, secs(2)), TickOutcome::Inactive);
        assert_eq!(page.query_count(&config.gradient_selector), 1);
    }

    #[test]
    fn removed_target_that_reappears_is_not_handled_again() {
        let config = Config::default();
        let mut page = MemoryPage::new();
        let banner = page.insert(&[config.banner_selector.as_str()]);
        let mut engine = UnlockEngine::new(config);
        engine.start(secs(0));
        engine.tick(&mut page, secs(1));
        assert!(!page.is_attached(banner));

        page.restore(banner);
        engine.tick(&mut page, secs(2));
        assert!(page.is_attached(banner));
        assert_eq!(page.detaches(), 1);
    }
}
