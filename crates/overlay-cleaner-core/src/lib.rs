#![forbid(unsafe_code)]

//! Host-agnostic core for the overlay cleaner content script.
//!
//! Everything in this crate is deterministic and free of browser bindings:
//! - the page is reached only through the [`page::Page`] capability trait,
//! - time is a monotonic [`core::time::Duration`] supplied by the host,
//! - timers are requested through [`session::Command`] values instead of
//!   being scheduled directly.
//!
//! `overlay-cleaner-web` wraps this crate with `web-sys` implementations and
//! real timers; tests drive it with [`memory_page::MemoryPage`].

pub mod config;
pub mod confetti;
pub mod engine;
pub mod gesture;
pub mod locator;
pub mod memory_page;
pub mod page;
pub mod prompt;
pub mod session;

pub use config::{Config, ConfigError};
pub use confetti::{Confetti, FrameStatus, Stroke, StrokeCanvas};
pub use engine::{EngineState, MutationFlags, Target, TickOutcome, UnlockEngine};
pub use gesture::{GestureDetector, GestureSource, ScrollKey};
pub use locator::targets_present;
pub use memory_page::MemoryPage;
pub use page::{Page, PageError};
pub use prompt::{PromptController, PromptState, PromptStep};
pub use session::{Command, Session, Status};
