#![forbid(unsafe_code)]

//! Fixed configuration record.
//!
//! The selectors target one site's markup and are not exposed to the end
//! user. The record still (de)serializes so development harnesses can feed
//! alternative markup without recompiling.

use core::time::Duration;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Gate container that blocks scrolling.
pub const DEFAULT_LOCK_SELECTOR: &str =
    r#".vi-gateway-container[data-testid="vi-gateway-container"]"#;
/// Messaging banner shown alongside the gate.
pub const DEFAULT_BANNER_SELECTOR: &str =
    r#"[data-testid="onsite-messaging-unit-gateway"][data-audience]"#;
/// Decorative fade overlay, the last child of the gate container.
pub const DEFAULT_GRADIENT_SELECTOR: &str =
    r#".vi-gateway-container[data-testid="vi-gateway-container"] > div:last-of-type"#;

const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;
const DEFAULT_POLL_MAX_MS: u64 = 60_000;

/// Configuration validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A selector field was empty.
    EmptySelector(&'static str),
    /// `pollIntervalMs` was zero.
    ZeroPollInterval,
    /// `pollMaxMs` was shorter than one poll interval.
    MaxShorterThanInterval { interval_ms: u64, max_ms: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelector(field) => write!(f, "selector `{field}` is empty"),
            Self::ZeroPollInterval => write!(f, "poll interval must be non-zero"),
            Self::MaxShorterThanInterval {
                interval_ms,
                max_ms,
            } => write!(
                f,
                "poll max ({max_ms} ms) is shorter than the poll interval ({interval_ms} ms)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Selectors and poll timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub lock_selector: String,
    pub banner_selector: String,
    pub gradient_selector: String,
    pub poll_interval_ms: u64,
    pub poll_max_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lock_selector: DEFAULT_LOCK_SELECTOR.to_string(),
            banner_selector: DEFAULT_BANNER_SELECTOR.to_string(),
            gradient_selector: DEFAULT_GRADIENT_SELECTOR.to_string(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_max_ms: DEFAULT_POLL_MAX_MS,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("lockSelector", &self.lock_selector),
            ("bannerSelector", &self.banner_selector),
            ("gradientSelector", &self.gradient_selector),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptySelector(field));
            }
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.poll_max_ms < self.poll_interval_ms {
            return Err(ConfigError::MaxShorterThanInterval {
                interval_ms: self.poll_interval_ms,
                max_ms: self.poll_max_ms,
            });
        }
        Ok(())
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub const fn poll_max(&self) -> Duration {
        Duration::from_millis(self.poll_max_ms)
    }
}
