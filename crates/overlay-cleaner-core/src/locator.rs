#![forbid(unsafe_code)]

//! Presence check for the gate and its banner.

use crate::config::Config;
use crate::page::Page;

/// `true` only when both the lock element and the banner are in the page.
///
/// Query failures are swallowed and reported as "not present": the prompt
/// must never appear on a page we cannot read.
pub fn targets_present<P: Page>(page: &P, config: &Config) -> bool {
    found(page, &config.lock_selector) && found(page, &config.banner_selector)
}

fn found<P: Page>(page: &P, selector: &str) -> bool {
    if selector.is_empty() {
        return false;
    }
    match page.query(selector) {
        Ok(node) => node.is_some(),
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(selector, error = %_err, "target query failed");
            false
        }
    }
}
