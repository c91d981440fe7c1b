#![forbid(unsafe_code)]

//! Minimal capability surface over the host document.
//!
//! The state machines only ever need to find an element, force a style
//! property on it, or detach it. Keeping the surface this small lets the
//! engine run against [`crate::memory_page::MemoryPage`] in tests and against
//! `web_sys::Document` in the browser.

use std::fmt;

/// Failure reported by a [`Page`] implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The selector could not be parsed by the host.
    InvalidSelector(String),
    /// The document (or the node) is no longer attached to a live page.
    Detached,
    /// Any other host-side exception, carried as text.
    Host(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSelector(selector) => write!(f, "invalid selector: {selector}"),
            Self::Detached => write!(f, "document detached"),
            Self::Host(msg) => write!(f, "host error: {msg}"),
        }
    }
}

impl std::error::Error for PageError {}

/// Document capabilities consumed by the locator and the unlock engine.
pub trait Page {
    /// Handle to a located element.
    type Node;

    /// First element matching `selector`, if any.
    fn query(&self, selector: &str) -> Result<Option<Self::Node>, PageError>;

    /// Set `property: value !important` on the element's inline style.
    fn set_style_important(
        &mut self,
        node: &Self::Node,
        property: &str,
        value: &str,
    ) -> Result<(), PageError>;

    /// Remove the element from the document tree.
    fn detach(&mut self, node: &Self::Node) -> Result<(), PageError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_human_readable() {
        assert_eq!(
            PageError::InvalidSelector("div[".into()).to_string(),
            "invalid selector: div["
        );
        assert_eq!(PageError::Detached.to_string(), "document detached");
        assert_eq!(
            PageError::Host("SyntaxError".into()).to_string(),
            "host error: SyntaxError"
        );
    }
}
