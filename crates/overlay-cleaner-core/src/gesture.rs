#![forbid(unsafe_code)]

//! First-scroll-gesture detection.

/// Keys that scroll the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollKey {
    ArrowDown,
    ArrowUp,
    PageDown,
    PageUp,
    Space,
    Home,
    End,
}

impl ScrollKey {
    pub const ALL: [Self; 7] = [
        Self::ArrowDown,
        Self::ArrowUp,
        Self::PageDown,
        Self::PageUp,
        Self::Space,
        Self::Home,
        Self::End,
    ];

    /// Classify a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Option<Self> {
        match key {
            "ArrowDown" => Some(Self::ArrowDown),
            "ArrowUp" => Some(Self::ArrowUp),
            "PageDown" => Some(Self::PageDown),
            "PageUp" => Some(Self::PageUp),
            // Older engines report the space bar as "Spacebar".
            " " | "Spacebar" => Some(Self::Space),
            "Home" => Some(Self::Home),
            "End" => Some(Self::End),
            _ => None,
        }
    }

    /// Canonical DOM `key` value.
    #[must_use]
    pub const fn dom_key(self) -> &'static str {
        match self {
            Self::ArrowDown => "ArrowDown",
            Self::ArrowUp => "ArrowUp",
            Self::PageDown => "PageDown",
            Self::PageUp => "PageUp",
            Self::Space => " ",
            Self::Home => "Home",
            Self::End => "End",
        }
    }
}

/// Input that signals scroll intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureSource {
    Wheel,
    Scroll,
    TouchStart,
    TouchMove,
    Key(ScrollKey),
}

impl GestureSource {
    /// Event types registered as passive one-shot listeners.
    pub const POINTER_EVENTS: [(&'static str, Self); 4] = [
        ("wheel", Self::Wheel),
        ("scroll", Self::Scroll),
        ("touchstart", Self::TouchStart),
        ("touchmove", Self::TouchMove),
    ];
}

/// One-way "the user has started scrolling" latch.
#[derive(Debug, Default, Clone)]
pub struct GestureDetector {
    first: Option<GestureSource>,
}

impl GestureDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn started(&self) -> bool {
        self.first.is_some()
    }

    /// Record a gesture. Returns `true` only for the first one.
    pub fn fire(&mut self, source: GestureSource) -> bool {
        if self.first.is_some() {
            return false;
        }
        self.first = Some(source);
        #[cfg(feature = "tracing")]
        tracing::debug!(?source, "first scroll gesture");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_scroll_keys() {
        for key in ScrollKey::ALL {
            assert_eq!(ScrollKey::from_dom_key(key.dom_key()), Some(key));
        }
        assert_eq!(ScrollKey::from_dom_key("Spacebar"), Some(ScrollKey::Space));
        assert_eq!(ScrollKey::from_dom_key("a"), None);
        assert_eq!(ScrollKey::from_dom_key("Enter"), None);
        assert_eq!(ScrollKey::from_dom_key("Space"), None);
        assert_eq!(ScrollKey::from_dom_key(""), None);
    }

    #[test]
    fn latch_fires_once() {
        let mut detector = GestureDetector::new();
        assert!(!detector.started());
        assert!(detector.fire(GestureSource::TouchMove));
        assert!(!detector.fire(GestureSource::Wheel));
        assert!(!detector.fire(GestureSource::Key(ScrollKey::End)));
        assert!(detector.started());
    }
}
