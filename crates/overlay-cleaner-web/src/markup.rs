#![forbid(unsafe_code)]

//! Static markup injected into the page.
//!
//! Every injected node uses a reserved `overlay-cleaner-*` id and sits under
//! the root `<html>` element, outside the subtree the gate can cover.

/// Prompt overlay element id.
pub const PROMPT_ID: &str = "overlay-cleaner-scroll-prompt";
/// Prompt stylesheet element id.
pub const PROMPT_CSS_ID: &str = "overlay-cleaner-scroll-prompt-css";

/// Celebration overlay element id.
pub const CELEBRATION_ID: &str = "overlay-cleaner-celebration";

/// Packaged badge icon, resolved through the extension runtime.
pub const BADGE_ICON_PATH: &str = "tnyt-unlocker.png";

/// Topmost stacking order.
pub const Z_INDEX_MAX: &str = "2147483647";

/// Prompt stylesheet. The overlay and all its children ignore pointer
/// events so the page keeps receiving scroll input.
pub const PROMPT_CSS: &str = r#"
@keyframes oc-bounce { 0%,100% { transform: translateY(0); } 50% { transform: translateY(8px); } }
#overlay-cleaner-scroll-prompt {
  position: fixed;
  inset: 0;
  display: flex;
  align-items: center;
  justify-content: center;
  pointer-events: none;
  z-index: 2147483647;
  opacity: 0;
  transition: opacity 250ms ease;
  background: transparent;
}
#overlay-cleaner-scroll-prompt .oc-box {
  min-width: 240px;
  max-width: 80vw;
  padding: 14px 18px;
  border-radius: 14px;
  background: rgba(0,0,0,0.70);
  color: #e5e7eb;
  font: 500 14px/1.3 -apple-system, BlinkMacSystemFont, Segoe UI, Roboto, Inter, Helvetica, Arial, sans-serif;
  box-shadow: 0 12px 32px rgba(0,0,0,0.35);
  display: flex;
  gap: 24px;
  align-items: center;
  justify-content: center;
  pointer-events: none;
  backdrop-filter: blur(4px);
}
#overlay-cleaner-scroll-prompt .oc-chevron-wrap {
  margin-top: -16px;
  animation: oc-bounce 1200ms infinite;
  will-change: transform;
  display: inline-flex;
}
#overlay-cleaner-scroll-prompt .oc-chevron-rot {
  transform: rotate(45deg);
  display: inline-flex;
}
#overlay-cleaner-scroll-prompt .oc-chevron {
  width: 18px;
  height: 18px;
  border-right: 3px solid #a7f3d0;
  border-bottom: 3px solid #a7f3d0;
  opacity: 0.9;
  filter: drop-shadow(0 2px 6px rgba(0,0,0,0.35));
}
#overlay-cleaner-scroll-prompt .oc-text {
  pointer-events: none;
  user-select: none;
  color: #d1fae5;
}
"#;

/// Prompt body: bouncing chevron plus label.
pub const PROMPT_MARKUP: &str = r#"<div class="oc-box"><div class="oc-chevron-wrap"><div class="oc-chevron-rot"><div class="oc-chevron"></div></div></div><div class="oc-text">Scroll to unlock</div></div>"#;

/// Inline style for the full-viewport celebration layer.
pub const CELEBRATION_OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("inset", "0"),
    ("pointer-events", "none"),
    ("z-index", Z_INDEX_MAX),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("background", "transparent"),
    ("opacity", "0"),
    ("transition", "opacity 300ms ease"),
];

/// Inline style for the centered badge; starts shrunk and transparent.
pub const BADGE_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("width", "180px"),
    ("height", "180px"),
    ("border-radius", "20px"),
    ("background", "rgba(0,0,0,0.75)"),
    ("backdrop-filter", "blur(4px)"),
    ("display", "flex"),
    ("align-items", "center"),
    ("justify-content", "center"),
    ("box-shadow", "0 10px 30px rgba(0,0,0,0.35)"),
    ("transform", "scale(0.9)"),
    ("opacity", "0"),
    (
        "transition",
        "transform 300ms cubic-bezier(.2,.8,.2,1), opacity 300ms ease",
    ),
];

/// Badge icon edge length in CSS pixels.
pub const BADGE_ICON_SIZE: u32 = 96;

pub const BADGE_ICON_STYLE: &[(&str, &str)] = &[
    ("width", "96px"),
    ("height", "96px"),
    ("border-radius", "24px"),
    ("object-fit", "contain"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn stylesheet_targets_reserved_id() {
        assert!(PROMPT_CSS.contains(&format!("#{PROMPT_ID} {{")));
        assert!(PROMPT_CSS.contains(&format!("z-index: {Z_INDEX_MAX};")));
        // Overlay, box and label.
        let pointer_none = PROMPT_CSS.matches("pointer-events: none").count();
        assert_eq!(pointer_none, 3);
    }

    #[test]
    fn prompt_ids_share_reserved_prefix() {
        assert!(PROMPT_CSS_ID.starts_with(PROMPT_ID));
        assert!(PROMPT_ID.starts_with("overlay-cleaner-"));
        assert!(CELEBRATION_ID.starts_with("overlay-cleaner-"));
    }

    #[test]
    fn prompt_markup_has_label() {
        assert!(PROMPT_MARKUP.contains(">Scroll to unlock<"));
        assert!(PROMPT_MARKUP.contains("oc-chevron"));
    }

    #[test]
    fn celebration_layers_are_click_through_and_hidden_initially() {
        assert!(CELEBRATION_OVERLAY_STYLE.contains(&("pointer-events", "none")));
        assert!(CELEBRATION_OVERLAY_STYLE.contains(&("opacity", "0")));
        assert!(BADGE_STYLE.contains(&("opacity", "0")));
        assert!(BADGE_STYLE.contains(&("transform", "scale(0.9)")));
    }
}
