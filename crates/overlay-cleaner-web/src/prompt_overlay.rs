#![forbid(unsafe_code)]

//! DOM side of the "Scroll to unlock" prompt.

use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use overlay_cleaner_core::prompt::PROMPT_FADE_OUT;
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, HtmlElement};

use crate::dom::create_html;
use crate::markup::{PROMPT_CSS, PROMPT_CSS_ID, PROMPT_ID, PROMPT_MARKUP};

pub(crate) struct PromptOverlay {
    document: Document,
    node: Option<HtmlElement>,
    fade_in: Option<AnimationFrame>,
    pending_removal: Option<Timeout>,
}

impl PromptOverlay {
    pub(crate) fn new(document: Document) -> Self {
        Self {
            document,
            node: None,
            fade_in: None,
            pending_removal: None,
        }
    }

    /// Inject the stylesheet and overlay, then fade in on the next frame.
    pub(crate) fn show(&mut self) -> Result<(), JsValue> {
        if self.node.is_some() {
            return Ok(());
        }
        // A node still fading out goes right away; the id is single-instance.
        self.pending_removal.take();
        self.remove_by_id(PROMPT_ID);
        self.remove_by_id(PROMPT_CSS_ID);

        let root = self
            .document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;
        let (style, overlay) = self.build()?;

        match self.document.head() {
            Some(head) => head.append_child(&style)?,
            None => root.append_child(&style)?,
        };
        if let Err(err) = root.append_child(&overlay) {
            style.remove();
            return Err(err);
        }

        let fading = overlay.clone();
        self.fade_in = Some(request_animation_frame(move |_| {
            let _ = fading.style().set_property("opacity", "1");
        }));
        self.node = Some(overlay);
        Ok(())
    }

    /// Fade out and detach the overlay; drop the stylesheet now.
    pub(crate) fn hide(&mut self) {
        self.fade_in.take();
        if let Some(node) = self.node.take() {
            let _ = node.style().set_property("opacity", "0");
            let delay = PROMPT_FADE_OUT.as_millis() as u32;
            self.pending_removal = Some(Timeout::new(delay, move || node.remove()));
        }
        self.remove_by_id(PROMPT_CSS_ID);
    }

    /// Stylesheet and overlay, both still detached.
    fn build(&self) -> Result<(Element, HtmlElement), JsValue> {
        let style = self.document.create_element("style")?;
        style.set_id(PROMPT_CSS_ID);
        style.set_text_content(Some(PROMPT_CSS));

        let overlay = create_html(&self.document, "div")?;
        overlay.set_id(PROMPT_ID);
        overlay.set_inner_html(PROMPT_MARKUP);
        Ok((style, overlay))
    }

    fn remove_by_id(&self, id: &str) {
        if let Some(stale) = self.document.get_element_by_id(id) {
            stale.remove();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn count(document: &Document, id: &str) -> u32 {
        document
            .query_selector_all(&format!("#{id}"))
            .unwrap()
            .length()
    }

    fn clear(document: &Document) {
        for id in [PROMPT_ID, PROMPT_CSS_ID] {
            while let Some(node) = document.get_element_by_id(id) {
                node.remove();
            }
        }
    }

    #[wasm_bindgen_test]
    fn show_attaches_overlay_under_root() {
        let document = document();
        clear(&document);
        let mut prompt = PromptOverlay::new(document.clone());

        prompt.show().unwrap();
        let node = document.get_element_by_id(PROMPT_ID).unwrap();
        assert_eq!(node.parent_element(), document.document_element());
        assert_eq!(count(&document, PROMPT_CSS_ID), 1);

        // Already shown: nothing new is injected.
        prompt.show().unwrap();
        assert_eq!(count(&document, PROMPT_ID), 1);
        assert_eq!(count(&document, PROMPT_CSS_ID), 1);
        clear(&document);
    }

    #[wasm_bindgen_test]
    fn hide_drops_stylesheet_immediately() {
        let document = document();
        clear(&document);
        let mut prompt = PromptOverlay::new(document.clone());

        prompt.show().unwrap();
        prompt.hide();
        assert_eq!(count(&document, PROMPT_CSS_ID), 0);
        // The overlay lingers for its fade-out.
        assert_eq!(count(&document, PROMPT_ID), 1);
        clear(&document);
    }

    #[wasm_bindgen_test]
    fn reshow_during_fade_out_keeps_single_overlay() {
        let document = document();
        clear(&document);
        let mut prompt = PromptOverlay::new(document.clone());

        prompt.show().unwrap();
        prompt.hide();
        prompt.show().unwrap();
        assert_eq!(count(&document, PROMPT_ID), 1);
        assert_eq!(count(&document, PROMPT_CSS_ID), 1);
        clear(&document);
    }

    #[wasm_bindgen_test]
    fn show_replaces_stale_nodes() {
        let document = document();
        clear(&document);
        let body = document.body().unwrap();
        for id in [PROMPT_ID, PROMPT_CSS_ID] {
            let stale = document.create_element("div").unwrap();
            stale.set_id(id);
            body.append_child(&stale).unwrap();
        }

        let mut prompt = PromptOverlay::new(document.clone());
        prompt.show().unwrap();
        assert_eq!(count(&document, PROMPT_ID), 1);
        assert_eq!(count(&document, PROMPT_CSS_ID), 1);
        let node = document.get_element_by_id(PROMPT_ID).unwrap();
        assert_eq!(node.parent_element(), document.document_element());
        clear(&document);
    }

    #[wasm_bindgen_test]
    fn building_leaves_document_untouched() {
        let document = document();
        clear(&document);
        let prompt = PromptOverlay::new(document.clone());

        let (style, overlay) = prompt.build().unwrap();
        assert!(style.parent_node().is_none());
        assert!(overlay.parent_node().is_none());
        assert_eq!(count(&document, PROMPT_ID), 0);
        assert_eq!(count(&document, PROMPT_CSS_ID), 0);
    }
}
