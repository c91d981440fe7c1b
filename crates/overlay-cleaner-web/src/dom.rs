#![forbid(unsafe_code)]

//! `web-sys` implementations of the core capabilities, plus small DOM helpers.

use gloo::timers::callback::Timeout;
use overlay_cleaner_core::{Page, PageError, Stroke, StrokeCanvas};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlElement, Window};

/// Render a JS exception as text for logs and [`PageError::Host`].
pub(crate) fn js_error_text(err: &JsValue) -> String {
    err.as_string()
        .or_else(|| {
            js_sys::Reflect::get(err, &JsValue::from_str("message"))
                .ok()
                .and_then(|m| m.as_string())
        })
        .unwrap_or_else(|| format!("{err:?}"))
}

/// Drop `value` from a fresh task.
///
/// Used when a callback has to release the listener or timer that is
/// currently invoking it.
pub(crate) fn drop_later<T: 'static>(value: T) {
    Timeout::new(0, move || drop(value)).forget();
}

pub(crate) fn create_html(document: &Document, tag: &str) -> Result<HtmlElement, JsValue> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("<{tag}> is not an HTML element")))
}

pub(crate) fn apply_styles(element: &HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = element.style();
    for (property, value) in styles {
        style.set_property(property, value)?;
    }
    Ok(())
}

/// Current `innerWidth` x `innerHeight`, or zero when unavailable.
pub(crate) fn viewport(window: &Window) -> (f64, f64) {
    let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (dim(window.inner_width()), dim(window.inner_height()))
}

/// Live document as a [`Page`].
pub(crate) struct DomPage {
    document: Document,
}

impl DomPage {
    pub(crate) fn new(document: Document) -> Self {
        Self { document }
    }
}

impl Page for DomPage {
    type Node = Element;

    fn query(&self, selector: &str) -> Result<Option<Element>, PageError> {
        self.document.query_selector(selector).map_err(|err| {
            let text = js_error_text(&err);
            if text.contains("not a valid selector") {
                PageError::InvalidSelector(selector.to_string())
            } else {
                PageError::Host(text)
            }
        })
    }

    fn set_style_important(
        &mut self,
        node: &Element,
        property: &str,
        value: &str,
    ) -> Result<(), PageError> {
        let style = match node.dyn_ref::<HtmlElement>() {
            Some(html) => html.style(),
            None => return Err(PageError::Host("target is not an HTML element".into())),
        };
        style
            .set_property_with_priority(property, value, "important")
            .map_err(|err| PageError::Host(js_error_text(&err)))
    }

    fn detach(&mut self, node: &Element) -> Result<(), PageError> {
        node.remove();
        Ok(())
    }
}

/// 2D canvas context as a [`StrokeCanvas`].
pub(crate) struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub(crate) fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }
}

impl StrokeCanvas for CanvasSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn draw_stroke(&mut self, stroke: &Stroke) {
        self.ctx.begin_path();
        self.ctx.set_line_width(stroke.width);
        self.ctx.set_stroke_style_str(stroke.color);
        self.ctx.move_to(stroke.from.0, stroke.from.1);
        self.ctx.line_to(stroke.to.0, stroke.to.1);
        self.ctx.stroke();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::wasm_bindgen_test;

    fn page_with(class: &str) -> (DomPage, HtmlElement) {
        let document = web_sys::window().unwrap().document().unwrap();
        let node = create_html(&document, "div").unwrap();
        node.set_class_name(class);
        document.body().unwrap().append_child(&node).unwrap();
        (DomPage::new(document), node)
    }

    #[wasm_bindgen_test]
    fn lock_styles_are_important() {
        let (mut page, node) = page_with("oc-test-lock");
        let found = page.query(".oc-test-lock").unwrap().unwrap();

        page.set_style_important(&found, "overflow", "visible").unwrap();
        page.set_style_important(&found, "position", "static").unwrap();

        let style = node.style();
        assert_eq!(style.get_property_value("overflow").unwrap(), "visible");
        assert_eq!(style.get_property_priority("overflow"), "important");
        assert_eq!(style.get_property_value("position").unwrap(), "static");
        assert_eq!(style.get_property_priority("position"), "important");
        node.remove();
    }

    #[wasm_bindgen_test]
    fn detach_removes_node_from_document() {
        let (mut page, node) = page_with("oc-test-banner");
        let found = page.query(".oc-test-banner").unwrap().unwrap();

        page.detach(&found).unwrap();
        assert!(node.parent_node().is_none());
        assert_eq!(page.query(".oc-test-banner"), Ok(None));
        // A second detach of the same node is harmless.
        assert_eq!(page.detach(&found), Ok(()));
    }

    #[wasm_bindgen_test]
    fn malformed_selector_is_reported() {
        let (page, node) = page_with("oc-test-malformed");
        assert_eq!(
            page.query("[["),
            Err(PageError::InvalidSelector("[[".to_string()))
        );
        node.remove();
    }
}
