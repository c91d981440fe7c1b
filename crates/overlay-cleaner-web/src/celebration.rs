#![forbid(unsafe_code)]

//! Confetti overlay and "unlocked" badge.
//!
//! A [`Celebration`] keeps itself alive through its own animation-frame and
//! teardown callbacks; once teardown runs, every node, listener and particle
//! is released and the instance is dropped.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use overlay_cleaner_core::confetti::CELEBRATION_TEARDOWN;
use overlay_cleaner_core::{Confetti, FrameStatus};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlImageElement, Window,
};

use crate::dom::{CanvasSurface, apply_styles, create_html, drop_later, js_error_text, viewport};
use crate::markup::{
    BADGE_ICON_PATH, BADGE_ICON_SIZE, BADGE_ICON_STYLE, BADGE_STYLE, CELEBRATION_ID,
    CELEBRATION_OVERLAY_STYLE,
};

#[wasm_bindgen]
extern "C" {
    /// `chrome.runtime.getURL`; throws outside an extension context.
    #[wasm_bindgen(catch, js_namespace = ["chrome", "runtime"], js_name = getURL)]
    fn extension_url(path: &str) -> Result<String, JsValue>;
}

pub(crate) struct Celebration {
    window: Window,
    overlay: HtmlElement,
    canvas: HtmlCanvasElement,
    surface: RefCell<CanvasSurface>,
    confetti: RefCell<Confetti>,
    frame: RefCell<Option<AnimationFrame>>,
    intro: RefCell<Option<AnimationFrame>>,
    resize: RefCell<Option<EventListener>>,
    teardown: RefCell<Option<Timeout>>,
}

/// Overlay subtree built off-document.
struct Layers {
    overlay: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    badge: HtmlElement,
}

impl Layers {
    fn build(document: &Document) -> Result<Self, JsValue> {
        let overlay = create_html(document, "div")?;
        overlay.set_id(CELEBRATION_ID);
        apply_styles(&overlay, CELEBRATION_OVERLAY_STYLE)?;

        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| JsValue::from_str("<canvas> is not a canvas element"))?;
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d canvas context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| JsValue::from_str("unexpected 2d context type"))?;

        let badge = build_badge(document)?;
        overlay.append_child(&canvas)?;
        overlay.append_child(&badge)?;
        Ok(Self {
            overlay,
            canvas,
            ctx,
            badge,
        })
    }
}

impl Celebration {
    /// Build the overlay and start the animation.
    ///
    /// The page is touched only after every layer is built.
    pub(crate) fn start(
        window: &Window,
        document: &Document,
        seed: u64,
    ) -> Result<Rc<Self>, JsValue> {
        let root = document
            .document_element()
            .ok_or_else(|| JsValue::from_str("document has no root element"))?;
        let Layers {
            overlay,
            canvas,
            ctx,
            badge,
        } = Layers::build(document)?;
        root.append_child(&overlay)?;

        let (width, height) = viewport(window);
        size_canvas(&canvas, width, height);

        let this = Rc::new(Self {
            window: window.clone(),
            overlay,
            canvas,
            surface: RefCell::new(CanvasSurface::new(ctx)),
            confetti: RefCell::new(Confetti::new(width, height, seed)),
            frame: RefCell::new(None),
            intro: RefCell::new(None),
            resize: RefCell::new(None),
            teardown: RefCell::new(None),
        });

        let weak = Rc::downgrade(&this);
        *this.resize.borrow_mut() = Some(EventListener::new(window, "resize", move |_| {
            if let Some(this) = weak.upgrade() {
                this.on_resize();
            }
        }));

        let overlay = this.overlay.clone();
        *this.intro.borrow_mut() = Some(request_animation_frame(move |_| {
            let _ = overlay.style().set_property("opacity", "1");
            let _ = apply_styles(&badge, &[("opacity", "1"), ("transform", "scale(1)")]);
        }));

        this.schedule_frame();
        tracing::debug!(width, height, "celebration started");
        Ok(this)
    }

    fn schedule_frame(self: &Rc<Self>) {
        let this = Rc::clone(self);
        let handle = request_animation_frame(move |timestamp| this.on_frame(timestamp));
        *self.frame.borrow_mut() = Some(handle);
    }

    fn on_frame(self: &Rc<Self>, timestamp_ms: f64) {
        self.frame.borrow_mut().take();
        let timestamp = Duration::from_secs_f64(timestamp_ms.max(0.0) / 1_000.0);
        let status = {
            let mut surface = self.surface.borrow_mut();
            self.confetti.borrow_mut().frame(timestamp, &mut *surface)
        };
        match status {
            FrameStatus::Running => self.schedule_frame(),
            FrameStatus::Finished => self.fade_out(),
        }
    }

    fn on_resize(&self) {
        let (width, height) = viewport(&self.window);
        size_canvas(&self.canvas, width, height);
        self.confetti.borrow_mut().resize(width, height);
    }

    fn fade_out(self: &Rc<Self>) {
        let _ = self.overlay.style().set_property("opacity", "0");
        let this = Rc::clone(self);
        let delay = CELEBRATION_TEARDOWN.as_millis() as u32;
        *self.teardown.borrow_mut() = Some(Timeout::new(delay, move || this.finish()));
    }

    fn finish(&self) {
        self.resize.borrow_mut().take();
        self.intro.borrow_mut().take();
        self.frame.borrow_mut().take();
        self.overlay.remove();
        // The running timeout owns the last strong reference.
        if let Some(teardown) = self.teardown.borrow_mut().take() {
            drop_later(teardown);
        }
        tracing::debug!("celebration finished");
    }
}

fn size_canvas(canvas: &HtmlCanvasElement, width: f64, height: f64) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
}

fn build_badge(document: &Document) -> Result<HtmlElement, JsValue> {
    let badge = create_html(document, "div")?;
    apply_styles(&badge, BADGE_STYLE)?;

    match extension_url(BADGE_ICON_PATH) {
        Ok(src) => {
            let icon = document
                .create_element("img")?
                .dyn_into::<HtmlImageElement>()
                .map_err(|_| JsValue::from_str("<img> is not an image element"))?;
            icon.set_src(&src);
            icon.set_alt("Unlocked");
            icon.set_width(BADGE_ICON_SIZE);
            icon.set_height(BADGE_ICON_SIZE);
            apply_styles(&icon, BADGE_ICON_STYLE)?;
            badge.append_child(&icon)?;
        }
        Err(err) => {
            tracing::debug!(error = %js_error_text(&err), "badge icon unavailable");
        }
    }
    Ok(badge)
}
