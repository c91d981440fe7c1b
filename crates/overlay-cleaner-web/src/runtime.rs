#![forbid(unsafe_code)]

//! Executes [`Session`] commands with real timers and listeners.
//!
//! All state sits behind `RefCell`s and is only touched from event-loop
//! callbacks; no borrow is held while a command runs.

use core::time::Duration;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Interval;
use overlay_cleaner_core::{Command, Config, GestureSource, ScrollKey, Session, Status};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, KeyboardEvent, Window};
use web_time::Instant;

use crate::celebration::Celebration;
use crate::dom::{DomPage, drop_later, js_error_text};
use crate::prompt_overlay::PromptOverlay;

pub(crate) struct Runtime {
    window: Window,
    document: Document,
    epoch: Instant,
    session: RefCell<Session>,
    page: RefCell<DomPage>,
    prompt: RefCell<PromptOverlay>,
    prompt_watch: RefCell<Option<Interval>>,
    poller: RefCell<Option<Interval>>,
    gesture_listeners: RefCell<Vec<EventListener>>,
    ready_listener: RefCell<Option<EventListener>>,
}

impl Runtime {
    /// Build the runtime, register gesture listeners and wait for the
    /// document to be ready.
    pub(crate) fn install(config: Config) -> Result<Rc<Self>, JsValue> {
        config
            .validate()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let runtime = Rc::new(Self {
            epoch: Instant::now(),
            session: RefCell::new(Session::new(config)),
            page: RefCell::new(DomPage::new(document.clone())),
            prompt: RefCell::new(PromptOverlay::new(document.clone())),
            prompt_watch: RefCell::new(None),
            poller: RefCell::new(None),
            gesture_listeners: RefCell::new(Vec::new()),
            ready_listener: RefCell::new(None),
            window,
            document,
        });

        runtime.listen_for_gestures();

        if runtime.document.ready_state() == "loading" {
            let weak = Rc::downgrade(&runtime);
            let listener = EventListener::once(&runtime.document, "DOMContentLoaded", move |_| {
                if let Some(runtime) = weak.upgrade() {
                    runtime.ready_listener.borrow_mut().take();
                    runtime.on_ready();
                }
            });
            *runtime.ready_listener.borrow_mut() = Some(listener);
        } else {
            runtime.on_ready();
        }

        tracing::info!("overlay cleaner installed");
        Ok(runtime)
    }

    pub(crate) fn status(&self) -> Status {
        self.session.borrow().status()
    }

    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn on_ready(self: &Rc<Self>) {
        let commands = self.session.borrow_mut().on_ready();
        self.execute(commands);
    }

    fn on_prompt_tick(self: &Rc<Self>) {
        let commands = {
            let page = self.page.borrow();
            self.session.borrow_mut().on_prompt_tick(&*page)
        };
        self.execute(commands);
    }

    fn on_poll_tick(self: &Rc<Self>) {
        let now = self.now();
        let commands = {
            let mut page = self.page.borrow_mut();
            self.session.borrow_mut().on_poll_tick(&mut *page, now)
        };
        self.execute(commands);
    }

    fn on_gesture(self: &Rc<Self>, source: GestureSource) {
        let commands = self.session.borrow_mut().on_gesture(source, self.now());
        if commands.is_empty() {
            return;
        }
        // Remaining listeners are released once the current dispatch ends.
        let listeners = std::mem::take(&mut *self.gesture_listeners.borrow_mut());
        drop_later(listeners);
        self.execute(commands);
    }

    fn execute(self: &Rc<Self>, commands: Vec<Command>) {
        for command in commands {
            tracing::debug!(?command, "executing");
            match command {
                Command::StartPromptWatch(every) => {
                    self.arm(&self.prompt_watch, every, |runtime| runtime.on_prompt_tick());
                }
                Command::StopPromptWatch => Self::disarm(&self.prompt_watch),
                Command::ShowPrompt => {
                    if let Err(err) = self.prompt.borrow_mut().show() {
                        tracing::warn!(error = %js_error_text(&err), "failed to show prompt");
                    }
                }
                Command::HidePrompt => self.prompt.borrow_mut().hide(),
                Command::StartPolling(every) => {
                    self.arm(&self.poller, every, |runtime| runtime.on_poll_tick());
                }
                Command::StopPolling => Self::disarm(&self.poller),
                Command::Celebrate => {
                    let seed = (js_sys::Math::random() * (1u64 << 53) as f64) as u64;
                    if let Err(err) = Celebration::start(&self.window, &self.document, seed) {
                        tracing::warn!(error = %js_error_text(&err), "failed to start celebration");
                    }
                }
            }
        }
    }

    /// Start a repeating timer in `slot` unless one is already running.
    fn arm(
        self: &Rc<Self>,
        slot: &RefCell<Option<Interval>>,
        every: Duration,
        tick: fn(&Rc<Self>),
    ) {
        let mut slot = slot.borrow_mut();
        if slot.is_some() {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let millis = u32::try_from(every.as_millis()).unwrap_or(u32::MAX);
        *slot = Some(Interval::new(millis, move || {
            if let Some(runtime) = weak.upgrade() {
                tick(&runtime);
            }
        }));
    }

    /// Cancel the timer in `slot`, if any. Safe to call from the timer's own
    /// callback.
    fn disarm(slot: &RefCell<Option<Interval>>) {
        if let Some(interval) = slot.borrow_mut().take() {
            drop_later(interval.cancel());
        }
    }

    fn listen_for_gestures(self: &Rc<Self>) {
        let mut listeners = self.gesture_listeners.borrow_mut();

        for (event_type, source) in GestureSource::POINTER_EVENTS {
            let weak = Rc::downgrade(self);
            listeners.push(EventListener::once_with_options(
                &self.window,
                event_type,
                EventListenerOptions::default(),
                move |_| {
                    if let Some(runtime) = weak.upgrade() {
                        runtime.on_gesture(source);
                    }
                },
            ));
        }

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            &self.window,
            "keydown",
            EventListenerOptions::run_in_capture_phase(),
            move |event| {
                let Some(key) = event
                    .dyn_ref::<KeyboardEvent>()
                    .and_then(|e| ScrollKey::from_dom_key(&e.key()))
                else {
                    return;
                };
                if let Some(runtime) = weak.upgrade() {
                    runtime.on_gesture(GestureSource::Key(key));
                }
            },
        ));
    }
}
