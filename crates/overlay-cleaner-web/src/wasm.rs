#![forbid(unsafe_code)]

//! `#[wasm_bindgen]` entry points.

use std::cell::RefCell;
use std::rc::Rc;

use overlay_cleaner_core::Config;
use wasm_bindgen::prelude::*;

use crate::runtime::Runtime;

thread_local! {
    static RUNTIME: RefCell<Option<Rc<Runtime>>> = const { RefCell::new(None) };
}

fn console_error(msg: &str) {
    web_sys::console::error_1(&JsValue::from_str(msg));
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = match info.location() {
                Some(loc) => format!(
                    "overlay-cleaner panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                ),
                None => format!("overlay-cleaner panic: {info}"),
            };
            console_error(&msg);
        }));
    });
}

/// Content-script entry point, run once when the module is instantiated.
// Test builds share the page with the test runner and do not self-start.
#[cfg_attr(not(test), wasm_bindgen(start))]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();
    crate::logging::init();

    let already_running = RUNTIME.with(|slot| slot.borrow().is_some());
    if already_running {
        tracing::debug!("runtime already installed");
        return Ok(());
    }

    let runtime = Runtime::install(Config::default())?;
    RUNTIME.with(|slot| *slot.borrow_mut() = Some(runtime));
    Ok(())
}

/// JSON snapshot of the current session, for debugging from the console.
#[wasm_bindgen(js_name = overlayCleanerStatus)]
pub fn status() -> Result<String, JsValue> {
    let status = RUNTIME
        .with(|slot| slot.borrow().as_ref().map(|runtime| runtime.status()))
        .ok_or_else(|| JsValue::from_str("overlay cleaner is not running"))?;
    serde_json::to_string(&status).map_err(|err| JsValue::from_str(&err.to_string()))
}
