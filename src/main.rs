mod config;
mod dom;
mod error;
mod fx;
mod rng;
mod schedule;

use log::Level;
use wasm_bindgen::JsValue;
use web_sys::{Document, Event};

fn boot(doc: &Document) {
    let config = config::load(doc);
    log::set_max_level(config.level_filter());

    let running = fx::mount_all(doc, &config);
    log::info!("{} page loaded", config.page_name);
    log::debug!("{running}/{} effects running", fx::EFFECTS.len());
}

/// `document.readyState`, read reflectively.
fn ready_state(doc: &Document) -> Option<String> {
    js_sys::Reflect::get(doc, &JsValue::from_str("readyState"))
        .ok()?
        .as_string()
}

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(Level::Info) {
        // No logger to go through, so write straight to the console.
        web_sys::console::warn_1(&JsValue::from_str(&format!(
            "landing-fx: logger unavailable: {e}"
        )));
    }

    let doc = match dom::document() {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("landing-fx: {e}");
            return;
        }
    };

    if ready_state(&doc).as_deref() == Some("loading") {
        let target = doc.clone();
        let listened = dom::listen(&doc, "DOMContentLoaded", move |_: Event| boot(&target));
        if let Err(e) = listened {
            log::warn!("landing-fx: {e}");
        }
    } else {
        boot(&doc);
    }
}
