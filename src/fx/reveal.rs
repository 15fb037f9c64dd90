//! Fade sections in as they scroll into view.
//!
//! Each element starts transparent and shifted down. The first time the
//! observer reports it intersecting, it is made opaque and put back in
//! place. It never hides again. The observer keeps watching afterwards;
//! further callbacks for a shown element are no-ops.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit,
};

use crate::config::{Config, RevealConfig};
use crate::dom;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    #[default]
    Hidden,
    Shown,
}

impl RevealState {
    /// Feed one observer report. Returns true when the element should be
    /// switched to its shown style now.
    pub fn observe(&mut self, is_intersecting: bool) -> bool {
        match (*self, is_intersecting) {
            (RevealState::Hidden, true) => {
                *self = RevealState::Shown;
                true
            }
            _ => false,
        }
    }
}

/// Inline style applied before observation starts.
pub fn hidden_style(cfg: &RevealConfig) -> Vec<(&'static str, String)> {
    vec![
        ("opacity", "0".to_string()),
        ("transform", format!("translateY({}px)", cfg.offset_px)),
        (
            "transition",
            format!(
                "opacity {d}s ease, transform {d}s ease",
                d = cfg.duration_s
            ),
        ),
    ]
}

/// Inline style applied on first intersection.
pub fn shown_style() -> Vec<(&'static str, String)> {
    vec![
        ("opacity", "1".to_string()),
        ("transform", "translateY(0)".to_string()),
    ]
}

fn apply(el: &HtmlElement, style: &[(&'static str, String)]) -> Result<()> {
    let css = el.style();
    for (prop, value) in style {
        css.set_property(prop, value)?;
    }
    Ok(())
}

struct Tracked {
    element: HtmlElement,
    state: RevealState,
}

fn on_entries(tracked: &mut [Tracked], entries: js_sys::Array) {
    for entry in entries.iter() {
        let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
            continue;
        };
        let target = entry.target();
        let Some(item) = tracked
            .iter_mut()
            .find(|t| dom::same_object(&t.element, &target))
        else {
            continue;
        };
        if item.state.observe(entry.is_intersecting()) {
            if let Err(e) = apply(&item.element, &shown_style()) {
                log::warn!("reveal: {e}");
            }
        }
    }
}

/// Mount sequence with the DOM abstracted out.
///
/// Non-HTML candidates (`None`) are skipped one by one. The observer is
/// created before anything is hidden, so a host without
/// IntersectionObserver leaves every section visible. A section whose
/// hiding fails is left alone and the rest carry on. Returns how many
/// sections were hidden and observed.
pub fn stage<T, O>(
    candidates: Vec<Option<T>>,
    selector: &str,
    create_observer: impl FnOnce(&[T]) -> Result<O>,
    mut hide_and_observe: impl FnMut(&O, &T) -> Result<()>,
) -> Result<usize> {
    let items: Vec<T> = candidates.into_iter().flatten().collect();
    if items.is_empty() {
        return Err(Error::MissingElement(selector.to_string()));
    }
    let observer = create_observer(&items)?;
    let mut hidden = 0;
    for item in &items {
        match hide_and_observe(&observer, item) {
            Ok(()) => hidden += 1,
            Err(e) => log::warn!("reveal: skipping section: {e}"),
        }
    }
    Ok(hidden)
}

fn create_observer(
    sections: &[HtmlElement],
    cfg: &RevealConfig,
) -> Result<IntersectionObserver> {
    let mut tracked: Vec<Tracked> = sections
        .iter()
        .map(|el| Tracked {
            element: el.clone(),
            state: RevealState::Hidden,
        })
        .collect();
    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, _observer: IntersectionObserver| {
            on_entries(&mut tracked, entries);
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(cfg.threshold));
    init.set_root_margin(&cfg.root_margin);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    // Only leaked once the observer actually holds it.
    callback.forget();
    Ok(observer)
}

fn hide_and_observe(
    observer: &IntersectionObserver,
    el: &HtmlElement,
    cfg: &RevealConfig,
) -> Result<()> {
    if let Err(e) = apply(el, &hidden_style(cfg)) {
        // Undo a partial hide so the section is never stuck invisible.
        let _ = apply(el, &shown_style());
        return Err(e);
    }
    observer.observe(el);
    Ok(())
}

pub fn mount(doc: &Document, config: &Config) -> Result<()> {
    let cfg = &config.reveal;
    let candidates: Vec<Option<HtmlElement>> = dom::query_all(doc, &cfg.selector)?
        .into_iter()
        .map(|el: Element| {
            let html = el.dyn_into::<HtmlElement>().ok();
            if html.is_none() {
                log::debug!("reveal: skipping non-HTML element");
            }
            html
        })
        .collect();

    let observed = stage(
        candidates,
        &cfg.selector,
        |sections| create_observer(sections, cfg),
        |observer, el| hide_and_observe(observer, el, cfg),
    )?;
    log::debug!("reveal: observing {observed} sections");
    Ok(())
}
