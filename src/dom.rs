//! Thin helpers over `web_sys` shared by every component.
//!
//! Lookups return [`Error::MissingElement`] instead of `None` so `mount`
//! functions can bail out with `?`. Listeners are leaked with
//! `Closure::forget`: they live as long as the page.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, HtmlElement, Window};

use crate::error::{Error, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(Error::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(Error::NoDocument)
}

/// `getElementById`, failing with the missing id.
pub fn element_by_id(doc: &Document, id: &str) -> Result<Element> {
    doc.get_element_by_id(id)
        .ok_or_else(|| Error::MissingElement(format!("#{id}")))
}

/// Same as [`element_by_id`] but absence is not an error.
pub fn optional_element(doc: &Document, id: &str) -> Option<Element> {
    doc.get_element_by_id(id)
}

/// Every element matching `selector`, in document order.
pub fn query_all(doc: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = doc.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

pub fn as_html(el: &Element) -> Result<&HtmlElement> {
    el.dyn_ref::<HtmlElement>()
        .ok_or_else(|| Error::Js(format!("<{}> is not an HTMLElement", el.tag_name())))
}

/// Attach `handler` for `event` on `target`. Events of an unexpected
/// concrete type are ignored.
pub fn listen<E, F>(target: &EventTarget, event: &str, mut handler: F) -> Result<()>
where
    E: JsCast + 'static,
    F: FnMut(E) + 'static,
{
    let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |ev: web_sys::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    });
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// JS identity (`===`) between two wrapped objects.
pub fn same_object<A, B>(a: &A, b: &B) -> bool
where
    A: AsRef<JsValue>,
    B: AsRef<JsValue>,
{
    let a: &JsValue = a.as_ref();
    let b: &JsValue = b.as_ref();
    a == b
}

/// Viewport width in CSS pixels, or `None` if the host refuses.
pub fn viewport_width(window: &Window) -> Option<f64> {
    window.inner_width().ok()?.as_f64()
}

/// Whether `width` (CSS px) is wide enough to count as a desktop layout.
pub fn is_desktop_width(width: f64, desktop_min_width: f64) -> bool {
    width >= desktop_min_width
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desktop_boundary() {
        assert!(!is_desktop_width(770.0, 771.0));
        assert!(is_desktop_width(771.0, 771.0));
        assert!(is_desktop_width(1920.0, 771.0));
    }

    #[test]
    fn phone_width_is_not_desktop() {
        assert!(!is_desktop_width(375.0, 771.0));
    }
}
