/// "Recent purchases" counter with a shake pulse on every change.

pub mod logic;

use web_sys::{Document, Element, HtmlElement};

use crate::config::Config;
use crate::dom;
use crate::error::Result;
use crate::rng::MathRandom;
use crate::schedule;

use logic::PurchaseCounter;

/// Restart the CSS animation bound to `class`, even if it is already set.
fn shake(wrapper: &HtmlElement, class: &str) -> Result<()> {
    let classes = wrapper.class_list();
    classes.remove_1(class)?;
    // Reading layout flushes the removal before the class comes back.
    let _ = wrapper.offset_width();
    classes.add_1(class)?;
    Ok(())
}

fn render(count: &Element, value: i32) {
    count.set_text_content(Some(&value.to_string()));
}

pub fn mount(doc: &Document, config: &Config) -> Result<()> {
    let cfg = &config.purchases;
    let count = dom::element_by_id(doc, &cfg.count_id)?;
    let wrapper = dom::as_html(&dom::element_by_id(doc, &cfg.wrapper_id)?)?.clone();

    let mut counter = PurchaseCounter::new(cfg.clone(), MathRandom);
    render(&count, counter.value());

    let shake_class = cfg.shake_class.clone();
    schedule::repeat(cfg.first_tick_ms, move || {
        let update = counter.tick();
        render(&count, update.value);
        if let Err(e) = shake(&wrapper, &shake_class) {
            log::debug!("purchases: shake failed: {e}");
        }
        update.next_delay_ms
    });
    Ok(())
}
