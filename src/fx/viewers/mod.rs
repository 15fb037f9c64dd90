/// "Viewers online" counter.

pub mod logic;

use web_sys::{Document, Element};

use crate::config::Config;
use crate::dom;
use crate::error::Result;
use crate::rng::MathRandom;
use crate::schedule;

use logic::ViewerCounter;

fn render(el: &Element, value: i32) {
    el.set_text_content(Some(&value.to_string()));
}

pub fn mount(doc: &Document, config: &Config) -> Result<()> {
    let cfg = &config.viewers;
    let el = dom::element_by_id(doc, &cfg.element_id)?;

    // The walk state is owned by the timer closure and nothing else.
    let mut counter = ViewerCounter::new(cfg.clone(), MathRandom);
    render(&el, counter.value());

    schedule::repeat(cfg.first_tick_ms, move || {
        let value = counter.tick();
        render(&el, value);
        counter.next_delay()
    });
    Ok(())
}
