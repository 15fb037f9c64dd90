//! Smooth scrolling for in-page anchors.

use web_sys::{Document, Element, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

use crate::config::{Config, ScrollConfig};
use crate::dom;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorAction {
    /// Not an in-page link; let the browser handle it.
    Passthrough,
    /// Swallow the click without scrolling.
    Ignore,
    /// Swallow the click and scroll to the element matching this selector.
    ScrollTo(String),
}

/// Decide what a click on a link with `href` should do.
pub fn classify(href: Option<&str>, cfg: &ScrollConfig) -> AnchorAction {
    match href {
        Some(h) if h.starts_with('#') => {
            if cfg.ignored_hrefs.iter().any(|ignored| ignored == h) {
                AnchorAction::Ignore
            } else {
                AnchorAction::ScrollTo(h.to_string())
            }
        }
        _ => AnchorAction::Passthrough,
    }
}

fn scroll_to(doc: &Document, selector: &str) {
    // An invalid selector (e.g. "#1st") throws in querySelector; treat as a miss.
    let Ok(Some(target)) = doc.query_selector(selector) else {
        log::debug!("scroll: no target for {selector}");
        return;
    };
    let opts = ScrollIntoViewOptions::new();
    opts.set_behavior(ScrollBehavior::Smooth);
    opts.set_block(ScrollLogicalPosition::Start);
    target.scroll_into_view_with_scroll_into_view_options(&opts);
}

fn intercept(doc: &Document, anchor: &Element, cfg: &ScrollConfig) -> Result<()> {
    let doc = doc.clone();
    let link = anchor.clone();
    let cfg = cfg.clone();
    dom::listen(anchor, "click", move |e: MouseEvent| {
        // Read at click time: markup may rewrite hrefs after load.
        let href = link.get_attribute("href");
        match classify(href.as_deref(), &cfg) {
            AnchorAction::Passthrough => {}
            AnchorAction::Ignore => e.prevent_default(),
            AnchorAction::ScrollTo(selector) => {
                e.prevent_default();
                scroll_to(&doc, &selector);
            }
        }
    })
}

pub fn mount(doc: &Document, config: &Config) -> Result<()> {
    let cfg = &config.scroll;
    let anchors = dom::query_all(doc, &cfg.anchor_selector)?;
    for anchor in &anchors {
        intercept(doc, anchor, cfg)?;
    }
    log::debug!("scroll: {} anchors", anchors.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ScrollConfig {
        ScrollConfig::default()
    }

    #[test]
    fn bare_hash_is_ignored() {
        assert_eq!(classify(Some("#"), &cfg()), AnchorAction::Ignore);
    }

    #[test]
    fn close_popup_is_ignored() {
        assert_eq!(classify(Some("#close-popup"), &cfg()), AnchorAction::Ignore);
    }

    #[test]
    fn fragment_scrolls() {
        assert_eq!(
            classify(Some("#pricing"), &cfg()),
            AnchorAction::ScrollTo("#pricing".into())
        );
    }

    #[test]
    fn external_link_passes_through() {
        assert_eq!(
            classify(Some("https://example.com/#x"), &cfg()),
            AnchorAction::Passthrough
        );
        assert_eq!(classify(Some("/checkout"), &cfg()), AnchorAction::Passthrough);
    }

    #[test]
    fn missing_href_passes_through() {
        assert_eq!(classify(None, &cfg()), AnchorAction::Passthrough);
    }

    #[test]
    fn ignore_list_is_configurable() {
        let mut c = cfg();
        c.ignored_hrefs.push("#top".into());
        assert_eq!(classify(Some("#top"), &c), AnchorAction::Ignore);
        c.ignored_hrefs.clear();
        assert_eq!(classify(Some("#"), &c), AnchorAction::ScrollTo("#".into()));
    }

    #[test]
    fn ignore_match_is_exact() {
        assert_eq!(
            classify(Some("#close-popup-2"), &cfg()),
            AnchorAction::ScrollTo("#close-popup-2".into())
        );
    }
}
