//! Runtime configuration.
//!
//! Every knob has a default matching the stock landing page. A page may
//! override any subset by embedding
//!
//! ```html
//! <script type="application/json" id="landing-fx-config">
//!   { "viewers": { "max": 950 }, "modal": { "auto_show_after_ms": null } }
//! </script>
//! ```
//!
//! A config that fails to parse or validate is dropped in favour of the
//! defaults (with a warning). It never disables the page.

use log::LevelFilter;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::schedule::DelayRange;

/// Element id of the inline JSON block.
pub const CONFIG_ELEMENT_ID: &str = "landing-fx-config";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `off`, `error`, `warn`, `info`, `debug` or `trace`.
    pub log_level: String,
    /// Used in the startup notice.
    pub page_name: String,
    pub viewers: ViewerConfig,
    pub purchases: PurchaseConfig,
    pub modal: ModalConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            page_name: "Landing".into(),
            viewers: ViewerConfig::default(),
            purchases: PurchaseConfig::default(),
            modal: ModalConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
        }
    }
}

/// "Viewers online" random walk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub element_id: String,
    /// Seed is `floor(seed_base + r * seed_spread)`.
    pub seed_base: i32,
    pub seed_spread: i32,
    /// Hard clamp.
    pub min: i32,
    pub max: i32,
    /// Per-tick step is uniform in `-step..=step`.
    pub step: i32,
    /// Below this, add an upward nudge in `1..=nudge_up_max`.
    pub low_water: i32,
    pub nudge_up_max: i32,
    /// Above this, add a downward nudge in `1..=nudge_down_max`.
    pub high_water: i32,
    pub nudge_down_max: i32,
    pub first_tick_ms: u32,
    pub delay: DelayRange,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            element_id: "viewerCount".into(),
            seed_base: 720,
            seed_spread: 120,
            min: 702,
            max: 880,
            step: 3,
            low_water: 730,
            nudge_up_max: 3,
            high_water: 860,
            nudge_down_max: 4,
            first_tick_ms: 1200,
            delay: DelayRange::new(2000, 4000),
        }
    }
}

/// "Recent purchases" counter.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PurchaseConfig {
    pub count_id: String,
    pub wrapper_id: String,
    pub shake_class: String,
    pub min: i32,
    pub max: i32,
    pub min_change: i32,
    pub max_change: i32,
    /// Number of updates that use `fast_delay`.
    pub fast_updates: u32,
    pub fast_delay: DelayRange,
    pub normal_delay: DelayRange,
    pub first_tick_ms: u32,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            count_id: "cf-viewer-count".into(),
            wrapper_id: "cf-wrapper-box".into(),
            shake_class: "shaking".into(),
            min: 9,
            max: 22,
            min_change: 1,
            max_change: 4,
            fast_updates: 5,
            fast_delay: DelayRange::new(500, 1500),
            normal_delay: DelayRange::new(3000, 7000),
            first_tick_ms: 1500,
        }
    }
}

/// Exit-intent / back-button overlay.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModalConfig {
    pub modal_id: String,
    pub close_id: String,
    pub secondary_close_id: String,
    pub active_class: String,
    /// Pointer must leave at or above this `clientY`.
    pub exit_edge_px: i32,
    /// Viewports narrower than this never get the exit-intent trigger.
    pub desktop_min_width: f64,
    /// Intercept back navigation with a synthetic history entry.
    pub back_trap: bool,
    /// `None` disables the timed show.
    pub auto_show_after_ms: Option<u32>,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            modal_id: "modalPopup".into(),
            close_id: "closeModal".into(),
            secondary_close_id: "closePopupBtn".into(),
            active_class: "active".into(),
            exit_edge_px: 5,
            desktop_min_width: 771.0,
            back_trap: true,
            auto_show_after_ms: Some(5000),
        }
    }
}

/// In-page anchor smooth scrolling.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub anchor_selector: String,
    /// Hrefs whose default jump is suppressed without scrolling.
    pub ignored_hrefs: Vec<String>,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            anchor_selector: "a[href^=\"#\"]".into(),
            ignored_hrefs: vec!["#".into(), "#close-popup".into()],
        }
    }
}

/// Fade-in on scroll.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub selector: String,
    /// Fraction of the element that must be visible, `0.0..=1.0`.
    pub threshold: f64,
    pub root_margin: String,
    /// Initial downward offset.
    pub offset_px: u32,
    pub duration_s: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            selector: ".section-cta, .section-product".into(),
            threshold: 0.1,
            root_margin: "0px 0px -100px 0px".into(),
            offset_px: 20,
            duration_s: 0.6,
        }
    }
}

impl Config {
    /// Parse and validate a JSON override block.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would break a counter's range invariant.
    /// Range arithmetic is done in i64 so extreme i32 inputs are rejected
    /// rather than overflowing.
    pub fn validate(&self) -> Result<()> {
        let v = &self.viewers;
        check(v.min <= v.max, "viewers.min > viewers.max")?;
        check(v.seed_spread >= 1, "viewers.seed_spread must be >= 1")?;
        let seed_top = i64::from(v.seed_base) + i64::from(v.seed_spread) - 1;
        check(
            v.seed_base >= v.min && seed_top <= i64::from(v.max),
            "viewers seed range lies outside min..=max",
        )?;
        check(v.step >= 0, "viewers.step must be >= 0")?;
        check(
            v.nudge_up_max >= 1 && v.nudge_down_max >= 1,
            "viewers nudges must be >= 1",
        )?;
        check(v.delay.is_valid(), "viewers.delay min_ms > max_ms")?;

        let p = &self.purchases;
        check(p.min <= p.max, "purchases.min > purchases.max")?;
        check(
            p.min_change >= 1 && p.min_change <= p.max_change,
            "purchases change range must satisfy 1 <= min_change <= max_change",
        )?;
        // Guarantees that one of the two directions always stays in range.
        check(
            i64::from(p.max) - i64::from(p.min) >= 2 * i64::from(p.max_change),
            "purchases range must be at least twice max_change wide",
        )?;
        check(
            p.fast_delay.is_valid() && p.normal_delay.is_valid(),
            "purchases delay min_ms > max_ms",
        )?;

        check(
            (0.0..=1.0).contains(&self.reveal.threshold),
            "reveal.threshold must be within 0..=1",
        )?;
        check(self.reveal.duration_s >= 0.0, "reveal.duration_s must be >= 0")?;
        Ok(())
    }

    /// Parsed `log_level`, falling back to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

fn check(ok: bool, msg: &str) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(Error::ConfigInvalid(msg.to_string()))
    }
}

/// Read the inline config block from the page, if any.
///
/// Missing block → defaults, silently. Broken block → defaults plus a
/// warning.
pub fn load(doc: &web_sys::Document) -> Config {
    let Some(raw) = doc
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    else {
        return Config::default();
    };
    match Config::from_json(&raw) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("ignoring #{CONFIG_ELEMENT_ID}: {e}");
            Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn empty_object_gives_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_section_keeps_other_fields() {
        let c = Config::from_json(r#"{ "viewers": { "max": 950 } }"#).unwrap();
        assert_eq!(c.viewers.max, 950);
        assert_eq!(c.viewers.min, 702);
        assert_eq!(c.viewers.element_id, "viewerCount");
        assert_eq!(c.purchases, PurchaseConfig::default());
    }

    #[test]
    fn null_disables_auto_show() {
        let c = Config::from_json(r#"{ "modal": { "auto_show_after_ms": null } }"#).unwrap();
        assert_eq!(c.modal.auto_show_after_ms, None);
        assert!(c.modal.back_trap);
    }

    #[test]
    fn delay_range_parses() {
        let c = Config::from_json(
            r#"{ "purchases": { "fast_delay": { "min_ms": 100, "max_ms": 200 } } }"#,
        )
        .unwrap();
        assert_eq!(c.purchases.fast_delay, DelayRange::new(100, 200));
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = Config::from_json("{ viewers: ").unwrap_err();
        assert!(matches!(err, Error::ConfigParse(_)));
    }

    #[test]
    fn inverted_viewer_range_rejected() {
        let err = Config::from_json(r#"{ "viewers": { "min": 900, "max": 800 } }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn seed_outside_clamp_rejected() {
        let err = Config::from_json(r#"{ "viewers": { "seed_base": 10 } }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn narrow_purchase_range_rejected() {
        // 9..=15 is only 6 wide, max_change 4 needs 8.
        let err = Config::from_json(r#"{ "purchases": { "max": 15 } }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn inverted_delay_rejected() {
        let err = Config::from_json(
            r#"{ "purchases": { "normal_delay": { "min_ms": 9000, "max_ms": 10 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn threshold_out_of_range_rejected() {
        let err = Config::from_json(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn seed_range_past_i32_max_rejected() {
        let err = Config::from_json(
            r#"{ "viewers": { "seed_base": 2147483600, "min": 0, "max": 2147483647 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));
    }

    #[test]
    fn seed_range_ending_at_i32_max_accepted() {
        let c = Config::from_json(
            r#"{ "viewers": { "seed_base": 2147483527, "seed_spread": 120, "min": 0, "max": 2147483647 } }"#,
        );
        assert!(c.is_ok());
    }

    #[test]
    fn extreme_purchase_bounds_rejected_without_overflow() {
        // 2 * max_change would overflow i32.
        let err = Config::from_json(
            r#"{ "purchases": { "min": -1000, "max": 1000, "max_change": 2147483647 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid(_)));

        // Full i32 width is exactly wide enough.
        let c = Config::from_json(
            r#"{ "purchases": { "min": -2147483648, "max": 2147483647, "max_change": 2147483647 } }"#,
        );
        assert!(c.is_ok());
    }

    #[test]
    fn huge_viewer_step_validates_and_ticks() {
        use crate::fx::viewers::logic::ViewerCounter;
        use crate::rng::Lcg;

        let c = Config::from_json(r#"{ "viewers": { "step": 1500000000 } }"#).unwrap();
        let mut counter = ViewerCounter::new(c.viewers, Lcg::new(9));
        for _ in 0..100 {
            assert!((702..=880).contains(&counter.tick()));
        }
    }

    #[test]
    fn level_filter_parsing() {
        let mut c = Config::default();
        assert_eq!(c.level_filter(), LevelFilter::Info);
        c.log_level = "DEBUG".into();
        assert_eq!(c.level_filter(), LevelFilter::Debug);
        c.log_level = "loud".into();
        assert_eq!(c.level_filter(), LevelFilter::Info);
    }
}
