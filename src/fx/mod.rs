/// Page effects and the boot sequence that mounts them.
///
/// Every effect is independent: a failed mount is logged and the rest
/// still run.

pub mod modal;
pub mod purchases;
pub mod reveal;
pub mod scroll;
pub mod viewers;

use web_sys::Document;

use crate::config::Config;
use crate::error::{Error, Result};

type Mount = fn(&Document, &Config) -> Result<()>;

/// All effects, in mount order.
pub const EFFECTS: [(&str, Mount); 5] = [
    ("viewers", viewers::mount),
    ("purchases", purchases::mount),
    ("modal", modal::mount),
    ("scroll", scroll::mount),
    ("reveal", reveal::mount),
];

/// How a single mount attempt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Mounted,
    /// Required markup isn't on this page.
    Skipped,
    Failed,
}

pub fn outcome_of(result: &Result<()>) -> MountOutcome {
    match result {
        Ok(()) => MountOutcome::Mounted,
        Err(e) if e.is_absent_markup() => MountOutcome::Skipped,
        Err(_) => MountOutcome::Failed,
    }
}

fn report(name: &str, result: Result<()>) -> MountOutcome {
    let outcome = outcome_of(&result);
    match result {
        Ok(()) => log::debug!("{name}: mounted"),
        Err(e @ Error::MissingElement(_)) => log::debug!("{name}: disabled ({e})"),
        Err(e) => log::warn!("{name}: disabled ({e})"),
    }
    outcome
}

/// Mount every effect. Returns the number that are running.
pub fn mount_all(doc: &Document, config: &Config) -> usize {
    EFFECTS
        .iter()
        .map(|(name, mount)| report(name, mount(doc, config)))
        .filter(|o| *o == MountOutcome::Mounted)
        .count()
}
