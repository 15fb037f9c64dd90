//! Exit-intent overlay state machine.
//!
//! The DOM layer turns browser events into [`ModalEvent`]s and applies the
//! returned [`ModalEffect`]. Nothing here touches the page.
//!
//! Back navigation re-arms a synthetic history entry every time it fires,
//! so the visitor can never leave with the back button while this runs.
//! That is a deliberate dark pattern carried over from the page's design.

use crate::config::ModalConfig;
use crate::dom::is_desktop_width;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Hidden,
    Active,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalEvent {
    /// Pointer left the document. `client_y` is where it was last seen.
    PointerLeft { client_y: i32, viewport_width: f64 },
    /// `popstate` fired.
    BackNavigation,
    /// The auto-show delay elapsed.
    Timer,
    /// Primary close button.
    CloseButton,
    /// Secondary close link.
    SecondaryClose,
    /// Click anywhere on the overlay. `on_backdrop` is true only when the
    /// overlay itself was the target, not something inside it.
    OverlayClick { on_backdrop: bool },
    Key(String),
}

/// What the DOM layer must do after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalEffect {
    /// New phase, if it changed.
    pub phase: Option<ModalPhase>,
    /// Push the synthetic history entry again.
    pub rearm_trap: bool,
}

#[derive(Debug, Default)]
pub struct ModalState {
    pub phase: ModalPhase,
    /// Number of Hidden → Active transitions.
    pub times_shown: u32,
    /// Number of back navigations swallowed.
    pub backs_trapped: u32,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.phase == ModalPhase::Active
    }

    fn show(&mut self) -> Option<ModalPhase> {
        if self.is_active() {
            return None;
        }
        self.phase = ModalPhase::Active;
        self.times_shown += 1;
        Some(ModalPhase::Active)
    }

    fn hide(&mut self) -> Option<ModalPhase> {
        if !self.is_active() {
            return None;
        }
        self.phase = ModalPhase::Hidden;
        Some(ModalPhase::Hidden)
    }

    pub fn handle(&mut self, event: &ModalEvent, config: &ModalConfig) -> ModalEffect {
        match event {
            ModalEvent::PointerLeft {
                client_y,
                viewport_width,
            } => {
                if is_exit_intent(*client_y, *viewport_width, config) {
                    ModalEffect {
                        phase: self.show(),
                        rearm_trap: false,
                    }
                } else {
                    ModalEffect::default()
                }
            }
            ModalEvent::BackNavigation => {
                self.backs_trapped += 1;
                ModalEffect {
                    phase: self.show(),
                    rearm_trap: config.back_trap,
                }
            }
            ModalEvent::Timer => ModalEffect {
                phase: self.show(),
                rearm_trap: false,
            },
            ModalEvent::CloseButton | ModalEvent::SecondaryClose => ModalEffect {
                phase: self.hide(),
                rearm_trap: false,
            },
            ModalEvent::OverlayClick { on_backdrop } => ModalEffect {
                phase: if *on_backdrop { self.hide() } else { None },
                rearm_trap: false,
            },
            ModalEvent::Key(key) => ModalEffect {
                phase: if key == "Escape" { self.hide() } else { None },
                rearm_trap: false,
            },
        }
    }
}

/// Pointer left through the top edge on a desktop-sized viewport.
pub fn is_exit_intent(client_y: i32, viewport_width: f64, config: &ModalConfig) -> bool {
    client_y <= config.exit_edge_px && is_desktop_width(viewport_width, config.desktop_min_width)
}
