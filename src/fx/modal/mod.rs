/// Exit-intent / back-button overlay.

pub mod logic;

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsValue;
use web_sys::{Document, Element, History, KeyboardEvent, MouseEvent, PopStateEvent, Window};

use crate::config::{Config, ModalConfig};
use crate::dom;
use crate::error::Result;
use crate::schedule;

use logic::{ModalEvent, ModalPhase, ModalState};

/// `history.state` of the synthetic entry.
const TRAP_STATE: &str = "landing-fx:exit-intent";

struct Modal {
    overlay: Element,
    config: ModalConfig,
    state: ModalState,
    history: Option<History>,
}

impl Modal {
    fn dispatch(&mut self, event: ModalEvent) {
        let effect = self.state.handle(&event, &self.config);
        if let Some(phase) = effect.phase {
            let classes = self.overlay.class_list();
            let res = match phase {
                ModalPhase::Active => classes.add_1(&self.config.active_class),
                ModalPhase::Hidden => classes.remove_1(&self.config.active_class),
            };
            if let Err(e) = res {
                log::warn!("modal: class toggle failed: {e:?}");
            }
            log::debug!(
                "modal: {phase:?} after {event:?} (shown {}x, {} backs trapped)",
                self.state.times_shown,
                self.state.backs_trapped
            );
        }
        if effect.rearm_trap {
            self.push_trap();
        }
    }

    fn push_trap(&self) {
        let Some(history) = &self.history else {
            return;
        };
        if let Err(e) = history.push_state_with_url(&JsValue::from_str(TRAP_STATE), "", None) {
            log::warn!("modal: pushState failed: {e:?}");
        }
    }
}

type Shared = Rc<RefCell<Modal>>;

pub fn mount(doc: &Document, config: &Config) -> Result<()> {
    let cfg = &config.modal;
    let window = dom::window()?;
    let overlay = dom::element_by_id(doc, &cfg.modal_id)?;

    let history = if cfg.back_trap {
        Some(window.history()?)
    } else {
        None
    };
    let modal: Shared = Rc::new(RefCell::new(Modal {
        overlay: overlay.clone(),
        config: cfg.clone(),
        state: ModalState::new(),
        history,
    }));

    listen_exit_intent(doc, &window, &modal)?;
    listen_close_controls(doc, &overlay, cfg, &modal)?;

    if cfg.back_trap {
        log::info!("modal: back-button trap armed; every back navigation re-arms it");
        modal.borrow().push_trap();
        let m = modal.clone();
        dom::listen(&window, "popstate", move |_: PopStateEvent| {
            m.borrow_mut().dispatch(ModalEvent::BackNavigation);
        })?;
    }

    if let Some(delay) = cfg.auto_show_after_ms {
        let m = modal.clone();
        schedule::once(delay, move || m.borrow_mut().dispatch(ModalEvent::Timer));
    }
    Ok(())
}

fn listen_exit_intent(doc: &Document, window: &Window, modal: &Shared) -> Result<()> {
    let m = modal.clone();
    let window = window.clone();
    dom::listen(doc, "mouseout", move |e: MouseEvent| {
        // Only a pointer leaving the document has no related target.
        if e.related_target().is_some() {
            return;
        }
        let Some(viewport_width) = dom::viewport_width(&window) else {
            return;
        };
        m.borrow_mut().dispatch(ModalEvent::PointerLeft {
            client_y: e.client_y(),
            viewport_width,
        });
    })
}

fn listen_close_controls(
    doc: &Document,
    overlay: &Element,
    cfg: &ModalConfig,
    modal: &Shared,
) -> Result<()> {
    if let Some(button) = dom::optional_element(doc, &cfg.close_id) {
        let m = modal.clone();
        dom::listen(&button, "click", move |_: MouseEvent| {
            m.borrow_mut().dispatch(ModalEvent::CloseButton);
        })?;
    }

    if let Some(link) = dom::optional_element(doc, &cfg.secondary_close_id) {
        let m = modal.clone();
        dom::listen(&link, "click", move |e: MouseEvent| {
            e.prevent_default();
            m.borrow_mut().dispatch(ModalEvent::SecondaryClose);
        })?;
    }

    {
        let m = modal.clone();
        let backdrop = overlay.clone();
        dom::listen(overlay, "click", move |e: MouseEvent| {
            let on_backdrop = e
                .target()
                .is_some_and(|target| dom::same_object(&target, &backdrop));
            m.borrow_mut()
                .dispatch(ModalEvent::OverlayClick { on_backdrop });
        })?;
    }

    let m = modal.clone();
    dom::listen(doc, "keydown", move |e: KeyboardEvent| {
        m.borrow_mut().dispatch(ModalEvent::Key(e.key()));
    })
}
