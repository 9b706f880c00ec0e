//! The page's flash-message region (`#flashDiv` / `#flash-text`).
//!
//! One message at a time. A new message while one is showing fades the old
//! one out first; further messages arriving during that fade only replace
//! the one waiting to be shown.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::PortalConfig;
use crate::debug::{self, cat};
use crate::dom::{select, ElementSet};
use crate::platform::{Browser, TimerId};

pub const FLASH_DIV: &str = "#flashDiv";
pub const FLASH_TEXT: &str = "#flash-text";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashKind {
    Success,
    Failure,
}

impl FlashKind {
    /// `"success"` is the only success spelling; everything else fails.
    pub fn parse(s: &str) -> FlashKind {
        if s == "success" {
            FlashKind::Success
        } else {
            FlashKind::Failure
        }
    }

    pub fn class(self) -> &'static str {
        match self {
            FlashKind::Success => "flash-success",
            FlashKind::Failure => "flash-failure",
        }
    }
}

#[derive(Debug)]
enum FlashState {
    Idle,
    Visible { timer: TimerId },
    /// Fading out; `next` is shown once the fade completes.
    Replacing { next: Option<(String, FlashKind)> },
}

pub struct Flash<B: Browser> {
    browser: Rc<B>,
    state: Rc<RefCell<FlashState>>,
    display_ms: u32,
    fade_ms: u32,
}

impl<B: Browser> Clone for Flash<B> {
    fn clone(&self) -> Self {
        Flash {
            browser: self.browser.clone(),
            state: self.state.clone(),
            display_ms: self.display_ms,
            fade_ms: self.fade_ms,
        }
    }
}

impl<B: Browser> Flash<B> {
    pub fn new(browser: Rc<B>, config: &PortalConfig) -> Self {
        Flash {
            browser,
            state: Rc::new(RefCell::new(FlashState::Idle)),
            display_ms: config.flash_display_ms,
            fade_ms: config.flash_fade_ms,
        }
    }

    fn region(&self) -> ElementSet<B::Node> {
        select(&*self.browser, FLASH_DIV)
    }

    /// Whether a message is on screen or about to be.
    pub fn is_active(&self) -> bool {
        !matches!(*self.state.borrow(), FlashState::Idle)
    }

    pub fn show(&self, text: &str, kind: FlashKind) {
        let current = std::mem::replace(&mut *self.state.borrow_mut(), FlashState::Idle);
        match current {
            FlashState::Idle => self.display(text.to_string(), kind),
            FlashState::Visible { timer } => {
                debug::log(cat::FLASH, "replacing visible message");
                self.browser.clear_timeout(timer);
                *self.state.borrow_mut() = FlashState::Replacing {
                    next: Some((text.to_string(), kind)),
                };
                self.fade_out();
            }
            FlashState::Replacing { .. } => {
                *self.state.borrow_mut() = FlashState::Replacing {
                    next: Some((text.to_string(), kind)),
                };
            }
        }
    }

    pub fn success(&self, text: &str) {
        self.show(text, FlashKind::Success);
    }

    pub fn failure(&self, text: &str) {
        self.show(text, FlashKind::Failure);
    }

    /// Fade out whatever is showing and drop anything pending.
    pub fn clear(&self) {
        let current = std::mem::replace(&mut *self.state.borrow_mut(), FlashState::Idle);
        match current {
            FlashState::Idle => {}
            FlashState::Visible { timer } => {
                self.browser.clear_timeout(timer);
                *self.state.borrow_mut() = FlashState::Replacing { next: None };
                self.fade_out();
            }
            FlashState::Replacing { .. } => {
                *self.state.borrow_mut() = FlashState::Replacing { next: None };
            }
        }
    }

    /// Show a message the server rendered into `#flash-text`, with its kind
    /// from `data-flashtype`.
    pub fn show_server_rendered(&self) {
        let text = select(&*self.browser, FLASH_TEXT);
        if text.is_empty() {
            return;
        }
        let html = text.html();
        if html.trim().is_empty() {
            return;
        }
        let kind = FlashKind::parse(&text.data("flashtype").unwrap_or_default());
        self.show(&html, kind);
    }

    fn display(&self, text: String, kind: FlashKind) {
        debug::log(cat::FLASH, format!("show {kind:?}: {text}"));
        select(&*self.browser, FLASH_TEXT).set_html(&text);
        let region = self.region();
        region.add_class(kind.class());
        region.fade_in(&self.browser, self.fade_ms, || {});

        let me = self.clone();
        let timer = self
            .browser
            .set_timeout(self.display_ms, Box::new(move || me.expire()));
        *self.state.borrow_mut() = FlashState::Visible { timer };
    }

    fn expire(&self) {
        let visible = matches!(*self.state.borrow(), FlashState::Visible { .. });
        if visible {
            *self.state.borrow_mut() = FlashState::Replacing { next: None };
            self.fade_out();
        }
    }

    fn fade_out(&self) {
        let me = self.clone();
        self.region().fade_out(&self.browser, self.fade_ms, move || {
            let region = me.region();
            region.remove_class(FlashKind::Success.class());
            region.remove_class(FlashKind::Failure.class());
            select(&*me.browser, FLASH_TEXT).set_html("");
            let current = std::mem::replace(&mut *me.state.borrow_mut(), FlashState::Idle);
            match current {
                FlashState::Replacing { next: Some((text, kind)) } => me.display(text, kind),
                FlashState::Replacing { next: None } => {
                    debug::log(cat::FLASH, "cleared");
                }
                other => {
                    *me.state.borrow_mut() = other;
                }
            }
        });
    }
}
