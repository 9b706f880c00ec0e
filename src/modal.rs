//! Alert, confirm and prompt dialogs.
//!
//! A dialog is rendered from a [`ModalTemplate`] into a `.js-modal`
//! container placed first in `<body>` behind a `.js-modal-overlay`. The
//! header drags the dialog around. Exactly one of the OK/cancel callbacks
//! runs, after the dialog has been torn down, so a callback may open the
//! next dialog.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::PortalConfig;
use crate::debug::{self, cat};
use crate::dom::{new_tag, DomEvent, DomNode, Document, ElementSet, Listener};
use crate::platform::Browser;
use crate::util::drag::{parse_px, Drag};

pub const PROMPT_INPUT_ID: &str = "js-modal-prompt-input";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModalError {
    #[error("a dialog is already open")]
    AlreadyOpen,
    #[error("document has no <body>")]
    NoBody,
    #[error("could not create <{0}>")]
    CreateFailed(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalKind {
    Alert,
    Confirm,
    Prompt,
}

impl ModalKind {
    pub fn title(self) -> &'static str {
        match self {
            ModalKind::Alert => "Alert",
            ModalKind::Confirm => "Confirm",
            ModalKind::Prompt => "Prompt",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModalButton {
    Ok,
    Cancel,
}

impl ModalButton {
    pub fn label(self) -> &'static str {
        match self {
            ModalButton::Ok => "OK",
            ModalButton::Cancel => "Cancel",
        }
    }
}

/// What a dialog looks like, independent of any document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalTemplate {
    pub kind: ModalKind,
    pub title: String,
    pub body_html: String,
    /// Initial value of the prompt input; `None` renders no input.
    pub prompt: Option<String>,
    pub buttons: Vec<ModalButton>,
}

impl ModalTemplate {
    pub fn alert(message: &str) -> Self {
        ModalTemplate {
            kind: ModalKind::Alert,
            title: ModalKind::Alert.title().to_string(),
            body_html: message.to_string(),
            prompt: None,
            buttons: vec![ModalButton::Ok],
        }
    }

    pub fn confirm(message: &str) -> Self {
        ModalTemplate {
            kind: ModalKind::Confirm,
            title: ModalKind::Confirm.title().to_string(),
            body_html: message.to_string(),
            prompt: None,
            buttons: vec![ModalButton::Ok, ModalButton::Cancel],
        }
    }

    pub fn prompt(message: &str, initial: &str) -> Self {
        ModalTemplate {
            kind: ModalKind::Prompt,
            title: ModalKind::Prompt.title().to_string(),
            body_html: message.to_string(),
            prompt: Some(initial.to_string()),
            buttons: vec![ModalButton::Ok, ModalButton::Cancel],
        }
    }

    fn render<D: Document>(&self, doc: &D) -> Result<Rendered<D::Node>, ModalError> {
        let make = |tag: &'static str, attrs: &[(&str, &str)]| {
            let set = new_tag(doc, tag, attrs);
            if set.is_empty() {
                Err(ModalError::CreateFailed(tag))
            } else {
                Ok(set)
            }
        };

        let container = make("div", &[("class", "js-modal"), ("id", "js-modal-container")])?;
        let header = make(
            "div",
            &[
                ("class", "js-modal-header grabbable"),
                ("id", "js-modal-header-id"),
                ("html", self.title.as_str()),
            ],
        )?;
        let body = make("div", &[("class", "js-modal-body"), ("html", self.body_html.as_str())])?;

        let mut input = None;
        let mut form = None;
        if let Some(initial) = &self.prompt {
            let f = make("form", &[])?;
            let i = make(
                "input",
                &[("type", "text"), ("id", PROMPT_INPUT_ID), ("size", "50")],
            )?;
            i.set_value(initial);
            f.append(&i);
            body.append(&f);
            input = Some(i);
            form = Some(f);
        }

        let footer = make("div", &[("class", "js-modal-footer")])?;
        let mut buttons = Vec::with_capacity(self.buttons.len());
        for b in &self.buttons {
            let el = make("button", &[("type", "button"), ("html", b.label())])?;
            footer.append(&el);
            buttons.push((*b, el));
        }

        container.append(&header).append(&body).append(&footer);
        Ok(Rendered {
            container,
            header,
            form,
            input,
            buttons,
        })
    }
}

struct Rendered<N: DomNode> {
    container: ElementSet<N>,
    header: ElementSet<N>,
    form: Option<ElementSet<N>>,
    input: Option<ElementSet<N>>,
    buttons: Vec<(ModalButton, ElementSet<N>)>,
}

/// The dialog on screen.
pub struct OpenDialog<N: DomNode> {
    pub kind: ModalKind,
    container: ElementSet<N>,
    overlay: ElementSet<N>,
    input: Option<ElementSet<N>>,
    bound: Vec<(ElementSet<N>, Vec<Listener>)>,
    document_listeners: Vec<Listener>,
    on_ok: Box<dyn FnOnce(String)>,
    on_cancel: Box<dyn FnOnce()>,
}

pub enum ModalState<N: DomNode> {
    Closed,
    Open(OpenDialog<N>),
}

impl<N: DomNode> ModalState<N> {
    pub fn kind(&self) -> Option<ModalKind> {
        match self {
            ModalState::Closed => None,
            ModalState::Open(d) => Some(d.kind),
        }
    }
}

pub struct Modal<B: Browser> {
    browser: Rc<B>,
    state: Rc<RefCell<ModalState<B::Node>>>,
    width: f64,
    height: f64,
}

impl<B: Browser> Clone for Modal<B> {
    fn clone(&self) -> Self {
        Modal {
            browser: self.browser.clone(),
            state: self.state.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

impl<B: Browser> Modal<B> {
    pub fn new(browser: Rc<B>, config: &PortalConfig) -> Self {
        Modal {
            browser,
            state: Rc::new(RefCell::new(ModalState::Closed)),
            width: config.modal_width,
            height: config.modal_height,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.state.borrow(), ModalState::Open(_))
    }

    pub fn open_kind(&self) -> Option<ModalKind> {
        self.state.borrow().kind()
    }

    pub fn alert(&self, message: &str, on_ok: impl FnOnce() + 'static) -> Result<(), ModalError> {
        self.show(
            ModalTemplate::alert(message),
            Box::new(move |_: String| on_ok()),
            Box::new(|| {}),
        )
    }

    pub fn confirm(
        &self,
        message: &str,
        on_ok: impl FnOnce() + 'static,
        on_cancel: impl FnOnce() + 'static,
    ) -> Result<(), ModalError> {
        self.show(
            ModalTemplate::confirm(message),
            Box::new(move |_: String| on_ok()),
            Box::new(on_cancel),
        )
    }

    pub fn prompt(
        &self,
        message: &str,
        initial: &str,
        on_ok: impl FnOnce(String) + 'static,
        on_cancel: impl FnOnce() + 'static,
    ) -> Result<(), ModalError> {
        self.show(
            ModalTemplate::prompt(message, initial),
            Box::new(on_ok),
            Box::new(on_cancel),
        )
    }

    /// Open `template`. Rejected while another dialog is open.
    pub fn show(
        &self,
        template: ModalTemplate,
        on_ok: Box<dyn FnOnce(String)>,
        on_cancel: Box<dyn FnOnce()>,
    ) -> Result<(), ModalError> {
        if self.is_open() {
            log::warn!("[modal] {:?} requested while a dialog is open", template.kind);
            return Err(ModalError::AlreadyOpen);
        }
        let doc = &*self.browser;
        let body = ElementSet::from_nodes(doc.body());
        if body.is_empty() {
            return Err(ModalError::NoBody);
        }
        let r = template.render(doc)?;
        let overlay = new_tag(doc, "div", &[("class", "js-modal-overlay")]);

        body.prepend(&r.container);
        let (vw, vh) = self.browser.viewport();
        r.container
            .set_style("left", &format!("{}px", vw / 2.0 - self.width / 2.0))
            .set_style("top", &format!("{}px", vh / 2.0 - self.height / 2.0));
        body.prepend(&overlay);
        overlay.show();
        r.container.show();

        let mut bound = Vec::new();
        for (button, el) in &r.buttons {
            let me = self.clone();
            let l = match button {
                ModalButton::Ok => el.click(move |_| me.ok()),
                ModalButton::Cancel => el.click(move |_| me.cancel()),
            };
            bound.push((el.clone(), l));
        }
        if let Some(form) = &r.form {
            let me = self.clone();
            let l = form.submit(move |e| {
                e.prevent_default();
                e.stop_propagation();
                me.ok();
            });
            bound.push((form.clone(), l));
        }
        let document_listeners = self.bind_drag(&r.header, &r.container, &mut bound);

        if let Some(input) = &r.input {
            input.focus();
        }

        debug::log(cat::MODAL, format!("open {:?}", template.kind));
        *self.state.borrow_mut() = ModalState::Open(OpenDialog {
            kind: template.kind,
            container: r.container,
            overlay,
            input: r.input,
            bound,
            document_listeners,
            on_ok,
            on_cancel,
        });
        Ok(())
    }

    fn bind_drag(
        &self,
        header: &ElementSet<B::Node>,
        container: &ElementSet<B::Node>,
        bound: &mut Vec<(ElementSet<B::Node>, Vec<Listener>)>,
    ) -> Vec<Listener> {
        let drag = Rc::new(Cell::new(Drag::default()));

        let (d, c, h) = (drag.clone(), container.clone(), header.clone());
        let down = header.mousedown(move |e| {
            let origin = (parse_px(&c.style("left")), parse_px(&c.style("top")));
            let mut state = d.get();
            if state.begin(e.button(), e.page_x(), e.page_y(), origin) {
                h.set_style("position", "relative");
                d.set(state);
            }
        });
        let d = drag.clone();
        let up = header.mouseup(move |_| d.set(Drag::default()));
        let d = drag.clone();
        let dragstart = header.on("dragstart", move |e| {
            e.prevent_default();
            d.set(Drag::default());
        });
        bound.push((header.clone(), [down, up, dragstart].concat()));

        let (d, c) = (drag.clone(), container.clone());
        let moving = self.browser.listen_document(
            "mousemove",
            Rc::new(move |e: &<B::Node as DomNode>::Event| {
                if let Some((left, top)) = d.get().move_to(e.page_x(), e.page_y()) {
                    c.set_style("left", &format!("{left}px"))
                        .set_style("top", &format!("{top}px"));
                }
            }),
        );
        let d = drag;
        let released = self.browser.listen_document(
            "mouseup",
            Rc::new(move |_: &<B::Node as DomNode>::Event| d.set(Drag::default())),
        );
        vec![moving, released]
    }

    /// Confirm the open dialog. No-op when closed.
    pub fn ok(&self) {
        if let Some(dialog) = self.teardown() {
            let value = dialog.input.as_ref().map(|i| i.value()).unwrap_or_default();
            debug::log(cat::MODAL, format!("{:?} ok", dialog.kind));
            (dialog.on_ok)(value);
        }
    }

    /// Cancel the open dialog. No-op when closed.
    pub fn cancel(&self) {
        if let Some(dialog) = self.teardown() {
            debug::log(cat::MODAL, format!("{:?} cancel", dialog.kind));
            (dialog.on_cancel)();
        }
    }

    fn teardown(&self) -> Option<OpenDialog<B::Node>> {
        let state = std::mem::replace(&mut *self.state.borrow_mut(), ModalState::Closed);
        let ModalState::Open(dialog) = state else {
            return None;
        };
        for (set, listeners) in &dialog.bound {
            set.off(listeners);
        }
        for l in &dialog.document_listeners {
            self.browser.unlisten_document(*l);
        }
        dialog.container.hide().remove();
        dialog.overlay.hide().remove();
        Some(dialog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates() {
        let t = ModalTemplate::prompt("Name?", "bob");
        assert_eq!(t.title, "Prompt");
        assert_eq!(t.prompt.as_deref(), Some("bob"));
        assert_eq!(t.buttons, vec![ModalButton::Ok, ModalButton::Cancel]);
        assert_eq!(ModalTemplate::alert("x").buttons, vec![ModalButton::Ok]);
    }
}
