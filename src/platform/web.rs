//! Browser host backed by web-sys.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Element, EventTarget, HtmlButtonElement, HtmlElement, HtmlInputElement, HtmlSelectElement,
    HtmlTextAreaElement, KeyboardEvent, MouseEvent, Node, XmlHttpRequest,
};

use crate::ajax::{PreparedRequest, Response, Transport};
use crate::dom::{DomEvent, DomNode, Document, Handler, Listener};
use crate::platform::{Navigator, Scheduler, TimerId};

type JsListener = Closure<dyn FnMut(web_sys::Event)>;

thread_local! {
    // Registered listeners keep their closures alive until removed.
    static LISTENERS: RefCell<HashMap<Listener, (EventTarget, String, JsListener)>> =
        RefCell::new(HashMap::new());
}

fn add_listener(target: &EventTarget, event: &str, handler: Handler<HtmlElement>) -> Listener {
    let id = Listener::next();
    let closure: JsListener = Closure::wrap(Box::new(move |ev: web_sys::Event| {
        handler(&WebEvent(ev));
    }) as Box<dyn FnMut(web_sys::Event)>);
    if let Err(e) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("[web] addEventListener({event}) failed: {e:?}");
    }
    LISTENERS.with(|m| {
        m.borrow_mut()
            .insert(id, (target.clone(), event.to_string(), closure));
    });
    id
}

fn remove_listener(listener: Listener) {
    let entry = LISTENERS.with(|m| m.borrow_mut().remove(&listener));
    if let Some((target, event, closure)) = entry {
        let _ = target.remove_event_listener_with_callback(&event, closure.as_ref().unchecked_ref());
    }
}

/// A DOM event as seen by handlers.
#[derive(Clone, Debug)]
pub struct WebEvent(pub web_sys::Event);

impl DomEvent for WebEvent {
    type Node = HtmlElement;

    fn kind(&self) -> String {
        self.0.type_()
    }

    fn target(&self) -> Option<HtmlElement> {
        self.0.target().and_then(|t| t.dyn_into::<HtmlElement>().ok())
    }

    fn key(&self) -> Option<String> {
        self.0.dyn_ref::<KeyboardEvent>().map(|k| k.key())
    }

    fn button(&self) -> i16 {
        self.0.dyn_ref::<MouseEvent>().map(|m| m.button()).unwrap_or(-1)
    }

    fn page_x(&self) -> f64 {
        self.0
            .dyn_ref::<MouseEvent>()
            .map(|m| f64::from(m.page_x()))
            .unwrap_or(0.0)
    }

    fn page_y(&self) -> f64 {
        self.0
            .dyn_ref::<MouseEvent>()
            .map(|m| f64::from(m.page_y()))
            .unwrap_or(0.0)
    }

    fn prevent_default(&self) {
        self.0.prevent_default();
    }

    fn stop_propagation(&self) {
        self.0.stop_propagation();
    }
}

impl DomNode for HtmlElement {
    type Event = WebEvent;

    fn tag_name(&self) -> String {
        Element::tag_name(self).to_ascii_lowercase()
    }

    fn same_node(&self, other: &Self) -> bool {
        Node::is_same_node(self, Some(other.unchecked_ref::<Node>()))
    }

    fn text(&self) -> String {
        self.text_content().unwrap_or_default()
    }

    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn html(&self) -> String {
        self.inner_html()
    }

    fn set_html(&self, html: &str) {
        self.set_inner_html(html);
    }

    fn value(&self) -> String {
        if let Some(i) = self.dyn_ref::<HtmlInputElement>() {
            i.value()
        } else if let Some(s) = self.dyn_ref::<HtmlSelectElement>() {
            s.value()
        } else if let Some(t) = self.dyn_ref::<HtmlTextAreaElement>() {
            t.value()
        } else {
            String::new()
        }
    }

    fn set_value(&self, value: &str) {
        if let Some(i) = self.dyn_ref::<HtmlInputElement>() {
            i.set_value(value);
        } else if let Some(s) = self.dyn_ref::<HtmlSelectElement>() {
            s.set_value(value);
        } else if let Some(t) = self.dyn_ref::<HtmlTextAreaElement>() {
            t.set_value(value);
        }
    }

    fn checked(&self) -> bool {
        self.dyn_ref::<HtmlInputElement>()
            .map(|i| i.checked())
            .unwrap_or(false)
    }

    fn set_checked(&self, checked: bool) {
        if let Some(i) = self.dyn_ref::<HtmlInputElement>() {
            i.set_checked(checked);
        }
    }

    fn disabled(&self) -> bool {
        if let Some(i) = self.dyn_ref::<HtmlInputElement>() {
            i.disabled()
        } else if let Some(b) = self.dyn_ref::<HtmlButtonElement>() {
            b.disabled()
        } else if let Some(s) = self.dyn_ref::<HtmlSelectElement>() {
            s.disabled()
        } else if let Some(t) = self.dyn_ref::<HtmlTextAreaElement>() {
            t.disabled()
        } else {
            self.has_attribute("disabled")
        }
    }

    fn set_disabled(&self, disabled: bool) {
        if let Some(i) = self.dyn_ref::<HtmlInputElement>() {
            i.set_disabled(disabled);
        } else if let Some(b) = self.dyn_ref::<HtmlButtonElement>() {
            b.set_disabled(disabled);
        } else if let Some(s) = self.dyn_ref::<HtmlSelectElement>() {
            s.set_disabled(disabled);
        } else if let Some(t) = self.dyn_ref::<HtmlTextAreaElement>() {
            t.set_disabled(disabled);
        } else if disabled {
            let _ = self.set_attribute("disabled", "");
        } else {
            let _ = self.remove_attribute("disabled");
        }
    }

    fn focus(&self) {
        let _ = HtmlElement::focus(self);
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_attr(&self, name: &str, value: &str) {
        if let Err(e) = self.set_attribute(name, value) {
            log::warn!("[web] setAttribute({name}) failed: {e:?}");
        }
    }

    fn remove_attr(&self, name: &str) {
        let _ = self.remove_attribute(name);
    }

    fn style(&self, prop: &str) -> String {
        HtmlElement::style(self)
            .get_property_value(prop)
            .unwrap_or_default()
    }

    fn set_style(&self, prop: &str, value: &str) {
        let style = HtmlElement::style(self);
        let res = if value.is_empty() {
            style.remove_property(prop).map(|_| ())
        } else {
            style.set_property(prop, value)
        };
        if let Err(e) = res {
            log::warn!("[web] style {prop} failed: {e:?}");
        }
    }

    fn has_class_list(&self) -> bool {
        true
    }

    fn class_list_add(&self, class: &str) {
        let _ = self.class_list().add_1(class);
    }

    fn class_list_remove(&self, class: &str) {
        let _ = self.class_list().remove_1(class);
    }

    fn class_list_toggle(&self, class: &str) {
        let _ = self.class_list().toggle(class);
    }

    fn class_list_contains(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn dataset(&self, key: &str) -> Option<String> {
        HtmlElement::dataset(self).get(key)
    }

    fn set_dataset(&self, key: &str, value: &str) {
        let _ = HtmlElement::dataset(self).set(key, value);
    }

    fn append_child(&self, child: &Self) {
        let _ = Node::append_child(self, child);
    }

    fn prepend_child(&self, child: &Self) {
        let first = self.first_child();
        let _ = Node::insert_before(self, child, first.as_ref());
    }

    fn remove(&self) {
        Element::remove(self);
    }

    fn parent(&self) -> Option<Self> {
        self.parent_element()
            .and_then(|p| p.dyn_into::<HtmlElement>().ok())
    }

    fn listen(&self, event: &str, handler: Handler<Self>) -> Listener {
        add_listener(self, event, handler)
    }

    fn unlisten(&self, listener: Listener) {
        remove_listener(listener);
    }
}

/// The live page: `window`, `document` and XHR.
pub struct WebBrowser {
    window: web_sys::Window,
    document: web_sys::Document,
    frame_fallback_ms: u32,
}

impl WebBrowser {
    /// `None` outside a window context (workers).
    pub fn new(frame_fallback_ms: u32) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(WebBrowser {
            window,
            document,
            frame_fallback_ms,
        })
    }

    /// `data-page` on `<body>`, if the server set one.
    pub fn page_hint(&self) -> Option<String> {
        self.document.body()?.get_attribute("data-page")
    }

    pub fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }
}

impl Document for WebBrowser {
    type Node = HtmlElement;

    fn get_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
    }

    fn query_all(&self, selector: &str) -> Vec<HtmlElement> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("[web] bad selector {selector:?}: {e:?}");
                return Vec::new();
            }
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|n| n.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn create_element(&self, tag: &str) -> Option<HtmlElement> {
        self.document
            .create_element(tag)
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()
    }

    fn body(&self) -> Option<HtmlElement> {
        self.document.body()
    }

    fn listen_document(&self, event: &str, handler: Handler<HtmlElement>) -> Listener {
        add_listener(&self.document, event, handler)
    }

    fn unlisten_document(&self, listener: Listener) {
        remove_listener(listener);
    }
}

impl Scheduler for WebBrowser {
    fn now_ms(&self) -> f64 {
        self.window
            .performance()
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        let slot = Rc::new(RefCell::new(Some(callback)));
        let s = slot.clone();
        let js = Closure::once_into_js(move |ts: f64| {
            if let Some(cb) = s.borrow_mut().take() {
                cb(ts);
            }
        });
        if self.window.request_animation_frame(js.unchecked_ref()).is_err() {
            // No rAF (hidden iframes, old engines): fall back to a timer.
            let now = self.now_ms() + f64::from(self.frame_fallback_ms);
            gloo_timers::callback::Timeout::new(self.frame_fallback_ms, move || {
                if let Some(cb) = slot.borrow_mut().take() {
                    cb(now);
                }
            })
            .forget();
        }
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let js = Closure::once_into_js(move || callback());
        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(js.unchecked_ref(), delay)
        {
            Ok(id) => TimerId(id),
            Err(e) => {
                log::warn!("[web] setTimeout failed: {e:?}");
                TimerId(0)
            }
        }
    }

    fn clear_timeout(&self, id: TimerId) {
        self.window.clear_timeout_with_handle(id.0);
    }
}

impl Navigator for WebBrowser {
    fn navigate(&self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            log::error!("[web] navigation to {url} failed: {e:?}");
        }
    }

    fn reload(&self) {
        let _ = self.window.location().reload();
    }

    fn scroll_to_top(&self) {
        self.window.scroll_to_with_x_and_y(0.0, 0.0);
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn location_hash(&self) -> String {
        self.window
            .location()
            .hash()
            .unwrap_or_default()
            .trim_start_matches('#')
            .to_string()
    }

    fn viewport(&self) -> (f64, f64) {
        let w = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let h = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (w, h)
    }
}

impl Transport for WebBrowser {
    fn send(&self, request: PreparedRequest, done: Box<dyn FnOnce(Response)>) {
        let slot = Rc::new(RefCell::new(Some(done)));
        let fail = |slot: &Rc<RefCell<Option<Box<dyn FnOnce(Response)>>>>, e: JsValue| {
            log::warn!("[web] xhr failed to start: {e:?}");
            if let Some(done) = slot.borrow_mut().take() {
                done(Response::new(0, ""));
            }
        };

        let xhr = match XmlHttpRequest::new() {
            Ok(x) => x,
            Err(e) => return fail(&slot, e),
        };
        if let Err(e) = xhr.open_with_async(request.method.as_str(), &request.url, true) {
            return fail(&slot, e);
        }
        for (name, value) in &request.headers {
            if let Err(e) = xhr.set_request_header(name, value) {
                log::warn!("[web] header {name} rejected: {e:?}");
            }
        }

        let x = xhr.clone();
        let s = slot.clone();
        let on_end = Closure::once_into_js(move || {
            let status = x.status().unwrap_or(0);
            let body = x.response_text().ok().flatten().unwrap_or_default();
            if let Some(done) = s.borrow_mut().take() {
                done(Response::new(status, body));
            }
        });
        xhr.set_onloadend(Some(on_end.unchecked_ref()));

        if let Err(e) = xhr.send_with_opt_str(request.body.as_deref()) {
            xhr.set_onloadend(None);
            fail(&slot, e);
        }
    }
}
