//! Headless host: in-memory document, virtual clock, scripted transport.
//!
//! Nothing runs on its own. Frames and timers fire only from [`advance`],
//! and requests complete only when [`respond`] is called, so tests drive
//! every asynchronous edge explicitly.
//!
//! [`advance`]: HeadlessBrowser::advance
//! [`respond`]: HeadlessBrowser::respond

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::ajax::{PreparedRequest, Response, Transport};
use crate::dom::mem::{MemDocument, MemEvent, MemNode};
use crate::dom::{Document, Handler, Listener};
use crate::platform::{Navigator, Scheduler, TimerId};

/// Frame interval used when advancing the virtual clock.
pub const FRAME_MS: f64 = 16.0;

type Frame = Box<dyn FnOnce(f64)>;
type Timer = (TimerId, f64, Box<dyn FnOnce()>);
type Pending = (PreparedRequest, Box<dyn FnOnce(Response)>);

pub struct HeadlessBrowser {
    doc: MemDocument,
    clock: Cell<f64>,
    frames: RefCell<Vec<Frame>>,
    timers: RefCell<Vec<Timer>>,
    next_timer: Cell<i32>,
    pending: RefCell<VecDeque<Pending>>,
    requests: RefCell<Vec<PreparedRequest>>,
    navigations: RefCell<Vec<String>>,
    reloads: Cell<u32>,
    scrolls: Cell<u32>,
    viewport: Cell<(f64, f64)>,
    path: RefCell<String>,
    hash: RefCell<String>,
}

impl Default for HeadlessBrowser {
    fn default() -> Self {
        HeadlessBrowser {
            doc: MemDocument::new(),
            clock: Cell::new(0.0),
            frames: RefCell::new(Vec::new()),
            timers: RefCell::new(Vec::new()),
            next_timer: Cell::new(1),
            pending: RefCell::new(VecDeque::new()),
            requests: RefCell::new(Vec::new()),
            navigations: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
            scrolls: Cell::new(0),
            viewport: Cell::new((1280.0, 800.0)),
            path: RefCell::new("/".to_string()),
            hash: RefCell::new(String::new()),
        }
    }
}

impl HeadlessBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn document(&self) -> &MemDocument {
        &self.doc
    }

    /// Append fixture nodes to `<body>`.
    pub fn mount(&self, nodes: impl IntoIterator<Item = MemNode>) {
        self.doc.mount(nodes);
    }

    pub fn find(&self, selector: &str) -> Option<MemNode> {
        self.doc.find(selector)
    }

    pub fn set_viewport(&self, width: f64, height: f64) {
        self.viewport.set((width, height));
    }

    pub fn set_location(&self, path: &str, hash: &str) {
        *self.path.borrow_mut() = path.to_string();
        *self.hash.borrow_mut() = hash.trim_start_matches('#').to_string();
    }

    /// Move the clock forward in frame-sized steps, running animation
    /// frames each step and any timers that came due.
    pub fn advance(&self, ms: u32) {
        let target = self.clock.get() + f64::from(ms);
        loop {
            let now = self.clock.get();
            if now >= target {
                break;
            }
            self.clock.set((now + FRAME_MS).min(target));
            self.run_frames();
            self.run_due_timers();
        }
        // Work scheduled for "right now" still runs on a zero advance.
        if ms == 0 {
            self.run_due_timers();
        }
    }

    fn run_frames(&self) {
        let frames: Vec<Frame> = std::mem::take(&mut *self.frames.borrow_mut());
        let now = self.clock.get();
        for f in frames {
            f(now);
        }
    }

    fn run_due_timers(&self) {
        loop {
            let now = self.clock.get();
            let next = {
                let mut timers = self.timers.borrow_mut();
                let idx = timers
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, due, _))| *due <= now)
                    .min_by(|a, b| a.1 .1.total_cmp(&b.1 .1))
                    .map(|(i, _)| i);
                idx.map(|i| timers.remove(i))
            };
            match next {
                Some((_, _, cb)) => cb(),
                None => break,
            }
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Complete the oldest outstanding request. Returns `false` when none
    /// is outstanding.
    pub fn respond(&self, status: u16, body: &str) -> bool {
        let next = self.pending.borrow_mut().pop_front();
        match next {
            Some((_, done)) => {
                done(Response::new(status, body));
                true
            }
            None => false,
        }
    }

    /// Fail the oldest outstanding request without a response.
    pub fn fail(&self) -> bool {
        self.respond(0, "")
    }

    pub fn pending_requests(&self) -> Vec<PreparedRequest> {
        self.pending.borrow().iter().map(|(r, _)| r.clone()).collect()
    }

    /// Every request sent so far, completed or not.
    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<PreparedRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.borrow().clone()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads.get()
    }

    pub fn scrolls(&self) -> u32 {
        self.scrolls.get()
    }

    /// Deliver a document-level mouse move at `(x, y)`.
    pub fn mouse_move(&self, x: f64, y: f64) {
        self.doc.dispatch_document(&MemEvent::detached("mousemove").at(x, y));
    }

    /// Deliver a document-level mouse up at `(x, y)`.
    pub fn mouse_up(&self, x: f64, y: f64) {
        self.doc.dispatch_document(&MemEvent::detached("mouseup").at(x, y));
    }

    pub fn dispatch_document(&self, event: &MemEvent) {
        self.doc.dispatch_document(event);
    }
}

impl Document for HeadlessBrowser {
    type Node = MemNode;

    fn get_by_id(&self, id: &str) -> Option<MemNode> {
        self.doc.get_by_id(id)
    }

    fn query_all(&self, selector: &str) -> Vec<MemNode> {
        self.doc.query_all(selector)
    }

    fn create_element(&self, tag: &str) -> Option<MemNode> {
        self.doc.create_element(tag)
    }

    fn body(&self) -> Option<MemNode> {
        self.doc.body()
    }

    fn listen_document(&self, event: &str, handler: Handler<MemNode>) -> Listener {
        self.doc.listen_document(event, handler)
    }

    fn unlisten_document(&self, listener: Listener) {
        self.doc.unlisten_document(listener)
    }
}

impl Scheduler for HeadlessBrowser {
    fn now_ms(&self) -> f64 {
        self.clock.get()
    }

    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>) {
        self.frames.borrow_mut().push(callback);
    }

    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = TimerId(self.next_timer.get());
        self.next_timer.set(id.0 + 1);
        let due = self.clock.get() + f64::from(delay_ms);
        self.timers.borrow_mut().push((id, due, callback));
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.timers.borrow_mut().retain(|(t, _, _)| *t != id);
    }
}

impl Navigator for HeadlessBrowser {
    fn navigate(&self, url: &str) {
        log::debug!("[headless] navigate {url}");
        self.navigations.borrow_mut().push(url.to_string());
    }

    fn reload(&self) {
        self.reloads.set(self.reloads.get() + 1);
    }

    fn scroll_to_top(&self) {
        self.scrolls.set(self.scrolls.get() + 1);
    }

    fn location_path(&self) -> String {
        self.path.borrow().clone()
    }

    fn location_hash(&self) -> String {
        self.hash.borrow().clone()
    }

    fn viewport(&self) -> (f64, f64) {
        self.viewport.get()
    }
}

impl Transport for HeadlessBrowser {
    fn send(&self, request: PreparedRequest, done: Box<dyn FnOnce(Response)>) {
        self.requests.borrow_mut().push(request.clone());
        self.pending.borrow_mut().push_back((request, done));
    }
}
