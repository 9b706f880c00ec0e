//! In-memory document for headless runs and tests.
//!
//! Markup is stored, not parsed: `set_html` keeps the string as the node's
//! content and drops its children. Events bubble from the target up through
//! its ancestors unless a handler stops propagation.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::selector::{Inspect, SelectorList};
use super::{class_string, Document, DomEvent, DomNode, Handler, Listener};

#[derive(Default)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    content: String,
    children: Vec<MemNode>,
    parent: Option<Weak<RefCell<NodeData>>>,
    value: String,
    checked: bool,
    disabled: bool,
    focused: bool,
    styles: Vec<(String, String)>,
    listeners: Vec<(Listener, String, Handler<MemNode>)>,
    native_classes: bool,
}

/// Handle to one in-memory element.
#[derive(Clone)]
pub struct MemNode(Rc<RefCell<NodeData>>);

impl std::fmt::Debug for MemNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let d = self.0.borrow();
        f.debug_struct("MemNode")
            .field("tag", &d.tag)
            .field("attrs", &d.attrs)
            .finish()
    }
}

impl MemNode {
    pub fn new(tag: &str) -> MemNode {
        MemNode(Rc::new(RefCell::new(NodeData {
            tag: tag.to_ascii_lowercase(),
            native_classes: true,
            ..NodeData::default()
        })))
    }

    // Builders for page fixtures

    pub fn with_attr(self, name: &str, value: &str) -> MemNode {
        self.set_attr(name, value);
        self
    }

    pub fn with_id(self, id: &str) -> MemNode {
        self.with_attr("id", id)
    }

    pub fn with_name(self, name: &str) -> MemNode {
        self.with_attr("name", name)
    }

    pub fn with_class(self, class: &str) -> MemNode {
        self.with_attr("class", class)
    }

    pub fn with_text(self, text: &str) -> MemNode {
        self.set_text(text);
        self
    }

    pub fn with_value(self, value: &str) -> MemNode {
        self.set_value(value);
        self
    }

    pub fn with_checked(self, checked: bool) -> MemNode {
        self.set_checked(checked);
        self
    }

    pub fn with_child(self, child: MemNode) -> MemNode {
        self.append_child(&child);
        self
    }

    /// Pretend this node predates `classList`, forcing the string fallback.
    pub fn without_class_list(self) -> MemNode {
        self.0.borrow_mut().native_classes = false;
        self
    }

    pub fn children(&self) -> Vec<MemNode> {
        self.0.borrow().children.clone()
    }

    pub fn is_focused(&self) -> bool {
        self.0.borrow().focused
    }

    pub fn listener_count(&self) -> usize {
        self.0.borrow().listeners.len()
    }

    /// Depth-first walk over this node and its descendants.
    pub fn walk(&self, f: &mut impl FnMut(&MemNode)) {
        f(self);
        for child in self.children() {
            child.walk(f);
        }
    }

    // Event simulation

    /// Deliver `event` to this node's listeners, then bubble to ancestors.
    pub fn dispatch(&self, event: &MemEvent) {
        let mut current = Some(self.clone());
        while let Some(node) = current {
            let handlers: Vec<Handler<MemNode>> = node
                .0
                .borrow()
                .listeners
                .iter()
                .filter(|(_, kind, _)| *kind == event.kind)
                .map(|(_, _, h)| h.clone())
                .collect();
            for h in handlers {
                h(event);
            }
            if event.propagation_stopped.get() {
                break;
            }
            current = node.parent();
        }
    }

    pub fn click(&self) -> MemEvent {
        self.fire(MemEvent::new("click", self).with_button(0))
    }

    pub fn submit(&self) -> MemEvent {
        self.fire(MemEvent::new("submit", self))
    }

    pub fn change(&self) -> MemEvent {
        self.fire(MemEvent::new("change", self))
    }

    /// Set the value the way typing would, then fire `change`.
    pub fn input(&self, value: &str) -> MemEvent {
        self.set_value(value);
        self.change()
    }

    pub fn key_up(&self, key: &str) -> MemEvent {
        self.fire(MemEvent::new("keyup", self).with_key(key))
    }

    pub fn mouse_down(&self, button: i16, x: f64, y: f64) -> MemEvent {
        self.fire(
            MemEvent::new("mousedown", self)
                .with_button(button)
                .at(x, y),
        )
    }

    pub fn mouse_up(&self, x: f64, y: f64) -> MemEvent {
        self.fire(MemEvent::new("mouseup", self).with_button(0).at(x, y))
    }

    pub fn mouse_move(&self, x: f64, y: f64) -> MemEvent {
        self.fire(MemEvent::new("mousemove", self).at(x, y))
    }

    fn fire(&self, event: MemEvent) -> MemEvent {
        self.dispatch(&event);
        event
    }

    fn detach_from_parent(&self) {
        let parent = self.parent();
        if let Some(p) = parent {
            p.0.borrow_mut().children.retain(|c| !c.same_node(self));
        }
        self.0.borrow_mut().parent = None;
    }

    fn style_value(&self, prop: &str) -> Option<String> {
        self.0
            .borrow()
            .styles
            .iter()
            .find(|(k, _)| k == prop)
            .map(|(_, v)| v.clone())
    }
}

impl Inspect for MemNode {
    fn tag(&self) -> String {
        self.0.borrow().tag.clone()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.attr(name)
    }

    fn has_class_token(&self, class: &str) -> bool {
        class_string::contains(&self.attr("class").unwrap_or_default(), class)
    }

    fn is_checked(&self) -> bool {
        self.0.borrow().checked
    }

    fn is_disabled(&self) -> bool {
        self.0.borrow().disabled
    }
}

impl DomNode for MemNode {
    type Event = MemEvent;

    fn tag_name(&self) -> String {
        self.0.borrow().tag.to_ascii_uppercase()
    }

    fn same_node(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn text(&self) -> String {
        let d = self.0.borrow();
        if d.children.is_empty() {
            d.content.clone()
        } else {
            d.children.iter().map(|c| c.text()).collect()
        }
    }

    fn set_text(&self, text: &str) {
        let children = self.children();
        for c in children {
            c.0.borrow_mut().parent = None;
        }
        let mut d = self.0.borrow_mut();
        d.children.clear();
        d.content = text.to_string();
    }

    fn html(&self) -> String {
        let d = self.0.borrow();
        if d.children.is_empty() {
            return d.content.clone();
        }
        d.children.iter().map(outer_html).collect()
    }

    fn set_html(&self, html: &str) {
        self.set_text(html);
    }

    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn set_value(&self, value: &str) {
        self.0.borrow_mut().value = value.to_string();
    }

    fn checked(&self) -> bool {
        self.0.borrow().checked
    }

    fn set_checked(&self, checked: bool) {
        self.0.borrow_mut().checked = checked;
    }

    fn disabled(&self) -> bool {
        self.0.borrow().disabled
    }

    fn set_disabled(&self, disabled: bool) {
        self.0.borrow_mut().disabled = disabled;
    }

    fn focus(&self) {
        self.0.borrow_mut().focused = true;
    }

    fn attr(&self, name: &str) -> Option<String> {
        self.0
            .borrow()
            .attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }

    fn set_attr(&self, name: &str, value: &str) {
        let mut d = self.0.borrow_mut();
        match d.attrs.iter_mut().find(|(k, _)| k == name) {
            Some(slot) => slot.1 = value.to_string(),
            None => d.attrs.push((name.to_string(), value.to_string())),
        }
    }

    fn remove_attr(&self, name: &str) {
        self.0.borrow_mut().attrs.retain(|(k, _)| k != name);
    }

    fn style(&self, prop: &str) -> String {
        self.style_value(prop).unwrap_or_default()
    }

    fn set_style(&self, prop: &str, value: &str) {
        let mut d = self.0.borrow_mut();
        if value.is_empty() {
            d.styles.retain(|(k, _)| k != prop);
            return;
        }
        match d.styles.iter_mut().find(|(k, _)| k == prop) {
            Some(slot) => slot.1 = value.to_string(),
            None => d.styles.push((prop.to_string(), value.to_string())),
        }
    }

    fn has_class_list(&self) -> bool {
        self.0.borrow().native_classes
    }

    fn class_list_add(&self, class: &str) {
        let current = self.attr("class").unwrap_or_default();
        self.set_attr("class", &class_string::add(&current, class));
    }

    fn class_list_remove(&self, class: &str) {
        if let Some(current) = self.attr("class") {
            self.set_attr("class", &class_string::remove(&current, class));
        }
    }

    fn class_list_toggle(&self, class: &str) {
        let current = self.attr("class").unwrap_or_default();
        self.set_attr("class", &class_string::toggle(&current, class));
    }

    fn class_list_contains(&self, class: &str) -> bool {
        self.has_class_token(class)
    }

    fn append_child(&self, child: &Self) {
        child.detach_from_parent();
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        let mut d = self.0.borrow_mut();
        d.content.clear();
        d.children.push(child.clone());
    }

    fn prepend_child(&self, child: &Self) {
        child.detach_from_parent();
        child.0.borrow_mut().parent = Some(Rc::downgrade(&self.0));
        let mut d = self.0.borrow_mut();
        d.content.clear();
        d.children.insert(0, child.clone());
    }

    fn remove(&self) {
        self.detach_from_parent();
    }

    fn parent(&self) -> Option<Self> {
        self.0
            .borrow()
            .parent
            .as_ref()
            .and_then(|w| w.upgrade())
            .map(MemNode)
    }

    fn listen(&self, event: &str, handler: Handler<Self>) -> Listener {
        let id = Listener::next();
        self.0
            .borrow_mut()
            .listeners
            .push((id, event.to_string(), handler));
        id
    }

    fn unlisten(&self, listener: Listener) {
        self.0
            .borrow_mut()
            .listeners
            .retain(|(id, _, _)| *id != listener);
    }
}

fn outer_html(node: &MemNode) -> String {
    let d = node.0.borrow();
    let attrs: String = d
        .attrs
        .iter()
        .map(|(k, v)| format!(" {k}=\"{v}\""))
        .collect();
    let inner = if d.children.is_empty() {
        d.content.clone()
    } else {
        d.children.iter().map(outer_html).collect()
    };
    format!("<{tag}{attrs}>{inner}</{tag}>", tag = d.tag)
}

/// Simulated event.
#[derive(Clone, Debug)]
pub struct MemEvent {
    pub kind: String,
    pub target: Option<MemNode>,
    pub key: Option<String>,
    pub button: i16,
    pub page_x: f64,
    pub page_y: f64,
    pub default_prevented: Rc<Cell<bool>>,
    pub propagation_stopped: Rc<Cell<bool>>,
}

impl MemEvent {
    pub fn new(kind: &str, target: &MemNode) -> MemEvent {
        MemEvent {
            kind: kind.to_string(),
            target: Some(target.clone()),
            key: None,
            button: -1,
            page_x: 0.0,
            page_y: 0.0,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    /// An event with no element target (document-level mouse moves).
    pub fn detached(kind: &str) -> MemEvent {
        MemEvent {
            kind: kind.to_string(),
            target: None,
            key: None,
            button: -1,
            page_x: 0.0,
            page_y: 0.0,
            default_prevented: Rc::new(Cell::new(false)),
            propagation_stopped: Rc::new(Cell::new(false)),
        }
    }

    pub fn with_key(mut self, key: &str) -> MemEvent {
        self.key = Some(key.to_string());
        self
    }

    pub fn with_button(mut self, button: i16) -> MemEvent {
        self.button = button;
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> MemEvent {
        self.page_x = x;
        self.page_y = y;
        self
    }

    pub fn was_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl DomEvent for MemEvent {
    type Node = MemNode;

    fn kind(&self) -> String {
        self.kind.clone()
    }

    fn target(&self) -> Option<MemNode> {
        self.target.clone()
    }

    fn key(&self) -> Option<String> {
        self.key.clone()
    }

    fn button(&self) -> i16 {
        self.button
    }

    fn page_x(&self) -> f64 {
        self.page_x
    }

    fn page_y(&self) -> f64 {
        self.page_y
    }

    fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    fn stop_propagation(&self) {
        self.propagation_stopped.set(true);
    }
}

/// `<html><body>...</body></html>` plus document-level listeners.
pub struct MemDocument {
    root: MemNode,
    body: MemNode,
    listeners: RefCell<Vec<(Listener, String, Handler<MemNode>)>>,
}

impl Default for MemDocument {
    fn default() -> Self {
        let body = MemNode::new("body");
        let root = MemNode::new("html").with_child(body.clone());
        MemDocument {
            root,
            body,
            listeners: RefCell::new(Vec::new()),
        }
    }
}

impl MemDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body_node(&self) -> &MemNode {
        &self.body
    }

    /// Append fixture nodes to `<body>`.
    pub fn mount(&self, nodes: impl IntoIterator<Item = MemNode>) {
        for n in nodes {
            self.body.append_child(&n);
        }
    }

    /// First element matching `selector`; panics-free lookup for tests.
    pub fn find(&self, selector: &str) -> Option<MemNode> {
        self.query_all(selector).into_iter().next()
    }

    /// Deliver `event` to document-level listeners.
    pub fn dispatch_document(&self, event: &MemEvent) {
        let handlers: Vec<Handler<MemNode>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, h)| h.clone())
            .collect();
        for h in handlers {
            h(event);
        }
    }

    pub fn document_listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl Document for MemDocument {
    type Node = MemNode;

    fn get_by_id(&self, id: &str) -> Option<MemNode> {
        let mut found = None;
        self.root.walk(&mut |n| {
            if found.is_none() && n.attr("id").as_deref() == Some(id) {
                found = Some(n.clone());
            }
        });
        found
    }

    fn query_all(&self, selector: &str) -> Vec<MemNode> {
        let list = match SelectorList::parse(selector) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("[dom] unsupported selector {selector:?}: {e}");
                return Vec::new();
            }
        };
        let mut out = Vec::new();
        self.root.walk(&mut |n| {
            if list.matches(n) {
                out.push(n.clone());
            }
        });
        out
    }

    fn create_element(&self, tag: &str) -> Option<MemNode> {
        Some(MemNode::new(tag))
    }

    fn body(&self) -> Option<MemNode> {
        Some(self.body.clone())
    }

    fn listen_document(&self, event: &str, handler: Handler<MemNode>) -> Listener {
        let id = Listener::next();
        self.listeners
            .borrow_mut()
            .push((id, event.to_string(), handler));
        id
    }

    fn unlisten_document(&self, listener: Listener) {
        self.listeners.borrow_mut().retain(|(id, _, _)| *id != listener);
    }
}
