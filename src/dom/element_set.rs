use std::rc::Rc;

use super::{class_string, Document, DomNode, Handler, Listener};
use crate::debug::{self, cat};
use crate::fade::{Fade, FadeDirection};
use crate::platform::Scheduler;

/// Ordered selection of element handles.
///
/// Getters read the first element and return the "nothing selected" value
/// (`""`, `None`, `false`) on an empty set. Setters apply to every element
/// and return `&Self` so calls chain.
#[derive(Clone)]
pub struct ElementSet<N: DomNode> {
    nodes: Vec<N>,
}

impl<N: DomNode> Default for ElementSet<N> {
    fn default() -> Self {
        ElementSet { nodes: Vec::new() }
    }
}

impl<N: DomNode> std::fmt::Debug for ElementSet<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElementSet")
            .field("len", &self.nodes.len())
            .finish()
    }
}

/// Resolve `selector` against `doc`.
///
/// `""` selects nothing, `#id` goes through `getElementById`, anything else
/// through `querySelectorAll`.
pub fn select<D: Document>(doc: &D, selector: &str) -> ElementSet<D::Node> {
    let nodes = if selector.is_empty() {
        Vec::new()
    } else if let Some(id) = selector.strip_prefix('#').filter(|id| is_plain_id(id)) {
        doc.get_by_id(id).into_iter().collect()
    } else {
        doc.query_all(selector)
    };
    debug::log(cat::DOM, format!("select {selector:?} -> {}", nodes.len()));
    ElementSet { nodes }
}

// `#a.b` or `#a:checked` still need the full selector engine.
fn is_plain_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains(|c: char| matches!(c, '.' | '[' | ':' | ' ' | ',' | '>' | '#'))
}

/// Create a detached element with text, html and attributes applied.
pub fn new_tag<D: Document>(doc: &D, tag: &str, attrs: &[(&str, &str)]) -> ElementSet<D::Node> {
    let set = ElementSet::from_nodes(doc.create_element(tag));
    for (key, value) in attrs {
        match *key {
            "text" => {
                set.set_text(value);
            }
            "html" => {
                set.set_html(value);
            }
            _ => {
                set.set_attr(key, value);
            }
        }
    }
    set
}

impl<N: DomNode> ElementSet<N> {
    pub fn from_node(node: N) -> Self {
        ElementSet { nodes: vec![node] }
    }

    pub fn from_nodes(nodes: impl IntoIterator<Item = N>) -> Self {
        ElementSet {
            nodes: nodes.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn first(&self) -> Option<&N> {
        self.nodes.first()
    }

    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, N> {
        self.nodes.iter()
    }

    pub fn for_each(&self, f: impl FnMut(&N)) -> &Self {
        self.nodes.iter().for_each(f);
        self
    }

    pub fn map<T>(&self, f: impl FnMut(&N) -> T) -> Vec<T> {
        self.nodes.iter().map(f).collect()
    }

    /// Apply `f` to the first element only.
    pub fn map_one<T>(&self, f: impl FnOnce(&N) -> T) -> Option<T> {
        self.nodes.first().map(f)
    }

    pub fn filter(&self, mut f: impl FnMut(&N) -> bool) -> ElementSet<N> {
        ElementSet {
            nodes: self.nodes.iter().filter(|n| f(n)).cloned().collect(),
        }
    }

    // Element properties

    pub fn text(&self) -> String {
        self.map_one(|n| n.text()).unwrap_or_default()
    }

    pub fn set_text(&self, text: &str) -> &Self {
        self.for_each(|n| n.set_text(text))
    }

    pub fn html(&self) -> String {
        self.map_one(|n| n.html()).unwrap_or_default()
    }

    pub fn set_html(&self, html: &str) -> &Self {
        self.for_each(|n| n.set_html(html))
    }

    pub fn value(&self) -> String {
        self.map_one(|n| n.value()).unwrap_or_default()
    }

    pub fn set_value(&self, value: &str) -> &Self {
        self.for_each(|n| n.set_value(value))
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.map_one(|n| n.attr(name)).flatten()
    }

    pub fn set_attr(&self, name: &str, value: &str) -> &Self {
        self.for_each(|n| n.set_attr(name, value))
    }

    pub fn remove_attr(&self, name: &str) -> &Self {
        self.for_each(|n| n.remove_attr(name))
    }

    /// `dataset[key]` of the first element (`data-*` attribute fallback).
    pub fn data(&self, key: &str) -> Option<String> {
        self.map_one(|n| n.dataset(key)).flatten()
    }

    pub fn set_data(&self, key: &str, value: &str) -> &Self {
        self.for_each(|n| n.set_dataset(key, value))
    }

    pub fn checked(&self) -> bool {
        self.map_one(|n| n.checked()).unwrap_or(false)
    }

    pub fn set_checked(&self, checked: bool) -> &Self {
        self.for_each(|n| n.set_checked(checked))
    }

    pub fn disabled(&self) -> bool {
        self.map_one(|n| n.disabled()).unwrap_or(false)
    }

    pub fn set_disabled(&self, disabled: bool) -> &Self {
        self.for_each(|n| n.set_disabled(disabled))
    }

    pub fn style(&self, prop: &str) -> String {
        self.map_one(|n| n.style(prop)).unwrap_or_default()
    }

    pub fn set_style(&self, prop: &str, value: &str) -> &Self {
        self.for_each(|n| n.set_style(prop, value))
    }

    pub fn show(&self) -> &Self {
        self.set_style("display", "block")
    }

    pub fn hide(&self) -> &Self {
        self.set_style("display", "none")
    }

    pub fn focus(&self) -> &Self {
        if let Some(n) = self.first() {
            n.focus();
        }
        self
    }

    // Tree edits

    /// Append every node of `children` to the first element.
    pub fn append(&self, children: &ElementSet<N>) -> &Self {
        if let Some(parent) = self.first() {
            for c in children {
                parent.append_child(c);
            }
        }
        self
    }

    /// Insert `children` ahead of the first element's current children,
    /// keeping their order.
    pub fn prepend(&self, children: &ElementSet<N>) -> &Self {
        if let Some(parent) = self.first() {
            for c in children.nodes.iter().rev() {
                parent.prepend_child(c);
            }
        }
        self
    }

    /// Detach every element from its parent.
    pub fn remove(&self) -> &Self {
        self.for_each(|n| n.remove())
    }

    /// Parent of the first element.
    pub fn parent(&self) -> ElementSet<N> {
        ElementSet::from_nodes(self.first().and_then(|n| n.parent()))
    }

    // Class manipulation

    pub fn add_class(&self, class: &str) -> &Self {
        self.for_each(|n| {
            if n.has_class_list() {
                n.class_list_add(class);
            } else {
                let current = n.attr("class").unwrap_or_default();
                n.set_attr("class", &class_string::add(&current, class));
            }
        })
    }

    pub fn remove_class(&self, class: &str) -> &Self {
        self.for_each(|n| {
            if n.has_class_list() {
                n.class_list_remove(class);
            } else if let Some(current) = n.attr("class") {
                n.set_attr("class", &class_string::remove(&current, class));
            }
        })
    }

    /// Remove the `class` attribute entirely.
    pub fn clear_classes(&self) -> &Self {
        self.remove_attr("class")
    }

    pub fn toggle_class(&self, class: &str) -> &Self {
        self.for_each(|n| {
            if n.has_class_list() {
                n.class_list_toggle(class);
            } else {
                let current = n.attr("class").unwrap_or_default();
                n.set_attr("class", &class_string::toggle(&current, class));
            }
        })
    }

    /// Whether the first element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.map_one(|n| {
            if n.has_class_list() {
                n.class_list_contains(class)
            } else {
                class_string::contains(&n.attr("class").unwrap_or_default(), class)
            }
        })
        .unwrap_or(false)
    }

    // Events

    /// Bind `handler` to every element. Returns one listener per element.
    pub fn on(&self, event: &str, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        let handler: Handler<N> = Rc::new(handler);
        self.map(|n| n.listen(event, handler.clone()))
    }

    /// Remove listeners previously returned by [`ElementSet::on`].
    pub fn off(&self, listeners: &[Listener]) -> &Self {
        self.for_each(|n| {
            for l in listeners {
                n.unlisten(*l);
            }
        })
    }

    pub fn click(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("click", handler)
    }

    pub fn submit(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("submit", handler)
    }

    pub fn change(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("change", handler)
    }

    pub fn keyup(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("keyup", handler)
    }

    pub fn keydown(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("keydown", handler)
    }

    pub fn mousedown(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("mousedown", handler)
    }

    pub fn mouseup(&self, handler: impl Fn(&N::Event) + 'static) -> Vec<Listener> {
        self.on("mouseup", handler)
    }

    // Fading

    pub fn fade_in<S: Scheduler + 'static>(
        &self,
        sched: &Rc<S>,
        duration_ms: u32,
        on_done: impl FnOnce() + 'static,
    ) {
        Fade::start(self.clone(), FadeDirection::In, duration_ms, sched, on_done);
    }

    pub fn fade_out<S: Scheduler + 'static>(
        &self,
        sched: &Rc<S>,
        duration_ms: u32,
        on_done: impl FnOnce() + 'static,
    ) {
        Fade::start(self.clone(), FadeDirection::Out, duration_ms, sched, on_done);
    }
}

impl<'a, N: DomNode> IntoIterator for &'a ElementSet<N> {
    type Item = &'a N;
    type IntoIter = std::slice::Iter<'a, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
