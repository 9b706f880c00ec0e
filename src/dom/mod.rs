//! DOM abstraction
//!
//! The page scripts talk to the document through three small traits:
//!
//! - [`DomNode`]: one element handle (text, attributes, styles, form
//!   properties, tree edits, listeners)
//! - [`DomEvent`]: what a handler can read from an event
//! - [`Document`]: selection, element creation and document-level listeners
//!
//! [`ElementSet`] is the chainable wrapper the controllers use. The browser
//! implementation lives in `platform::web`; [`mem`] is an in-memory document
//! used headless and in tests.

use std::cell::Cell;
use std::rc::Rc;

pub mod class_string;
pub mod element_set;
pub mod mem;
pub mod selector;

pub use element_set::{new_tag, select, ElementSet};

/// Identifies one registered listener so it can be removed later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Listener(pub u64);

thread_local! {
    static NEXT_LISTENER: Cell<u64> = const { Cell::new(1) };
}

impl Listener {
    pub fn next() -> Listener {
        NEXT_LISTENER.with(|n| {
            let id = n.get();
            n.set(id + 1);
            Listener(id)
        })
    }
}

/// Event callback. Shared so one handler can be bound to many elements.
pub type Handler<N> = Rc<dyn Fn(&<N as DomNode>::Event)>;

/// Read side of a dispatched event.
pub trait DomEvent {
    type Node;

    fn kind(&self) -> String;
    /// Element the event was dispatched to, if it is an element.
    fn target(&self) -> Option<Self::Node>;
    /// `KeyboardEvent.key` for keyboard events.
    fn key(&self) -> Option<String>;
    /// `MouseEvent.button` (0 = primary); -1 for non-mouse events.
    fn button(&self) -> i16;
    fn page_x(&self) -> f64;
    fn page_y(&self) -> f64;
    fn prevent_default(&self);
    fn stop_propagation(&self);
}

/// One element handle. Cloning clones the handle, not the element.
pub trait DomNode: Clone + 'static {
    type Event: DomEvent<Node = Self>;

    fn tag_name(&self) -> String;
    fn same_node(&self, other: &Self) -> bool;

    fn text(&self) -> String;
    fn set_text(&self, text: &str);
    fn html(&self) -> String;
    fn set_html(&self, html: &str);

    /// Current value of a form control; empty for other elements.
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
    fn checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
    fn disabled(&self) -> bool;
    fn set_disabled(&self, disabled: bool);
    fn focus(&self);

    fn attr(&self, name: &str) -> Option<String>;
    fn set_attr(&self, name: &str, value: &str);
    fn remove_attr(&self, name: &str);

    /// Inline style property (`"display"`, `"max-height"`); empty when unset.
    fn style(&self, prop: &str) -> String;
    fn set_style(&self, prop: &str, value: &str);

    /// Whether the node exposes a native class list. When it does not,
    /// class edits fall back to rewriting the `class` attribute.
    fn has_class_list(&self) -> bool {
        false
    }
    fn class_list_add(&self, _class: &str) {}
    fn class_list_remove(&self, _class: &str) {}
    fn class_list_toggle(&self, _class: &str) {}
    fn class_list_contains(&self, _class: &str) -> bool {
        false
    }

    /// `dataset[key]`; the default reads the `data-*` attribute.
    fn dataset(&self, key: &str) -> Option<String> {
        self.attr(&data_attr_name(key))
    }
    fn set_dataset(&self, key: &str, value: &str) {
        self.set_attr(&data_attr_name(key), value)
    }

    fn append_child(&self, child: &Self);
    /// Insert `child` before the current first child.
    fn prepend_child(&self, child: &Self);
    /// Detach from the parent, if any.
    fn remove(&self);
    fn parent(&self) -> Option<Self>;

    fn listen(&self, event: &str, handler: Handler<Self>) -> Listener;
    fn unlisten(&self, listener: Listener);
}

/// Document-level access.
pub trait Document {
    type Node: DomNode;

    fn get_by_id(&self, id: &str) -> Option<Self::Node>;
    fn query_all(&self, selector: &str) -> Vec<Self::Node>;
    fn create_element(&self, tag: &str) -> Option<Self::Node>;
    fn body(&self) -> Option<Self::Node>;
    fn listen_document(&self, event: &str, handler: Handler<Self::Node>) -> Listener;
    fn unlisten_document(&self, listener: Listener);
}

/// `deviceId` -> `data-device-id`, matching how `dataset` maps names.
pub fn data_attr_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 6);
    out.push_str("data-");
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dataset_names_are_kebab_cased() {
        assert_eq!(data_attr_name("deviceId"), "data-device-id");
        assert_eq!(data_attr_name("flashtype"), "data-flashtype");
        assert_eq!(data_attr_name("blacklisted"), "data-blacklisted");
    }

    #[test]
    fn listener_ids_are_unique() {
        let a = Listener::next();
        let b = Listener::next();
        assert_ne!(a, b);
    }
}
