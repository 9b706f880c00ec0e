//! Expandable device rows (`.device-header` / `#device-body-{id}`).
//!
//! Clicking a header opens its body and, unless rows are kept open,
//! closes the others. A press that moved before release (selecting text
//! in the row) is not a click.

use std::cell::Cell;
use std::rc::Rc;

use crate::debug::{self, cat};
use crate::dom::{DomEvent, DomNode, ElementSet};
use crate::page::Page;
use crate::platform::Browser;
use crate::util::drag::ClickIntent;

pub const OPEN_HEIGHT: &str = "1000px";
pub const CLOSED_HEIGHT: &str = "0px";

/// `stay_open` leaves other rows alone when one is toggled.
pub fn init<B: Browser>(page: &Page<B>, stay_open: bool) {
    let headers = page.select(".device-header");
    let intent = Rc::new(Cell::new(ClickIntent::default()));

    let (p, i) = (page.clone(), intent.clone());
    headers.click(move |e| {
        if !i.get().is_click() {
            return;
        }
        let Some(target) = e.target() else { return };
        if ElementSet::from_node(target.clone()).has_class("device-checkbox")
            || target.tag_name().eq_ignore_ascii_case("a")
        {
            return;
        }
        if let Some(id) = header_of(target).and_then(|h| h.data("deviceId")) {
            expand(&p, &id, stay_open);
        }
    });

    let i = intent.clone();
    headers.mousedown(move |_| {
        let mut state = i.get();
        state.press();
        i.set(state);
    });
    let i = intent;
    headers.on("mousemove", move |_| {
        let mut state = i.get();
        state.moved();
        i.set(state);
    });

    let preopen = page.browser.location_hash();
    if !preopen.is_empty() {
        expand(page, &preopen, stay_open);
    }
}

/// Nearest `.device-header` at or above `node`.
fn header_of<N: DomNode>(node: N) -> Option<ElementSet<N>> {
    let mut current = Some(node);
    while let Some(n) = current {
        let set = ElementSet::from_node(n.clone());
        if set.has_class("device-header") {
            return Some(set);
        }
        current = n.parent();
    }
    None
}

/// Toggle `#device-body-{id}` between open and closed.
pub fn expand<B: Browser>(page: &Page<B>, id: &str, stay_open: bool) {
    let body = page.select(&format!("#device-body-{id}"));
    let was = body.style("max-height");
    if !stay_open {
        page.select(".device-body").set_style("max-height", CLOSED_HEIGHT);
    }
    let next = if was == OPEN_HEIGHT { CLOSED_HEIGHT } else { OPEN_HEIGHT };
    debug::log(cat::DOM, format!("device body {id} -> {next}"));
    body.set_style("max-height", next);
}
