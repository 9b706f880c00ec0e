//! Filterable debug logging for the portal scripts
//!
//! Categories: AJAX, DOM, FADE, FLASH, MODAL, FORM, ROUTER
//! Enable via: ?pgdebug=all or localStorage.setItem('pg.debug','ajax,modal')

use std::sync::atomic::{AtomicU32, Ordering};

pub mod cat {
    pub const AJAX: u32 = 1 << 0;
    pub const DOM: u32 = 1 << 1;
    pub const FADE: u32 = 1 << 2;
    pub const FLASH: u32 = 1 << 3;
    pub const MODAL: u32 = 1 << 4;
    pub const FORM: u32 = 1 << 5;
    pub const ROUTER: u32 = 1 << 6;
    pub const ALL: u32 = 0xffff_ffff;
}

static MASK: AtomicU32 = AtomicU32::new(0);

#[inline]
pub fn mask() -> u32 {
    MASK.load(Ordering::Relaxed)
}

#[inline]
pub fn set(mask: u32) {
    MASK.store(mask, Ordering::Relaxed)
}

#[inline]
pub fn enable(bits: u32) {
    MASK.fetch_or(bits, Ordering::Relaxed);
}

#[inline]
pub fn is(cat: u32) -> bool {
    (MASK.load(Ordering::Relaxed) & cat) != 0
}

#[inline]
pub fn cat_name(cat: u32) -> &'static str {
    match cat {
        c if c == cat::AJAX => "ajax",
        c if c == cat::DOM => "dom",
        c if c == cat::FADE => "fade",
        c if c == cat::FLASH => "flash",
        c if c == cat::MODAL => "modal",
        c if c == cat::FORM => "form",
        c if c == cat::ROUTER => "router",
        _ => "misc",
    }
}

/// Parse a comma-separated category list ("ajax,modal", "all", "none").
pub fn parse_list(list: &str) -> u32 {
    let mut m: u32 = 0;
    for tok in list.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        match tok.as_str() {
            "" | "none" => m = 0,
            "all" => m = cat::ALL,
            "ajax" => m |= cat::AJAX,
            "dom" => m |= cat::DOM,
            "fade" => m |= cat::FADE,
            "flash" => m |= cat::FLASH,
            "modal" => m |= cat::MODAL,
            "form" => m |= cat::FORM,
            "router" => m |= cat::ROUTER,
            _ => {}
        }
    }
    m
}

#[inline]
pub fn set_from_list(list: &str) {
    set(parse_list(list));
}

/// Read `pgdebug` out of a raw `location.search` string.
pub fn list_from_query(search: &str) -> Option<String> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|part| part.split_once('=').or(Some((part, ""))))
        .find(|(key, _)| key.eq_ignore_ascii_case("pgdebug"))
        .map(|(_, val)| {
            urlencoding::decode(val)
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| val.to_string())
        })
}

#[cfg(all(feature = "dom-web", target_arch = "wasm32"))]
pub fn init_from_url_and_storage_once() {
    use std::sync::Once;
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let Some(win) = web_sys::window() else {
            return;
        };
        if let Ok(search) = win.location().search() {
            if let Some(list) = list_from_query(&search) {
                set_from_list(&list);
            }
        }
        if let Ok(Some(storage)) = win.local_storage() {
            if let Ok(Some(v)) = storage.get_item("pg.debug") {
                enable(parse_list(&v));
            }
        }
        log(cat::ROUTER, "debug init (wasm) complete");
    });
}

#[cfg(not(all(feature = "dom-web", target_arch = "wasm32")))]
pub fn init_from_url_and_storage_once() {
    if let Ok(list) = std::env::var("PG_DEBUG") {
        set_from_list(&list);
    }
}

/// Category-gated debug line, routed through the `log` facade.
#[inline]
pub fn log(cat: u32, msg: impl AsRef<str>) {
    if !is(cat) {
        return;
    }
    log::debug!("[pg][{}] {}", cat_name(cat), msg.as_ref());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_list_combines_categories() {
        assert_eq!(parse_list("ajax,modal"), cat::AJAX | cat::MODAL);
        assert_eq!(parse_list("all"), cat::ALL);
        assert_eq!(parse_list("ajax,none"), 0);
        assert_eq!(parse_list(" Flash , bogus "), cat::FLASH);
    }

    #[test]
    fn query_lookup_is_case_insensitive_and_decoded() {
        assert_eq!(
            list_from_query("?x=1&PGDEBUG=ajax%2Cform"),
            Some("ajax,form".to_string())
        );
        assert_eq!(list_from_query("?x=1"), None);
        assert_eq!(list_from_query(""), None);
    }
}
