//! `/register/guest`: captcha image and audio controls.

use crate::dom::DomEvent;
use crate::page::Page;
use crate::platform::Browser;

const IMAGE: &str = "#captchaImage";
const AUDIO: &str = "#captchaAudio";

/// `src` with its query string replaced by `query`.
pub fn with_query(src: &str, query: &str) -> String {
    let base = src.split_once('?').map_or(src, |(base, _)| base);
    format!("{base}?{query}")
}

fn set_src_query<B: Browser>(page: &Page<B>, selector: &str, query: &str) {
    let el = page.select(selector);
    if let Some(src) = el.attr("src") {
        el.set_attr("src", &with_query(&src, query));
    }
}

pub fn init<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select("#reload-captcha-btn").click(move |e| {
        e.prevent_default();
        reload(&p);
    });

    let p = page.clone();
    page.select("#play-captcha-btn").click(move |e| {
        e.prevent_default();
        set_src_query(&p, AUDIO, "lang=en");
        p.select(AUDIO).show().set_attr("autoplay", "autoplay");
    });
}

/// Fetch a fresh challenge; the timestamp defeats the browser cache.
fn reload<B: Browser>(page: &Page<B>) {
    let stamp = chrono::Utc::now().timestamp_millis();
    set_src_query(page, IMAGE, &format!("reload={stamp}"));
    set_src_query(page, AUDIO, &stamp.to_string());
}
