#![cfg_attr(target_arch = "wasm32", no_main)]

// Browser entry point for the portal pages.
//
// Served next to every page as `pg-portal-web.js` + wasm:
//   <script type="module">import init from "/assets/pg-portal-web.js"; init();</script>
//
// Settings can be overridden per deployment with an inline TOML block:
//   <script type="application/toml" id="pg-portal-config">flash_display_ms = 5000</script>

#[cfg(target_arch = "wasm32")]
mod web {
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;

    use pg_portal::{
        controllers, debug,
        platform::{init_logging, install_panic_hook, web::WebBrowser, Navigator},
        router, Page, PortalConfig,
    };

    const CONFIG_ELEMENT: &str = "pg-portal-config";

    fn page_config() -> PortalConfig {
        let inline = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT))
            .and_then(|el| el.text_content());
        match inline {
            Some(raw) if !raw.trim().is_empty() => {
                PortalConfig::from_toml_str(&raw).unwrap_or_else(|e| {
                    log::warn!("[config] ignoring #{CONFIG_ELEMENT}: {e:#}");
                    PortalConfig::default()
                })
            }
            _ => PortalConfig::default(),
        }
    }

    #[wasm_bindgen(start)]
    pub fn wasm_start() {
        install_panic_hook();
        init_logging(log::Level::Info);
        debug::init_from_url_and_storage_once();

        let config = page_config();
        let Some(browser) = WebBrowser::new(config.frame_fallback_ms) else {
            log::warn!("[pg-portal] no window/document; nothing to do");
            return;
        };
        let path = browser.location_path();
        let hint = browser.page_hint().unwrap_or_default();
        let browser = Rc::new(browser);
        let page = Page::new(browser, config);

        match router::from_hint(&hint, &path) {
            Some(id) => controllers::init(&page, &id),
            None => {
                log::debug!("[pg-portal] no controller for {path}");
                page.flash.show_server_rendered();
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("pg-portal-web is only supported on wasm32 (browser) target.");
}
