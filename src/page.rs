//! Per-page context handed to every controller.

use std::rc::Rc;

use crate::api::ApiClient;
use crate::config::PortalConfig;
use crate::dom::{select, ElementSet};
use crate::error::message_for;
use crate::flash::Flash;
use crate::modal::Modal;
use crate::platform::Browser;
use crate::util_text;

/// Host, API client, flash region and dialog manager of one loaded page.
///
/// Cheap to clone; clones share the flash and dialog state.
pub struct Page<B: Browser> {
    pub browser: Rc<B>,
    pub api: ApiClient<B>,
    pub flash: Flash<B>,
    pub modal: Modal<B>,
    pub config: Rc<PortalConfig>,
}

impl<B: Browser> Clone for Page<B> {
    fn clone(&self) -> Self {
        Page {
            browser: self.browser.clone(),
            api: self.api.clone(),
            flash: self.flash.clone(),
            modal: self.modal.clone(),
            config: self.config.clone(),
        }
    }
}

impl<B: Browser> Page<B> {
    pub fn new(browser: Rc<B>, config: PortalConfig) -> Self {
        Page {
            api: ApiClient::new(browser.clone()),
            flash: Flash::new(browser.clone(), &config),
            modal: Modal::new(browser.clone(), &config),
            config: Rc::new(config),
            browser,
        }
    }

    pub fn select(&self, selector: &str) -> ElementSet<B::Node> {
        select(&*self.browser, selector)
    }

    /// Fill a textbox with the current local time.
    pub fn set_textbox_to_today(&self, selector: &str) {
        self.select(selector).set_value(&util_text::now_string());
    }

    /// Ask for confirmation, then run `on_ok`. A dialog that cannot be
    /// opened is treated as cancelled.
    pub fn confirm_then(&self, message: &str, on_ok: impl FnOnce() + 'static) {
        if let Err(e) = self.modal.confirm(message, on_ok, || {}) {
            log::warn!("[page] confirm {message:?} not shown: {e}");
        }
    }

    pub fn prompt_then(&self, message: &str, initial: &str, on_ok: impl FnOnce(String) + 'static) {
        if let Err(e) = self.modal.prompt(message, initial, on_ok, || {}) {
            log::warn!("[page] prompt {message:?} not shown: {e}");
        }
    }

    /// Error callback that flashes a fixed `text`.
    pub fn fail_with(&self, text: &'static str) -> impl FnOnce(&crate::ajax::Response) + 'static {
        let flash = self.flash.clone();
        move |_| flash.failure(text)
    }

    /// Error callback that flashes what the server said.
    pub fn fail_with_server_message(&self) -> impl FnOnce(&crate::ajax::Response) + 'static {
        let flash = self.flash.clone();
        move |resp| flash.failure(&message_for(resp))
    }

    /// Success callback that reloads the page.
    pub fn reload_on_ok<D: 'static>(&self) -> impl FnOnce(crate::api::ApiReply<D>) + 'static {
        let browser = self.browser.clone();
        move |_| browser.reload()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::mem::MemNode;
    use crate::dom::DomNode;
    use crate::platform::headless::HeadlessBrowser;

    #[test]
    fn today_fills_textbox() {
        let b = Rc::new(HeadlessBrowser::new());
        b.mount([MemNode::new("input").with_id("when")]);
        let page = Page::new(b.clone(), PortalConfig::default());
        page.set_textbox_to_today("#when");
        let v = b.find("#when").unwrap().value();
        assert_eq!(v.len(), "2024-01-01 00:00".len());
        assert_eq!(&v[4..5], "-");
        assert_eq!(&v[10..11], " ");
    }
}
