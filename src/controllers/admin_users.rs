//! `/admin/users`: jump to a user's edit page by name.

use crate::ajax::encode_component;
use crate::dom::DomEvent;
use crate::page::Page;
use crate::platform::Browser;

pub fn init<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select("#new-user-form").submit(move |e| {
        e.prevent_default();
        let username = p.select("[name=username]").value();
        if !username.is_empty() {
            p.browser
                .navigate(&format!("/admin/users/{}", encode_component(&username)));
        }
    });
}
