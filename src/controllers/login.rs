//! `/login`: username/password form.

use crate::ajax::Response;
use crate::api::LoginInput;
use crate::debug::{self, cat};
use crate::dom::DomEvent;
use crate::error::{Failure, BAD_LOGIN, UNKNOWN};
use crate::page::Page;
use crate::platform::Browser;

pub const LOGIN_BTN: &str = "#login-btn";

/// Message for a failed login: bad credentials or nothing more specific.
pub fn login_failure_text(resp: &Response) -> &'static str {
    match Failure::from_response(resp) {
        Failure::Unauthorized => BAD_LOGIN,
        _ => UNKNOWN,
    }
}

pub fn init<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select(LOGIN_BTN).click(move |_| submit(&p));

    let p = page.clone();
    page.select("[name=username], [name=password]").keyup(move |e| {
        if e.key().as_deref() == Some("Enter") {
            submit(&p);
        }
    });
}

fn submit<B: Browser>(page: &Page<B>) {
    let input = LoginInput {
        username: page.select("[name=username]").value(),
        password: page.select("[name=password]").value(),
    };
    if input.username.is_empty() || input.password.is_empty() {
        debug::log(cat::FORM, "login: empty field, not submitting");
        return;
    }

    let button = page.select(LOGIN_BTN);
    button.set_disabled(true).set_text("Logging in...");

    let browser = page.browser.clone();
    let landing = page.config.landing_url.clone();
    let flash = page.flash.clone();
    page.api.login(
        &input,
        move |_| browser.navigate(&landing),
        move |resp| {
            button.set_text("Login").set_disabled(false);
            flash.failure(login_failure_text(resp));
        },
    );
}
