//! `/register`: self-service and manual device registration.
//!
//! Which fields the form carries depends on who is registering: the
//! password box only appears for signed-out users, and MAC address and
//! platform only for manual registrations. A field that is rendered must
//! be filled in.

use crate::api::{ignore_error, ignore_reply, LoginInput, RegisterDeviceInput};
use crate::controllers::login::login_failure_text;
use crate::debug::{self, cat};
use crate::error::message_for;
use crate::page::Page;
use crate::platform::Browser;

pub const REGISTER_BTN: &str = "#register-btn";

pub fn init<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select(REGISTER_BTN).click(move |_| register(&p));
}

fn disable_button<B: Browser>(page: &Page<B>) {
    page.select(REGISTER_BTN)
        .set_disabled(true)
        .set_text("Registering...");
}

fn enable_button<B: Browser>(page: &Page<B>) {
    page.select(REGISTER_BTN)
        .set_text("Register")
        .set_disabled(false);
}

/// Value of an optional field: `None` when not rendered, `Some("")` when
/// rendered but left empty.
fn optional_field<B: Browser>(page: &Page<B>, name: &str) -> Option<String> {
    let field = page.select(&format!("[name={name}]"));
    (!field.is_empty()).then(|| field.value())
}

/// Read the form. `None` when a rendered field is empty.
fn read_form<B: Browser>(page: &Page<B>) -> Option<(RegisterDeviceInput, Option<String>)> {
    let username = optional_field(page, "username").unwrap_or_default();
    if username.is_empty() {
        return None;
    }
    let password = optional_field(page, "password");
    let mac = optional_field(page, "mac-address");
    let platform = optional_field(page, "platform");
    for field in [&password, &mac, &platform].into_iter().flatten() {
        if field.is_empty() {
            return None;
        }
    }
    let input = RegisterDeviceInput {
        username,
        mac_address: mac.unwrap_or_default(),
        description: page.select("[name=dev-desc]").value(),
        platform,
    };
    Some((input, password))
}

fn register<B: Browser>(page: &Page<B>) {
    disable_button(page);
    let Some((input, password)) = read_form(page) else {
        debug::log(cat::FORM, "register: required field empty");
        enable_button(page);
        return;
    };

    let Some(password) = password else {
        register_device(page, input, false);
        return;
    };

    let login = LoginInput {
        username: input.username.clone(),
        password,
    };
    let p = page.clone();
    let on_err = page.clone();
    page.api.login(
        &login,
        move |_| register_device(&p, input, true),
        move |resp| {
            on_err.browser.scroll_to_top();
            enable_button(&on_err);
            on_err.flash.failure(login_failure_text(resp));
        },
    );
}

fn register_device<B: Browser>(page: &Page<B>, input: RegisterDeviceInput, logged_in: bool) {
    let automatic = input.mac_address.is_empty();
    let ok = page.clone();
    let err = page.clone();
    page.api.register_device(
        &input,
        move |reply| {
            ok.browser.scroll_to_top();
            ok.flash.success("Registration successful");
            ok.select(".register-box").hide();
            if logged_in {
                ok.api.logout(ignore_reply, ignore_error);
            }
            if automatic {
                ok.select("#suc-msg-auto").show();
                return;
            }
            match reply.data() {
                Some(data) if !data.location.is_empty() => ok.browser.navigate(&data.location),
                _ => log::warn!("[register] reply carried no Location"),
            }
        },
        move |resp| {
            err.browser.scroll_to_top();
            enable_button(&err);
            err.flash.failure(&message_for(resp));
            if logged_in {
                err.api.logout(ignore_reply, ignore_error);
            }
        },
    );
}
