//! `/admin/users/<username>`: the user edit form.

use crate::api::SaveUserInput;
use crate::controllers::target_value;
use crate::dom::DomEvent;
use crate::page::Page;
use crate::platform::Browser;
use crate::util_text::{strip_daily_prefix, DeviceLimit, ExpirationType};

const DEVICE_LIMIT: &str = "[name=device-limit]";
const SPECIAL_LIMIT: &str = "[name=special-limit]";
const DEVICE_EXPIRATION: &str = "[name=device-expiration]";
const DEV_EXP_SEL: &str = "[name=dev-exp-sel]";
const VAL_BEF_SEL: &str = "[name=val-bef-sel]";
const VALID_BEFORE: &str = "[name=valid-before]";
const VALID_AFTER: &str = "[name=valid-after]";

pub fn init<B: Browser>(page: &Page<B>) {
    init_limit(page);
    init_expiration(page);
    init_validity(page);
    bind_selects(page);

    let p = page.clone();
    page.select("[name=delete-btn]").click(move |_| {
        let q = p.clone();
        p.confirm_then("Are you sure you want to delete this user?", move || {
            delete_user(&q)
        });
    });

    let p = page.clone();
    page.select("#user-form").submit(move |e| {
        e.prevent_default();
        save_user(&p);
    });
}

/// Translate the limit the server rendered into the select + textbox pair.
fn init_limit<B: Browser>(page: &Page<B>) {
    let limit = page.select(DEVICE_LIMIT);
    let special = DeviceLimit::select_value(&limit.value());
    page.select(SPECIAL_LIMIT).set_value(special);
    if special != "specific" {
        limit.set_value("").set_disabled(true);
    }
}

fn init_expiration<B: Browser>(page: &Page<B>) {
    let value = page.select(DEVICE_EXPIRATION);
    let sel = page.select(DEV_EXP_SEL);
    let kind = sel
        .data("expires")
        .and_then(|code| ExpirationType::from_code(&code))
        .unwrap_or(ExpirationType::Specific);
    sel.set_value(kind.select_value());
    match kind {
        ExpirationType::Never | ExpirationType::Global | ExpirationType::Rolling => {
            value.set_value("").set_disabled(true);
        }
        ExpirationType::Daily => {
            let current = value.value();
            value.set_value(strip_daily_prefix(&current));
        }
        ExpirationType::Specific | ExpirationType::Duration => {}
    }
}

fn init_validity<B: Browser>(page: &Page<B>) {
    let sel = page.select(VAL_BEF_SEL);
    if sel.data("forever").as_deref() == Some("true") {
        sel.set_value("forever");
        page.select(VALID_BEFORE).set_value("").set_disabled(true);
        page.select(VALID_AFTER).set_value("").set_disabled(true);
    } else {
        sel.set_value("specific");
    }
}

fn bind_selects<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select(SPECIAL_LIMIT).change(move |e| {
        p.select(DEVICE_LIMIT)
            .set_value("")
            .set_disabled(target_value(e) != "specific");
    });

    let p = page.clone();
    page.select(DEV_EXP_SEL).change(move |e| {
        let kind = ExpirationType::from_select(&target_value(e));
        let textbox = p.select(DEVICE_EXPIRATION);
        textbox
            .set_disabled(!kind.is_some_and(ExpirationType::takes_value))
            .set_value("");
        if kind == Some(ExpirationType::Specific) {
            p.set_textbox_to_today(DEVICE_EXPIRATION);
        }
        p.select("#dev-exp-tooltip")
            .set_text(kind.map(ExpirationType::tooltip).unwrap_or_default());
    });

    let p = page.clone();
    page.select(VAL_BEF_SEL).change(move |e| {
        let choice = target_value(e);
        let forever = choice == "forever";
        p.select(VALID_BEFORE).set_disabled(forever);
        p.select(VALID_AFTER).set_disabled(forever);
        if choice == "specific" {
            p.set_textbox_to_today(VALID_BEFORE);
            p.set_textbox_to_today(VALID_AFTER);
            p.select("#user-exp-tooltip").set_text("(YYYY-MM-DD HH:mm)");
        } else {
            p.select(VALID_BEFORE).set_value("");
            p.select(VALID_AFTER).set_value("");
            p.select("#user-exp-tooltip").set_text("");
        }
    });
}

fn delete_user<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.api.delete_user(
        &page.select("[name=username]").value(),
        move |reply| {
            if reply.status > 204 {
                p.flash.failure(reply.message());
                return;
            }
            p.browser.navigate("/admin/users");
        },
        page.fail_with("Error deleting user"),
    );
}

/// Gather the edit form into the API input.
pub fn read_form<B: Browser>(page: &Page<B>) -> SaveUserInput {
    let checked = |name: &str| page.select(&format!("[name={name}]")).checked();
    let value = |sel: &str| page.select(sel).value();

    let password = if checked("clear-pass") {
        "-1".to_string()
    } else {
        value("[name=password]")
    };
    let expiration_type = ExpirationType::from_select(&value(DEV_EXP_SEL))
        .unwrap_or(ExpirationType::Global);
    let (valid_start, valid_end) = if value(VAL_BEF_SEL) == "forever" {
        ("0".to_string(), "0".to_string())
    } else {
        (value(VALID_AFTER), value(VALID_BEFORE))
    };

    SaveUserInput {
        username: value("[name=username]"),
        password,
        device_limit: DeviceLimit::from_form(&value(SPECIAL_LIMIT), &value(DEVICE_LIMIT)).code(),
        expiration_type: expiration_type.code(),
        device_expiration: value(DEVICE_EXPIRATION),
        valid_start,
        valid_end,
        can_manage: checked("can-manage"),
        can_autoreg: checked("can-autoreg"),
        allow_status_api: checked("user-api-status"),
        ui_group: value("[name=user-ui-group]"),
        api_group: value("[name=user-api-group]"),
    }
}

fn save_user<B: Browser>(page: &Page<B>) {
    let input = read_form(page);
    let has_password = !(input.password.is_empty() || input.password == "-1");
    let p = page.clone();
    page.api.save_user(
        &input,
        move |reply| {
            p.browser.scroll_to_top();
            if reply.status > 204 {
                p.flash.failure(reply.message());
                return;
            }
            p.flash.success("User saved");
            p.select("[name=password]").set_value("");
            p.select("[name=clear-pass]").set_checked(false);
            p.select("#has-password")
                .set_text(if has_password { "Yes" } else { "No" });
            p.select("#submit-btn").set_text("Save");
        },
        page.fail_with_server_message(),
    );
}
