//! User list and user edit pages

use std::rc::Rc;

use pg_portal::ajax::Method;
use pg_portal::controllers::{self, admin_user};
use pg_portal::dom::mem::MemNode;
use pg_portal::dom::DomNode;
use pg_portal::platform::headless::HeadlessBrowser;
use pg_portal::{Page, PageId, PortalConfig};

fn flash_region() -> MemNode {
    MemNode::new("div")
        .with_id("flashDiv")
        .with_child(MemNode::new("span").with_id("flash-text"))
}

fn field(name: &str, value: &str) -> MemNode {
    MemNode::new("input").with_name(name).with_value(value)
}

fn user_page(
    limit: &str,
    expires: &str,
    expiration: &str,
    forever: bool,
) -> (Rc<HeadlessBrowser>, Page<HeadlessBrowser>) {
    let b = Rc::new(HeadlessBrowser::new());
    let form = MemNode::new("form")
        .with_id("user-form")
        .with_child(field("username", "alice"))
        .with_child(field("password", ""))
        .with_child(MemNode::new("input").with_name("clear-pass"))
        .with_child(field("device-limit", limit))
        .with_child(MemNode::new("select").with_name("special-limit"))
        .with_child(field("device-expiration", expiration))
        .with_child(
            MemNode::new("select")
                .with_name("dev-exp-sel")
                .with_attr("data-expires", expires),
        )
        .with_child(MemNode::new("span").with_id("dev-exp-tooltip"))
        .with_child(
            MemNode::new("select")
                .with_name("val-bef-sel")
                .with_attr("data-forever", if forever { "true" } else { "false" }),
        )
        .with_child(field("valid-after", "2024-01-01 00:00"))
        .with_child(field("valid-before", "2025-01-01 00:00"))
        .with_child(MemNode::new("span").with_id("user-exp-tooltip"))
        .with_child(MemNode::new("input").with_name("can-manage").with_checked(true))
        .with_child(MemNode::new("input").with_name("can-autoreg"))
        .with_child(MemNode::new("input").with_name("user-api-status"))
        .with_child(field("user-ui-group", "admin"))
        .with_child(field("user-api-group", "readonly"))
        .with_child(MemNode::new("span").with_id("has-password").with_text("No"))
        .with_child(MemNode::new("button").with_id("submit-btn").with_text("Create"));
    b.mount([
        flash_region(),
        form,
        MemNode::new("button").with_name("delete-btn"),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(
        &page,
        &PageId::AdminUser {
            username: "alice".into(),
        },
    );
    (b, page)
}

fn el(b: &HeadlessBrowser, selector: &str) -> MemNode {
    b.find(selector).unwrap()
}

#[test]
fn initial_state_reflects_rendered_values() {
    let (b, _page) = user_page("-1", "4", "Daily at 08:30", true);
    assert_eq!(el(&b, "[name=special-limit]").value(), "global");
    let limit = el(&b, "[name=device-limit]");
    assert_eq!(limit.value(), "");
    assert!(limit.disabled());

    assert_eq!(el(&b, "[name=dev-exp-sel]").value(), "daily");
    assert_eq!(el(&b, "[name=device-expiration]").value(), "08:30");

    assert_eq!(el(&b, "[name=val-bef-sel]").value(), "forever");
    assert!(el(&b, "[name=valid-before]").disabled());
    assert_eq!(el(&b, "[name=valid-after]").value(), "");
}

#[test]
fn specific_values_stay_editable() {
    let (b, _page) = user_page("5", "2", "2030-01-01 00:00", false);
    assert_eq!(el(&b, "[name=special-limit]").value(), "specific");
    assert_eq!(el(&b, "[name=device-limit]").value(), "5");
    assert_eq!(el(&b, "[name=dev-exp-sel]").value(), "specific");
    assert!(!el(&b, "[name=device-expiration]").disabled());
    assert_eq!(el(&b, "[name=val-bef-sel]").value(), "specific");
}

#[test]
fn select_changes_toggle_textboxes_and_tooltips() {
    let (b, _page) = user_page("0", "5", "", true);
    assert_eq!(el(&b, "[name=special-limit]").value(), "unlimited");
    assert!(el(&b, "[name=device-expiration]").disabled());

    el(&b, "[name=special-limit]").input("specific");
    assert!(!el(&b, "[name=device-limit]").disabled());

    el(&b, "[name=dev-exp-sel]").input("duration");
    let exp = el(&b, "[name=device-expiration]");
    assert!(!exp.disabled());
    assert_eq!(exp.value(), "");
    assert_eq!(
        el(&b, "#dev-exp-tooltip").text(),
        "(5h30m = 5 hours and 30 minutes)"
    );

    el(&b, "[name=dev-exp-sel]").input("rolling");
    assert!(exp.disabled());
    assert_eq!(el(&b, "#dev-exp-tooltip").text(), "");

    el(&b, "[name=val-bef-sel]").input("specific");
    assert!(!el(&b, "[name=valid-before]").disabled());
    assert_eq!(el(&b, "[name=valid-after]").value().len(), 16);
    assert_eq!(el(&b, "#user-exp-tooltip").text(), "(YYYY-MM-DD HH:mm)");
}

#[test]
fn form_is_read_into_the_save_input() {
    let (b, page) = user_page("-1", "4", "Daily at 08:30", true);
    el(&b, "[name=password]").set_value("secret");
    let input = admin_user::read_form(&page);
    assert_eq!(input.username, "alice");
    assert_eq!(input.password, "secret");
    assert_eq!(input.device_limit, -1);
    assert_eq!(input.expiration_type, 4);
    assert_eq!(input.device_expiration, "08:30");
    assert_eq!((input.valid_start.as_str(), input.valid_end.as_str()), ("0", "0"));
    assert!(input.can_manage);
    assert!(!input.can_autoreg);
    assert_eq!(input.ui_group, "admin");

    el(&b, "[name=clear-pass]").set_checked(true);
    assert_eq!(admin_user::read_form(&page).password, "-1");
}

#[test]
fn saving_updates_password_state() {
    let (b, _page) = user_page("3", "2", "2030-01-01 00:00", false);
    el(&b, "[name=password]").set_value("secret");
    let ev = el(&b, "#user-form").submit();
    assert!(ev.was_prevented());

    let req = b.last_request().unwrap();
    assert_eq!((req.method, req.url.as_str()), (Method::Post, "/api/user"));
    let form = req.form();
    assert_eq!(form.get("device_limit"), Some("3"));
    assert_eq!(form.get("expiration_type"), Some("2"));
    assert_eq!(form.get("valid_start"), Some("2024-01-01 00:00"));
    assert_eq!(form.get("can_manage"), Some("1"));

    b.respond(200, "");
    assert_eq!(b.find("#flash-text").unwrap().html(), "User saved");
    assert_eq!(el(&b, "[name=password]").value(), "");
    assert_eq!(el(&b, "#has-password").text(), "Yes");
    assert_eq!(el(&b, "#submit-btn").text(), "Save");
    assert_eq!(b.scrolls(), 1);
}

#[test]
fn non_plain_success_flashes_the_server_message() {
    let (b, _page) = user_page("3", "2", "", false);
    el(&b, "#user-form").submit();
    b.respond(206, r#"{"Message":"Username already exists"}"#);
    assert_eq!(b.find("#flash-text").unwrap().html(), "Username already exists");
    assert_eq!(el(&b, "#submit-btn").text(), "Create");
}

#[test]
fn delete_user_asks_first() {
    let (b, page) = user_page("3", "2", "", false);
    el(&b, "[name=delete-btn]").click();
    assert_eq!(
        el(&b, ".js-modal-body").text(),
        "Are you sure you want to delete this user?"
    );
    assert!(b.requests().is_empty());
    page.modal.cancel();
    assert!(b.requests().is_empty());
    assert!(!page.modal.is_open());
    assert!(b.find(".js-modal").is_none());
}

#[test]
fn delete_user_goes_back_to_the_list() {
    let (b, page) = user_page("3", "2", "", false);
    el(&b, "[name=delete-btn]").click();
    page.modal.ok();
    let req = b.last_request().unwrap();
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.url, "/api/user?username=alice");
    b.respond(204, "");
    assert_eq!(b.navigations(), vec!["/admin/users".to_string()]);
}

#[test]
fn user_list_jumps_to_the_named_user() {
    let b = Rc::new(HeadlessBrowser::new());
    b.mount([
        flash_region(),
        MemNode::new("form")
            .with_id("new-user-form")
            .with_child(field("username", "")),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(&page, &PageId::AdminUsers);

    let form = el(&b, "#new-user-form");
    assert!(form.submit().was_prevented());
    assert!(b.navigations().is_empty());

    el(&b, "[name=username]").set_value("bob");
    form.submit();
    assert_eq!(b.navigations(), vec!["/admin/users/bob".to_string()]);

    el(&b, "[name=username]").set_value("bob smith/2");
    form.submit();
    assert_eq!(
        b.navigations().last().map(String::as_str),
        Some("/admin/users/bob%20smith%2F2")
    );
}
