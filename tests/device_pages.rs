//! Device list, admin manage and single-device pages

use std::rc::Rc;

use pg_portal::ajax::Method;
use pg_portal::controllers::{self, device_list};
use pg_portal::dom::mem::MemNode;
use pg_portal::dom::{Document, DomNode};
use pg_portal::modal::PROMPT_INPUT_ID;
use pg_portal::platform::headless::HeadlessBrowser;
use pg_portal::{Page, PageId, PortalConfig};

fn flash_region() -> MemNode {
    MemNode::new("div")
        .with_id("flashDiv")
        .with_child(MemNode::new("span").with_id("flash-text"))
}

fn flash_text(b: &HeadlessBrowser) -> String {
    b.find("#flash-text").unwrap().html()
}

fn checkbox(mac: &str, checked: bool) -> MemNode {
    MemNode::new("input")
        .with_class("device-checkbox")
        .with_value(mac)
        .with_checked(checked)
}

fn device_row(id: &str, mac: &str, desc: &str, checked: bool) -> [MemNode; 2] {
    let header = MemNode::new("div")
        .with_class("device-header")
        .with_attr("data-device-id", id)
        .with_child(checkbox(mac, checked))
        .with_child(MemNode::new("span").with_id(&format!("device-{id}-mac")).with_text(mac))
        .with_child(MemNode::new("span").with_id(&format!("device-{id}-desc")).with_text(desc))
        .with_child(
            MemNode::new("a")
                .with_class("edit-dev-desc")
                .with_attr("data-device", id)
                .with_text("edit"),
        );
    let body = MemNode::new("div")
        .with_id(&format!("device-body-{id}"))
        .with_class("device-body");
    [header, body]
}

fn manage_page(id: PageId, hash: &str) -> (Rc<HeadlessBrowser>, Page<HeadlessBrowser>) {
    let b = Rc::new(HeadlessBrowser::new());
    b.set_location("/manage", hash);
    b.mount([
        flash_region(),
        MemNode::new("input").with_name("username").with_value("alice"),
        MemNode::new("button")
            .with_name("add-device-btn")
            .with_attr("data-admin", ""),
        MemNode::new("button").with_name("del-selected-btn"),
        MemNode::new("button").with_id("select-all"),
        MemNode::new("input").with_id("select-all-checkbox"),
        MemNode::new("select")
            .with_name("blacklist-sel")
            .with_attr("data-blacklisted", "true"),
        MemNode::new("option").with_name("black-user-option").with_text("Add User"),
        MemNode::new("button").with_name("reassign-selected-btn"),
    ]);
    b.mount(device_row("1", "aa:aa:aa:aa:aa:aa", "phone", true));
    b.mount(device_row("2", "bb:bb:bb:bb:bb:bb", "laptop", false));
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(&page, &id);
    (b, page)
}

fn max_height(b: &HeadlessBrowser, id: &str) -> String {
    b.find(&format!("#device-body-{id}")).unwrap().style("max-height")
}

#[test]
fn header_click_opens_one_body_at_a_time() {
    let (b, _page) = manage_page(PageId::Manage, "");
    let first = b.find("#device-1-desc").unwrap();
    first.mouse_down(0, 10.0, 10.0);
    first.click();
    assert_eq!(max_height(&b, "1"), device_list::OPEN_HEIGHT);

    let second = b.find("#device-2-desc").unwrap();
    second.mouse_down(0, 10.0, 40.0);
    second.click();
    assert_eq!(max_height(&b, "1"), device_list::CLOSED_HEIGHT);
    assert_eq!(max_height(&b, "2"), device_list::OPEN_HEIGHT);

    // Clicking the open row again closes it.
    second.mouse_down(0, 10.0, 40.0);
    second.click();
    assert_eq!(max_height(&b, "2"), device_list::CLOSED_HEIGHT);
}

#[test]
fn drags_checkboxes_and_links_do_not_toggle() {
    let (b, _page) = manage_page(PageId::Manage, "");
    let desc = b.find("#device-1-desc").unwrap();
    desc.mouse_down(0, 10.0, 10.0);
    desc.mouse_move(60.0, 10.0);
    desc.click();
    assert_eq!(max_height(&b, "1"), "");

    let cb = b.find(".device-checkbox").unwrap();
    cb.mouse_down(0, 1.0, 1.0);
    cb.click();
    assert_eq!(max_height(&b, "1"), "");
}

#[test]
fn hash_preopens_and_search_keeps_rows_open() {
    let (b, _page) = manage_page(PageId::AdminSearch, "#2");
    assert_eq!(max_height(&b, "2"), device_list::OPEN_HEIGHT);

    let first = b.find("#device-1-desc").unwrap();
    first.mouse_down(0, 1.0, 1.0);
    first.click();
    assert_eq!(max_height(&b, "1"), device_list::OPEN_HEIGHT);
    assert_eq!(max_height(&b, "2"), device_list::OPEN_HEIGHT);
}

#[test]
fn select_all_and_delete_selected() {
    let (b, page) = manage_page(PageId::Manage, "");
    b.find("#select-all").unwrap().click();
    let boxes = b.document().query_all(".device-checkbox");
    assert_eq!(boxes.len(), 2);
    assert!(boxes.iter().all(|n| n.checked()));

    b.find("[name=del-selected-btn]").unwrap().click();
    assert!(page.modal.is_open());
    page.modal.ok();

    let req = b.last_request().unwrap();
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.path(), "/api/device/user/alice");
    assert_eq!(
        req.query().get("mac"),
        Some("aa:aa:aa:aa:aa:aa,bb:bb:bb:bb:bb:bb")
    );
    b.respond(200, "");
    assert_eq!(b.reloads(), 1);
}

#[test]
fn cancelled_delete_sends_nothing() {
    let (b, page) = manage_page(PageId::Manage, "");
    b.find("[name=del-selected-btn]").unwrap().click();
    page.modal.cancel();
    assert!(b.requests().is_empty());
}

#[test]
fn description_edit_rerenders_the_row() {
    let (b, page) = manage_page(PageId::Manage, "");
    b.find(".edit-dev-desc").unwrap().click();
    // The edit link sits inside the header but must not toggle the row.
    assert_eq!(max_height(&b, "1"), "");

    let input = b.find(&format!("#{PROMPT_INPUT_ID}")).unwrap();
    assert_eq!(input.value(), "phone");
    input.set_value("work phone");
    page.modal.ok();

    let req = b.last_request().unwrap();
    assert_eq!(req.path(), "/api/device/mac/aa%3Aaa%3Aaa%3Aaa%3Aaa%3Aaa/description");
    assert_eq!(req.form().get("description"), Some("work phone"));
    b.respond(200, "");
    assert_eq!(b.find("#device-1-desc").unwrap().text(), "work phone");
    assert_eq!(flash_text(&b), "Device description saved");
}

#[test]
fn admin_add_device_carries_the_username() {
    let (b, _page) = manage_page(PageId::Manage, "");
    b.find("[name=add-device-btn]").unwrap().click();
    assert_eq!(
        b.navigations(),
        vec!["/register?manual=1&username=alice".to_string()]
    );

    b.find("[name=username]").unwrap().set_value("o'neil&co");
    b.find("[name=add-device-btn]").unwrap().click();
    assert_eq!(
        b.navigations().last().map(String::as_str),
        Some("/register?manual=1&username=o'neil%26co")
    );
}

#[test]
fn blacklist_menu_confirms_and_resets() {
    let (b, page) = manage_page(
        PageId::AdminManageUser {
            username: "alice".into(),
        },
        "",
    );
    assert_eq!(b.find("[name=black-user-option]").unwrap().text(), "Remove User");

    let sel = b.find("[name=blacklist-sel]").unwrap();
    sel.input("username");
    assert_eq!(sel.value(), "");
    assert_eq!(
        b.find(".js-modal-body").unwrap().text(),
        "Remove username from blacklist?"
    );
    page.modal.ok();
    let req = b.last_request().unwrap();
    assert_eq!((req.method, req.url.as_str()), (Method::Delete, "/api/blacklist/user/alice"));
    b.respond(500, "");
    assert_eq!(flash_text(&b), "Error blacklisting user");

    sel.input("black-sel");
    page.modal.ok();
    let req = b.last_request().unwrap();
    assert_eq!(req.path(), "/api/blacklist/device");
    assert_eq!(req.form().get("mac"), Some("aa:aa:aa:aa:aa:aa"));

    sel.input("unblack-all");
    page.modal.ok();
    let req = b.last_request().unwrap();
    assert_eq!(req.method, Method::Delete);
    assert_eq!(req.query().get("username"), Some("alice"));
}

#[test]
fn reassign_needs_an_owner() {
    let (b, page) = manage_page(
        PageId::AdminManageUser {
            username: "alice".into(),
        },
        "",
    );
    b.find("[name=reassign-selected-btn]").unwrap().click();
    page.modal.ok();
    assert!(b.requests().is_empty());

    b.find("[name=reassign-selected-btn]").unwrap().click();
    b.find(&format!("#{PROMPT_INPUT_ID}")).unwrap().set_value("bob");
    page.modal.ok();
    let form = b.last_request().unwrap().form();
    assert_eq!(form.get("username"), Some("bob"));
    assert_eq!(form.get("macs"), Some("aa:aa:aa:aa:aa:aa"));
}

fn device_page() -> (Rc<HeadlessBrowser>, Page<HeadlessBrowser>) {
    let b = Rc::new(HeadlessBrowser::new());
    b.mount([
        flash_region(),
        MemNode::new("span").with_id("mac-address").with_text("cc:cc:cc:cc:cc:cc"),
        MemNode::new("input").with_id("username").with_value("bob"),
        MemNode::new("span").with_id("device-desc").with_text("printer"),
        MemNode::new("span").with_id("device-expiration").with_text("2030-01-01 00:00"),
        MemNode::new("button").with_id("edit-dev-expiration"),
        MemNode::new("span").with_id("edit-expire-controls"),
        MemNode::new("span").with_id("confirmation-icons"),
        MemNode::new("select").with_id("dev-exp-sel"),
        MemNode::new("input").with_id("dev-exp-val"),
        MemNode::new("button").with_id("dev-expiration-ok"),
        MemNode::new("button").with_id("dev-expiration-cancel"),
        MemNode::new("button").with_id("delete-btn"),
        MemNode::new("button").with_id("flag-dev-btn"),
        MemNode::new("button").with_id("unflag-dev-btn"),
        MemNode::new("button").with_id("blacklist-btn"),
        MemNode::new("button").with_id("unblacklist-btn"),
        MemNode::new("button").with_id("reassign-btn"),
        MemNode::new("button").with_id("edit-dev-desc"),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(
        &page,
        &PageId::AdminDevice {
            mac: "cc:cc:cc:cc:cc:cc".into(),
        },
    );
    (b, page)
}

#[test]
fn device_actions_confirm_then_reload() {
    let (b, page) = device_page();
    b.find("#delete-btn").unwrap().click();
    page.modal.ok();
    let req = b.last_request().unwrap();
    assert_eq!(req.path(), "/api/device/user/bob");
    assert_eq!(req.query().get("mac"), Some("cc:cc:cc:cc:cc:cc"));
    b.respond(200, "");
    assert_eq!(b.reloads(), 1);

    b.find("#flag-dev-btn").unwrap().click();
    page.modal.ok();
    assert_eq!(b.last_request().unwrap().form().get("flagged"), Some("true"));
    b.respond(400, "");
    assert_eq!(flash_text(&b), "Error flagging device");
}

#[test]
fn expiration_editor_cancel_restores_text() {
    let (b, _page) = device_page();
    b.find("#edit-dev-expiration").unwrap().click();
    assert_eq!(b.find("#device-expiration").unwrap().text(), "");
    assert_eq!(b.find("#dev-exp-sel").unwrap().value(), "specific");
    let val = b.find("#dev-exp-val").unwrap();
    assert_eq!(val.value(), "2030-01-01 00:00");
    assert_eq!(val.style("display"), "inline");
    assert_eq!(b.find("#edit-dev-expiration").unwrap().style("display"), "none");

    b.find("#dev-expiration-cancel").unwrap().click();
    assert_eq!(b.find("#device-expiration").unwrap().text(), "2030-01-01 00:00");
    assert_eq!(b.find("#edit-expire-controls").unwrap().style("display"), "none");
    assert_eq!(val.value(), "");
}

#[test]
fn expiration_editor_saves_and_rerenders() {
    let (b, _page) = device_page();
    b.find("#edit-dev-expiration").unwrap().click();
    let sel = b.find("#dev-exp-sel").unwrap();
    sel.input("never");
    assert_eq!(b.find("#dev-exp-val").unwrap().style("display"), "none");

    b.find("#dev-expiration-ok").unwrap().click();
    let req = b.last_request().unwrap();
    assert_eq!(req.path(), "/api/device/mac/cc%3Acc%3Acc%3Acc%3Acc%3Acc/expiration");
    assert_eq!(req.form().get("type"), Some("never"));
    b.respond(200, r#"{"Data":{"newExpiration":"Never"}}"#);

    assert_eq!(b.find("#device-expiration").unwrap().text(), "Never");
    assert_eq!(b.find("#edit-dev-expiration").unwrap().style("display"), "inline");
    assert_eq!(flash_text(&b), "Device expiration saved");
}

#[test]
fn choosing_specific_fills_in_now() {
    let (b, _page) = device_page();
    b.find("#dev-exp-sel").unwrap().input("specific");
    let val = b.find("#dev-exp-val").unwrap();
    assert_eq!(val.value().len(), "2030-01-01 00:00".len());
    assert_eq!(val.style("display"), "inline");
}

#[test]
fn device_page_description_edit() {
    let (b, page) = device_page();
    b.find("#edit-dev-desc").unwrap().click();
    let input = b.find(&format!("#{PROMPT_INPUT_ID}")).unwrap();
    assert_eq!(input.value(), "printer");
    input.set_value("lobby printer");
    page.modal.ok();

    let req = b.last_request().unwrap();
    assert_eq!(req.path(), "/api/device/mac/cc%3Acc%3Acc%3Acc%3Acc%3Acc/description");
    assert_eq!(req.form().get("description"), Some("lobby printer"));
    b.respond(200, "");
    assert_eq!(b.find("#device-desc").unwrap().text(), "lobby printer");
    assert_eq!(flash_text(&b), "Device description saved");
}
