//! Login and registration pages driven through the headless browser

use std::rc::Rc;

use pg_portal::ajax::Method;
use pg_portal::controllers::{self, register};
use pg_portal::dom::mem::MemNode;
use pg_portal::dom::DomNode;
use pg_portal::platform::headless::HeadlessBrowser;
use pg_portal::{Page, PageId, PortalConfig};

fn flash_region() -> MemNode {
    MemNode::new("div")
        .with_id("flashDiv")
        .with_child(MemNode::new("span").with_id("flash-text"))
}

fn input(name: &str, value: &str) -> MemNode {
    MemNode::new("input").with_name(name).with_value(value)
}

fn flash_text(b: &HeadlessBrowser) -> String {
    b.find("#flash-text").unwrap().html()
}

fn login_page(user: &str, pass: &str) -> (Rc<HeadlessBrowser>, Page<HeadlessBrowser>) {
    let b = Rc::new(HeadlessBrowser::new());
    b.mount([
        flash_region(),
        input("username", user),
        input("password", pass),
        MemNode::new("button").with_id("login-btn").with_text("Login"),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(&page, &PageId::Login);
    (b, page)
}

#[test]
fn login_needs_both_fields() {
    let (b, _page) = login_page("alice", "");
    b.find("#login-btn").unwrap().click();
    assert!(b.requests().is_empty());
}

#[test]
fn bad_credentials_restore_the_button() {
    let (b, _page) = login_page("alice", "wrong");
    let button = b.find("#login-btn").unwrap();
    button.click();

    assert!(button.disabled());
    assert_eq!(button.text(), "Logging in...");
    let req = b.last_request().unwrap();
    assert_eq!((req.method, req.url.as_str()), (Method::Post, "/login"));
    assert_eq!(req.form().get("password"), Some("wrong"));

    b.respond(401, "");
    assert!(!button.disabled());
    assert_eq!(button.text(), "Login");
    assert_eq!(flash_text(&b), "Incorrect username or password");
    assert!(b.navigations().is_empty());
}

#[test]
fn other_login_failures_are_unknown() {
    let (b, _page) = login_page("alice", "pw");
    b.find("#login-btn").unwrap().click();
    b.respond(500, r#"{"Message":"db down"}"#);
    assert_eq!(flash_text(&b), "Unknown error");
}

#[test]
fn enter_in_a_field_submits_and_success_lands_home() {
    let (b, _page) = login_page("alice", "pw");
    let pass = b.find("[name=password]").unwrap();
    pass.key_up("a");
    assert!(b.requests().is_empty());
    pass.key_up("Enter");
    assert_eq!(b.requests().len(), 1);
    b.respond(200, "");
    assert_eq!(b.navigations(), vec!["/".to_string()]);
}

fn register_page(fields: Vec<MemNode>) -> (Rc<HeadlessBrowser>, Page<HeadlessBrowser>) {
    let b = Rc::new(HeadlessBrowser::new());
    b.mount([flash_region()]);
    b.mount(fields);
    b.mount([
        input("dev-desc", "my laptop"),
        MemNode::new("div").with_class("register-box"),
        MemNode::new("div").with_id("suc-msg-auto"),
        MemNode::new("button")
            .with_id(register::REGISTER_BTN.trim_start_matches('#'))
            .with_text("Register"),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(&page, &PageId::Register);
    (b, page)
}

fn click_register(b: &HeadlessBrowser) {
    b.find("#register-btn").unwrap().click();
}

#[test]
fn automatic_registration_shows_the_success_box() {
    let (b, _page) = register_page(vec![input("username", "alice")]);
    click_register(&b);

    let req = b.last_request().unwrap();
    assert_eq!(req.url, "/api/device");
    let form = req.form();
    assert_eq!(form.get("username"), Some("alice"));
    assert_eq!(form.get("mac-address"), Some(""));
    assert_eq!(form.get("description"), Some("my laptop"));

    b.respond(200, r#"{"Code":0,"Message":"","Data":null}"#);
    assert_eq!(b.find("#suc-msg-auto").unwrap().style("display"), "block");
    assert_eq!(b.find(".register-box").unwrap().style("display"), "none");
    assert_eq!(flash_text(&b), "Registration successful");
    assert!(b.navigations().is_empty());
    assert_eq!(b.scrolls(), 1);
    // Already signed in: no logout.
    assert_eq!(b.requests().len(), 1);
}

#[test]
fn rendered_but_empty_fields_block_submission() {
    let (b, _page) = register_page(vec![
        input("username", "alice"),
        input("mac-address", ""),
        input("platform", "Linux"),
    ]);
    click_register(&b);
    assert!(b.requests().is_empty());
    let button = b.find("#register-btn").unwrap();
    assert!(!button.disabled());
    assert_eq!(button.text(), "Register");
}

#[test]
fn signed_out_manual_registration_logs_in_then_out() {
    let (b, _page) = register_page(vec![
        input("username", "alice"),
        input("password", "pw"),
        input("mac-address", "12:34:56:78:9a:bc"),
        input("platform", "Linux"),
    ]);
    click_register(&b);
    assert_eq!(b.last_request().unwrap().url, "/login");

    b.respond(200, "");
    let reg = b.last_request().unwrap();
    assert_eq!(reg.url, "/api/device");
    assert_eq!(reg.form().get("password"), None);

    b.respond(
        200,
        r#"{"Message":"","Data":{"Location":"/manage/device/12:34:56:78:9a:bc"}}"#,
    );
    let urls: Vec<String> = b.requests().into_iter().map(|r| r.url).collect();
    assert_eq!(urls, vec!["/login", "/api/device", "/logout?noredirect"]);
    assert_eq!(b.navigations(), vec!["/manage/device/12:34:56:78:9a:bc".to_string()]);
}

#[test]
fn failed_login_never_registers() {
    let (b, _page) = register_page(vec![input("username", "alice"), input("password", "bad")]);
    click_register(&b);
    b.respond(401, "");
    assert_eq!(b.requests().len(), 1);
    assert_eq!(flash_text(&b), "Incorrect username or password");
    assert!(!b.find("#register-btn").unwrap().disabled());
}

#[test]
fn server_errors_are_flashed_and_the_session_dropped() {
    let (b, _page) = register_page(vec![input("username", "alice"), input("password", "pw")]);
    click_register(&b);
    b.respond(200, "");
    b.respond(500, r#"{"Message":"no leases"}"#);

    assert_eq!(flash_text(&b), "Internal Server Error - no leases");
    assert_eq!(b.last_request().unwrap().url, "/logout?noredirect");
    assert_eq!(b.find("#register-btn").unwrap().text(), "Register");
}

fn guest_page() -> Rc<HeadlessBrowser> {
    let b = Rc::new(HeadlessBrowser::new());
    b.mount([
        flash_region(),
        MemNode::new("img")
            .with_id("captchaImage")
            .with_attr("src", "/captcha/abc.png"),
        MemNode::new("audio")
            .with_id("captchaAudio")
            .with_attr("src", "/captcha/abc.wav?lang=en"),
        MemNode::new("a").with_id("reload-captcha-btn"),
        MemNode::new("a").with_id("play-captcha-btn"),
    ]);
    let page = Page::new(b.clone(), PortalConfig::default());
    controllers::init(&page, &pg_portal::router::parse("/register/guest").unwrap());
    b
}

#[test]
fn captcha_reload_busts_the_cache() {
    let b = guest_page();
    let ev = b.find("#reload-captcha-btn").unwrap().click();
    assert!(ev.was_prevented());

    let img = b.find("#captchaImage").unwrap().attr("src").unwrap();
    let stamp = img.strip_prefix("/captcha/abc.png?reload=").unwrap();
    assert!(!stamp.is_empty() && stamp.chars().all(|c| c.is_ascii_digit()));
    let audio = b.find("#captchaAudio").unwrap().attr("src").unwrap();
    assert_eq!(audio, format!("/captcha/abc.wav?{stamp}"));
    assert!(b.requests().is_empty());
}

#[test]
fn captcha_audio_is_shown_and_played() {
    let b = guest_page();
    let audio = b.find("#captchaAudio").unwrap();
    assert_eq!(audio.attr("autoplay"), None);

    b.find("#play-captcha-btn").unwrap().click();
    assert_eq!(audio.attr("src").as_deref(), Some("/captcha/abc.wav?lang=en"));
    assert_eq!(audio.style("display"), "block");
    assert!(audio.attr("autoplay").is_some());
}
