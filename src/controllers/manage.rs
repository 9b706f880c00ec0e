//! Device list actions shared by `/manage` and the admin manage page.

use crate::ajax::encode_component;
use crate::controllers::checked_devices;
use crate::dom::{DomEvent, ElementSet};
use crate::error::message_for;
use crate::page::Page;
use crate::platform::Browser;

pub fn init<B: Browser>(page: &Page<B>) {
    let p = page.clone();
    page.select("[name=add-device-btn]").click(move |e| {
        let from_admin = e
            .target()
            .map(|t| ElementSet::from_node(t).data("admin").is_some())
            .unwrap_or(false);
        let url = if from_admin {
            format!(
                "/register?manual=1&username={}",
                encode_component(&p.select("[name=username]").value())
            )
        } else {
            "/register?manual=1".to_string()
        };
        p.browser.navigate(&url);
    });

    let p = page.clone();
    page.select("[name=del-selected-btn]").click(move |_| {
        let q = p.clone();
        p.confirm_then("Are you sure you want to delete selected devices?", move || {
            delete_selected(&q)
        });
    });

    let p = page.clone();
    page.select(".device-checkbox-target").click(move |_| {
        p.select("#select-all-checkbox").set_checked(false);
    });

    let p = page.clone();
    page.select(".edit-dev-desc").click(move |e| {
        e.stop_propagation();
        let Some(id) = e.target().and_then(|t| ElementSet::from_node(t).data("device")) else {
            return;
        };
        let current = p.select(&format!("#device-{id}-desc")).text();
        let q = p.clone();
        p.prompt_then("Device Description:", &current, move |desc| {
            save_description(&q, &id, desc)
        });
    });

    let p = page.clone();
    page.select("#select-all").click(move |_| {
        let state = !p.select("#select-all-checkbox").checked();
        p.select(".device-checkbox").set_checked(state);
    });
}

fn save_description<B: Browser>(page: &Page<B>, id: &str, desc: String) {
    let mac = page.select(&format!("#device-{id}-mac")).text();
    let target = page.select(&format!("#device-{id}-desc"));
    let flash = page.flash.clone();
    let err = page.flash.clone();
    let saved = desc.clone();
    page.api.save_device_description(
        mac.trim(),
        &desc,
        move |_| {
            target.set_text(&saved);
            flash.success("Device description saved");
        },
        move |resp| err.failure(&message_for(resp)),
    );
}

fn delete_selected<B: Browser>(page: &Page<B>) {
    let devices = checked_devices(page);
    if devices.is_empty() {
        return;
    }
    page.api.delete_devices(
        &page.select("[name=username]").value(),
        &devices,
        page.reload_on_ok(),
        page.fail_with("Error deleting devices"),
    );
}
