//! `/admin/manage/device/<mac>`: single-device admin page.

use std::cell::RefCell;
use std::rc::Rc;

use crate::controllers::target_value;
use crate::dom::DomEvent;
use crate::page::Page;
use crate::platform::Browser;

/// Buttons that act on the device after a yes/no question.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceAction {
    Delete,
    Flag,
    Unflag,
    Blacklist,
    Unblacklist,
}

impl DeviceAction {
    pub const ALL: [DeviceAction; 5] = [
        DeviceAction::Delete,
        DeviceAction::Unflag,
        DeviceAction::Flag,
        DeviceAction::Unblacklist,
        DeviceAction::Blacklist,
    ];

    pub fn button(self) -> &'static str {
        match self {
            DeviceAction::Delete => "#delete-btn",
            DeviceAction::Flag => "#flag-dev-btn",
            DeviceAction::Unflag => "#unflag-dev-btn",
            DeviceAction::Blacklist => "#blacklist-btn",
            DeviceAction::Unblacklist => "#unblacklist-btn",
        }
    }

    pub fn question(self) -> &'static str {
        match self {
            DeviceAction::Delete => "Are you sure you want to delete this device?",
            DeviceAction::Flag => "Are you sure you want to flag this device?",
            DeviceAction::Unflag => "Are you sure you want to unflag this device?",
            DeviceAction::Blacklist => "Are you sure you want to blacklist this device?",
            DeviceAction::Unblacklist => {
                "Are you sure you want to remove this device from the blacklist?"
            }
        }
    }

    pub fn failure(self) -> &'static str {
        match self {
            DeviceAction::Delete => "Error deleting device",
            DeviceAction::Flag => "Error flagging device",
            DeviceAction::Unflag => "Error unflagging device",
            DeviceAction::Blacklist => "Error blacklisting device",
            DeviceAction::Unblacklist => "Error removing device from blacklist",
        }
    }
}

fn mac_address<B: Browser>(page: &Page<B>) -> String {
    page.select("#mac-address").text()
}

pub fn init<B: Browser>(page: &Page<B>) {
    for action in DeviceAction::ALL {
        let p = page.clone();
        page.select(action.button()).click(move |_| {
            let q = p.clone();
            p.confirm_then(action.question(), move || run(&q, action));
        });
    }

    let p = page.clone();
    page.select("#reassign-btn").click(move |_| {
        let q = p.clone();
        p.prompt_then("New owner's username:", "", move |owner| {
            q.api.reassign_devices(
                &owner,
                &[mac_address(&q)],
                q.reload_on_ok(),
                q.fail_with_server_message(),
            );
        });
    });

    let p = page.clone();
    page.select("#edit-dev-desc").click(move |e| {
        e.stop_propagation();
        let q = p.clone();
        let current = p.select("#device-desc").text();
        p.prompt_then("Device Description:", &current, move |desc| {
            save_description(&q, desc)
        });
    });

    init_expiration_editor(page);
}

fn run<B: Browser>(page: &Page<B>, action: DeviceAction) {
    let mac = mac_address(page);
    let ok = page.reload_on_ok();
    let err = page.fail_with(action.failure());
    let api = &page.api;
    match action {
        DeviceAction::Delete => {
            api.delete_devices(&page.select("#username").value(), &[mac], ok, err)
        }
        DeviceAction::Flag => api.flag_device(&mac, true, ok, err),
        DeviceAction::Unflag => api.flag_device(&mac, false, ok, err),
        DeviceAction::Blacklist => api.blacklist_devices(&[mac], ok, err),
        DeviceAction::Unblacklist => api.unblacklist_devices(&[mac], ok, err),
    }
}

fn save_description<B: Browser>(page: &Page<B>, desc: String) {
    let p = page.clone();
    let saved = desc.clone();
    page.api.save_device_description(
        &mac_address(page),
        &desc,
        move |_| {
            p.select("#device-desc").set_text(&saved);
            p.flash.success("Device description saved");
        },
        page.fail_with_server_message(),
    );
}

/// Inline expiration editor: the text in `#device-expiration` is swapped
/// for a type select and value box until saved or cancelled.
fn init_expiration_editor<B: Browser>(page: &Page<B>) {
    let previous = Rc::new(RefCell::new(String::new()));

    let (p, prev) = (page.clone(), previous.clone());
    page.select("#edit-dev-expiration").click(move |e| {
        e.stop_propagation();
        let shown = p.select("#device-expiration");
        let old = shown.text();
        shown.set_text("");
        let kind = p.select("#dev-exp-sel");
        match old.as_str() {
            "Never" => {
                kind.set_value("never");
            }
            "Rolling" => {
                kind.set_value("rolling");
            }
            _ => {
                kind.set_value("specific");
                p.select("#dev-exp-val")
                    .set_value(&old)
                    .set_style("display", "inline");
            }
        }
        *prev.borrow_mut() = old;
        p.select("#edit-dev-expiration").set_style("display", "none");
        p.select("#edit-expire-controls").set_style("display", "inline");
        p.select("#confirmation-icons").set_style("display", "inline");
    });

    let p = page.clone();
    page.select("#dev-exp-sel").change(move |e| {
        if target_value(e) == "specific" {
            p.set_textbox_to_today("#dev-exp-val");
            p.select("#dev-exp-val").set_style("display", "inline");
        } else {
            p.select("#dev-exp-val").set_style("display", "none");
        }
    });

    let (p, prev) = (page.clone(), previous);
    page.select("#dev-expiration-cancel").click(move |e| {
        e.stop_propagation();
        close_expiration_editor(&p, &prev.borrow());
    });

    let p = page.clone();
    page.select("#dev-expiration-ok").click(move |e| {
        e.stop_propagation();
        let ok = p.clone();
        p.api.save_device_expiration(
            &mac_address(&p),
            &p.select("#dev-exp-sel").value(),
            &p.select("#dev-exp-val").value(),
            move |reply| {
                let text = reply
                    .data()
                    .map(|d| d.new_expiration.clone())
                    .unwrap_or_default();
                close_expiration_editor(&ok, &text);
                ok.flash.success("Device expiration saved");
            },
            p.fail_with_server_message(),
        );
    });
}

fn close_expiration_editor<B: Browser>(page: &Page<B>, text: &str) {
    page.select("#edit-expire-controls").set_style("display", "none");
    page.select("#confirmation-icons").set_style("display", "none");
    page.select("#device-expiration").set_text(text);
    page.select("#dev-exp-val").set_value("");
    page.select("#edit-dev-expiration").set_style("display", "inline");
}
