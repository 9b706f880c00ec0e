//! Admin additions to a user's device list: blacklist menu and reassign.

use crate::controllers::checked_devices;
use crate::dom::{DomEvent, ElementSet};
use crate::page::Page;
use crate::platform::Browser;

const BLACKLIST_SEL: &str = "[name=blacklist-sel]";

/// Entries of the blacklist `<select>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlacklistAction {
    BlacklistUser,
    UnblacklistUser,
    BlacklistAll,
    UnblacklistAll,
    BlacklistSelected,
    UnblacklistSelected,
}

impl BlacklistAction {
    /// Map a select value; `"username"` toggles depending on whether the
    /// user is already blacklisted.
    pub fn from_select(value: &str, user_blacklisted: bool) -> Option<BlacklistAction> {
        Some(match value {
            "username" if user_blacklisted => BlacklistAction::UnblacklistUser,
            "username" => BlacklistAction::BlacklistUser,
            "black-all" => BlacklistAction::BlacklistAll,
            "unblack-all" => BlacklistAction::UnblacklistAll,
            "black-sel" => BlacklistAction::BlacklistSelected,
            "unblack-sel" => BlacklistAction::UnblacklistSelected,
            _ => return None,
        })
    }

    pub fn question(self) -> &'static str {
        match self {
            BlacklistAction::BlacklistUser => "Add username to blacklist?",
            BlacklistAction::UnblacklistUser => "Remove username from blacklist?",
            BlacklistAction::BlacklistAll => "Add all user's devices to blacklist?",
            BlacklistAction::UnblacklistAll => "Remove all user's devices from blacklist?",
            BlacklistAction::BlacklistSelected => "Add selected user's devices to blacklist?",
            BlacklistAction::UnblacklistSelected => {
                "Remove selected user's devices from blacklist?"
            }
        }
    }
}

pub fn init<B: Browser>(page: &Page<B>) {
    let select = page.select(BLACKLIST_SEL);
    if select.data("blacklisted").as_deref() == Some("true") {
        page.select("[name=black-user-option]").set_text("Remove User");
    }

    let p = page.clone();
    select.change(move |e| {
        let Some(target) = e.target() else { return };
        let target = ElementSet::from_node(target);
        let blacklisted = target.data("blacklisted").as_deref() == Some("true");
        if let Some(action) = BlacklistAction::from_select(&target.value(), blacklisted) {
            let q = p.clone();
            p.confirm_then(action.question(), move || run(&q, action));
        }
        target.set_value("");
    });

    let p = page.clone();
    page.select("[name=reassign-selected-btn]").click(move |_| {
        let q = p.clone();
        p.prompt_then("New owner's username:", "", move |owner| {
            reassign_selected(&q, &owner)
        });
    });
}

fn run<B: Browser>(page: &Page<B>, action: BlacklistAction) {
    let username = page.select("[name=username]").value();
    let api = &page.api;
    match action {
        BlacklistAction::BlacklistUser => api.blacklist_user(
            &username,
            page.reload_on_ok(),
            page.fail_with("Error blacklisting user"),
        ),
        BlacklistAction::UnblacklistUser => api.unblacklist_user(
            &username,
            page.reload_on_ok(),
            page.fail_with("Error blacklisting user"),
        ),
        BlacklistAction::BlacklistAll => api.blacklist_all_devices(
            &username,
            page.reload_on_ok(),
            page.fail_with("Error blacklisting devices"),
        ),
        BlacklistAction::UnblacklistAll => api.unblacklist_all_devices(
            &username,
            page.reload_on_ok(),
            page.fail_with("Error removing devices from blacklist"),
        ),
        BlacklistAction::BlacklistSelected | BlacklistAction::UnblacklistSelected => {
            let devices = checked_devices(page);
            if devices.is_empty() {
                return;
            }
            if action == BlacklistAction::BlacklistSelected {
                api.blacklist_devices(
                    &devices,
                    page.reload_on_ok(),
                    page.fail_with("Error blacklisting devices"),
                );
            } else {
                api.unblacklist_devices(
                    &devices,
                    page.reload_on_ok(),
                    page.fail_with("Error removing devices from blacklist"),
                );
            }
        }
    }
}

fn reassign_selected<B: Browser>(page: &Page<B>, owner: &str) {
    let devices = checked_devices(page);
    if devices.is_empty() || owner.is_empty() {
        return;
    }
    page.api.reassign_devices(
        owner,
        &devices,
        page.reload_on_ok(),
        page.fail_with("Error reassigning devices"),
    );
}
