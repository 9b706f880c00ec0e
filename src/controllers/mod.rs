//! Page controllers.
//!
//! Each page module exposes `init`, which binds handlers to the elements
//! that page renders. [`init`] picks the modules for a routed page; pages
//! that share markup (the user and admin device lists) share modules.

pub mod admin_user;
pub mod admin_users;
pub mod captcha;
pub mod device_list;
pub mod flash_messages;
pub mod login;
pub mod manage;
pub mod manage_admin;
pub mod manage_device;
pub mod register;

use crate::debug::{self, cat};
use crate::dom::{DomEvent, DomNode, ElementSet};
use crate::page::Page;
use crate::platform::Browser;
use crate::router::PageId;

/// Wire up `id` on a freshly loaded page. Every page shows the
/// server-rendered flash first.
pub fn init<B: Browser>(page: &Page<B>, id: &PageId) {
    debug::log(cat::ROUTER, format!("init {}", id.name()));
    flash_messages::init(page);
    match id {
        PageId::Login => login::init(page),
        PageId::Register => register::init(page),
        PageId::GuestRegister => captcha::init(page),
        PageId::Manage => {
            device_list::init(page, false);
            manage::init(page);
        }
        PageId::AdminManageUser { .. } => {
            device_list::init(page, false);
            manage::init(page);
            manage_admin::init(page);
        }
        PageId::AdminDevice { .. } => manage_device::init(page),
        PageId::AdminUsers => admin_users::init(page),
        PageId::AdminUser { .. } => admin_user::init(page),
        PageId::AdminSearch => device_list::init(page, true),
    }
}

/// Values of the checked `.device-checkbox` inputs, in page order.
pub fn checked_devices<B: Browser>(page: &Page<B>) -> Vec<String> {
    page.select(".device-checkbox:checked").map(|n| n.value())
}

/// Value of the element an event was dispatched to.
pub fn target_value<E>(e: &E) -> String
where
    E: DomEvent,
    E::Node: DomNode,
{
    e.target()
        .map(|t| ElementSet::from_node(t).value())
        .unwrap_or_default()
}
