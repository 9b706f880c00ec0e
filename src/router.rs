//! Page router for the portal
//!
//! Maps the location path of a full page load to the page whose controller
//! should be initialized.
//!
//! ## Supported Paths
//!
//! - `/login` - login form
//! - `/register` - device registration (self-service and manual)
//! - `/register/guest` - guest registration with a captcha
//! - `/manage` - the signed-in user's device list
//! - `/admin/manage/user/<username>` - a user's device list, admin view
//! - `/admin/manage/device/<mac>` - one device, admin view
//! - `/admin/users` - user list with the "new user" form
//! - `/admin/users/<username>` - user edit form
//! - `/admin/search` - device search results
//!
//! ## Overrides
//!
//! Templates may set `<body data-page="...">`; [`from_hint`] resolves that
//! name and wins over the path.
//!
//! ## Example
//!
//! ```rust
//! use pg_portal::router::{parse, PageId};
//!
//! assert_eq!(parse("/admin/users/alice?x=1"), Some(PageId::AdminUser { username: "alice".into() }));
//! ```

use crate::debug::{self, cat};

/// Strip query and fragment from URL path
#[inline]
fn strip_query_frag(s: &str) -> &str {
    s.find(['?', '#']).map(|i| &s[..i]).unwrap_or(s)
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Pages with client-side behavior.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PageId {
    Login,
    Register,
    GuestRegister,
    Manage,
    AdminManageUser { username: String },
    AdminDevice { mac: String },
    AdminUsers,
    AdminUser { username: String },
    AdminSearch,
}

impl PageId {
    /// `data-page` name for this page.
    pub fn name(&self) -> &'static str {
        match self {
            PageId::Login => "login",
            PageId::Register => "register",
            PageId::GuestRegister => "register-guest",
            PageId::Manage => "manage",
            PageId::AdminManageUser { .. } => "admin-manage",
            PageId::AdminDevice { .. } => "admin-device",
            PageId::AdminUsers => "admin-users",
            PageId::AdminUser { .. } => "admin-user",
            PageId::AdminSearch => "admin-search",
        }
    }
}

/// Parse a location path (`/admin/users/bob`, `admin/search?q=x`).
///
/// Returns `None` for pages without client-side behavior.
pub fn parse(raw: &str) -> Option<PageId> {
    let path = strip_query_frag(raw.trim());
    let mut segments = path.split('/').filter(|s| !s.is_empty());

    let page = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some("login"), None, ..) => Some(PageId::Login),
        (Some("register"), None, ..) => Some(PageId::Register),
        (Some("register"), Some("guest"), None, _) => Some(PageId::GuestRegister),
        (Some("manage"), None, ..) => Some(PageId::Manage),
        (Some("admin"), Some("search"), None, _) => Some(PageId::AdminSearch),
        (Some("admin"), Some("users"), None, _) => Some(PageId::AdminUsers),
        (Some("admin"), Some("users"), Some(user), None) => Some(PageId::AdminUser {
            username: decode(user),
        }),
        (Some("admin"), Some("manage"), Some("user"), Some(user)) => {
            Some(PageId::AdminManageUser {
                username: decode(user),
            })
        }
        (Some("admin"), Some("manage"), Some("device"), Some(mac)) => Some(PageId::AdminDevice {
            mac: decode(mac),
        }),
        _ => None,
    };
    // Trailing segments beyond the ones matched are not a page we know.
    let page = if segments.next().is_some() { None } else { page };
    debug::log(cat::ROUTER, format!("{raw:?} -> {page:?}"));
    page
}

/// Resolve a `data-page` hint. Pages that carry a path parameter take it
/// from `path`, since the hint only names the page.
pub fn from_hint(hint: &str, path: &str) -> Option<PageId> {
    let from_path = parse(path);
    let page = match hint.trim().to_ascii_lowercase().as_str() {
        "login" => PageId::Login,
        "register" => PageId::Register,
        "register-guest" => PageId::GuestRegister,
        "manage" => PageId::Manage,
        "admin-users" => PageId::AdminUsers,
        "admin-search" => PageId::AdminSearch,
        "admin-manage" => match from_path {
            Some(p @ PageId::AdminManageUser { .. }) => p,
            _ => PageId::AdminManageUser {
                username: String::new(),
            },
        },
        "admin-device" => match from_path {
            Some(p @ PageId::AdminDevice { .. }) => p,
            _ => PageId::AdminDevice { mac: String::new() },
        },
        "admin-user" => match from_path {
            Some(p @ PageId::AdminUser { .. }) => p,
            _ => PageId::AdminUser {
                username: String::new(),
            },
        },
        _ => return from_path,
    };
    Some(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_pages() {
        assert_eq!(parse("/login"), Some(PageId::Login));
        assert_eq!(parse("/register?manual=1"), Some(PageId::Register));
        assert_eq!(parse("/register/guest"), Some(PageId::GuestRegister));
        assert_eq!(parse("/register/guest/verify"), None);
        assert_eq!(parse("/manage/"), Some(PageId::Manage));
        assert_eq!(parse("/admin/users"), Some(PageId::AdminUsers));
        assert_eq!(parse("/admin/search?q=aa"), Some(PageId::AdminSearch));
    }

    #[test]
    fn test_parse_parameterized_pages() {
        assert_eq!(
            parse("/admin/users/bob%20smith"),
            Some(PageId::AdminUser {
                username: "bob smith".to_string()
            })
        );
        assert_eq!(
            parse("/admin/manage/user/alice"),
            Some(PageId::AdminManageUser {
                username: "alice".to_string()
            })
        );
        assert_eq!(
            parse("/admin/manage/device/12:34:56:ab:cd:ef#top"),
            Some(PageId::AdminDevice {
                mac: "12:34:56:ab:cd:ef".to_string()
            })
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse("/"), None);
        assert_eq!(parse(""), None);
        assert_eq!(parse("/admin"), None);
        assert_eq!(parse("/admin/reports"), None);
        assert_eq!(parse("/login/extra"), None);
        assert_eq!(parse("/admin/manage/user/alice/extra"), None);
    }

    #[test]
    fn test_hint_overrides_path() {
        assert_eq!(from_hint("manage", "/whatever"), Some(PageId::Manage));
        assert_eq!(
            from_hint("admin-user", "/admin/users/carol"),
            Some(PageId::AdminUser {
                username: "carol".to_string()
            })
        );
        assert_eq!(from_hint("", "/login"), Some(PageId::Login));
        assert_eq!(from_hint("nope", "/nowhere"), None);
    }

    #[test]
    fn test_names_round_trip_through_hints() {
        for p in [
            PageId::Login,
            PageId::Register,
            PageId::GuestRegister,
            PageId::Manage,
            PageId::AdminUsers,
            PageId::AdminSearch,
        ] {
            assert_eq!(from_hint(p.name(), "/"), Some(p));
        }
    }
}
