//! pg-portal - browser-side scripts for the Packet Guardian portal
//!
//! The portal's pages are rendered by the server; this crate adds the
//! interactive parts: login and registration forms, device and user
//! management actions, dialogs, and flash messages.
//!
//! ## Architecture
//!
//! Everything above [`platform`] is generic over a [`platform::Browser`]
//! (document, timers, navigation, HTTP transport), so it runs in two hosts:
//! - **Web**: `wasm32` with web-sys (`platform::web`, `pg-portal-web` binary)
//! - **Headless**: an in-memory document and virtual clock
//!   ([`platform::headless`]), used by the tests
//!
//! The same [`api::ApiClient`] also backs the `pg-portal` command-line
//! client over reqwest.
//!
//! ## Usage
//!
//! For the browser build:
//! ```bash
//! cargo build --target wasm32-unknown-unknown --no-default-features --features dom-web
//! ```
//!
//! For the CLI:
//! ```bash
//! cargo build --features native
//! ```

// Core modules (available on all platforms)
pub mod config;
pub mod debug;
pub mod error;
pub mod util;
pub mod util_text;

// DOM wrapper and animation
pub mod dom;
pub mod fade;

// Requests and the backend catalog
pub mod ajax;
pub mod api;

// Page furniture
pub mod flash;
pub mod modal;

// Page routing and per-page behavior
pub mod controllers;
pub mod page;
pub mod router;

// Platform abstraction layer
pub mod platform;

// Native HTTP transport (CLI only)
#[cfg(feature = "native")]
pub mod net;

// Re-export commonly used types
pub use ajax::{AjaxRequest, Response, Transport};
pub use api::{ApiClient, ApiReply};
pub use config::PortalConfig;
pub use error::Failure;
pub use page::Page;
pub use router::PageId;
