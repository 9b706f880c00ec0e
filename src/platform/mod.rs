//! Platform abstraction (clock, timers, navigation, shared bits).
//!
//! Everything above this layer is written against the traits here plus
//! [`crate::dom::Document`] and [`crate::ajax::Transport`]. `web` backs them
//! with web-sys; `headless` with an in-memory document and a virtual clock.

use crate::ajax::Transport;
use crate::dom::Document;

pub mod headless;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "dom-web", target_arch = "wasm32"))] {
        pub mod web;
        mod runtime_wasm;
        pub use runtime_wasm::{init_logging, install_panic_hook};
    } else {
        mod runtime_native;
        pub use runtime_native::{init_logging, install_panic_hook};
    }
}

/// Handle returned by [`Scheduler::set_timeout`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(pub i32);

/// Clock, animation frames and one-shot timers.
pub trait Scheduler {
    /// Milliseconds on the same timeline as frame timestamps.
    fn now_ms(&self) -> f64;
    /// Run `callback` before the next repaint with the frame timestamp.
    fn request_frame(&self, callback: Box<dyn FnOnce(f64)>);
    fn set_timeout(&self, delay_ms: u32, callback: Box<dyn FnOnce()>) -> TimerId;
    /// Cancel a pending timer; unknown or fired ids are ignored.
    fn clear_timeout(&self, id: TimerId);
}

/// Full-page navigation and window geometry.
pub trait Navigator {
    fn navigate(&self, url: &str);
    fn reload(&self);
    fn scroll_to_top(&self);
    fn location_path(&self) -> String;
    /// Fragment without the leading `#`.
    fn location_hash(&self) -> String;
    /// `(innerWidth, innerHeight)`.
    fn viewport(&self) -> (f64, f64);
}

/// Everything a page needs from its host.
pub trait Browser:
    Document + Scheduler + Navigator + Transport + 'static
{
}

impl<T> Browser for T where T: Document + Scheduler + Navigator + Transport + 'static {}
