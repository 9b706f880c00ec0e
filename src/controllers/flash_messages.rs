//! Show the flash message the server rendered into the page, if any.

use crate::page::Page;
use crate::platform::Browser;

pub fn init<B: Browser>(page: &Page<B>) {
    page.flash.show_server_rendered();
}
