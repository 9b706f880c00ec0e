use std::sync::Once;

static LOGGER_INIT: Once = Once::new();
static PANIC_HOOK: Once = Once::new();

/// Route the `log` facade to the browser console.
pub fn init_logging(level: log::Level) {
    LOGGER_INIT.call_once(|| {
        wasm_logger::init(wasm_logger::Config::new(level));
    });
}

pub fn install_panic_hook() {
    PANIC_HOOK.call_once(console_error_panic_hook::set_once);
}
