//! Pointer gesture trackers
//!
//! [`Drag`] follows a primary-button press on a handle and turns cursor
//! movement into a new position for the element being dragged.
//! [`ClickIntent`] tells a click apart from a press that moved (text
//! selection, scrolling a list with the mouse held down).

/// Primary mouse button as reported by `MouseEvent.button`.
pub const PRIMARY_BUTTON: i16 = 0;

/// Drag-to-move tracker.
///
/// # Example
/// ```
/// use pg_portal::util::drag::Drag;
///
/// let mut drag = Drag::default();
/// // Press on the handle at (100, 50); the element sits at (390, 275).
/// assert!(drag.begin(0, 100.0, 50.0, (390.0, 275.0)));
/// // Cursor moved 20 right, 5 down.
/// assert_eq!(drag.move_to(120.0, 55.0), Some((410.0, 280.0)));
/// drag.end();
/// assert_eq!(drag.move_to(200.0, 200.0), None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Drag {
    /// (cursor at press, element origin at press)
    anchor: Option<((f64, f64), (f64, f64))>,
}

impl Drag {
    /// Start tracking. Only the primary button starts a drag.
    pub fn begin(&mut self, button: i16, x: f64, y: f64, origin: (f64, f64)) -> bool {
        if button != PRIMARY_BUTTON {
            return false;
        }
        self.anchor = Some(((x, y), origin));
        true
    }

    /// New element position for the cursor at `(x, y)`, or `None` when no
    /// drag is in progress.
    pub fn move_to(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        let ((sx, sy), (ox, oy)) = self.anchor?;
        Some((ox + (x - sx), oy + (y - sy)))
    }

    pub fn end(&mut self) {
        self.anchor = None;
    }

    pub fn is_active(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Click-versus-drag detector: a press followed by a release with no
/// movement in between is a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickIntent {
    pressed: bool,
}

impl ClickIntent {
    pub fn press(&mut self) {
        self.pressed = true;
    }

    pub fn moved(&mut self) {
        self.pressed = false;
    }

    /// Whether the click that just landed should count.
    pub fn is_click(&self) -> bool {
        self.pressed
    }
}

/// Parse a CSS pixel length (`"390px"`, `"12.5px"`, `"0"`); anything else is 0.
pub fn parse_px(value: &str) -> f64 {
    value
        .trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_primary_button_drags() {
        let mut d = Drag::default();
        assert!(!d.begin(2, 0.0, 0.0, (0.0, 0.0)));
        assert!(!d.is_active());
        assert!(d.begin(PRIMARY_BUTTON, 0.0, 0.0, (0.0, 0.0)));
        assert!(d.is_active());
    }

    #[test]
    fn movement_is_relative_to_the_press() {
        let mut d = Drag::default();
        d.begin(0, 300.0, 300.0, (390.0, 275.0));
        assert_eq!(d.move_to(250.0, 310.0), Some((340.0, 285.0)));
        assert_eq!(d.move_to(300.0, 300.0), Some((390.0, 275.0)));
    }

    #[test]
    fn click_intent() {
        let mut c = ClickIntent::default();
        assert!(!c.is_click());
        c.press();
        assert!(c.is_click());
        c.moved();
        assert!(!c.is_click());
    }

    #[test]
    fn px_values() {
        assert_eq!(parse_px("390px"), 390.0);
        assert_eq!(parse_px(" 12.5px "), 12.5);
        assert_eq!(parse_px(""), 0.0);
        assert_eq!(parse_px("auto"), 0.0);
    }
}
