//! Opacity fades driven by animation frames.
//!
//! Each frame moves opacity by `elapsed / duration` since the previous
//! frame, so the animation tracks wall time even when frames are dropped.
//! It is approximate: the last frame overshoots and gets clamped.

use std::rc::Rc;

use crate::debug::{self, cat};
use crate::dom::{DomNode, ElementSet};
use crate::platform::Scheduler;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

impl FadeDirection {
    fn start_opacity(self) -> f64 {
        match self {
            FadeDirection::In => 0.0,
            FadeDirection::Out => 1.0,
        }
    }
}

/// Pure interpolation state; the scheduler plumbing lives in [`FadeTask`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    direction: FadeDirection,
    duration_ms: f64,
    opacity: f64,
    last_ms: f64,
}

impl Fade {
    pub fn new(direction: FadeDirection, duration_ms: u32, now_ms: f64) -> Self {
        Fade {
            direction,
            duration_ms: f64::from(duration_ms),
            opacity: direction.start_opacity(),
            last_ms: now_ms,
        }
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// Advance to `now_ms`. Returns `true` once the end bound is reached.
    pub fn step(&mut self, now_ms: f64) -> bool {
        let elapsed = (now_ms - self.last_ms).max(0.0);
        self.last_ms = now_ms;
        let delta = if self.duration_ms <= 0.0 {
            1.0
        } else {
            elapsed / self.duration_ms
        };
        self.opacity = match self.direction {
            FadeDirection::In => (self.opacity + delta).min(1.0),
            FadeDirection::Out => (self.opacity - delta).max(0.0),
        };
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        match self.direction {
            FadeDirection::In => self.opacity >= 1.0,
            FadeDirection::Out => self.opacity <= 0.0,
        }
    }

    /// Start a fade over `set`; `on_done` runs once when it finishes.
    pub fn start<N: DomNode, S: Scheduler + 'static>(
        set: ElementSet<N>,
        direction: FadeDirection,
        duration_ms: u32,
        sched: &Rc<S>,
        on_done: impl FnOnce() + 'static,
    ) {
        let fade = Fade::new(direction, duration_ms, sched.now_ms());
        apply_opacity(&set, fade.opacity, false);
        debug::log(
            cat::FADE,
            format!("{direction:?} over {duration_ms}ms on {} nodes", set.len()),
        );
        let task = FadeTask {
            set,
            fade,
            sched: sched.clone(),
            on_done: Box::new(on_done),
        };
        task.schedule();
    }
}

fn apply_opacity<N: DomNode>(set: &ElementSet<N>, opacity: f64, legacy_filter: bool) {
    let value = format_opacity(opacity);
    set.set_style("opacity", &value);
    if legacy_filter {
        set.set_style("filter", &format!("alpha(opacity={})", (opacity * 100.0) as i32));
    } else {
        set.set_style("filter", "");
    }
}

fn format_opacity(opacity: f64) -> String {
    let s = format!("{opacity:.4}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s.is_empty() {
        "0".to_string()
    } else {
        s.to_string()
    }
}

struct FadeTask<N: DomNode, S: Scheduler + 'static> {
    set: ElementSet<N>,
    fade: Fade,
    sched: Rc<S>,
    on_done: Box<dyn FnOnce()>,
}

impl<N: DomNode, S: Scheduler + 'static> FadeTask<N, S> {
    fn schedule(self) {
        let sched = self.sched.clone();
        sched.request_frame(Box::new(move |ts| self.tick(ts)));
    }

    fn tick(mut self, now_ms: f64) {
        let done = self.fade.step(now_ms);
        apply_opacity(&self.set, self.fade.opacity, true);
        if done {
            debug::log(cat::FADE, format!("{:?} done", self.fade.direction));
            (self.on_done)();
        } else {
            self.schedule();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_in_reaches_one_and_stops() {
        let mut f = Fade::new(FadeDirection::In, 500, 0.0);
        assert_eq!(f.opacity(), 0.0);
        assert!(!f.step(250.0));
        assert!((f.opacity() - 0.5).abs() < 1e-9);
        assert!(f.step(600.0));
        assert_eq!(f.opacity(), 1.0);
    }

    #[test]
    fn fade_out_clamps_at_zero() {
        let mut f = Fade::new(FadeDirection::Out, 100, 0.0);
        assert!(f.step(1000.0));
        assert_eq!(f.opacity(), 0.0);
    }

    #[test]
    fn clock_going_backwards_does_not_reverse() {
        let mut f = Fade::new(FadeDirection::In, 100, 50.0);
        f.step(40.0);
        assert_eq!(f.opacity(), 0.0);
    }

    #[test]
    fn zero_duration_finishes_on_first_frame() {
        let mut f = Fade::new(FadeDirection::In, 0, 0.0);
        assert!(f.step(0.0));
    }

    #[test]
    fn opacity_formatting_is_compact() {
        assert_eq!(format_opacity(1.0), "1");
        assert_eq!(format_opacity(0.0), "0");
        assert_eq!(format_opacity(0.5), "0.5");
    }
}
