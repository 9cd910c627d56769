//! Timer primitives for the UI chrome.
//!
//! Explicit state machines driven by `Instant`s passed in from the
//! frame loop, which keeps them testable without a clock or a UI.

use std::time::{Duration, Instant};

/// Delay applied to the history panel toggle.
pub const HISTORY_TOGGLE_DEBOUNCE: Duration = Duration::from_millis(300);

/// Grace period before the user dropdown hides after the pointer
/// leaves both hover regions.
pub const DROPDOWN_HIDE_GRACE: Duration = Duration::from_millis(100);

/// Trailing-edge debouncer with cancel-on-retrigger semantics: each
/// trigger pushes the deadline out, and the action fires once when
/// the deadline passes undisturbed.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Arm (or re-arm) the debouncer. A pending deadline is
    /// replaced, never stacked.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True exactly once when the armed deadline has elapsed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// Dropdown visibility computed from two independent hover flags.
///
/// The menu stays visible while either the trigger icon or the menu
/// body is hovered. When both flags drop, hiding waits out a short
/// grace period so the pointer can travel between the two regions;
/// re-entering either region cancels the pending hide.
#[derive(Debug)]
pub struct HoverGrace {
    grace: Duration,
    icon_hovered: bool,
    menu_hovered: bool,
    visible: bool,
    hide_at: Option<Instant>,
}

impl HoverGrace {
    pub fn new(grace: Duration) -> Self {
        Self {
            grace,
            icon_hovered: false,
            menu_hovered: false,
            visible: false,
            hide_at: None,
        }
    }

    pub fn set_icon_hovered(&mut self, hovered: bool, now: Instant) {
        self.icon_hovered = hovered;
        self.update(now);
    }

    pub fn set_menu_hovered(&mut self, hovered: bool, now: Instant) {
        self.menu_hovered = hovered;
        self.update(now);
    }

    /// Advance the timer; call once per frame.
    pub fn poll(&mut self, now: Instant) {
        self.update(now);
        if let Some(hide_at) = self.hide_at {
            if now >= hide_at && !self.icon_hovered && !self.menu_hovered {
                self.visible = false;
                self.hide_at = None;
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Force-hide, e.g. after a menu action was clicked. Clears the
    /// hover flags so a stale flag cannot revive the menu.
    pub fn dismiss(&mut self) {
        self.icon_hovered = false;
        self.menu_hovered = false;
        self.visible = false;
        self.hide_at = None;
    }

    fn update(&mut self, now: Instant) {
        if self.icon_hovered || self.menu_hovered {
            self.visible = true;
            self.hide_at = None;
        } else if self.visible && self.hide_at.is_none() {
            self.hide_at = Some(now + self.grace);
        }
    }
}

/// Client-simulated upload progress: fixed increments up to a
/// ceiling while the request is in flight, snapped to 100 when the
/// response arrives. Deliberately does not reflect real transfer
/// progress; it only signals activity.
#[derive(Debug)]
pub struct SimulatedProgress {
    value: u8,
    active: bool,
    last_tick: Option<Instant>,
}

impl SimulatedProgress {
    pub const STEP: u8 = 10;
    pub const CEILING: u8 = 90;
    pub const TICK: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self {
            value: 0,
            active: false,
            last_tick: None,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.value = 0;
        self.active = true;
        self.last_tick = Some(now);
    }

    /// Advance by one step per elapsed tick interval, capped at the
    /// ceiling. No-op unless started.
    pub fn tick(&mut self, now: Instant) {
        if !self.active {
            return;
        }
        let Some(last) = self.last_tick else {
            return;
        };
        if now.duration_since(last) >= Self::TICK && self.value < Self::CEILING {
            self.value = (self.value + Self::STEP).min(Self::CEILING);
            self.last_tick = Some(now);
        }
    }

    /// The response arrived; snap to completion.
    pub fn complete(&mut self) {
        self.value = 100;
        self.last_tick = None;
    }

    /// Final cleanup: hide and zero the bar.
    pub fn reset(&mut self) {
        self.value = 0;
        self.active = false;
        self.last_tick = None;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn value(&self) -> u8 {
        self.value
    }
}

impl Default for SimulatedProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debounce_fires_after_delay() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.trigger(start);
        assert!(!d.fire(start + Duration::from_millis(299)));
        assert!(d.fire(start + Duration::from_millis(300)));
        // One-shot: already fired.
        assert!(!d.fire(start + Duration::from_millis(301)));
    }

    #[test]
    fn test_debounce_retrigger_pushes_deadline() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.trigger(start);
        d.trigger(start + Duration::from_millis(200));
        // Original deadline passed, new one has not.
        assert!(!d.fire(start + Duration::from_millis(350)));
        assert!(d.fire(start + Duration::from_millis(500)));
    }

    #[test]
    fn test_debounce_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.trigger(start);
        d.cancel();
        assert!(!d.fire(start + Duration::from_secs(1)));
    }

    #[test]
    fn test_hover_visible_while_either_hovered() {
        let start = Instant::now();
        let mut h = HoverGrace::new(Duration::from_millis(100));
        h.set_icon_hovered(true, start);
        assert!(h.is_visible());

        // Pointer moves from icon to menu body within the grace
        // window: stays visible throughout.
        h.set_icon_hovered(false, start + Duration::from_millis(10));
        h.set_menu_hovered(true, start + Duration::from_millis(50));
        h.poll(start + Duration::from_millis(500));
        assert!(h.is_visible());
    }

    #[test]
    fn test_hover_hides_after_grace() {
        let start = Instant::now();
        let mut h = HoverGrace::new(Duration::from_millis(100));
        h.set_icon_hovered(true, start);
        h.set_icon_hovered(false, start + Duration::from_millis(10));

        h.poll(start + Duration::from_millis(50));
        assert!(h.is_visible(), "still within grace");
        h.poll(start + Duration::from_millis(200));
        assert!(!h.is_visible());
    }

    #[test]
    fn test_hover_reenter_cancels_hide() {
        let start = Instant::now();
        let mut h = HoverGrace::new(Duration::from_millis(100));
        h.set_icon_hovered(true, start);
        h.set_icon_hovered(false, start + Duration::from_millis(10));
        h.set_menu_hovered(true, start + Duration::from_millis(60));
        h.set_menu_hovered(false, start + Duration::from_millis(500));
        // The hide clock restarts from the second leave.
        h.poll(start + Duration::from_millis(550));
        assert!(h.is_visible());
        h.poll(start + Duration::from_millis(700));
        assert!(!h.is_visible());
    }

    #[test]
    fn test_progress_never_exceeds_ceiling_before_completion() {
        let start = Instant::now();
        let mut p = SimulatedProgress::new();
        p.start(start);
        for i in 1..100u64 {
            p.tick(start + Duration::from_millis(500 * i));
            assert!(p.value() <= SimulatedProgress::CEILING);
        }
        assert_eq!(p.value(), SimulatedProgress::CEILING);
    }

    #[test]
    fn test_progress_steps_by_interval() {
        let start = Instant::now();
        let mut p = SimulatedProgress::new();
        p.start(start);
        p.tick(start + Duration::from_millis(499));
        assert_eq!(p.value(), 0);
        p.tick(start + Duration::from_millis(500));
        assert_eq!(p.value(), 10);
        p.tick(start + Duration::from_millis(1000));
        assert_eq!(p.value(), 20);
    }

    #[test]
    fn test_progress_completes_and_resets() {
        let start = Instant::now();
        let mut p = SimulatedProgress::new();
        p.start(start);
        p.tick(start + Duration::from_millis(500));
        p.complete();
        assert_eq!(p.value(), 100);
        p.reset();
        assert!(!p.is_active());
        assert_eq!(p.value(), 0);
    }

    #[test]
    fn test_progress_tick_inert_when_not_started() {
        let mut p = SimulatedProgress::new();
        p.tick(Instant::now());
        assert_eq!(p.value(), 0);
        assert!(!p.is_active());
    }
}
