//! Navigation state for a running presentation.
//!
//! The controller is driven entirely by [`Command`]s and explicit timestamps,
//! so the shell decides what "now" is. It never touches the window: anything
//! the platform has to do comes back as an [`Effect`].

use std::time::{Duration, Instant};

/// How long the controls stay up after the last input.
pub const CONTROLS_HIDE_AFTER: Duration = Duration::from_millis(3000);

/// Fraction of the stage width, from the left edge, where a click goes back.
pub const PREVIOUS_ZONE: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    First,
    Last,
    /// 1-based slide number from the digit keys.
    Digit(u8),
    /// 0-based index, e.g. a click in the overview. Clamped into range.
    GoTo(usize),
    Escape,
    ToggleFullscreen,
}

/// Work the platform has to do on the controller's behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    RequestFullscreen(bool),
    Close,
}

#[derive(Debug, Clone)]
pub struct PlaybackController {
    slide_count: usize,
    current_slide: usize,
    show_controls: bool,
    is_fullscreen: bool,
    hide_deadline: Option<Instant>,
    slide_entered_at: Instant,
}

impl PlaybackController {
    pub fn new(slide_count: usize, now: Instant) -> Self {
        Self {
            slide_count,
            current_slide: 0,
            show_controls: true,
            is_fullscreen: false,
            hide_deadline: Some(now + CONTROLS_HIDE_AFTER),
            slide_entered_at: now,
        }
    }

    /// Start on `index` (0-based), clamped into range.
    pub fn starting_at(mut self, index: usize) -> Self {
        self.current_slide = index.min(self.last_index());
        self
    }

    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    pub fn current_slide(&self) -> usize {
        self.current_slide
    }

    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    /// Time since the current slide was entered, which drives its entrance.
    pub fn elapsed_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.slide_entered_at)
            .as_secs_f64()
            * 1000.0
    }

    fn last_index(&self) -> usize {
        self.slide_count.saturating_sub(1)
    }

    pub fn handle(&mut self, command: Command, now: Instant) -> Option<Effect> {
        self.note_activity(now);
        match command {
            Command::Next => self.go_to((self.current_slide + 1).min(self.last_index()), now),
            Command::Previous => self.go_to(self.current_slide.saturating_sub(1), now),
            Command::First => self.go_to(0, now),
            Command::Last => self.go_to(self.last_index(), now),
            Command::Digit(n) => {
                let n = n as usize;
                if (1..=self.slide_count).contains(&n) {
                    self.go_to(n - 1, now);
                }
            }
            Command::GoTo(index) => self.go_to(index.min(self.last_index()), now),
            Command::Escape => {
                return Some(if self.is_fullscreen {
                    Effect::RequestFullscreen(false)
                } else {
                    Effect::Close
                });
            }
            Command::ToggleFullscreen => {
                return Some(Effect::RequestFullscreen(!self.is_fullscreen));
            }
        }
        None
    }

    fn go_to(&mut self, index: usize, now: Instant) {
        if index == self.current_slide {
            return;
        }
        log::debug!("slide {} -> {}", self.current_slide + 1, index + 1);
        self.current_slide = index;
        self.slide_entered_at = now;
        self.hide_deadline = Some(now + CONTROLS_HIDE_AFTER);
    }

    /// Any key or pointer movement: show the controls and restart the hide timer.
    pub fn note_activity(&mut self, now: Instant) {
        self.show_controls = true;
        self.hide_deadline = Some(now + CONTROLS_HIDE_AFTER);
    }

    /// The platform reports the window's fullscreen state. This is the only
    /// place `is_fullscreen` changes.
    pub fn on_fullscreen_changed(&mut self, fullscreen: bool) {
        if self.is_fullscreen != fullscreen {
            log::debug!("fullscreen is now {fullscreen}");
            self.is_fullscreen = fullscreen;
        }
    }

    /// Fire any deadline that has passed.
    pub fn tick(&mut self, now: Instant) {
        if self.hide_deadline.is_some_and(|deadline| now >= deadline) {
            self.show_controls = false;
            self.hide_deadline = None;
        }
    }

    /// When the shell should wake up next, if anything is pending.
    pub fn next_wakeup(&self) -> Option<Instant> {
        self.hide_deadline
    }

    /// Cancel pending timers when the presentation goes away.
    pub fn teardown(&mut self) {
        self.hide_deadline = None;
    }

    pub fn progress(&self) -> f32 {
        if self.slide_count == 0 {
            return 0.0;
        }
        (self.current_slide + 1) as f32 / self.slide_count as f32
    }
}

/// Which way a click at `x` on a stage of `width` navigates.
pub fn zone_for(x: f32, width: f32) -> Command {
    if width > 0.0 && x < width * PREVIOUS_ZONE {
        Command::Previous
    } else {
        Command::Next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(n: usize) -> (PlaybackController, Instant) {
        let now = Instant::now();
        (PlaybackController::new(n, now), now)
    }

    #[test]
    fn test_next_is_idempotent_at_end() {
        let (mut c, now) = controller(3);
        c.handle(Command::Last, now);
        assert_eq!(c.current_slide(), 2);
        c.handle(Command::Next, now);
        c.handle(Command::Next, now);
        assert_eq!(c.current_slide(), 2);
    }

    #[test]
    fn test_previous_at_start_stays() {
        let (mut c, now) = controller(3);
        assert_eq!(c.handle(Command::Previous, now), None);
        assert_eq!(c.current_slide(), 0);
    }

    #[test]
    fn test_home_and_end() {
        let (mut c, now) = controller(5);
        c.handle(Command::Last, now);
        assert_eq!(c.current_slide(), 4);
        c.handle(Command::First, now);
        assert_eq!(c.current_slide(), 0);
    }

    #[test]
    fn test_digit_jumps_only_within_range() {
        let (mut c, now) = controller(4);
        c.handle(Command::Digit(3), now);
        assert_eq!(c.current_slide(), 2);
        c.handle(Command::Digit(9), now);
        assert_eq!(c.current_slide(), 2);
        c.handle(Command::Digit(0), now);
        assert_eq!(c.current_slide(), 2);
        c.handle(Command::Digit(4), now);
        assert_eq!(c.current_slide(), 3);
    }

    #[test]
    fn test_goto_is_clamped() {
        let (mut c, now) = controller(4);
        c.handle(Command::GoTo(2), now);
        assert_eq!(c.current_slide(), 2);
        c.handle(Command::GoTo(40), now);
        assert_eq!(c.current_slide(), 3);
    }

    #[test]
    fn test_progress() {
        let (mut c, now) = controller(4);
        assert_eq!(c.progress(), 0.25);
        c.handle(Command::Next, now);
        assert_eq!(c.progress(), 0.5);
        c.handle(Command::Last, now);
        assert_eq!(c.progress(), 1.0);
    }

    #[test]
    fn test_escape_depends_on_fullscreen() {
        let (mut c, now) = controller(2);
        assert_eq!(c.handle(Command::Escape, now), Some(Effect::Close));
        c.on_fullscreen_changed(true);
        assert_eq!(
            c.handle(Command::Escape, now),
            Some(Effect::RequestFullscreen(false))
        );
        // The request alone does not change the mirrored flag.
        assert!(c.is_fullscreen());
    }

    #[test]
    fn test_toggle_requests_the_opposite_state() {
        let (mut c, now) = controller(2);
        assert_eq!(
            c.handle(Command::ToggleFullscreen, now),
            Some(Effect::RequestFullscreen(true))
        );
        assert!(!c.is_fullscreen());
        c.on_fullscreen_changed(true);
        assert_eq!(
            c.handle(Command::ToggleFullscreen, now),
            Some(Effect::RequestFullscreen(false))
        );
    }

    #[test]
    fn test_controls_hide_after_inactivity() {
        let (mut c, start) = controller(3);
        assert!(c.show_controls());
        c.tick(start + Duration::from_millis(2999));
        assert!(c.show_controls());
        c.tick(start + CONTROLS_HIDE_AFTER);
        assert!(!c.show_controls());
        assert_eq!(c.next_wakeup(), None);
    }

    #[test]
    fn test_activity_shows_controls_and_restarts_timer() {
        let (mut c, start) = controller(3);
        c.tick(start + CONTROLS_HIDE_AFTER);
        assert!(!c.show_controls());

        let later = start + Duration::from_secs(10);
        c.note_activity(later);
        assert!(c.show_controls());
        assert_eq!(c.next_wakeup(), Some(later + CONTROLS_HIDE_AFTER));
        c.tick(later + Duration::from_millis(2000));
        assert!(c.show_controls());
    }

    #[test]
    fn test_slide_change_restarts_entrance_clock() {
        let (mut c, start) = controller(3);
        let later = start + Duration::from_millis(500);
        c.handle(Command::Next, later);
        assert_eq!(c.elapsed_ms(later), 0.0);
        assert_eq!(c.elapsed_ms(later + Duration::from_millis(250)), 250.0);

        // Staying put does not replay the entrance.
        let at_end = later + Duration::from_millis(800);
        c.handle(Command::Last, at_end);
        c.handle(Command::Next, at_end + Duration::from_millis(100));
        let elapsed = c.elapsed_ms(at_end + Duration::from_millis(100));
        assert!((elapsed - 100.0).abs() < 1e-6, "elapsed {elapsed}");
    }

    #[test]
    fn test_teardown_cancels_timer() {
        let (mut c, start) = controller(3);
        c.teardown();
        assert_eq!(c.next_wakeup(), None);
        c.tick(start + Duration::from_secs(60));
        assert!(c.show_controls());
    }

    #[test]
    fn test_empty_deck_is_clamped() {
        let (mut c, now) = controller(0);
        for cmd in [
            Command::Next,
            Command::Previous,
            Command::First,
            Command::Last,
            Command::Digit(1),
        ] {
            c.handle(cmd, now);
            assert_eq!(c.current_slide(), 0);
        }
        assert_eq!(c.progress(), 0.0);
    }

    #[test]
    fn test_starting_at_is_clamped() {
        let now = Instant::now();
        assert_eq!(PlaybackController::new(3, now).starting_at(7).current_slide(), 2);
        assert_eq!(PlaybackController::new(3, now).starting_at(1).current_slide(), 1);
    }

    #[test]
    fn test_pointer_zones() {
        assert_eq!(zone_for(10.0, 1000.0), Command::Previous);
        assert_eq!(zone_for(199.0, 1000.0), Command::Previous);
        assert_eq!(zone_for(200.0, 1000.0), Command::Next);
        assert_eq!(zone_for(900.0, 1000.0), Command::Next);
    }
}
