//! Session manager.
//!
//! Owns the ordered queue of intervals, advances between them as each one
//! completes, and re-renders the injected display after every state change.
//!
//! ## Session State
//!
//! ```text
//! InProgress(0) -> InProgress(1) -> ... -> Finished
//! ```
//!
//! `start()` on a finished session relaunches from interval 0. Pausing only
//! affects the active interval's phase, never the session-level state.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::interval::{Interval, Phase, TickOutcome};
use crate::error::ValidationError;
use crate::events::Event;
use crate::render::{format_clock, Renderer, StatusView};

/// Validated session settings.
///
/// `count_down` is a pure display preference: the intervals always count
/// elapsed seconds up from zero, and the view subtracts from the phase
/// duration when counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub work_minutes: u64,
    pub rest_minutes: u64,
    pub pomodori: usize,
    pub count_down: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            rest_minutes: 5,
            pomodori: 1,
            count_down: true,
        }
    }
}

impl SessionConfig {
    /// Reject non-positive durations and counts before any interval is built.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let positive = |field: &str, ok: bool| {
            if ok {
                Ok(())
            } else {
                Err(ValidationError::InvalidValue {
                    field: field.to_string(),
                    message: "must be a positive integer".to_string(),
                })
            }
        };
        positive("work_minutes", self.work_minutes > 0)?;
        positive("rest_minutes", self.rest_minutes > 0)?;
        positive("pomodori", self.pomodori > 0)?;
        Ok(())
    }

    pub fn work_secs(&self) -> u64 {
        self.work_minutes.saturating_mul(60)
    }

    pub fn rest_secs(&self) -> u64 {
        self.rest_minutes.saturating_mul(60)
    }
}

/// The full ordered sequence of intervals managed together.
///
/// The session is the sole mutator of the queue and index; the queue is
/// rebuilt wholesale on `reset()` and never edited in place.
pub struct Session {
    config: SessionConfig,
    intervals: Vec<Interval>,
    active_index: usize,
    /// Registered once at construction, never reassigned per start.
    renderer: Box<dyn Renderer>,
}

impl Session {
    /// Validate the settings, build the interval queue, and draw the
    /// initial view.
    pub fn new(
        config: SessionConfig,
        renderer: Box<dyn Renderer>,
    ) -> Result<Self, ValidationError> {
        config.validate()?;
        let mut session = Self {
            config,
            intervals: Vec::new(),
            active_index: 0,
            renderer,
        };
        session.reset();
        Ok(session)
    }

    fn build_intervals(config: &SessionConfig) -> Vec<Interval> {
        (0..config.pomodori)
            .map(|_| Interval::new(config.work_secs(), config.rest_secs()))
            .collect()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// True exactly when the index has advanced past the last interval.
    pub fn is_finished(&self) -> bool {
        self.active_index >= self.intervals.len()
    }

    fn current(&self) -> Option<&Interval> {
        self.intervals.get(self.active_index)
    }

    fn current_mut(&mut self) -> Option<&mut Interval> {
        self.intervals.get_mut(self.active_index)
    }

    /// Phase of the active interval, if the session is in progress.
    pub fn phase(&self) -> Option<Phase> {
        self.current().map(Interval::phase)
    }

    /// Short label for the current phase: "work", "rest", "paused",
    /// "break", or empty (idle, done, or finished session).
    pub fn current_state(&self) -> &'static str {
        self.current().map(|iv| iv.phase().label()).unwrap_or("")
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.current().map(Interval::elapsed_secs).unwrap_or(0)
    }

    /// Seconds left in the active phase.
    pub fn remaining_secs(&self) -> u64 {
        self.current()
            .map(|iv| iv.phase_duration_secs().saturating_sub(iv.elapsed_secs()))
            .unwrap_or(0)
    }

    /// Zero-based (active index, total interval count).
    pub fn position(&self) -> (usize, usize) {
        (self.active_index, self.intervals.len())
    }

    pub fn is_ticking(&self) -> bool {
        self.current().map(Interval::is_ticking).unwrap_or(false)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            phase: self.phase().unwrap_or(Phase::None),
            state_label: self.current_state().to_string(),
            index: self.active_index,
            total: self.intervals.len(),
            elapsed_secs: self.elapsed_secs(),
            remaining_secs: self.remaining_secs(),
            finished: self.is_finished(),
            at: Utc::now(),
        }
    }

    /// Build the display snapshot for the injected renderer.
    pub fn view(&self) -> StatusView {
        let Some(iv) = self.current() else {
            return StatusView {
                time_text: String::new(),
                state_label: String::new(),
                position: None,
                finished: true,
                long_break_suggested: self.intervals.len() > 1,
                show_start: true,
                show_pause: false,
            };
        };
        let display_secs = if self.config.count_down {
            iv.phase_duration_secs().saturating_sub(iv.elapsed_secs())
        } else {
            iv.elapsed_secs()
        };
        let idle = matches!(iv.phase(), Phase::None | Phase::Paused | Phase::Done);
        StatusView {
            time_text: format_clock(display_secs),
            state_label: iv.phase().label().to_string(),
            position: (self.intervals.len() > 1)
                .then(|| (self.active_index, self.intervals.len())),
            finished: false,
            long_break_suggested: false,
            show_start: idle,
            show_pause: !idle,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Rebuild the interval queue from the configured durations and count.
    /// Nothing ticks until the next `start()`.
    pub fn reset(&mut self) -> Event {
        if let Some(iv) = self.current_mut() {
            iv.dispose();
        }
        self.intervals = Self::build_intervals(&self.config);
        self.active_index = 0;
        self.render();
        Event::SessionReset {
            pomodori: self.intervals.len(),
            at: Utc::now(),
        }
    }

    /// Start or resume the current interval. A finished session relaunches
    /// from interval 0, which restarts with zero elapsed time.
    pub fn start(&mut self) -> Option<Event> {
        if self.is_finished() {
            self.active_index = 0;
        }
        let index = self.active_index;
        let started = self.intervals.get_mut(index)?.start();
        self.render();
        started.then(|| Event::IntervalStarted {
            index,
            phase: self.intervals[index].phase(),
            at: Utc::now(),
        })
    }

    /// Pause the current interval. No-op when already paused or finished.
    pub fn pause(&mut self) -> Option<Event> {
        let index = self.active_index;
        let paused = self.intervals.get_mut(index)?.pause();
        self.render();
        paused.then(|| Event::IntervalPaused {
            index,
            elapsed_secs: self.intervals[index].elapsed_secs(),
            at: Utc::now(),
        })
    }

    /// Advance the active interval by one second and handle completion.
    ///
    /// When an interval finishes, the index moves forward and the next
    /// interval starts immediately, so exactly one interval is ever
    /// ticking. The finished interval stopped itself before the next
    /// one starts.
    pub fn tick(&mut self) -> Option<Event> {
        let index = self.active_index;
        let outcome = self.current_mut()?.tick();
        let event = match outcome {
            TickOutcome::Ignored => return None,
            TickOutcome::Advanced => None,
            TickOutcome::EnteredRest => Some(Event::PhaseAdvanced {
                index,
                phase: Phase::Rest,
                at: Utc::now(),
            }),
            TickOutcome::Completed => {
                self.active_index += 1;
                if self.is_finished() {
                    Some(Event::SessionFinished {
                        pomodori: self.intervals.len(),
                        long_break_suggested: self.intervals.len() > 1,
                        at: Utc::now(),
                    })
                } else {
                    self.intervals[self.active_index].start();
                    Some(Event::IntervalCompleted {
                        index,
                        next_index: self.active_index,
                        at: Utc::now(),
                    })
                }
            }
        };
        self.render();
        event
    }

    /// Stop the current interval's ticking. Idempotent; safe on a
    /// finished session.
    pub fn dispose(&mut self) {
        if let Some(iv) = self.current_mut() {
            iv.dispose();
        }
    }

    fn render(&mut self) {
        let view = self.view();
        self.renderer.render(&view);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::render::NullRenderer;

    fn config(work: u64, rest: u64, pomodori: usize) -> SessionConfig {
        SessionConfig {
            work_minutes: work,
            rest_minutes: rest,
            pomodori,
            count_down: true,
        }
    }

    fn session(work: u64, rest: u64, pomodori: usize) -> Session {
        Session::new(config(work, rest, pomodori), Box::new(NullRenderer)).unwrap()
    }

    /// Renderer that records every view it is handed.
    struct RecordingRenderer(Rc<RefCell<Vec<StatusView>>>);

    impl Renderer for RecordingRenderer {
        fn render(&mut self, view: &StatusView) {
            self.0.borrow_mut().push(view.clone());
        }
    }

    #[test]
    fn rejects_non_positive_settings() {
        let renderer = || Box::new(NullRenderer);
        assert!(Session::new(config(0, 5, 1), renderer()).is_err());
        assert!(Session::new(config(25, 0, 1), renderer()).is_err());
        assert!(Session::new(config(25, 5, 0), renderer()).is_err());
    }

    #[test]
    fn single_pomodoro_runs_to_finished() {
        // work=1, rest=1, pomodori=1
        let mut s = session(1, 1, 1);
        s.start();
        assert_eq!(s.current_state(), "work");

        for _ in 0..60 {
            s.tick();
        }
        assert_eq!(s.current_state(), "rest");
        assert_eq!(s.elapsed_secs(), 0);
        assert!(!s.is_finished());

        for _ in 0..60 {
            s.tick();
        }
        assert!(s.is_finished());
        assert_eq!(s.current_state(), "");
        assert_eq!(s.position(), (1, 1));
    }

    #[test]
    fn completion_auto_starts_next_interval() {
        let mut s = session(1, 1, 2);
        s.start();

        // Drive interval 0 to done: 60s work + 59s rest, then the
        // completing tick.
        for _ in 0..119 {
            s.tick();
        }
        assert_eq!(s.position().0, 0);

        let event = s.tick();
        assert!(matches!(
            event,
            Some(Event::IntervalCompleted {
                index: 0,
                next_index: 1,
                ..
            })
        ));
        assert_eq!(s.position().0, 1);
        assert_eq!(s.current_state(), "work");
        assert_eq!(s.elapsed_secs(), 0);
        assert!(s.is_ticking());
    }

    #[test]
    fn index_increments_once_per_completion() {
        let mut s = session(1, 1, 3);
        s.start();
        let mut completions = 0;
        for _ in 0..360 {
            match s.tick() {
                Some(Event::IntervalCompleted { .. }) | Some(Event::SessionFinished { .. }) => {
                    completions += 1
                }
                _ => {}
            }
        }
        assert_eq!(completions, 3);
        assert!(s.is_finished());
    }

    #[test]
    fn finished_session_restarts_from_interval_zero() {
        let mut s = session(1, 1, 1);
        s.start();
        for _ in 0..120 {
            s.tick();
        }
        assert!(s.is_finished());

        let event = s.start();
        assert!(matches!(
            event,
            Some(Event::IntervalStarted { index: 0, .. })
        ));
        assert!(!s.is_finished());
        assert_eq!(s.current_state(), "work");
        assert_eq!(s.elapsed_secs(), 0);
    }

    #[test]
    fn pause_keeps_session_in_progress() {
        let mut s = session(1, 1, 2);
        s.start();
        s.tick();
        s.tick();

        assert!(s.pause().is_some());
        assert_eq!(s.current_state(), "paused");
        assert_eq!(s.position().0, 0);
        assert_eq!(s.elapsed_secs(), 2);

        // Second pause is a no-op.
        assert!(s.pause().is_none());

        s.start();
        assert_eq!(s.current_state(), "work");
        assert_eq!(s.elapsed_secs(), 2);
    }

    #[test]
    fn pause_when_finished_is_noop() {
        let mut s = session(1, 1, 1);
        s.start();
        for _ in 0..120 {
            s.tick();
        }
        assert!(s.pause().is_none());
        assert!(s.is_finished());
    }

    #[test]
    fn tick_before_start_is_ignored() {
        let mut s = session(1, 1, 1);
        assert!(s.tick().is_none());
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.current_state(), "");
    }

    #[test]
    fn final_completion_reports_session_finished() {
        let mut s = session(1, 1, 2);
        s.start();
        let mut finished_event = None;
        for _ in 0..240 {
            if let Some(e @ Event::SessionFinished { .. }) = s.tick() {
                finished_event = Some(e);
            }
        }
        match finished_event {
            Some(Event::SessionFinished {
                pomodori,
                long_break_suggested,
                ..
            }) => {
                assert_eq!(pomodori, 2);
                assert!(long_break_suggested);
            }
            other => panic!("expected SessionFinished, got {other:?}"),
        }
    }

    #[test]
    fn reset_rebuilds_the_queue() {
        let mut s = session(1, 1, 2);
        s.start();
        for _ in 0..90 {
            s.tick();
        }

        s.reset();
        assert_eq!(s.position(), (0, 2));
        assert_eq!(s.elapsed_secs(), 0);
        assert_eq!(s.current_state(), "");
        assert!(!s.is_ticking());
    }

    #[test]
    fn dispose_halts_ticking_without_losing_state() {
        let mut s = session(1, 1, 1);
        s.start();
        s.tick();
        s.dispose();
        s.dispose();
        assert!(!s.is_ticking());
        assert!(s.tick().is_none());
        assert_eq!(s.elapsed_secs(), 1);
    }

    #[test]
    fn renderer_sees_every_tick() {
        let views = Rc::new(RefCell::new(Vec::new()));
        let mut s = Session::new(
            config(1, 1, 1),
            Box::new(RecordingRenderer(Rc::clone(&views))),
        )
        .unwrap();
        views.borrow_mut().clear(); // drop the construction-time draw

        s.start();
        s.tick();
        s.tick();
        s.pause();
        assert_eq!(views.borrow().len(), 4);
    }

    #[test]
    fn snapshot_reports_session_state() {
        let mut s = session(1, 1, 2);
        s.start();
        s.tick();

        match s.snapshot() {
            Event::StateSnapshot {
                phase,
                state_label,
                index,
                total,
                elapsed_secs,
                remaining_secs,
                finished,
                ..
            } => {
                assert_eq!(phase, Phase::Work);
                assert_eq!(state_label, "work");
                assert_eq!(index, 0);
                assert_eq!(total, 2);
                assert_eq!(elapsed_secs, 1);
                assert_eq!(remaining_secs, 59);
                assert!(!finished);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn snapshot_of_finished_session() {
        let mut s = session(1, 1, 1);
        s.start();
        for _ in 0..120 {
            s.tick();
        }

        match s.snapshot() {
            Event::StateSnapshot {
                phase,
                index,
                total,
                remaining_secs,
                finished,
                ..
            } => {
                assert_eq!(phase, Phase::None);
                assert_eq!(index, 1);
                assert_eq!(total, 1);
                assert_eq!(remaining_secs, 0);
                assert!(finished);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn count_down_view_subtracts_elapsed() {
        let mut s = session(1, 1, 1);
        s.start();
        assert_eq!(s.view().time_text, "01:00");
        s.tick();
        assert_eq!(s.view().time_text, "00:59");
    }

    #[test]
    fn count_up_view_shows_elapsed() {
        let mut cfg = config(1, 1, 1);
        cfg.count_down = false;
        let mut s = Session::new(cfg, Box::new(NullRenderer)).unwrap();
        s.start();
        s.tick();
        assert_eq!(s.view().time_text, "00:01");
    }

    #[test]
    fn finished_view_suggests_long_break_only_for_multi_sessions() {
        let mut s = session(1, 1, 2);
        s.start();
        for _ in 0..240 {
            s.tick();
        }
        let view = s.view();
        assert!(view.finished);
        assert!(view.long_break_suggested);
        assert!(view.show_start);
        assert!(!view.show_pause);

        let mut single = session(1, 1, 1);
        single.start();
        for _ in 0..120 {
            single.tick();
        }
        assert!(!single.view().long_break_suggested);
    }

    #[test]
    fn position_hidden_for_single_pomodoro_views() {
        let mut s = session(1, 1, 1);
        s.start();
        assert_eq!(s.view().position, None);

        let mut multi = session(1, 1, 4);
        multi.start();
        assert_eq!(multi.view().position, Some((0, 4)));
    }
}
