//! Rendering contract between the core and its presentation layer.
//!
//! The state machines never hold a concrete display. They build a
//! [`StatusView`] snapshot and hand it to whatever [`Renderer`] the caller
//! injected at session construction.

use serde::{Deserialize, Serialize};

/// Snapshot of everything a display needs to draw the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusView {
    /// Zero-padded "MM:SS", already adjusted for count-up/count-down mode.
    pub time_text: String,
    /// "work", "rest", "paused", "break" or empty.
    pub state_label: String,
    /// Zero-based (current, total); present only for multi-pomodoro sessions.
    pub position: Option<(usize, usize)>,
    pub finished: bool,
    /// Set on the finished view when the session had more than one pomodoro.
    pub long_break_suggested: bool,
    /// The start control is shown while idle, paused, or finished.
    pub show_start: bool,
    /// The pause control is shown while a phase is advancing.
    pub show_pause: bool,
}

impl StatusView {
    /// One-line status text, e.g. `24:59 - work (1 out of 4 pomodori)`.
    pub fn status_line(&self) -> String {
        if self.finished {
            return "Restart session?".into();
        }
        let mut line = self.time_text.clone();
        if !self.state_label.is_empty() {
            line.push_str(" - ");
            line.push_str(&self.state_label);
        }
        if let Some((current, total)) = self.position {
            line.push_str(&format!(" ({} out of {} pomodori)", current + 1, total));
        }
        line
    }
}

/// Format whole seconds as zero-padded `MM:SS`.
pub fn format_clock(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    let seconds = total_secs % 60;
    format!("{minutes:02}:{seconds:02}")
}

/// Display capability injected into the session by the caller.
pub trait Renderer {
    fn render(&mut self, view: &StatusView);
}

/// Renderer that discards every view. Used in tests and in JSON event
/// output mode where no status line is drawn.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _view: &StatusView) {}
}
