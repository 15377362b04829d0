use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Every state change in the session produces an Event.
/// The CLI prints them as JSON; command methods return `None` when the
/// call degraded to a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    IntervalStarted {
        index: usize,
        phase: Phase,
        at: DateTime<Utc>,
    },
    IntervalPaused {
        index: usize,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// The current interval moved from work into rest.
    PhaseAdvanced {
        index: usize,
        phase: Phase,
        at: DateTime<Utc>,
    },
    /// An interval finished and the next one auto-started.
    IntervalCompleted {
        index: usize,
        next_index: usize,
        at: DateTime<Utc>,
    },
    /// The final interval finished; the whole session is over.
    SessionFinished {
        pomodori: usize,
        long_break_suggested: bool,
        at: DateTime<Utc>,
    },
    SessionReset {
        pomodori: usize,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        phase: Phase,
        state_label: String,
        index: usize,
        total: usize,
        elapsed_secs: u64,
        remaining_secs: u64,
        finished: bool,
        at: DateTime<Utc>,
    },
}
