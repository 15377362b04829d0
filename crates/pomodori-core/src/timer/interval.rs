//! Interval state machine.
//!
//! An interval is one work+rest cycle. It owns no thread or timer handle --
//! the caller drives it by calling `tick()` once per elapsed second, and the
//! interval performs its phase transitions before the caller can observe the
//! new state.
//!
//! ## Phase Transitions
//!
//! ```text
//! None -> Work -> Rest -> Done
//!          ^--- Paused ---^   (pause/start resumes the pre-pause phase)
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Created but never started.
    None,
    Work,
    Rest,
    Paused,
    Done,
    /// Reserved long-break label. No transition sets it; kept so the
    /// derived state labels cover a future session-level long break.
    Break,
}

impl Phase {
    /// Short display label for the phase.
    pub fn label(self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
            Phase::Paused => "paused",
            Phase::Break => "break",
            Phase::None | Phase::Done => "",
        }
    }

    /// True while elapsed time is advancing.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Work | Phase::Rest)
    }
}

/// What a single `tick()` did, reported to the owning session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The interval was not ticking; nothing changed.
    Ignored,
    /// One second elapsed within the current phase.
    Advanced,
    /// The work phase completed and the rest phase began.
    EnteredRest,
    /// The rest phase completed; the interval is done and stopped ticking.
    Completed,
}

/// One work+rest cycle with its own elapsed counter.
#[derive(Debug, Clone)]
pub struct Interval {
    work_secs: u64,
    rest_secs: u64,
    elapsed_secs: u64,
    phase: Phase,
    /// Phase to resume when `start()` is called from `Paused`.
    paused_from: Option<Phase>,
    ticking: bool,
}

impl Interval {
    /// Create an interval with fixed phase durations, in seconds.
    ///
    /// A zero duration is accepted: that phase completes on its very
    /// next tick. Session-level configuration rejects zero minutes
    /// before intervals are built.
    pub fn new(work_secs: u64, rest_secs: u64) -> Self {
        Self {
            work_secs,
            rest_secs,
            elapsed_secs: 0,
            phase: Phase::None,
            paused_from: None,
            ticking: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Configured duration of the phase currently being timed.
    ///
    /// While paused this is the duration of the phase that will resume;
    /// before the first start it is the work duration.
    pub fn phase_duration_secs(&self) -> u64 {
        let phase = match self.phase {
            Phase::Paused => self.paused_from.unwrap_or(Phase::Work),
            p => p,
        };
        match phase {
            Phase::Rest | Phase::Done | Phase::Break => self.rest_secs,
            _ => self.work_secs,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or resume ticking. Returns false when the call was a no-op.
    ///
    /// From `None` the work phase begins; from `Paused` the remembered
    /// phase resumes with its elapsed count intact; from `Done` the
    /// interval restarts from scratch. Already-advancing phases ignore
    /// the call.
    pub fn start(&mut self) -> bool {
        match self.phase {
            Phase::None => {
                self.phase = Phase::Work;
                self.ticking = true;
                true
            }
            Phase::Paused => {
                self.phase = self.paused_from.take().unwrap_or(Phase::Work);
                self.ticking = true;
                true
            }
            Phase::Done => {
                self.elapsed_secs = 0;
                self.phase = Phase::Work;
                self.paused_from = None;
                self.ticking = true;
                true
            }
            Phase::Work | Phase::Rest | Phase::Break => false,
        }
    }

    /// Halt the elapsed counter, remembering the phase for resume.
    /// Returns false (no-op) unless a phase was actively advancing.
    pub fn pause(&mut self) -> bool {
        if !self.phase.is_active() {
            return false;
        }
        self.paused_from = Some(self.phase);
        self.phase = Phase::Paused;
        self.ticking = false;
        true
    }

    /// Advance by one whole second and resolve any phase transition.
    ///
    /// The transition check runs before the outcome is returned, so the
    /// caller never observes a stale boundary value: elapsed time never
    /// exceeds the active phase's configured duration.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.ticking || !self.phase.is_active() {
            return TickOutcome::Ignored;
        }
        self.elapsed_secs += 1;
        match self.phase {
            Phase::Work if self.elapsed_secs >= self.work_secs => {
                self.elapsed_secs = 0;
                self.phase = Phase::Rest;
                TickOutcome::EnteredRest
            }
            Phase::Rest if self.elapsed_secs >= self.rest_secs => {
                self.phase = Phase::Done;
                self.ticking = false;
                TickOutcome::Completed
            }
            _ => TickOutcome::Advanced,
        }
    }

    /// Stop ticking without touching phase or elapsed time. Idempotent;
    /// no tick has any effect afterwards until `start()` is called.
    pub fn dispose(&mut self) {
        self.ticking = false;
    }
}
