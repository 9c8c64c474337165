//! Timer-driven stage runner.
//!
//! A [`StageProcess`] walks a fixed [`StagePlan`] on virtual time. Staged
//! plans wait out each stage's duration before moving to the next; percent
//! plans add a fixed step on every tick until they reach 100.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Fired, Millis, Scheduler, TimerError, TimerSlot};
use crate::id::TimerTag;

// ---------------------------------------------------------------------------
// Plan types
// ---------------------------------------------------------------------------

/// A named stage with a fixed duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    pub label: String,
    pub duration_ms: Millis,
}

impl StageDescriptor {
    pub fn new(label: impl Into<String>, duration_ms: Millis) -> Self {
        Self {
            label: label.into(),
            duration_ms,
        }
    }
}

/// How a process advances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePlan {
    /// Fixed sequence of stages, each held for its duration.
    Staged(Vec<StageDescriptor>),
    /// A single synthetic stage advanced by `step` percent every `tick_ms`.
    Percent {
        label: String,
        step: u8,
        tick_ms: Millis,
    },
}

/// Lifecycle of a [`StageProcess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StageStatus {
    Idle,
    Running,
    Complete,
}

/// Display data emitted after every accepted tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageUpdate {
    pub label: String,
    pub index: usize,
    pub percent: u8,
    pub status: StageStatus,
}

// ---------------------------------------------------------------------------
// StageProcess
// ---------------------------------------------------------------------------

/// A named process advanced by its own timer.
///
/// Invariants: `current_index` never decreases while running, progress stays
/// in `0..=100`, and a complete process holds progress at 100 until reset.
#[derive(Debug, Clone)]
pub struct StageProcess {
    id: String,
    plan: StagePlan,
    current_index: usize,
    progress: u8,
    status: StageStatus,
    timer: TimerSlot,
}

impl StageProcess {
    /// Create an idle process. A percent step of 0 is clamped to 1.
    pub fn new(id: impl Into<String>, plan: StagePlan, tag: TimerTag) -> Self {
        let plan = match plan {
            StagePlan::Percent {
                label,
                step,
                tick_ms,
            } => StagePlan::Percent {
                label,
                step: step.clamp(1, 100),
                tick_ms,
            },
            staged => staged,
        };
        Self {
            id: id.into(),
            plan,
            current_index: 0,
            progress: 0,
            status: StageStatus::Idle,
            timer: TimerSlot::new(tag),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn plan(&self) -> &StagePlan {
        &self.plan
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress
    }

    pub fn status(&self) -> StageStatus {
        self.status
    }

    pub fn is_complete(&self) -> bool {
        self.status == StageStatus::Complete
    }

    /// Whether a timer is armed for this process.
    pub fn is_ticking(&self) -> bool {
        self.timer.is_armed()
    }

    /// Number of stages in the plan (1 for percent plans).
    pub fn stage_count(&self) -> usize {
        match &self.plan {
            StagePlan::Staged(stages) => stages.len(),
            StagePlan::Percent { .. } => 1,
        }
    }

    /// Label of the current stage.
    pub fn label(&self) -> &str {
        match &self.plan {
            StagePlan::Staged(stages) => stages
                .get(self.current_index)
                .map(|s| s.label.as_str())
                .unwrap_or(""),
            StagePlan::Percent { label, .. } => label,
        }
    }

    /// Current display data.
    pub fn update(&self) -> StageUpdate {
        StageUpdate {
            label: self.label().to_string(),
            index: self.current_index,
            percent: self.progress,
            status: self.status,
        }
    }

    /// Begin (or resume after [`cancel`](Self::cancel)) ticking. Returns
    /// false without side effects if already ticking or complete.
    pub fn start(&mut self, sched: &mut Scheduler) -> bool {
        if self.is_complete() || self.timer.is_armed() {
            return false;
        }
        self.status = StageStatus::Running;

        let next = match &self.plan {
            StagePlan::Staged(stages) => stages
                .get(self.current_index)
                .map(|s| Arm::Once(s.duration_ms)),
            StagePlan::Percent { tick_ms, .. } if self.progress < 100 => {
                Some(Arm::Every(*tick_ms))
            }
            StagePlan::Percent { .. } => None,
        };
        match next {
            Some(Arm::Once(delay)) => self.timer.arm_once(sched, delay),
            Some(Arm::Every(period)) => self.timer.arm_every(sched, period),
            None => self.finish(sched),
        }
        debug!(process = %self.id, status = ?self.status, "stage process started");
        true
    }

    /// Stop ticking and leave progress as-is. Returns true if a timer was
    /// pending.
    pub fn cancel(&mut self, sched: &mut Scheduler) -> bool {
        let cancelled = self.timer.disarm(sched);
        if cancelled {
            debug!(process = %self.id, index = self.current_index, "stage process cancelled");
        }
        cancelled
    }

    /// Cancel and return to `Idle` at the first stage.
    pub fn reset(&mut self, sched: &mut Scheduler) {
        self.timer.disarm(sched);
        self.current_index = 0;
        self.progress = 0;
        self.status = StageStatus::Idle;
    }

    /// Handle a fired timer. Stale fires are rejected without touching state.
    pub fn on_timer(
        &mut self,
        sched: &mut Scheduler,
        fired: &Fired,
    ) -> Result<StageUpdate, TimerError> {
        self.timer.accept(fired)?;

        match &self.plan {
            StagePlan::Staged(stages) => {
                let count = stages.len();
                let next = self.current_index + 1;
                match stages.get(next).map(|s| s.duration_ms) {
                    Some(delay) => {
                        self.current_index = next;
                        self.progress = (next * 100 / count) as u8;
                        self.timer.arm_once(sched, delay);
                    }
                    None => self.finish(sched),
                }
            }
            StagePlan::Percent { step, .. } => {
                self.progress = self.progress.saturating_add(*step).min(100);
                if self.progress == 100 {
                    self.finish(sched);
                }
            }
        }

        debug!(
            process = %self.id,
            index = self.current_index,
            percent = self.progress,
            "stage tick"
        );
        Ok(self.update())
    }

    fn finish(&mut self, sched: &mut Scheduler) {
        self.timer.disarm(sched);
        self.progress = 100;
        self.status = StageStatus::Complete;
    }
}

enum Arm {
    Once(Millis),
    Every(Millis),
}

// ===========================================================================
// Tests
// ===========================================================================
