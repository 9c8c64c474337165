//! Virtual-time scheduler and owned timer handles.
//!
//! A [`Scheduler`] never runs callbacks itself. The owner pops one due timer
//! at a time with [`Scheduler::pop_due`], handles it to completion, and only
//! then asks for the next one. Handlers may cancel or arm timers between
//! pops, so a process that finishes on one fire never sees a later one.
//!
//! A [`TimerSlot`] is the single timer handle owned by a running process.
//! Re-arming or disarming it bumps its [`Generation`]; fires carrying an old
//! generation are rejected with [`TimerError::StaleCallback`].

use slotmap::SlotMap;

use crate::id::{Generation, TimerId, TimerTag};

/// Virtual time in milliseconds.
pub type Millis = u64;

// ---------------------------------------------------------------------------
// Fired timers
// ---------------------------------------------------------------------------

/// A timer that came due during [`Scheduler::pop_due`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fired {
    pub timer: TimerId,
    pub tag: TimerTag,
    pub generation: Generation,
    /// Scheduled due time (not the time `pop_due` was called).
    pub at: Millis,
    /// Whether the timer stays scheduled after this fire.
    pub repeating: bool,
}

/// Errors raised when a fired timer is handed to its owner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer was cancelled or superseded before it fired.
    #[error("stale timer callback for {tag:?}: expected generation {expected:?}, got {found:?}")]
    StaleCallback {
        tag: TimerTag,
        expected: Generation,
        found: Generation,
    },
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct TimerEntry {
    tag: TimerTag,
    generation: Generation,
    due: Millis,
    period: Option<Millis>,
    /// Schedule order; breaks ties between timers due at the same instant.
    seq: u64,
}

/// Single-threaded virtual-time timer queue.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    timers: SlotMap<TimerId, TimerEntry>,
    next_seq: u64,
}

impl Scheduler {
    /// Create an empty scheduler at time 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time.
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Schedule a one-shot timer `delay` milliseconds from now.
    pub fn schedule_once(&mut self, tag: TimerTag, generation: Generation, delay: Millis) -> TimerId {
        self.insert(tag, generation, delay, None)
    }

    /// Schedule a repeating timer. A period of 0 is clamped to 1.
    pub fn schedule_every(
        &mut self,
        tag: TimerTag,
        generation: Generation,
        period: Millis,
    ) -> TimerId {
        let period = period.max(1);
        self.insert(tag, generation, period, Some(period))
    }

    fn insert(
        &mut self,
        tag: TimerTag,
        generation: Generation,
        delay: Millis,
        period: Option<Millis>,
    ) -> TimerId {
        let seq = self.bump_seq();
        self.timers.insert(TimerEntry {
            tag,
            generation,
            due: self.now.saturating_add(delay),
            period,
            seq,
        })
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }

    /// Cancel a timer. Returns false if it had already fired or been cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        self.timers.remove(id).is_some()
    }

    /// Cancel every pending timer. Returns how many were removed.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.timers.len();
        self.timers.clear();
        count
    }

    /// Whether the timer is still pending.
    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.timers.contains_key(id)
    }

    /// Number of pending timers.
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    /// Due time of the earliest pending timer.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.values().map(|e| e.due).min()
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its due time. Repeating timers are rescheduled one period later;
    /// one-shot timers are removed.
    pub fn pop_due(&mut self, until: Millis) -> Option<Fired> {
        let (id, due, _) = self
            .timers
            .iter()
            .filter(|(_, e)| e.due <= until)
            .map(|(id, e)| (id, e.due, e.seq))
            .min_by_key(|&(_, due, seq)| (due, seq))?;

        self.now = self.now.max(due);
        let seq = self.bump_seq();
        let entry = &self.timers[id];
        let period = entry.period;
        let fired = Fired {
            timer: id,
            tag: entry.tag,
            generation: entry.generation,
            at: due,
            repeating: period.is_some(),
        };
        match period {
            Some(period) => {
                let entry = &mut self.timers[id];
                entry.due = due.saturating_add(period);
                entry.seq = seq;
            }
            None => {
                self.timers.remove(id);
            }
        }
        Some(fired)
    }

    /// Move the clock forward to `until` once no more timers are due.
    pub fn settle(&mut self, until: Millis) {
        self.now = self.now.max(until);
    }
}

// ---------------------------------------------------------------------------
// TimerSlot
// ---------------------------------------------------------------------------

/// The one timer handle owned by a process.
#[derive(Debug, Clone)]
pub struct TimerSlot {
    tag: TimerTag,
    timer: Option<TimerId>,
    generation: Generation,
}

impl TimerSlot {
    pub fn new(tag: TimerTag) -> Self {
        Self {
            tag,
            timer: None,
            generation: Generation::default(),
        }
    }

    pub fn tag(&self) -> TimerTag {
        self.tag
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Whether a timer is currently armed through this slot.
    pub fn is_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Arm a one-shot timer, replacing any armed timer.
    pub fn arm_once(&mut self, sched: &mut Scheduler, delay: Millis) {
        self.disarm(sched);
        self.timer = Some(sched.schedule_once(self.tag, self.generation, delay));
    }

    /// Arm a repeating timer, replacing any armed timer.
    pub fn arm_every(&mut self, sched: &mut Scheduler, period: Millis) {
        self.disarm(sched);
        self.timer = Some(sched.schedule_every(self.tag, self.generation, period));
    }

    /// Cancel the armed timer (if any) and invalidate fires already in
    /// flight. Returns true if a pending timer was removed.
    pub fn disarm(&mut self, sched: &mut Scheduler) -> bool {
        self.generation = self.generation.next();
        match self.timer.take() {
            Some(id) => sched.cancel(id),
            None => false,
        }
    }

    /// Check that `fired` belongs to the timer armed through this slot.
    /// A one-shot fire releases the slot.
    pub fn accept(&mut self, fired: &Fired) -> Result<(), TimerError> {
        if self.timer != Some(fired.timer) || self.generation != fired.generation {
            return Err(TimerError::StaleCallback {
                tag: fired.tag,
                expected: self.generation,
                found: fired.generation,
            });
        }
        if !fired.repeating {
            self.timer = None;
        }
        Ok(())
    }
}

// ===========================================================================
// Tests
// ===========================================================================
