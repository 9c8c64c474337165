//! Character-stream variant of the stage runner.

use tracing::debug;

use crate::clock::{Fired, Millis, Scheduler, TimerError, TimerSlot};
use crate::id::TimerTag;

/// Reveals a fixed string one character per tick.
///
/// Characters are Unicode scalar values, so a revealed prefix never ends in
/// the middle of a multi-byte character. Once complete, the typewriter stays
/// complete until [`reset`](Self::reset) is called.
#[derive(Debug, Clone)]
pub struct Typewriter {
    source: String,
    total_chars: usize,
    revealed_chars: usize,
    delay_ms: Millis,
    timer: TimerSlot,
}

impl Typewriter {
    pub fn new(source: impl Into<String>, delay_ms: Millis, tag: TimerTag) -> Self {
        let source = source.into();
        Self {
            total_chars: source.chars().count(),
            source,
            revealed_chars: 0,
            delay_ms,
            timer: TimerSlot::new(tag),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The currently revealed prefix.
    pub fn revealed(&self) -> &str {
        match self.source.char_indices().nth(self.revealed_chars) {
            Some((byte, _)) => &self.source[..byte],
            None => &self.source,
        }
    }

    pub fn revealed_chars(&self) -> usize {
        self.revealed_chars
    }

    pub fn is_complete(&self) -> bool {
        self.revealed_chars >= self.total_chars
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_armed()
    }

    /// Start revealing. Returns false if already running or complete.
    pub fn start(&mut self, sched: &mut Scheduler) -> bool {
        if self.is_complete() || self.timer.is_armed() {
            return false;
        }
        self.timer.arm_every(sched, self.delay_ms);
        debug!(chars = self.total_chars, "typewriter started");
        true
    }

    /// Stop revealing, keeping the current prefix.
    pub fn cancel(&mut self, sched: &mut Scheduler) -> bool {
        self.timer.disarm(sched)
    }

    /// Cancel and hide everything again.
    pub fn reset(&mut self, sched: &mut Scheduler) {
        self.timer.disarm(sched);
        self.revealed_chars = 0;
    }

    /// Reveal one more character. Returns the revealed prefix.
    pub fn on_timer(&mut self, sched: &mut Scheduler, fired: &Fired) -> Result<&str, TimerError> {
        self.timer.accept(fired)?;
        self.revealed_chars = (self.revealed_chars + 1).min(self.total_chars);
        if self.is_complete() {
            self.timer.disarm(sched);
        }
        Ok(self.revealed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::drive_typewriter;

    const TAG: TimerTag = TimerTag(3);

    #[test]
    fn reveals_one_char_per_tick() {
        let mut sched = Scheduler::new();
        let mut tw = Typewriter::new("abc", 10, TAG);
        assert!(tw.start(&mut sched));
        assert_eq!(tw.revealed(), "");

        drive_typewriter(&mut tw, &mut sched, 10);
        assert_eq!(tw.revealed(), "a");
        drive_typewriter(&mut tw, &mut sched, 20);
        assert_eq!(tw.revealed(), "abc");
        assert!(tw.is_complete());
        assert!(!tw.is_running());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn never_splits_multibyte_chars() {
        let mut sched = Scheduler::new();
        let mut tw = Typewriter::new("año", 5, TAG);
        tw.start(&mut sched);
        drive_typewriter(&mut tw, &mut sched, 10);
        assert_eq!(tw.revealed(), "añ");
        assert_eq!(tw.revealed_chars(), 2);
    }

    #[test]
    fn empty_source_is_complete() {
        let mut sched = Scheduler::new();
        let mut tw = Typewriter::new("", 5, TAG);
        assert!(tw.is_complete());
        assert!(!tw.start(&mut sched));
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn no_auto_restart_after_completion() {
        let mut sched = Scheduler::new();
        let mut tw = Typewriter::new("hi", 5, TAG);
        tw.start(&mut sched);
        drive_typewriter(&mut tw, &mut sched, 100);
        assert!(!tw.start(&mut sched));
        assert_eq!(tw.revealed(), "hi");

        tw.reset(&mut sched);
        assert_eq!(tw.revealed(), "");
        assert!(tw.start(&mut sched));
    }

    #[test]
    fn cancel_keeps_prefix() {
        let mut sched = Scheduler::new();
        let mut tw = Typewriter::new("hello", 5, TAG);
        tw.start(&mut sched);
        drive_typewriter(&mut tw, &mut sched, 10);
        tw.cancel(&mut sched);
        drive_typewriter(&mut tw, &mut sched, 100);
        assert_eq!(tw.revealed(), "he");
    }
}
