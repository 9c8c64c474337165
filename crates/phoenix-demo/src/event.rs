//! Bounded log of demo events for renderers and tests.
//!
//! The log keeps the most recent `capacity` events; older ones are dropped
//! and counted.

use std::collections::VecDeque;

use serde::Serialize;

use crate::module::ModuleId;

/// Something observable that happened in the demo.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DemoEvent {
    // -- Router --
    DemoEntered,
    DemoExited,
    ModuleEntered { module: ModuleId },
    ModuleExited { module: ModuleId },
    NavigationRejected { requested: String },

    // -- Processes --
    StageAdvanced {
        module: ModuleId,
        process: String,
        label: String,
        percent: u8,
    },
    ProcessCompleted { module: ModuleId, process: String },
    StaleTimerDiscarded { module: ModuleId },

    // -- Module outcomes --
    CheckoutStarted { total: u64 },
    CheckoutCompleted { total: u64, units: u32 },
    BookingConfirmed { days: Vec<u8> },
    MarkerPlaced { index: usize },
    MarkerRotated { index: usize, orientation: u16 },
}

/// Discriminant tag for event types, used for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DemoEventKind {
    DemoEntered,
    DemoExited,
    ModuleEntered,
    ModuleExited,
    NavigationRejected,
    StageAdvanced,
    ProcessCompleted,
    StaleTimerDiscarded,
    CheckoutStarted,
    CheckoutCompleted,
    BookingConfirmed,
    MarkerPlaced,
    MarkerRotated,
}

impl DemoEvent {
    pub fn kind(&self) -> DemoEventKind {
        match self {
            DemoEvent::DemoEntered => DemoEventKind::DemoEntered,
            DemoEvent::DemoExited => DemoEventKind::DemoExited,
            DemoEvent::ModuleEntered { .. } => DemoEventKind::ModuleEntered,
            DemoEvent::ModuleExited { .. } => DemoEventKind::ModuleExited,
            DemoEvent::NavigationRejected { .. } => DemoEventKind::NavigationRejected,
            DemoEvent::StageAdvanced { .. } => DemoEventKind::StageAdvanced,
            DemoEvent::ProcessCompleted { .. } => DemoEventKind::ProcessCompleted,
            DemoEvent::StaleTimerDiscarded { .. } => DemoEventKind::StaleTimerDiscarded,
            DemoEvent::CheckoutStarted { .. } => DemoEventKind::CheckoutStarted,
            DemoEvent::CheckoutCompleted { .. } => DemoEventKind::CheckoutCompleted,
            DemoEvent::BookingConfirmed { .. } => DemoEventKind::BookingConfirmed,
            DemoEvent::MarkerPlaced { .. } => DemoEventKind::MarkerPlaced,
            DemoEvent::MarkerRotated { .. } => DemoEventKind::MarkerRotated,
        }
    }
}

/// Ring buffer of [`DemoEvent`]s. A capacity of 0 is clamped to 1.
#[derive(Debug, Clone)]
pub struct EventLog {
    events: VecDeque<DemoEvent>,
    capacity: usize,
    total_written: u64,
}

impl EventLog {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            total_written: 0,
        }
    }

    /// Record an event, dropping the oldest if full.
    pub fn push(&mut self, event: DemoEvent) {
        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(event);
        self.total_written += 1;
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Total events written since creation (including dropped).
    pub fn total_written(&self) -> u64 {
        self.total_written
    }

    /// Number of events dropped because the log was full.
    pub fn dropped_count(&self) -> u64 {
        self.total_written.saturating_sub(self.events.len() as u64)
    }

    /// Events from oldest to newest.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &DemoEvent> + ExactSizeIterator {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&DemoEvent> {
        self.events.back()
    }

    /// How many retained events are of `kind`.
    pub fn count(&self, kind: DemoEventKind) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_iterate_in_order() {
        let mut log = EventLog::new(4);
        log.push(DemoEvent::DemoEntered);
        log.push(DemoEvent::ModuleEntered {
            module: ModuleId::Pos,
        });
        let kinds: Vec<DemoEventKind> = log.iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![DemoEventKind::DemoEntered, DemoEventKind::ModuleEntered]
        );
    }

    #[test]
    fn full_log_drops_oldest() {
        let mut log = EventLog::new(2);
        log.push(DemoEvent::DemoEntered);
        log.push(DemoEvent::DemoExited);
        log.push(DemoEvent::DemoEntered);
        assert_eq!(log.len(), 2);
        assert_eq!(log.total_written(), 3);
        assert_eq!(log.dropped_count(), 1);
        assert_eq!(log.iter().next(), Some(&DemoEvent::DemoExited));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut log = EventLog::new(0);
        assert_eq!(log.capacity(), 1);
        log.push(DemoEvent::DemoEntered);
        log.push(DemoEvent::DemoExited);
        assert_eq!(log.last(), Some(&DemoEvent::DemoExited));
    }

    #[test]
    fn count_by_kind() {
        let mut log = EventLog::new(8);
        log.push(DemoEvent::MarkerPlaced { index: 0 });
        log.push(DemoEvent::MarkerPlaced { index: 1 });
        log.push(DemoEvent::DemoExited);
        assert_eq!(log.count(DemoEventKind::MarkerPlaced), 2);
        log.clear();
        assert!(log.is_empty());
    }
}
