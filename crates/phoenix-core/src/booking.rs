//! Booking calendar and chat-style confirmation flow.
//!
//! The conversation moves strictly forward:
//!
//! ```text
//! AwaitingQuery -> OfferSent -> PaymentPrompted -> PaymentProcessing -> Confirmed
//! ```
//!
//! The last transition is driven by a timer and is the only place the
//! calendar is ever mutated.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::clock::{Fired, Millis, Scheduler, TimerError, TimerSlot};
use crate::id::TimerTag;

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    /// 1-based day number.
    pub day: u8,
    pub blocked: bool,
}

/// Fixed-size month of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calendar {
    days: Vec<CalendarDay>,
}

impl Calendar {
    /// Create `len` days, blocking any listed in `pre_blocked`. Out-of-range
    /// day numbers are ignored.
    pub fn new(len: u8, pre_blocked: &[u8]) -> Self {
        let days = (1..=len)
            .map(|day| CalendarDay {
                day,
                blocked: pre_blocked.contains(&day),
            })
            .collect();
        Self { days }
    }

    pub fn days(&self) -> &[CalendarDay] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn is_blocked(&self, day: u8) -> bool {
        self.day_index(day)
            .map(|i| self.days[i].blocked)
            .unwrap_or(false)
    }

    pub fn blocked_days(&self) -> Vec<u8> {
        self.days
            .iter()
            .filter(|d| d.blocked)
            .map(|d| d.day)
            .collect()
    }

    fn day_index(&self, day: u8) -> Option<usize> {
        (day >= 1 && usize::from(day) <= self.days.len()).then(|| usize::from(day) - 1)
    }

    /// Block the given days. Returns how many were newly blocked.
    fn block(&mut self, days: &[u8]) -> usize {
        let mut newly = 0;
        for &day in days {
            if let Some(i) = self.day_index(day) {
                if !self.days[i].blocked {
                    self.days[i].blocked = true;
                    newly += 1;
                }
            }
        }
        newly
    }
}

// ---------------------------------------------------------------------------
// Conversation types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Speaker {
    User,
    System,
}

/// An action attached to a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MessageAction {
    PaymentPrompt { amount: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub speaker: Speaker,
    pub text: String,
    pub action: Option<MessageAction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BookingState {
    AwaitingQuery,
    OfferSent,
    PaymentPrompted,
    PaymentProcessing,
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PaymentStatus {
    NotStarted,
    Processing,
    Confirmed,
}

/// User-facing steps of the flow, named in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingAction {
    Inquiry,
    PromptPayment,
    Pay,
}

/// Scripted texts and constants for one conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingScript {
    pub inquiry: String,
    pub offer: String,
    pub prompt: String,
    pub confirmation: String,
    pub amount: u64,
    pub days_to_block: Vec<u8>,
    pub processing_ms: Millis,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("{action:?} is not allowed while {state:?}")]
    InvalidTransition {
        state: BookingState,
        action: BookingAction,
    },
}

// ---------------------------------------------------------------------------
// BookingConversation
// ---------------------------------------------------------------------------

/// Conversation plus the calendar it owns.
#[derive(Debug, Clone)]
pub struct BookingConversation {
    script: BookingScript,
    state: BookingState,
    messages: Vec<Message>,
    calendar: Calendar,
    calendar_mutations: u32,
    timer: TimerSlot,
}

impl BookingConversation {
    pub fn new(script: BookingScript, calendar: Calendar, tag: TimerTag) -> Self {
        Self {
            script,
            state: BookingState::AwaitingQuery,
            messages: Vec::new(),
            calendar,
            calendar_mutations: 0,
            timer: TimerSlot::new(tag),
        }
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    pub fn payment_status(&self) -> PaymentStatus {
        match self.state {
            BookingState::PaymentProcessing => PaymentStatus::Processing,
            BookingState::Confirmed => PaymentStatus::Confirmed,
            _ => PaymentStatus::NotStarted,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// How many times the calendar has been mutated (0 or 1).
    pub fn calendar_mutations(&self) -> u32 {
        self.calendar_mutations
    }

    pub fn script(&self) -> &BookingScript {
        &self.script
    }

    /// The payment action currently offered, if any.
    pub fn pending_action(&self) -> Option<MessageAction> {
        if self.state != BookingState::PaymentPrompted {
            return None;
        }
        self.messages.iter().rev().find_map(|m| m.action)
    }

    /// `AwaitingQuery -> OfferSent`: the simulated inbound inquiry and the
    /// availability reply.
    pub fn receive_inquiry(&mut self) -> Result<(), BookingError> {
        self.expect(BookingState::AwaitingQuery, BookingAction::Inquiry)?;
        self.push(Speaker::User, self.script.inquiry.clone(), None);
        self.push(Speaker::System, self.script.offer.clone(), None);
        self.transition(BookingState::OfferSent);
        Ok(())
    }

    /// `OfferSent -> PaymentPrompted`: append a message carrying the payment
    /// action.
    pub fn prompt_payment(&mut self) -> Result<(), BookingError> {
        self.expect(BookingState::OfferSent, BookingAction::PromptPayment)?;
        let action = MessageAction::PaymentPrompt {
            amount: self.script.amount,
        };
        self.push(Speaker::System, self.script.prompt.clone(), Some(action));
        self.transition(BookingState::PaymentPrompted);
        Ok(())
    }

    /// `PaymentPrompted -> PaymentProcessing`: start the confirmation timer.
    pub fn pay(&mut self, sched: &mut Scheduler) -> Result<(), BookingError> {
        self.expect(BookingState::PaymentPrompted, BookingAction::Pay)?;
        self.timer.arm_once(sched, self.script.processing_ms);
        self.transition(BookingState::PaymentProcessing);
        Ok(())
    }

    /// `PaymentProcessing -> Confirmed`: block the scripted days once.
    /// Returns the number of newly blocked days.
    pub fn on_timer(&mut self, sched: &mut Scheduler, fired: &Fired) -> Result<usize, TimerError> {
        self.timer.accept(fired)?;
        self.timer.disarm(sched);

        let newly = self.calendar.block(&self.script.days_to_block);
        self.calendar_mutations += 1;
        self.push(Speaker::System, self.script.confirmation.clone(), None);
        self.transition(BookingState::Confirmed);
        Ok(newly)
    }

    /// Stop a pending confirmation without changing state.
    pub fn cancel(&mut self, sched: &mut Scheduler) -> bool {
        self.timer.disarm(sched)
    }

    fn expect(&self, state: BookingState, action: BookingAction) -> Result<(), BookingError> {
        if self.state == state {
            Ok(())
        } else {
            Err(BookingError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }

    fn push(&mut self, speaker: Speaker, text: String, action: Option<MessageAction>) {
        self.messages.push(Message {
            speaker,
            text,
            action,
        });
    }

    fn transition(&mut self, to: BookingState) {
        debug!(from = ?self.state, to = ?to, "booking transition");
        self.state = to;
    }
}

// ===========================================================================
// Tests
// ===========================================================================
