//! Rentals: a scripted chat that ends by blocking days on the calendar.

use phoenix_core::booking::{
    BookingConversation, BookingState, Calendar, CalendarDay, Message, MessageAction,
    PaymentStatus,
};
use phoenix_core::clock::{Fired, Scheduler};
use phoenix_core::id::TimerTag;
use serde::Serialize;
use tracing::debug;

use crate::action::DemoAction;
use crate::config::BookingsConfig;
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::module::{DemoModule, ModuleId, ModuleView};
use crate::modules::discard_stale;

const CONFIRMATION: TimerTag = TimerTag(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingsView {
    pub state: BookingState,
    pub payment_status: PaymentStatus,
    pub messages: Vec<Message>,
    pub days: Vec<CalendarDay>,
    pub pending_action: Option<MessageAction>,
}

#[derive(Debug)]
pub struct BookingsModule {
    conversation: BookingConversation,
    scheduler: Scheduler,
}

impl BookingsModule {
    pub fn new(config: &BookingsConfig) -> Self {
        let calendar = Calendar::new(config.calendar_days, &config.pre_blocked);
        Self {
            conversation: BookingConversation::new(config.script.clone(), calendar, CONFIRMATION),
            scheduler: Scheduler::new(),
        }
    }

    pub fn conversation(&self) -> &BookingConversation {
        &self.conversation
    }

    pub fn receive_inquiry(&mut self) -> Result<(), DemoError> {
        Ok(self.conversation.receive_inquiry()?)
    }

    pub fn prompt_payment(&mut self) -> Result<(), DemoError> {
        Ok(self.conversation.prompt_payment()?)
    }

    pub fn pay(&mut self) -> Result<(), DemoError> {
        Ok(self.conversation.pay(&mut self.scheduler)?)
    }
}

impl DemoModule for BookingsModule {
    fn id(&self) -> ModuleId {
        ModuleId::Bookings
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn on_timer(&mut self, fired: Fired, events: &mut EventLog) {
        match self.conversation.on_timer(&mut self.scheduler, &fired) {
            Ok(newly) => {
                debug!(newly, "booking confirmed");
                events.push(DemoEvent::BookingConfirmed {
                    days: self.conversation.script().days_to_block.clone(),
                });
            }
            Err(_) => discard_stale(ModuleId::Bookings, &fired, events),
        }
    }

    fn handle(&mut self, action: &DemoAction, _events: &mut EventLog) -> Result<(), DemoError> {
        match action {
            DemoAction::ReceiveInquiry => self.receive_inquiry(),
            DemoAction::PromptPayment => self.prompt_payment(),
            DemoAction::Pay => self.pay(),
            other => Err(DemoError::ActionUnavailable {
                action: other.name(),
                active: Some(ModuleId::Bookings),
            }),
        }
    }

    fn unmount(&mut self) {
        self.conversation.cancel(&mut self.scheduler);
    }

    fn view(&self) -> ModuleView {
        let conv = &self.conversation;
        ModuleView::Bookings(BookingsView {
            state: conv.state(),
            payment_status: conv.payment_status(),
            messages: conv.messages().to_vec(),
            days: conv.calendar().days().to_vec(),
            pending_action: conv.pending_action(),
        })
    }
}
