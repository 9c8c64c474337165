//! Concrete module simulations, one canonical state machine per module type.

pub mod audit;
pub mod bookings;
pub mod cameras;
pub mod fiscal;
pub mod pos;

use phoenix_core::clock::Fired;
use tracing::trace;

use crate::config::DemoConfig;
use crate::event::{DemoEvent, EventLog};
use crate::module::{ModuleId, ModuleInstance};

/// Build a fresh instance of `id` from `config`.
pub fn instantiate(id: ModuleId, config: &DemoConfig) -> ModuleInstance {
    match id {
        ModuleId::Pos => ModuleInstance::Pos(pos::PosModule::new(&config.pos)),
        ModuleId::Audit => ModuleInstance::Audit(audit::AuditModule::new(&config.audit)),
        ModuleId::Bookings => {
            ModuleInstance::Bookings(bookings::BookingsModule::new(&config.bookings))
        }
        ModuleId::Cameras => ModuleInstance::Cameras(cameras::CamerasModule::new(&config.cameras)),
        ModuleId::Fiscal => ModuleInstance::Fiscal(fiscal::FiscalModule::new(&config.fiscal)),
    }
}

/// Log and record a timer fire that no longer belongs to a live process.
pub(crate) fn discard_stale(module: ModuleId, fired: &Fired, events: &mut EventLog) {
    trace!(
        %module,
        tag = fired.tag.0,
        generation = fired.generation.0,
        "discarding stale timer"
    );
    events.push(DemoEvent::StaleTimerDiscarded { module });
}
