//! Module identifiers and the interface every demo module implements.
//!
//! The set of modules is closed: [`ModuleId`] is an enum, and
//! [`ModuleInstance`] holds one concrete module per variant, so dispatch is
//! an exhaustive `match` rather than a dynamic lookup.

use std::fmt;
use std::str::FromStr;

use phoenix_core::clock::{Fired, Millis, Scheduler};
use serde::{Deserialize, Serialize};

use crate::action::DemoAction;
use crate::error::DemoError;
use crate::event::EventLog;
use crate::modules::audit::{AuditModule, AuditView};
use crate::modules::bookings::{BookingsModule, BookingsView};
use crate::modules::cameras::{CamerasModule, CamerasView};
use crate::modules::fiscal::{FiscalModule, FiscalView};
use crate::modules::pos::{PosModule, PosView};

// ---------------------------------------------------------------------------
// ModuleId
// ---------------------------------------------------------------------------

/// Identifies a demo module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleId {
    Pos,
    Audit,
    Bookings,
    Cameras,
    Fiscal,
}

impl ModuleId {
    pub const ALL: [ModuleId; 5] = [
        ModuleId::Pos,
        ModuleId::Audit,
        ModuleId::Bookings,
        ModuleId::Cameras,
        ModuleId::Fiscal,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModuleId::Pos => "pos",
            ModuleId::Audit => "audit",
            ModuleId::Bookings => "bookings",
            ModuleId::Cameras => "cameras",
            ModuleId::Fiscal => "fiscal",
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModuleId {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModuleId::ALL
            .into_iter()
            .find(|id| id.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DemoError::UnknownModule { id: s.to_string() })
    }
}

// ---------------------------------------------------------------------------
// DemoModule trait
// ---------------------------------------------------------------------------

/// A self-contained module simulation.
///
/// Each module owns its own [`Scheduler`]; dropping the module drops every
/// timer it ever armed.
pub trait DemoModule: fmt::Debug {
    fn id(&self) -> ModuleId;

    fn scheduler(&self) -> &Scheduler;

    fn scheduler_mut(&mut self) -> &mut Scheduler;

    /// Handle one fired timer from this module's scheduler.
    fn on_timer(&mut self, fired: Fired, events: &mut EventLog);

    /// Apply a user action targeted at this module.
    fn handle(&mut self, action: &DemoAction, events: &mut EventLog) -> Result<(), DemoError>;

    /// Stop every running process. Called right before the instance is
    /// dropped.
    fn unmount(&mut self);

    /// Render-ready view data.
    fn view(&self) -> ModuleView;

    /// Whether any timer is still pending.
    fn is_busy(&self) -> bool {
        self.scheduler().pending() > 0
    }

    /// Run every timer due within the next `dt` milliseconds, one at a
    /// time and in order.
    fn advance(&mut self, dt: Millis, events: &mut EventLog) {
        let until = self.scheduler().now().saturating_add(dt);
        while let Some(fired) = self.scheduler_mut().pop_due(until) {
            self.on_timer(fired, events);
        }
        self.scheduler_mut().settle(until);
    }
}

// ---------------------------------------------------------------------------
// ModuleInstance
// ---------------------------------------------------------------------------

/// One live module, tagged by kind.
#[derive(Debug)]
pub enum ModuleInstance {
    Pos(PosModule),
    Audit(AuditModule),
    Bookings(BookingsModule),
    Cameras(CamerasModule),
    Fiscal(FiscalModule),
}

impl ModuleInstance {
    pub fn as_module(&self) -> &dyn DemoModule {
        match self {
            ModuleInstance::Pos(m) => m,
            ModuleInstance::Audit(m) => m,
            ModuleInstance::Bookings(m) => m,
            ModuleInstance::Cameras(m) => m,
            ModuleInstance::Fiscal(m) => m,
        }
    }

    pub fn as_module_mut(&mut self) -> &mut dyn DemoModule {
        match self {
            ModuleInstance::Pos(m) => m,
            ModuleInstance::Audit(m) => m,
            ModuleInstance::Bookings(m) => m,
            ModuleInstance::Cameras(m) => m,
            ModuleInstance::Fiscal(m) => m,
        }
    }

    pub fn id(&self) -> ModuleId {
        self.as_module().id()
    }
}

/// View data for the active module, tagged for JSON renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum ModuleView {
    Pos(PosView),
    Audit(AuditView),
    Bookings(BookingsView),
    Cameras(CamerasView),
    Fiscal(FiscalView),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_ids() {
        assert_eq!("pos".parse::<ModuleId>().unwrap(), ModuleId::Pos);
        assert_eq!(" Fiscal ".parse::<ModuleId>().unwrap(), ModuleId::Fiscal);
    }

    #[test]
    fn parse_unknown_id_fails() {
        let err = "payroll".parse::<ModuleId>().unwrap_err();
        assert!(matches!(err, DemoError::UnknownModule { ref id } if id == "payroll"));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for id in ModuleId::ALL {
            assert_eq!(id.to_string().parse::<ModuleId>().unwrap(), id);
        }
    }
}
