//! Price auditor: a percent scan followed by a typed-out report.

use phoenix_core::clock::{Fired, Scheduler};
use phoenix_core::id::TimerTag;
use phoenix_core::stage::{StageProcess, StageStatus};
use phoenix_core::typewriter::Typewriter;
use serde::Serialize;

use crate::action::DemoAction;
use crate::config::AuditConfig;
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::module::{DemoModule, ModuleId, ModuleView};
use crate::modules::discard_stale;

const SCAN: TimerTag = TimerTag(1);
const REPORT: TimerTag = TimerTag(2);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditView {
    pub status: StageStatus,
    pub label: String,
    pub percent: u8,
    pub report: String,
    pub report_complete: bool,
}

#[derive(Debug)]
pub struct AuditModule {
    scan: StageProcess,
    report: Typewriter,
    scheduler: Scheduler,
}

impl AuditModule {
    pub fn new(config: &AuditConfig) -> Self {
        Self {
            scan: StageProcess::new("price_scan", config.scan_plan(), SCAN),
            report: Typewriter::new(config.report.clone(), config.report_char_ms, REPORT),
            scheduler: Scheduler::new(),
        }
    }

    pub fn scan(&self) -> &StageProcess {
        &self.scan
    }

    pub fn report(&self) -> &Typewriter {
        &self.report
    }

    /// Start the scan. No-op while running or once finished.
    pub fn start(&mut self) -> bool {
        self.scan.start(&mut self.scheduler)
    }

    /// Throw away all progress and scan again.
    pub fn restart(&mut self) {
        self.scan.reset(&mut self.scheduler);
        self.report.reset(&mut self.scheduler);
        self.scan.start(&mut self.scheduler);
    }

    fn on_scan(&mut self, fired: &Fired, events: &mut EventLog) {
        let update = match self.scan.on_timer(&mut self.scheduler, fired) {
            Ok(update) => update,
            Err(_) => return discard_stale(ModuleId::Audit, fired, events),
        };
        events.push(DemoEvent::StageAdvanced {
            module: ModuleId::Audit,
            process: self.scan.id().to_string(),
            label: update.label,
            percent: update.percent,
        });
        if update.status == StageStatus::Complete {
            events.push(DemoEvent::ProcessCompleted {
                module: ModuleId::Audit,
                process: self.scan.id().to_string(),
            });
            self.report.start(&mut self.scheduler);
            // An empty report is complete before its first tick.
            if self.report.is_complete() {
                self.record_report(events);
            }
        }
    }

    fn record_report(&self, events: &mut EventLog) {
        events.push(DemoEvent::ProcessCompleted {
            module: ModuleId::Audit,
            process: "report".to_string(),
        });
    }

    fn on_report(&mut self, fired: &Fired, events: &mut EventLog) {
        if self.report.on_timer(&mut self.scheduler, fired).is_err() {
            return discard_stale(ModuleId::Audit, fired, events);
        }
        if self.report.is_complete() {
            self.record_report(events);
        }
    }
}

impl DemoModule for AuditModule {
    fn id(&self) -> ModuleId {
        ModuleId::Audit
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn on_timer(&mut self, fired: Fired, events: &mut EventLog) {
        match fired.tag {
            SCAN => self.on_scan(&fired, events),
            REPORT => self.on_report(&fired, events),
            _ => discard_stale(ModuleId::Audit, &fired, events),
        }
    }

    fn handle(&mut self, action: &DemoAction, _events: &mut EventLog) -> Result<(), DemoError> {
        match action {
            DemoAction::StartAudit => {
                self.start();
                Ok(())
            }
            DemoAction::RestartAudit => {
                self.restart();
                Ok(())
            }
            other => Err(DemoError::ActionUnavailable {
                action: other.name(),
                active: Some(ModuleId::Audit),
            }),
        }
    }

    fn unmount(&mut self) {
        self.scan.reset(&mut self.scheduler);
        self.report.reset(&mut self.scheduler);
    }

    fn view(&self) -> ModuleView {
        ModuleView::Audit(AuditView {
            status: self.scan.status(),
            label: self.scan.label().to_string(),
            percent: self.scan.progress_percent(),
            report: self.report.revealed().to_string(),
            report_complete: self.report.is_complete(),
        })
    }
}
