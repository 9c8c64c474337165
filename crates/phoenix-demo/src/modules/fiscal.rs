//! Fiscal certification: a fixed sequence of timed stages.

use phoenix_core::clock::{Fired, Scheduler};
use phoenix_core::id::TimerTag;
use phoenix_core::stage::{StagePlan, StageProcess, StageStatus};
use serde::Serialize;

use crate::action::DemoAction;
use crate::config::FiscalConfig;
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::module::{DemoModule, ModuleId, ModuleView};
use crate::modules::discard_stale;

const CERTIFICATION: TimerTag = TimerTag(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiscalView {
    pub status: StageStatus,
    pub label: String,
    pub index: usize,
    pub stage_count: usize,
    pub percent: u8,
    pub stages: Vec<String>,
    pub certificate_ready: bool,
}

#[derive(Debug)]
pub struct FiscalModule {
    certification: StageProcess,
    scheduler: Scheduler,
}

impl FiscalModule {
    pub fn new(config: &FiscalConfig) -> Self {
        let plan = StagePlan::Staged(config.stages.clone());
        Self {
            certification: StageProcess::new("certification", plan, CERTIFICATION),
            scheduler: Scheduler::new(),
        }
    }

    pub fn certification(&self) -> &StageProcess {
        &self.certification
    }

    /// Start certifying. A plan with no stages completes right here rather
    /// than on a timer, so completion is recorded immediately.
    pub fn start(&mut self, events: &mut EventLog) -> bool {
        let started = self.certification.start(&mut self.scheduler);
        if started && self.certification.is_complete() {
            self.record_completion(events);
        }
        started
    }

    pub fn restart(&mut self, events: &mut EventLog) {
        self.certification.reset(&mut self.scheduler);
        self.start(events);
    }

    fn record_completion(&self, events: &mut EventLog) {
        events.push(DemoEvent::ProcessCompleted {
            module: ModuleId::Fiscal,
            process: self.certification.id().to_string(),
        });
    }

    fn stage_labels(&self) -> Vec<String> {
        match self.certification.plan() {
            StagePlan::Staged(stages) => stages.iter().map(|s| s.label.clone()).collect(),
            StagePlan::Percent { label, .. } => vec![label.clone()],
        }
    }
}

impl DemoModule for FiscalModule {
    fn id(&self) -> ModuleId {
        ModuleId::Fiscal
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn on_timer(&mut self, fired: Fired, events: &mut EventLog) {
        let update = match self.certification.on_timer(&mut self.scheduler, &fired) {
            Ok(update) => update,
            Err(_) => return discard_stale(ModuleId::Fiscal, &fired, events),
        };
        let complete = update.status == StageStatus::Complete;
        events.push(DemoEvent::StageAdvanced {
            module: ModuleId::Fiscal,
            process: self.certification.id().to_string(),
            label: update.label,
            percent: update.percent,
        });
        if complete {
            self.record_completion(events);
        }
    }

    fn handle(&mut self, action: &DemoAction, events: &mut EventLog) -> Result<(), DemoError> {
        match action {
            DemoAction::StartCertification => {
                self.start(events);
                Ok(())
            }
            DemoAction::RestartCertification => {
                self.restart(events);
                Ok(())
            }
            other => Err(DemoError::ActionUnavailable {
                action: other.name(),
                active: Some(ModuleId::Fiscal),
            }),
        }
    }

    fn unmount(&mut self) {
        self.certification.reset(&mut self.scheduler);
    }

    fn view(&self) -> ModuleView {
        let cert = &self.certification;
        ModuleView::Fiscal(FiscalView {
            status: cert.status(),
            label: cert.label().to_string(),
            index: cert.current_index(),
            stage_count: cert.stage_count(),
            percent: cert.progress_percent(),
            stages: self.stage_labels(),
            certificate_ready: cert.is_complete(),
        })
    }
}
