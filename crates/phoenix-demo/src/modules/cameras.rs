//! Security cameras: place and rotate markers on a floor plan.

use phoenix_core::clock::{Fired, Scheduler};
use phoenix_core::placement::{
    CanvasRect, Marker, Placement, PlacementError, PointerEvent, PointerOutcome,
};
use serde::Serialize;
use tracing::trace;

use crate::action::DemoAction;
use crate::config::CamerasConfig;
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::module::{DemoModule, ModuleId, ModuleView};
use crate::modules::discard_stale;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CamerasView {
    pub canvas: CanvasRect,
    pub markers: Vec<Marker>,
}

/// Camera placement has no timers; the scheduler only exists to satisfy
/// [`DemoModule`] and stays empty.
#[derive(Debug)]
pub struct CamerasModule {
    placement: Placement,
    canvas: CanvasRect,
    scheduler: Scheduler,
}

impl CamerasModule {
    pub fn new(config: &CamerasConfig) -> Self {
        Self {
            placement: Placement::new(config.rotation_step, config.hit_radius),
            canvas: config.canvas,
            scheduler: Scheduler::new(),
        }
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn canvas(&self) -> &CanvasRect {
        &self.canvas
    }

    /// Rotate a marker by index, e.g. from a keyboard shortcut.
    pub fn rotate_marker(&mut self, index: usize, events: &mut EventLog) -> Result<u16, DemoError> {
        let orientation = self.placement.rotate(index)?;
        events.push(DemoEvent::MarkerRotated { index, orientation });
        Ok(orientation)
    }

    /// Route a pointer event through the canvas rectangle.
    ///
    /// A secondary click that misses every marker is not an error for the
    /// demo; it is logged and reported as [`PointerOutcome::Ignored`].
    pub fn pointer(&mut self, event: &PointerEvent, events: &mut EventLog) -> PointerOutcome {
        match self.placement.handle_pointer(&self.canvas, event) {
            Ok(outcome) => {
                match outcome {
                    PointerOutcome::Placed { index } => {
                        events.push(DemoEvent::MarkerPlaced { index })
                    }
                    PointerOutcome::Rotated { index, orientation } => {
                        events.push(DemoEvent::MarkerRotated { index, orientation })
                    }
                    PointerOutcome::Ignored => {
                        trace!(x = event.client_x, y = event.client_y, "pointer outside canvas")
                    }
                }
                outcome
            }
            Err(PlacementError::InvalidPointerTarget { index }) => {
                trace!(?index, "rotate missed every marker");
                PointerOutcome::Ignored
            }
        }
    }
}

impl DemoModule for CamerasModule {
    fn id(&self) -> ModuleId {
        ModuleId::Cameras
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn on_timer(&mut self, fired: Fired, events: &mut EventLog) {
        discard_stale(ModuleId::Cameras, &fired, events);
    }

    fn handle(&mut self, action: &DemoAction, events: &mut EventLog) -> Result<(), DemoError> {
        match action {
            DemoAction::Pointer(event) => {
                self.pointer(event, events);
                Ok(())
            }
            other => Err(DemoError::ActionUnavailable {
                action: other.name(),
                active: Some(ModuleId::Cameras),
            }),
        }
    }

    fn unmount(&mut self) {}

    fn view(&self) -> ModuleView {
        ModuleView::Cameras(CamerasView {
            canvas: self.canvas,
            markers: self.placement.markers().to_vec(),
        })
    }
}
