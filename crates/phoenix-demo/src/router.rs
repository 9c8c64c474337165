//! Top-level view router: landing page versus demo, and which module is on
//! screen.
//!
//! ```text
//! Landing --enter_demo--> Demo(default) --navigate(id)--> Demo(id)
//!    ^                                                       |
//!    +---------------------------exit_demo-------------------+
//! ```
//!
//! Only the active module exists. Navigating away or exiting unmounts and
//! drops it, so no timer outlives the view that armed it.

use phoenix_core::clock::Millis;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::action::DemoAction;
use crate::config::DemoConfig;
use crate::contact::{self, Platform};
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::manifest::default_manifest;
use crate::module::{ModuleId, ModuleInstance, ModuleView};
use crate::modules::audit::AuditModule;
use crate::modules::bookings::BookingsModule;
use crate::modules::cameras::CamerasModule;
use crate::modules::fiscal::FiscalModule;
use crate::modules::pos::PosModule;
use crate::registry::ModuleRegistry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Landing,
    Demo,
}

/// Router-level view state. `active_module` is `Some` exactly when
/// `mode == Demo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DemoViewState {
    pub mode: Mode,
    pub active_module: Option<ModuleId>,
    /// Mobile navigation drawer. Purely presentational.
    pub nav_expanded: bool,
}

impl Default for DemoViewState {
    fn default() -> Self {
        Self {
            mode: Mode::Landing,
            active_module: None,
            nav_expanded: false,
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewSnapshot {
    #[serde(flatten)]
    pub state: DemoViewState,
    pub elapsed_ms: Millis,
    pub theme_accent: Option<String>,
    pub view: Option<ModuleView>,
}

/// Owns the registry, the active module and the event log.
#[derive(Debug)]
pub struct DemoRouter {
    view: DemoViewState,
    registry: ModuleRegistry,
    active: Option<ModuleInstance>,
    events: EventLog,
    elapsed: Millis,
}

impl DemoRouter {
    pub fn new(registry: ModuleRegistry) -> Self {
        let events = EventLog::new(registry.config().event_capacity);
        Self {
            view: DemoViewState::default(),
            registry,
            active: None,
            events,
            elapsed: 0,
        }
    }

    /// Router over every built-in module, configured from `config`.
    pub fn from_config(config: DemoConfig) -> Result<Self, DemoError> {
        let manifest = default_manifest()?;
        Ok(Self::new(ModuleRegistry::standard(config, &manifest)?))
    }

    /// Router using [`DemoConfig::from_env`].
    pub fn standard() -> Result<Self, DemoError> {
        Self::from_config(DemoConfig::from_env()?)
    }

    // -- State --

    pub fn view(&self) -> DemoViewState {
        self.view
    }

    pub fn mode(&self) -> Mode {
        self.view.mode
    }

    pub fn active_module(&self) -> Option<ModuleId> {
        self.view.active_module
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    /// Virtual time advanced since the router was created.
    pub fn elapsed(&self) -> Millis {
        self.elapsed
    }

    pub fn active(&self) -> Option<&ModuleInstance> {
        self.active.as_ref()
    }

    // -- Transitions --

    /// `Landing -> Demo(default)`. A no-op when already in the demo.
    pub fn enter_demo(&mut self) -> Result<(), DemoError> {
        if self.view.mode == Mode::Demo {
            return Ok(());
        }
        let id = self.registry.default_module();
        let instance = self.registry.instantiate(id)?;
        self.view.mode = Mode::Demo;
        self.events.push(DemoEvent::DemoEntered);
        self.mount(instance);
        info!(module = %id, "entered demo");
        Ok(())
    }

    /// `Demo(*) -> Landing`, discarding all module state. A no-op on the
    /// landing page.
    pub fn exit_demo(&mut self) {
        if self.view.mode == Mode::Landing {
            return;
        }
        self.unmount();
        self.view = DemoViewState::default();
        self.events.push(DemoEvent::DemoExited);
        info!("exited demo");
    }

    /// Switch the active module. The previous module is unmounted and
    /// dropped; the new one starts fresh, even when it is the same module.
    ///
    /// Unregistered ids leave the router untouched.
    pub fn navigate(&mut self, id: ModuleId) -> Result<(), DemoError> {
        if self.view.mode != Mode::Demo {
            return Err(DemoError::NotInDemo);
        }
        let instance = match self.registry.instantiate(id) {
            Ok(instance) => instance,
            Err(err) => {
                self.reject(id.as_str());
                return Err(err);
            }
        };
        self.unmount();
        self.mount(instance);
        info!(module = %id, "navigated");
        Ok(())
    }

    /// [`navigate`](Self::navigate) by textual id.
    pub fn navigate_str(&mut self, id: &str) -> Result<(), DemoError> {
        if self.view.mode != Mode::Demo {
            return Err(DemoError::NotInDemo);
        }
        match id.parse::<ModuleId>() {
            Ok(parsed) => self.navigate(parsed),
            Err(err) => {
                self.reject(id);
                Err(err)
            }
        }
    }

    /// Flip the mobile navigation drawer. Returns the new state.
    pub fn toggle_nav(&mut self) -> bool {
        self.view.nav_expanded = !self.view.nav_expanded;
        self.view.nav_expanded
    }

    // -- Actions and time --

    /// Route a user action to the active module.
    pub fn dispatch(&mut self, action: DemoAction) -> Result<(), DemoError> {
        let Some(module) = self.active.as_mut() else {
            return Err(DemoError::NotInDemo);
        };
        let active = module.id();
        if action.target() != active {
            return Err(DemoError::ActionUnavailable {
                action: action.name(),
                active: Some(active),
            });
        }
        debug!(module = %active, action = action.name(), "dispatch");
        module.as_module_mut().handle(&action, &mut self.events)
    }

    /// Advance virtual time. Only the active module has timers.
    pub fn advance(&mut self, dt: Millis) {
        self.elapsed = self.elapsed.saturating_add(dt);
        if let Some(module) = self.active.as_mut() {
            module.as_module_mut().advance(dt, &mut self.events);
        }
    }

    // -- Typed access to the active module --

    pub fn pos(&self) -> Option<&PosModule> {
        match &self.active {
            Some(ModuleInstance::Pos(m)) => Some(m),
            _ => None,
        }
    }

    pub fn audit(&self) -> Option<&AuditModule> {
        match &self.active {
            Some(ModuleInstance::Audit(m)) => Some(m),
            _ => None,
        }
    }

    pub fn bookings(&self) -> Option<&BookingsModule> {
        match &self.active {
            Some(ModuleInstance::Bookings(m)) => Some(m),
            _ => None,
        }
    }

    pub fn cameras(&self) -> Option<&CamerasModule> {
        match &self.active {
            Some(ModuleInstance::Cameras(m)) => Some(m),
            _ => None,
        }
    }

    pub fn fiscal(&self) -> Option<&FiscalModule> {
        match &self.active {
            Some(ModuleInstance::Fiscal(m)) => Some(m),
            _ => None,
        }
    }

    // -- Rendering --

    pub fn snapshot(&self) -> ViewSnapshot {
        let theme_accent = self
            .view
            .active_module
            .and_then(|id| self.registry.theme_accent(id).ok())
            .map(str::to_string);
        ViewSnapshot {
            state: self.view,
            elapsed_ms: self.elapsed,
            theme_accent,
            view: self.active.as_ref().map(|m| m.as_module().view()),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, DemoError> {
        serde_json::to_string(&self.snapshot()).map_err(|e| DemoError::Serialization {
            detail: e.to_string(),
        })
    }

    /// Contact link for the configured phone and message.
    pub fn contact_link(&self, platform: Platform) -> Result<Url, DemoError> {
        let cfg = &self.registry.config().contact;
        contact::contact_link(platform, &cfg.phone, &cfg.message)
    }

    // -- Internals --

    fn mount(&mut self, instance: ModuleInstance) {
        let id = instance.id();
        self.active = Some(instance);
        self.view.active_module = Some(id);
        self.events.push(DemoEvent::ModuleEntered { module: id });
    }

    fn unmount(&mut self) {
        if let Some(mut old) = self.active.take() {
            old.as_module_mut().unmount();
            let id = old.id();
            self.events.push(DemoEvent::ModuleExited { module: id });
            debug!(module = %id, "module unmounted");
        }
        self.view.active_module = None;
    }

    fn reject(&mut self, requested: &str) {
        warn!(requested, "navigation to unknown module ignored");
        self.events.push(DemoEvent::NavigationRejected {
            requested: requested.to_string(),
        });
    }
}

// ===========================================================================
// Tests
// ===========================================================================
