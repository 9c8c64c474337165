//! Demo orchestration for the Phoenix Neural Suite.
//!
//! A [`DemoRouter`] switches between the landing page and a demo mode that
//! shows one module at a time. Modules are looked up in a
//! [`ModuleRegistry`], instantiated fresh on every visit and dropped when
//! the user navigates away. Renderers read a serializable [`ViewSnapshot`]
//! and drive time by calling [`DemoRouter::advance`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use phoenix_demo::{DemoAction, DemoRouter, ModuleId};
//!
//! let mut router = DemoRouter::standard()?;
//! router.enter_demo()?;
//! router.navigate(ModuleId::Audit)?;
//! router.dispatch(DemoAction::StartAudit)?;
//! router.advance(500);
//! let json = router.snapshot_json()?;
//! ```

pub mod action;
pub mod config;
pub mod contact;
pub mod error;
pub mod event;
pub mod manifest;
pub mod module;
pub mod modules;
pub mod registry;
pub mod router;

pub use action::DemoAction;
pub use config::DemoConfig;
pub use contact::Platform;
pub use error::DemoError;
pub use event::{DemoEvent, DemoEventKind, EventLog};
pub use manifest::{ModuleEntry, ModuleManifest};
pub use module::{DemoModule, ModuleId, ModuleInstance, ModuleView};
pub use registry::{ModuleRegistry, RegistryBuilder};
pub use router::{DemoRouter, DemoViewState, Mode, ViewSnapshot};
