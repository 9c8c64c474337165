use std::path::PathBuf;

use phoenix_core::booking::BookingError;
use phoenix_core::id::ProductId;
use phoenix_core::placement::PlacementError;

use crate::module::ModuleId;

/// Errors that can occur in the demo engine.
#[derive(Debug, thiserror::Error)]
pub enum DemoError {
    /// The id does not name a registered module.
    #[error("module '{id}' is not registered")]
    UnknownModule { id: String },

    /// A demo-only operation was requested while on the landing page.
    #[error("not in demo mode")]
    NotInDemo,

    /// The action targets a module other than the active one.
    #[error("action '{action}' is not available in module {active:?}")]
    ActionUnavailable {
        action: &'static str,
        active: Option<ModuleId>,
    },

    /// The product id is not in the point-of-sale catalog.
    #[error("product {id:?} not found in catalog")]
    UnknownProduct { id: ProductId },

    /// The cart is locked while a delayed checkout is in flight.
    #[error("checkout already in progress")]
    CheckoutPending,

    /// A booking action was out of order.
    #[error(transparent)]
    Booking(#[from] BookingError),

    /// A placement action had no target.
    #[error(transparent)]
    Placement(#[from] PlacementError),

    /// The configuration parsed but is inconsistent.
    #[error("invalid config: {detail}")]
    InvalidConfig { detail: String },

    /// Failed to parse a config or manifest file.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A contact link could not be built.
    #[error("invalid contact link: {0}")]
    Link(#[from] url::ParseError),

    /// Snapshot serialization failed.
    #[error("serialization error: {detail}")]
    Serialization { detail: String },
}
