//! User actions routed to the active module.

use phoenix_core::id::ProductId;
use phoenix_core::placement::PointerEvent;

use crate::module::ModuleId;

/// A single user action. Each action belongs to exactly one module.
#[derive(Debug, Clone, PartialEq)]
pub enum DemoAction {
    // -- Point of sale --
    AddProduct(ProductId),
    RemoveProduct(ProductId),
    Checkout,

    // -- Price audit --
    StartAudit,
    RestartAudit,

    // -- Bookings --
    ReceiveInquiry,
    PromptPayment,
    Pay,

    // -- Cameras --
    Pointer(PointerEvent),

    // -- Fiscal certification --
    StartCertification,
    RestartCertification,
}

impl DemoAction {
    /// The module this action belongs to.
    pub fn target(&self) -> ModuleId {
        match self {
            DemoAction::AddProduct(_) | DemoAction::RemoveProduct(_) | DemoAction::Checkout => {
                ModuleId::Pos
            }
            DemoAction::StartAudit | DemoAction::RestartAudit => ModuleId::Audit,
            DemoAction::ReceiveInquiry | DemoAction::PromptPayment | DemoAction::Pay => {
                ModuleId::Bookings
            }
            DemoAction::Pointer(_) => ModuleId::Cameras,
            DemoAction::StartCertification | DemoAction::RestartCertification => ModuleId::Fiscal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DemoAction::AddProduct(_) => "add_product",
            DemoAction::RemoveProduct(_) => "remove_product",
            DemoAction::Checkout => "checkout",
            DemoAction::StartAudit => "start_audit",
            DemoAction::RestartAudit => "restart_audit",
            DemoAction::ReceiveInquiry => "receive_inquiry",
            DemoAction::PromptPayment => "prompt_payment",
            DemoAction::Pay => "pay",
            DemoAction::Pointer(_) => "pointer",
            DemoAction::StartCertification => "start_certification",
            DemoAction::RestartCertification => "restart_certification",
        }
    }
}
