//! Point-of-sale module: catalog, cart and checkout.

use phoenix_core::cart::{Cart, LineItem, Product, Receipt};
use phoenix_core::clock::{Fired, Scheduler, TimerSlot};
use phoenix_core::id::{ProductId, TimerTag};
use serde::Serialize;
use tracing::debug;

use crate::action::DemoAction;
use crate::config::{CheckoutMode, PosConfig};
use crate::error::DemoError;
use crate::event::{DemoEvent, EventLog};
use crate::module::{DemoModule, ModuleId, ModuleView};
use crate::modules::discard_stale;

const CHECKOUT: TimerTag = TimerTag(1);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PosView {
    pub items: Vec<LineItem>,
    pub total: u64,
    pub checkout_pending: bool,
    pub last_receipt: Option<Receipt>,
}

#[derive(Debug)]
pub struct PosModule {
    catalog: Vec<Product>,
    cart: Cart,
    mode: CheckoutMode,
    checkout_timer: TimerSlot,
    last_receipt: Option<Receipt>,
    scheduler: Scheduler,
}

impl PosModule {
    pub fn new(config: &PosConfig) -> Self {
        Self {
            catalog: config.catalog.clone(),
            cart: Cart::new(),
            mode: config.checkout,
            checkout_timer: TimerSlot::new(CHECKOUT),
            last_receipt: None,
            scheduler: Scheduler::new(),
        }
    }

    pub fn catalog(&self) -> &[Product] {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn total(&self) -> u64 {
        self.cart.total()
    }

    pub fn last_receipt(&self) -> Option<Receipt> {
        self.last_receipt
    }

    pub fn is_checkout_pending(&self) -> bool {
        self.checkout_timer.is_armed()
    }

    /// Add one unit of a catalog product. Returns the line's new quantity.
    pub fn add_product(&mut self, id: ProductId) -> Result<u32, DemoError> {
        self.ensure_editable()?;
        let product = self
            .catalog
            .iter()
            .find(|p| p.id == id)
            .ok_or(DemoError::UnknownProduct { id })?;
        Ok(self.cart.add_item(product))
    }

    /// Remove a whole line. Returns false if the product was not in the cart.
    pub fn remove_product(&mut self, id: ProductId) -> Result<bool, DemoError> {
        self.ensure_editable()?;
        Ok(self.cart.remove_item(id).is_some())
    }

    /// Clear the cart, now or after the configured delay.
    pub fn checkout(&mut self, events: &mut EventLog) -> Result<(), DemoError> {
        self.ensure_editable()?;
        match self.mode {
            CheckoutMode::Instant => self.complete_checkout(events),
            CheckoutMode::Delayed { delay_ms } => {
                events.push(DemoEvent::CheckoutStarted {
                    total: self.cart.total(),
                });
                self.checkout_timer.arm_once(&mut self.scheduler, delay_ms);
                debug!(delay_ms, "checkout pending");
            }
        }
        Ok(())
    }

    fn complete_checkout(&mut self, events: &mut EventLog) {
        let receipt = self.cart.checkout();
        debug!(total = receipt.total, units = receipt.units, "checkout complete");
        events.push(DemoEvent::CheckoutCompleted {
            total: receipt.total,
            units: receipt.units,
        });
        self.last_receipt = Some(receipt);
    }

    fn ensure_editable(&self) -> Result<(), DemoError> {
        if self.is_checkout_pending() {
            Err(DemoError::CheckoutPending)
        } else {
            Ok(())
        }
    }
}

impl DemoModule for PosModule {
    fn id(&self) -> ModuleId {
        ModuleId::Pos
    }

    fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    fn on_timer(&mut self, fired: Fired, events: &mut EventLog) {
        match self.checkout_timer.accept(&fired) {
            Ok(()) => self.complete_checkout(events),
            Err(_) => discard_stale(ModuleId::Pos, &fired, events),
        }
    }

    fn handle(&mut self, action: &DemoAction, events: &mut EventLog) -> Result<(), DemoError> {
        match action {
            DemoAction::AddProduct(id) => self.add_product(*id).map(|_| ()),
            DemoAction::RemoveProduct(id) => self.remove_product(*id).map(|_| ()),
            DemoAction::Checkout => self.checkout(events),
            other => Err(DemoError::ActionUnavailable {
                action: other.name(),
                active: Some(ModuleId::Pos),
            }),
        }
    }

    fn unmount(&mut self) {
        self.checkout_timer.disarm(&mut self.scheduler);
    }

    fn view(&self) -> ModuleView {
        ModuleView::Pos(PosView {
            items: self.cart.items().to_vec(),
            total: self.cart.total(),
            checkout_pending: self.is_checkout_pending(),
            last_receipt: self.last_receipt,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phoenix_core::test_utils::sample_catalog;

    fn module(checkout: CheckoutMode) -> PosModule {
        PosModule::new(&PosConfig {
            catalog: sample_catalog(),
            checkout,
        })
    }

    #[test]
    fn scenario_coffee_coffee_croissant() {
        let mut events = EventLog::default();
        let mut pos = module(CheckoutMode::Instant);
        pos.add_product(ProductId(1)).unwrap();
        pos.add_product(ProductId(1)).unwrap();
        pos.add_product(ProductId(2)).unwrap();
        assert_eq!(pos.cart().len(), 2);
        assert_eq!(pos.total(), 6550);

        pos.checkout(&mut events).unwrap();
        assert!(pos.cart().is_empty());
        assert_eq!(pos.total(), 0);
        assert_eq!(pos.last_receipt().unwrap().total, 6550);
    }

    #[test]
    fn unknown_product_is_rejected() {
        let mut pos = module(CheckoutMode::Instant);
        assert!(matches!(
            pos.add_product(ProductId(42)),
            Err(DemoError::UnknownProduct { id: ProductId(42) })
        ));
    }

    #[test]
    fn delayed_checkout_clears_after_delay() {
        let mut events = EventLog::default();
        let mut pos = module(CheckoutMode::Delayed { delay_ms: 500 });
        pos.add_product(ProductId(1)).unwrap();
        pos.checkout(&mut events).unwrap();

        assert!(pos.is_checkout_pending());
        assert_eq!(pos.cart().len(), 1);

        pos.advance(499, &mut events);
        assert_eq!(pos.cart().len(), 1);

        pos.advance(1, &mut events);
        assert!(pos.cart().is_empty());
        assert!(!pos.is_checkout_pending());
        assert!(matches!(
            events.last(),
            Some(DemoEvent::CheckoutCompleted { total: 2800, units: 1 })
        ));
    }

    #[test]
    fn cart_is_locked_while_checkout_pending() {
        let mut events = EventLog::default();
        let mut pos = module(CheckoutMode::Delayed { delay_ms: 500 });
        pos.add_product(ProductId(1)).unwrap();
        pos.checkout(&mut events).unwrap();

        assert!(matches!(
            pos.add_product(ProductId(2)),
            Err(DemoError::CheckoutPending)
        ));
        assert!(matches!(
            pos.checkout(&mut events),
            Err(DemoError::CheckoutPending)
        ));
    }

    #[test]
    fn unmount_cancels_pending_checkout() {
        let mut events = EventLog::default();
        let mut pos = module(CheckoutMode::Delayed { delay_ms: 500 });
        pos.add_product(ProductId(1)).unwrap();
        pos.checkout(&mut events).unwrap();
        pos.unmount();

        assert!(!pos.is_busy());
        pos.advance(10_000, &mut events);
        assert_eq!(pos.cart().len(), 1);
    }

    #[test]
    fn foreign_action_is_unavailable() {
        let mut events = EventLog::default();
        let mut pos = module(CheckoutMode::Instant);
        assert!(matches!(
            pos.handle(&DemoAction::Pay, &mut events),
            Err(DemoError::ActionUnavailable { action: "pay", .. })
        ));
    }
}
