//! Shared test helpers for unit and integration tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]` so downstream
//! crates can pull them in through the `test-utils` feature.

use crate::booking::{BookingConversation, BookingScript, Calendar};
use crate::cart::Product;
use crate::clock::{Millis, Scheduler};
use crate::id::{ProductId, TimerTag};
use crate::stage::{StageDescriptor, StagePlan, StageProcess, StageUpdate};
use crate::typewriter::Typewriter;

// ===========================================================================
// Catalog
// ===========================================================================

pub fn coffee() -> Product {
    Product {
        id: ProductId(1),
        name: "Coffee".to_string(),
        price: 2800,
        category: "drinks".to_string(),
    }
}

pub fn croissant() -> Product {
    Product {
        id: ProductId(2),
        name: "Croissant".to_string(),
        price: 950,
        category: "bakery".to_string(),
    }
}

pub fn medialuna() -> Product {
    Product {
        id: ProductId(3),
        name: "Medialuna".to_string(),
        price: 700,
        category: "bakery".to_string(),
    }
}

pub fn sample_catalog() -> Vec<Product> {
    vec![coffee(), croissant(), medialuna()]
}

// ===========================================================================
// Plans
// ===========================================================================

pub fn percent_plan(step: u8, tick_ms: Millis) -> StagePlan {
    StagePlan::Percent {
        label: "Scanning".to_string(),
        step,
        tick_ms,
    }
}

pub fn staged_plan(stages: &[(&str, Millis)]) -> StagePlan {
    StagePlan::Staged(
        stages
            .iter()
            .map(|&(label, ms)| StageDescriptor::new(label, ms))
            .collect(),
    )
}

// ===========================================================================
// Booking
// ===========================================================================

pub fn sample_script() -> BookingScript {
    BookingScript {
        inquiry: "Is the cabin free from the 12th to the 14th?".to_string(),
        offer: "Yes, the cabin is available on those nights.".to_string(),
        prompt: "Reserve with the deposit below.".to_string(),
        confirmation: "Payment received. Your stay is confirmed.".to_string(),
        amount: 45_000,
        days_to_block: vec![12, 13, 14],
        processing_ms: 2_000,
    }
}

/// A 30-day conversation with day 5 already blocked.
pub fn sample_booking() -> BookingConversation {
    BookingConversation::new(sample_script(), Calendar::new(30, &[5]), TimerTag(1))
}

// ===========================================================================
// Drive helpers
// ===========================================================================

/// Advance `sched` by `dt`, feeding every due timer to `process`. Returns
/// the accepted updates; stale fires are dropped.
pub fn drive_stage(process: &mut StageProcess, sched: &mut Scheduler, dt: Millis) -> Vec<StageUpdate> {
    let until = sched.now() + dt;
    let mut updates = Vec::new();
    while let Some(fired) = sched.pop_due(until) {
        if let Ok(update) = process.on_timer(sched, &fired) {
            updates.push(update);
        }
    }
    sched.settle(until);
    updates
}

/// Advance `sched` by `dt`, feeding every due timer to `tw`.
pub fn drive_typewriter(tw: &mut Typewriter, sched: &mut Scheduler, dt: Millis) {
    let until = sched.now() + dt;
    while let Some(fired) = sched.pop_due(until) {
        let _ = tw.on_timer(sched, &fired);
    }
    sched.settle(until);
}

/// Advance `sched` by `dt`, feeding every due timer to `conv`.
pub fn drive_booking(conv: &mut BookingConversation, sched: &mut Scheduler, dt: Millis) {
    let until = sched.now() + dt;
    while let Some(fired) = sched.pop_due(until) {
        let _ = conv.on_timer(sched, &fired);
    }
    sched.settle(until);
}
