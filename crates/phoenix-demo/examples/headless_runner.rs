//! Headless runner: walks through every module and prints what a renderer
//! would see.
//!
//! Run with: `RUST_LOG=debug cargo run --package phoenix-demo --example headless_runner`

use phoenix_core::id::ProductId;
use phoenix_core::placement::{PointerButton, PointerEvent};
use phoenix_demo::manifest::default_manifest;
use phoenix_demo::{DemoAction, DemoRouter, ModuleId, Platform};
use tracing_subscriber::EnvFilter;

const FRAME_MS: u64 = 250;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let manifest = default_manifest().expect("failed to load manifest");
    println!(
        "=== {} ===\n{}\n",
        manifest.suite_title, manifest.suite_description
    );

    let mut router = DemoRouter::standard().expect("failed to build router");
    let link = router
        .contact_link(Platform::Desktop)
        .expect("failed to build contact link");
    println!("Contact: {link}\n");

    router.enter_demo().expect("failed to enter demo");

    for entry in &manifest.modules {
        println!("--- {} [{}] ---", entry.title, entry.theme_accent);
        println!("    {}", entry.summary);
        router.navigate(entry.id).expect("navigation failed");

        for action in script(entry.id) {
            if let Err(e) = router.dispatch(action.clone()) {
                println!("    {} rejected: {e}", action.name());
            }
            router.advance(FRAME_MS);
        }
        for _ in 0..40 {
            router.advance(FRAME_MS);
        }

        let json = router.snapshot_json().expect("snapshot failed");
        println!("    {json}\n");
    }

    router.exit_demo();
    println!(
        "Done after {} ms of virtual time, {} events recorded ({} dropped).",
        router.elapsed(),
        router.events().total_written(),
        router.events().dropped_count()
    );
}

fn script(id: ModuleId) -> Vec<DemoAction> {
    match id {
        ModuleId::Pos => vec![
            DemoAction::AddProduct(ProductId(1)),
            DemoAction::AddProduct(ProductId(1)),
            DemoAction::AddProduct(ProductId(2)),
            DemoAction::Checkout,
        ],
        ModuleId::Audit => vec![DemoAction::StartAudit],
        ModuleId::Bookings => vec![
            DemoAction::ReceiveInquiry,
            DemoAction::PromptPayment,
            DemoAction::Pay,
        ],
        ModuleId::Cameras => vec![
            pointer(120.0, 80.0, PointerButton::Primary),
            pointer(400.0, 300.0, PointerButton::Primary),
            pointer(120.0, 80.0, PointerButton::Secondary),
            pointer(120.0, 80.0, PointerButton::Secondary),
        ],
        ModuleId::Fiscal => vec![DemoAction::StartCertification],
    }
}

fn pointer(x: f32, y: f32, button: PointerButton) -> DemoAction {
    DemoAction::Pointer(PointerEvent {
        client_x: x,
        client_y: y,
        button,
    })
}
