use phoenix_core::booking::BookingState;
use phoenix_core::id::ProductId;
use phoenix_core::placement::{PointerButton, PointerEvent};
use phoenix_core::stage::StageStatus;
use phoenix_demo::{
    DemoAction, DemoConfig, DemoError, DemoEventKind, DemoRouter, Mode, ModuleId, ModuleView,
};
use proptest::prelude::*;

fn router() -> DemoRouter {
    DemoRouter::from_config(DemoConfig::embedded().unwrap()).unwrap()
}

fn in_demo(module: ModuleId) -> DemoRouter {
    let mut router = router();
    router.enter_demo().unwrap();
    router.navigate(module).unwrap();
    router
}

// -----------------------------------------------------------------------
// Point of sale
// -----------------------------------------------------------------------

#[test]
fn coffee_coffee_croissant_checkout() {
    let mut router = in_demo(ModuleId::Pos);
    router.dispatch(DemoAction::AddProduct(ProductId(1))).unwrap();
    router.dispatch(DemoAction::AddProduct(ProductId(1))).unwrap();
    router.dispatch(DemoAction::AddProduct(ProductId(2))).unwrap();

    let pos = router.pos().unwrap();
    assert_eq!(pos.cart().len(), 2);
    assert_eq!(pos.total(), 6550);

    router.dispatch(DemoAction::Checkout).unwrap();
    router.advance(5_000);

    let pos = router.pos().unwrap();
    assert!(pos.cart().is_empty());
    assert_eq!(pos.total(), 0);
    assert_eq!(pos.last_receipt().unwrap().total, 6550);
}

#[test]
fn exit_and_reenter_leaves_empty_cart() {
    let mut router = router();
    router.enter_demo().unwrap();
    router.navigate(ModuleId::Pos).unwrap();
    router.dispatch(DemoAction::AddProduct(ProductId(1))).unwrap();
    router.exit_demo();
    router.enter_demo().unwrap();

    assert_eq!(router.active_module(), Some(ModuleId::Pos));
    assert!(router.pos().unwrap().cart().is_empty());
}

#[test]
fn pending_checkout_dies_with_module() {
    let mut router = in_demo(ModuleId::Pos);
    router.dispatch(DemoAction::AddProduct(ProductId(1))).unwrap();
    router.dispatch(DemoAction::Checkout).unwrap();
    router.navigate(ModuleId::Audit).unwrap();
    router.advance(10_000);

    assert_eq!(router.events().count(DemoEventKind::CheckoutCompleted), 0);
}

// -----------------------------------------------------------------------
// Timers and navigation
// -----------------------------------------------------------------------

#[test]
fn navigating_away_stops_running_audit() {
    let mut router = in_demo(ModuleId::Audit);
    router.dispatch(DemoAction::StartAudit).unwrap();
    router.advance(600);
    let ticks = router.events().count(DemoEventKind::StageAdvanced);
    assert!(ticks > 0);

    router.navigate(ModuleId::Fiscal).unwrap();
    router.advance(60_000);
    assert_eq!(router.events().count(DemoEventKind::StageAdvanced), ticks);
    assert_eq!(router.events().count(DemoEventKind::StaleTimerDiscarded), 0);

    router.navigate(ModuleId::Audit).unwrap();
    let audit = router.audit().unwrap();
    assert_eq!(audit.scan().status(), StageStatus::Idle);
    assert_eq!(audit.scan().progress_percent(), 0);
}

#[test]
fn audit_runs_to_report() {
    let mut router = in_demo(ModuleId::Audit);
    router.dispatch(DemoAction::StartAudit).unwrap();
    router.advance(120_000);

    let audit = router.audit().unwrap();
    assert!(audit.scan().is_complete());
    assert_eq!(audit.scan().progress_percent(), 100);
    assert!(audit.report().is_complete());
    assert_eq!(audit.report().revealed(), audit.report().source());
}

#[test]
fn fiscal_certification_completes() {
    let mut router = in_demo(ModuleId::Fiscal);
    router.dispatch(DemoAction::StartCertification).unwrap();
    router.advance(60_000);

    let cert = router.fiscal().unwrap().certification();
    assert!(cert.is_complete());
    assert_eq!(cert.current_index(), cert.stage_count() - 1);
    assert_eq!(router.events().count(DemoEventKind::ProcessCompleted), 1);
}

// -----------------------------------------------------------------------
// Bookings and cameras
// -----------------------------------------------------------------------

#[test]
fn booking_blocks_days_exactly_once() {
    let mut router = in_demo(ModuleId::Bookings);
    let before = router
        .bookings()
        .unwrap()
        .conversation()
        .calendar()
        .blocked_days();

    router.dispatch(DemoAction::ReceiveInquiry).unwrap();
    router.dispatch(DemoAction::PromptPayment).unwrap();
    router.dispatch(DemoAction::Pay).unwrap();
    assert_eq!(
        router.bookings().unwrap().conversation().calendar().blocked_days(),
        before
    );

    router.advance(30_000);
    let conv = router.bookings().unwrap().conversation();
    assert_eq!(conv.state(), BookingState::Confirmed);
    assert_eq!(conv.calendar_mutations(), 1);
    for day in [12, 13, 14] {
        assert!(conv.calendar().is_blocked(day));
    }
    assert!(matches!(
        router.dispatch(DemoAction::Pay),
        Err(DemoError::Booking(_))
    ));

    // Revisiting discards the confirmed booking.
    router.navigate(ModuleId::Bookings).unwrap();
    let conv = router.bookings().unwrap().conversation();
    assert_eq!(conv.state(), BookingState::AwaitingQuery);
    assert_eq!(conv.calendar().blocked_days(), before);
}

#[test]
fn camera_markers_wrap_after_eight_rotations() {
    let mut router = in_demo(ModuleId::Cameras);
    let canvas = *router.cameras().unwrap().canvas();
    let x = canvas.left + 50.0;
    let y = canvas.top + 50.0;
    let press = |button| {
        DemoAction::Pointer(PointerEvent {
            client_x: x,
            client_y: y,
            button,
        })
    };

    router.dispatch(press(PointerButton::Primary)).unwrap();
    for _ in 0..8 {
        router.dispatch(press(PointerButton::Secondary)).unwrap();
    }

    let marker = router.cameras().unwrap().placement().markers()[0];
    assert_eq!(marker.position, (50.0, 50.0));
    assert_eq!(marker.orientation_degrees, 0);
    assert_eq!(router.events().count(DemoEventKind::MarkerRotated), 8);
}

// -----------------------------------------------------------------------
// Router behavior
// -----------------------------------------------------------------------

#[test]
fn unknown_module_string_is_a_noop() {
    let mut router = in_demo(ModuleId::Audit);
    let before = router.view();

    let err = router.navigate_str("payroll").unwrap_err();
    assert!(matches!(err, DemoError::UnknownModule { ref id } if id == "payroll"));
    assert_eq!(router.view(), before);
    assert!(router.audit().is_some());
    assert_eq!(router.events().count(DemoEventKind::NavigationRejected), 1);

    router.navigate_str(" cameras ").unwrap();
    assert_eq!(router.active_module(), Some(ModuleId::Cameras));
}

#[test]
fn toggle_nav_leaves_active_module_alone() {
    let mut router = in_demo(ModuleId::Bookings);
    assert!(router.toggle_nav());
    assert_eq!(router.active_module(), Some(ModuleId::Bookings));
    assert!(!router.toggle_nav());
    assert_eq!(router.active_module(), Some(ModuleId::Bookings));
}

#[test]
fn snapshot_json_describes_active_view() {
    let mut router = in_demo(ModuleId::Pos);
    router.dispatch(DemoAction::AddProduct(ProductId(2))).unwrap();

    let json = router.snapshot_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["mode"], "demo");
    assert_eq!(value["active_module"], "pos");
    assert_eq!(value["theme_accent"], "cyan");
    assert_eq!(value["view"]["module"], "pos");
    assert_eq!(value["view"]["total"], 950);

    let snapshot = router.snapshot();
    assert!(matches!(snapshot.view, Some(ModuleView::Pos(_))));
}

#[test]
fn landing_snapshot_has_no_view() {
    let router = router();
    let snapshot = router.snapshot();
    assert_eq!(snapshot.state.mode, Mode::Landing);
    assert!(snapshot.view.is_none());
    assert!(snapshot.theme_accent.is_none());
}

// -----------------------------------------------------------------------
// Property tests
// -----------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Step {
    Enter,
    Exit,
    Navigate(usize),
    Toggle,
    Advance(u64),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        Just(Step::Enter),
        Just(Step::Exit),
        (0..ModuleId::ALL.len()).prop_map(Step::Navigate),
        Just(Step::Toggle),
        (0u64..2_000).prop_map(Step::Advance),
    ]
}

proptest! {
    #[test]
    fn router_mode_and_active_module_agree(steps in prop::collection::vec(step(), 0..40)) {
        let mut router = router();
        for step in steps {
            match step {
                Step::Enter => router.enter_demo().unwrap(),
                Step::Exit => router.exit_demo(),
                Step::Navigate(i) => {
                    let result = router.navigate(ModuleId::ALL[i]);
                    prop_assert_eq!(result.is_ok(), router.mode() == Mode::Demo);
                }
                Step::Toggle => {
                    let active = router.active_module();
                    router.toggle_nav();
                    prop_assert_eq!(router.active_module(), active);
                }
                Step::Advance(dt) => router.advance(dt),
            }

            let view = router.view();
            prop_assert_eq!(view.active_module.is_some(), view.mode == Mode::Demo);
            prop_assert_eq!(router.active().map(|m| m.id()), view.active_module);
            prop_assert_eq!(router.events().count(DemoEventKind::StaleTimerDiscarded), 0);
        }
    }
}
