//! Phoenix Core -- the leaf models behind the Phoenix Neural Suite demo.
//!
//! Everything in this crate is single-threaded and driven by virtual time.
//! Nothing sleeps: a host advances a [`clock::Scheduler`] by some number of
//! milliseconds and feeds each due timer back into the model that armed it.
//!
//! # Timer Pattern
//!
//! Every running process owns exactly one [`clock::TimerSlot`]. Arming the
//! slot replaces any previous timer and bumps its generation, so a fire that
//! was scheduled before a reset is rejected instead of applied:
//!
//! ```rust,ignore
//! let mut sched = Scheduler::new();
//! let mut scan = StageProcess::new("scan", plan, TimerTag(1));
//! scan.start(&mut sched);
//! while let Some(fired) = sched.pop_due(sched.now() + 500) {
//!     let update = scan.on_timer(&mut sched, &fired)?;
//! }
//! ```
//!
//! # Key Types
//!
//! - [`clock::Scheduler`] -- Virtual-time timer queue, one per module instance.
//! - [`stage::StageProcess`] -- Staged or percent-based progress runner.
//! - [`typewriter::Typewriter`] -- Reveals a string one character per tick.
//! - [`cart::Cart`] -- Point-of-sale ledger with derived totals.
//! - [`booking::BookingConversation`] -- Chat-style booking flow that blocks
//!   calendar days once payment is confirmed.
//! - [`placement::Placement`] -- Camera markers placed and rotated on a canvas.

pub mod booking;
pub mod cart;
pub mod clock;
pub mod id;
pub mod placement;
pub mod stage;
pub mod typewriter;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
