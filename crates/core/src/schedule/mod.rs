//! Sale Scheduling
//!
//! The pure half of the status sweep: flooring the clock to a tick, deciding recurrence
//! window membership, and planning which status transitions a sale takes at a tick.

pub mod lifecycle;
pub mod recurrence;
pub mod tick;

pub use lifecycle::{Transition, exhausted, plan_transitions};
pub use recurrence::{CronRecurrence, RecurrenceError, RecurrenceEvaluator};
pub use tick::Tick;
