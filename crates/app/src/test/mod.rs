//! Test support.

use jiff::Timestamp;
use mockall::mock;
use pricetag::schedule::{RecurrenceError, RecurrenceEvaluator};

mod helpers;
mod memory;

pub(crate) use context::TestContext;
pub(crate) use helpers::*;
pub(crate) use memory::MemorySaleStore;

mock! {
    pub(crate) Recurrence {}

    impl RecurrenceEvaluator for Recurrence {
        fn in_window(
            &self,
            expression: &str,
            tick: Timestamp,
            start: Timestamp,
            end: Option<Timestamp>,
        ) -> Result<bool, RecurrenceError>;
    }
}
