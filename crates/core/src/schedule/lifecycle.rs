//! Sale Lifecycle Planning

use std::fmt;

use jiff::Timestamp;
use serde::Serialize;
use smallvec::SmallVec;

use crate::sales::{SaleSnapshot, SaleStatus};

/// A status change taken by a sale during a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Becomes `ON_HELD`.
    Activate,

    /// Becomes `NOT_HELD` and clears its consumption history.
    Deactivate,

    /// Becomes `FINISHED`; history is kept.
    Finish,
}

impl Transition {
    /// Status the sale holds after this transition.
    #[must_use]
    pub const fn status(self) -> SaleStatus {
        match self {
            Self::Activate => SaleStatus::OnHeld,
            Self::Deactivate => SaleStatus::NotHeld,
            Self::Finish => SaleStatus::Finished,
        }
    }

    /// Whether the sale's consumption history is deleted with this transition.
    #[must_use]
    pub const fn clears_history(self) -> bool {
        matches!(self, Self::Deactivate)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Activate => "activate",
            Self::Deactivate => "deactivate",
            Self::Finish => "finish",
        })
    }
}

/// Whether the sale has sold everything its caps allow.
///
/// True when the global cap is reached, or when a per-product cap is set and every
/// explicitly included product has reached it. A sale with no included products is never
/// exhausted by the per-product cap.
#[must_use]
pub fn exhausted(snapshot: &SaleSnapshot) -> bool {
    let total_reached = snapshot
        .sale
        .total_cap()
        .is_some_and(|cap| snapshot.total_sold() >= cap);

    let units_reached = snapshot.sale.unit_cap().is_some_and(|cap| {
        let mut included = snapshot.included_products().peekable();

        included.peek().is_some() && included.all(|product| snapshot.sold_for(product) >= cap)
    });

    total_reached || units_reached
}

/// Plan the transitions `snapshot` takes at `tick`.
///
/// Activate, Deactivate and Finish are evaluated in that order against the status left by
/// the previous step, so one sweep can both activate and deactivate a sale. `in_window` is
/// only consulted for recurring sales.
#[must_use]
pub fn plan_transitions(
    snapshot: &SaleSnapshot,
    tick: Timestamp,
    in_window: bool,
) -> SmallVec<[Transition; 3]> {
    let sale = &snapshot.sale;
    let recurring = sale.is_recurring();
    let at_max = exhausted(snapshot);

    let mut status = sale.status;
    let mut transitions = SmallVec::new();

    let activate = if recurring {
        in_window
    } else {
        tick >= sale.start_datetime
    };

    if status != SaleStatus::OnHeld && activate {
        transitions.push(Transition::Activate);
        status = SaleStatus::OnHeld;
    }

    if status != SaleStatus::NotHeld && recurring && (!in_window || at_max) {
        transitions.push(Transition::Deactivate);
    }

    let ended = sale.sale_end_datetime.is_some_and(|end| tick >= end);

    if ended || (!recurring && at_max) {
        transitions.push(Transition::Finish);
    }

    transitions
}
