//! Sale engine prelude.
//!
//! Everything a storage or service layer needs to drive the engine.

pub use crate::{
    discounts::{DiscountAmount, DiscountError, PriceBreakdown},
    ids::TypedId,
    products::{
        CategoryId, GenreId, ItemClassification, ProductId, ProductSnapshot, TransactionKind,
    },
    resolver::{SaleResolution, resolve},
    run_log::{RunLog, RunLogId, RunOutcome},
    sales::{
        Sale, SaleDepartment, SaleId, SaleProduct, SaleProductHistory, SaleRule, SaleSnapshot,
        SaleStatus, StoreId,
        caps::{AllowedCount, CheckMode},
        targeting::Targeting,
    },
    schedule::{
        CronRecurrence, RecurrenceError, RecurrenceEvaluator, Tick, Transition, exhausted,
        plan_transitions,
    },
};
