//! Sales service requests and results.

use jiff::Timestamp;
use pricetag::prelude::{
    CheckMode, ProductId, ProductSnapshot, RunLogId, RunOutcome, SaleId, SaleSnapshot,
    SaleStatus, StoreId, TransactionKind, Transition,
};
use serde::Serialize;

/// Resolve one sale against one product.
///
/// Preloaded snapshots are used as given; missing ones are loaded from the store, where only
/// active, unpaused sales for the request's store and transaction kind are visible.
#[derive(Debug, Clone)]
pub struct ResolveRequest {
    /// Store the sale and product belong to.
    pub store_id: StoreId,

    /// Sale to resolve.
    pub sale_id: SaleId,

    /// Product to price.
    pub product_id: ProductId,

    /// Transaction the price is for.
    pub kind: TransactionKind,

    /// Whether caps count the current unit.
    pub mode: CheckMode,

    /// Preloaded sale; skips the store lookup.
    pub sale: Option<SaleSnapshot>,

    /// Preloaded product; skips the store lookup.
    pub product: Option<ProductSnapshot>,
}

impl ResolveRequest {
    /// Request that loads both the sale and the product.
    #[must_use]
    pub fn new(store_id: StoreId, sale_id: SaleId, product_id: ProductId) -> Self {
        Self {
            store_id,
            sale_id,
            product_id,
            kind: TransactionKind::Sell,
            mode: CheckMode::PreCheck,
            sale: None,
            product: None,
        }
    }

    /// Resolve for `kind` transactions instead of sales.
    #[must_use]
    pub fn with_kind(mut self, kind: TransactionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Evaluate caps in `mode`.
    #[must_use]
    pub fn with_mode(mut self, mode: CheckMode) -> Self {
        self.mode = mode;
        self
    }

    /// Skip the sale lookup.
    #[must_use]
    pub fn with_sale(mut self, sale: SaleSnapshot) -> Self {
        self.sale_id = sale.sale.id;
        self.sale = Some(sale);
        self
    }

    /// Skip the product lookup.
    #[must_use]
    pub fn with_product(mut self, product: ProductSnapshot) -> Self {
        self.product_id = product.id;
        self.product = Some(product);
        self
    }
}

/// Run one sweep.
#[derive(Debug, Clone, Copy, Default)]
pub struct SweepRequest {
    /// Only sweep this store's sales.
    pub store_id: Option<StoreId>,

    /// Clock override; the current time when unset.
    pub at: Option<Timestamp>,
}

/// A committed status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusChange {
    /// Sale that changed.
    pub sale_id: SaleId,

    /// Transition taken.
    pub transition: Transition,

    /// Status after the transition.
    pub status: SaleStatus,
}

/// What a sweep did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Run log written for this sweep.
    pub run_log_id: RunLogId,

    /// Floored instant the sweep evaluated.
    pub tick: Timestamp,

    /// Final outcome recorded in the run log.
    pub outcome: RunOutcome,

    /// Open sales considered.
    pub candidates: usize,

    /// Committed status changes, in order.
    pub changes: Vec<StatusChange>,

    /// Error that stopped the sweep, with its causes.
    pub error: Option<String>,
}
