//! Eligibility & Price Resolution
//!
//! Decides whether one sale applies to one product and, when it does, what the product
//! costs under it. Resolution never fails: a sale that does not apply is simply `None`.

use serde::Serialize;

use crate::{
    discounts::PriceBreakdown,
    products::{ProductSnapshot, TransactionKind},
    sales::{
        Sale, SaleSnapshot,
        caps::{AllowedCount, CheckMode},
    },
};

/// A sale that applies to a product, with the resulting prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleResolution {
    /// The applied sale, without rules or history.
    pub sale: Sale,

    /// Units the sale may still be applied to.
    pub allowed_item_count: AllowedCount,

    /// Prices under the sale.
    #[serde(flatten)]
    pub price: PriceBreakdown,
}

/// Resolve `snapshot` against `product` for a transaction of `kind`.
///
/// Checks run in order and the first miss returns `None`: targeting, discount configured,
/// then the quantity caps.
#[must_use]
pub fn resolve(
    snapshot: &SaleSnapshot,
    product: &ProductSnapshot,
    kind: TransactionKind,
    mode: CheckMode,
) -> Option<SaleResolution> {
    if !snapshot.targeting(product).is_targeted() {
        return None;
    }

    let discount = snapshot.sale.discount?;
    let price = discount.apply(product.price_for(kind));
    let allowed_item_count = snapshot.allowance(product.id, mode)?;

    Some(SaleResolution {
        sale: snapshot.sale.clone(),
        allowed_item_count,
        price,
    })
}
