//! Fixtures
//!
//! Small builders for sales, products and their rules, shared by unit tests, integration
//! tests and the application crate's in-memory store.

use jiff::Timestamp;

use crate::{
    ids::TypedId,
    products::{ItemClassification, ProductId, ProductSnapshot, TransactionKind},
    sales::{
        Sale, SaleDepartment, SaleId, SaleProduct, SaleProductHistory, SaleRule, SaleStatus,
        StoreId,
    },
};

/// Store every fixture belongs to.
pub const FIXTURE_STORE: i64 = 1;

/// A one-off sell-side sale in [`FIXTURE_STORE`] that has not started yet, starting at the
/// Unix epoch with no end, caps or discount.
#[must_use]
pub fn sale(id: i64) -> Sale {
    Sale {
        id: SaleId::new(id),
        store_id: StoreId::new(FIXTURE_STORE),
        display_name: format!("Sale {id}"),
        transaction_kind: TransactionKind::Sell,
        status: SaleStatus::NotHeld,
        on_pause: false,
        start_datetime: Timestamp::UNIX_EPOCH,
        end_datetime: None,
        sale_end_datetime: None,
        repeat_cron_rule: None,
        total_item_limit: None,
        unit_item_limit: None,
        discount: None,
    }
}

/// A product in [`FIXTURE_STORE`] with a base sell price and no item classification.
#[must_use]
pub fn product(id: i64, sell_price: i64) -> ProductSnapshot {
    ProductSnapshot {
        id: ProductId::new(id),
        store_id: StoreId::new(FIXTURE_STORE),
        sell_price: Some(sell_price),
        specific_sell_price: None,
        buy_price: None,
        specific_buy_price: None,
        item: None,
    }
}

/// Attach an item classification to a product.
#[must_use]
pub fn with_item(
    mut product: ProductSnapshot,
    genre_id: Option<i64>,
    category_id: Option<i64>,
) -> ProductSnapshot {
    product.item = Some(ItemClassification {
        genre_id: genre_id.map(TypedId::new),
        category_id: category_id.map(TypedId::new),
    });

    product
}

/// Product targeting rule.
#[must_use]
pub fn product_rule(product_id: i64, rule: SaleRule) -> SaleProduct {
    SaleProduct {
        product_id: ProductId::new(product_id),
        rule,
    }
}

/// Department targeting rule.
#[must_use]
pub fn department(
    genre_id: Option<i64>,
    category_id: Option<i64>,
    rule: SaleRule,
) -> SaleDepartment {
    SaleDepartment {
        genre_id: genre_id.map(TypedId::new),
        category_id: category_id.map(TypedId::new),
        rule,
    }
}

/// Consumption history row.
#[must_use]
pub fn history(product_id: i64, total_item_count: i64) -> SaleProductHistory {
    SaleProductHistory {
        product_id: ProductId::new(product_id),
        total_item_count,
    }
}
