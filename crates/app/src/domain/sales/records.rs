//! Sale Records
//!
//! Row decoders from the sales schema into engine types. Stored enums and discount strings
//! are parsed here, so a bad value surfaces as a column decode error.

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pricetag::prelude::{
    DiscountAmount, ItemClassification, ProductSnapshot, RunOutcome, Sale, SaleDepartment,
    SaleId, SaleProduct, SaleProductHistory, SaleRule, SaleStatus, TransactionKind, TypedId,
};
use sqlx::{FromRow, Row, postgres::PgRow};

const COLUMN_DISCOUNT_AMOUNT: &str = "discount_amount";

/// Decoded `sales` row.
#[derive(Debug)]
pub(crate) struct SaleRecord(pub(crate) Sale);

/// Decoded `sale_products` row with its owning sale.
#[derive(Debug)]
pub(crate) struct SaleProductRecord {
    pub(crate) sale_id: SaleId,
    pub(crate) rule: SaleProduct,
}

/// Decoded `sale_departments` row with its owning sale.
#[derive(Debug)]
pub(crate) struct SaleDepartmentRecord {
    pub(crate) sale_id: SaleId,
    pub(crate) rule: SaleDepartment,
}

/// Per-product consumption total of one sale.
#[derive(Debug)]
pub(crate) struct SaleHistoryRecord {
    pub(crate) sale_id: SaleId,
    pub(crate) history: SaleProductHistory,
}

/// Decoded `products` row joined with its item.
#[derive(Debug)]
pub(crate) struct ProductRecord(pub(crate) ProductSnapshot);

/// Run log row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunLogRecord {
    /// Trace text; empty until the sweep finishes.
    pub text: String,

    /// `None` while the sweep is running.
    pub outcome: Option<RunOutcome>,
}

fn parse_column<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.try_get(column)?;

    raw.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for SaleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_amount: Option<String> = row.try_get(COLUMN_DISCOUNT_AMOUNT)?;

        let discount = DiscountAmount::parse_stored(discount_amount.as_deref()).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: COLUMN_DISCOUNT_AMOUNT.to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self(Sale {
            id: TypedId::new(row.try_get("id")?),
            store_id: TypedId::new(row.try_get("store_id")?),
            display_name: row.try_get("display_name")?,
            transaction_kind: parse_column::<TransactionKind>(row, "transaction_kind")?,
            status: parse_column::<SaleStatus>(row, "status")?,
            on_pause: row.try_get("on_pause")?,
            start_datetime: row
                .try_get::<SqlxTimestamp, _>("start_datetime")?
                .to_jiff(),
            end_datetime: row
                .try_get::<Option<SqlxTimestamp>, _>("end_datetime")?
                .map(SqlxTimestamp::to_jiff),
            sale_end_datetime: row
                .try_get::<Option<SqlxTimestamp>, _>("sale_end_datetime")?
                .map(SqlxTimestamp::to_jiff),
            repeat_cron_rule: row.try_get("repeat_cron_rule")?,
            total_item_limit: row.try_get("end_total_item_count")?,
            unit_item_limit: row.try_get("end_unit_item_count")?,
            discount,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for SaleProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sale_id: TypedId::new(row.try_get("sale_id")?),
            rule: SaleProduct {
                product_id: TypedId::new(row.try_get("product_id")?),
                rule: parse_column::<SaleRule>(row, "rule")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SaleDepartmentRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sale_id: TypedId::new(row.try_get("sale_id")?),
            rule: SaleDepartment {
                genre_id: row.try_get::<Option<i64>, _>("genre_id")?.map(TypedId::new),
                category_id: row
                    .try_get::<Option<i64>, _>("category_id")?
                    .map(TypedId::new),
                rule: parse_column::<SaleRule>(row, "rule")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for SaleHistoryRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            sale_id: TypedId::new(row.try_get("sale_id")?),
            history: SaleProductHistory {
                product_id: TypedId::new(row.try_get("product_id")?),
                total_item_count: row.try_get("total_item_count")?,
            },
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ProductRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let item_id: Option<i64> = row.try_get("item_id")?;

        let item = match item_id {
            Some(_) => Some(ItemClassification {
                genre_id: row.try_get::<Option<i64>, _>("genre_id")?.map(TypedId::new),
                category_id: row
                    .try_get::<Option<i64>, _>("category_id")?
                    .map(TypedId::new),
            }),
            None => None,
        };

        Ok(Self(ProductSnapshot {
            id: TypedId::new(row.try_get("id")?),
            store_id: TypedId::new(row.try_get("store_id")?),
            sell_price: row.try_get("sell_price")?,
            specific_sell_price: row.try_get("specific_sell_price")?,
            buy_price: row.try_get("buy_price")?,
            specific_buy_price: row.try_get("specific_buy_price")?,
            item,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for RunLogRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let outcome = row
            .try_get::<Option<String>, _>("status")?
            .map(|raw| {
                raw.parse::<RunOutcome>()
                    .map_err(|e| sqlx::Error::ColumnDecode {
                        index: "status".to_string(),
                        source: Box::new(e),
                    })
            })
            .transpose()?;

        Ok(Self {
            text: row.try_get("log_text")?,
            outcome,
        })
    }
}
