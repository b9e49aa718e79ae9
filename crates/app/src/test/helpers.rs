//! Test Helpers
//!
//! Seed rows that the sale engine only reads: products, sales, rules and history are owned
//! by other parts of the platform.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use pricetag::prelude::{ProductId, ProductSnapshot, Sale, SaleId, SaleRule};
use sqlx::{PgPool, query, query_scalar};

pub(crate) async fn insert_product(
    pool: &PgPool,
    product: &ProductSnapshot,
) -> Result<ProductId, sqlx::Error> {
    let item_id: Option<i64> = match product.item {
        Some(item) => Some(
            query_scalar(
                "INSERT INTO items (store_id, genre_id, category_id) VALUES ($1, $2, $3) \
                 RETURNING id",
            )
            .bind(product.store_id.get())
            .bind(item.genre_id.map(|id| id.get()))
            .bind(item.category_id.map(|id| id.get()))
            .fetch_one(pool)
            .await?,
        ),
        None => None,
    };

    let id: i64 = query_scalar(
        "INSERT INTO products (store_id, item_id, sell_price, specific_sell_price, buy_price, \
         specific_buy_price) VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
    )
    .bind(product.store_id.get())
    .bind(item_id)
    .bind(product.sell_price)
    .bind(product.specific_sell_price)
    .bind(product.buy_price)
    .bind(product.specific_buy_price)
    .fetch_one(pool)
    .await?;

    Ok(ProductId::new(id))
}

pub(crate) async fn insert_sale(pool: &PgPool, sale: &Sale) -> Result<SaleId, sqlx::Error> {
    let id: i64 = query_scalar(
        "INSERT INTO sales (store_id, display_name, transaction_kind, status, on_pause, \
         start_datetime, end_datetime, sale_end_datetime, repeat_cron_rule, \
         end_total_item_count, end_unit_item_count, discount_amount) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING id",
    )
    .bind(sale.store_id.get())
    .bind(&sale.display_name)
    .bind(sale.transaction_kind.as_str())
    .bind(sale.status.as_str())
    .bind(sale.on_pause)
    .bind(SqlxTimestamp::from(sale.start_datetime))
    .bind(sale.end_datetime.map(SqlxTimestamp::from))
    .bind(sale.sale_end_datetime.map(SqlxTimestamp::from))
    .bind(sale.repeat_cron_rule.as_deref())
    .bind(sale.total_item_limit)
    .bind(sale.unit_item_limit)
    .bind(sale.discount.map(|discount| discount.to_string()))
    .fetch_one(pool)
    .await?;

    Ok(SaleId::new(id))
}

pub(crate) async fn insert_product_rule(
    pool: &PgPool,
    sale: SaleId,
    product: ProductId,
    rule: SaleRule,
) -> Result<(), sqlx::Error> {
    query("INSERT INTO sale_products (sale_id, product_id, rule) VALUES ($1, $2, $3)")
        .bind(sale.get())
        .bind(product.get())
        .bind(rule.as_str())
        .execute(pool)
        .await?;

    Ok(())
}

pub(crate) async fn insert_department_rule(
    pool: &PgPool,
    sale: SaleId,
    genre_id: Option<i64>,
    category_id: Option<i64>,
) -> Result<(), sqlx::Error> {
    query("INSERT INTO sale_departments (sale_id, genre_id, category_id) VALUES ($1, $2, $3)")
        .bind(sale.get())
        .bind(genre_id)
        .bind(category_id)
        .execute(pool)
        .await?;

    Ok(())
}

pub(crate) async fn record_units(
    pool: &PgPool,
    sale: SaleId,
    product: ProductId,
    units: i64,
) -> Result<(), sqlx::Error> {
    query(
        "INSERT INTO sale_product_histories (sale_id, product_id, item_count) \
         VALUES ($1, $2, $3)",
    )
    .bind(sale.get())
    .bind(product.get())
    .bind(units)
    .execute(pool)
    .await?;

    Ok(())
}
