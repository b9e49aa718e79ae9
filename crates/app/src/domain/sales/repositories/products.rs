//! Products Repository

use pricetag::prelude::{ProductId, ProductSnapshot, StoreId};
use sqlx::{Postgres, Transaction, query_as};

use crate::domain::sales::records::ProductRecord;

const FIND_PRODUCT_SQL: &str = include_str!("../sql/find_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        product: ProductId,
    ) -> Result<ProductSnapshot, sqlx::Error> {
        let ProductRecord(product) = query_as::<Postgres, ProductRecord>(FIND_PRODUCT_SQL)
            .bind(store.get())
            .bind(product.get())
            .fetch_one(&mut **tx)
            .await?;

        Ok(product)
    }
}
