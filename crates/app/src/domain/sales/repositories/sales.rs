//! Sales Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pricetag::prelude::{Sale, SaleId, SaleSnapshot, SaleStatus, StoreId, TransactionKind};
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};

use crate::domain::sales::records::{
    SaleDepartmentRecord, SaleHistoryRecord, SaleProductRecord, SaleRecord,
};

const FIND_ACTIVE_SALE_SQL: &str = include_str!("../sql/find_active_sale.sql");
const LIST_OPEN_SALES_SQL: &str = include_str!("../sql/list_open_sales.sql");
const LIST_SALE_PRODUCTS_SQL: &str = include_str!("../sql/list_sale_products.sql");
const LIST_SALE_DEPARTMENTS_SQL: &str = include_str!("../sql/list_sale_departments.sql");
const LIST_SALE_PRODUCT_HISTORIES_SQL: &str =
    include_str!("../sql/list_sale_product_histories.sql");
const UPDATE_SALE_STATUS_SQL: &str = include_str!("../sql/update_sale_status.sql");
const DELETE_SALE_PRODUCT_HISTORIES_SQL: &str =
    include_str!("../sql/delete_sale_product_histories.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgSalesRepository;

impl PgSalesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_active_sale(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: StoreId,
        sale: SaleId,
        kind: TransactionKind,
    ) -> Result<SaleSnapshot, sqlx::Error> {
        let SaleRecord(sale) = query_as::<Postgres, SaleRecord>(FIND_ACTIVE_SALE_SQL)
            .bind(store.get())
            .bind(sale.get())
            .bind(kind.as_str())
            .fetch_one(&mut **tx)
            .await?;

        let mut snapshots = self.with_rules(tx, vec![sale]).await?;

        snapshots.pop().ok_or(sqlx::Error::RowNotFound)
    }

    pub(crate) async fn list_open_sales(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        store: Option<StoreId>,
        tick: Timestamp,
    ) -> Result<Vec<SaleSnapshot>, sqlx::Error> {
        let sales = query_as::<Postgres, SaleRecord>(LIST_OPEN_SALES_SQL)
            .bind(SqlxTimestamp::from(tick))
            .bind(store.map(StoreId::get))
            .fetch_all(&mut **tx)
            .await?
            .into_iter()
            .map(|SaleRecord(sale)| sale)
            .collect();

        self.with_rules(tx, sales).await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleId,
        status: SaleStatus,
    ) -> Result<(), sqlx::Error> {
        query_scalar::<Postgres, i64>(UPDATE_SALE_STATUS_SQL)
            .bind(sale.get())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_history(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sale: SaleId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_SALE_PRODUCT_HISTORIES_SQL)
            .bind(sale.get())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Attach product rules, department rules and consumption history to `sales`.
    async fn with_rules(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        sales: Vec<Sale>,
    ) -> Result<Vec<SaleSnapshot>, sqlx::Error> {
        if sales.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = sales.iter().map(|sale| sale.id.get()).collect();

        let products = query_as::<Postgres, SaleProductRecord>(LIST_SALE_PRODUCTS_SQL)
            .bind(ids.as_slice())
            .fetch_all(&mut **tx)
            .await?;

        let departments = query_as::<Postgres, SaleDepartmentRecord>(LIST_SALE_DEPARTMENTS_SQL)
            .bind(ids.as_slice())
            .fetch_all(&mut **tx)
            .await?;

        let history = query_as::<Postgres, SaleHistoryRecord>(LIST_SALE_PRODUCT_HISTORIES_SQL)
            .bind(ids.as_slice())
            .fetch_all(&mut **tx)
            .await?;

        Ok(sales
            .into_iter()
            .map(|sale| {
                let id = sale.id;
                let mut snapshot = SaleSnapshot::new(sale);

                snapshot.products = products
                    .iter()
                    .filter(|record| record.sale_id == id)
                    .map(|record| record.rule)
                    .collect();

                snapshot.departments = departments
                    .iter()
                    .filter(|record| record.sale_id == id)
                    .map(|record| record.rule)
                    .collect();

                snapshot.history = history
                    .iter()
                    .filter(|record| record.sale_id == id)
                    .map(|record| record.history)
                    .collect();

                snapshot
            })
            .collect())
    }
}
