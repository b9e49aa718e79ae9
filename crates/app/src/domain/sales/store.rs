//! Sale Store
//!
//! Read/write access to sales, their rules, consumption history, products and sweep run
//! logs.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pricetag::prelude::{
    ProductId, ProductSnapshot, RunLogId, RunOutcome, SaleId, SaleSnapshot, StoreId,
    TransactionKind, Transition,
};
use tracing::debug;

use crate::{
    database::Db,
    domain::sales::{
        StoreError,
        records::RunLogRecord,
        repositories::{
            products::PgProductsRepository, run_logs::PgRunLogsRepository,
            sales::PgSalesRepository,
        },
    },
};

/// Reads sales and products, and persists sweep results.
#[automock]
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Active, unpaused sale of `store` for transactions of `kind`, with rules and history.
    async fn find_active_sale(
        &self,
        store: StoreId,
        sale: SaleId,
        kind: TransactionKind,
    ) -> Result<SaleSnapshot, StoreError>;

    /// Product of `store` with its item classification.
    async fn find_product(
        &self,
        store: StoreId,
        product: ProductId,
    ) -> Result<ProductSnapshot, StoreError>;

    /// Sales that are not finished and started at or before `tick`, with product rules and
    /// history.
    async fn list_open_sales(
        &self,
        store: Option<StoreId>,
        tick: Timestamp,
    ) -> Result<Vec<SaleSnapshot>, StoreError>;

    /// Apply `transitions` to one sale atomically.
    async fn apply_transitions(
        &self,
        sale: SaleId,
        transitions: &[Transition],
    ) -> Result<(), StoreError>;

    /// Open an empty run log.
    async fn create_run_log(&self) -> Result<RunLogId, StoreError>;

    /// Finalise a run log.
    async fn update_run_log(
        &self,
        run_log: RunLogId,
        text: &str,
        outcome: RunOutcome,
    ) -> Result<(), StoreError>;
}

/// `PostgreSQL` sale store.
#[derive(Debug, Clone)]
pub struct PgSaleStore {
    db: Db,
    sales: PgSalesRepository,
    products: PgProductsRepository,
    run_logs: PgRunLogsRepository,
}

impl PgSaleStore {
    /// Store over `db`.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            sales: PgSalesRepository::new(),
            products: PgProductsRepository::new(),
            run_logs: PgRunLogsRepository::new(),
        }
    }

    /// Load a run log.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no run log has that ID.
    pub async fn run_log(&self, run_log: RunLogId) -> Result<RunLogRecord, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let record = self.run_logs.get_run_log(&mut tx, run_log).await?;

        tx.commit().await?;

        Ok(record)
    }
}

#[async_trait]
impl SaleStore for PgSaleStore {
    async fn find_active_sale(
        &self,
        store: StoreId,
        sale: SaleId,
        kind: TransactionKind,
    ) -> Result<SaleSnapshot, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let snapshot = self
            .sales
            .find_active_sale(&mut tx, store, sale, kind)
            .await?;

        tx.commit().await?;

        Ok(snapshot)
    }

    async fn find_product(
        &self,
        store: StoreId,
        product: ProductId,
    ) -> Result<ProductSnapshot, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let product = self.products.find_product(&mut tx, store, product).await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn list_open_sales(
        &self,
        store: Option<StoreId>,
        tick: Timestamp,
    ) -> Result<Vec<SaleSnapshot>, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let sales = self.sales.list_open_sales(&mut tx, store, tick).await?;

        tx.commit().await?;

        Ok(sales)
    }

    async fn apply_transitions(
        &self,
        sale: SaleId,
        transitions: &[Transition],
    ) -> Result<(), StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        for transition in transitions {
            self.sales
                .update_status(&mut tx, sale, transition.status())
                .await?;

            if transition.clears_history() {
                let deleted = self.sales.delete_history(&mut tx, sale).await?;

                debug!(sale_id = %sale, deleted, "cleared sale history");
            }
        }

        tx.commit().await?;

        Ok(())
    }

    async fn create_run_log(&self) -> Result<RunLogId, StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        let run_log = self.run_logs.create_run_log(&mut tx).await?;

        tx.commit().await?;

        Ok(run_log)
    }

    async fn update_run_log(
        &self,
        run_log: RunLogId,
        text: &str,
        outcome: RunOutcome,
    ) -> Result<(), StoreError> {
        let mut tx = self.db.begin_transaction().await?;

        self.run_logs
            .update_run_log(&mut tx, run_log, text, outcome)
            .await?;

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use pricetag::{
        fixtures::{product, sale, with_item},
        prelude::*,
    };
    use testresult::TestResult;

    use crate::{
        domain::sales::{SalesService, data::SweepRequest},
        test::{
            TestContext, insert_department_rule, insert_product, insert_product_rule, insert_sale,
            record_units,
        },
    };

    use super::*;

    fn active_sale() -> Result<Sale, jiff::Error> {
        let mut sale = sale(0);
        sale.status = SaleStatus::OnHeld;
        sale.start_datetime = "2024-05-01T09:00:00Z".parse()?;
        sale.total_item_limit = Some(10);
        sale.discount = Some(DiscountAmount::Percentage(80));

        Ok(sale)
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn find_active_sale_loads_rules_and_history() -> TestResult {
        let ctx = TestContext::new().await;
        let pool = ctx.db.pool();

        let item = insert_product(pool, &with_item(product(0, 1000), Some(4), None)).await?;
        let sale_id = insert_sale(pool, &active_sale()?).await?;

        insert_product_rule(pool, sale_id, item, SaleRule::Include).await?;
        insert_department_rule(pool, sale_id, Some(4), None).await?;
        record_units(pool, sale_id, item, 2).await?;
        record_units(pool, sale_id, item, 3).await?;

        let snapshot = ctx
            .store
            .find_active_sale(StoreId::new(1), sale_id, TransactionKind::Sell)
            .await?;

        assert_eq!(snapshot.sale.discount, Some(DiscountAmount::Percentage(80)));
        assert_eq!(snapshot.products.len(), 1);
        assert_eq!(snapshot.departments.len(), 1);
        assert_eq!(snapshot.sold_for(item), 5);

        let found = ctx.store.find_product(StoreId::new(1), item).await?;

        assert_eq!(found.sell_price, Some(1000));
        assert_eq!(found.genre_id(), Some(GenreId::new(4)));

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn filtered_sales_and_products_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let pool = ctx.db.pool();

        let mut paused = active_sale()?;
        paused.on_pause = true;

        let paused_id = insert_sale(pool, &paused).await?;
        let item = insert_product(pool, &product(0, 500)).await?;

        let sale = ctx
            .store
            .find_active_sale(StoreId::new(1), paused_id, TransactionKind::Sell)
            .await;

        let product = ctx.store.find_product(StoreId::new(2), item).await;

        assert!(matches!(sale, Err(StoreError::NotFound)), "got {sale:?}");
        assert!(matches!(product, Err(StoreError::NotFound)), "got {product:?}");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn deactivation_clears_history_in_the_same_transaction() -> TestResult {
        let ctx = TestContext::new().await;
        let pool = ctx.db.pool();

        let item = insert_product(pool, &product(0, 1000)).await?;
        let sale_id = insert_sale(pool, &active_sale()?).await?;

        record_units(pool, sale_id, item, 4).await?;

        ctx.store
            .apply_transitions(sale_id, &[Transition::Deactivate])
            .await?;

        let tick: Timestamp = "2024-05-02T00:00:00Z".parse()?;
        let open = ctx.store.list_open_sales(None, tick).await?;
        let snapshot = open.first().ok_or("sale should still be open")?;

        assert_eq!(snapshot.sale.status, SaleStatus::NotHeld);
        assert!(snapshot.history.is_empty(), "history should be cleared");

        ctx.store
            .apply_transitions(sale_id, &[Transition::Finish])
            .await?;

        assert!(ctx.store.list_open_sales(None, tick).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn unknown_sale_transition_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .store
            .apply_transitions(SaleId::new(404), &[Transition::Activate])
            .await;

        assert!(matches!(result, Err(StoreError::NotFound)), "got {result:?}");

        Ok(())
    }

    #[tokio::test]
    #[ignore = "requires a Docker daemon for the PostgreSQL container"]
    async fn sweep_persists_statuses_and_run_log() -> TestResult {
        let ctx = TestContext::new().await;
        let pool = ctx.db.pool();

        let item = insert_product(pool, &product(0, 1000)).await?;

        let mut capped = active_sale()?;
        capped.total_item_limit = Some(2);

        let sale_id = insert_sale(pool, &capped).await?;

        insert_product_rule(pool, sale_id, item, SaleRule::Include).await?;
        record_units(pool, sale_id, item, 2).await?;

        let summary = ctx
            .sales
            .sweep(SweepRequest {
                store_id: Some(StoreId::new(1)),
                at: Some("2024-05-02T09:24:00Z".parse()?),
            })
            .await?;

        assert_eq!(summary.outcome, RunOutcome::Ok);

        let log = ctx.store.run_log(summary.run_log_id).await?;

        assert_eq!(log.outcome, Some(RunOutcome::Ok));
        assert!(
            log.text
                .starts_with("tick: 2024-05-02 09:20:00 store: 1\nsales to process: 1\n"),
            "unexpected log {:?}",
            log.text
        );
        assert!(
            log.text
                .contains(&format!("sale {sale_id}: status changed to FINISHED")),
            "unexpected log {:?}",
            log.text
        );

        Ok(())
    }
}
