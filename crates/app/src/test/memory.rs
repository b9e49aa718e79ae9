//! In-memory sale store for service tests.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use jiff::Timestamp;
use pricetag::prelude::{
    ProductId, ProductSnapshot, RunLogId, RunOutcome, SaleId, SaleProductHistory,
    SaleSnapshot, SaleStatus, StoreId, TransactionKind, Transition,
};

use crate::domain::sales::{StoreError, records::RunLogRecord, store::SaleStore};

#[derive(Debug, Default)]
pub(crate) struct MemorySaleStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sales: Vec<SaleSnapshot>,
    products: Vec<ProductSnapshot>,
    run_logs: Vec<(RunLogId, RunLogRecord)>,
    failing: Option<SaleId>,
    stalled: Option<SaleId>,
}

impl MemorySaleStore {
    pub(crate) fn new(sales: Vec<SaleSnapshot>, products: Vec<ProductSnapshot>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                sales,
                products,
                ..MemoryState::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make every transition of `sale` fail with a pool timeout.
    pub(crate) fn fail_transitions_for(&self, sale: SaleId) {
        self.state().failing = Some(sale);
    }

    /// Make every transition of `sale` wait forever.
    pub(crate) fn stall_transitions_for(&self, sale: SaleId) {
        self.state().stalled = Some(sale);
    }

    pub(crate) fn sale(&self, sale: SaleId) -> Option<SaleSnapshot> {
        self.state()
            .sales
            .iter()
            .find(|snapshot| snapshot.sale.id == sale)
            .cloned()
    }

    pub(crate) fn status(&self, sale: SaleId) -> Option<SaleStatus> {
        self.sale(sale).map(|snapshot| snapshot.sale.status)
    }

    /// Record units sold under a sale, as the checkout pipeline does.
    pub(crate) fn record_units(&self, sale: SaleId, product: ProductId, units: i64) {
        let mut state = self.state();

        if let Some(snapshot) = state.sales.iter_mut().find(|s| s.sale.id == sale) {
            snapshot.history.push(SaleProductHistory {
                product_id: product,
                total_item_count: units,
            });
        }
    }

    pub(crate) fn run_log(&self, run_log: RunLogId) -> Option<RunLogRecord> {
        self.state()
            .run_logs
            .iter()
            .find(|(id, _)| *id == run_log)
            .map(|(_, record)| record.clone())
    }

    pub(crate) fn run_log_count(&self) -> usize {
        self.state().run_logs.len()
    }
}

#[async_trait]
impl SaleStore for MemorySaleStore {
    async fn find_active_sale(
        &self,
        store: StoreId,
        sale: SaleId,
        kind: TransactionKind,
    ) -> Result<SaleSnapshot, StoreError> {
        self.state()
            .sales
            .iter()
            .find(|snapshot| {
                let s = &snapshot.sale;

                s.id == sale
                    && s.store_id == store
                    && s.transaction_kind == kind
                    && s.status == SaleStatus::OnHeld
                    && !s.on_pause
            })
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_product(
        &self,
        store: StoreId,
        product: ProductId,
    ) -> Result<ProductSnapshot, StoreError> {
        self.state()
            .products
            .iter()
            .find(|p| p.id == product && p.store_id == store)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list_open_sales(
        &self,
        store: Option<StoreId>,
        tick: Timestamp,
    ) -> Result<Vec<SaleSnapshot>, StoreError> {
        let mut sales: Vec<SaleSnapshot> = self
            .state()
            .sales
            .iter()
            .filter(|snapshot| {
                let s = &snapshot.sale;

                s.status != SaleStatus::Finished
                    && s.start_datetime <= tick
                    && store.is_none_or(|store| s.store_id == store)
            })
            .cloned()
            .collect();

        sales.sort_by_key(|snapshot| snapshot.sale.id);

        Ok(sales)
    }

    async fn apply_transitions(
        &self,
        sale: SaleId,
        transitions: &[Transition],
    ) -> Result<(), StoreError> {
        let stalled = self.state().stalled == Some(sale);

        if stalled {
            std::future::pending::<()>().await;
        }

        let mut state = self.state();

        if state.failing == Some(sale) {
            return Err(StoreError::Sql(sqlx::Error::PoolTimedOut));
        }

        let snapshot = state
            .sales
            .iter_mut()
            .find(|snapshot| snapshot.sale.id == sale)
            .ok_or(StoreError::NotFound)?;

        for transition in transitions {
            snapshot.sale.status = transition.status();

            if transition.clears_history() {
                snapshot.history.clear();
            }
        }

        Ok(())
    }

    async fn create_run_log(&self) -> Result<RunLogId, StoreError> {
        let mut state = self.state();

        let id = RunLogId::new(state.run_logs.last().map_or(1, |(id, _)| id.get() + 1));

        state.run_logs.push((
            id,
            RunLogRecord {
                text: String::new(),
                outcome: None,
            },
        ));

        Ok(id)
    }

    async fn update_run_log(
        &self,
        run_log: RunLogId,
        text: &str,
        outcome: RunOutcome,
    ) -> Result<(), StoreError> {
        let mut state = self.state();

        let (_, record) = state
            .run_logs
            .iter_mut()
            .find(|(id, _)| *id == run_log)
            .ok_or(StoreError::NotFound)?;

        record.text = text.to_string();
        record.outcome = Some(outcome);

        Ok(())
    }
}
