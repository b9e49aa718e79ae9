//! Sales Service

use std::{fmt, mem, sync::Arc};

use async_trait::async_trait;
use jiff::{Timestamp, tz::TimeZone};
use mockall::automock;
use pricetag::{
    errors::error_chain,
    prelude::{
        RecurrenceEvaluator, RunLog, RunLogId, RunOutcome, SaleResolution, SaleSnapshot,
        StoreId, Tick, plan_transitions, resolve,
    },
};
use tokio::runtime::Handle;
use tracing::{Span, debug, info, warn};

use crate::domain::sales::{
    SalesServiceError, StoreError,
    data::{ResolveRequest, StatusChange, SweepRequest, SweepSummary},
    store::SaleStore,
};

/// Sale engine over a store and a recurrence evaluator.
#[derive(Clone)]
pub struct SaleEngine {
    store: Arc<dyn SaleStore>,
    recurrence: Arc<dyn RecurrenceEvaluator>,
    time_zone: TimeZone,
}

impl SaleEngine {
    /// Engine evaluating ticks and recurrences in `time_zone`.
    #[must_use]
    pub fn new(
        store: Arc<dyn SaleStore>,
        recurrence: Arc<dyn RecurrenceEvaluator>,
        time_zone: TimeZone,
    ) -> Self {
        Self {
            store,
            recurrence,
            time_zone,
        }
    }

    /// Whether `tick` is inside the sale's recurrence window. Non-recurring sales never are.
    fn in_window(
        &self,
        snapshot: &SaleSnapshot,
        tick: Timestamp,
    ) -> Result<bool, SalesServiceError> {
        let sale = &snapshot.sale;

        let Some(expression) = sale.recurrence() else {
            return Ok(false);
        };

        Ok(self
            .recurrence
            .in_window(expression, tick, sale.start_datetime, sale.end_datetime)?)
    }

    /// Evaluate and commit every open sale, recording each change in `log` and `progress`.
    ///
    /// Stops at the first failing sale; sales already committed keep their new status.
    async fn process(
        &self,
        tick: &Tick,
        store: Option<StoreId>,
        log: &mut RunLog,
        progress: &mut SweepProgress,
    ) -> Result<(), SalesServiceError> {
        let sales = self.store.list_open_sales(store, tick.timestamp()).await?;

        progress.candidates = sales.len();
        log.record_candidates(sales.len());

        for snapshot in sales {
            let sale_id = snapshot.sale.id;
            let in_window = self.in_window(&snapshot, tick.timestamp())?;
            let plan = plan_transitions(&snapshot, tick.timestamp(), in_window);

            debug!(
                sale_id = %sale_id,
                status = %snapshot.sale.status,
                in_window,
                transitions = plan.len(),
                "evaluated sale"
            );

            if plan.is_empty() {
                continue;
            }

            self.store.apply_transitions(sale_id, &plan).await?;

            for transition in plan {
                let status = transition.status();

                log.record_status(sale_id, status);

                info!(sale_id = %sale_id, %transition, %status, "sale status changed");

                progress.changes.push(StatusChange {
                    sale_id,
                    transition,
                    status,
                });
            }
        }

        Ok(())
    }
}

impl fmt::Debug for SaleEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaleEngine")
            .field("time_zone", &self.time_zone)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct SweepProgress {
    candidates: usize,
    changes: Vec<StatusChange>,
}

/// Run log of a sweep in progress.
///
/// Dropping it before [`OpenRunLog::finish`] completes writes the partial trace with an
/// `ERROR` outcome from a spawned task.
struct OpenRunLog {
    store: Arc<dyn SaleStore>,
    id: RunLogId,
    log: RunLog,
    finished: bool,
}

impl OpenRunLog {
    fn new(store: Arc<dyn SaleStore>, id: RunLogId, log: RunLog) -> Self {
        Self {
            store,
            id,
            log,
            finished: false,
        }
    }

    async fn finish(mut self, outcome: RunOutcome) -> Result<(), StoreError> {
        let result = self
            .store
            .update_run_log(self.id, self.log.text(), outcome)
            .await;

        self.finished = true;

        result
    }
}

impl Drop for OpenRunLog {
    fn drop(&mut self) {
        if self.finished {
            return;
        }

        self.log.record_cancelled();

        let Ok(runtime) = Handle::try_current() else {
            warn!(
                run_log_id = %self.id,
                "sweep cancelled outside a runtime; run log left open"
            );
            return;
        };

        let store = Arc::clone(&self.store);
        let id = self.id;
        let text = mem::take(&mut self.log).into_text();

        warn!(run_log_id = %id, "sweep cancelled; finalising run log");

        runtime.spawn(async move {
            if let Err(error) = store.update_run_log(id, &text, RunOutcome::Error).await {
                warn!(
                    run_log_id = %id,
                    error = %error_chain(&error),
                    "failed to finalise run log"
                );
            }
        });
    }
}

#[async_trait]
impl SalesService for SaleEngine {
    #[tracing::instrument(
        name = "sales.service.resolve_sale",
        skip(self, request),
        fields(
            store_id = %request.store_id,
            sale_id = %request.sale_id,
            product_id = %request.product_id,
            kind = %request.kind,
            applicable = tracing::field::Empty
        ),
        err
    )]
    async fn resolve_sale(
        &self,
        request: ResolveRequest,
    ) -> Result<Option<SaleResolution>, SalesServiceError> {
        let snapshot = match request.sale {
            Some(snapshot) => snapshot,
            None => self
                .store
                .find_active_sale(request.store_id, request.sale_id, request.kind)
                .await
                .map_err(|error| match error {
                    StoreError::NotFound => SalesServiceError::SaleNotFound,
                    other => SalesServiceError::Store(other),
                })?,
        };

        let product = match request.product {
            Some(product) => product,
            None => self
                .store
                .find_product(request.store_id, request.product_id)
                .await
                .map_err(|error| match error {
                    StoreError::NotFound => SalesServiceError::ProductNotFound,
                    other => SalesServiceError::Store(other),
                })?,
        };

        let resolution = resolve(&snapshot, &product, request.kind, request.mode);

        Span::current().record("applicable", resolution.is_some());

        Ok(resolution)
    }

    #[tracing::instrument(
        name = "sales.service.sweep",
        skip(self, request),
        fields(
            store_id = tracing::field::Empty,
            tick = tracing::field::Empty,
            run_log_id = tracing::field::Empty
        ),
        err
    )]
    async fn sweep(&self, request: SweepRequest) -> Result<SweepSummary, SalesServiceError> {
        let at = request.at.unwrap_or_else(Timestamp::now);
        let tick = Tick::floor(at, &self.time_zone).map_err(SalesServiceError::Clock)?;

        let span = Span::current();

        if let Some(store) = request.store_id {
            span.record("store_id", tracing::field::display(store));
        }

        span.record("tick", tracing::field::display(&tick));

        let run_log_id = self.store.create_run_log().await?;

        span.record("run_log_id", tracing::field::display(run_log_id));

        let mut open = OpenRunLog::new(
            Arc::clone(&self.store),
            run_log_id,
            RunLog::begin(&tick, request.store_id),
        );
        let mut progress = SweepProgress::default();

        let result = self
            .process(&tick, request.store_id, &mut open.log, &mut progress)
            .await;

        let (outcome, error) = match result {
            Ok(()) => (RunOutcome::Ok, None),
            Err(error) => {
                let message = error_chain(&error);

                warn!(error = %message, "sweep stopped");

                open.log.record_error(&error);

                (RunOutcome::Error, Some(message))
            }
        };

        open.finish(outcome).await?;

        info!(
            %outcome,
            candidates = progress.candidates,
            changes = progress.changes.len(),
            "sweep finished"
        );

        Ok(SweepSummary {
            run_log_id,
            tick: tick.timestamp(),
            outcome,
            candidates: progress.candidates,
            changes: progress.changes,
            error,
        })
    }
}

/// Sale resolution and status sweeps.
#[automock]
#[async_trait]
pub trait SalesService: Send + Sync {
    /// Resolve one sale against one product.
    ///
    /// `Ok(None)` means the sale does not apply: the product is not targeted, no discount is
    /// configured, or a cap is exhausted.
    async fn resolve_sale(
        &self,
        request: ResolveRequest,
    ) -> Result<Option<SaleResolution>, SalesServiceError>;

    /// Run one sweep over every open sale and persist its run log.
    ///
    /// Failures while evaluating sales are recorded in the run log with an `ERROR` outcome;
    /// only failing to compute the tick or to write the run log is returned as an error. A
    /// sweep dropped mid-flight still finalises its run log as `ERROR` with the partial trace.
    async fn sweep(&self, request: SweepRequest) -> Result<SweepSummary, SalesServiceError>;
}
