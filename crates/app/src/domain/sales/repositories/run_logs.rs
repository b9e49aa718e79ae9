//! Run Logs Repository

use pricetag::prelude::{RunLogId, RunOutcome};
use sqlx::{Postgres, Transaction, query_as, query_scalar};

use crate::domain::sales::records::RunLogRecord;

const CREATE_RUN_LOG_SQL: &str = include_str!("../sql/create_run_log.sql");
const UPDATE_RUN_LOG_SQL: &str = include_str!("../sql/update_run_log.sql");
const GET_RUN_LOG_SQL: &str = include_str!("../sql/get_run_log.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRunLogsRepository;

impl PgRunLogsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_run_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<RunLogId, sqlx::Error> {
        let id = query_scalar::<Postgres, i64>(CREATE_RUN_LOG_SQL)
            .fetch_one(&mut **tx)
            .await?;

        Ok(RunLogId::new(id))
    }

    pub(crate) async fn update_run_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        run_log: RunLogId,
        text: &str,
        outcome: RunOutcome,
    ) -> Result<(), sqlx::Error> {
        query_scalar::<Postgres, i64>(UPDATE_RUN_LOG_SQL)
            .bind(run_log.get())
            .bind(text)
            .bind(outcome.as_str())
            .fetch_one(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_run_log(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        run_log: RunLogId,
    ) -> Result<RunLogRecord, sqlx::Error> {
        query_as::<Postgres, RunLogRecord>(GET_RUN_LOG_SQL)
            .bind(run_log.get())
            .fetch_one(&mut **tx)
            .await
    }
}
