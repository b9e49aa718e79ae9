//! App Context

use std::{fmt, sync::Arc};

use jiff::tz::TimeZone;
use pricetag::schedule::CronRecurrence;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::sales::{PgSaleStore, SaleEngine, SalesService},
};

/// Application start-up failure.
#[derive(Debug, Error)]
pub enum AppInitError {
    /// The database could not be reached.
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    /// The configured time zone is unknown.
    #[error("unknown time zone `{name}`")]
    TimeZone {
        /// Configured name.
        name: String,

        /// Lookup failure.
        #[source]
        source: jiff::Error,
    },
}

/// Services shared by the CLI commands.
#[derive(Clone)]
pub struct AppContext {
    /// Sales service backed by `PostgreSQL`.
    pub sales: Arc<dyn SalesService>,
}

impl AppContext {
    /// Build application context from a database URL and the sweep time zone.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(url: &str, time_zone: TimeZone) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        let store = PgSaleStore::new(Db::new(pool));

        let engine = SaleEngine::new(
            Arc::new(store),
            Arc::new(CronRecurrence::new(time_zone.clone())),
            time_zone,
        );

        Ok(Self {
            sales: Arc::new(engine),
        })
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}
