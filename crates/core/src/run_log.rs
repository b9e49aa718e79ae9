//! Sweep Run Log

use std::{error, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    errors::{UnknownValueError, error_chain},
    ids::TypedId,
    sales::{SaleId, SaleStatus, StoreId},
    schedule::Tick,
};

/// Run Log ID
pub type RunLogId = TypedId<RunLog>;

/// Final outcome of a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunOutcome {
    /// Every sale was processed.
    Ok,

    /// The sweep stopped on an error.
    Error,
}

impl RunOutcome {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Error => "ERROR",
        }
    }
}

impl FromStr for RunOutcome {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OK" => Ok(Self::Ok),
            "ERROR" => Ok(Self::Error),
            other => Err(UnknownValueError::new("run outcome", other)),
        }
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable trace of one sweep.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunLog {
    text: String,
}

impl RunLog {
    /// Start a trace for a sweep at `tick`, optionally scoped to one store.
    #[must_use]
    pub fn begin(tick: &Tick, store: Option<StoreId>) -> Self {
        let mut text = format!("tick: {tick}");

        if let Some(store) = store {
            text.push_str(&format!(" store: {store}"));
        }

        text.push('\n');

        Self { text }
    }

    /// Record how many sales the sweep considers.
    pub fn record_candidates(&mut self, count: usize) {
        self.text.push_str(&format!("sales to process: {count}\n"));
    }

    /// Record a committed status change.
    pub fn record_status(&mut self, sale: SaleId, status: SaleStatus) {
        self.text
            .push_str(&format!("sale {sale}: status changed to {status}\n"));
    }

    /// Record the error that stopped the sweep, with its full chain of causes.
    pub fn record_error(&mut self, error: &dyn error::Error) {
        self.text
            .push_str(&format!("\nerror: {}\n", error_chain(error)));
    }

    /// Record that the sweep was abandoned before it finished.
    pub fn record_cancelled(&mut self) {
        self.text.push_str("\nerror: sweep cancelled\n");
    }

    /// Trace text so far.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the log, returning its text.
    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}
