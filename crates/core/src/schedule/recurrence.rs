//! Recurrence Windows
//!
//! A recurring sale is active only inside occurrences of its recurrence expression. Each
//! firing of the expression opens an occurrence as long as the sale's first occurrence
//! (`end_datetime - start_datetime`).

use std::str::FromStr;

use chrono::{DateTime, Utc};
use cron::Schedule;
use jiff::{Timestamp, tz::TimeZone};
use thiserror::Error;

/// Slack around the search range covering any offset transition.
const OFFSET_CHANGE_MARGIN: i64 = 3 * 60 * 60;

/// Errors raised while evaluating a recurrence expression.
#[derive(Debug, Error)]
pub enum RecurrenceError {
    /// The expression could not be parsed.
    #[error("invalid recurrence expression `{expression}`")]
    InvalidExpression {
        /// Rejected expression.
        expression: String,

        /// Parser error.
        #[source]
        source: cron::error::Error,
    },

    /// An instant fell outside the calendar range the evaluator supports.
    #[error("instant outside the supported calendar range")]
    OutOfRange,
}

/// Calendar capability deciding recurrence window membership.
pub trait RecurrenceEvaluator: Send + Sync {
    /// Whether `tick` falls inside an occurrence of `expression` bounded by `start`/`end`.
    ///
    /// # Errors
    ///
    /// Returns an error when `expression` is invalid or an instant cannot be evaluated.
    fn in_window(
        &self,
        expression: &str,
        tick: Timestamp,
        start: Timestamp,
        end: Option<Timestamp>,
    ) -> Result<bool, RecurrenceError>;
}

/// Cron-expression recurrence, evaluated in a civil time zone.
#[derive(Debug, Clone)]
pub struct CronRecurrence {
    time_zone: TimeZone,
}

impl CronRecurrence {
    /// Evaluate expressions as wall-clock times in `time_zone`.
    #[must_use]
    pub fn new(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }

    /// Parse a 5, 6 or 7 field cron expression; 5-field expressions fire at second zero.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::InvalidExpression`] when the expression does not parse.
    pub fn parse(expression: &str) -> Result<Schedule, RecurrenceError> {
        let trimmed = expression.trim();

        let normalized = if trimmed.split_whitespace().count() == 5 {
            format!("0 {trimmed}")
        } else {
            trimmed.to_string()
        };

        Schedule::from_str(&normalized).map_err(|source| RecurrenceError::InvalidExpression {
            expression: expression.to_string(),
            source,
        })
    }

    /// Wall-clock reading of `second` in the configured zone, expressed as a UTC `DateTime`.
    fn wall_clock(&self, second: i64) -> Result<DateTime<Utc>, RecurrenceError> {
        let instant = Timestamp::from_second(second).map_err(|_| RecurrenceError::OutOfRange)?;
        let wall = TimeZone::UTC
            .to_timestamp(self.time_zone.to_datetime(instant))
            .map_err(|_| RecurrenceError::OutOfRange)?;

        DateTime::from_timestamp(wall.as_second(), 0).ok_or(RecurrenceError::OutOfRange)
    }

    /// Instant at which the configured zone's clock reads `wall`.
    ///
    /// Readings skipped by a forward transition resolve to the instant after the gap.
    fn instant(&self, wall: &DateTime<Utc>) -> Result<i64, RecurrenceError> {
        let reading = Timestamp::from_second(wall.timestamp())
            .map_err(|_| RecurrenceError::OutOfRange)?;

        self.time_zone
            .to_ambiguous_timestamp(TimeZone::UTC.to_datetime(reading))
            .compatible()
            .map(Timestamp::as_second)
            .map_err(|_| RecurrenceError::OutOfRange)
    }
}

impl Default for CronRecurrence {
    fn default() -> Self {
        Self::new(TimeZone::UTC)
    }
}

impl RecurrenceEvaluator for CronRecurrence {
    fn in_window(
        &self,
        expression: &str,
        tick: Timestamp,
        start: Timestamp,
        end: Option<Timestamp>,
    ) -> Result<bool, RecurrenceError> {
        let schedule = Self::parse(expression)?;

        let Some(end) = end else {
            return Ok(false);
        };

        let length = end.as_second() - start.as_second();

        if length <= 0 || tick < start {
            return Ok(false);
        }

        // A firing opens an occurrence containing the tick when it lands in (bound, tick].
        let bound = (tick.as_second() - length).max(start.as_second() - 1);
        let from = self.wall_clock(bound - OFFSET_CHANGE_MARGIN)?;
        let until = self.wall_clock(tick.as_second())?.timestamp() + OFFSET_CHANGE_MARGIN;

        for fire in schedule.after(&from) {
            if fire.timestamp() > until {
                break;
            }

            let instant = self.instant(&fire)?;

            if instant > bound && instant <= tick.as_second() {
                return Ok(true);
            }
        }

        Ok(false)
    }
}
