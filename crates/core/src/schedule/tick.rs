//! Sweep Ticks

use std::fmt;

use jiff::{RoundMode, Timestamp, Unit, Zoned, ZonedRound, tz::TimeZone};

/// Evaluation instant of a sweep, floored to a ten-minute boundary in a civil time zone.
///
/// Sweeps started a little early or late inside the same ten minutes agree on the tick, so
/// they agree on recurrence window membership too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    zoned: Zoned,
}

impl Tick {
    /// Tick granularity in minutes.
    pub const GRANULARITY_MINUTES: i64 = 10;

    /// Floor `at` to the start of its ten-minute slot in `time_zone`.
    ///
    /// # Errors
    ///
    /// Returns an error when the floored civil time cannot be represented.
    pub fn floor(at: Timestamp, time_zone: &TimeZone) -> Result<Self, jiff::Error> {
        let zoned = at.to_zoned(time_zone.clone()).round(
            ZonedRound::new()
                .smallest(Unit::Minute)
                .increment(Self::GRANULARITY_MINUTES)
                .mode(RoundMode::Trunc),
        )?;

        Ok(Self { zoned })
    }

    /// The tick as an absolute instant.
    #[must_use]
    pub fn timestamp(&self) -> Timestamp {
        self.zoned.timestamp()
    }

    /// The tick in its civil time zone.
    #[must_use]
    pub fn zoned(&self) -> &Zoned {
        &self.zoned
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.zoned.strftime("%Y-%m-%d %H:%M:%S"))
    }
}
