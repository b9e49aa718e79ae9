//! Schedule Config

use clap::Args;
use jiff::tz::TimeZone;

/// Sweep clock settings.
#[derive(Debug, Args)]
pub struct ScheduleConfig {
    /// IANA time zone that ticks and recurrence expressions are evaluated in
    #[arg(long, env = "SALES_TIME_ZONE", default_value = "UTC")]
    pub time_zone: String,
}

impl ScheduleConfig {
    /// Resolve the configured time zone.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is not in the time zone database.
    pub fn time_zone(&self) -> Result<TimeZone, jiff::Error> {
        let name = self.time_zone.trim();

        if name.eq_ignore_ascii_case("UTC") {
            return Ok(TimeZone::UTC);
        }

        TimeZone::get(name)
    }
}
