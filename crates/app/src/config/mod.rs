//! Configuration
//!
//! Settings are read from CLI flags with environment fallbacks; a `.env` file is loaded
//! first when present.

pub mod db;
pub mod observability;
pub mod schedule;

pub use db::DatabaseConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use schedule::ScheduleConfig;

/// Load `.env` into the process environment, ignoring a missing file.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}
