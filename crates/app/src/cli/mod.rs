use clap::{Parser, Subcommand};
use pricetag::errors::error_chain;
use pricetag_app::{
    config::{DatabaseConfig, LoggingConfig, ScheduleConfig},
    context::{AppContext, AppInitError},
    observability::init_logging,
};
use serde::Serialize;

mod resolve;
mod sweep;

#[derive(Debug, Parser)]
#[command(name = "pricetag-app", about = "Pricetag sale engine CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    logging: LoggingConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one sale status sweep
    Sweep(sweep::SweepArgs),

    /// Resolve one sale against one product
    Resolve(resolve::ResolveArgs),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        init_logging(&self.logging)
            .map_err(|error| format!("failed to initialise logging: {}", error_chain(&error)))?;

        match self.command {
            Commands::Sweep(args) => sweep::run(args).await,
            Commands::Resolve(args) => resolve::run(args).await,
        }
    }
}

async fn connect(
    database: &DatabaseConfig,
    schedule: &ScheduleConfig,
) -> Result<AppContext, String> {
    let time_zone = schedule
        .time_zone()
        .map_err(|source| AppInitError::TimeZone {
            name: schedule.time_zone.clone(),
            source,
        })
        .map_err(|error| error_chain(&error))?;

    AppContext::from_database_url(&database.database_url, time_zone)
        .await
        .map_err(|error| error_chain(&error))
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to serialise output: {error}"))?;

    #[expect(clippy::print_stdout, reason = "command output")]
    {
        println!("{json}");
    }

    Ok(())
}
