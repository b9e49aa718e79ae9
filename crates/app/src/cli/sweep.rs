use clap::Args;
use jiff::Timestamp;
use pricetag::{errors::error_chain, prelude::StoreId};
use pricetag_app::{
    config::{DatabaseConfig, ScheduleConfig},
    domain::sales::data::SweepRequest,
};

#[derive(Debug, Args)]
pub(crate) struct SweepArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    schedule: ScheduleConfig,

    /// Only sweep this store's sales
    #[arg(long)]
    store_id: Option<i64>,

    /// Evaluate at this instant instead of now (RFC 3339)
    #[arg(long)]
    at: Option<Timestamp>,
}

pub(crate) async fn run(args: SweepArgs) -> Result<(), String> {
    let context = super::connect(&args.database, &args.schedule).await?;

    let summary = context
        .sales
        .sweep(SweepRequest {
            store_id: args.store_id.map(StoreId::new),
            at: args.at,
        })
        .await
        .map_err(|error| format!("sweep failed: {}", error_chain(&error)))?;

    super::print_json(&summary)
}
