use clap::Args;
use pricetag::{
    errors::error_chain,
    prelude::{CheckMode, ProductId, SaleId, StoreId, TransactionKind},
};
use pricetag_app::{
    config::{DatabaseConfig, ScheduleConfig},
    domain::sales::data::ResolveRequest,
};

#[derive(Debug, Args)]
pub(crate) struct ResolveArgs {
    #[command(flatten)]
    database: DatabaseConfig,

    #[command(flatten)]
    schedule: ScheduleConfig,

    /// Store the sale and product belong to
    #[arg(long)]
    store_id: i64,

    /// Sale to resolve
    #[arg(long)]
    sale_id: i64,

    /// Product to resolve the sale against
    #[arg(long)]
    product_id: i64,

    /// Transaction kind (sell, buy)
    #[arg(long, default_value = "sell")]
    kind: TransactionKind,

    /// Evaluate caps after the current unit has been counted
    #[arg(long)]
    post_check: bool,
}

pub(crate) async fn run(args: ResolveArgs) -> Result<(), String> {
    let context = super::connect(&args.database, &args.schedule).await?;

    let request = ResolveRequest::new(
        StoreId::new(args.store_id),
        SaleId::new(args.sale_id),
        ProductId::new(args.product_id),
    )
    .with_kind(args.kind)
    .with_mode(CheckMode::from_post_check(args.post_check));

    let resolution = context
        .sales
        .resolve_sale(request)
        .await
        .map_err(|error| format!("resolve failed: {}", error_chain(&error)))?;

    super::print_json(&resolution)
}
