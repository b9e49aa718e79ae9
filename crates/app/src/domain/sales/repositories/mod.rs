pub(crate) mod products;
pub(crate) mod run_logs;
pub(crate) mod sales;
