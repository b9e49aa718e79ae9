//! Sales

pub mod data;
mod errors;
pub mod records;
mod repositories;
pub mod service;
pub mod store;

pub use errors::{SalesServiceError, StoreError};
pub use service::{SaleEngine, SalesService};
pub use store::{PgSaleStore, SaleStore};
