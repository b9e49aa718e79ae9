//! Pricetag
//!
//! Retail sale engine: decides whether a sale applies to a product and at what price, and
//! plans the status transitions that move sales through their lifecycle on a fixed tick.

pub mod discounts;
pub mod errors;
pub mod fixtures;
pub mod ids;
pub mod prelude;
pub mod products;
pub mod resolver;
pub mod run_log;
pub mod sales;
pub mod schedule;
