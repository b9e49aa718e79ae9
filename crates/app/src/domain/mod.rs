//! Pricetag Domain Concerns

pub mod sales;
