//! Products

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{errors::UnknownValueError, ids::TypedId, sales::StoreId};

/// Product ID
pub type ProductId = TypedId<ProductSnapshot>;

/// Item genre marker.
#[derive(Debug)]
pub enum Genre {}

/// Item category marker.
#[derive(Debug)]
pub enum Category {}

/// Item Genre ID
pub type GenreId = TypedId<Genre>;

/// Item Category ID
pub type CategoryId = TypedId<Category>;

/// Which side of the counter a transaction is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Selling to a customer.
    Sell,

    /// Buying from a customer.
    Buy,
}

impl TransactionKind {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sell => "sell",
            Self::Buy => "buy",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(Self::Sell),
            "buy" => Ok(Self::Buy),
            other => Err(UnknownValueError::new("transaction kind", other)),
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Genre and category of the item a product belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemClassification {
    /// Item genre.
    pub genre_id: Option<GenreId>,

    /// Item category.
    pub category_id: Option<CategoryId>,
}

/// Read-only view of a product and its item, as needed for price resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    /// Product ID.
    pub id: ProductId,

    /// Owning store.
    pub store_id: StoreId,

    /// Base sell price.
    pub sell_price: Option<i64>,

    /// Product-specific sell price; wins over `sell_price`.
    pub specific_sell_price: Option<i64>,

    /// Base buy price.
    pub buy_price: Option<i64>,

    /// Product-specific buy price; wins over `buy_price`.
    pub specific_buy_price: Option<i64>,

    /// Classification of the product's item, when it has one.
    pub item: Option<ItemClassification>,
}

impl ProductSnapshot {
    /// Price used as the starting point for a transaction of `kind`.
    ///
    /// The product-specific override wins over the base price; a product with neither is
    /// priced at zero.
    #[must_use]
    pub fn price_for(&self, kind: TransactionKind) -> i64 {
        let price = match kind {
            TransactionKind::Sell => self.specific_sell_price.or(self.sell_price),
            TransactionKind::Buy => self.specific_buy_price.or(self.buy_price),
        };

        price.unwrap_or(0)
    }

    /// Genre of the product's item.
    #[must_use]
    pub fn genre_id(&self) -> Option<GenreId> {
        self.item.and_then(|item| item.genre_id)
    }

    /// Category of the product's item.
    #[must_use]
    pub fn category_id(&self) -> Option<CategoryId> {
        self.item.and_then(|item| item.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductSnapshot {
        ProductSnapshot {
            id: ProductId::new(1),
            store_id: StoreId::new(1),
            sell_price: Some(1000),
            specific_sell_price: None,
            buy_price: Some(400),
            specific_buy_price: Some(450),
            item: None,
        }
    }

    #[test]
    fn base_price_used_without_override() {
        assert_eq!(product().price_for(TransactionKind::Sell), 1000);
    }

    #[test]
    fn override_wins_over_base_price() {
        assert_eq!(product().price_for(TransactionKind::Buy), 450);
    }

    #[test]
    fn missing_prices_resolve_to_zero() {
        let product = ProductSnapshot {
            sell_price: None,
            ..product()
        };

        assert_eq!(product.price_for(TransactionKind::Sell), 0);
    }

    #[test]
    fn transaction_kind_round_trips_through_text() {
        assert_eq!("sell".parse(), Ok(TransactionKind::Sell));
        assert_eq!(TransactionKind::Buy.to_string(), "buy");
        assert!("rent".parse::<TransactionKind>().is_err(), "rent is not a kind");
    }
}
