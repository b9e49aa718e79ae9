//! Sales
//!
//! A sale is a discount campaign scoped to one store. Its rules decide which products it
//! targets and its consumption history tracks how many units have been sold under it since
//! it was last activated.

use std::{fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{
    discounts::DiscountAmount,
    errors::UnknownValueError,
    ids::TypedId,
    products::{CategoryId, GenreId, ProductId, TransactionKind},
};

pub mod caps;
pub mod targeting;

/// Store marker.
#[derive(Debug)]
pub enum Store {}

/// Store ID
pub type StoreId = TypedId<Store>;

/// Sale ID
pub type SaleId = TypedId<Sale>;

/// Lifecycle status of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SaleStatus {
    /// Not yet active, or between two recurrence windows.
    NotHeld,

    /// Currently active.
    OnHeld,

    /// Terminal.
    Finished,
}

impl SaleStatus {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotHeld => "NOT_HELD",
            Self::OnHeld => "ON_HELD",
            Self::Finished => "FINISHED",
        }
    }
}

impl FromStr for SaleStatus {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_HELD" => Ok(Self::NotHeld),
            "ON_HELD" => Ok(Self::OnHeld),
            "FINISHED" => Ok(Self::Finished),
            other => Err(UnknownValueError::new("sale status", other)),
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a targeting rule adds or removes products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleRule {
    /// Product is part of the sale.
    Include,

    /// Product is never part of the sale.
    Exclude,
}

impl SaleRule {
    /// Stored representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Include => "include",
            Self::Exclude => "exclude",
        }
    }
}

impl FromStr for SaleRule {
    type Err = UnknownValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "include" => Ok(Self::Include),
            "exclude" => Ok(Self::Exclude),
            other => Err(UnknownValueError::new("sale rule", other)),
        }
    }
}

/// Sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    /// Sale ID.
    pub id: SaleId,

    /// Owning store.
    pub store_id: StoreId,

    /// Name shown to staff.
    pub display_name: String,

    /// Transactions the sale applies to.
    pub transaction_kind: TransactionKind,

    /// Current lifecycle status.
    pub status: SaleStatus,

    /// Manual override; a paused sale is never applied.
    pub on_pause: bool,

    /// First instant the sale may become active.
    pub start_datetime: Timestamp,

    /// End of the first recurrence occurrence; with `start_datetime` it sets the length of
    /// every occurrence.
    pub end_datetime: Option<Timestamp>,

    /// Absolute end of the sale.
    pub sale_end_datetime: Option<Timestamp>,

    /// Recurrence expression, for repeating sales.
    pub repeat_cron_rule: Option<String>,

    /// Unit cap across every product of the sale.
    pub total_item_limit: Option<i64>,

    /// Unit cap per product.
    pub unit_item_limit: Option<i64>,

    /// Configured discount; `None` means the sale discounts nothing.
    pub discount: Option<DiscountAmount>,
}

impl Sale {
    /// Recurrence expression, when one is configured.
    #[must_use]
    pub fn recurrence(&self) -> Option<&str> {
        self.repeat_cron_rule
            .as_deref()
            .map(str::trim)
            .filter(|rule| !rule.is_empty())
    }

    /// Whether the sale repeats on a schedule.
    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurrence().is_some()
    }

    /// Global unit cap. A stored zero means no cap.
    #[must_use]
    pub fn total_cap(&self) -> Option<i64> {
        self.total_item_limit.filter(|cap| *cap != 0)
    }

    /// Per-product unit cap. A stored zero means no cap.
    #[must_use]
    pub fn unit_cap(&self) -> Option<i64> {
        self.unit_item_limit.filter(|cap| *cap != 0)
    }
}

/// Product targeting rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleProduct {
    /// Targeted product.
    pub product_id: ProductId,

    /// Include or exclude.
    pub rule: SaleRule,
}

/// Department targeting rule. A `None` filter matches any value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleDepartment {
    /// Genre filter.
    pub genre_id: Option<GenreId>,

    /// Category filter.
    pub category_id: Option<CategoryId>,

    /// Include or exclude.
    pub rule: SaleRule,
}

/// Units of one product sold under a sale since its current activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleProductHistory {
    /// Product sold.
    pub product_id: ProductId,

    /// Cumulative units sold.
    pub total_item_count: i64,
}

/// A sale together with its rules and consumption history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSnapshot {
    /// The sale itself.
    pub sale: Sale,

    /// Product rules, in stored order.
    pub products: Vec<SaleProduct>,

    /// Department rules, in stored order.
    pub departments: SmallVec<[SaleDepartment; 2]>,

    /// Consumption history.
    pub history: Vec<SaleProductHistory>,
}

impl SaleSnapshot {
    /// Snapshot of a sale with no rules and no history.
    #[must_use]
    pub fn new(sale: Sale) -> Self {
        Self {
            sale,
            products: Vec::new(),
            departments: SmallVec::new(),
            history: Vec::new(),
        }
    }

    /// Units sold across every product.
    #[must_use]
    pub fn total_sold(&self) -> i64 {
        self.history.iter().map(|row| row.total_item_count).sum()
    }

    /// Units sold of one product.
    #[must_use]
    pub fn sold_for(&self, product: ProductId) -> i64 {
        self.history
            .iter()
            .filter(|row| row.product_id == product)
            .map(|row| row.total_item_count)
            .sum()
    }

    /// Products explicitly included by a product rule.
    pub fn included_products(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.products
            .iter()
            .filter(|rule| rule.rule == SaleRule::Include)
            .map(|rule| rule.product_id)
    }

    /// Drop rules and history, keeping only the sale.
    #[must_use]
    pub fn into_sale(self) -> Sale {
        self.sale
    }
}
