//! Sale Targeting
//!
//! Decides whether a sale's product and department rules reach a product.

use crate::{
    products::ProductSnapshot,
    sales::{SaleDepartment, SaleRule, SaleSnapshot},
};

/// Outcome of matching a product against a sale's rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Targeting {
    /// An exclude rule names the product.
    Excluded,

    /// An include product rule names the product.
    IncludedByProduct,

    /// An include department rule matches the product's item.
    IncludedByDepartment,

    /// No rule reaches the product.
    Untargeted,
}

impl Targeting {
    /// Whether the sale applies to the product.
    #[must_use]
    pub const fn is_targeted(self) -> bool {
        matches!(self, Self::IncludedByProduct | Self::IncludedByDepartment)
    }
}

impl SaleSnapshot {
    /// Match `product` against this sale's rules.
    ///
    /// Exclusion always wins. Product rules are consulted before department rules, and
    /// department rules only when no product rule names the product.
    #[must_use]
    pub fn targeting(&self, product: &ProductSnapshot) -> Targeting {
        let mut included = false;

        for rule in self.products.iter().filter(|rule| rule.product_id == product.id) {
            match rule.rule {
                SaleRule::Exclude => return Targeting::Excluded,
                SaleRule::Include => included = true,
            }
        }

        if included {
            return Targeting::IncludedByProduct;
        }

        if self
            .departments
            .iter()
            .any(|department| department.includes(product))
        {
            return Targeting::IncludedByDepartment;
        }

        Targeting::Untargeted
    }
}

impl SaleDepartment {
    /// Whether this is an include rule whose filters both accept the product's item.
    #[must_use]
    pub fn includes(&self, product: &ProductSnapshot) -> bool {
        self.rule == SaleRule::Include
            && self
                .genre_id
                .is_none_or(|genre| product.genre_id() == Some(genre))
            && self
                .category_id
                .is_none_or(|category| product.category_id() == Some(category))
    }
}
