//! Sale Quantity Caps

use serde::{Serialize, Serializer};

use crate::{products::ProductId, sales::SaleSnapshot};

/// When an eligibility check runs relative to counting the unit being sold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Before the unit is counted; a cap with nothing left rejects.
    #[default]
    PreCheck,

    /// After the unit has been provisionally counted; a cap reached exactly still admits.
    PostCheck,
}

impl CheckMode {
    /// Mode for the legacy `isPostCheck` flag.
    #[must_use]
    pub const fn from_post_check(post_check: bool) -> Self {
        if post_check {
            Self::PostCheck
        } else {
            Self::PreCheck
        }
    }

    /// Whether `remaining` units under a cap still admit a sale in this mode.
    #[must_use]
    pub const fn admits(self, remaining: i64) -> bool {
        match self {
            Self::PreCheck => remaining > 0,
            Self::PostCheck => remaining >= 0,
        }
    }
}

/// Units the sale may still be applied to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AllowedCount {
    /// No cap applies.
    #[default]
    Unlimited,

    /// At most this many units.
    Limited(i64),
}

impl AllowedCount {
    /// Narrow the allowance to at most `remaining` units.
    #[must_use]
    pub fn tighten(self, remaining: i64) -> Self {
        match self {
            Self::Unlimited => Self::Limited(remaining),
            Self::Limited(current) => Self::Limited(current.min(remaining)),
        }
    }

    /// Legacy encoding, where `-1` means unlimited.
    #[must_use]
    pub const fn as_legacy(self) -> i64 {
        match self {
            Self::Unlimited => -1,
            Self::Limited(count) => count,
        }
    }
}

impl Serialize for AllowedCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.as_legacy())
    }
}

impl SaleSnapshot {
    /// Remaining allowance for `product`, or `None` when either cap rejects it.
    ///
    /// The global cap is checked first, then the per-product cap, which can only tighten.
    #[must_use]
    pub fn allowance(&self, product: ProductId, mode: CheckMode) -> Option<AllowedCount> {
        let mut allowed = AllowedCount::Unlimited;

        if let Some(cap) = self.sale.total_cap() {
            let remaining = cap - self.total_sold();

            if !mode.admits(remaining) {
                return None;
            }

            allowed = AllowedCount::Limited(remaining);
        }

        if let Some(cap) = self.sale.unit_cap() {
            let remaining = cap - self.sold_for(product);

            if !mode.admits(remaining) {
                return None;
            }

            allowed = allowed.tighten(remaining);
        }

        Some(allowed)
    }
}
