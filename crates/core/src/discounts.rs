//! Discounts
//!
//! A sale stores its discount as text: `"80%"` or `"-150"`. The text is parsed once, at the
//! loading boundary, into [`DiscountAmount`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a stored discount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiscountError {
    /// The text has no leading integer.
    #[error("discount amount `{0}` is not a number")]
    Invalid(String),

    /// The leading integer does not fit.
    #[error("discount amount `{0}` is out of range")]
    OutOfRange(String),
}

/// Configured discount of a sale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum DiscountAmount {
    /// The resulting price, as a percentage of the original.
    ///
    /// `Percentage(80)` charges 80% of the original price; it is not "80% off".
    Percentage(i32),

    /// Signed amount added to the original price.
    Absolute(i32),
}

/// Prices produced by applying a discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Price before the sale.
    pub original_price: i64,

    /// Signed difference between the result and the original price.
    pub discount_price: i64,

    /// Price after the sale.
    pub result_price: i64,
}

impl DiscountAmount {
    /// Parse an optional stored discount. Missing or blank text means no discount is configured.
    ///
    /// # Errors
    ///
    /// Returns a [`DiscountError`] when non-blank text has no usable leading integer.
    pub fn parse_stored(raw: Option<&str>) -> Result<Option<Self>, DiscountError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => text.parse().map(Some),
        }
    }

    /// Apply the discount to `original_price`.
    ///
    /// Percentage results are truncated toward zero.
    #[must_use]
    pub fn apply(self, original_price: i64) -> PriceBreakdown {
        match self {
            Self::Percentage(percentage) => {
                let result_price = original_price.saturating_mul(i64::from(percentage)) / 100;

                PriceBreakdown {
                    original_price,
                    discount_price: result_price.saturating_sub(original_price),
                    result_price,
                }
            }
            Self::Absolute(amount) => PriceBreakdown {
                original_price,
                discount_price: i64::from(amount),
                result_price: original_price.saturating_add(i64::from(amount)),
            },
        }
    }
}

impl FromStr for DiscountAmount {
    type Err = DiscountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = leading_integer(s)?;

        if s.contains('%') {
            Ok(Self::Percentage(value))
        } else {
            Ok(Self::Absolute(value))
        }
    }
}

impl fmt::Display for DiscountAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percentage(percentage) => write!(f, "{percentage}%"),
            Self::Absolute(amount) => write!(f, "{amount}"),
        }
    }
}

/// Read an optionally signed integer from the start of `text`, ignoring whatever follows it.
fn leading_integer(text: &str) -> Result<i32, DiscountError> {
    let trimmed = text.trim_start();
    let mut digits = String::with_capacity(trimmed.len());

    for (index, ch) in trimmed.chars().enumerate() {
        match ch {
            '+' | '-' if index == 0 => digits.push(ch),
            '0'..='9' => digits.push(ch),
            _ => break,
        }
    }

    if !digits.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(DiscountError::Invalid(text.to_string()));
    }

    digits
        .parse()
        .map_err(|_overflow| DiscountError::OutOfRange(text.to_string()))
}
