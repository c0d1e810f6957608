//! # Price Calculator
//!
//! Derives subtotal, discount value and total for one cart line item.
//!
//! ```text
//! subtotal      = base price + sum(extra prices)
//! discountValue = PERCENTAGE ? subtotal * amount / 100 : amount
//! total         = subtotal - discountValue
//! ```
//!
//! Only one discount applies at a time. The total is not clamped: a fixed
//! discount larger than the subtotal yields a negative total.

use crate::cart::CartLineItem;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// How a discount amount is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountType {
    /// `amount` is a percentage of the subtotal
    Percentage,
    /// `amount` is a fixed value in riyals
    Amount,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::Percentage => "PERCENTAGE",
            DiscountType::Amount => "AMOUNT",
        }
    }
}

impl std::str::FromStr for DiscountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PERCENTAGE" => Ok(DiscountType::Percentage),
            "AMOUNT" => Ok(DiscountType::Amount),
            other => Err(format!("unknown discount type: {}", other)),
        }
    }
}

/// A validated discount code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountDescriptor {
    pub code: String,
    /// Percentage points for [`DiscountType::Percentage`], riyals otherwise.
    /// Never negative.
    pub amount: f64,
    #[serde(rename = "type")]
    pub discount_type: DiscountType,
}

impl DiscountDescriptor {
    /// Create a descriptor; negative amounts are floored at zero
    pub fn new(code: impl Into<String>, amount: f64, discount_type: DiscountType) -> Self {
        Self {
            code: code.into(),
            amount: amount.max(0.0),
            discount_type,
        }
    }

    pub fn percentage(code: impl Into<String>, percent: f64) -> Self {
        Self::new(code, percent, DiscountType::Percentage)
    }

    pub fn fixed(code: impl Into<String>, riyals: f64) -> Self {
        Self::new(code, riyals, DiscountType::Amount)
    }

    /// Discount value against `subtotal`
    pub fn value_for(&self, subtotal: Money) -> Money {
        match self.discount_type {
            DiscountType::Percentage => subtotal.percent(self.amount),
            DiscountType::Amount => Money::from_riyals(self.amount),
        }
    }

    /// Label for the summary row, e.g. "WASH10 (10%)"
    pub fn label(&self) -> String {
        match self.discount_type {
            DiscountType::Percentage => format!("{} ({}%)", self.code, self.amount),
            DiscountType::Amount => format!("{} (-{:.2})", self.code, self.amount),
        }
    }
}

/// Computed price summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Money,
    pub discount_value: Money,
    pub total: Money,
}

impl PriceBreakdown {
    /// True when the discount exceeds the subtotal
    pub fn is_negative(&self) -> bool {
        self.total.is_negative()
    }
}

/// `base + sum(extras)`
pub fn subtotal(item: &CartLineItem) -> Money {
    item.base_price() + item.item_dto.extras_total()
}

/// Compute the breakdown for an item with an optional discount
pub fn compute_breakdown(item: &CartLineItem, discount: Option<&DiscountDescriptor>) -> PriceBreakdown {
    breakdown_for_subtotal(subtotal(item), discount)
}

/// Compute the breakdown from a known subtotal
pub fn breakdown_for_subtotal(subtotal: Money, discount: Option<&DiscountDescriptor>) -> PriceBreakdown {
    let discount_value = discount.map(|d| d.value_for(subtotal)).unwrap_or(Money::ZERO);
    let breakdown = PriceBreakdown {
        subtotal,
        discount_value,
        total: subtotal - discount_value,
    };

    if breakdown.is_negative() {
        warn!(
            subtotal = %breakdown.subtotal,
            discount = %breakdown.discount_value,
            "discount exceeds subtotal, total is negative"
        );
    }

    breakdown
}
