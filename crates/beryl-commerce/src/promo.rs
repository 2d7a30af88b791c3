//! Promotional adjustments: coupons, discounts, and credits.
//!
//! A purchase carries up to one of each. Amounts are stored exactly as
//! supplied; clamping against the subtotal happens only when a total is
//! computed.

use serde::{Deserialize, Serialize};

/// A server-issued promotional discount, scoped to a package and an
/// organization. Only the catalog gateway produces these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coupon {
    /// Coupon code.
    pub code: String,
    /// Amount the coupon removes, in cents.
    pub discount_in_cents: i64,
    /// Package code this coupon is restricted to, if any.
    #[serde(default)]
    pub product_key: Option<String>,
    /// Organization this coupon is restricted to, if any.
    #[serde(default)]
    pub organization: Option<String>,
    /// Fields the catalog sends that this client does not model.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Coupon {
    /// Create an unrestricted coupon.
    pub fn new(code: impl Into<String>, discount_in_cents: i64) -> Self {
        Self {
            code: code.into(),
            discount_in_cents,
            product_key: None,
            organization: None,
            metadata: serde_json::Map::new(),
        }
    }

    /// Restrict the coupon to one package code.
    pub fn with_product_key(mut self, product_key: impl Into<String>) -> Self {
        self.product_key = Some(product_key.into());
        self
    }

    /// Restrict the coupon to one organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

/// A locally-specified flat reduction, mutually exclusive with a coupon
/// (the coupon wins when both are stored).
///
/// Only strictly positive amounts construct one; "no discount" is the
/// absence of a `Discount`, never a zero-valued object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Discount {
    /// Amount the discount removes, in cents.
    pub discount_in_cents: i64,
}

impl Discount {
    /// Build a discount from a requested amount. Non-positive amounts mean
    /// "no discount" and yield `None`.
    pub fn from_cents(amount_in_cents: i64) -> Option<Self> {
        (amount_in_cents > 0).then_some(Self {
            discount_in_cents: amount_in_cents,
        })
    }
}

/// A reduction applied after any coupon or discount. Every purchase has
/// one; zero is the null case.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credit {
    /// Amount the credit removes, in cents.
    pub credit_in_cents: i64,
}

impl Credit {
    /// Build a credit, flooring negative requests at zero.
    pub fn from_cents(amount_in_cents: i64) -> Self {
        Self {
            credit_in_cents: amount_in_cents.max(0),
        }
    }
}
