//! Purchase construction options.

use serde::Deserialize;

use crate::error::CommerceError;

/// Options accepted when composing a purchase.
///
/// Everything is optional; the default value composes the bare package.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PurchaseOptions {
    /// Codes of add-on variants to select.
    pub variants: Vec<String>,
    /// Coupon code to look up through the gateway (best-effort).
    pub coupon_code: Option<String>,
    /// Flat discount request; non-positive amounts mean no discount.
    pub discount_in_cents: Option<i64>,
    /// Credit amount; omitted means zero.
    pub credit_in_cents: Option<i64>,
    /// Purchasing organization, forwarded to coupon lookups.
    pub organization: Option<String>,
    /// State the purchase must be available in.
    pub state: Option<String>,
}

impl PurchaseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from an untyped JSON value, e.g. a checkout request
    /// body. A `variants` value that is not an array of strings is rejected
    /// here rather than deeper in the purchase.
    pub fn from_json(value: serde_json::Value) -> Result<Self, CommerceError> {
        serde_json::from_value(value).map_err(|e| CommerceError::InvalidOptions(e.to_string()))
    }

    /// Select add-on variants by code.
    pub fn with_variants<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.variants = codes.into_iter().map(Into::into).collect();
        self
    }

    /// Request a coupon lookup during construction.
    pub fn with_coupon_code(mut self, code: impl Into<String>) -> Self {
        self.coupon_code = Some(code.into());
        self
    }

    /// Request a flat discount.
    pub fn with_discount_in_cents(mut self, amount: i64) -> Self {
        self.discount_in_cents = Some(amount);
        self
    }

    /// Apply a credit.
    pub fn with_credit_in_cents(mut self, amount: i64) -> Self {
        self.credit_in_cents = Some(amount);
        self
    }

    /// Set the purchasing organization.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Set the state the purchase must be available in.
    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = Some(state.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json() {
        let options = PurchaseOptions::from_json(json!({
            "variants": ["vitamin_d", "vitamin_b"],
            "coupon_code": "SAVE15",
            "discount_in_cents": 500,
            "organization": "acme"
        }))
        .unwrap();

        assert_eq!(options.variants, vec!["vitamin_d", "vitamin_b"]);
        assert_eq!(options.coupon_code.as_deref(), Some("SAVE15"));
        assert_eq!(options.discount_in_cents, Some(500));
        assert_eq!(options.credit_in_cents, None);
    }

    #[test]
    fn test_from_json_rejects_non_array_variants() {
        let err = PurchaseOptions::from_json(json!({"variants": "asdf"})).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidOptions(_)));
    }

    #[test]
    fn test_builders() {
        let options = PurchaseOptions::new()
            .with_variants(["vitamin_d"])
            .with_credit_in_cents(100)
            .with_state("CA");

        assert_eq!(options.variants, vec!["vitamin_d"]);
        assert_eq!(options.credit_in_cents, Some(100));
        assert_eq!(options.state.as_deref(), Some("CA"));
    }
}
