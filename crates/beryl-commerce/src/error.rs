//! Commerce error types.

use thiserror::Error;

/// Errors that can occur while composing a purchase against the catalog.
///
/// None of these are retried here; retry policy, if any, belongs to the
/// transport layer. Coupon lookup problems never surface as errors at all
/// (see [`crate::gateway::CouponLookup`]).
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Requested package code does not exist upstream.
    #[error("Package not found: {0}")]
    PackageNotFound(String),

    /// Package exists but is not sold in the given state.
    #[error("Package {code} is not available in {state}")]
    PackageNotAvailableInState { code: String, state: String },

    /// A supplied variant code does not resolve against the package catalog.
    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    /// Malformed purchase options, e.g. a variant list that is not an array.
    #[error("Invalid purchase options: {0}")]
    InvalidOptions(String),

    /// A gateway response that is neither success nor a recognized
    /// structured error. Includes transport failures and malformed bodies.
    #[error("Unexpected catalog response: {0}")]
    UnexpectedResponse(String),
}
