//! The seam between the purchase domain and the remote catalog service.

use crate::catalog::Package;
use crate::error::CommerceError;
use crate::promo::Coupon;

/// Outcome of a coupon lookup.
///
/// Lookup failures stay distinguishable from "no such coupon" at this
/// level; both collapse into an empty coupon slot at the purchase boundary,
/// because coupons are optional and best-effort.
#[derive(Debug, Clone, PartialEq)]
pub enum CouponLookup {
    /// A coupon matched the code, package, and organization.
    Found(Coupon),
    /// The service answered and reported no matching coupon.
    NotFound,
    /// The lookup itself failed (transport problem, malformed body).
    Failed(String),
}

impl CouponLookup {
    /// Collapse to the purchase-boundary view: a coupon or nothing.
    pub fn into_coupon(self) -> Option<Coupon> {
        match self {
            CouponLookup::Found(coupon) => Some(coupon),
            CouponLookup::NotFound | CouponLookup::Failed(_) => None,
        }
    }
}

/// Resolves package and coupon codes against the catalog service.
///
/// These are the only two remote operations the purchase core depends on.
/// Implementations block for at most their configured timeouts and never
/// retry.
pub trait CatalogGateway {
    /// Look up a package by code, optionally scoped to a state.
    fn resolve_package(&self, code: &str, state: Option<&str>)
        -> Result<Package, CommerceError>;

    /// Look up a coupon scoped to a package and organization. Must not
    /// fail: transport problems are reported as [`CouponLookup::Failed`].
    fn resolve_coupon(
        &self,
        code: &str,
        package_code: &str,
        organization: Option<&str>,
    ) -> CouponLookup;
}

/// In-memory catalog for tests and examples.
///
/// Registered coupons behave like the real service's: a coupon matches when
/// its code matches and each of its restrictions (package code,
/// organization) is either unset or equal to the purchase's.
#[derive(Debug, Clone, Default)]
pub struct StubCatalog {
    packages: Vec<Package>,
    coupons: Vec<Coupon>,
    unavailable: Vec<(String, String)>,
}

impl StubCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package.
    pub fn with_package(mut self, package: Package) -> Self {
        self.packages.push(package);
        self
    }

    /// Register a coupon.
    pub fn with_coupon(mut self, coupon: Coupon) -> Self {
        self.coupons.push(coupon);
        self
    }

    /// Mark a package as not offered in a state.
    pub fn with_unavailable_in(
        mut self,
        code: impl Into<String>,
        state: impl Into<String>,
    ) -> Self {
        self.unavailable.push((code.into(), state.into()));
        self
    }
}

impl CatalogGateway for StubCatalog {
    fn resolve_package(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> Result<Package, CommerceError> {
        if let Some(state) = state {
            if self
                .unavailable
                .iter()
                .any(|(c, s)| c == code && s == state)
            {
                return Err(CommerceError::PackageNotAvailableInState {
                    code: code.to_string(),
                    state: state.to_string(),
                });
            }
        }
        self.packages
            .iter()
            .find(|p| p.code == code)
            .cloned()
            .ok_or_else(|| CommerceError::PackageNotFound(code.to_string()))
    }

    fn resolve_coupon(
        &self,
        code: &str,
        package_code: &str,
        organization: Option<&str>,
    ) -> CouponLookup {
        let matched = self.coupons.iter().find(|coupon| {
            coupon.code == code
                && coupon
                    .product_key
                    .as_deref()
                    .map_or(true, |key| key == package_code)
                && coupon
                    .organization
                    .as_deref()
                    .map_or(true, |org| Some(org) == organization)
        });
        match matched {
            Some(coupon) => CouponLookup::Found(coupon.clone()),
            None => CouponLookup::NotFound,
        }
    }
}
