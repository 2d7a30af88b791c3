//! The purchase aggregate and its pricing rules.

use crate::catalog::{Package, Variant};
use crate::error::CommerceError;
use crate::gateway::CatalogGateway;
use crate::money::Money;
use crate::promo::{Coupon, Credit, Discount};
use crate::purchase::{PurchaseOptions, PurchaseTotals};

/// Code of the package that hosts single-variant upgrade purchases.
const UPGRADE_BASE_PACKAGE: &str = "base_package";

/// A package to compose a purchase against: already resolved, or a code to
/// look up through the gateway.
#[derive(Debug, Clone)]
pub enum PackageRef {
    Resolved(Package),
    Code(String),
}

impl From<Package> for PackageRef {
    fn from(package: Package) -> Self {
        PackageRef::Resolved(package)
    }
}

impl From<&str> for PackageRef {
    fn from(code: &str) -> Self {
        PackageRef::Code(code.to_string())
    }
}

impl From<String> for PackageRef {
    fn from(code: String) -> Self {
        PackageRef::Code(code)
    }
}

/// A priced purchase: one package, a set of selected variants, and up to
/// three promotional adjustments.
///
/// Subtotal and total are derived on every read; no pricing state is cached
/// across mutations. A purchase is owned by a single checkout attempt and
/// mutated in place until its total is read and submitted downstream.
#[derive(Debug, Clone)]
pub struct Purchase {
    package: Package,
    variants: Vec<Variant>,
    coupon: Option<Coupon>,
    discount: Option<Discount>,
    credit: Credit,
    organization: Option<String>,
    state: Option<String>,
}

impl Purchase {
    /// Compose a purchase.
    ///
    /// The package may be passed directly or as a code, which is resolved
    /// through the gateway (scoped to `options.state` when given). Variant
    /// codes resolve against the package's catalog; the package's own
    /// bundled defaults are then appended. A coupon code is looked up
    /// best-effort: a missing or failing coupon never aborts construction.
    pub fn new(
        gateway: &dyn CatalogGateway,
        package: impl Into<PackageRef>,
        options: PurchaseOptions,
    ) -> Result<Self, CommerceError> {
        let package = match package.into() {
            PackageRef::Resolved(package) => package,
            PackageRef::Code(code) => gateway.resolve_package(&code, options.state.as_deref())?,
        };
        let variants = compose_variants(&package, &options.variants)?;

        let mut purchase = Self {
            package,
            variants,
            coupon: None,
            discount: options.discount_in_cents.and_then(Discount::from_cents),
            credit: options
                .credit_in_cents
                .map(Credit::from_cents)
                .unwrap_or_default(),
            organization: options.organization,
            state: options.state,
        };
        if let Some(code) = options.coupon_code.as_deref() {
            purchase.set_coupon_code(gateway, Some(code));
        }
        Ok(purchase)
    }

    /// Compose an upgrade purchase: the well-known base package with a
    /// single variant selected, e.g. extending an already-bought consult to
    /// a longer tier.
    pub fn upgrade_for(
        gateway: &dyn CatalogGateway,
        variant_code: &str,
    ) -> Result<Self, CommerceError> {
        Self::new(
            gateway,
            UPGRADE_BASE_PACKAGE,
            PurchaseOptions::new().with_variants([variant_code]),
        )
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn coupon(&self) -> Option<&Coupon> {
        self.coupon.as_ref()
    }

    pub fn discount(&self) -> Option<&Discount> {
        self.discount.as_ref()
    }

    pub fn credit(&self) -> Credit {
        self.credit
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn state(&self) -> Option<&str> {
        self.state.as_deref()
    }

    /// The purchase's variants with default attribution re-derived.
    ///
    /// Copied occurrences carry no stable identity, so which of them count
    /// as the package's bundled defaults is recomputed on every read rather
    /// than stored. The view is pure: reading twice without an intervening
    /// mutation yields identical annotations.
    pub fn variants(&self) -> Vec<Variant> {
        reconcile_defaults(&self.variants, &self.package.default_variants())
    }

    /// Select an additional variant by code. Selecting a code already in
    /// the purchase is a no-op.
    pub fn add_variant(&mut self, code: &str) -> Result<(), CommerceError> {
        let variant = self
            .package
            .find_variant(code)
            .ok_or_else(|| CommerceError::VariantNotFound(code.to_string()))?
            .clone();
        if !self.variants.iter().any(|v| v.code == variant.code) {
            self.variants.push(variant);
        }
        Ok(())
    }

    /// Drop a variant by code. Returns whether anything was removed.
    pub fn remove_variant(&mut self, code: &str) -> bool {
        let before = self.variants.len();
        self.variants.retain(|v| v.code != code);
        self.variants.len() < before
    }

    /// Replace the selection outright; the package's bundled defaults are
    /// re-appended.
    pub fn set_variant_codes<S: AsRef<str>>(&mut self, codes: &[S]) -> Result<(), CommerceError> {
        self.variants = compose_variants(&self.package, codes)?;
        Ok(())
    }

    /// Store a resolved coupon, replacing any existing one outright.
    pub fn set_coupon(&mut self, coupon: Option<Coupon>) {
        self.coupon = coupon;
    }

    /// Look up a coupon code through the gateway and store the outcome.
    ///
    /// `None` clears the slot. So does a code the service does not know or
    /// a failed lookup: coupons are best-effort and never error. Returns
    /// the coupon now occupying the slot.
    pub fn set_coupon_code(
        &mut self,
        gateway: &dyn CatalogGateway,
        code: Option<&str>,
    ) -> Option<&Coupon> {
        self.coupon = code.and_then(|code| {
            gateway
                .resolve_coupon(code, &self.package.code, self.organization.as_deref())
                .into_coupon()
        });
        self.coupon.as_ref()
    }

    /// Replace the discount outright. The stored amount is kept verbatim;
    /// clamping happens only when a total is computed.
    pub fn set_discount(&mut self, discount: Option<Discount>) {
        self.discount = discount;
    }

    /// Replace the credit outright.
    pub fn set_credit(&mut self, credit: Credit) {
        self.credit = credit;
    }

    /// Package cost plus every selected variant, minus the package-declared
    /// cost of its bundled defaults.
    ///
    /// The subtraction uses the package's own default list, not the
    /// reconciled view, so it is independent of which occurrence matched.
    pub fn subtotal_in_cents(&self) -> i64 {
        let selected: i64 = self.variants.iter().map(|v| v.cost_in_cents).sum();
        let bundled: i64 = self
            .package
            .default_variants()
            .iter()
            .map(|v| v.cost_in_cents)
            .sum();
        self.package.cost_in_cents + selected - bundled
    }

    pub fn total_in_cents(&self) -> i64 {
        self.totals().total.cents()
    }

    /// Subtotal as a decimal currency amount.
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_in_cents())
    }

    /// Total as a decimal currency amount.
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_in_cents())
    }

    /// Full pricing breakdown.
    ///
    /// The coupon wins over the discount when both are stored; the credit
    /// applies to whatever remains. Each reduction is clamped to the amount
    /// still payable, so the total cannot go negative. Stored adjustment
    /// amounts are never modified.
    pub fn totals(&self) -> PurchaseTotals {
        let subtotal = self.subtotal_in_cents();
        let mut remaining = subtotal.max(0);

        let discounts_applied = match (&self.coupon, &self.discount) {
            (Some(coupon), _) => coupon.discount_in_cents.min(remaining),
            (None, Some(discount)) => discount.discount_in_cents.min(remaining),
            (None, None) => 0,
        };
        remaining -= discounts_applied;

        let credit_applied = self.credit.credit_in_cents.min(remaining);
        remaining -= credit_applied;

        PurchaseTotals {
            subtotal: Money::from_cents(subtotal),
            discounts_applied: Money::from_cents(discounts_applied),
            credit_applied: Money::from_cents(credit_applied),
            total: Money::from_cents(remaining),
        }
    }
}

/// Resolve selected codes against the package catalog and append the
/// package's bundled defaults. Occurrences are unique by code.
fn compose_variants<S: AsRef<str>>(
    package: &Package,
    codes: &[S],
) -> Result<Vec<Variant>, CommerceError> {
    let mut variants: Vec<Variant> = Vec::new();
    for code in codes {
        let code = code.as_ref();
        let variant = package
            .find_variant(code)
            .ok_or_else(|| CommerceError::VariantNotFound(code.to_string()))?;
        if !variants.iter().any(|v| v.code == variant.code) {
            variants.push(variant.clone());
        }
    }
    for bundled in package.default_variants() {
        if !variants.iter().any(|v| v.code == bundled.code) {
            variants.push(bundled.clone());
        }
    }
    Ok(variants)
}

/// Re-derive which occurrences count as the package's bundled defaults.
///
/// Each package default consumes the first unmarked occurrence sharing its
/// type prefix, in package order. Occurrences left unmatched stay billable;
/// a count mismatch between the two lists is tolerated.
fn reconcile_defaults(occurrences: &[Variant], bundled: &[&Variant]) -> Vec<Variant> {
    let mut view: Vec<Variant> = occurrences
        .iter()
        .cloned()
        .map(|mut v| {
            v.default = false;
            v.default_code = None;
            v
        })
        .collect();

    for slot in bundled {
        if let Some(occurrence) = view
            .iter_mut()
            .find(|v| !v.default && v.variant_type() == slot.variant_type())
        {
            occurrence.default = true;
            occurrence.default_code = Some(slot.code.clone());
        }
    }
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::StubCatalog;

    fn wellness_package() -> Package {
        let mut package = Package::new("wellcheck", "Baseline", 14900);
        package.variants = vec![
            Variant::new("vitamin_d", "Vitamin D", 4000),
            Variant::new("vitamin_b", "Vitamin B", 1000),
        ];
        package
    }

    fn catalog() -> StubCatalog {
        StubCatalog::new().with_package(wellness_package())
    }

    fn purchase(options: PurchaseOptions) -> Purchase {
        Purchase::new(&catalog(), wellness_package(), options).unwrap()
    }

    #[test]
    fn test_sets_package_and_organization() {
        let p = purchase(PurchaseOptions::new().with_organization("test org"));
        assert_eq!(p.package().code, "wellcheck");
        assert_eq!(p.organization(), Some("test org"));
    }

    #[test]
    fn test_resolves_package_by_code() {
        let p = Purchase::new(&catalog(), "wellcheck", PurchaseOptions::new()).unwrap();
        assert_eq!(p.package().name, "Baseline");
    }

    #[test]
    fn test_unknown_package_code() {
        let err = Purchase::new(&catalog(), "asdfasdf", PurchaseOptions::new()).unwrap_err();
        assert!(matches!(err, CommerceError::PackageNotFound(code) if code == "asdfasdf"));
    }

    #[test]
    fn test_package_unavailable_in_state() {
        let catalog = catalog().with_unavailable_in("wellcheck", "NY");
        let err = Purchase::new(
            &catalog,
            "wellcheck",
            PurchaseOptions::new().with_state("NY"),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CommerceError::PackageNotAvailableInState { state, .. } if state == "NY"
        ));
    }

    #[test]
    fn test_unknown_variant_code() {
        let err = Purchase::new(
            &catalog(),
            wellness_package(),
            PurchaseOptions::new().with_variants(["asdfasdf"]),
        )
        .unwrap_err();
        assert!(matches!(err, CommerceError::VariantNotFound(code) if code == "asdfasdf"));
    }

    #[test]
    fn test_variants_resolve_to_catalog_objects() {
        let p = purchase(PurchaseOptions::new().with_variants(["vitamin_b"]));
        let variants = p.variants();
        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].name, "Vitamin B");
        assert_eq!(variants[0].cost_in_cents, 1000);
    }

    #[test]
    fn test_bundled_defaults_are_added_on_construction() {
        let mut package = wellness_package();
        package
            .variants
            .push(Variant::bundled("default_variant", "Default variant", 12345));

        let p = Purchase::new(&catalog(), package, PurchaseOptions::new()).unwrap();
        let variants = p.variants();
        assert!(variants.iter().any(|v| v.code == "default_variant"));
    }

    #[test]
    fn test_subtotal_is_package_cost_with_no_variants() {
        let p = purchase(PurchaseOptions::new());
        assert_eq!(p.subtotal_in_cents(), 14900);
    }

    #[test]
    fn test_subtotal_subtracts_bundled_default_cost() {
        let mut package = wellness_package();
        package
            .variants
            .push(Variant::bundled("default_variant", "Default variant", 12345));

        let p = Purchase::new(&catalog(), package, PurchaseOptions::new()).unwrap();
        assert_eq!(p.subtotal_in_cents(), 14900);
    }

    #[test]
    fn test_subtotal_sums_selected_variants() {
        let p = purchase(PurchaseOptions::new().with_variants(["vitamin_d", "vitamin_b"]));
        assert_eq!(p.subtotal_in_cents(), 19900);
    }

    #[test]
    fn test_subtotal_ignores_coupon() {
        let catalog = catalog().with_coupon(Coupon::new("SAVE15", 1500));
        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new()
                .with_variants(["vitamin_d", "vitamin_b"])
                .with_coupon_code("SAVE15"),
        )
        .unwrap();
        assert!(p.coupon().is_some());
        assert_eq!(p.subtotal_in_cents(), 19900);
    }

    #[test]
    fn test_subtotal_money_view() {
        let p = purchase(PurchaseOptions::new());
        assert!((p.subtotal().to_decimal() - 149.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_total_equals_subtotal_without_adjustments() {
        let p = purchase(PurchaseOptions::new().with_variants(["vitamin_d"]));
        assert_eq!(p.total_in_cents(), p.subtotal_in_cents());
    }

    #[test]
    fn test_total_subtracts_coupon() {
        let catalog = catalog().with_coupon(Coupon::new("SAVE15", 1500));
        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new().with_coupon_code("SAVE15"),
        )
        .unwrap();
        assert_eq!(p.total_in_cents(), 13400);
    }

    #[test]
    fn test_total_subtracts_credit_after_coupon() {
        let catalog = catalog().with_coupon(Coupon::new("SAVE15", 1500));
        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new()
                .with_coupon_code("SAVE15")
                .with_credit_in_cents(100),
        )
        .unwrap();
        assert_eq!(p.total_in_cents(), 14900 - 1500 - 100);
    }

    #[test]
    fn test_oversized_discount_clamps_total_to_zero() {
        let p = purchase(PurchaseOptions::new().with_discount_in_cents(15000));
        assert_eq!(p.total_in_cents(), 0);
        assert_eq!(p.discount().unwrap().discount_in_cents, 15000);
    }

    #[test]
    fn test_oversized_credit_clamps_total_to_zero() {
        let p = purchase(
            PurchaseOptions::new()
                .with_discount_in_cents(1500)
                .with_credit_in_cents(99_999_999),
        );
        assert_eq!(p.total_in_cents(), 0);
        assert_eq!(p.credit().credit_in_cents, 99_999_999);
    }

    #[test]
    fn test_coupon_wins_over_discount() {
        let catalog = catalog().with_coupon(Coupon::new("SAVE15", 1500));
        let mut p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new()
                .with_coupon_code("SAVE15")
                .with_discount_in_cents(500),
        )
        .unwrap();
        assert_eq!(p.total_in_cents(), 14900 - 1500);

        // Clearing the coupon lets the stored discount participate,
        // unmodified from its originally supplied amount.
        p.set_coupon(None);
        assert_eq!(p.discount().unwrap().discount_in_cents, 500);
        assert_eq!(p.total_in_cents(), 14900 - 500);
    }

    #[test]
    fn test_non_positive_discount_means_absent() {
        let p = purchase(PurchaseOptions::new().with_discount_in_cents(0));
        assert!(p.discount().is_none());
        let p = purchase(PurchaseOptions::new().with_discount_in_cents(-100));
        assert!(p.discount().is_none());
    }

    #[test]
    fn test_totals_breakdown() {
        let catalog = catalog().with_coupon(Coupon::new("SAVE15", 1500));
        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new()
                .with_coupon_code("SAVE15")
                .with_credit_in_cents(100),
        )
        .unwrap();

        let totals = p.totals();
        assert_eq!(totals.subtotal.cents(), 14900);
        assert_eq!(totals.discounts_applied.cents(), 1500);
        assert_eq!(totals.credit_applied.cents(), 100);
        assert_eq!(totals.total.cents(), 13300);
    }

    #[test]
    fn test_set_coupon_code_state_machine() {
        let catalog = catalog()
            .with_coupon(Coupon::new("FIRST", 1000))
            .with_coupon(Coupon::new("SECOND", 2000));
        let mut p = Purchase::new(&catalog, wellness_package(), PurchaseOptions::new()).unwrap();

        p.set_coupon_code(&catalog, Some("FIRST"));
        assert_eq!(p.coupon().unwrap().discount_in_cents, 1000);

        // Replacing with another known code swaps the coupon outright.
        p.set_coupon_code(&catalog, Some("SECOND"));
        assert_eq!(p.coupon().unwrap().discount_in_cents, 2000);

        // An unknown code empties the slot rather than erroring.
        p.set_coupon_code(&catalog, Some("NOPE"));
        assert!(p.coupon().is_none());

        p.set_coupon_code(&catalog, Some("FIRST"));
        p.set_coupon_code(&catalog, None);
        assert!(p.coupon().is_none());
    }

    #[test]
    fn test_coupon_lookup_forwards_organization() {
        let catalog = StubCatalog::new()
            .with_package(wellness_package())
            .with_coupon(Coupon::new("ORG_ONLY", 1500).with_organization("acme"));

        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new()
                .with_organization("acme")
                .with_coupon_code("ORG_ONLY"),
        )
        .unwrap();
        assert!(p.coupon().is_some());

        let p = Purchase::new(
            &catalog,
            wellness_package(),
            PurchaseOptions::new().with_coupon_code("ORG_ONLY"),
        )
        .unwrap();
        assert!(p.coupon().is_none());
    }

    #[test]
    fn test_add_and_remove_variant() {
        let mut p = purchase(PurchaseOptions::new());
        p.add_variant("vitamin_d").unwrap();
        assert_eq!(p.subtotal_in_cents(), 18900);

        // Re-adding the same code changes nothing.
        p.add_variant("vitamin_d").unwrap();
        assert_eq!(p.variants().len(), 1);

        assert!(p.remove_variant("vitamin_d"));
        assert!(!p.remove_variant("vitamin_d"));
        assert_eq!(p.subtotal_in_cents(), 14900);

        let err = p.add_variant("asdfasdf").unwrap_err();
        assert!(matches!(err, CommerceError::VariantNotFound(_)));
    }

    #[test]
    fn test_set_variant_codes_reappends_defaults() {
        let mut package = wellness_package();
        package
            .variants
            .push(Variant::bundled("consult.physician.0", "Intro consult", 0));

        let mut p = Purchase::new(&catalog(), package, PurchaseOptions::new()).unwrap();
        p.set_variant_codes(&["vitamin_d"]).unwrap();

        let codes: Vec<String> = p.variants().iter().map(|v| v.code.clone()).collect();
        assert_eq!(codes, vec!["vitamin_d", "consult.physician.0"]);
    }

    #[test]
    fn test_reconciliation_marks_upgraded_tier_as_default() {
        let mut package = Package::new("checkup", "Checkup", 9900);
        package.variants = vec![
            Variant::bundled("consult.physician.0", "Intro consult", 0),
            Variant::new("consult.physician.45", "45-minute consult", 5000),
        ];

        let p = Purchase::new(
            &catalog(),
            package,
            PurchaseOptions::new().with_variants(["consult.physician.45"]),
        )
        .unwrap();

        let variants = p.variants();
        assert_eq!(variants.len(), 2);

        // The selected upgrade consumes the bundled slot; the bundled tier
        // itself stays unmatched and billable (at zero cost here).
        assert!(variants[0].default);
        assert_eq!(variants[0].code, "consult.physician.45");
        assert_eq!(variants[0].default_code.as_deref(), Some("consult.physician.0"));
        assert!(!variants[1].default);

        // The upgrade tier is billed in full; the bundled baseline nets out.
        assert_eq!(p.subtotal_in_cents(), 9900 + 5000);
    }

    #[test]
    fn test_reconciliation_is_idempotent() {
        let mut package = Package::new("checkup", "Checkup", 9900);
        package.variants = vec![
            Variant::bundled("consult.physician.0", "Intro consult", 0),
            Variant::new("consult.physician.45", "45-minute consult", 5000),
        ];

        let p = Purchase::new(
            &catalog(),
            package,
            PurchaseOptions::new().with_variants(["consult.physician.45"]),
        )
        .unwrap();
        assert_eq!(p.variants(), p.variants());
    }

    #[test]
    fn test_reconciliation_survives_count_divergence() {
        let mut package = Package::new("checkup", "Checkup", 9900);
        package.variants = vec![
            Variant::bundled("consult.physician.0", "Intro consult", 0),
            Variant::bundled("consult.dietitian.0", "Dietitian consult", 0),
        ];

        let mut p = Purchase::new(&catalog(), package, PurchaseOptions::new()).unwrap();
        p.remove_variant("consult.dietitian.0");

        // One bundled slot goes unmatched; nothing crashes and the
        // remaining occurrence is still attributed.
        let variants = p.variants();
        assert_eq!(variants.len(), 1);
        assert!(variants[0].default);
    }

    #[test]
    fn test_upgrade_for() {
        let mut base = Package::new("base_package", "Base", 0);
        base.variants = vec![
            Variant::bundled("consult.physician.45", "45-minute consult", 9900),
            Variant::new("consult.physician.60", "60-minute consult", 14900),
        ];
        let catalog = StubCatalog::new().with_package(base);

        let p = Purchase::upgrade_for(&catalog, "consult.physician.45").unwrap();
        assert_eq!(p.package().code, "base_package");

        let variants = p.variants();
        assert_eq!(variants.len(), 1);
        assert!(variants[0].code.starts_with("consult"));
        assert!(variants[0].default);
        assert_eq!(variants[0].default_code.as_deref(), Some("consult.physician.45"));
    }
}
