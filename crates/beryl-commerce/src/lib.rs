//! Purchase and pricing domain for the Beryl catalog service.
//!
//! This crate is the client-side model of a priced purchase: a package
//! fetched from the catalog, the variants selected under it, and up to
//! three promotional adjustments (coupon, discount, credit). It owns the
//! pricing rules, including the type-prefix heuristic that decides which
//! variant occurrences count as the package's bundled defaults, and
//! performs no I/O of its own; the network lives behind the
//! [`gateway::CatalogGateway`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use beryl_commerce::prelude::*;
//!
//! let catalog = StubCatalog::new().with_package(package);
//!
//! let mut purchase = Purchase::new(
//!     &catalog,
//!     "wellcheck",
//!     PurchaseOptions::new()
//!         .with_variants(["vitamin_d"])
//!         .with_coupon_code("SAVE15"),
//! )?;
//!
//! purchase.set_credit(Credit::from_cents(100));
//! println!("Total: {}", purchase.total());
//! ```

pub mod error;
pub mod money;

pub mod catalog;
pub mod gateway;
pub mod promo;
pub mod purchase;

pub use error::CommerceError;
pub use money::Money;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::money::Money;

    // Catalog
    pub use crate::catalog::{Package, Variant};

    // Promotions
    pub use crate::promo::{Coupon, Credit, Discount};

    // Purchase
    pub use crate::purchase::{PackageRef, Purchase, PurchaseOptions, PurchaseTotals};

    // Gateway
    pub use crate::gateway::{CatalogGateway, CouponLookup, StubCatalog};
}
