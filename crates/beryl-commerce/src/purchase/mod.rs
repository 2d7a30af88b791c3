//! Purchase composition and pricing.
//!
//! Contains the purchase aggregate, its construction options, and the
//! derived pricing breakdown.

mod options;
mod purchase;
mod totals;

pub use options::PurchaseOptions;
pub use purchase::{PackageRef, Purchase};
pub use totals::PurchaseTotals;
