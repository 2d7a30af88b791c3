//! Catalog entities fetched from the Beryl service.
//!
//! Packages and variants are read-mostly snapshots of catalog data; nothing
//! here is persisted by this crate.

mod package;
mod variant;

pub use package::Package;
pub use variant::Variant;
