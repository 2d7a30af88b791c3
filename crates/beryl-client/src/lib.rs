//! Blocking HTTP client for the Beryl catalog service.
//!
//! Implements [`beryl_commerce::gateway::CatalogGateway`] over the service's
//! REST endpoints, so a [`beryl_commerce::purchase::Purchase`] can be
//! composed straight against the live catalog.
//!
//! # Example
//!
//! ```rust,ignore
//! use beryl_client::{CatalogClient, ClientConfig};
//! use beryl_commerce::prelude::*;
//!
//! let client = CatalogClient::new(ClientConfig::new("https://catalog.example.com"))?;
//!
//! let purchase = Purchase::new(
//!     &client,
//!     "wellcheck",
//!     PurchaseOptions::new()
//!         .with_variants(["vitamin_d"])
//!         .with_state("CA"),
//! )?;
//! println!("Total: {}", purchase.total());
//! ```

mod client;
mod config;

pub use client::CatalogClient;
pub use config::ClientConfig;
