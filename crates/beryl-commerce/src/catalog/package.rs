//! Package catalog entries.

use serde::{Deserialize, Serialize};

use crate::catalog::Variant;

/// A purchasable base offering with an associated catalog of optional
/// variants.
///
/// Variant codes are unique within a package. The subsequence of variants
/// flagged `default` in the catalog's own data is what ships "free" with
/// the package; its cost is excluded from purchase subtotals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Package {
    /// Package code ("product key" on the catalog service).
    pub code: String,
    /// Display name.
    pub name: String,
    /// Marketing description.
    #[serde(default)]
    pub description: Option<String>,
    /// Base price in cents.
    pub cost_in_cents: i64,
    /// Whether the package is currently offered.
    #[serde(default = "default_active")]
    pub active: bool,
    /// Whether purchasers may change the variant selection.
    #[serde(default)]
    pub configurable: bool,
    /// Every variant offered under this package.
    #[serde(default)]
    pub variants: Vec<Variant>,
    /// Fields the catalog sends that this client does not model (ids,
    /// timestamps). Passed through untouched.
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

fn default_active() -> bool {
    true
}

impl Package {
    /// Create a package with no variants.
    pub fn new(code: impl Into<String>, name: impl Into<String>, cost_in_cents: i64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: None,
            cost_in_cents,
            active: true,
            configurable: false,
            variants: Vec::new(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Check if the package is currently offered.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Exact-code lookup into the variant catalog.
    pub fn find_variant(&self, code: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.code == code)
    }

    /// The variants bundled "free" with this package.
    pub fn default_variants(&self) -> Vec<&Variant> {
        self.variants.iter().filter(|v| v.default).collect()
    }

    /// The variants a purchaser can add on: everything not bundled.
    pub fn choosable_variants(&self) -> Vec<&Variant> {
        self.variants.iter().filter(|v| !v.default).collect()
    }
}
