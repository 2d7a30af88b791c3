//! Package variant types.

use serde::{Deserialize, Serialize};

/// An add-on or tier selectable within a package.
///
/// Identity is the `code` field. Codes encode a dotted taxonomy, e.g.
/// `"consult.physician.45"`: the segment before the first `.` is the
/// variant type, which is how bundled defaults are attributed when a
/// purchaser swaps one tier of a slot for another.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Dotted type/tier code, unique within a package.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Price in cents.
    pub cost_in_cents: i64,
    /// Whether this occurrence is attributed to the package's bundled
    /// defaults. Recomputed on every read of [`crate::purchase::Purchase::variants`].
    #[serde(default)]
    pub default: bool,
    /// Code of the package default this occurrence was matched against.
    /// Set only on matched occurrences.
    #[serde(default)]
    pub default_code: Option<String>,
}

impl Variant {
    /// Create a choosable (non-default) variant.
    pub fn new(code: impl Into<String>, name: impl Into<String>, cost_in_cents: i64) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            cost_in_cents,
            default: false,
            default_code: None,
        }
    }

    /// Create a variant that ships bundled with its package.
    pub fn bundled(code: impl Into<String>, name: impl Into<String>, cost_in_cents: i64) -> Self {
        Self {
            default: true,
            ..Self::new(code, name, cost_in_cents)
        }
    }

    /// The variant type: the segment of the code before the first `.`,
    /// or the whole code when undotted.
    pub fn variant_type(&self) -> &str {
        match self.code.find('.') {
            Some(dot) => &self.code[..dot],
            None => &self.code,
        }
    }
}
