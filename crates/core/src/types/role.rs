//! Normalized user roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A user's role, normalized at session creation.
///
/// The backend stores roles as free-form strings and compares them
/// case-insensitively against "admin". Normalizing once here means every
/// later check is an enum comparison instead of a string comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Back-office access.
    Admin,
    /// A regular shopper.
    #[default]
    Customer,
}

impl Role {
    /// Normalize a wire-format role string.
    ///
    /// "admin" in any casing maps to [`Role::Admin`]; every other value,
    /// including the backend's "user", maps to [`Role::Customer`].
    #[must_use]
    pub fn from_wire(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::Customer
        }
    }

    /// Whether this role grants access to the admin namespace.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}
