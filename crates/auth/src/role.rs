use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role identifier from the profile record (`cargo` column upstream).
///
/// Roles are opaque strings at this layer; the only role with dedicated
/// semantics is the admin marker, compared by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The admin marker role.
    pub fn admin() -> Self {
        Self(Cow::Borrowed("admin"))
    }

    pub fn is_admin(&self) -> bool {
        self.0 == "admin"
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
