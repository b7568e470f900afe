use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Display};

/// Identifies a tenant (a business record) across the platform.
///
/// The value is opaque: it is whatever id the persistence layer assigned. It is
/// only ever interpolated into attribute values and element ids, so it is
/// escaped where that matters rather than restricted here.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TenantId(String);

impl TenantId {
    /// Creates a new `TenantId`.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if the provided `id` is empty.
    pub fn new(id: impl Into<String>) -> Self {
        let id_str = id.into();
        debug_assert!(!id_str.is_empty(), "TenantId must not be empty");
        Self(id_str)
    }

    /// Returns a string slice of the tenant ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Debug for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TenantId").field(&self.0).finish()
    }
}

impl Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TenantId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&str> for TenantId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}
