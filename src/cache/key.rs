//! Cache key generation.

use serde::{Deserialize, Serialize};

/// Content hash identifying one cached record.
///
/// The hash is the MD5 hex digest of a canonical string built from the
/// request's identifying fields. The canonical form is the JSON array of
/// the parts, so `["a_b", "c"]` and `["a", "b_c"]` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub hash: String,
}

impl CacheKey {
    pub fn new(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn from_parts(parts: &[&str]) -> Self {
        let canonical = serde_json::to_string(parts).unwrap_or_else(|_| parts.join("\u{1f}"));
        Self::from_canonical(&canonical)
    }

    pub fn from_canonical(canonical: &str) -> Self {
        Self::new(format!("{:x}", md5::compute(canonical.as_bytes())))
    }

    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// File name used by the on-disk backend.
    pub fn file_name(&self) -> String {
        format!("{}.json", self.hash)
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.hash)
    }
}
