// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Granted authorities.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Authority granted to system administrators.
pub const SYSTEM_ADMINISTRATOR: &str = "ROLE_SYSTEM_ADMINISTRATOR";

/// A single granted authority, e.g. `ROLE_SYSTEM_ADMINISTRATOR`.
///
/// Authorities are opaque role names carried in the `roles` claim. Case is
/// preserved and comparison is exact; no hierarchy is implied.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Authority(String);

impl Authority {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Authority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Authority {
    fn from(value: String) -> Self {
        Authority(value)
    }
}

impl From<&str> for Authority {
    fn from(value: &str) -> Self {
        Authority(value.to_string())
    }
}

impl From<Authority> for String {
    fn from(value: Authority) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_is_case_sensitive() {
        assert_eq!(Authority::from("ADMIN"), Authority::new("ADMIN"));
        assert_ne!(Authority::from("ADMIN"), Authority::from("admin"));
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&Authority::from("ROLE_USER")).unwrap();
        assert_eq!(json, r#""ROLE_USER""#);

        let back: Authority = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_str(), "ROLE_USER");
    }
}
