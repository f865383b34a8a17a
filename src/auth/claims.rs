// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token claims and the authenticated principal.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::roles::Authority;
use super::AuthError;

/// Subject stamped on tokens issued for user records.
pub const USER_SUBJECT: &str = "user";

/// Claims carried in the token payload.
///
/// All fields are required when decoding; a payload that lacks one or
/// carries the wrong JSON type is rejected as malformed instead of being
/// coerced later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Subject (`sub`)
    #[serde(rename = "sub")]
    pub subject: String,

    /// Login name of the principal
    pub username: String,

    /// Whether the account is enabled
    pub enabled: bool,

    /// Granted roles, in issuance order
    pub roles: Vec<String>,

    /// Issued at timestamp (unix seconds)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration timestamp (unix seconds)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl ClaimSet {
    /// Claims for a user; timestamps are filled in by the signer.
    pub fn new(username: impl Into<String>, enabled: bool, roles: Vec<String>) -> Self {
        Self {
            subject: USER_SUBJECT.to_string(),
            username: username.into(),
            enabled,
            roles,
            issued_at: 0,
            expires_at: 0,
        }
    }

    /// Reject claim sets that cannot identify a principal.
    pub fn ensure_signable(&self) -> Result<(), AuthError> {
        if self.username.trim().is_empty() {
            return Err(AuthError::InvalidPrincipal);
        }
        Ok(())
    }
}

/// Authenticated identity established for a single request.
///
/// Built by the authentication filter from a verified [`ClaimSet`] and
/// stored in the request extensions. Downstream handlers read it through
/// the [`Auth`](super::Auth) extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub enabled: bool,
    pub authorities: HashSet<Authority>,
}

impl Principal {
    /// Create from verified claims. Duplicate roles collapse.
    pub fn from_claims(claims: ClaimSet) -> Self {
        Self {
            username: claims.username,
            enabled: claims.enabled,
            authorities: claims.roles.into_iter().map(Authority::from).collect(),
        }
    }

    /// Check whether the principal was granted `authority`.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|a| a.as_str() == authority)
    }

    /// Fail with [`AuthError::InsufficientAuthority`] unless `authority` is held.
    pub fn ensure_authority(&self, authority: &str) -> Result<(), AuthError> {
        if self.has_authority(authority) {
            Ok(())
        } else {
            Err(AuthError::InsufficientAuthority)
        }
    }

    /// Authorities in lexical order, for stable output.
    pub fn sorted_authorities(&self) -> Vec<Authority> {
        let mut authorities: Vec<Authority> = self.authorities.iter().cloned().collect();
        authorities.sort();
        authorities
    }
}
