// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HS256 token signing and verification.
//!
//! ## Wire Format
//!
//! `base64url(header) "." base64url(payload) "." base64url(hmac)` where the
//! header is `{"alg":"HS256","typ":"JWT"}` and the payload is a
//! [`ClaimSet`]. Segments are unpadded.
//!
//! ## Verification Order
//!
//! 1. Structure: exactly three segments, else `MalformedToken`
//! 2. Signature: HMAC-SHA256 under the configured key, else `SignatureInvalid`
//! 3. Payload: decodes into a typed [`ClaimSet`] naming a principal, else
//!    `MalformedToken`
//! 4. Freshness: `exp` strictly after now, else `TokenExpired`
//!
//! Only HS256 is accepted. The `alg` header of an incoming token is never
//! used to pick a verification algorithm.

use std::time::Duration;

use base64ct::{Base64UrlUnpadded, Encoding};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};

use super::claims::ClaimSet;
use super::key::SecretKey;
use super::AuthError;
use crate::models::User;

/// Reference validity window (2 minutes).
pub const DEFAULT_VALIDITY: Duration = Duration::from_secs(120);

/// The only algorithm used for signing and accepted for verification.
const ALGORITHM: Algorithm = Algorithm::HS256;

/// Length of an HMAC-SHA256 tag in bytes.
const SIGNATURE_LEN: usize = 32;

/// Stateless token signer and verifier.
///
/// Cheap to share behind an `Arc`; holds no mutable state.
#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
}

impl TokenCodec {
    pub fn new(key: &SecretKey, validity: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(key.as_bytes()),
            decoding_key: DecodingKey::from_secret(key.as_bytes()),
            validity,
        }
    }

    /// Codec with the reference 2 minute validity window.
    pub fn with_default_validity(key: &SecretKey) -> Self {
        Self::new(key, DEFAULT_VALIDITY)
    }

    pub fn validity(&self) -> Duration {
        self.validity
    }

    /// Sign `claims`, stamping `iat = now` and `exp = now + validity`.
    pub fn sign(&self, claims: ClaimSet) -> Result<String, AuthError> {
        self.sign_at(claims, unix_now())
    }

    /// Sign `claims` as if the current time were `now` (unix seconds).
    pub fn sign_at(&self, mut claims: ClaimSet, now: i64) -> Result<String, AuthError> {
        claims.ensure_signable()?;

        claims.issued_at = now;
        claims.expires_at = now.saturating_add(self.validity_secs());

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Issue a token for a verified user record.
    pub fn issue_for(&self, user: &User) -> Result<String, AuthError> {
        self.sign(user.claims())
    }

    /// Verify `token` and return its claims.
    pub fn verify_and_extract(&self, token: &str) -> Result<ClaimSet, AuthError> {
        self.verify_at(token, unix_now())
    }

    /// Verify `token` as if the current time were `now` (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<ClaimSet, AuthError> {
        let signature = split_signature(token)?;

        // A tag that is not canonical base64url of the right length can
        // never match; classify it before handing the token to the decoder.
        match Base64UrlUnpadded::decode_vec(signature) {
            Ok(tag) if tag.len() == SIGNATURE_LEN => {}
            _ => return Err(AuthError::SignatureInvalid),
        }

        let claims = decode::<ClaimSet>(token, &self.decoding_key, &self.validation())
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature
                | ErrorKind::InvalidAlgorithm
                | ErrorKind::MissingAlgorithm => AuthError::SignatureInvalid,
                ErrorKind::InvalidToken
                | ErrorKind::Base64(_)
                | ErrorKind::Json(_)
                | ErrorKind::Utf8(_) => AuthError::MalformedToken,
                _ => AuthError::Internal(e.to_string()),
            })?
            .claims;

        claims
            .ensure_signable()
            .map_err(|_| AuthError::MalformedToken)?;

        if claims.expires_at <= now {
            return Err(AuthError::TokenExpired);
        }

        Ok(claims)
    }

    /// Signature and structure only; expiry is checked separately so the
    /// two failures stay distinguishable.
    fn validation(&self) -> Validation {
        let mut validation = Validation::new(ALGORITHM);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        validation
    }

    fn validity_secs(&self) -> i64 {
        i64::try_from(self.validity.as_secs()).unwrap_or(i64::MAX)
    }
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &ALGORITHM)
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// Return the signature segment of a three-segment token.
fn split_signature(token: &str) -> Result<&str, AuthError> {
    let mut segments = token.split('.');
    match (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) {
        (Some(header), Some(payload), Some(signature), None)
            if !header.is_empty() && !payload.is_empty() =>
        {
            Ok(signature)
        }
        _ => Err(AuthError::MalformedToken),
    }
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}
