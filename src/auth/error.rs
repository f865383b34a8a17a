// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.
//!
//! Every variant stays distinguishable for logging through
//! [`AuthError::error_code`], but all authentication failures render the
//! same 401 response so a client cannot tell which check failed.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Message returned to clients for every authentication failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or expired token";

/// Message returned when an authenticated principal lacks an authority.
pub const FORBIDDEN_MESSAGE: &str = "Insufficient authority for this operation";

/// Authentication error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Token cannot be split into header/payload/signature or decoded
    #[error("Token is malformed")]
    MalformedToken,
    /// Recomputed HMAC does not match the token signature
    #[error("Token signature is invalid")]
    SignatureInvalid,
    /// Signature is valid but the validity window has passed
    #[error("Token has expired")]
    TokenExpired,
    /// No usable `Authorization: Bearer <token>` header
    #[error("Authorization header is missing or not a bearer token")]
    MissingOrMalformedHeader,
    /// Claim set handed to the signer lacks a username
    #[error("Principal is missing a username")]
    InvalidPrincipal,
    /// Unclassified failure while authenticating
    #[error("Internal authentication error: {0}")]
    Internal(String),
    /// Authenticated, but the principal lacks a required authority
    #[error("Insufficient authority")]
    InsufficientAuthority,
}

#[derive(Serialize)]
struct AuthErrorBody {
    error: &'static str,
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MalformedToken => "malformed_token",
            AuthError::SignatureInvalid => "signature_invalid",
            AuthError::TokenExpired => "token_expired",
            AuthError::MissingOrMalformedHeader => "missing_or_malformed_header",
            AuthError::InvalidPrincipal => "invalid_principal",
            AuthError::Internal(_) => "internal_error",
            AuthError::InsufficientAuthority => "insufficient_authority",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InsufficientAuthority => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            AuthError::InsufficientAuthority => FORBIDDEN_MESSAGE,
            _ => UNAUTHORIZED_MESSAGE,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(AuthErrorBody {
            error: self.public_message(),
        });
        let mut response = (status, body).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
