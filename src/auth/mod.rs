// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Stateless bearer-token authentication for the user service.
//!
//! ## Auth Flow
//!
//! 1. A login or registration flow hands a verified [`User`](crate::models::User)
//!    to [`TokenCodec::issue_for`], which returns an HS256 token valid for
//!    two minutes
//! 2. The client sends `Authorization: Bearer <token>`
//! 3. The [`authenticate`] filter:
//!    - Skips routes in the [`PublicRouteSet`]
//!    - Verifies signature, then expiry
//!    - Maps `username`, `enabled` and `roles` to a [`Principal`] stored in
//!      the request extensions
//! 4. Handlers read the principal with the [`Auth`] extractor
//!
//! ## Security
//!
//! - One shared secret, HS256 only; the token header never selects the
//!   algorithm
//! - Every failure yields the same 401 body; the cause is only logged
//! - The principal lives in the request, never in shared state

pub mod claims;
pub mod codec;
pub mod error;
pub mod extractor;
pub mod key;
pub mod middleware;
pub mod roles;
pub mod routes;

pub use claims::{ClaimSet, Principal};
pub use codec::{TokenCodec, DEFAULT_VALIDITY};
pub use error::AuthError;
pub use extractor::{Auth, OptionalAuth};
pub use key::SecretKey;
pub use middleware::{authenticate, AuthConfig};
pub use roles::{Authority, SYSTEM_ADMINISTRATOR};
pub use routes::PublicRouteSet;
