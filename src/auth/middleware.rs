// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication filter for Axum.
//!
//! Every request passes through [`authenticate`] and ends in exactly one of
//! two outcomes:
//!
//! - **Authenticated**: a [`Principal`] is inserted into the request
//!   extensions and the request is forwarded
//! - **Rejected**: a 401 response is returned and the inner service is
//!   never called
//!
//! Requests to a public route are forwarded without inspecting any header.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let auth_config = AuthConfig::new(codec, PublicRouteSet::default());
//!
//! let app = Router::new()
//!     .route("/api/user/hello", get(hello))
//!     .layer(axum::middleware::from_fn_with_state(
//!         auth_config.clone(),
//!         authenticate,
//!     ));
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::codec::TokenCodec;
use super::routes::PublicRouteSet;
use super::{AuthError, Principal};

/// Literal prefix of a bearer credential (case-sensitive, one space).
const BEARER_PREFIX: &str = "Bearer ";

/// Authentication configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// Token signer/verifier
    pub codec: Arc<TokenCodec>,
    /// Routes that skip authentication
    pub public_routes: Arc<PublicRouteSet>,
}

impl AuthConfig {
    pub fn new(codec: TokenCodec, public_routes: PublicRouteSet) -> Self {
        Self {
            codec: Arc::new(codec),
            public_routes: Arc::new(public_routes),
        }
    }
}

/// Authentication middleware function.
pub async fn authenticate(
    State(config): State<AuthConfig>,
    mut request: Request,
    next: Next,
) -> Response {
    if config.public_routes.is_public(request.uri().path()) {
        return next.run(request).await;
    }

    // Only this filter may establish an identity.
    request.extensions_mut().remove::<Principal>();

    let outcome = resolve_principal(request.headers(), &config.codec);
    match outcome {
        Ok(principal) => {
            tracing::debug!(
                username = %principal.username,
                path = %request.uri().path(),
                "Request authenticated"
            );
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!(
                error_code = e.error_code(),
                error = %e,
                method = %request.method(),
                path = %request.uri().path(),
                "Rejected unauthenticated request"
            );
            e.into_response()
        }
    }
}

/// Extract, verify and map the caller's token to a [`Principal`].
fn resolve_principal(headers: &HeaderMap, codec: &TokenCodec) -> Result<Principal, AuthError> {
    let token = extract_bearer(headers)?;
    let claims = codec.verify_and_extract(token)?;
    Ok(Principal::from_claims(claims))
}

/// Pull the token out of `Authorization: Bearer <token>`.
///
/// A missing header, a non-ASCII value, a different scheme and an empty
/// token are all the same failure.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingOrMalformedHeader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{ClaimSet, SecretKey};
    use axum::{
        body::{to_bytes, Body},
        http::{HeaderValue, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn config() -> AuthConfig {
        let key = SecretKey::new("middleware-secret").unwrap();
        AuthConfig::new(TokenCodec::with_default_validity(&key), PublicRouteSet::default())
    }

    async fn whoami(request: Request) -> String {
        match request.extensions().get::<Principal>() {
            Some(p) => format!("user:{}", p.username),
            None => "anonymous".to_string(),
        }
    }

    fn app(config: AuthConfig) -> Router {
        Router::new()
            .route("/", get(whoami))
            .route("/private", get(whoami))
            .layer(from_fn_with_state(config, authenticate))
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn call(app: Router, request: Request) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[test]
    fn extract_bearer_accepts_well_formed_header() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract_bearer(&headers), Ok("abc.def.ghi"));
    }

    #[test]
    fn extract_bearer_rejects_everything_else_identically() {
        for value in ["NotBearer xyz", "bearer abc", "Bearer", "Bearer ", "Basic dXNlcjpwYXNz", "Bearerabc"] {
            assert_eq!(
                extract_bearer(&headers_with(value)),
                Err(AuthError::MissingOrMalformedHeader),
                "{value:?} should not yield a token"
            );
        }
        assert_eq!(
            extract_bearer(&HeaderMap::new()),
            Err(AuthError::MissingOrMalformedHeader)
        );
    }

    #[test]
    fn extract_bearer_rejects_opaque_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_bytes(b"Bearer \xfftoken").unwrap());
        assert_eq!(extract_bearer(&headers), Err(AuthError::MissingOrMalformedHeader));
    }

    #[tokio::test]
    async fn public_route_ignores_invalid_header() {
        let request = axum::http::Request::builder()
            .uri("/")
            .header(AUTHORIZATION, "Bearer garbage")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(config()), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "anonymous");
    }

    #[tokio::test]
    async fn valid_token_attaches_principal() {
        let config = config();
        let token = config
            .codec
            .sign(ClaimSet::new("alice", true, vec!["ADMIN".to_string()]))
            .unwrap();
        let request = axum::http::Request::builder()
            .uri("/private")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(config), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user:alice");
    }

    #[tokio::test]
    async fn rejection_never_reaches_handler() {
        let request = axum::http::Request::builder()
            .uri("/private")
            .header(AUTHORIZATION, "NotBearer xyz")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(config()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid or expired token"));
        assert!(!body.contains("anonymous"));
    }

    #[tokio::test]
    async fn smuggled_principal_is_discarded() {
        let mut request = axum::http::Request::builder()
            .uri("/private")
            .body(Body::empty())
            .unwrap();
        request.extensions_mut().insert(Principal::from_claims(ClaimSet::new(
            "intruder",
            true,
            vec!["ADMIN".to_string()],
        )));

        let (status, body) = call(app(config()), request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(!body.contains("intruder"));
    }

    #[tokio::test]
    async fn disabled_principal_is_still_authenticated() {
        let config = config();
        let token = config.codec.sign(ClaimSet::new("carol", false, vec![])).unwrap();
        let request = axum::http::Request::builder()
            .uri("/private")
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app(config), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "user:carol");
    }
}
