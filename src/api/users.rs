// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.
//!
//! All routes sit behind the authentication filter; reaching a handler
//! means a principal is present. Authorization beyond that is checked per
//! handler.

use axum::Json;

use crate::auth::{Auth, AuthError, SYSTEM_ADMINISTRATOR};
use crate::models::{MessageResponse, PrincipalView};

/// Greet the authenticated user.
#[utoipa::path(
    get,
    path = "/api/user/hello",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Unauthorized - invalid or expired token"),
    )
)]
pub async fn hello(Auth(principal): Auth) -> Json<MessageResponse> {
    Json(MessageResponse {
        message: format!("Hello {}", principal.username),
    })
}

/// Get the current principal.
///
/// Returns the identity and authorities established for this request.
#[utoipa::path(
    get,
    path = "/api/user/me",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Principal information", body = PrincipalView),
        (status = 401, description = "Unauthorized - invalid or expired token"),
    )
)]
pub async fn get_current_user(Auth(principal): Auth) -> Json<PrincipalView> {
    Json(principal.into())
}

/// Greet a system administrator.
#[utoipa::path(
    get,
    path = "/api/user/admin",
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Greeting", body = MessageResponse),
        (status = 401, description = "Unauthorized - invalid or expired token"),
        (status = 403, description = "Not authorized (system administrator required)"),
    )
)]
pub async fn admin(Auth(principal): Auth) -> Result<Json<MessageResponse>, AuthError> {
    principal.ensure_authority(SYSTEM_ADMINISTRATOR)?;

    Ok(Json(MessageResponse {
        message: format!("Hello administrator {}", principal.username),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Authority, ClaimSet, Principal};

    fn principal() -> Principal {
        Principal::from_claims(ClaimSet::new(
            "user",
            true,
            vec!["ROLE_USER".to_string(), "ROLE_ADMIN".to_string()],
        ))
    }

    #[tokio::test]
    async fn hello_greets_principal() {
        let Json(response) = hello(Auth(principal())).await;
        assert_eq!(response.message, "Hello user");
    }

    #[tokio::test]
    async fn current_user_lists_sorted_authorities() {
        let Json(view) = get_current_user(Auth(principal())).await;
        assert_eq!(view.username, "user");
        assert!(view.enabled);
        assert_eq!(
            view.authorities,
            vec![Authority::from("ROLE_ADMIN"), Authority::from("ROLE_USER")]
        );
    }

    #[tokio::test]
    async fn admin_requires_system_administrator() {
        let result = admin(Auth(principal())).await;
        assert!(matches!(result, Err(AuthError::InsufficientAuthority)));

        let administrator = Principal::from_claims(ClaimSet::new(
            "root",
            true,
            vec![SYSTEM_ADMINISTRATOR.to_string()],
        ));
        let Json(response) = admin(Auth(administrator)).await.unwrap();
        assert_eq!(response.message, "Hello administrator root");
    }
}
