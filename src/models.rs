// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Data Models
//!
//! User records exchanged with the rest of the user service, the reply
//! envelope used by the message broker, and the JSON views returned by the
//! HTTP API.
//!
//! ## Model Categories
//!
//! - **User**: the record a login or registration flow hands to the token
//!   issuer, and the JSON object published to the broker
//! - **Ack**: reply envelope `{success, message, payload}`
//! - **Views**: response bodies for the user endpoints

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::{Authority, ClaimSet, Principal};

// =============================================================================
// User Record
// =============================================================================

/// A verified user record.
///
/// Credential checks happen before a record reaches this crate; `password`
/// holds whatever the user store keeps (typically a hash) and is only
/// carried so the record can be echoed to the broker unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub authorities: Vec<Authority>,
}

/// Input validation failures for user payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0}")]
    InvalidInput(&'static str),
    #[error("Failed to encode message: {0}")]
    Encode(String),
    #[error("Failed to decode reply: {0}")]
    Decode(String),
}

impl User {
    /// Claims to sign for this user; roles keep the record's order.
    pub fn claims(&self) -> ClaimSet {
        ClaimSet::new(
            self.username.clone(),
            self.enabled,
            self.authorities.iter().map(|a| a.as_str().to_string()).collect(),
        )
    }

    /// Username, password, email, name and surname must all be non-blank.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            &self.username,
            &self.password,
            &self.email,
            &self.name,
            &self.surname,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Err(ValidationError::InvalidInput("User is not valid"));
        }
        Ok(())
    }

    /// Validate and encode the record as a broker message.
    pub fn to_message(&self) -> Result<String, ValidationError> {
        self.validate()?;
        serde_json::to_string(self).map_err(|e| ValidationError::Encode(e.to_string()))
    }
}

// =============================================================================
// Ack Envelope
// =============================================================================

/// Reply envelope returned by message consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Ack<T> {
    pub success: bool,
    pub message: String,
    pub payload: Option<T>,
}

impl<T> Ack<T> {
    pub fn ok(payload: T) -> Self {
        Self {
            success: true,
            message: "Ok".to_string(),
            payload: Some(payload),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: None,
        }
    }
}

impl<T: DeserializeOwned> Ack<T> {
    /// Parse a raw reply from the broker.
    pub fn from_reply(reply: &str) -> Result<Self, ValidationError> {
        serde_json::from_str(reply).map_err(|e| ValidationError::Decode(e.to_string()))
    }
}

// =============================================================================
// API Views
// =============================================================================

/// The current principal as returned by `GET /api/user/me`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct PrincipalView {
    /// Login name
    pub username: String,
    /// Whether the account is enabled
    pub enabled: bool,
    /// Granted authorities, sorted
    pub authorities: Vec<Authority>,
}

impl From<Principal> for PrincipalView {
    fn from(principal: Principal) -> Self {
        Self {
            authorities: principal.sorted_authorities(),
            username: principal.username,
            enabled: principal.enabled,
        }
    }
}

/// Plain message body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Some(54),
            username: "username".to_string(),
            password: "$2a$10$hash".to_string(),
            email: "email".to_string(),
            name: "Name".to_string(),
            surname: "Surname".to_string(),
            enabled: true,
            authorities: vec!["SYSTEM_ADMINISTRATOR".into(), "SUPERADMIN".into()],
        }
    }

    #[test]
    fn complete_user_is_valid() {
        assert!(sample_user().validate().is_ok());
    }

    #[test]
    fn each_required_field_is_checked() {
        let blankers: [fn(&mut User); 5] = [
            |u| u.username.clear(),
            |u| u.password.clear(),
            |u| u.email = "  ".to_string(),
            |u| u.name.clear(),
            |u| u.surname.clear(),
        ];
        for blank in blankers {
            let mut user = sample_user();
            blank(&mut user);
            assert_eq!(
                user.validate(),
                Err(ValidationError::InvalidInput("User is not valid"))
            );
            assert!(user.to_message().is_err());
        }
    }

    #[test]
    fn missing_json_fields_fail_validation() {
        let user: User = serde_json::from_str(r#"{"username":"u","enabled":true}"#).unwrap();
        assert!(user.validate().is_err());
    }

    #[test]
    fn message_uses_camel_case_and_keeps_roles() {
        let message = sample_user().to_message().unwrap();
        let json: serde_json::Value = serde_json::from_str(&message).unwrap();
        assert_eq!(json["username"], "username");
        assert_eq!(json["authorities"][0], "SYSTEM_ADMINISTRATOR");
        assert_eq!(json["id"], 54);
    }

    #[test]
    fn ack_reply_is_parsed() {
        let reply = serde_json::to_string(&Ack::ok(sample_user())).unwrap();
        let ack = Ack::<User>::from_reply(&reply).unwrap();
        assert!(ack.success);
        assert_eq!(ack.message, "Ok");
        assert_eq!(ack.payload.unwrap().email, "email");

        assert!(Ack::<User>::from_reply("not json").is_err());

        let failed: Ack<User> = Ack::from_reply(r#"{"success":false,"message":"nope","payload":null}"#).unwrap();
        assert_eq!(failed, Ack::failure("nope"));
    }

    #[test]
    fn claims_follow_the_record() {
        let claims = sample_user().claims();
        assert_eq!(claims.username, "username");
        assert!(claims.enabled);
        assert_eq!(claims.roles, vec!["SYSTEM_ADMINISTRATOR", "SUPERADMIN"]);
    }

    #[test]
    fn principal_view_sorts_authorities() {
        let principal = Principal::from_claims(sample_user().claims());
        let view = PrincipalView::from(principal);
        assert_eq!(
            view.authorities,
            vec![Authority::from("SUPERADMIN"), Authority::from("SYSTEM_ADMINISTRATOR")]
        );
    }
}
