// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use crate::auth::{AuthConfig, PublicRouteSet, SecretKey, TokenCodec};
use crate::config::ServerConfig;

/// Shared, read-only application state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(auth_config: AuthConfig) -> Self {
        Self { auth_config }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        let codec = TokenCodec::new(&config.secret_key, config.token_validity);
        Self::new(AuthConfig::new(codec, config.public_routes.clone()))
    }

    /// State with the default validity window and public routes.
    pub fn with_secret(secret_key: &SecretKey) -> Self {
        let codec = TokenCodec::with_default_validity(secret_key);
        Self::new(AuthConfig::new(codec, PublicRouteSet::default()))
    }
}
