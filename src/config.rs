// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`ServerConfig`] loaded from them once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `JWT_SYMMETRIC_KEY` | Shared HMAC secret for signing and verification | Required |
//! | `JWT_VALIDITY_SECS` | Token validity window in seconds | `120` |
//! | `PUBLIC_ROUTES` | Comma-separated paths that skip authentication | `/` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `TLS_CERT_PATH` | PEM certificate chain (enables HTTPS with `TLS_KEY_PATH`) | Unset |
//! | `TLS_KEY_PATH` | PEM private key | Unset |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::auth::{PublicRouteSet, SecretKey, DEFAULT_VALIDITY};

/// Environment variable name for the shared token secret.
///
/// The raw UTF-8 bytes of the value are used as the HMAC key.
pub const JWT_SYMMETRIC_KEY_ENV: &str = "JWT_SYMMETRIC_KEY";

/// Environment variable name for the token validity window.
pub const JWT_VALIDITY_SECS_ENV: &str = "JWT_VALIDITY_SECS";

/// Environment variable name for the public route allowlist.
///
/// Paths are matched exactly against the request path.
pub const PUBLIC_ROUTES_ENV: &str = "PUBLIC_ROUTES";

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

/// Configuration errors detected at startup.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("{name} has an invalid value {value:?}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// PEM files for HTTPS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Everything the server reads from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub secret_key: SecretKey,
    pub token_validity: Duration,
    pub public_routes: PublicRouteSet,
    pub bind_addr: SocketAddr,
    pub tls: Option<TlsPaths>,
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup(JWT_SYMMETRIC_KEY_ENV).ok_or(ConfigError::Missing(JWT_SYMMETRIC_KEY_ENV))?;
        let secret_key = SecretKey::new(&secret).ok_or(ConfigError::Empty(JWT_SYMMETRIC_KEY_ENV))?;

        let token_validity = match lookup(JWT_VALIDITY_SECS_ENV) {
            Some(raw) => parse_validity(&raw)?,
            None => DEFAULT_VALIDITY,
        };

        let public_routes = lookup(PUBLIC_ROUTES_ENV)
            .map(|raw| PublicRouteSet::parse(&raw))
            .unwrap_or_default();

        let host = lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let host: IpAddr = host.parse().map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
            name: HOST_ENV,
            value: host.clone(),
            reason: e.to_string(),
        })?;

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        let tls = match (lookup(TLS_CERT_PATH_ENV), lookup(TLS_KEY_PATH_ENV)) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") | None => LogFormat::Pretty,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                    reason: "expected `json` or `pretty`".to_string(),
                })
            }
        };

        Ok(Self {
            secret_key,
            token_validity,
            public_routes,
            bind_addr: SocketAddr::new(host, port),
            tls,
            log_format,
        })
    }
}

fn parse_validity(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::Invalid {
        name: JWT_VALIDITY_SECS_ENV,
        value: raw.to_string(),
        reason,
    };
    let secs: u64 = raw.trim().parse().map_err(|e: std::num::ParseIntError| invalid(e.to_string()))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero".to_string()));
    }
    Ok(Duration::from_secs(secs))
}
