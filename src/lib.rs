// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User Service Auth - Stateless Bearer-Token Authentication
//!
//! This crate issues short-lived HS256 tokens for verified user records and
//! guards every non-public route of the user service with a fail-closed
//! authentication filter.
//!
//! ## Modules
//!
//! - `api` - HTTP router and user endpoints (Axum)
//! - `auth` - Token codec, authentication filter and principal extractors
//! - `config` - Environment configuration
//! - `models` - User record, broker reply envelope and API views
//! - `telemetry` - Tracing subscriber setup

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod state;
pub mod telemetry;
