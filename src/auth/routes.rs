// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Routes exempt from authentication.

use std::collections::HashSet;

/// Paths that skip authentication by default.
pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["/"];

/// Immutable set of public paths.
///
/// Matching is exact on the request path: `/` does not make `/api`
/// public, and `/health` does not cover `/health/live`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicRouteSet {
    paths: HashSet<String>,
}

impl PublicRouteSet {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma-separated list, ignoring blank entries.
    pub fn parse(list: &str) -> Self {
        Self::new(
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        )
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Default for PublicRouteSet {
    fn default() -> Self {
        Self::new(DEFAULT_PUBLIC_ROUTES.iter().copied())
    }
}
