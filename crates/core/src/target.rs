// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Target identity and discovery record.
//!
//! A target is a monitored process, addressed by URI. Platform discovery
//! attaches the metric keys its endpoint exposes and a bag of labels.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Unique identifier for a target: the URI of its metric endpoint.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TargetUri(pub String);

impl TargetUri {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TargetUri {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for TargetUri {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for TargetUri {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TargetUri {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for TargetUri {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A monitored process as discovery reported it.
///
/// Ordered by URI so targets can live in the distribution's per-flask sets.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Target {
    pub uri: TargetUri,
    /// Opaque metric keys discovered on the endpoint.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub keys: BTreeSet<String>,
    /// Discovery metadata (platform labels).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

impl Target {
    pub fn new(uri: impl Into<TargetUri>) -> Self {
        Self { uri: uri.into(), keys: BTreeSet::new(), labels: BTreeMap::new() }
    }
}

crate::builder! {
    pub struct TargetBuilder => Target {
        into { uri: TargetUri = "app://test/metrics" }
        set {
            keys: BTreeSet<String> = BTreeSet::new(),
            labels: BTreeMap<String, String> = BTreeMap::new(),
        }
    }
}

#[cfg(test)]
#[path = "target_tests.rs"]
mod tests;
