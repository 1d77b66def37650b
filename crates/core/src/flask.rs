// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Flask identity and registry records.
//!
//! A flask is a collector worker scraping the metric endpoints of its
//! assigned targets. The ledger knows a flask by its id and the address
//! its telemetry channel dials.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique identifier for a flask instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FlaskId(pub String);

impl FlaskId {
    /// Create a new FlaskId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this FlaskId.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FlaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FlaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FlaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for FlaskId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FlaskId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for FlaskId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A registered collector worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flask {
    pub id: FlaskId,
    /// Address the telemetry receive channel dials (host:port).
    pub address: String,
}

impl Flask {
    pub fn new(id: impl Into<FlaskId>, address: impl Into<String>) -> Self {
        Self { id: id.into(), address: address.into() }
    }
}

/// An out-of-band error reported against a flask.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlaskFault {
    /// Flask the error originated from.
    pub flask: FlaskId,
    pub cause: String,
    /// Epoch milliseconds when the fault was observed.
    pub at_ms: u64,
}

impl FlaskFault {
    pub fn new(flask: impl Into<FlaskId>, cause: impl Into<String>, at_ms: u64) -> Self {
        Self { flask: flask.into(), cause: cause.into(), at_ms }
    }
}

#[cfg(test)]
#[path = "flask_tests.rs"]
mod tests;
