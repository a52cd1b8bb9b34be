// SPDX-License-Identifier: MIT

//! Dotted-numeric tool version comparison
//!
//! AutoPkg reports versions like `2.7.2`. Comparison is componentwise
//! with missing components treated as zero, so `1.0` == `1.0.0` and
//! `0.10` > `0.9.9`.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version string: {0:?}")]
pub struct VersionParseError(pub String);

/// A parsed dotted-numeric version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ToolVersion(Vec<u64>);

impl ToolVersion {
    /// Parse a version out of arbitrary tool output.
    ///
    /// Leading/trailing whitespace is trimmed and any trailing
    /// non-numeric suffix on a component (e.g. `2.7.2rc1`) is dropped.
    pub fn parse(s: &str) -> Result<Self, VersionParseError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(VersionParseError(s.to_string()));
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                // A component with no leading digits ends the version.
                break;
            }
            components.push(
                digits
                    .parse::<u64>()
                    .map_err(|_| VersionParseError(s.to_string()))?,
            );
            if digits.len() != part.len() {
                // Suffix like "rc1"; stop after this component.
                break;
            }
        }

        if components.is_empty() {
            return Err(VersionParseError(s.to_string()));
        }
        Ok(Self(components))
    }

    pub fn components(&self) -> &[u64] {
        &self.0
    }
}

impl Ord for ToolVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.0.len().max(other.0.len());
        for i in 0..len {
            let a = self.0.get(i).copied().unwrap_or(0);
            let b = other.0.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ToolVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for ToolVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ToolVersion {
    type Error = VersionParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ToolVersion> for String {
    fn from(v: ToolVersion) -> Self {
        v.to_string()
    }
}

impl fmt::Display for ToolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|c| c.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

#[cfg(test)]
#[path = "version_tests.rs"]
mod tests;
