// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workspace identity.
//!
//! A workspace name is stable across stop/start cycles and is used verbatim
//! as both the pod name and the storage claim name, so it must be a valid
//! Kubernetes DNS-1123 label.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use thiserror::Error;

/// Maximum length of a DNS-1123 label.
pub const MAX_NAME_LEN: usize = 63;

/// Errors from validating a workspace name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("workspace name is empty")]
    Empty,
    #[error("workspace name is {0} characters, max is {MAX_NAME_LEN}")]
    TooLong(usize),
    #[error("workspace name contains invalid character {0:?}")]
    InvalidChar(char),
    #[error("workspace name must start and end with a lowercase letter or digit")]
    InvalidBoundary,
}

/// Globally unique workspace identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceName(SmolStr);

impl WorkspaceName {
    /// Validate and wrap a user-supplied name.
    pub fn parse(name: &str) -> Result<Self, NameError> {
        if name.is_empty() {
            return Err(NameError::Empty);
        }
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong(name.len()));
        }
        if let Some(c) = name.chars().find(|c| !is_label_char(*c)) {
            return Err(NameError::InvalidChar(c));
        }
        let alnum = |c: Option<char>| c.is_some_and(|c| c != '-');
        if !alnum(name.chars().next()) || !alnum(name.chars().last()) {
            return Err(NameError::InvalidBoundary);
        }
        Ok(Self(SmolStr::new(name)))
    }

    /// Wrap a name that came back from the cluster (already valid there).
    pub fn from_string(name: impl Into<SmolStr>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

impl std::str::FromStr for WorkspaceName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for WorkspaceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for WorkspaceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::borrow::Borrow<str> for WorkspaceName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::ops::Deref for WorkspaceName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for WorkspaceName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for WorkspaceName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

#[cfg(test)]
#[path = "name_tests.rs"]
mod tests;
