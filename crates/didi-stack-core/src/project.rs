//! Project name validation.
//!
//! The name becomes both a directory under the current working directory and
//! a single argument to the generator, so it must be one plain path segment.

use std::fmt;

use crate::error::{Result, ScaffoldError};

/// Name suggested by the interactive prompt.
pub const DEFAULT_PROJECT_NAME: &str = "my-didi-app";

/// A validated project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectName(String);

impl ProjectName {
    /// Validate a raw name, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self> {
        let name = raw.trim();
        let reject = |reason: &str| ScaffoldError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if name.is_empty() {
            return Err(reject("name must not be empty"));
        }
        if name == "." || name == ".." {
            return Err(reject("name must not be a relative path marker"));
        }
        if name.contains(['/', '\\']) {
            return Err(reject("name must not contain path separators"));
        }
        if name.chars().any(char::is_control) {
            return Err(reject("name must not contain control characters"));
        }
        if name.starts_with('-') {
            return Err(reject("name must not start with '-'"));
        }

        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
