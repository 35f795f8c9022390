//! Executable identity type.

use crate::error::LaunchError;
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fmt;
use std::path::Path;

/// Identifies an executable the broker tracks, e.g. `/usr/bin/foot` or `firefox`.
///
/// The identity is the primary key of the running registry. It is the request's
/// executable string with surrounding whitespace removed; it is never empty and
/// never contains a NUL byte (which no OS path can carry).
///
/// # Examples
///
/// ```
/// # use novade_launcher::types::ExecutableIdentity;
/// let identity = ExecutableIdentity::parse("  /usr/bin/foot ").unwrap();
/// assert_eq!(identity.as_str(), "/usr/bin/foot");
/// assert_eq!(identity.file_name(), Some("foot"));
///
/// assert!(ExecutableIdentity::parse("").is_err());
/// assert!(ExecutableIdentity::parse("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ExecutableIdentity(String);

impl ExecutableIdentity {
    /// Validates a raw executable string.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::InvalidRequest`] when the value is empty, blank, or
    /// contains a NUL byte.
    pub fn parse(raw: &str) -> Result<Self, LaunchError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LaunchError::InvalidRequest(
                "executable identity cannot be empty".to_string(),
            ));
        }
        if trimmed.contains('\0') {
            return Err(LaunchError::InvalidRequest(format!(
                "executable identity {:?} contains a NUL byte",
                trimmed
            )));
        }
        Ok(ExecutableIdentity(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Last path component, e.g. `foot` for `/usr/bin/foot`.
    pub fn file_name(&self) -> Option<&str> {
        self.as_path().file_name().and_then(OsStr::to_str)
    }
}

impl fmt::Display for ExecutableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ExecutableIdentity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ExecutableIdentity {
    type Error = LaunchError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ExecutableIdentity> for String {
    fn from(identity: ExecutableIdentity) -> Self {
        identity.0
    }
}
