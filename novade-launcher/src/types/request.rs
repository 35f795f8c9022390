//! Launch requests and their outcomes.

use crate::error::LaunchError;
use std::fmt;

/// A request to start an executable, or to activate it if it already runs.
///
/// The executable is kept as the caller sent it; validation happens in the
/// broker so that an unusable request still yields an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub executable: String,
    pub arguments: Vec<String>,
}

impl LaunchRequest {
    pub fn new(executable: impl Into<String>, arguments: Vec<String>) -> Self {
        Self {
            executable: executable.into(),
            arguments,
        }
    }

    /// Builds a request from the positional wire payload
    /// `[executable, arg1, arg2, ...]` used by external callers.
    ///
    /// # Errors
    ///
    /// Returns [`LaunchError::InvalidRequest`] for an empty payload.
    ///
    /// # Examples
    ///
    /// ```
    /// # use novade_launcher::types::LaunchRequest;
    /// let request = LaunchRequest::from_wire(vec![
    ///     "/usr/bin/foo".to_string(),
    ///     "--flag".to_string(),
    /// ]).unwrap();
    /// assert_eq!(request.executable, "/usr/bin/foo");
    /// assert_eq!(request.arguments, vec!["--flag".to_string()]);
    ///
    /// assert!(LaunchRequest::from_wire(Vec::new()).is_err());
    /// ```
    pub fn from_wire(payload: Vec<String>) -> Result<Self, LaunchError> {
        let mut parts = payload.into_iter();
        let executable = parts.next().ok_or_else(|| {
            LaunchError::InvalidRequest("launch payload is empty".to_string())
        })?;
        Ok(Self {
            executable,
            arguments: parts.collect(),
        })
    }
}

/// Result of handling one [`LaunchRequest`].
#[derive(Debug)]
pub enum LaunchOutcome {
    /// A new process was started.
    Launched(u32),
    /// An already-running process was brought to the foreground.
    Activated(u32),
    Failed(LaunchError),
}

impl LaunchOutcome {
    /// Pid of the launched or activated process.
    pub fn pid(&self) -> Option<u32> {
        match self {
            LaunchOutcome::Launched(pid) | LaunchOutcome::Activated(pid) => Some(*pid),
            LaunchOutcome::Failed(_) => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LaunchOutcome::Failed(_))
    }

    pub fn error(&self) -> Option<&LaunchError> {
        match self {
            LaunchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for LaunchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchOutcome::Launched(pid) => write!(f, "launched (pid {})", pid),
            LaunchOutcome::Activated(pid) => write!(f, "activated (pid {})", pid),
            LaunchOutcome::Failed(err) => write!(f, "failed: {}", err),
        }
    }
}
