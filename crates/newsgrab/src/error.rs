// ABOUTME: Error types for newsgrab including the ErrorCode enum and ExtractError struct.
// ABOUTME: Provides categorized errors with convenience constructors and boolean helpers.

use std::fmt;

/// Error codes representing the failure categories of an extraction run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    InvalidUrl,
    Session,
    Navigation,
    Timeout,
    Inspect,
    Decode,
    Io,
    Subprocess,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::InvalidUrl => "invalid URL",
            ErrorCode::Session => "browser session error",
            ErrorCode::Navigation => "navigation error",
            ErrorCode::Timeout => "timeout",
            ErrorCode::Inspect => "element inspection error",
            ErrorCode::Decode => "decode error",
            ErrorCode::Io => "I/O error",
            ErrorCode::Subprocess => "subprocess error",
        };
        write!(f, "{}", s)
    }
}

/// The main error type for extraction operations.
///
/// `target` is whatever the operation acted on: a URL, a selector, a file path
/// or a binary name.
#[derive(Debug, thiserror::Error)]
pub struct ExtractError {
    pub code: ErrorCode,
    pub target: String,
    pub op: String,
    #[source]
    pub source: Option<anyhow::Error>,
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "newsgrab: {} {}: {}", self.op, self.target, self.code)?;
        if let Some(ref src) = self.source {
            write!(f, ": {}", src)?;
        }
        Ok(())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ExtractError>;

impl ExtractError {
    fn new(
        code: ErrorCode,
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self {
            code,
            target: target.into(),
            op: op.into(),
            source,
        }
    }

    /// Create an InvalidUrl error.
    pub fn invalid_url(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::InvalidUrl, target, op, source)
    }

    /// Create a Session error (browser could not be launched or attached).
    pub fn session(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Session, target, op, source)
    }

    /// Create a Navigation error.
    pub fn navigation(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Navigation, target, op, source)
    }

    /// Create a Timeout error.
    pub fn timeout(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Timeout, target, op, source)
    }

    /// Create an Inspect error.
    pub fn inspect(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Inspect, target, op, source)
    }

    /// Create a Decode error.
    pub fn decode(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Decode, target, op, source)
    }

    /// Create an Io error from a std I/O failure.
    pub fn io(target: impl Into<String>, op: impl Into<String>, err: std::io::Error) -> Self {
        Self::new(ErrorCode::Io, target, op, Some(anyhow::Error::new(err)))
    }

    /// Create a Subprocess error.
    pub fn subprocess(
        target: impl Into<String>,
        op: impl Into<String>,
        source: Option<anyhow::Error>,
    ) -> Self {
        Self::new(ErrorCode::Subprocess, target, op, source)
    }

    /// Returns true if this is a Session error.
    pub fn is_session(&self) -> bool {
        self.code == ErrorCode::Session
    }

    /// Returns true if this is a Navigation error.
    pub fn is_navigation(&self) -> bool {
        self.code == ErrorCode::Navigation
    }

    /// Returns true if this is a Timeout error.
    pub fn is_timeout(&self) -> bool {
        self.code == ErrorCode::Timeout
    }

    /// Returns true if this is an Inspect error.
    pub fn is_inspect(&self) -> bool {
        self.code == ErrorCode::Inspect
    }

    /// Returns true if this is an Io error.
    pub fn is_io(&self) -> bool {
        self.code == ErrorCode::Io
    }

    /// Returns true if this is an InvalidUrl error.
    pub fn is_invalid_url(&self) -> bool {
        self.code == ErrorCode::InvalidUrl
    }
}
