use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveErrorKind {
    InvalidParams,
    LookupFailed,
    InsertFailed,
    Internal,
}

/// Infrastructure failure raised by the brand resolver. Business-logic
/// non-matches are never errors; they surface as fallback/conflict results.
#[derive(Debug, Clone, Serialize)]
pub struct ResolveError {
    pub kind: ResolveErrorKind,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ResolveError {
    pub fn new(kind: ResolveErrorKind, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::InvalidParams, "INVALID_PARAMS", message)
    }

    /// Alias-table lookup failed; wraps the storage error message.
    pub fn lookup_failed(message: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::LookupFailed, "LOOKUP_FAILED", message)
    }

    /// Alias-row insert failed; wraps the storage error message.
    pub fn insert_failed(message: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::InsertFailed, "INSERT_FAILED", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ResolveErrorKind::Internal, "INTERNAL", message)
    }
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for ResolveError {}
