//! Error types for tccloud

use std::time::Duration;

use thiserror::Error;

/// Result type alias using tccloud Error
pub type Result<T> = std::result::Result<T, Error>;

/// Vendor error codes that indicate a retryable condition.
///
/// A code also matches when it is a sub-code of one of these, e.g.
/// `InternalError.DbError` is retryable because `InternalError` is.
pub const RETRYABLE_CODES: &[&str] = &[
    // client side
    "ClientError.NetworkError",
    "ClientError.HttpStatusCodeError",
    // common
    "FailedOperation",
    "InternalError",
    "TradeUnknownError",
    "RequestLimitExceeded",
    "ResourceInUse",
    "ResourceInsufficient",
    "ResourceUnavailable",
    "ResourceBusy",
];

/// Whether an error is worth retrying under a retry budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Transient,
    Permanent,
}

/// tccloud error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("[{code}] {message} (request id: {request_id})")]
    Api {
        code: String,
        message: String,
        request_id: String,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("remote state not yet stable: {0}")]
    Unstable(String),

    #[error("resource not found: {kind} with id {id}")]
    NotFound { kind: String, id: String },

    #[error("id is broken, {id}: expected {expected} parts, found {found}")]
    IdentityCorrupt {
        id: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid identity component: {0}")]
    InvalidIdentity(String),

    #[error("deadline exceeded after {attempts} attempts in {elapsed:?}: {last}")]
    DeadlineExceeded {
        attempts: u32,
        elapsed: Duration,
        last: Box<Error>,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("`{attribute}` do not support change now")]
    ImmutableAttribute { attribute: String },

    #[error("unsupported {kind} type: {name}")]
    UnsupportedType { kind: String, name: String },

    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<Error>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Build a vendor API error.
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Api {
            code: code.into(),
            message: message.into(),
            request_id: String::new(),
        }
    }

    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Error::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Prefix the error with the operation that produced it.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The vendor-style error code, when there is one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Error::Api { code, .. } => Some(code),
            Error::Transport(_) => Some("ClientError.NetworkError"),
            Error::HttpStatus { .. } => Some("ClientError.HttpStatusCodeError"),
            Error::Context { source, .. } => source.code(),
            _ => None,
        }
    }

    pub fn class(&self) -> ErrorClass {
        self.class_with(&[])
    }

    /// Classify the error, treating `extra` codes as retryable in addition
    /// to [`RETRYABLE_CODES`].
    pub fn class_with(&self, extra: &[&str]) -> ErrorClass {
        match self {
            Error::Unstable(_) => ErrorClass::Transient,
            Error::Context { source, .. } => source.class_with(extra),
            _ => match self.code() {
                Some(code)
                    if code_matches(code, RETRYABLE_CODES) || code_matches(code, extra) =>
                {
                    ErrorClass::Transient
                }
                _ => ErrorClass::Permanent,
            },
        }
    }

    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::Transient
    }

    /// True when the remote object no longer exists, looking through context.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Context { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    /// The innermost error, skipping context wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Context { source, .. } => source.root(),
            other => other,
        }
    }
}

fn code_matches(code: &str, table: &[&str]) -> bool {
    table.iter().any(|candidate| {
        code == *candidate
            || code
                .strip_prefix(candidate)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}
