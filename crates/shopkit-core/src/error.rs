//! The error type shared by every shopkit crate.
//!
//! Lower layers return [`AppError`] and propagate it with `?`. Only the API
//! crate turns an [`ErrorKind`] into an HTTP status.

use std::fmt;

use thiserror::Error;

/// Coarse category of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    NotFound,
    /// No usable session, or bad credentials.
    Authentication,
    /// Authenticated, but missing the required role or permission.
    Authorization,
    Validation,
    /// Duplicate email or slug, insufficient stock.
    Conflict,
    Internal,
    Database,
    Cache,
    Configuration,
    Session,
    Serialization,
    /// A dependency did not answer a readiness check.
    ServiceUnavailable,
}

impl ErrorKind {
    /// Upper snake case name, used in logs and `Display`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::Authentication => "AUTHENTICATION",
            Self::Authorization => "AUTHORIZATION",
            Self::Validation => "VALIDATION",
            Self::Conflict => "CONFLICT",
            Self::Internal => "INTERNAL",
            Self::Database => "DATABASE",
            Self::Cache => "CACHE",
            Self::Configuration => "CONFIGURATION",
            Self::Session => "SESSION",
            Self::Serialization => "SERIALIZATION",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    /// Whether the failure lies with the server rather than the request.
    ///
    /// Messages of server-side errors are never shown to clients.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal
                | Self::Database
                | Self::Cache
                | Self::Configuration
                | Self::Serialization
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    /// Safe to show to the caller unless `kind` is a server error.
    pub message: String,
    #[source]
    pub source: Option<BoxedSource>,
}

macro_rules! kind_constructors {
    ($($(#[$doc:meta])* $name:ident => $kind:ident;)+) => {
        $(
            $(#[$doc])*
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorKind::$kind, message)
            }
        )+
    };
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// An error that keeps `source` for logging.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    kind_constructors! {
        not_found => NotFound;
        /// Missing session or rejected credentials.
        authentication => Authentication;
        /// A gate said no.
        authorization => Authorization;
        validation => Validation;
        conflict => Conflict;
        internal => Internal;
        database => Database;
        cache => Cache;
        configuration => Configuration;
        session => Session;
        service_unavailable => ServiceUnavailable;
    }
}

impl Clone for AppError {
    /// The source is not cloneable and is dropped.
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorKind::Serialization, format!("JSON error: {err}"), err)
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Internal, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
