//! Error taxonomy shared by the catalog and library clients

use std::fmt;
use thiserror::Error;

/// Failure of a single catalog or library call.
///
/// Clients surface every variant to their caller unchanged; only the sync
/// workflow decides which ones are recoverable.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response
    #[error("{kind}: {source}")]
    Network {
        kind: NetworkKind,
        #[source]
        source: reqwest::Error,
    },

    /// Non-2xx response without a more specific meaning
    #[error("server returned status {status}")]
    Server { status: u16 },

    /// 409 from the library backend: the record already exists
    #[error("book is already in the library")]
    Conflict,

    /// 404 on a library resource
    #[error("book not found")]
    NotFound,

    /// 2xx response with no usable body
    #[error("server returned an empty response")]
    EmptyResponse,

    #[error("failed to parse response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The HTTP client itself could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Map a non-success status from the library backend to its error variant.
    pub fn from_library_status(status: u16) -> Self {
        match status {
            404 => ApiError::NotFound,
            409 => ApiError::Conflict,
            _ => ApiError::Server { status },
        }
    }

    /// Wrap a transport failure, classifying it for display.
    pub fn network(source: reqwest::Error) -> Self {
        let kind = if source.is_timeout() {
            NetworkKind::Timeout
        } else {
            NetworkKind::classify(&error_chain_text(&source))
        };
        ApiError::Network { kind, source }
    }

    /// Stable machine-readable code for this failure
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Network { kind, .. } => kind.code(),
            ApiError::Server { status: 500 } => "internal_server_error",
            ApiError::Server { .. } => "server_error",
            ApiError::Conflict => "conflict",
            ApiError::NotFound => "not_found",
            ApiError::EmptyResponse => "empty_response",
            ApiError::Decode(_) => "invalid_response",
            ApiError::Client(_) => "client_error",
        }
    }
}

/// Best-effort classification of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkKind {
    Timeout,
    UnresolvedHost,
    ConnectionRefused,
    Other,
}

impl NetworkKind {
    /// Classify from the failure description. Unrecognized text is `Other`.
    pub fn classify(message: &str) -> Self {
        let message = message.to_lowercase();
        if message.contains("timeout") || message.contains("timed out") {
            NetworkKind::Timeout
        } else if message.contains("unable to resolve host")
            || message.contains("dns error")
            || message.contains("failed to lookup address")
            || message.contains("name or service not known")
        {
            NetworkKind::UnresolvedHost
        } else if message.contains("connection refused") {
            NetworkKind::ConnectionRefused
        } else {
            NetworkKind::Other
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            NetworkKind::Timeout => "timeout",
            NetworkKind::UnresolvedHost => "unresolved_host",
            NetworkKind::ConnectionRefused => "connection_refused",
            NetworkKind::Other => "connection_error",
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NetworkKind::Timeout => "request timed out",
            NetworkKind::UnresolvedHost => "no internet connection",
            NetworkKind::ConnectionRefused => "server unavailable",
            NetworkKind::Other => "connection error",
        };
        f.write_str(label)
    }
}

/// Join an error and all of its sources into one string.
///
/// reqwest keeps the useful detail ("Connection refused", "dns error") in the
/// source chain rather than in the top-level message.
fn error_chain_text(err: &(dyn std::error::Error + 'static)) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(source) = current {
        text.push_str(": ");
        text.push_str(&source.to_string());
        current = source.source();
    }
    text
}
