//! Error types for daemon RPC calls.

use thiserror::Error;

/// Errors produced while building a client or talking to the daemon.
///
/// # Error Categories
///
/// - **Construction**: [`InvalidUrl`](RpcError::InvalidUrl),
///   [`InvalidDuration`](RpcError::InvalidDuration),
///   [`HttpClient`](RpcError::HttpClient)
/// - **Transport**: [`Transport`](RpcError::Transport),
///   [`HttpStatus`](RpcError::HttpStatus)
/// - **Decode**: [`Decode`](RpcError::Decode)
/// - **Application**: [`Application`](RpcError::Application)
/// - **Local**: [`Encode`](RpcError::Encode), [`Reply`](RpcError::Reply)
#[derive(Debug, Error)]
pub enum RpcError {
    /// The endpoint URL could not be formed from host and port.
    #[error("invalid upstream url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A timeout or interval string is not a valid duration.
    #[error("invalid duration '{value}': {source}")]
    InvalidDuration {
        value: String,
        #[source]
        source: humantime::DurationError,
    },

    /// The underlying HTTP client could not be built.
    #[error("failed to build http client: {0}")]
    HttpClient(#[source] reqwest::Error),

    /// The request params could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Connection refused, timeout, DNS failure or a broken response body.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The daemon answered with a status outside 200..400.
    #[error("{0}")]
    HttpStatus(reqwest::StatusCode),

    /// The body is not a JSON-RPC envelope.
    #[error("malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The envelope carried a non-null `error` object.
    #[error("{message}")]
    Application { message: String },

    /// The `result` does not match the expected reply type.
    #[error("unexpected reply: {0}")]
    Reply(#[source] serde_json::Error),
}

impl RpcError {
    /// Whether this error counts as a health failure for the upstream.
    pub fn marks_sick(&self, status_errors_mark_sick: bool) -> bool {
        match self {
            RpcError::Transport(_) | RpcError::Decode(_) | RpcError::Application { .. } => true,
            RpcError::HttpStatus(_) => status_errors_mark_sick,
            RpcError::InvalidUrl { .. }
            | RpcError::InvalidDuration { .. }
            | RpcError::HttpClient(_)
            | RpcError::Encode(_)
            | RpcError::Reply(_) => false,
        }
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RpcError::InvalidUrl { .. } | RpcError::InvalidDuration { .. } | RpcError::HttpClient(_) => {
                "construction"
            }
            RpcError::Encode(_) => "encode",
            RpcError::Transport(_) => "transport",
            RpcError::HttpStatus(_) => "http_status",
            RpcError::Decode(_) => "decode",
            RpcError::Application { .. } => "application",
            RpcError::Reply(_) => "reply",
        }
    }
}

/// Result type for daemon RPC operations.
pub type RpcResult<T> = Result<T, RpcError>;
