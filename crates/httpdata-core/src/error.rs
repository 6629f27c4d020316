//! Error taxonomy of a single fetch.
//!
//! Every failure is terminal for the call. The variants are kept distinct so
//! the adapter layer can render a different diagnostic for each stage.

use thiserror::Error;

/// Failure of one `fetch_and_identify` call.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be built (bad URL, method or header).
    #[error("creating request: {0}")]
    RequestConstruction(#[from] RequestError),
    /// DNS, connect, TLS, timeout or cancellation while exchanging the request.
    #[error("performing request: {0}")]
    Transport(#[from] TransportError),
    /// The final response status differs from the expected one.
    #[error("HTTP status code does not match: expected {expected} actual {actual}")]
    StatusMismatch { expected: u16, actual: u16 },
    /// The response head arrived but draining the body failed.
    #[error("reading response body: {0}")]
    BodyRead(#[source] curl::Error),
}

/// Rejections raised while constructing the request, before any I/O.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("parse {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid method {0:?}")]
    InvalidMethod(String),
    #[error("invalid header field name {0:?}")]
    InvalidHeaderName(String),
    #[error("invalid header field value for {name:?}")]
    InvalidHeaderValue { name: String },
    /// libcurl refused an option while the handle was being configured.
    #[error("configuring transport: {0}")]
    Setup(#[source] curl::Error),
}

/// Failure during the network exchange.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("context canceled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("unsupported protocol scheme {0:?}")]
    UnsupportedScheme(String),
    #[error(transparent)]
    Curl(#[from] curl::Error),
}

/// Coarse classification of a transport failure, for diagnostics and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Cancelled,
    DeadlineExceeded,
    /// Transport-level timeout (e.g. connect timeout from client options).
    Timeout,
    Resolve,
    Connect,
    Tls,
    /// Connection dropped or reset mid-exchange.
    Connection,
    Protocol,
    Other,
}

impl TransportError {
    pub fn kind(&self) -> TransportKind {
        match self {
            TransportError::Cancelled => TransportKind::Cancelled,
            TransportError::DeadlineExceeded => TransportKind::DeadlineExceeded,
            TransportError::UnsupportedScheme(_) => TransportKind::Protocol,
            TransportError::Curl(e) => classify_curl_error(e),
        }
    }

    /// True for caller-initiated aborts (cancel token or context deadline).
    pub fn is_context_error(&self) -> bool {
        matches!(
            self,
            TransportError::Cancelled | TransportError::DeadlineExceeded
        )
    }
}

/// Classify a curl error into a `TransportKind`.
pub fn classify_curl_error(e: &curl::Error) -> TransportKind {
    if e.is_operation_timedout() {
        return TransportKind::Timeout;
    }
    if e.is_couldnt_resolve_host() || e.is_couldnt_resolve_proxy() {
        return TransportKind::Resolve;
    }
    if e.is_couldnt_connect() {
        return TransportKind::Connect;
    }
    if e.is_ssl_connect_error()
        || e.is_peer_failed_verification()
        || e.is_ssl_certproblem()
        || e.is_ssl_cipher()
        || e.is_ssl_cacert()
    {
        return TransportKind::Tls;
    }
    if e.is_recv_error() || e.is_send_error() || e.is_read_error() || e.is_got_nothing() {
        return TransportKind::Connection;
    }
    // CURLE_WEIRD_SERVER_REPLY has no predicate on `curl::Error`.
    if e.is_unsupported_protocol() || e.code() == 8 || e.is_too_many_redirects() {
        return TransportKind::Protocol;
    }
    TransportKind::Other
}
