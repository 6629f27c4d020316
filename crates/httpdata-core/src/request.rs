//! Request descriptor: what to send and which status to expect back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::RequestError;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_EXPECTED_STATUS: u16 = 200;

/// Immutable input of one fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    /// Absolute request URL.
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    /// Request headers. Names are sent as given; each entry replaces any
    /// header of the same name the transport would add.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Raw request payload. Sent for every method, GET included.
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_expected_status", alias = "status")]
    pub expected_status: u16,
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

fn default_expected_status() -> u16 {
    DEFAULT_EXPECTED_STATUS
}

impl RequestDescriptor {
    /// A `GET` of `url` expecting `200`, with no headers and an empty body.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: default_method(),
            headers: BTreeMap::new(),
            body: String::new(),
            expected_status: DEFAULT_EXPECTED_STATUS,
        }
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn expect_status(mut self, status: u16) -> Self {
        self.expected_status = status;
        self
    }

    /// Build-time checks the transport would otherwise reject later.
    /// Returns the parsed URL on success.
    pub fn validate(&self) -> Result<url::Url, RequestError> {
        let parsed = url::Url::parse(&self.url).map_err(|source| RequestError::InvalidUrl {
            url: self.url.clone(),
            source,
        })?;
        if !is_token(&self.method) {
            return Err(RequestError::InvalidMethod(self.method.clone()));
        }
        for (name, value) in &self.headers {
            if !is_token(name) {
                return Err(RequestError::InvalidHeaderName(name.clone()));
            }
            if value.bytes().any(|b| matches!(b, b'\r' | b'\n' | 0)) {
                return Err(RequestError::InvalidHeaderValue { name: name.clone() });
            }
        }
        Ok(parsed)
    }
}

/// RFC 7230 `token`: one or more tchar.
pub(crate) fn is_token(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(is_tchar)
}

fn is_tchar(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#'
                | b'$'
                | b'%'
                | b'&'
                | b'\''
                | b'*'
                | b'+'
                | b'-'
                | b'.'
                | b'^'
                | b'_'
                | b'`'
                | b'|'
                | b'~'
        )
}
