//! Response descriptor and header collection.
//!
//! libcurl hands headers over one raw line at a time. `ResponseHeaders`
//! folds those lines into an ordered name -> values mapping for the final
//! response, which is what both the fingerprint and the exposed header map
//! are computed from.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::fingerprint;
use crate::request::is_token;

/// Separator used to collapse a multi-value header into one string.
pub const VALUE_SEPARATOR: &str = ", ";

/// Headers of the final response, in the order the transport delivered them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    status: Option<u16>,
    complete: bool,
    entries: Vec<(String, Vec<String>)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut headers = Self::new();
        for line in lines {
            headers.push_line(line);
        }
        headers
    }

    /// Feed one raw header line (with or without its trailing CRLF).
    ///
    /// A status line starts a new header block and drops the previous one,
    /// so interim (`100 Continue`) and redirect responses leave no trace.
    pub fn push_line(&mut self, raw: &str) {
        let line = raw.trim_end_matches(['\r', '\n']);
        if line.starts_with("HTTP/") {
            self.entries.clear();
            self.complete = false;
            self.status = line
                .split_whitespace()
                .nth(1)
                .and_then(|code| code.parse::<u16>().ok());
            return;
        }
        if line.is_empty() {
            self.complete = true;
            return;
        }
        if line.starts_with([' ', '\t']) {
            // obs-fold: continuation of the previous value
            if let Some(last) = self.entries.last_mut().and_then(|(_, v)| v.last_mut()) {
                let more = line.trim_matches([' ', '\t']);
                if !more.is_empty() {
                    last.push(' ');
                    last.push_str(more);
                }
            }
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.is_empty() || name.ends_with([' ', '\t']) {
                return;
            }
            self.append(canonical_header_key(name), value.trim_matches([' ', '\t']));
        }
    }

    fn append(&mut self, name: String, value: &str) {
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, values)) => values.push(value.to_string()),
            None => self.entries.push((name, vec![value.to_string()])),
        }
    }

    /// Status code from the most recent status line.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// True once the blank line ending the current header block was seen.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// A 3xx block carrying a `Location` the transport will follow.
    pub fn is_redirect(&self) -> bool {
        self.status.is_some_and(|s| (300..400).contains(&s)) && self.get_all("Location").is_some()
    }

    /// Complete head of the response that ends the exchange: not interim, not a redirect.
    pub fn is_final(&self) -> bool {
        self.complete && self.status.is_some_and(|s| s >= 200) && !self.is_redirect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All values of `name` (canonicalized before lookup).
    pub fn get_all(&self, name: &str) -> Option<&[String]> {
        let name = canonical_header_key(name);
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Per header name, its values joined with `", "`, in transport order.
    pub fn joined(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.join(VALUE_SEPARATOR)))
    }
}

/// Canonical MIME form of a header name: first letter and every letter after
/// a hyphen upper-cased, the rest lower-cased. Names that are not valid
/// tokens are returned unchanged.
pub fn canonical_header_key(name: &str) -> String {
    if !is_token(name) {
        return name.to_string();
    }
    let mut upper = true;
    name.chars()
        .map(|c| {
            let out = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            out
        })
        .collect()
}

/// Output of one successful fetch. Built once by the core, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseDescriptor {
    id: String,
    response_headers: BTreeMap<String, String>,
    response_body: String,
}

impl ResponseDescriptor {
    /// Computes the fingerprint and the header map from the same joined values.
    pub(crate) fn from_parts(body: &[u8], headers: &ResponseHeaders) -> Self {
        let joined: Vec<(&str, String)> = headers.joined().collect();
        let id = fingerprint::content_id(body, joined.iter().map(|(_, v)| v.as_bytes()));
        let response_headers = joined
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        Self {
            id,
            response_headers,
            response_body: String::from_utf8_lossy(body).into_owned(),
        }
    }

    /// Lowercase hex SHA-1 content fingerprint.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn response_headers(&self) -> &BTreeMap<String, String> {
        &self.response_headers
    }

    pub fn response_body(&self) -> &str {
        &self.response_body
    }

    pub fn into_parts(self) -> (String, BTreeMap<String, String>, String) {
        (self.id, self.response_headers, self.response_body)
    }
}
