//! Adapter between the configuration host and the core.
//!
//! The host hands over an untyped configuration object and expects back
//! either the data source state or diagnostics. This layer declares the
//! schema, coerces the configuration into a `RequestDescriptor`, calls
//! `fetch_and_identify` once and renders the outcome.

mod decode;
mod diag;
mod schema;

pub use decode::decode_config;
pub use diag::Diagnostic;
pub use schema::{
    schema, Attribute, AttributeMode, AttributeType, DataSourceSchema, SchemaError,
    DATA_SOURCE_NAME,
};

use serde::Serialize;
use serde_json::{json, Value};

use crate::client::HttpClient;
use crate::context::FetchContext;
use crate::fetch::fetch_and_identify;
use crate::request::RequestDescriptor;
use crate::response::ResponseDescriptor;

/// Result of one data source read: state on success, diagnostics otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadOutcome {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadOutcome {
    fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            state: None,
            diagnostics,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Decode `config`, perform the request and render the resulting state.
pub fn read(client: &HttpClient, ctx: &FetchContext, config: &Value) -> ReadOutcome {
    let req = match decode_config(config) {
        Ok(req) => req,
        Err(diags) => {
            tracing::debug!("configuration rejected with {} diagnostics", diags.len());
            return ReadOutcome::failed(diags);
        }
    };
    read_request(client, ctx, &req)
}

/// Like `read` for an already decoded request.
pub fn read_request(client: &HttpClient, ctx: &FetchContext, req: &RequestDescriptor) -> ReadOutcome {
    tracing::info!("reading data.{} for {} {}", DATA_SOURCE_NAME, req.method, req.url);
    match fetch_and_identify(client, ctx, req) {
        Ok(resp) => ReadOutcome {
            state: Some(render_state(req, &resp)),
            diagnostics: Vec::new(),
        },
        Err(e) => ReadOutcome::failed(vec![Diagnostic::from(&e)]),
    }
}

/// Full data source state: configured inputs (defaults applied) plus the computed outputs.
pub fn render_state(req: &RequestDescriptor, resp: &ResponseDescriptor) -> Value {
    json!({
        "id": resp.id(),
        "url": req.url,
        "method": req.method,
        "headers": req.headers,
        "body": req.body,
        "status": req.expected_status,
        "response_headers": resp.response_headers(),
        "response_body": resp.response_body(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::CancelToken;

    #[test]
    fn invalid_config_never_fetches() {
        let token = CancelToken::new();
        token.cancel();
        let ctx = FetchContext::background().with_cancel(token);
        let out = read(&HttpClient::default(), &ctx, &json!({ "body": "x" }));
        assert!(!out.is_ok());
        assert!(out.state.is_none());
        assert_eq!(out.diagnostics[0].summary, "Missing required argument");
    }

    #[test]
    fn fetch_failure_becomes_single_diagnostic() {
        let token = CancelToken::new();
        token.cancel();
        let ctx = FetchContext::background().with_cancel(token);
        let out = read(
            &HttpClient::default(),
            &ctx,
            &json!({ "url": "http://127.0.0.1:9/" }),
        );
        assert_eq!(out.diagnostics.len(), 1);
        assert_eq!(
            out.diagnostics[0].summary,
            "Error performing http request: context canceled"
        );
    }

    #[test]
    fn bad_url_is_construction_diagnostic() {
        let out = read(
            &HttpClient::default(),
            &FetchContext::background(),
            &json!({ "url": "not a url" }),
        );
        assert!(out.diagnostics[0]
            .summary
            .starts_with("Error creating http request: "));
    }

    #[test]
    fn outcome_serializes_without_empty_fields() {
        let out = ReadOutcome::failed(vec![Diagnostic::error("boom", "")]);
        let v = serde_json::to_value(&out).unwrap();
        assert!(v.get("state").is_none());
        assert_eq!(v["diagnostics"][0]["summary"], "boom");
        assert!(v["diagnostics"][0].get("detail").is_none());
    }
}
