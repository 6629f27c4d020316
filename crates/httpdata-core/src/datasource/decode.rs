//! Configuration decoding: coerce a JSON object into a `RequestDescriptor`
//! the way the host coerces values to the declared attribute types.

use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::diag::Diagnostic;
use super::schema::{schema, AttributeMode};
use crate::request::{RequestDescriptor, DEFAULT_EXPECTED_STATUS, DEFAULT_METHOD};

/// Decode a configuration object. All problems are collected, not just the first.
pub fn decode_config(config: &Value) -> Result<RequestDescriptor, Vec<Diagnostic>> {
    let Some(obj) = config.as_object() else {
        return Err(vec![Diagnostic::error(
            "Invalid configuration",
            "The data source configuration must be an object.",
        )]);
    };

    let mut diags = Vec::new();
    let declared = schema();
    for (key, value) in obj {
        match declared.attribute(key) {
            None => diags.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named {:?} is not expected here.", key),
                )
                .at(key),
            ),
            Some(a) if a.mode == AttributeMode::Computed && !value.is_null() => diags.push(
                Diagnostic::error(
                    "Value for unconfigurable attribute",
                    format!("Can't configure a value for {:?}: its value will be decided automatically based on the result of applying this configuration.", key),
                )
                .at(key),
            ),
            Some(_) => {}
        }
    }

    let url = match string_attr(obj, "url") {
        Ok(Some(url)) => url,
        Ok(None) => {
            diags.push(
                Diagnostic::error(
                    "Missing required argument",
                    "The argument \"url\" is required, but no definition was found.",
                )
                .at("url"),
            );
            String::new()
        }
        Err(d) => {
            diags.push(d);
            String::new()
        }
    };
    let method = collect(&mut diags, string_attr(obj, "method"))
        .unwrap_or_else(|| DEFAULT_METHOD.to_string());
    let headers = collect(&mut diags, map_attr(obj, "headers")).unwrap_or_default();
    let body = collect(&mut diags, string_attr(obj, "body")).unwrap_or_default();
    let expected_status =
        collect(&mut diags, status_attr(obj, "status")).unwrap_or(DEFAULT_EXPECTED_STATUS);

    if !diags.is_empty() {
        return Err(diags);
    }
    Ok(RequestDescriptor {
        url,
        method,
        headers,
        body,
        expected_status,
    })
}

fn collect<T>(diags: &mut Vec<Diagnostic>, r: Result<Option<T>, Diagnostic>) -> Option<T> {
    r.unwrap_or_else(|d| {
        diags.push(d);
        None
    })
}

fn type_error(name: &str, required: &str) -> Diagnostic {
    Diagnostic::error(
        "Incorrect attribute value type",
        format!("Inappropriate value for attribute {:?}: {} required.", name, required),
    )
    .at(name)
}

/// Scalars convert to their string form; null means unset.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_attr(obj: &Map<String, Value>, name: &str) -> Result<Option<String>, Diagnostic> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => coerce_string(v)
            .map(Some)
            .ok_or_else(|| type_error(name, "string")),
    }
}

fn map_attr(
    obj: &Map<String, Value>,
    name: &str,
) -> Result<Option<BTreeMap<String, String>>, Diagnostic> {
    match obj.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(m)) => m
            .iter()
            .map(|(k, v)| {
                coerce_string(v)
                    .map(|s| (k.clone(), s))
                    .ok_or_else(|| type_error(name, "map of string"))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()
            .map(Some),
        Some(_) => Err(type_error(name, "map of string")),
    }
}

fn status_attr(obj: &Map<String, Value>, name: &str) -> Result<Option<u16>, Diagnostic> {
    let raw = match obj.get(name) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    let code = raw.ok_or_else(|| type_error(name, "number"))?;
    u16::try_from(code).map(Some).map_err(|_| {
        Diagnostic::error(
            "Invalid status code",
            format!("{} is not a valid HTTP status code.", code),
        )
        .at(name)
    })
}
