//! Declared attributes of the `http` data source.

use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use thiserror::Error;

pub const DATA_SOURCE_NAME: &str = "http";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    String,
    Int,
    /// String-keyed map of strings.
    Map,
}

impl AttributeType {
    fn admits(self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Int => value.is_i64() || value.is_u64(),
            AttributeType::Map => value
                .as_object()
                .is_some_and(|m| m.values().all(Value::is_string)),
        }
    }
}

/// Who sets the attribute: the configuration (required/optional) or the read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeMode {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub mode: AttributeMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    pub description: &'static str,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeType, mode: AttributeMode, description: &'static str) -> Self {
        Self {
            name,
            kind,
            mode,
            default: None,
            description,
        }
    }

    fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataSourceSchema {
    pub name: &'static str,
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("attribute {0:?} declared more than once")]
    DuplicateAttribute(&'static str),
    #[error("required attribute {0:?} has a default")]
    RequiredWithDefault(&'static str),
    #[error("computed attribute {0:?} has a default")]
    ComputedWithDefault(&'static str),
    #[error("default of {0:?} does not match its type")]
    DefaultTypeMismatch(&'static str),
    #[error("attribute {0:?} has no description")]
    MissingDescription(&'static str),
}

impl DataSourceSchema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Internal consistency check of the declaration itself.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for a in &self.attributes {
            if !seen.insert(a.name) {
                return Err(SchemaError::DuplicateAttribute(a.name));
            }
            if a.description.trim().is_empty() {
                return Err(SchemaError::MissingDescription(a.name));
            }
            match (&a.default, a.mode) {
                (Some(_), AttributeMode::Required) => {
                    return Err(SchemaError::RequiredWithDefault(a.name))
                }
                (Some(_), AttributeMode::Computed) => {
                    return Err(SchemaError::ComputedWithDefault(a.name))
                }
                (Some(d), AttributeMode::Optional) if !a.kind.admits(d) => {
                    return Err(SchemaError::DefaultTypeMismatch(a.name))
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// The `http` data source declaration.
pub fn schema() -> DataSourceSchema {
    use AttributeMode::{Computed, Optional, Required};
    DataSourceSchema {
        name: DATA_SOURCE_NAME,
        description: "Perform the provided http request and produce the http response headers and body.",
        attributes: vec![
            Attribute::new("url", AttributeType::String, Required, "The http request url."),
            Attribute::new("method", AttributeType::String, Optional, "The http request method.")
                .with_default(json!(crate::request::DEFAULT_METHOD)),
            Attribute::new("headers", AttributeType::Map, Optional, "The http request headers."),
            Attribute::new("body", AttributeType::String, Optional, "The http request body."),
            Attribute::new(
                "status",
                AttributeType::Int,
                Optional,
                "The expected http response status code. The actual status code has to match this value. Defaults to 200.",
            )
            .with_default(json!(crate::request::DEFAULT_EXPECTED_STATUS)),
            Attribute::new(
                "response_headers",
                AttributeType::Map,
                Computed,
                "The http response headers.",
            ),
            Attribute::new(
                "response_body",
                AttributeType::String,
                Computed,
                "The http response body.",
            ),
        ],
    }
}
