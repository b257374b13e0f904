#![deny(missing_docs)]

//! # Mapping Query
//!
//! Describes *what* is being resolved: the endpoint context (path, method),
//! the OpenAPI type (name, type, format), the content type and a few flags.
//!
//! Queries are transient; callers build one per lookup with the `with_*`
//! builder methods and hand it to the finder.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// HTTP methods that may carry endpoint-method scoped rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    /// GET
    Get,
    /// PUT
    Put,
    /// POST
    Post,
    /// DELETE
    Delete,
    /// OPTIONS
    Options,
    /// HEAD
    Head,
    /// PATCH
    Patch,
    /// TRACE
    Trace,
}

impl HttpMethod {
    /// All methods, in the order they appear in a rule document.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    /// Lowercase name as used in rule documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for HttpMethod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| AppError::General(format!("Unknown HTTP method: {}", s)))
    }
}

/// Splits `type:format` into its type and optional format.
///
/// Both parts are trimmed; an empty format is treated as absent.
pub fn split_type_name(type_name: &str) -> (String, Option<String>) {
    match type_name.split_once(':') {
        Some((name, format)) => {
            let format = format.trim();
            let format = (!format.is_empty()).then(|| format.to_string());
            (name.trim().to_string(), format)
        }
        None => (type_name.trim().to_string(), None),
    }
}

/// The facts about what is being mapped right now.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingQuery {
    /// Endpoint path, e.g. `/foo`.
    pub path: Option<String>,
    /// Endpoint method.
    pub method: Option<HttpMethod>,
    /// Schema or parameter name.
    pub name: Option<String>,
    /// Content type of a request or response.
    pub content_type: Option<String>,
    /// OpenAPI type, e.g. `string`, `array`, `object`.
    pub type_name: Option<String>,
    /// OpenAPI format, e.g. `date-time`.
    pub format: Option<String>,
    /// The schema is a primitive (string, number, integer, boolean).
    pub primitive: bool,
    /// The schema is an array.
    pub array: bool,
    /// Rules for the source `object` also apply.
    pub allow_object: bool,
}

impl MappingQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the endpoint path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the endpoint method.
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the schema or parameter name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Sets the OpenAPI type and format from `type:format`.
    pub fn with_type(mut self, type_name: &str) -> Self {
        let (type_name, format) = split_type_name(type_name);
        self.type_name = Some(type_name);
        self.format = format;
        self
    }

    /// Sets the OpenAPI format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Marks the schema as primitive.
    pub fn primitive(mut self) -> Self {
        self.primitive = true;
        self
    }

    /// Marks the schema as array.
    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    /// Lets `object` rules match as well.
    pub fn allow_object(mut self) -> Self {
        self.allow_object = true;
        self
    }
}

impl fmt::Display for MappingQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(name) = &self.name {
            parts.push(format!("name: '{}'", name));
        }

        match (&self.path, &self.method) {
            (Some(path), Some(method)) => parts.push(format!("path: {} '{}'", method, path)),
            (Some(path), None) => parts.push(format!("path: '{}'", path)),
            _ => {}
        }

        if let Some(content_type) = &self.content_type {
            parts.push(format!("content-type: '{}'", content_type));
        }

        if let Some(type_name) = &self.type_name {
            match &self.format {
                Some(format) => parts.push(format!("type: '{}:{}'", type_name, format)),
                None => parts.push(format!("type: '{}'", type_name)),
            }
        }

        let mut flags = String::new();
        if self.primitive {
            flags.push('P');
        }
        if self.array {
            flags.push('A');
        }
        if self.allow_object {
            flags.push('O');
        }
        if !flags.is_empty() {
            parts.push(format!("({})", flags));
        }

        write!(f, "{}", parts.join(" "))
    }
}
