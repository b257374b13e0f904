#![deny(missing_docs)]

//! # Rule Document
//!
//! Serde model of the YAML rule document. Rule strings are kept as written;
//! the converter parses them into rule values.
//!
//! Unknown keys are ignored, so documents written for newer versions still
//! load as long as they keep the known keys.

use crate::mapping::models::{BodyStyle, ResultStyle};
use crate::mapping::query::HttpMethod;
use crate::options::LoggingOptions;
use indexmap::IndexMap;
use serde::Deserialize;

/// Top-level rule document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MappingDocument {
    /// Version key, e.g. `v8`.
    #[serde(rename = "openapi-processor-mapping")]
    pub version: Option<serde_yaml::Value>,
    /// Deprecated version key.
    #[serde(rename = "openapi-processor-spring")]
    pub spring_version: Option<serde_yaml::Value>,
    /// `options` block.
    pub options: OptionsDoc,
    /// `logging` block.
    pub logging: LoggingOptions,
    /// `map` block.
    pub map: BlockDoc,
}

/// The `options` block.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OptionsDoc {
    /// Base package of generated types.
    pub package_name: Option<String>,
    /// Suffix of generated model classes.
    pub model_name_suffix: Option<String>,
}

/// One scope level: the `map` block, a path or a path method.
///
/// `paths` and `extensions` are only meaningful on the `map` block, the
/// method keys only on a path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct BlockDoc {
    /// Result envelope rule.
    pub result: Option<String>,
    /// Result style.
    pub result_style: Option<ResultStyle>,
    /// Result status flag.
    pub result_status: Option<bool>,
    /// Single wrapper rule.
    pub single: Option<String>,
    /// Multi wrapper rule.
    pub multi: Option<String>,
    /// Null wrapper rule, `Type [= init]`.
    pub null: Option<String>,
    /// Body style.
    pub body_style: Option<BodyStyle>,
    /// Skip code generation for the endpoint.
    pub exclude: bool,
    /// `types` bucket.
    pub types: Vec<TypeDoc>,
    /// `schemas` bucket.
    pub schemas: Vec<TypeDoc>,
    /// `parameters` bucket.
    pub parameters: Vec<ParameterDoc>,
    /// `responses` bucket.
    pub responses: Vec<ResponseDoc>,
    /// Path scopes.
    pub paths: IndexMap<String, BlockDoc>,
    /// Vendor-extension rules.
    pub extensions: IndexMap<String, OneOrMany>,
    /// `get` scope of a path.
    pub get: Option<Box<BlockDoc>>,
    /// `put` scope of a path.
    pub put: Option<Box<BlockDoc>>,
    /// `post` scope of a path.
    pub post: Option<Box<BlockDoc>>,
    /// `delete` scope of a path.
    pub delete: Option<Box<BlockDoc>>,
    /// `options` scope of a path.
    pub options: Option<Box<BlockDoc>>,
    /// `head` scope of a path.
    pub head: Option<Box<BlockDoc>>,
    /// `patch` scope of a path.
    pub patch: Option<Box<BlockDoc>>,
    /// `trace` scope of a path.
    pub trace: Option<Box<BlockDoc>>,
}

impl BlockDoc {
    /// Method scopes present on this block, in [`HttpMethod::ALL`] order.
    pub fn methods(&self) -> Vec<(HttpMethod, &BlockDoc)> {
        HttpMethod::ALL
            .iter()
            .filter_map(|method| {
                let block = match method {
                    HttpMethod::Get => &self.get,
                    HttpMethod::Put => &self.put,
                    HttpMethod::Post => &self.post,
                    HttpMethod::Delete => &self.delete,
                    HttpMethod::Options => &self.options,
                    HttpMethod::Head => &self.head,
                    HttpMethod::Patch => &self.patch,
                    HttpMethod::Trace => &self.trace,
                };
                block.as_deref().map(|b| (*method, b))
            })
            .collect()
    }
}

/// Entry of `types` or `schemas`, and the `type` entry of `parameters`.
#[derive(Debug, Clone, Deserialize)]
pub struct TypeDoc {
    /// The rule string.
    #[serde(rename = "type")]
    pub rule: String,
    /// Generic parameters given as a list.
    #[serde(default)]
    pub generics: Vec<String>,
}

/// Entry of `parameters`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ParameterDoc {
    /// `name: foo => io.oap.Foo` or `name: foo @ io.oap.Annotation`.
    Name {
        /// The rule string.
        name: String,
        /// Generic parameters given as a list.
        #[serde(default)]
        generics: Vec<String>,
    },
    /// `add: request => javax.servlet.http.HttpServletRequest`.
    Add {
        /// The rule string.
        add: String,
        /// Generic parameters given as a list.
        #[serde(default)]
        generics: Vec<String>,
    },
    /// `drop: unused`.
    Drop {
        /// Name of the dropped parameter.
        drop: String,
    },
    /// `type: string => io.oap.Text`.
    Type(TypeDoc),
}

/// Entry of `responses`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseDoc {
    /// The rule string, `content/type => Target`.
    pub content: String,
    /// Generic parameters given as a list.
    #[serde(default)]
    pub generics: Vec<String>,
}

/// A single rule string or a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// `x-foo: foo @ io.oap.Foo`.
    One(String),
    /// `x-foo: [foo @ io.oap.Foo, bar @ io.oap.Bar]`.
    Many(Vec<String>),
}

impl OneOrMany {
    /// The rule strings.
    pub fn values(&self) -> &[String] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_document() {
        let yaml = r#"
openapi-processor-mapping: v8
options:
  package-name: io.example
logging:
  mapping: true
  mapping-target: stdout
map:
  result: org.x.ResponseEntity
  result-style: all
  body-style: destructure
  types:
    - type: Paged => io.oap.Page
      generics: [java.lang.String]
  parameters:
    - name: foo => io.oap.Foo
    - add: request => javax.servlet.http.HttpServletRequest
    - drop: unused
    - type: string => io.oap.Text
  paths:
    /foo:
      exclude: true
      null: org.x.JsonNullable = JsonNullable.undefined()
      patch:
        single: reactor.core.publisher.Mono
  extensions:
    x-foo: foo @ io.oap.FooA
    x-bar:
      - bar @ io.oap.BarA
      - baz @ io.oap.BazA
unknown: ignored
"#;
        let doc: MappingDocument = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(doc.options.package_name.as_deref(), Some("io.example"));
        assert!(doc.logging.mapping);
        assert_eq!(doc.map.result_style, Some(ResultStyle::All));
        assert_eq!(doc.map.body_style, Some(BodyStyle::Destructure));
        assert_eq!(doc.map.types[0].generics, vec!["java.lang.String"]);
        assert!(matches!(doc.map.parameters[0], ParameterDoc::Name { .. }));
        assert!(matches!(doc.map.parameters[1], ParameterDoc::Add { .. }));
        assert!(matches!(doc.map.parameters[2], ParameterDoc::Drop { .. }));
        assert!(matches!(doc.map.parameters[3], ParameterDoc::Type(_)));

        let path = &doc.map.paths["/foo"];
        assert!(path.exclude);
        assert_eq!(
            path.null.as_deref(),
            Some("org.x.JsonNullable = JsonNullable.undefined()")
        );
        let methods = path.methods();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0].0, HttpMethod::Patch);

        assert_eq!(doc.map.extensions["x-foo"].values().len(), 1);
        assert_eq!(doc.map.extensions["x-bar"].values().len(), 2);
    }

    #[test]
    fn test_empty_blocks_default() {
        let doc: MappingDocument = serde_yaml::from_str("openapi-processor-mapping: v2\n").unwrap();

        assert!(doc.map.types.is_empty());
        assert!(doc.map.paths.is_empty());
        assert!(!doc.map.exclude);
        assert_eq!(doc.options.package_name, None);
    }
}
