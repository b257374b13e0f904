#![deny(missing_docs)]

//! # Options
//!
//! Run configuration taken from the `options` and `logging` blocks of a rule
//! document.

use serde::{Deserialize, Serialize};

/// Package used for generated types when the document does not set one.
pub const DEFAULT_PACKAGE_NAME: &str = "io.openapiprocessor.generated";

/// Where the mapping trace is written to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// The `log` facade, at info level.
    #[default]
    Logger,
    /// Standard output.
    Stdout,
}

/// Controls the mapping trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoggingOptions {
    /// Log the rules tried by every lookup.
    pub mapping: bool,
    /// Target of the trace.
    pub mapping_target: LogTarget,
}

/// Options used while resolving and wrapping types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiOptions {
    /// Base package of generated types; replaces `{package-name}`.
    pub package_name: String,
    /// Suffix appended to generated model class names.
    pub model_name_suffix: String,
    /// Mapping trace settings.
    pub logging: LoggingOptions,
}

impl Default for ApiOptions {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            model_name_suffix: String::new(),
            logging: LoggingOptions::default(),
        }
    }
}

impl ApiOptions {
    /// Appends the model name suffix, unless the name already ends with it.
    pub fn model_type_name(&self, name: &str) -> String {
        if self.model_name_suffix.is_empty() || name.ends_with(&self.model_name_suffix) {
            name.to_string()
        } else {
            format!("{}{}", name, self.model_name_suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ApiOptions::default();
        assert_eq!(options.package_name, DEFAULT_PACKAGE_NAME);
        assert!(!options.logging.mapping);
        assert_eq!(options.logging.mapping_target, LogTarget::Logger);
    }

    #[test]
    fn test_model_type_name_suffix() {
        let options = ApiOptions {
            model_name_suffix: "Dto".into(),
            ..ApiOptions::default()
        };

        assert_eq!(options.model_type_name("Foo"), "FooDto");
        assert_eq!(options.model_type_name("FooDto"), "FooDto");
        assert_eq!(ApiOptions::default().model_type_name("Foo"), "Foo");
    }
}
