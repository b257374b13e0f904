#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! - **Ambiguous mappings** are fatal configuration errors raised by the finder.
//! - **Bad mappings** are raised while converting a rule document.
//! - **Mapping format** errors report missing or outdated version keys.

use derive_more::{Display, From};
use std::fmt;

/// Two or more rules of a single-winner kind matched in the same scope.
///
/// Carries enough context to point the user at the offending rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmbiguousMappingError {
    /// Rule kind that was resolved (e.g. `type`, `parameter`).
    pub kind: String,
    /// Scope in which the conflict occurred (e.g. `path /foo`).
    pub scope: String,
    /// Description of the query that produced the conflict.
    pub query: String,
    /// The competing rules, in document order.
    pub mappings: Vec<String>,
}

impl fmt::Display for AmbiguousMappingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "ambiguous {} mapping in {} scope for query ({}):",
            self.kind, self.scope, self.query
        )?;
        for mapping in &self.mappings {
            writeln!(f, "  {}", mapping)?;
        }
        Ok(())
    }
}

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// The rule document is not valid YAML or has an unexpected shape.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),

    /// More than one rule matched where at most one is allowed.
    #[display("{_0}")]
    AmbiguousMapping(AmbiguousMappingError),

    /// A rule was used in a place where its kind is not permitted.
    #[from(ignore)]
    #[display("Bad Mapping: {_0}")]
    BadMapping(String),

    /// The rule document has a missing or unsupported version.
    #[from(ignore)]
    #[display("Mapping Format Error: {_0}")]
    MappingFormat(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_conversion() {
        let io_err = Error::new(ErrorKind::Other, "test");
        let app_err: AppError = io_err.into();
        assert!(matches!(app_err, AppError::Io(_)));
    }

    #[test]
    fn test_string_conversion() {
        let msg = String::from("something wrong");
        let app_err: AppError = msg.into();
        match app_err {
            AppError::General(s) => assert_eq!(s, "something wrong"),
            _ => panic!("String should convert to AppError::General"),
        }
    }

    #[test]
    fn test_bad_mapping_manual_creation() {
        let app_err = AppError::BadMapping("x-foo".into());
        assert_eq!(format!("{}", app_err), "Bad Mapping: x-foo");
    }

    #[test]
    fn test_ambiguous_lists_competing_rules() {
        let err: AppError = AmbiguousMappingError {
            kind: "type".into(),
            scope: "global".into(),
            query: "name: 'Foo'".into(),
            mappings: vec!["Foo => io.oap.A".into(), "Foo => io.oap.B".into()],
        }
        .into();

        assert_eq!(
            err.to_string(),
            "ambiguous type mapping in global scope for query (name: 'Foo'):\n  Foo => io.oap.A\n  Foo => io.oap.B\n"
        );
    }
}
