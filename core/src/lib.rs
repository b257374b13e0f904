#![deny(missing_docs)]

//! # Typemap Core
//!
//! Type-mapping resolution for an OpenAPI code generator.
//!
//! A YAML rule document tells the generator which target types, annotations,
//! interfaces and wrappers to use for OpenAPI types, schemas, parameters and
//! responses. Rules live in three scopes (global, path, path+method); the
//! finder answers queries against them with well-defined precedence.

/// Shared error types.
pub mod error;

/// Run options.
pub mod options;

/// Mapping rules, queries and the resolution engine.
pub mod mapping;

/// Rule document loading.
pub mod reader;

/// Minimal target type model.
pub mod datatypes;

/// Result, single, multi and null wrappers.
pub mod wrapper;

pub use datatypes::{DataType, GenericDataType, NullDataType, ResultDataType};
pub use error::{AmbiguousMappingError, AppError, AppResult};
pub use mapping::{
    parse_mapping, HttpMethod, Mapping, MappingFinder, MappingQuery, MappingRepository,
    TargetType, TypeMapping,
};
pub use options::{ApiOptions, LogTarget, LoggingOptions, DEFAULT_PACKAGE_NAME};
pub use reader::{read_mapping, MappingDocument};
pub use wrapper::{
    DataTypeWrapper, GenericDataTypeConverter, MultiDataTypeWrapper, NullDataTypeWrapper,
    ResultDataTypeWrapper, SingleDataTypeWrapper,
};

/// A loaded rule document: its rules and the run options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingConfig {
    /// The rules.
    pub repository: MappingRepository,
    /// Options of the run.
    pub options: ApiOptions,
}

impl MappingConfig {
    /// A finder over the loaded rules.
    pub fn finder(&self) -> MappingFinder<'_> {
        MappingFinder::new(&self.repository, &self.options)
    }
}

/// Reads and converts a rule document.
///
/// Returns `None` for an empty source. See [`read_mapping`] for how the
/// source is interpreted.
pub fn load(source: &str) -> AppResult<Option<MappingConfig>> {
    let Some(document) = read_mapping(source)? else {
        log::debug!("no mapping given");
        return Ok(None);
    };

    let options = reader::convert_options(&document);
    let repository = reader::convert_mappings(&document)?;
    Ok(Some(MappingConfig {
        repository,
        options,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_config_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MappingConfig>();
    }

    #[test]
    fn test_load_empty_source() {
        assert_eq!(load("").unwrap(), None);
    }

    #[test]
    fn test_load_inline_document() {
        let config = load(
            "openapi-processor-mapping: v8\noptions:\n  package-name: io.example\nmap:\n  types:\n    - type: string:uuid => java.util.UUID\n",
        )
        .unwrap()
        .unwrap();

        assert_eq!(config.options.package_name, "io.example");
        let mapping = config
            .finder()
            .find_type_mapping(&MappingQuery::new().with_type("string:uuid").primitive())
            .unwrap()
            .unwrap();
        assert_eq!(mapping.target.type_name, "java.util.UUID");
    }
}
