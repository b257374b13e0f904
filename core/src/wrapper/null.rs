#![deny(missing_docs)]

//! # Null Wrapper
//!
//! Wraps a nullable property in the configured null wrapper:
//! `String` => `JsonNullable<String>`.
//!
//! Callers only pass nullable properties; the wrapper does not look at the
//! schema itself.

use crate::datatypes::{DataType, NullDataType};
use crate::mapping::finder::MappingFinder;
use crate::mapping::query::MappingQuery;
use crate::wrapper::DataTypeWrapper;

/// Wraps values in the resolved `null` type.
pub struct NullDataTypeWrapper<'a> {
    finder: MappingFinder<'a>,
}

impl<'a> NullDataTypeWrapper<'a> {
    /// Creates a wrapper using the finder.
    pub fn new(finder: MappingFinder<'a>) -> Self {
        Self { finder }
    }
}

impl DataTypeWrapper for NullDataTypeWrapper<'_> {
    fn wrap(&self, data_type: DataType, query: &MappingQuery) -> DataType {
        let Some(mapping) = self.finder.get_null_type_mapping(query) else {
            return data_type;
        };

        DataType::Null(NullDataType {
            name: mapping.target.name().to_string(),
            package: mapping.target.package().to_string(),
            data_type: Box::new(data_type),
            init: mapping.undefined,
        })
    }
}
