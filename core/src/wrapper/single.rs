#![deny(missing_docs)]

//! # Single Wrapper
//!
//! Wraps a non-array response in the configured single-value type:
//! `Foo` => `Mono<Foo>`.

use crate::datatypes::DataType;
use crate::mapping::finder::MappingFinder;
use crate::mapping::query::MappingQuery;
use crate::wrapper::DataTypeWrapper;

/// Wraps values in the resolved `single` type.
pub struct SingleDataTypeWrapper<'a> {
    finder: MappingFinder<'a>,
}

impl<'a> SingleDataTypeWrapper<'a> {
    /// Creates a wrapper using the finder.
    pub fn new(finder: MappingFinder<'a>) -> Self {
        Self { finder }
    }
}

impl DataTypeWrapper for SingleDataTypeWrapper<'_> {
    fn wrap(&self, data_type: DataType, query: &MappingQuery) -> DataType {
        if query.array {
            return data_type;
        }

        match self.finder.get_single_type_mapping(query) {
            Some(mapping) if !mapping.is_plain() => DataType::Single {
                name: mapping.target.name().to_string(),
                package: mapping.target.package().to_string(),
                data_type: Box::new(data_type),
            },
            _ => data_type,
        }
    }
}
