#![deny(missing_docs)]

//! # Result Wrapper
//!
//! Wraps an endpoint response in the configured result envelope:
//!
//! - `Foo` => `ResponseEntity<Foo>`
//! - no content => `ResponseEntity<Void>`
//! - `plain` => `Foo` (unchanged)
//! - `plain => ResponseEntity` => `ResponseEntity` (response replaced)
//! - `io.oap.Wrap<io.oap.Inner>` => `Wrap<Inner<Foo>>`

use crate::datatypes::{DataType, ResultDataType};
use crate::mapping::finder::MappingFinder;
use crate::mapping::query::MappingQuery;
use crate::wrapper::generics::GenericDataTypeConverter;
use crate::wrapper::DataTypeWrapper;

/// Wraps responses in the resolved `result` type.
pub struct ResultDataTypeWrapper<'a> {
    finder: MappingFinder<'a>,
}

impl<'a> ResultDataTypeWrapper<'a> {
    /// Creates a wrapper using the finder.
    pub fn new(finder: MappingFinder<'a>) -> Self {
        Self { finder }
    }
}

fn check_none(data_type: DataType) -> DataType {
    match data_type {
        DataType::None { .. } => DataType::None {
            wrapped_in_result: true,
        },
        other => other,
    }
}

impl DataTypeWrapper for ResultDataTypeWrapper<'_> {
    fn wrap(&self, data_type: DataType, query: &MappingQuery) -> DataType {
        let Some(mapping) = self.finder.get_result_type_mapping(query) else {
            return data_type;
        };

        if mapping.is_plain() {
            return data_type;
        }

        let converter = GenericDataTypeConverter::new(self.finder.options());
        DataType::Result(ResultDataType {
            name: mapping.target.name().to_string(),
            package: mapping.target.package().to_string(),
            data_type: Box::new(check_none(data_type)),
            generics: converter.convert_generics(&mapping.target),
            plain_replacement: mapping.is_plain_mapping(),
        })
    }
}
