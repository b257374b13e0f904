#![deny(missing_docs)]

//! # Multi Wrapper
//!
//! Replaces an array response with the configured multi-value type, keeping
//! the item type: `List<Foo>` => `Flux<Foo>`.

use crate::datatypes::DataType;
use crate::mapping::finder::MappingFinder;
use crate::mapping::query::MappingQuery;
use crate::wrapper::DataTypeWrapper;

/// Wraps collections in the resolved `multi` type.
pub struct MultiDataTypeWrapper<'a> {
    finder: MappingFinder<'a>,
}

impl<'a> MultiDataTypeWrapper<'a> {
    /// Creates a wrapper using the finder.
    pub fn new(finder: MappingFinder<'a>) -> Self {
        Self { finder }
    }
}

impl DataTypeWrapper for MultiDataTypeWrapper<'_> {
    fn wrap(&self, data_type: DataType, query: &MappingQuery) -> DataType {
        if !query.array {
            return data_type;
        }

        let Some(mapping) = self.finder.get_multi_type_mapping(query) else {
            return data_type;
        };

        if mapping.is_plain() {
            return data_type;
        }

        match data_type.item() {
            Some(item) => DataType::MappedCollection {
                name: mapping.target.name().to_string(),
                package: mapping.target.package().to_string(),
                item: Box::new(item.clone()),
                multi: true,
            },
            None => data_type,
        }
    }
}
