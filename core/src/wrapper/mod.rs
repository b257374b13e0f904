#![deny(missing_docs)]

//! # Data Type Wrappers
//!
//! Consumers of the finder that wrap a converted data type according to the
//! resolved wrapper rules:
//!
//! - [`MultiDataTypeWrapper`]: collection => reactive multi type (`Flux<Foo>`).
//! - [`SingleDataTypeWrapper`]: value => reactive single type (`Mono<Foo>`).
//! - [`ResultDataTypeWrapper`]: response => result envelope (`ResponseEntity<Foo>`).
//! - [`NullDataTypeWrapper`]: nullable value => null wrapper (`JsonNullable<Foo>`).
//!
//! A missing rule or the `plain` sentinel leaves the data type untouched.

use crate::datatypes::DataType;
use crate::mapping::query::MappingQuery;

/// Generic parameter conversion.
pub mod generics;

/// Reactive multi wrapper.
pub mod multi;

/// Null wrapper.
pub mod null;

/// Result envelope wrapper.
pub mod result;

/// Reactive single wrapper.
pub mod single;

pub use generics::GenericDataTypeConverter;
pub use multi::MultiDataTypeWrapper;
pub use null::NullDataTypeWrapper;
pub use result::ResultDataTypeWrapper;
pub use single::SingleDataTypeWrapper;

/// Wraps a data type based on the rules resolved for the query.
pub trait DataTypeWrapper {
    /// Returns the wrapped data type, or `data_type` itself if nothing applies.
    fn wrap(&self, data_type: DataType, query: &MappingQuery) -> DataType;
}
