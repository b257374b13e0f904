#![deny(missing_docs)]

//! # Generic Parameter Conversion
//!
//! Turns the generic parameters of a resolved target type into
//! [`GenericDataType`]s. Types inside the configured base package are
//! generated models and get the model name suffix.

use crate::datatypes::GenericDataType;
use crate::mapping::models::TargetType;
use crate::options::ApiOptions;

/// Converts target type generics into data type generics.
pub struct GenericDataTypeConverter<'a> {
    options: &'a ApiOptions,
}

impl<'a> GenericDataTypeConverter<'a> {
    /// Creates a converter using the options' package and suffix.
    pub fn new(options: &'a ApiOptions) -> Self {
        Self { options }
    }

    /// Converts the generic parameters of `target`, recursively.
    pub fn convert_generics(&self, target: &TargetType) -> Vec<GenericDataType> {
        target
            .generics
            .iter()
            .map(|generic| {
                let name = if generic.type_name.starts_with(&self.options.package_name) {
                    self.options.model_type_name(generic.name())
                } else {
                    generic.name().to_string()
                };

                GenericDataType {
                    name,
                    package: generic.package().to_string(),
                    generics: self.convert_generics(generic),
                }
            })
            .collect()
    }
}
