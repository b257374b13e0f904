#![deny(missing_docs)]

//! # Mapping Module
//!
//! Scoped type-mapping rules and their resolution.
//!
//! - **models**: the rule value types.
//! - **dsl**: parser of the compact rule strings.
//! - **query**: what a lookup asks for.
//! - **matcher**: per-kind rule predicates.
//! - **steps**: lookup tracing.
//! - **store**: the three-level rule repository.
//! - **finder**: precedence, stacking and ambiguity rules.

pub mod dsl;
pub mod finder;
pub mod matcher;
pub mod models;
pub mod query;
pub mod steps;
pub mod store;

pub use dsl::{parse_mapping, MappingKind, ParsedMapping};
pub use finder::MappingFinder;
pub use models::{
    AddParameterTypeMapping, Annotation, AnnotationNameMapping, AnnotationTypeMapping, BodyStyle,
    ContentTypeMapping, DropParameterTypeMapping, InterfaceTypeMapping, Mapping, NameTypeMapping,
    NullTypeMapping, ParameterValue, ResultStyle, ResultTypeMapping, TargetType, TypeMapping,
};
pub use query::{HttpMethod, MappingQuery};
pub use steps::{MappingStep, NoStep, StepKind, StepRecorder};
pub use store::{EndpointMappings, MappingRepository, Mappings, Scope};
