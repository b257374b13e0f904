#![deny(missing_docs)]

//! # Mapping Finder
//!
//! Resolves mapping rules for a query by walking the scope chain of the
//! rule store.
//!
//! Precedence per rule kind:
//!
//! - **Single-valued settings** (result, result style/status, single, multi,
//!   null, body style): the most specific level that sets a value wins.
//! - **Single-winner rules** (type, schema, parameter type/name, content type):
//!   the most specific level with a match wins; two matches on one level are
//!   an ambiguous mapping error.
//! - **Stacking rules** (annotations, interfaces): matches of all levels are
//!   collected, global first, then path, then method.
//! - **Override lists** (add/drop parameter): the most specific level with at
//!   least one rule wins entirely.
//! - **Exclude**: excluded if the path or the method says so.
//!
//! Every rule handed out has `{package-name}` replaced by the configured
//! package. When mapping logging is enabled each lookup builds a trace tree
//! that is logged once the lookup is done.

use crate::error::{AmbiguousMappingError, AppResult};
use crate::mapping::matcher::{
    AddParameterMatcher, AnnotationParameterNameMatcher, AnnotationTypeMatcher,
    ContentTypeMatcher, DropParameterMatcher, InterfaceTypeMatcher, MappingMatcher,
    ParameterNameMatcher, TypeMatcher,
};
use crate::mapping::models::{
    AddParameterTypeMapping, AnnotationNameMapping, AnnotationTypeMapping, BodyStyle,
    ContentTypeMapping, DropParameterTypeMapping, InterfaceTypeMapping, Mapping,
    NameTypeMapping, NullTypeMapping, PackagePlaceholder, ResultStyle, ResultTypeMapping,
    TypeMapping,
};
use crate::mapping::query::MappingQuery;
use crate::mapping::steps::{MappingStep, NoStep, StepKind, StepRecorder};
use crate::mapping::store::{Bucket, MappingRepository, Mappings};
use crate::options::ApiOptions;
use std::fmt::Display;

/// Picks one rule kind out of a [`Mapping`].
type Select<M> = fn(&Mapping) -> Option<&M>;

/// Describes which bucket, matcher and rule kind a lookup uses.
struct Lookup<'m, M> {
    kind: &'static str,
    bucket: Bucket,
    matcher: &'m dyn MappingMatcher,
    select: Select<M>,
}

/// Resolves rules from a [`MappingRepository`].
#[derive(Debug, Clone, Copy)]
pub struct MappingFinder<'a> {
    repository: &'a MappingRepository,
    options: &'a ApiOptions,
}

impl<'a> MappingFinder<'a> {
    /// Creates a finder over the repository.
    pub fn new(repository: &'a MappingRepository, options: &'a ApiOptions) -> Self {
        Self {
            repository,
            options,
        }
    }

    /// Options used for placeholder resolution and tracing.
    pub fn options(&self) -> &ApiOptions {
        self.options
    }

    /// Runs a lookup, tracing it if mapping logging is enabled.
    fn trace<T>(
        &self,
        message: &str,
        query: &MappingQuery,
        lookup: impl FnOnce(&mut dyn StepRecorder) -> T,
    ) -> T {
        if !self.options.logging.mapping {
            return lookup(&mut NoStep);
        }

        let mut root = MappingStep::root(message, query);
        let result = lookup(&mut root);
        root.log(&self.options.logging);
        result
    }

    fn resolve<M: PackagePlaceholder>(&self, mapping: &M) -> M {
        mapping.resolve_package(&self.options.package_name)
    }

    /// First value set along the scope chain, most specific level first.
    fn first_value<T: Display>(
        &self,
        query: &MappingQuery,
        step: &mut dyn StepRecorder,
        label: &str,
        pick: impl Fn(&'a Mappings) -> Option<T>,
    ) -> Option<T> {
        for level in self.repository.scope_chain(query) {
            if let Some(value) = pick(level.mappings) {
                level
                    .scope
                    .enter(step)
                    .note(&format!("{}: {}", label, value), true);
                return Some(value);
            }
        }
        None
    }

    /// Single-winner lookup: first level with a match, at most one per level.
    fn find_single<M>(
        &self,
        query: &MappingQuery,
        step: &mut dyn StepRecorder,
        lookup: Lookup<'_, M>,
    ) -> AppResult<Option<M>>
    where
        M: PackagePlaceholder + Display,
    {
        for level in self.repository.scope_chain(query) {
            let bucket_step = level.scope.enter(step).enter(lookup.bucket.step_kind(lookup.kind));
            let matches: Vec<&M> = level
                .mappings
                .bucket(lookup.bucket)
                .filter(lookup.matcher, bucket_step)
                .into_iter()
                .filter_map(lookup.select)
                .collect();

            match matches.as_slice() {
                [] => continue,
                [single] => return Ok(Some(self.resolve(*single))),
                _ => {
                    return Err(AmbiguousMappingError {
                        kind: lookup.kind.to_string(),
                        scope: level.scope.to_string(),
                        query: query.to_string(),
                        mappings: matches.iter().map(|m| m.to_string()).collect(),
                    }
                    .into())
                }
            }
        }
        Ok(None)
    }

    /// Stacking lookup: matches of every level, global level first.
    fn find_stacked<M: PackagePlaceholder>(
        &self,
        query: &MappingQuery,
        step: &mut dyn StepRecorder,
        lookup: Lookup<'_, M>,
    ) -> Vec<M> {
        let mut found = Vec::new();
        for level in self.repository.scope_chain(query).iter().rev() {
            let bucket_step = level.scope.enter(step).enter(lookup.bucket.step_kind(lookup.kind));
            found.extend(
                level
                    .mappings
                    .bucket(lookup.bucket)
                    .filter(lookup.matcher, bucket_step)
                    .into_iter()
                    .filter_map(lookup.select)
                    .map(|m| self.resolve(m)),
            );
        }
        found
    }

    /// Override lookup: all matches of the most specific level with a match.
    fn find_override<M: PackagePlaceholder>(
        &self,
        query: &MappingQuery,
        step: &mut dyn StepRecorder,
        lookup: Lookup<'_, M>,
    ) -> Vec<M> {
        for level in self.repository.scope_chain(query) {
            let bucket_step = level.scope.enter(step).enter(lookup.bucket.step_kind(lookup.kind));
            let found: Vec<M> = level
                .mappings
                .bucket(lookup.bucket)
                .filter(lookup.matcher, bucket_step)
                .into_iter()
                .filter_map(lookup.select)
                .map(|m| self.resolve(m))
                .collect();

            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    /// Type rule (`types` bucket) for a schema.
    pub fn find_type_mapping(&self, query: &MappingQuery) -> AppResult<Option<TypeMapping>> {
        let matcher = TypeMatcher::new(query);
        self.trace("looking for type mapping of", query, |step| {
            self.find_single(
                query,
                step,
                Lookup {
                    kind: "type",
                    bucket: Bucket::Types,
                    matcher: &matcher,
                    select: Mapping::as_type,
                },
            )
        })
    }

    /// Type rule (`schemas` bucket) for a schema property.
    pub fn find_schema_type_mapping(
        &self,
        query: &MappingQuery,
    ) -> AppResult<Option<TypeMapping>> {
        let matcher = TypeMatcher::new(query);
        self.trace("looking for schema type mapping of", query, |step| {
            self.find_single(
                query,
                step,
                Lookup {
                    kind: "schema",
                    bucket: Bucket::Schemas,
                    matcher: &matcher,
                    select: Mapping::as_type,
                },
            )
        })
    }

    /// Type rule (`parameters` bucket) for a parameter schema.
    pub fn find_parameter_type_mapping(
        &self,
        query: &MappingQuery,
    ) -> AppResult<Option<TypeMapping>> {
        let matcher = TypeMatcher::new(query);
        self.trace("looking for parameter type mapping of", query, |step| {
            self.find_single(
                query,
                step,
                Lookup {
                    kind: "type",
                    bucket: Bucket::Parameters,
                    matcher: &matcher,
                    select: Mapping::as_type,
                },
            )
        })
    }

    /// Parameter name rule for a parameter.
    pub fn find_parameter_name_type_mapping(
        &self,
        query: &MappingQuery,
    ) -> AppResult<Option<NameTypeMapping>> {
        let matcher = ParameterNameMatcher::new(query);
        self.trace("looking for parameter name mapping of", query, |step| {
            self.find_single(
                query,
                step,
                Lookup {
                    kind: "name",
                    bucket: Bucket::Parameters,
                    matcher: &matcher,
                    select: Mapping::as_name,
                },
            )
        })
    }

    /// Content type rule for a response.
    pub fn find_content_type_mapping(
        &self,
        query: &MappingQuery,
    ) -> AppResult<Option<ContentTypeMapping>> {
        let matcher = ContentTypeMatcher::new(query);
        self.trace("looking for content type mapping of", query, |step| {
            self.find_single(
                query,
                step,
                Lookup {
                    kind: "content type",
                    bucket: Bucket::Responses,
                    matcher: &matcher,
                    select: Mapping::as_content_type,
                },
            )
        })
    }

    /// Annotation rules (`types` bucket) for a schema.
    pub fn find_annotation_type_mappings(&self, query: &MappingQuery) -> Vec<AnnotationTypeMapping> {
        let matcher = AnnotationTypeMatcher::new(query);
        self.trace("looking for annotation type mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "annotation",
                    bucket: Bucket::Types,
                    matcher: &matcher,
                    select: Mapping::as_annotation,
                },
            )
        })
    }

    /// Annotation rules (`schemas` bucket) for a schema property.
    pub fn find_annotation_schema_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<AnnotationTypeMapping> {
        let matcher = AnnotationTypeMatcher::new(query);
        self.trace("looking for annotation schema mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "annotation",
                    bucket: Bucket::Schemas,
                    matcher: &matcher,
                    select: Mapping::as_annotation,
                },
            )
        })
    }

    /// Annotation rules (`parameters` bucket) for a parameter type.
    pub fn find_annotation_parameter_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<AnnotationTypeMapping> {
        let matcher = AnnotationTypeMatcher::new(query);
        self.trace("looking for parameter annotation mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "annotation",
                    bucket: Bucket::Parameters,
                    matcher: &matcher,
                    select: Mapping::as_annotation,
                },
            )
        })
    }

    /// Annotation rules (`parameters` bucket) for a parameter name.
    pub fn find_annotation_parameter_name_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<AnnotationNameMapping> {
        let matcher = AnnotationParameterNameMatcher::new(query);
        self.trace("looking for parameter name annotation mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "annotation name",
                    bucket: Bucket::Parameters,
                    matcher: &matcher,
                    select: Mapping::as_annotation_name,
                },
            )
        })
    }

    /// Interface rules (`types` bucket) for a schema.
    pub fn find_interface_type_mappings(&self, query: &MappingQuery) -> Vec<InterfaceTypeMapping> {
        let matcher = InterfaceTypeMatcher::new(query);
        self.trace("looking for interface mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "interface",
                    bucket: Bucket::Types,
                    matcher: &matcher,
                    select: Mapping::as_interface,
                },
            )
        })
    }

    /// Interface rules (`parameters` bucket) for a parameter type.
    pub fn find_interface_parameter_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<InterfaceTypeMapping> {
        let matcher = InterfaceTypeMatcher::new(query);
        self.trace("looking for parameter interface mappings of", query, |step| {
            self.find_stacked(
                query,
                step,
                Lookup {
                    kind: "interface",
                    bucket: Bucket::Parameters,
                    matcher: &matcher,
                    select: Mapping::as_interface,
                },
            )
        })
    }

    /// Additional parameters of an endpoint.
    pub fn find_add_parameter_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<AddParameterTypeMapping> {
        self.trace("looking for additional parameters of", query, |step| {
            self.find_override(
                query,
                step,
                Lookup {
                    kind: "add",
                    bucket: Bucket::Parameters,
                    matcher: &AddParameterMatcher,
                    select: Mapping::as_add_parameter,
                },
            )
        })
    }

    /// Dropped parameters of an endpoint.
    pub fn find_drop_parameter_type_mappings(
        &self,
        query: &MappingQuery,
    ) -> Vec<DropParameterTypeMapping> {
        self.trace("looking for dropped parameters of", query, |step| {
            self.find_override(
                query,
                step,
                Lookup {
                    kind: "drop",
                    bucket: Bucket::Parameters,
                    matcher: &DropParameterMatcher,
                    select: Mapping::as_drop_parameter,
                },
            )
        })
    }

    /// Annotation rules of a vendor extension for the given extension values.
    ///
    /// Extension rules are global only. The result follows the order of
    /// `values`, then document order.
    pub fn find_extension_annotations(
        &self,
        extension: &str,
        values: &[&str],
    ) -> Vec<AnnotationNameMapping> {
        let query = MappingQuery::new().with_name(values.join(", "));
        self.trace("looking for extension annotations of", &query, |step| {
            let step = step.enter(StepKind::Extension(extension.to_string()));
            let rules = self.repository.extension(extension);

            let mut found = Vec::new();
            for value in values {
                for rule in rules {
                    let matched = rule.name == *value;
                    step.record(rule, matched);
                    if matched {
                        found.push(self.resolve(rule));
                    }
                }
            }
            found
        })
    }

    /// Result envelope rule of an endpoint.
    pub fn get_result_type_mapping(&self, query: &MappingQuery) -> Option<ResultTypeMapping> {
        self.trace("looking for result mapping of", query, |step| {
            self.first_value(query, step, "result", |m| m.result())
                .map(|m| self.resolve(m))
        })
    }

    /// Result style of an endpoint.
    pub fn get_result_style(&self, query: &MappingQuery) -> Option<ResultStyle> {
        self.trace("looking for result style of", query, |step| {
            self.first_value(query, step, "result-style", Mappings::result_style)
        })
    }

    /// Result status setting of an endpoint.
    pub fn get_result_status(&self, query: &MappingQuery) -> Option<bool> {
        self.trace("looking for result status of", query, |step| {
            self.first_value(query, step, "result-status", Mappings::result_status)
        })
    }

    /// Single-value wrapper rule of an endpoint.
    pub fn get_single_type_mapping(&self, query: &MappingQuery) -> Option<TypeMapping> {
        self.trace("looking for single mapping of", query, |step| {
            self.first_value(query, step, "single", |m| m.single())
                .map(|m| self.resolve(m))
        })
    }

    /// Multi-value wrapper rule of an endpoint.
    pub fn get_multi_type_mapping(&self, query: &MappingQuery) -> Option<TypeMapping> {
        self.trace("looking for multi mapping of", query, |step| {
            self.first_value(query, step, "multi", |m| m.multi())
                .map(|m| self.resolve(m))
        })
    }

    /// Null wrapper rule of an endpoint.
    pub fn get_null_type_mapping(&self, query: &MappingQuery) -> Option<NullTypeMapping> {
        self.trace("looking for null mapping of", query, |step| {
            self.first_value(query, step, "null", |m| m.null())
                .map(|m| self.resolve(m))
        })
    }

    /// Body style of an endpoint.
    pub fn get_body_style(&self, query: &MappingQuery) -> Option<BodyStyle> {
        self.trace("looking for body style of", query, |step| {
            self.first_value(query, step, "body-style", Mappings::body_style)
        })
    }

    /// Whether the endpoint is excluded by its path or its method.
    pub fn is_endpoint_excluded(&self, query: &MappingQuery) -> bool {
        self.trace("looking for exclude of", query, |step| {
            let excluded = self.repository.is_excluded(query);
            if excluded {
                for level in self.repository.scope_chain(query) {
                    if level.mappings.is_excluded() {
                        level.scope.enter(step).note("exclude: true", true);
                    }
                }
            }
            excluded
        })
    }
}
