#![deny(missing_docs)]

//! # Rule Store
//!
//! Three-level scoped container of mapping rules:
//!
//! - **global**: rules of the `map` block.
//! - **path**: rules of `map.paths./foo`.
//! - **path+method**: rules of `map.paths./foo.get`.
//!
//! Every level owns the same set of single-valued settings and rule buckets.
//! Extension rules (`map.extensions`) live next to the global level, keyed by
//! the vendor-extension name.
//!
//! The store is immutable once built and never reports errors; ambiguity
//! detection is done by the finder.

use crate::mapping::matcher::{EndpointMatcher, MappingMatcher};
use crate::mapping::models::{
    AnnotationNameMapping, BodyStyle, Mapping, NullTypeMapping, ResultStyle, ResultTypeMapping,
    TypeMapping,
};
use crate::mapping::query::{HttpMethod, MappingQuery};
use crate::mapping::steps::{StepKind, StepRecorder};
use indexmap::IndexMap;
use std::fmt;

/// The rule buckets of one scope level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    /// `types`: rules for any schema.
    Types,
    /// `schemas`: rules for schema properties only.
    Schemas,
    /// `parameters`: rules for endpoint parameters.
    Parameters,
    /// `responses`: rules for endpoint responses.
    Responses,
}

impl Bucket {
    /// Trace container of the bucket; `detail` labels parameter lookups.
    pub fn step_kind(&self, detail: &str) -> StepKind {
        match self {
            Bucket::Types => StepKind::Types,
            Bucket::Schemas => StepKind::Schemas,
            Bucket::Parameters => StepKind::Parameters(detail.to_string()),
            Bucket::Responses => StepKind::Responses,
        }
    }
}

/// An ordered list of rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMappings {
    mappings: Vec<Mapping>,
}

impl TypeMappings {
    /// Creates a bucket from rules in document order.
    pub fn new(mappings: Vec<Mapping>) -> Self {
        Self { mappings }
    }

    /// Appends a rule.
    pub fn push(&mut self, mapping: Mapping) {
        self.mappings.push(mapping);
    }

    /// All rules in document order.
    pub fn iter(&self) -> impl Iterator<Item = &Mapping> {
        self.mappings.iter()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Whether the bucket has no rules.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Rules accepted by the matcher, in document order.
    ///
    /// Every decision is recorded on `step`.
    pub fn filter(&self, matcher: &dyn MappingMatcher, step: &mut dyn StepRecorder) -> Vec<&Mapping> {
        self.mappings
            .iter()
            .filter(|m| matcher.matches_recorded(m, step))
            .collect()
    }
}

/// The rules of one scope level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mappings {
    pub(crate) result: Option<ResultTypeMapping>,
    pub(crate) result_style: Option<ResultStyle>,
    pub(crate) result_status: Option<bool>,
    pub(crate) single: Option<TypeMapping>,
    pub(crate) multi: Option<TypeMapping>,
    pub(crate) null: Option<NullTypeMapping>,
    pub(crate) body_style: Option<BodyStyle>,
    pub(crate) exclude: bool,
    pub(crate) types: TypeMappings,
    pub(crate) schemas: TypeMappings,
    pub(crate) parameters: TypeMappings,
    pub(crate) responses: TypeMappings,
}

impl Mappings {
    /// Result envelope rule of this level.
    pub fn result(&self) -> Option<&ResultTypeMapping> {
        self.result.as_ref()
    }

    /// Result style of this level.
    pub fn result_style(&self) -> Option<ResultStyle> {
        self.result_style
    }

    /// Result status setting of this level.
    pub fn result_status(&self) -> Option<bool> {
        self.result_status
    }

    /// Single-value wrapper rule of this level.
    pub fn single(&self) -> Option<&TypeMapping> {
        self.single.as_ref()
    }

    /// Multi-value wrapper rule of this level.
    pub fn multi(&self) -> Option<&TypeMapping> {
        self.multi.as_ref()
    }

    /// Null wrapper rule of this level.
    pub fn null(&self) -> Option<&NullTypeMapping> {
        self.null.as_ref()
    }

    /// Body style of this level.
    pub fn body_style(&self) -> Option<BodyStyle> {
        self.body_style
    }

    /// Exclude flag of this level.
    pub fn is_excluded(&self) -> bool {
        self.exclude
    }

    /// One rule bucket of this level.
    pub fn bucket(&self, bucket: Bucket) -> &TypeMappings {
        match bucket {
            Bucket::Types => &self.types,
            Bucket::Schemas => &self.schemas,
            Bucket::Parameters => &self.parameters,
            Bucket::Responses => &self.responses,
        }
    }

    /// Whether this level holds any rule or setting at all.
    pub fn is_empty(&self) -> bool {
        *self == Mappings::default()
    }

    /// Total number of bucket rules.
    pub fn rule_count(&self) -> usize {
        self.types.len() + self.schemas.len() + self.parameters.len() + self.responses.len()
    }
}

/// Rules of one path, plus the rules of its methods.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointMappings {
    pub(crate) mappings: Mappings,
    pub(crate) methods: IndexMap<HttpMethod, Mappings>,
}

impl EndpointMappings {
    /// Path level rules.
    pub fn mappings(&self) -> &Mappings {
        &self.mappings
    }

    /// Method level rules.
    pub fn method(&self, method: HttpMethod) -> Option<&Mappings> {
        self.methods.get(&method)
    }

    /// Methods with their own rules, in document order.
    pub fn methods(&self) -> impl Iterator<Item = (&HttpMethod, &Mappings)> {
        self.methods.iter()
    }

    /// Excluded if the path or the query's method is excluded.
    pub fn is_excluded(&self, method: Option<HttpMethod>) -> bool {
        let method_excluded = method
            .and_then(|m| self.methods.get(&m))
            .is_some_and(Mappings::is_excluded);

        self.mappings.is_excluded() || method_excluded
    }
}

/// Scope of a rule level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    /// Global rules.
    Global,
    /// Rules of a path.
    Path(&'a str),
    /// Rules of a path and method.
    Method(&'a str, HttpMethod),
}

impl Scope<'_> {
    /// Descends into the trace containers of this scope.
    pub fn enter<'s>(&self, step: &'s mut dyn StepRecorder) -> &'s mut dyn StepRecorder {
        match self {
            Scope::Global => step.enter(StepKind::Global),
            Scope::Path(path) => step.enter(StepKind::Endpoint(path.to_string())),
            Scope::Method(path, method) => step
                .enter(StepKind::Endpoint(path.to_string()))
                .enter(StepKind::Method(*method)),
        }
    }
}

impl fmt::Display for Scope<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Global => write!(f, "global"),
            Scope::Path(path) => write!(f, "path '{}'", path),
            Scope::Method(path, method) => write!(f, "path {} '{}'", method, path),
        }
    }
}

/// One level of a scope chain.
#[derive(Debug, Clone, Copy)]
pub struct ScopeLevel<'a> {
    /// Scope of the level.
    pub scope: Scope<'a>,
    /// Rules of the level.
    pub mappings: &'a Mappings,
}

/// All rules of a rule document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingRepository {
    pub(crate) global: Mappings,
    pub(crate) endpoints: IndexMap<String, EndpointMappings>,
    pub(crate) extensions: IndexMap<String, Vec<AnnotationNameMapping>>,
}

impl Default for MappingRepository {
    fn default() -> Self {
        Self::new(Mappings::default(), IndexMap::new(), IndexMap::new())
    }
}

impl MappingRepository {
    /// Builds a repository from its levels.
    pub fn new(
        global: Mappings,
        endpoints: IndexMap<String, EndpointMappings>,
        extensions: IndexMap<String, Vec<AnnotationNameMapping>>,
    ) -> Self {
        Self {
            global,
            endpoints,
            extensions,
        }
    }

    /// Global rules.
    pub fn global(&self) -> &Mappings {
        &self.global
    }

    /// Rules of one path.
    pub fn endpoint(&self, path: &str) -> Option<&EndpointMappings> {
        self.endpoints.get(path)
    }

    /// All paths with rules, in document order.
    pub fn endpoints(&self) -> impl Iterator<Item = (&String, &EndpointMappings)> {
        self.endpoints.iter()
    }

    /// Annotation rules of one vendor extension.
    pub fn extension(&self, name: &str) -> &[AnnotationNameMapping] {
        self.extensions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all vendor extensions with rules.
    pub fn extension_names(&self) -> impl Iterator<Item = &String> {
        self.extensions.keys()
    }

    fn find_endpoint(&self, query: &MappingQuery) -> Option<(&String, &EndpointMappings)> {
        let matcher = EndpointMatcher::new(query);
        self.endpoints
            .iter()
            .find(|(path, _)| matcher.matches_path(path))
    }

    /// The scope levels relevant for the query, most specific first.
    ///
    /// Levels without rules for the query (unknown path, method without own
    /// block) are skipped; the global level is always last.
    pub fn scope_chain(&self, query: &MappingQuery) -> Vec<ScopeLevel<'_>> {
        let mut chain = Vec::with_capacity(3);

        if let Some((path, endpoint)) = self.find_endpoint(query) {
            let matcher = EndpointMatcher::new(query);
            let method = endpoint
                .methods
                .iter()
                .find(|(m, _)| matcher.matches_method(path, **m));

            if let Some((m, mappings)) = method {
                chain.push(ScopeLevel {
                    scope: Scope::Method(path, *m),
                    mappings,
                });
            }

            chain.push(ScopeLevel {
                scope: Scope::Path(path),
                mappings: &endpoint.mappings,
            });
        }

        chain.push(ScopeLevel {
            scope: Scope::Global,
            mappings: &self.global,
        });
        chain
    }

    /// Whether the query's endpoint is excluded (path OR method flag).
    pub fn is_excluded(&self, query: &MappingQuery) -> bool {
        self.find_endpoint(query)
            .is_some_and(|(_, endpoint)| endpoint.is_excluded(query.method))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::matcher::TypeMatcher;
    use crate::mapping::models::TargetType;
    use crate::mapping::steps::NoStep;

    fn repository() -> MappingRepository {
        let mut path = EndpointMappings::default();
        path.mappings.exclude = true;
        let get = Mappings {
            single: Some(TypeMapping::new("single", TargetType::new("io.oap.Mono"))),
            ..Mappings::default()
        };
        path.methods.insert(HttpMethod::Get, get);

        let mut endpoints = IndexMap::new();
        endpoints.insert("/foo".to_string(), path);

        MappingRepository::new(Mappings::default(), endpoints, IndexMap::new())
    }

    #[test]
    fn test_scope_chain_most_specific_first() {
        let repo = repository();
        let query = MappingQuery::new()
            .with_path("/foo")
            .with_method(HttpMethod::Get);

        let scopes: Vec<String> = repo
            .scope_chain(&query)
            .iter()
            .map(|l| l.scope.to_string())
            .collect();

        assert_eq!(scopes, vec!["path GET '/foo'", "path '/foo'", "global"]);

        let chain = repo.scope_chain(&query);
        assert_eq!(chain[0].scope, Scope::Method("/foo", HttpMethod::Get));
        assert_eq!(chain[1].scope, Scope::Path("/foo"));
        let get = repo.endpoint("/foo").unwrap().method(HttpMethod::Get);
        assert_eq!(Some(chain[0].mappings), get);
    }

    #[test]
    fn test_scope_chain_skips_missing_levels() {
        let repo = repository();

        let post = MappingQuery::new()
            .with_path("/foo")
            .with_method(HttpMethod::Post);
        assert_eq!(repo.scope_chain(&post).len(), 2);

        let other = MappingQuery::new().with_path("/bar");
        assert_eq!(repo.scope_chain(&other).len(), 1);

        assert_eq!(repo.scope_chain(&MappingQuery::new()).len(), 1);
    }

    #[test]
    fn test_excluded_by_path_or_method() {
        let repo = repository();
        let query = MappingQuery::new()
            .with_path("/foo")
            .with_method(HttpMethod::Get);

        assert!(repo.is_excluded(&query));
        assert!(!repo.is_excluded(&MappingQuery::new().with_path("/bar")));

        let mut only_method = EndpointMappings::default();
        only_method.methods.insert(
            HttpMethod::Put,
            Mappings {
                exclude: true,
                ..Mappings::default()
            },
        );
        assert!(only_method.is_excluded(Some(HttpMethod::Put)));
        assert!(!only_method.is_excluded(Some(HttpMethod::Get)));
        assert!(!only_method.is_excluded(None));
    }

    #[test]
    fn test_bucket_filter_keeps_document_order() {
        let bucket = TypeMappings::new(vec![
            Mapping::Type(TypeMapping::new("Foo", TargetType::new("io.oap.A"))),
            Mapping::Type(TypeMapping::new("Bar", TargetType::new("io.oap.B"))),
            Mapping::Type(TypeMapping::new("Foo", TargetType::new("io.oap.C"))),
        ]);
        let query = MappingQuery::new().with_name("Foo");

        let found = bucket.filter(&TypeMatcher::new(&query), &mut NoStep);
        let targets: Vec<String> = found.iter().map(|m| m.to_string()).collect();

        assert_eq!(targets, vec!["Foo => io.oap.A", "Foo => io.oap.C"]);
    }

    #[test]
    fn test_unknown_extension_is_empty() {
        assert!(MappingRepository::default().extension("x-none").is_empty());
    }
}
