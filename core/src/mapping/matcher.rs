#![deny(missing_docs)]

//! # Matchers
//!
//! One matcher per rule kind. A matcher captures the query and decides, for
//! a single rule, whether it applies.
//!
//! - Matchers never fail: a rule of an incompatible kind simply does not match.
//! - Formats compare strictly: an absent format only matches an absent format.

use crate::mapping::models::Mapping;
use crate::mapping::query::{HttpMethod, MappingQuery};
use crate::mapping::steps::StepRecorder;

/// Source name of rules that apply to the OpenAPI `array` type.
const ARRAY: &str = "array";

/// Source name of rules that apply to any `object` schema.
const OBJECT: &str = "object";

/// Decides whether a single rule applies to the captured query.
pub trait MappingMatcher {
    /// Returns `true` if the rule applies.
    fn matches(&self, mapping: &Mapping) -> bool;

    /// Like [`MappingMatcher::matches`], but records the decision.
    fn matches_recorded(&self, mapping: &Mapping, step: &mut dyn StepRecorder) -> bool {
        let matched = self.matches(mapping);
        step.record(mapping, matched);
        matched
    }
}

fn same(rule: Option<&str>, query: Option<&str>) -> bool {
    rule == query
}

/// Matches type rules by name, by primitive type, or by `array`.
pub struct TypeMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> TypeMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for TypeMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        let Mapping::Type(rule) = mapping else {
            return false;
        };

        let source = rule.source_type_name.as_deref();
        let format_matches = same(
            rule.source_type_format.as_deref(),
            self.query.format.as_deref(),
        );

        if source.is_some() && same(source, self.query.name.as_deref()) && format_matches {
            return true;
        }

        if self.query.primitive {
            return source.is_some() && same(source, self.query.type_name.as_deref()) && format_matches;
        }

        if self.query.array {
            return source == Some(ARRAY);
        }

        false
    }
}

/// Matches annotation rules by name, by type, or by `object`.
pub struct AnnotationTypeMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> AnnotationTypeMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for AnnotationTypeMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        let Mapping::Annotation(rule) = mapping else {
            return false;
        };

        let source = Some(rule.source_type_name.as_str());
        let format_matches = same(
            rule.source_type_format.as_deref(),
            self.query.format.as_deref(),
        );

        (same(source, self.query.name.as_deref()) && format_matches)
            || (same(source, self.query.type_name.as_deref()) && format_matches)
            || (self.query.allow_object && rule.source_type_name == OBJECT)
    }
}

/// Matches interface rules by name, by type, or by `object`. Ignores formats.
pub struct InterfaceTypeMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> InterfaceTypeMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for InterfaceTypeMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        let Mapping::Interface(rule) = mapping else {
            return false;
        };

        let source = Some(rule.source_type_name.as_str());
        same(source, self.query.name.as_deref())
            || same(source, self.query.type_name.as_deref())
            || (self.query.allow_object && rule.source_type_name == OBJECT)
    }
}

/// Matches parameter name rules by exact name.
pub struct ParameterNameMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> ParameterNameMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for ParameterNameMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        match mapping {
            Mapping::Name(rule) => same(Some(rule.parameter_name.as_str()), self.query.name.as_deref()),
            _ => false,
        }
    }
}

/// Matches parameter annotation rules by exact name.
pub struct AnnotationParameterNameMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> AnnotationParameterNameMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for AnnotationParameterNameMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        match mapping {
            Mapping::AnnotationName(rule) => same(Some(rule.name.as_str()), self.query.name.as_deref()),
            _ => false,
        }
    }
}

/// Matches response rules by exact content type.
pub struct ContentTypeMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> ContentTypeMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }
}

impl MappingMatcher for ContentTypeMatcher<'_> {
    fn matches(&self, mapping: &Mapping) -> bool {
        match mapping {
            Mapping::ContentType(rule) => {
                same(Some(rule.content_type.as_str()), self.query.content_type.as_deref())
            }
            _ => false,
        }
    }
}

/// Matches every additional parameter rule.
pub struct AddParameterMatcher;

impl MappingMatcher for AddParameterMatcher {
    fn matches(&self, mapping: &Mapping) -> bool {
        matches!(mapping, Mapping::AddParameter(_))
    }
}

/// Matches every dropped parameter rule.
pub struct DropParameterMatcher;

impl MappingMatcher for DropParameterMatcher {
    fn matches(&self, mapping: &Mapping) -> bool {
        matches!(mapping, Mapping::DropParameter(_))
    }
}

/// Selects the endpoint (and endpoint method) scope of a query.
pub struct EndpointMatcher<'q> {
    query: &'q MappingQuery,
}

impl<'q> EndpointMatcher<'q> {
    /// Creates a matcher for the query.
    pub fn new(query: &'q MappingQuery) -> Self {
        Self { query }
    }

    /// Whether the endpoint path is the query's path.
    pub fn matches_path(&self, path: &str) -> bool {
        same(Some(path), self.query.path.as_deref())
    }

    /// Whether path and method are the query's path and method.
    pub fn matches_method(&self, path: &str, method: HttpMethod) -> bool {
        self.matches_path(path) && self.query.method == Some(method)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::models::*;
    use crate::mapping::steps::MappingStep;

    fn type_rule(source: &str, format: Option<&str>) -> Mapping {
        let mut rule = TypeMapping::new(source, TargetType::new("io.oap.Target"));
        rule.source_type_format = format.map(String::from);
        Mapping::Type(rule)
    }

    fn annotation_rule(source: &str, format: Option<&str>) -> Mapping {
        Mapping::Annotation(AnnotationTypeMapping {
            source_type_name: source.into(),
            source_type_format: format.map(String::from),
            annotation: Annotation::new("io.oap.Ann"),
        })
    }

    fn interface_rule(source: &str) -> Mapping {
        Mapping::Interface(InterfaceTypeMapping {
            source_type_name: source.into(),
            target: TargetType::new("io.oap.Marker"),
        })
    }

    #[test]
    fn test_type_matches_by_name() {
        let query = MappingQuery::new().with_name("Foo");
        let matcher = TypeMatcher::new(&query);

        assert!(matcher.matches(&type_rule("Foo", None)));
        assert!(!matcher.matches(&type_rule("Bar", None)));
    }

    #[test]
    fn test_type_format_is_strict() {
        let plain = MappingQuery::new().with_type("string").primitive();
        let dated = MappingQuery::new().with_type("string:date-time").primitive();

        assert!(TypeMatcher::new(&plain).matches(&type_rule("string", None)));
        assert!(!TypeMatcher::new(&plain).matches(&type_rule("string", Some("date-time"))));
        assert!(!TypeMatcher::new(&dated).matches(&type_rule("string", None)));
        assert!(TypeMatcher::new(&dated).matches(&type_rule("string", Some("date-time"))));
    }

    #[test]
    fn test_type_by_type_only_for_primitives() {
        let object = MappingQuery::new().with_name("Foo").with_type("string");
        assert!(!TypeMatcher::new(&object).matches(&type_rule("string", None)));
    }

    #[test]
    fn test_type_array() {
        let query = MappingQuery::new().with_name("Foos").with_type("array").array();
        let matcher = TypeMatcher::new(&query);

        assert!(matcher.matches(&type_rule("array", None)));
        assert!(!matcher.matches(&type_rule("list", None)));
    }

    #[test]
    fn test_type_rejects_other_kinds() {
        let query = MappingQuery::new().with_name("Foo");
        assert!(!TypeMatcher::new(&query).matches(&annotation_rule("Foo", None)));
    }

    #[test]
    fn test_annotation_by_name_type_or_object() {
        let query = MappingQuery::new().with_name("Foo").with_type("object");
        let matcher = AnnotationTypeMatcher::new(&query);

        assert!(matcher.matches(&annotation_rule("Foo", None)));
        assert!(matcher.matches(&annotation_rule("object", None)));
        assert!(!matcher.matches(&annotation_rule("Foo", Some("x"))));

        let no_object = MappingQuery::new().with_name("Foo");
        assert!(!AnnotationTypeMatcher::new(&no_object).matches(&annotation_rule("object", None)));

        let allow = MappingQuery::new().with_name("Foo").allow_object();
        assert!(AnnotationTypeMatcher::new(&allow).matches(&annotation_rule("object", None)));
    }

    #[test]
    fn test_interface_ignores_format() {
        let query = MappingQuery::new().with_name("Foo").with_type("string:uuid");
        let matcher = InterfaceTypeMatcher::new(&query);

        assert!(matcher.matches(&interface_rule("Foo")));
        assert!(matcher.matches(&interface_rule("string")));
        assert!(!matcher.matches(&interface_rule("object")));
    }

    #[test]
    fn test_parameter_names_and_content_types() {
        let query = MappingQuery::new()
            .with_name("foo")
            .with_content_type("application/json");

        let name = Mapping::Name(NameTypeMapping {
            parameter_name: "foo".into(),
            mapping: TypeMapping::new("foo", TargetType::new("io.oap.Foo")),
        });
        let annotation_name = Mapping::AnnotationName(AnnotationNameMapping {
            name: "foo".into(),
            annotation: Annotation::new("io.oap.Ann"),
        });
        let content = Mapping::ContentType(ContentTypeMapping {
            content_type: "application/json".into(),
            mapping: TypeMapping::new("application/json", TargetType::new("io.oap.Json")),
        });

        assert!(ParameterNameMatcher::new(&query).matches(&name));
        assert!(!ParameterNameMatcher::new(&query).matches(&annotation_name));
        assert!(AnnotationParameterNameMatcher::new(&query).matches(&annotation_name));
        assert!(ContentTypeMatcher::new(&query).matches(&content));
        assert!(!ContentTypeMatcher::new(&query).matches(&name));
    }

    #[test]
    fn test_add_and_drop_match_their_kind() {
        let drop = Mapping::DropParameter(DropParameterTypeMapping {
            parameter_name: "foo".into(),
        });

        assert!(DropParameterMatcher.matches(&drop));
        assert!(!AddParameterMatcher.matches(&drop));
    }

    #[test]
    fn test_endpoint_matcher() {
        let query = MappingQuery::new()
            .with_path("/foo")
            .with_method(HttpMethod::Post);
        let matcher = EndpointMatcher::new(&query);

        assert!(matcher.matches_path("/foo"));
        assert!(!matcher.matches_path("/bar"));
        assert!(matcher.matches_method("/foo", HttpMethod::Post));
        assert!(!matcher.matches_method("/foo", HttpMethod::Get));
    }

    #[test]
    fn test_matches_recorded_keeps_result() {
        let query = MappingQuery::new().with_name("Foo");
        let mut step = MappingStep::root("looking for", &query);

        assert!(TypeMatcher::new(&query).matches_recorded(&type_rule("Foo", None), &mut step));
        assert!(!TypeMatcher::new(&query).matches_recorded(&type_rule("Bar", None), &mut step));
        assert!(step.is_match());
        assert_eq!(step.lines().len(), 3);
    }
}
