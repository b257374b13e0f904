use pretty_assertions::assert_eq;
use typemap_core::mapping::models::{BodyStyle, ResultStyle};
use typemap_core::{load, AppError, HttpMethod, MappingConfig, MappingQuery};

fn config(map: &str) -> MappingConfig {
    let yaml = format!(
        "openapi-processor-mapping: v8\noptions:\n  package-name: io.generated\nmap:\n{}",
        map
    );
    load(&yaml).unwrap().unwrap()
}

fn endpoint(path: &str, method: HttpMethod) -> MappingQuery {
    MappingQuery::new().with_path(path).with_method(method)
}

const SCOPED: &str = r#"
  types:
    - type: Foo => io.global.Foo
  paths:
    /foo:
      types:
        - type: Foo => io.path.Foo
      get:
        types:
          - type: Foo => io.method.Foo
"#;

#[test]
fn test_most_specific_scope_wins() {
    let config = config(SCOPED);
    let finder = config.finder();
    let target = |query: MappingQuery| {
        finder
            .find_type_mapping(&query.with_name("Foo"))
            .unwrap()
            .unwrap()
            .target
            .type_name
    };

    assert_eq!(target(endpoint("/foo", HttpMethod::Get)), "io.method.Foo");
    assert_eq!(target(endpoint("/foo", HttpMethod::Post)), "io.path.Foo");
    assert_eq!(target(MappingQuery::new().with_path("/foo")), "io.path.Foo");
    assert_eq!(target(endpoint("/bar", HttpMethod::Get)), "io.global.Foo");
    assert_eq!(target(MappingQuery::new()), "io.global.Foo");
}

#[test]
fn test_ambiguous_only_within_one_scope() {
    let config = config(
        r#"
  types:
    - type: Foo => io.a.Foo
    - type: Foo => io.b.Foo
  paths:
    /foo:
      types:
        - type: Foo => io.path.Foo
"#,
    );
    let finder = config.finder();

    let resolved = finder
        .find_type_mapping(&MappingQuery::new().with_path("/foo").with_name("Foo"))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.target.type_name, "io.path.Foo");

    match finder.find_type_mapping(&MappingQuery::new().with_name("Foo")) {
        Err(AppError::AmbiguousMapping(err)) => {
            assert_eq!(err.kind, "type");
            assert_eq!(err.scope, "global");
            assert_eq!(err.mappings, vec!["Foo => io.a.Foo", "Foo => io.b.Foo"]);
        }
        other => panic!("expected ambiguous mapping, got {:?}", other),
    }
}

#[test]
fn test_format_matches_strictly() {
    let config = config(
        r#"
  types:
    - type: string:date-time => java.time.ZonedDateTime
    - type: string => io.oap.Text
"#,
    );
    let finder = config.finder();
    let find = |type_name: &str| {
        finder
            .find_type_mapping(&MappingQuery::new().with_type(type_name).primitive())
            .unwrap()
            .map(|m| m.target.type_name)
    };

    assert_eq!(find("string:date-time").as_deref(), Some("java.time.ZonedDateTime"));
    assert_eq!(find("string").as_deref(), Some("io.oap.Text"));
    assert_eq!(find("string:uuid"), None);
}

#[test]
fn test_type_name_needs_primitive_and_array_needs_array() {
    let config = config(
        r#"
  types:
    - type: string => io.oap.Text
    - type: array => java.util.Set
"#,
    );
    let finder = config.finder();

    assert_eq!(
        finder
            .find_type_mapping(&MappingQuery::new().with_type("string"))
            .unwrap(),
        None
    );

    let array = finder
        .find_type_mapping(&MappingQuery::new().with_type("array").array())
        .unwrap()
        .unwrap();
    assert_eq!(array.target.type_name, "java.util.Set");
}

#[test]
fn test_placeholder_is_resolved_in_generics() {
    let config = config(
        r#"
  types:
    - type: Paged => io.oap.Page<{package-name}.Bar, ?>
"#,
    );

    let mapping = config
        .finder()
        .find_type_mapping(&MappingQuery::new().with_name("Paged"))
        .unwrap()
        .unwrap();

    assert_eq!(mapping.target.to_string(), "io.oap.Page<io.generated.Bar, ?>");
}

#[test]
fn test_annotations_stack_from_global_to_method() {
    let config = config(
        r#"
  types:
    - type: Foo @ io.oap.Global
  paths:
    /foo:
      types:
        - type: Foo @ io.oap.Path
      get:
        types:
          - type: Foo @ io.oap.Method
"#,
    );

    let annotations: Vec<String> = config
        .finder()
        .find_annotation_type_mappings(&endpoint("/foo", HttpMethod::Get).with_name("Foo"))
        .into_iter()
        .map(|m| m.annotation.type_name)
        .collect();

    assert_eq!(annotations, vec!["io.oap.Global", "io.oap.Path", "io.oap.Method"]);
}

#[test]
fn test_interfaces_stack_from_global_to_method() {
    let config = config(
        r#"
  types:
    - type: Foo =+ io.oap.GlobalA
    - type: Foo =+ io.oap.GlobalB
  paths:
    /foo:
      types:
        - type: Foo =+ io.oap.Path
      get:
        types:
          - type: Foo =+ io.oap.Method
"#,
    );

    let interfaces: Vec<String> = config
        .finder()
        .find_interface_type_mappings(&endpoint("/foo", HttpMethod::Get).with_name("Foo"))
        .into_iter()
        .map(|m| m.target.to_string())
        .collect();

    assert_eq!(
        interfaces,
        vec!["io.oap.GlobalA", "io.oap.GlobalB", "io.oap.Path", "io.oap.Method"]
    );
}

#[test]
fn test_interface_keeps_explicit_generics() {
    let config = config(
        r#"
  types:
    - type: Foo =+ io.oap.Marker
      generics:
        - java.lang.String
    - type: Bar =+ io.oap.Marker<{package-name}.Bar>
"#,
    );
    let finder = config.finder();

    let foo = finder.find_interface_type_mappings(&MappingQuery::new().with_name("Foo"));
    assert_eq!(foo[0].target.to_string(), "io.oap.Marker<java.lang.String>");

    let bar = finder.find_interface_type_mappings(&MappingQuery::new().with_name("Bar"));
    assert_eq!(bar[0].target.to_string(), "io.oap.Marker<io.generated.Bar>");
}

#[test]
fn test_object_rules_need_allow_object() {
    let config = config(
        r#"
  types:
    - type: object @ io.oap.Any
    - type: object =+ io.oap.Marker
"#,
    );
    let finder = config.finder();
    let query = MappingQuery::new().with_name("Foo").with_type("object");

    assert_eq!(finder.find_annotation_type_mappings(&query).len(), 1);
    assert!(finder
        .find_annotation_type_mappings(&MappingQuery::new().with_name("Foo"))
        .is_empty());
    assert_eq!(
        finder
            .find_interface_type_mappings(&MappingQuery::new().with_name("Foo").allow_object())
            .len(),
        1
    );
}

#[test]
fn test_parameter_lookups() {
    let config = config(
        r#"
  parameters:
    - name: foo => io.oap.Foo
    - name: foo @ io.oap.Named
    - type: string @ io.oap.Text
    - add: request => javax.servlet.http.HttpServletRequest
  paths:
    /foo:
      get:
        parameters:
          - drop: unused
          - add: context => io.oap.Ctx io.oap.Context
"#,
    );
    let finder = config.finder();

    let name = finder
        .find_parameter_name_type_mapping(&MappingQuery::new().with_name("foo"))
        .unwrap()
        .unwrap();
    assert_eq!(name.mapping.target.type_name, "io.oap.Foo");

    let named = finder
        .find_annotation_parameter_name_type_mappings(&MappingQuery::new().with_name("foo"));
    assert_eq!(named[0].annotation.type_name, "io.oap.Named");

    let typed = finder.find_annotation_parameter_type_mappings(
        &MappingQuery::new().with_name("bar").with_type("string").primitive(),
    );
    assert_eq!(typed[0].annotation.type_name, "io.oap.Text");

    let global_adds = finder.find_add_parameter_type_mappings(&endpoint("/bar", HttpMethod::Get));
    assert_eq!(global_adds.len(), 1);
    assert_eq!(global_adds[0].parameter_name, "request");

    let method_adds = finder.find_add_parameter_type_mappings(&endpoint("/foo", HttpMethod::Get));
    assert_eq!(method_adds.len(), 1);
    assert_eq!(method_adds[0].parameter_name, "context");
    assert_eq!(
        method_adds[0].annotation.as_ref().unwrap().type_name,
        "io.oap.Ctx"
    );

    let drops = finder.find_drop_parameter_type_mappings(&endpoint("/foo", HttpMethod::Get));
    assert_eq!(drops[0].parameter_name, "unused");
    assert!(finder
        .find_drop_parameter_type_mappings(&endpoint("/foo", HttpMethod::Post))
        .is_empty());
}

#[test]
fn test_content_type_lookup() {
    let config = config(
        r#"
  responses:
    - content: application/vnd.any => io.oap.Any
"#,
    );
    let finder = config.finder();

    let found = finder
        .find_content_type_mapping(&MappingQuery::new().with_content_type("application/vnd.any"))
        .unwrap()
        .unwrap();
    assert_eq!(found.mapping.target.type_name, "io.oap.Any");
    assert_eq!(
        finder
            .find_content_type_mapping(&MappingQuery::new().with_content_type("application/json"))
            .unwrap(),
        None
    );
}

#[test]
fn test_single_valued_settings_override() {
    let config = config(
        r#"
  result: org.x.ResponseEntity
  result-style: success
  body-style: object
  single: reactor.core.publisher.Mono
  paths:
    /foo:
      result: plain
      result-style: all
      get:
        body-style: destructure
        result-status: false
"#,
    );
    let finder = config.finder();
    let query = endpoint("/foo", HttpMethod::Get);

    assert!(finder.get_result_type_mapping(&query).unwrap().is_plain());
    assert_eq!(finder.get_result_style(&query), Some(ResultStyle::All));
    assert_eq!(finder.get_body_style(&query), Some(BodyStyle::Destructure));
    assert_eq!(finder.get_result_status(&query), Some(false));
    assert_eq!(
        finder.get_single_type_mapping(&query).unwrap().target.type_name,
        "reactor.core.publisher.Mono"
    );

    let global = MappingQuery::new();
    assert_eq!(finder.get_result_style(&global), Some(ResultStyle::Success));
    assert_eq!(finder.get_result_status(&global), None);
    assert_eq!(finder.get_null_type_mapping(&global), None);
}

#[test]
fn test_exclude_is_or_of_path_and_method() {
    let config = config(
        r#"
  paths:
    /path:
      exclude: true
      get:
        exclude: false
    /method:
      post:
        exclude: true
"#,
    );
    let finder = config.finder();

    assert!(finder.is_endpoint_excluded(&endpoint("/path", HttpMethod::Get)));
    assert!(finder.is_endpoint_excluded(&MappingQuery::new().with_path("/path")));
    assert!(finder.is_endpoint_excluded(&endpoint("/method", HttpMethod::Post)));
    assert!(!finder.is_endpoint_excluded(&endpoint("/method", HttpMethod::Get)));
    assert!(!finder.is_endpoint_excluded(&endpoint("/other", HttpMethod::Post)));
}

#[test]
fn test_extension_annotations() {
    let config = config(
        r#"
  extensions:
    x-foo:
      - foo @ io.oap.FooA
      - bar @ io.oap.BarA
    x-bar: foobar @ io.oap.FooBarA
"#,
    );
    let finder = config.finder();

    let found: Vec<String> = finder
        .find_extension_annotations("x-foo", &["bar", "foo"])
        .into_iter()
        .map(|m| m.annotation.type_name)
        .collect();
    assert_eq!(found, vec!["io.oap.BarA", "io.oap.FooA"]);

    assert_eq!(finder.find_extension_annotations("x-bar", &["foobar"]).len(), 1);
    assert!(finder.find_extension_annotations("x-none", &["foo"]).is_empty());
}

#[test]
fn test_extension_with_type_mapping_is_rejected() {
    let yaml = "openapi-processor-mapping: v8\nmap:\n  extensions:\n    x-foo: foo => io.oap.Foo\n";
    assert!(matches!(load(yaml), Err(AppError::BadMapping(_))));
}

#[test]
fn test_tracing_does_not_change_results() {
    let traced = config(SCOPED);
    let mut options = traced.options.clone();
    options.logging.mapping = true;
    let query = endpoint("/foo", HttpMethod::Get).with_name("Foo");

    let plain = traced.finder().find_type_mapping(&query).unwrap();
    let with_trace = typemap_core::MappingFinder::new(&traced.repository, &options)
        .find_type_mapping(&query)
        .unwrap();

    assert_eq!(plain, with_trace);
}
