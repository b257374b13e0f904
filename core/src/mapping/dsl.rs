#![deny(missing_docs)]

//! # Mapping Strings
//!
//! Parses the compact rule strings of a rule document:
//!
//! ```text
//! string:date-time => java.time.ZonedDateTime
//! Foo => io.oap.Wrap<{package-name}.Bar, ?>
//! string:binary => byte[]
//! request => io.oap.Annotation(42) javax.servlet.http.HttpServletRequest
//! integer:year @ com.x.JsonFormat(shape = com.x.JsonFormat.Shape.NUMBER)
//! Foo =+ io.oap.Marker<java.lang.String>
//! Foo implement io.oap.Marker
//! org.springframework.http.ResponseEntity
//! name with space
//! ```

use crate::error::{AppError, AppResult};
use crate::mapping::models::{Annotation, ParameterValue, TargetType, PLAIN};
use crate::mapping::query::split_type_name;
use regex::Regex;
use std::sync::OnceLock;

/// Primitive target types.
const PRIMITIVES: [&str; 8] = [
    "byte", "short", "int", "long", "float", "double", "boolean", "char",
];

/// Shape of a parsed rule string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingKind {
    /// A bare type (`io.oap.Foo`) or a bare name (`foo`).
    Type,
    /// `source => target`.
    Map,
    /// `source @ annotation`.
    Annotate,
    /// `source =+ interface`.
    Implement,
}

/// A parsed rule string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMapping {
    /// Shape of the rule.
    pub kind: MappingKind,
    /// Source type, name or content type.
    pub source_type: Option<String>,
    /// Source format.
    pub source_format: Option<String>,
    /// Target type with its generics.
    pub target: Option<TargetType>,
    /// Annotation of an `@` rule, or of an annotated `=>` target.
    pub annotation: Option<Annotation>,
    /// Target is a primitive.
    pub primitive: bool,
    /// Target is a primitive array.
    pub primitive_array: bool,
}

impl ParsedMapping {
    fn new(kind: MappingKind) -> Self {
        Self {
            kind,
            source_type: None,
            source_format: None,
            target: None,
            annotation: None,
            primitive: false,
            primitive_array: false,
        }
    }

    fn with_source(mut self, source: &str) -> Self {
        let (source_type, source_format) = split_source(source);
        self.source_type = Some(source_type);
        self.source_format = source_format;
        self
    }
}

fn bad(source: &str, reason: &str) -> AppError {
    AppError::BadMapping(format!("failed to parse mapping '{}': {}", source, reason))
}

fn type_name_regex() -> &'static Regex {
    static TYPE_NAME_RE: OnceLock<Regex> = OnceLock::new();
    TYPE_NAME_RE.get_or_init(|| {
        Regex::new(r"^(\?|[A-Za-z_${][\w${}\-]*(\.[A-Za-z_${][\w${}\-]*)*)$")
            .expect("Invalid regex")
    })
}

fn qualified_value_regex() -> &'static Regex {
    static QUALIFIED_RE: OnceLock<Regex> = OnceLock::new();
    QUALIFIED_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z_$][\w$]*(\.[A-Za-z_$][\w$]*)+$").expect("Invalid regex")
    })
}

/// Splits a source into type and format. Content types keep their slash.
fn split_source(source: &str) -> (String, Option<String>) {
    if source.contains('/') {
        return (source.trim().to_string(), None);
    }
    split_type_name(source)
}

/// Scans `text` at nesting depth zero (outside `()`, `<>` and quotes).
///
/// Calls `visit` with the byte offset of every top-level character and stops
/// at the first offset for which it returns `true`.
fn find_top_level(text: &str, mut visit: impl FnMut(usize, char) -> bool) -> Option<usize> {
    let mut depth = 0usize;
    let mut quoted = false;

    for (i, c) in text.char_indices() {
        if quoted {
            if c == '"' {
                quoted = false;
            }
            continue;
        }

        match c {
            '"' => quoted = true,
            '(' | '<' => depth += 1,
            ')' | '>' if depth > 0 => depth -= 1,
            _ if depth == 0 => {
                if visit(i, c) {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `text` at top-level occurrences of `separator`.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut rest = text;

    while let Some(pos) = find_top_level(rest, |_, c| c == separator) {
        parts.push(&text[start..start + pos]);
        start += pos + separator.len_utf8();
        rest = &text[start..];
    }
    parts.push(&text[start..]);
    parts
}

/// Locates the operator of a rule string.
fn find_operator(text: &str) -> Option<(usize, usize, MappingKind)> {
    let mut found = None;
    find_top_level(text, |i, c| {
        let rest = &text[i..];
        found = match c {
            '=' if rest.starts_with("=>") => Some((i, 2, MappingKind::Map)),
            '=' if rest.starts_with("=+") => Some((i, 2, MappingKind::Implement)),
            '@' => Some((i, 1, MappingKind::Annotate)),
            ' ' if rest.starts_with(" implement ") => {
                Some((i, " implement ".len(), MappingKind::Implement))
            }
            _ => None,
        };
        found.is_some()
    });
    found
}

/// Parses one rule string.
pub fn parse_mapping(source: &str) -> AppResult<ParsedMapping> {
    let text = source.trim();
    if text.is_empty() {
        return Err(bad(source, "empty mapping"));
    }

    let Some((pos, len, kind)) = find_operator(text) else {
        return parse_bare(text);
    };

    let left = text[..pos].trim();
    let right = text[pos + len..].trim();
    if left.is_empty() {
        return Err(bad(source, "missing source"));
    }
    if right.is_empty() {
        return Err(bad(source, "missing target"));
    }

    let mut mapping = ParsedMapping::new(kind).with_source(left);
    match kind {
        MappingKind::Map => {
            let (annotation, target) = split_annotated_target(right);
            if let Some(annotation) = annotation {
                mapping.annotation = Some(parse_annotation(annotation, source)?);
            }
            let (target, primitive, primitive_array) = parse_target(target, source)?;
            mapping.target = Some(target);
            mapping.primitive = primitive;
            mapping.primitive_array = primitive_array;
        }
        MappingKind::Annotate => {
            mapping.annotation = Some(parse_annotation(right, source)?);
        }
        MappingKind::Implement => {
            mapping.target = Some(parse_type(right, source)?);
        }
        MappingKind::Type => {}
    }
    Ok(mapping)
}

/// A rule string without operator: a target type or a plain name.
fn parse_bare(text: &str) -> AppResult<ParsedMapping> {
    let base = text.strip_suffix("[]").unwrap_or(text);
    let looks_like_type = base.contains('.')
        || base.contains('<')
        || base == PLAIN
        || PRIMITIVES.contains(&base);

    let mut mapping = ParsedMapping::new(MappingKind::Type);
    if looks_like_type {
        let (target, primitive, primitive_array) = parse_target(text, text)?;
        mapping.target = Some(target);
        mapping.primitive = primitive;
        mapping.primitive_array = primitive_array;
    } else {
        mapping.source_type = Some(text.to_string());
    }
    Ok(mapping)
}

/// Splits `io.oap.Annotation(42) io.oap.Target` into annotation and target.
fn split_annotated_target(text: &str) -> (Option<&str>, &str) {
    let split = find_top_level(text, |i, c| {
        if !c.is_whitespace() {
            return false;
        }
        let after = text[i..].trim_start();
        !after.is_empty() && !after.starts_with('<') && !after.starts_with('(')
    });

    match split {
        Some(pos) => (Some(text[..pos].trim()), text[pos..].trim()),
        None => (None, text),
    }
}

/// Parses a target type, detecting primitives and primitive arrays.
fn parse_target(text: &str, source: &str) -> AppResult<(TargetType, bool, bool)> {
    let text = text.trim();
    let (base, array) = match text.strip_suffix("[]") {
        Some(base) => (base.trim(), true),
        None => (text, false),
    };

    let target = parse_type(base, source)?;
    let primitive = target.generics.is_empty() && PRIMITIVES.contains(&target.type_name.as_str());
    if array && !primitive {
        return Err(bad(source, "only primitive types may be arrays"));
    }
    Ok((target, primitive, array))
}

/// Parses `pkg.Type<pkg.A, pkg.B<pkg.C>>`.
fn parse_type(text: &str, source: &str) -> AppResult<TargetType> {
    let text = text.trim();

    let Some(open) = text.find('<') else {
        return type_name(text, source).map(TargetType::new);
    };

    let inner = text[open + 1..]
        .strip_suffix('>')
        .ok_or_else(|| bad(source, "unbalanced generic parameters"))?;

    let generics = split_top_level(inner, ',')
        .into_iter()
        .map(|g| parse_type(g, source))
        .collect::<AppResult<Vec<_>>>()?;

    Ok(TargetType::with_generics(
        type_name(&text[..open], source)?,
        generics,
    ))
}

fn type_name(text: &str, source: &str) -> AppResult<String> {
    let name = text.trim();
    if type_name_regex().is_match(name) {
        Ok(name.to_string())
    } else {
        Err(bad(source, &format!("invalid type name '{}'", name)))
    }
}

/// Parses `pkg.Annotation` or `pkg.Annotation(a = 1, b = "x")`.
fn parse_annotation(text: &str, source: &str) -> AppResult<Annotation> {
    let text = text.trim();

    let Some(open) = text.find('(') else {
        return type_name(text, source).map(Annotation::new);
    };

    let inner = text[open + 1..]
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| bad(source, "unbalanced annotation parameters"))?;

    let mut annotation = Annotation::new(type_name(&text[..open], source)?);
    if inner.trim().is_empty() {
        return Ok(annotation);
    }

    for parameter in split_top_level(inner, ',') {
        let (key, value) = match find_top_level(parameter, |_, c| c == '=') {
            Some(pos) => (parameter[..pos].trim(), parameter[pos + 1..].trim()),
            None => ("", parameter.trim()),
        };
        if value.is_empty() {
            return Err(bad(source, "empty annotation parameter"));
        }
        annotation
            .parameters
            .insert(key.to_string(), parse_parameter_value(value));
    }
    Ok(annotation)
}

/// Classifies an annotation parameter value.
///
/// `io.oap.Foo.class` and `com.x.JsonFormat.Shape.NUMBER` carry an import:
/// the package path up to and including the first capitalized segment.
pub fn parse_parameter_value(value: &str) -> ParameterValue {
    let value = value.trim();

    if value.starts_with('"') {
        return ParameterValue::Simple {
            value: value.to_string(),
        };
    }

    if let Some(class) = value.strip_suffix(".class") {
        return match class.rfind('.') {
            Some(pos) => ParameterValue::Class {
                value: format!("{}.class", &class[pos + 1..]),
                import: Some(class.to_string()),
            },
            None => ParameterValue::Class {
                value: value.to_string(),
                import: None,
            },
        };
    }

    if qualified_value_regex().is_match(value) {
        let segments: Vec<&str> = value.split('.').collect();
        let first_type = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_ascii_uppercase()));

        return match first_type {
            Some(index) if index > 0 => ParameterValue::Qualified {
                value: segments[index..].join("."),
                import: Some(segments[..=index].join(".")),
            },
            _ => ParameterValue::Qualified {
                value: value.to_string(),
                import: None,
            },
        };
    }

    ParameterValue::Simple {
        value: value.to_string(),
    }
}
