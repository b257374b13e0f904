#![deny(missing_docs)]

//! # Mapping Rule Models
//!
//! Immutable value types describing a single user-authored mapping rule.
//!
//! Rules are created once while converting a rule document and are never
//! mutated afterwards. List-valued rule kinds are unified under the closed
//! [`Mapping`] enum so the store and the matchers can treat them uniformly,
//! while single-valued settings (result, null, body style, ...) keep their
//! own typed representation.

use crate::error::AppError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target value that disables wrapping (result, single, multi) or mapping.
pub const PLAIN: &str = "plain";

/// Placeholder for the configured base package of generated types.
pub const PACKAGE_NAME_PLACEHOLDER: &str = "{package-name}";

/// Replaces the generated-package placeholder with a concrete package name.
///
/// Implemented by every rule type that carries target type names, so the
/// finder can hand out fully resolved rules.
pub trait PackagePlaceholder: Sized {
    /// Returns a copy with every `{package-name}` occurrence replaced.
    fn resolve_package(&self, package_name: &str) -> Self;
}

fn replace_placeholder(type_name: &str, package_name: &str) -> String {
    type_name.replace(PACKAGE_NAME_PLACEHOLDER, package_name)
}

/// A fully qualified target type with (possibly nested) generic parameters.
///
/// `java.util.Map<java.lang.String, java.util.List<io.oap.Foo>>` is a
/// `TargetType` with two generics, the second having one nested generic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TargetType {
    /// Fully qualified type name.
    pub type_name: String,
    /// Generic parameters in declaration order.
    pub generics: Vec<TargetType>,
}

impl TargetType {
    /// Creates a target type without generic parameters.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            generics: Vec::new(),
        }
    }

    /// Creates a target type with the given generic parameters.
    pub fn with_generics(type_name: impl Into<String>, generics: Vec<TargetType>) -> Self {
        Self {
            type_name: type_name.into(),
            generics,
        }
    }

    /// Simple name, i.e. everything after the last `.`.
    pub fn name(&self) -> &str {
        match self.type_name.rfind('.') {
            Some(pos) => &self.type_name[pos + 1..],
            None => &self.type_name,
        }
    }

    /// Package name, i.e. everything before the last `.`, or an empty string.
    pub fn package(&self) -> &str {
        match self.type_name.rfind('.') {
            Some(pos) => &self.type_name[..pos],
            None => "",
        }
    }

    /// Whether this is the `plain` sentinel.
    pub fn is_plain(&self) -> bool {
        self.type_name == PLAIN
    }
}

impl PackagePlaceholder for TargetType {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            type_name: replace_placeholder(&self.type_name, package_name),
            generics: self
                .generics
                .iter()
                .map(|g| g.resolve_package(package_name))
                .collect(),
        }
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if !self.generics.is_empty() {
            let generics: Vec<String> = self.generics.iter().map(|g| g.to_string()).collect();
            write!(f, "<{}>", generics.join(", "))?;
        }
        Ok(())
    }
}

/// A single annotation parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParameterValue {
    /// A literal value used as is: `42`, `"foo"`, `true`.
    Simple {
        /// Literal text.
        value: String,
    },
    /// A class literal: `io.oap.Foo.class`.
    Class {
        /// Value written into generated code (`Foo.class`).
        value: String,
        /// Import needed by the value (`io.oap.Foo`).
        import: Option<String>,
    },
    /// A (possibly qualified) constant: `com.x.JsonFormat.Shape.NUMBER`.
    Qualified {
        /// Value written into generated code (`JsonFormat.Shape.NUMBER`).
        value: String,
        /// Import needed by the value (`com.x.JsonFormat`).
        import: Option<String>,
    },
}

impl ParameterValue {
    /// Value as it should appear in generated code.
    pub fn value(&self) -> &str {
        match self {
            ParameterValue::Simple { value }
            | ParameterValue::Class { value, .. }
            | ParameterValue::Qualified { value, .. } => value,
        }
    }

    /// Import required by the value, if any.
    pub fn import(&self) -> Option<&str> {
        match self {
            ParameterValue::Simple { .. } => None,
            ParameterValue::Class { import, .. } | ParameterValue::Qualified { import, .. } => {
                import.as_deref()
            }
        }
    }
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// An annotation with its (ordered) parameters.
///
/// The key of an unnamed parameter (`@Foo(42)`) is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Annotation {
    /// Fully qualified annotation type.
    pub type_name: String,
    /// Parameters in declaration order.
    pub parameters: IndexMap<String, ParameterValue>,
}

impl Annotation {
    /// Creates an annotation without parameters.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            parameters: IndexMap::new(),
        }
    }
}

impl PackagePlaceholder for Annotation {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            type_name: replace_placeholder(&self.type_name, package_name),
            parameters: self.parameters.clone(),
        }
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)?;
        if !self.parameters.is_empty() {
            let params: Vec<String> = self
                .parameters
                .iter()
                .map(|(key, value)| {
                    if key.is_empty() {
                        value.to_string()
                    } else {
                        format!("{} = {}", key, value)
                    }
                })
                .collect();
            write!(f, "({})", params.join(", "))?;
        }
        Ok(())
    }
}

fn fmt_source(
    f: &mut fmt::Formatter<'_>,
    name: Option<&str>,
    format: Option<&str>,
) -> fmt::Result {
    if let Some(name) = name {
        write!(f, "{}", name)?;
    }
    if let Some(format) = format {
        write!(f, ":{}", format)?;
    }
    Ok(())
}

/// Maps a source type (with optional format) to a target type.
///
/// Also used for `single`/`multi` wrappers (source `single`/`multi`) and for
/// bare target types without a source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMapping {
    /// OpenAPI type or schema name this rule applies to.
    pub source_type_name: Option<String>,
    /// OpenAPI format this rule applies to.
    pub source_type_format: Option<String>,
    /// Resulting target type.
    pub target: TargetType,
    /// Target is a primitive (`byte`, `int`, ...).
    pub primitive: bool,
    /// Target is a primitive array (`byte[]`).
    pub primitive_array: bool,
}

impl TypeMapping {
    /// Creates a mapping from `source` (without format) to `target`.
    pub fn new(source: impl Into<String>, target: TargetType) -> Self {
        Self {
            source_type_name: Some(source.into()),
            source_type_format: None,
            target,
            primitive: false,
            primitive_array: false,
        }
    }

    /// Sets the source format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.source_type_format = Some(format.into());
        self
    }

    /// Whether the target is the `plain` sentinel.
    pub fn is_plain(&self) -> bool {
        self.target.is_plain()
    }
}

impl PackagePlaceholder for TypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            target: self.target.resolve_package(package_name),
            ..self.clone()
        }
    }
}

impl fmt::Display for TypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.source_type_name.is_none() && self.source_type_format.is_none() {
            return write!(f, "{}", self.target);
        }
        fmt_source(
            f,
            self.source_type_name.as_deref(),
            self.source_type_format.as_deref(),
        )?;
        write!(f, " => {}", self.target)?;
        if self.primitive_array {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

/// Maps a parameter (by name) to a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameTypeMapping {
    /// Parameter name.
    pub parameter_name: String,
    /// Type mapping applied to the parameter.
    pub mapping: TypeMapping,
}

impl PackagePlaceholder for NameTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            parameter_name: self.parameter_name.clone(),
            mapping: self.mapping.resolve_package(package_name),
        }
    }
}

impl fmt::Display for NameTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.parameter_name, self.mapping.target)
    }
}

/// Maps a response content type to a target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentTypeMapping {
    /// Content type, e.g. `application/vnd.any`.
    pub content_type: String,
    /// Type mapping applied to the response.
    pub mapping: TypeMapping,
}

impl PackagePlaceholder for ContentTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            content_type: self.content_type.clone(),
            mapping: self.mapping.resolve_package(package_name),
        }
    }
}

impl fmt::Display for ContentTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} => {}", self.content_type, self.mapping.target)
    }
}

/// Adds an annotation to a source type (with optional format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationTypeMapping {
    /// OpenAPI type or schema name this rule applies to.
    pub source_type_name: String,
    /// OpenAPI format this rule applies to.
    pub source_type_format: Option<String>,
    /// Annotation to add.
    pub annotation: Annotation,
}

impl PackagePlaceholder for AnnotationTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            annotation: self.annotation.resolve_package(package_name),
            ..self.clone()
        }
    }
}

impl fmt::Display for AnnotationTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_source(
            f,
            Some(&self.source_type_name),
            self.source_type_format.as_deref(),
        )?;
        write!(f, " @ {}", self.annotation)
    }
}

/// Adds an annotation to a parameter (by name) or an extension value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotationNameMapping {
    /// Parameter name or extension value.
    pub name: String,
    /// Annotation to add.
    pub annotation: Annotation,
}

impl PackagePlaceholder for AnnotationNameMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            name: self.name.clone(),
            annotation: self.annotation.resolve_package(package_name),
        }
    }
}

impl fmt::Display for AnnotationNameMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.name, self.annotation)
    }
}

/// Makes a source type implement an additional interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceTypeMapping {
    /// OpenAPI type or schema name this rule applies to.
    pub source_type_name: String,
    /// Interface to implement.
    pub target: TargetType,
}

impl PackagePlaceholder for InterfaceTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            source_type_name: self.source_type_name.clone(),
            target: self.target.resolve_package(package_name),
        }
    }
}

impl fmt::Display for InterfaceTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} =+ {}", self.source_type_name, self.target)
    }
}

/// Wraps endpoint responses into a result envelope.
///
/// Written either as a bare type (`org.x.ResponseEntity`), as the `plain`
/// sentinel, or as `plain => org.x.ResponseEntity` which replaces the
/// response with the (non-generic) target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultTypeMapping {
    /// Source of the rule; only `plain` is meaningful.
    pub source_type_name: Option<String>,
    /// Result envelope type.
    pub target: TargetType,
}

impl ResultTypeMapping {
    /// Creates a result mapping without source.
    pub fn new(target: TargetType) -> Self {
        Self {
            source_type_name: None,
            target,
        }
    }

    /// `plain`: responses are not wrapped.
    pub fn is_plain(&self) -> bool {
        self.source_type_name.is_none() && self.target.is_plain()
    }

    /// `plain => Type`: responses are replaced with the target type.
    pub fn is_plain_mapping(&self) -> bool {
        self.source_type_name.as_deref() == Some(PLAIN)
    }
}

impl PackagePlaceholder for ResultTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            source_type_name: self.source_type_name.clone(),
            target: self.target.resolve_package(package_name),
        }
    }
}

impl fmt::Display for ResultTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_type_name {
            Some(source) => write!(f, "{} => {}", source, self.target),
            None => write!(f, "{}", self.target),
        }
    }
}

/// Wraps nullable properties in a null-safe type, e.g. `JsonNullable`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullTypeMapping {
    /// Null wrapper type.
    pub target: TargetType,
    /// Optional initializer expression, e.g. `JsonNullable.undefined()`.
    pub undefined: Option<String>,
}

impl PackagePlaceholder for NullTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            target: self.target.resolve_package(package_name),
            undefined: self.undefined.clone(),
        }
    }
}

impl fmt::Display for NullTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "null => {}", self.target)?;
        if let Some(init) = &self.undefined {
            write!(f, " = {}", init)?;
        }
        Ok(())
    }
}

/// Adds an extra parameter to generated endpoint methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddParameterTypeMapping {
    /// Name of the additional parameter.
    pub parameter_name: String,
    /// Type of the additional parameter.
    pub mapping: TypeMapping,
    /// Optional annotation of the additional parameter.
    pub annotation: Option<Annotation>,
}

impl PackagePlaceholder for AddParameterTypeMapping {
    fn resolve_package(&self, package_name: &str) -> Self {
        Self {
            parameter_name: self.parameter_name.clone(),
            mapping: self.mapping.resolve_package(package_name),
            annotation: self
                .annotation
                .as_ref()
                .map(|a| a.resolve_package(package_name)),
        }
    }
}

impl fmt::Display for AddParameterTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "add: {} => ", self.parameter_name)?;
        if let Some(annotation) = &self.annotation {
            write!(f, "{} ", annotation)?;
        }
        write!(f, "{}", self.mapping.target)
    }
}

/// Removes a parameter from generated endpoint methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropParameterTypeMapping {
    /// Name of the dropped parameter.
    pub parameter_name: String,
}

impl PackagePlaceholder for DropParameterTypeMapping {
    fn resolve_package(&self, _package_name: &str) -> Self {
        self.clone()
    }
}

impl fmt::Display for DropParameterTypeMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "drop: {}", self.parameter_name)
    }
}

/// How request bodies are passed to generated endpoint methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum BodyStyle {
    /// The body is a single object parameter.
    Object,
    /// The body's properties become individual parameters.
    Destructure,
}

impl fmt::Display for BodyStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BodyStyle::Object => write!(f, "object"),
            BodyStyle::Destructure => write!(f, "destructure"),
        }
    }
}

impl FromStr for BodyStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [BodyStyle::Object, BodyStyle::Destructure]
            .into_iter()
            .find(|style| style.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::General(format!("Unknown body style: {}", s)))
    }
}

impl TryFrom<String> for BodyStyle {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Which responses are used to build the result type of an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum ResultStyle {
    /// Only success responses.
    Success,
    /// All responses.
    All,
}

impl fmt::Display for ResultStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultStyle::Success => write!(f, "success"),
            ResultStyle::All => write!(f, "all"),
        }
    }
}

impl FromStr for ResultStyle {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        [ResultStyle::Success, ResultStyle::All]
            .into_iter()
            .find(|style| style.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::General(format!("Unknown result style: {}", s)))
    }
}

impl TryFrom<String> for ResultStyle {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A list-valued mapping rule.
///
/// Single-valued settings (`result`, `null`, `exclude`, ...) are stored as
/// typed fields on each scope level instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "kebab-case")]
pub enum Mapping {
    /// Source type => target type.
    Type(TypeMapping),
    /// Parameter name => target type.
    Name(NameTypeMapping),
    /// Content type => target type.
    ContentType(ContentTypeMapping),
    /// Source type @ annotation.
    Annotation(AnnotationTypeMapping),
    /// Parameter name @ annotation.
    AnnotationName(AnnotationNameMapping),
    /// Source type =+ interface.
    Interface(InterfaceTypeMapping),
    /// Additional parameter.
    AddParameter(AddParameterTypeMapping),
    /// Dropped parameter.
    DropParameter(DropParameterTypeMapping),
}

impl Mapping {
    /// The rule as a type rule.
    pub fn as_type(&self) -> Option<&TypeMapping> {
        match self {
            Mapping::Type(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as a parameter name rule.
    pub fn as_name(&self) -> Option<&NameTypeMapping> {
        match self {
            Mapping::Name(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as a content type rule.
    pub fn as_content_type(&self) -> Option<&ContentTypeMapping> {
        match self {
            Mapping::ContentType(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as an annotation rule.
    pub fn as_annotation(&self) -> Option<&AnnotationTypeMapping> {
        match self {
            Mapping::Annotation(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as a parameter annotation rule.
    pub fn as_annotation_name(&self) -> Option<&AnnotationNameMapping> {
        match self {
            Mapping::AnnotationName(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as an interface rule.
    pub fn as_interface(&self) -> Option<&InterfaceTypeMapping> {
        match self {
            Mapping::Interface(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as an additional parameter rule.
    pub fn as_add_parameter(&self) -> Option<&AddParameterTypeMapping> {
        match self {
            Mapping::AddParameter(m) => Some(m),
            _ => None,
        }
    }

    /// The rule as a dropped parameter rule.
    pub fn as_drop_parameter(&self) -> Option<&DropParameterTypeMapping> {
        match self {
            Mapping::DropParameter(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mapping::Type(m) => fmt::Display::fmt(m, f),
            Mapping::Name(m) => fmt::Display::fmt(m, f),
            Mapping::ContentType(m) => fmt::Display::fmt(m, f),
            Mapping::Annotation(m) => fmt::Display::fmt(m, f),
            Mapping::AnnotationName(m) => fmt::Display::fmt(m, f),
            Mapping::Interface(m) => fmt::Display::fmt(m, f),
            Mapping::AddParameter(m) => fmt::Display::fmt(m, f),
            Mapping::DropParameter(m) => fmt::Display::fmt(m, f),
        }
    }
}
