#![deny(missing_docs)]

//! # Document Converter
//!
//! Turns a [`MappingDocument`] into the immutable [`MappingRepository`] and
//! the [`ApiOptions`] of a run.
//!
//! Every rule string is parsed with [`parse_mapping`]; a rule whose shape
//! does not fit its position (e.g. an interface rule in `responses`) is a
//! bad mapping error.

use crate::error::{AppError, AppResult};
use crate::mapping::dsl::{parse_mapping, MappingKind, ParsedMapping};
use crate::mapping::models::{
    AddParameterTypeMapping, AnnotationNameMapping, AnnotationTypeMapping, ContentTypeMapping,
    DropParameterTypeMapping, InterfaceTypeMapping, Mapping, NameTypeMapping, NullTypeMapping,
    ResultTypeMapping, TargetType, TypeMapping, PLAIN,
};
use crate::mapping::store::{EndpointMappings, MappingRepository, Mappings, TypeMappings};
use crate::options::{ApiOptions, DEFAULT_PACKAGE_NAME};
use crate::reader::document::{BlockDoc, MappingDocument, ParameterDoc, ResponseDoc, TypeDoc};
use indexmap::IndexMap;

fn bad(rule: &str, position: &str) -> AppError {
    AppError::BadMapping(format!("'{}' is not a valid {} mapping", rule, position))
}

/// Converts the options of a document, falling back to the default package.
pub fn convert_options(document: &MappingDocument) -> ApiOptions {
    let package_name = match &document.options.package_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => {
            log::warn!(
                "no 'options.package-name' set, using default package '{}'",
                DEFAULT_PACKAGE_NAME
            );
            DEFAULT_PACKAGE_NAME.to_string()
        }
    };

    ApiOptions {
        package_name,
        model_name_suffix: document
            .options
            .model_name_suffix
            .clone()
            .unwrap_or_default(),
        logging: document.logging.clone(),
    }
}

/// Converts the `map` block of a document into a repository.
pub fn convert_mappings(document: &MappingDocument) -> AppResult<MappingRepository> {
    let map = &document.map;
    if !map.methods().is_empty() {
        log::warn!("method keys are only supported below 'map.paths', ignoring them");
    }

    let global = convert_block(map, "global")?;

    let mut endpoints = IndexMap::new();
    for (path, block) in &map.paths {
        if !block.paths.is_empty() || !block.extensions.is_empty() {
            log::warn!("ignoring nested 'paths'/'extensions' of path '{}'", path);
        }

        let mut methods = IndexMap::new();
        for (method, method_block) in block.methods() {
            let location = format!("{} {}", method, path);
            methods.insert(method, convert_block(method_block, &location)?);
        }

        endpoints.insert(
            path.clone(),
            EndpointMappings {
                mappings: convert_block(block, path)?,
                methods,
            },
        );
    }

    let mut extensions = IndexMap::new();
    for (name, rules) in &map.extensions {
        let converted = rules
            .values()
            .iter()
            .map(|rule| convert_extension(rule))
            .collect::<AppResult<Vec<_>>>()?;
        extensions.insert(name.clone(), converted);
    }

    let repository = MappingRepository::new(global, endpoints, extensions);
    log::debug!(
        "converted mapping: {} global rules, {} endpoints, {} extensions",
        repository.global().rule_count(),
        repository.endpoints().count(),
        repository.extension_names().count()
    );
    Ok(repository)
}

fn convert_block(block: &BlockDoc, location: &str) -> AppResult<Mappings> {
    log::trace!("converting mapping block '{}'", location);

    let mut mappings = Mappings {
        result_style: block.result_style,
        result_status: block.result_status,
        body_style: block.body_style,
        exclude: block.exclude,
        ..Mappings::default()
    };

    if let Some(result) = &block.result {
        mappings.result = Some(convert_result(result)?);
    }
    if let Some(single) = &block.single {
        mappings.single = Some(convert_wrapper(single, "single")?);
    }
    if let Some(multi) = &block.multi {
        mappings.multi = Some(convert_wrapper(multi, "multi")?);
    }
    if let Some(null) = &block.null {
        mappings.null = Some(convert_null(null)?);
    }

    mappings.types = convert_types(&block.types)?;
    mappings.schemas = convert_types(&block.schemas)?;
    mappings.parameters = TypeMappings::new(
        block
            .parameters
            .iter()
            .map(convert_parameter)
            .collect::<AppResult<_>>()?,
    );
    mappings.responses = TypeMappings::new(
        block
            .responses
            .iter()
            .map(convert_response)
            .collect::<AppResult<_>>()?,
    );
    Ok(mappings)
}

fn convert_types(types: &[TypeDoc]) -> AppResult<TypeMappings> {
    let mappings = types
        .iter()
        .map(|doc| convert_type(&doc.rule, &doc.generics))
        .collect::<AppResult<_>>()?;
    Ok(TypeMappings::new(mappings))
}

/// `result: plain`, `result: Type` or `result: plain => Type`.
fn convert_result(rule: &str) -> AppResult<ResultTypeMapping> {
    let parsed = parse_mapping(rule)?;
    match (parsed.kind, parsed.source_type.as_deref(), parsed.target) {
        (MappingKind::Type, None, Some(target)) => Ok(ResultTypeMapping::new(target)),
        (MappingKind::Map, Some(PLAIN), Some(target)) => Ok(ResultTypeMapping {
            source_type_name: Some(PLAIN.to_string()),
            target,
        }),
        _ => Err(bad(rule, "result")),
    }
}

/// `single: Type` and `multi: Type`.
fn convert_wrapper(rule: &str, source: &str) -> AppResult<TypeMapping> {
    let parsed = parse_mapping(rule)?;
    match (parsed.kind, parsed.target) {
        (MappingKind::Type, Some(target)) if !parsed.primitive => {
            Ok(TypeMapping::new(source, target))
        }
        _ => Err(bad(rule, source)),
    }
}

/// `null: Type` or `null: Type = init`.
fn convert_null(rule: &str) -> AppResult<NullTypeMapping> {
    let (target, undefined) = match rule.split_once(" = ") {
        Some((target, init)) => (target, Some(init.trim().to_string())),
        None => (rule, None),
    };

    let parsed = parse_mapping(target)?;
    match (parsed.kind, parsed.target) {
        (MappingKind::Type, Some(target)) => Ok(NullTypeMapping { target, undefined }),
        _ => Err(bad(rule, "null")),
    }
}

/// Target of a `=>` or `=+` rule; explicit `generics` apply if the rule has none.
fn mapped_target(parsed: &ParsedMapping, generics: &[String]) -> AppResult<TargetType> {
    let Some(target) = parsed.target.clone() else {
        return Err(AppError::BadMapping("mapping without target type".into()));
    };
    if !target.generics.is_empty() || generics.is_empty() {
        return Ok(target);
    }

    let generics = generics
        .iter()
        .map(|generic| {
            let parsed = parse_mapping(generic)?;
            match (parsed.kind, parsed.target, parsed.source_type) {
                (MappingKind::Type, Some(target), _) => Ok(target),
                (MappingKind::Type, None, Some(name)) if name == "?" => Ok(TargetType::new(name)),
                _ => Err(bad(generic, "generic")),
            }
        })
        .collect::<AppResult<Vec<_>>>()?;
    Ok(TargetType::with_generics(target.type_name, generics))
}

fn type_mapping(parsed: &ParsedMapping, generics: &[String]) -> AppResult<TypeMapping> {
    Ok(TypeMapping {
        source_type_name: parsed.source_type.clone(),
        source_type_format: parsed.source_format.clone(),
        target: mapped_target(parsed, generics)?,
        primitive: parsed.primitive,
        primitive_array: parsed.primitive_array,
    })
}

fn source_of(parsed: &ParsedMapping, rule: &str) -> AppResult<String> {
    parsed
        .source_type
        .clone()
        .ok_or_else(|| AppError::BadMapping(format!("'{}' has no source", rule)))
}

/// Entry of `types`, `schemas` or `parameters[].type`.
fn convert_type(rule: &str, generics: &[String]) -> AppResult<Mapping> {
    let parsed = parse_mapping(rule)?;
    match parsed.kind {
        MappingKind::Map if parsed.annotation.is_none() => {
            Ok(Mapping::Type(type_mapping(&parsed, generics)?))
        }
        MappingKind::Annotate => Ok(Mapping::Annotation(AnnotationTypeMapping {
            source_type_name: source_of(&parsed, rule)?,
            source_type_format: parsed.source_format,
            annotation: parsed.annotation.ok_or_else(|| bad(rule, "annotation"))?,
        })),
        MappingKind::Implement => {
            if parsed.target.is_none() {
                return Err(bad(rule, "interface"));
            }
            Ok(Mapping::Interface(InterfaceTypeMapping {
                source_type_name: source_of(&parsed, rule)?,
                target: mapped_target(&parsed, generics)?,
            }))
        }
        _ => Err(bad(rule, "type")),
    }
}

fn convert_parameter(doc: &ParameterDoc) -> AppResult<Mapping> {
    match doc {
        ParameterDoc::Name { name, generics } => {
            let parsed = parse_mapping(name)?;
            match parsed.kind {
                MappingKind::Map if parsed.annotation.is_none() => {
                    let mut mapping = type_mapping(&parsed, generics)?;
                    let parameter_name = source_of(&parsed, name)?;
                    mapping.source_type_format = None;
                    Ok(Mapping::Name(NameTypeMapping {
                        parameter_name,
                        mapping,
                    }))
                }
                MappingKind::Annotate => Ok(Mapping::AnnotationName(AnnotationNameMapping {
                    name: source_of(&parsed, name)?,
                    annotation: parsed.annotation.ok_or_else(|| bad(name, "annotation"))?,
                })),
                _ => Err(bad(name, "parameter name")),
            }
        }
        ParameterDoc::Add { add, generics } => {
            let parsed = parse_mapping(add)?;
            if parsed.kind != MappingKind::Map {
                return Err(bad(add, "add parameter"));
            }
            let parameter_name = source_of(&parsed, add)?;
            let mapping = TypeMapping {
                source_type_name: None,
                source_type_format: None,
                ..type_mapping(&parsed, generics)?
            };
            Ok(Mapping::AddParameter(AddParameterTypeMapping {
                parameter_name,
                mapping,
                annotation: parsed.annotation,
            }))
        }
        ParameterDoc::Drop { drop } => {
            let parameter_name = drop.trim();
            if parameter_name.is_empty() {
                return Err(bad(drop, "drop parameter"));
            }
            Ok(Mapping::DropParameter(DropParameterTypeMapping {
                parameter_name: parameter_name.to_string(),
            }))
        }
        ParameterDoc::Type(doc) => convert_type(&doc.rule, &doc.generics),
    }
}

fn convert_response(doc: &ResponseDoc) -> AppResult<Mapping> {
    let parsed = parse_mapping(&doc.content)?;
    if parsed.kind != MappingKind::Map || parsed.annotation.is_some() {
        return Err(bad(&doc.content, "response"));
    }

    let content_type = source_of(&parsed, &doc.content)?;
    let mapping = TypeMapping {
        source_type_name: None,
        source_type_format: None,
        ..type_mapping(&parsed, &doc.generics)?
    };
    Ok(Mapping::ContentType(ContentTypeMapping {
        content_type,
        mapping,
    }))
}

/// Extensions only take annotation rules: `value @ io.oap.Annotation`.
fn convert_extension(rule: &str) -> AppResult<AnnotationNameMapping> {
    let parsed = parse_mapping(rule)?;
    match (parsed.kind, parsed.source_type, parsed.annotation) {
        (MappingKind::Annotate, Some(name), Some(annotation)) => {
            Ok(AnnotationNameMapping { name, annotation })
        }
        _ => Err(bad(rule, "extension")),
    }
}
