#![deny(missing_docs)]

//! # Resolve Command
//!
//! Builds a query from the command line, runs one finder lookup and prints
//! the result as text or JSON.

use crate::error::{CliError, CliResult};
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Display;
use typemap_core::{load, HttpMethod, MappingConfig, MappingFinder, MappingQuery};

/// The finder lookup to run.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    /// Type rule of a schema.
    Type,
    /// Type rule of a schema property.
    Schema,
    /// Type rule of a parameter.
    Parameter,
    /// Name rule of a parameter.
    ParameterName,
    /// Content type rule of a response.
    ContentType,
    /// Result envelope.
    Result,
    /// Result style.
    ResultStyle,
    /// Result status flag.
    ResultStatus,
    /// Single wrapper.
    Single,
    /// Multi wrapper.
    Multi,
    /// Null wrapper.
    Null,
    /// Body style.
    BodyStyle,
    /// Annotations of a schema.
    Annotations,
    /// Annotations of a schema property.
    SchemaAnnotations,
    /// Annotations of a parameter type.
    ParameterAnnotations,
    /// Annotations of a parameter name.
    ParameterNameAnnotations,
    /// Interfaces of a schema.
    Interfaces,
    /// Interfaces of a parameter type.
    ParameterInterfaces,
    /// Additional endpoint parameters.
    AddParameters,
    /// Dropped endpoint parameters.
    DropParameters,
    /// Whether the endpoint is excluded.
    Exclude,
    /// Annotations of a vendor extension.
    Extension,
}

/// Arguments for the resolve command.
#[derive(clap::Args, Debug, Clone)]
pub struct ResolveArgs {
    /// Rule document: a `.yaml`/`.yml` file or inline YAML.
    #[clap(long, short, env = "TYPEMAP_MAPPING")]
    pub mapping: String,

    /// Lookup to run.
    #[clap(value_enum)]
    pub kind: LookupKind,

    /// Endpoint path, e.g. `/foo`.
    #[clap(long)]
    pub path: Option<String>,

    /// Endpoint method, e.g. `get`.
    #[clap(long)]
    pub method: Option<HttpMethod>,

    /// Schema, property or parameter name.
    #[clap(long)]
    pub name: Option<String>,

    /// OpenAPI type, optionally with format: `string:date-time`.
    #[clap(long = "type")]
    pub type_name: Option<String>,

    /// Response content type.
    #[clap(long)]
    pub content_type: Option<String>,

    /// The schema is a primitive.
    #[clap(long)]
    pub primitive: bool,

    /// The schema is an array.
    #[clap(long)]
    pub array: bool,

    /// Rules for `object` apply as well.
    #[clap(long)]
    pub allow_object: bool,

    /// Vendor extension name for the `extension` lookup, e.g. `x-foo`.
    #[clap(long)]
    pub extension: Option<String>,

    /// Extension values for the `extension` lookup.
    #[clap(long = "value")]
    pub values: Vec<String>,

    /// Print the result as JSON.
    #[clap(long)]
    pub json: bool,
}

impl ResolveArgs {
    /// Builds the finder query.
    pub fn query(&self) -> MappingQuery {
        let mut query = MappingQuery::new();
        if let Some(path) = &self.path {
            query = query.with_path(path);
        }
        if let Some(method) = self.method {
            query = query.with_method(method);
        }
        if let Some(name) = &self.name {
            query = query.with_name(name);
        }
        if let Some(type_name) = &self.type_name {
            query = query.with_type(type_name);
        }
        if let Some(content_type) = &self.content_type {
            query = query.with_content_type(content_type);
        }
        if self.primitive {
            query = query.primitive();
        }
        if self.array {
            query = query.array();
        }
        if self.allow_object {
            query = query.allow_object();
        }
        query
    }
}

/// Result of a lookup, in both output forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    /// One line per found rule or value.
    pub lines: Vec<String>,
    /// The found rules or values as JSON.
    pub json: serde_json::Value,
}

impl Resolved {
    fn from_items<T: Serialize + Display>(items: &[T]) -> CliResult<Self> {
        Ok(Self {
            lines: items.iter().map(|item| item.to_string()).collect(),
            json: serde_json::to_value(items)?,
        })
    }

    fn from_option<T: Serialize + Display>(item: Option<T>) -> CliResult<Self> {
        let items: Vec<T> = item.into_iter().collect();
        Self::from_items(&items)
    }
}

/// Runs the lookup selected by `args`.
pub fn resolve(finder: &MappingFinder<'_>, args: &ResolveArgs) -> CliResult<Resolved> {
    let query = args.query();

    match args.kind {
        LookupKind::Type => Resolved::from_option(finder.find_type_mapping(&query)?),
        LookupKind::Schema => Resolved::from_option(finder.find_schema_type_mapping(&query)?),
        LookupKind::Parameter => {
            Resolved::from_option(finder.find_parameter_type_mapping(&query)?)
        }
        LookupKind::ParameterName => {
            Resolved::from_option(finder.find_parameter_name_type_mapping(&query)?)
        }
        LookupKind::ContentType => {
            Resolved::from_option(finder.find_content_type_mapping(&query)?)
        }
        LookupKind::Result => Resolved::from_option(finder.get_result_type_mapping(&query)),
        LookupKind::ResultStyle => Resolved::from_option(finder.get_result_style(&query)),
        LookupKind::ResultStatus => Resolved::from_option(finder.get_result_status(&query)),
        LookupKind::Single => Resolved::from_option(finder.get_single_type_mapping(&query)),
        LookupKind::Multi => Resolved::from_option(finder.get_multi_type_mapping(&query)),
        LookupKind::Null => Resolved::from_option(finder.get_null_type_mapping(&query)),
        LookupKind::BodyStyle => Resolved::from_option(finder.get_body_style(&query)),
        LookupKind::Annotations => {
            Resolved::from_items(&finder.find_annotation_type_mappings(&query))
        }
        LookupKind::SchemaAnnotations => {
            Resolved::from_items(&finder.find_annotation_schema_type_mappings(&query))
        }
        LookupKind::ParameterAnnotations => {
            Resolved::from_items(&finder.find_annotation_parameter_type_mappings(&query))
        }
        LookupKind::ParameterNameAnnotations => {
            Resolved::from_items(&finder.find_annotation_parameter_name_type_mappings(&query))
        }
        LookupKind::Interfaces => {
            Resolved::from_items(&finder.find_interface_type_mappings(&query))
        }
        LookupKind::ParameterInterfaces => {
            Resolved::from_items(&finder.find_interface_parameter_type_mappings(&query))
        }
        LookupKind::AddParameters => {
            Resolved::from_items(&finder.find_add_parameter_type_mappings(&query))
        }
        LookupKind::DropParameters => {
            Resolved::from_items(&finder.find_drop_parameter_type_mappings(&query))
        }
        LookupKind::Exclude => Resolved::from_option(Some(finder.is_endpoint_excluded(&query))),
        LookupKind::Extension => {
            let extension = args.extension.as_deref().ok_or_else(|| {
                CliError::General("the extension lookup needs --extension".to_string())
            })?;
            let values: Vec<&str> = args.values.iter().map(String::as_str).collect();
            Resolved::from_items(&finder.find_extension_annotations(extension, &values))
        }
    }
}

/// Executes the resolve command.
pub fn execute(args: &ResolveArgs, trace: bool) -> CliResult<()> {
    let MappingConfig {
        repository,
        mut options,
    } = load(&args.mapping)?.unwrap_or_default();

    if trace {
        options.logging.mapping = true;
    }

    let finder = MappingFinder::new(&repository, &options);
    log::debug!("resolving {:?} for ({})", args.kind, args.query());
    let resolved = resolve(&finder, args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&resolved.json)?);
    } else if resolved.lines.is_empty() {
        println!("no mapping found for ({})", args.query());
    } else {
        for line in &resolved.lines {
            println!("{}", line);
        }
    }
    Ok(())
}
