#![deny(missing_docs)]

//! # Data Types
//!
//! Minimal model of the target-language types produced for schemas.
//!
//! The wrappers take a converted `DataType` and wrap it according to the
//! resolved mapping rules (result envelope, reactive single/multi, null
//! wrapper). Emission layers only need the rendered type name and the
//! imports.

use serde::Serialize;
use std::collections::BTreeSet;

/// Name of the "no content" type.
const VOID: &str = "void";

/// Name of the "no content" type inside a result envelope.
const VOID_WRAPPED: &str = "Void";

/// Package of the wrapped "no content" type.
const JAVA_LANG: &str = "java.lang";

fn qualified(package: &str, name: &str) -> Option<String> {
    if package.is_empty() {
        None
    } else {
        Some(format!("{}.{}", package, name))
    }
}

/// A generic parameter of a mapped type, e.g. the `Foo` in `Wrap<Foo>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenericDataType {
    /// Simple type name (with model suffix, if generated).
    pub name: String,
    /// Package of the type.
    pub package: String,
    /// Nested generic parameters.
    pub generics: Vec<GenericDataType>,
}

impl GenericDataType {
    /// Rendered type, e.g. `Map<String, List<Foo>>`.
    pub fn type_name(&self) -> String {
        if self.generics.is_empty() {
            return self.name.clone();
        }
        let generics: Vec<String> = self.generics.iter().map(|g| g.type_name()).collect();
        format!("{}<{}>", self.name, generics.join(", "))
    }

    /// Imports of the type and its generic parameters; none for `?`.
    pub fn imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        if self.name == "?" {
            return imports;
        }
        imports.extend(qualified(&self.package, &self.name));
        for generic in &self.generics {
            imports.extend(generic.imports());
        }
        imports
    }
}

/// A response type wrapped in a result envelope, e.g. `ResponseEntity<Foo>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultDataType {
    /// Simple name of the envelope.
    pub name: String,
    /// Package of the envelope.
    pub package: String,
    /// The wrapped response type.
    pub data_type: Box<DataType>,
    /// Generic parameters of the envelope; the first one wraps the response.
    pub generics: Vec<GenericDataType>,
    /// `plain => Type`: the envelope replaces the response.
    pub plain_replacement: bool,
}

/// A type wrapped in a null-safe wrapper, e.g. `JsonNullable<String>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NullDataType {
    /// Simple name of the wrapper.
    pub name: String,
    /// Package of the wrapper.
    pub package: String,
    /// The wrapped type.
    pub data_type: Box<DataType>,
    /// Initializer expression for an undefined value.
    pub init: Option<String>,
}

/// A target type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DataType {
    /// A named type, e.g. `java.lang.String` or a generated model.
    Simple {
        /// Simple name.
        name: String,
        /// Package.
        package: String,
    },
    /// A collection, e.g. `java.util.List<Foo>`.
    Collection {
        /// Simple name of the collection type.
        name: String,
        /// Package of the collection type.
        package: String,
        /// Item type.
        item: Box<DataType>,
    },
    /// A collection replaced by a mapped type, e.g. `Flux<Foo>`.
    MappedCollection {
        /// Simple name of the mapped type.
        name: String,
        /// Package of the mapped type.
        package: String,
        /// Item type.
        item: Box<DataType>,
        /// Created by the multi wrapper.
        multi: bool,
    },
    /// A type wrapped in a single-value type, e.g. `Mono<Foo>`.
    Single {
        /// Simple name of the wrapper.
        name: String,
        /// Package of the wrapper.
        package: String,
        /// Wrapped type.
        data_type: Box<DataType>,
    },
    /// A result envelope.
    Result(ResultDataType),
    /// A null wrapper.
    Null(NullDataType),
    /// No content.
    None {
        /// Rendered as the object type `Void` inside a result envelope.
        wrapped_in_result: bool,
    },
}

impl DataType {
    /// Creates a simple type from a fully qualified name.
    pub fn simple(qualified_name: &str) -> Self {
        let (package, name) = match qualified_name.rfind('.') {
            Some(pos) => (&qualified_name[..pos], &qualified_name[pos + 1..]),
            None => ("", qualified_name),
        };
        DataType::Simple {
            name: name.to_string(),
            package: package.to_string(),
        }
    }

    /// Creates a collection of `item` from a fully qualified collection name.
    pub fn collection(qualified_name: &str, item: DataType) -> Self {
        match DataType::simple(qualified_name) {
            DataType::Simple { name, package } => DataType::Collection {
                name,
                package,
                item: Box::new(item),
            },
            other => other,
        }
    }

    /// Item type of collection types.
    pub fn item(&self) -> Option<&DataType> {
        match self {
            DataType::Collection { item, .. } | DataType::MappedCollection { item, .. } => {
                Some(item)
            }
            _ => None,
        }
    }

    /// Whether this is a (mapped) collection.
    pub fn is_collection(&self) -> bool {
        self.item().is_some()
    }

    /// Simple name without generic parameters.
    pub fn name(&self) -> &str {
        match self {
            DataType::Simple { name, .. }
            | DataType::Collection { name, .. }
            | DataType::MappedCollection { name, .. }
            | DataType::Single { name, .. } => name,
            DataType::Result(result) => &result.name,
            DataType::Null(null) => &null.name,
            DataType::None { wrapped_in_result } => {
                if *wrapped_in_result {
                    VOID_WRAPPED
                } else {
                    VOID
                }
            }
        }
    }

    /// Package of the outermost type.
    pub fn package(&self) -> &str {
        match self {
            DataType::Simple { package, .. }
            | DataType::Collection { package, .. }
            | DataType::MappedCollection { package, .. }
            | DataType::Single { package, .. } => package,
            DataType::Result(result) => &result.package,
            DataType::Null(null) => &null.package,
            DataType::None { wrapped_in_result } => {
                if *wrapped_in_result {
                    JAVA_LANG
                } else {
                    ""
                }
            }
        }
    }

    /// Rendered type, e.g. `ResponseEntity<List<Foo>>`.
    pub fn type_name(&self) -> String {
        match self {
            DataType::Simple { name, .. } => name.clone(),
            DataType::Collection { name, item, .. }
            | DataType::MappedCollection { name, item, .. } => {
                format!("{}<{}>", name, item.type_name())
            }
            DataType::Single {
                name, data_type, ..
            } => format!("{}<{}>", name, data_type.type_name()),
            DataType::Result(result) => {
                if result.plain_replacement {
                    return result.name.clone();
                }
                match result.generics.first() {
                    Some(generic) => format!(
                        "{}<{}<{}>>",
                        result.name,
                        generic.type_name(),
                        result.data_type.type_name()
                    ),
                    None => format!("{}<{}>", result.name, result.data_type.type_name()),
                }
            }
            DataType::Null(null) => format!("{}<{}>", null.name, null.data_type.type_name()),
            DataType::None { .. } => self.name().to_string(),
        }
    }

    /// Imports needed to use the type.
    pub fn imports(&self) -> BTreeSet<String> {
        let mut imports = BTreeSet::new();
        match self {
            DataType::Simple { name, package } => {
                imports.extend(qualified(package, name));
            }
            DataType::Collection {
                name,
                package,
                item,
            }
            | DataType::MappedCollection {
                name,
                package,
                item,
                ..
            } => {
                imports.extend(qualified(package, name));
                imports.extend(item.imports());
            }
            DataType::Single {
                name,
                package,
                data_type,
            } => {
                imports.extend(qualified(package, name));
                imports.extend(data_type.imports());
            }
            DataType::Result(result) => {
                imports.extend(qualified(&result.package, &result.name));
                if !result.plain_replacement {
                    imports.extend(result.data_type.imports());
                    for generic in &result.generics {
                        imports.extend(generic.imports());
                    }
                }
            }
            DataType::Null(null) => {
                imports.extend(qualified(&null.package, &null.name));
                imports.extend(null.data_type.imports());
            }
            DataType::None { .. } => {}
        }
        imports
    }
}
