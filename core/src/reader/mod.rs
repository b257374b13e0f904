#![deny(missing_docs)]

//! # Reader Module
//!
//! Loads a rule document from a file or from inline YAML and converts it.
//!
//! - **document**: serde model of the YAML document.
//! - **converter**: document to repository and options.

pub mod converter;
pub mod document;

pub use converter::{convert_mappings, convert_options};
pub use document::MappingDocument;

use crate::error::{AppError, AppResult};
use std::fs;

/// Oldest supported document version.
const MIN_VERSION: u32 = 2;

/// Loads a rule document.
///
/// An empty `source` means "no mapping" and yields `None`. A source ending in
/// `.yaml` or `.yml` is read from disk, anything else is parsed as YAML text.
pub fn read_mapping(source: &str) -> AppResult<Option<MappingDocument>> {
    let source = source.trim();
    if source.is_empty() {
        return Ok(None);
    }

    let yaml = if source.ends_with(".yaml") || source.ends_with(".yml") {
        log::debug!("reading mapping file {}", source);
        fs::read_to_string(source)?
    } else {
        source.to_string()
    };

    if yaml.trim().is_empty() {
        return Ok(None);
    }

    let document: MappingDocument = serde_yaml::from_str(&yaml)?;
    check_version(&document)?;
    Ok(Some(document))
}

fn version_text(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(text) => text.trim().to_string(),
        other => serde_yaml::to_string(other)
            .map(|text| text.trim().to_string())
            .unwrap_or_default(),
    }
}

/// Major number of a `vMAJOR[.MINOR]` version.
fn major_version(version: &str) -> Option<u32> {
    let number = version.strip_prefix('v')?;
    let (major, minor) = match number.split_once('.') {
        Some((major, minor)) => (major, Some(minor)),
        None => (number, None),
    };
    if let Some(minor) = minor {
        minor.parse::<u32>().ok()?;
    }
    major.parse::<u32>().ok()
}

fn check_version(document: &MappingDocument) -> AppResult<()> {
    let version = match (&document.version, &document.spring_version) {
        (Some(version), _) => version_text(version),
        (None, Some(version)) => {
            log::warn!(
                "'openapi-processor-spring' is deprecated, use 'openapi-processor-mapping' to set the mapping version"
            );
            version_text(version)
        }
        (None, None) => {
            return Err(AppError::MappingFormat(
                "missing 'openapi-processor-mapping' version key, please update the mapping to the latest format".into(),
            ))
        }
    };

    match major_version(&version) {
        Some(major) if major >= MIN_VERSION => Ok(()),
        _ => {
            log::error!("unsupported mapping version '{}'", version);
            Err(AppError::MappingFormat(format!(
                "unsupported mapping version '{}', please update the mapping to the latest format",
                version
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_empty_source_is_no_mapping() {
        assert!(read_mapping("").unwrap().is_none());
        assert!(read_mapping("  \n").unwrap().is_none());
    }

    #[test]
    fn test_read_inline_yaml() {
        let document = read_mapping(
            "openapi-processor-mapping: v8\noptions:\n  package-name: io.example\n",
        )
        .unwrap()
        .unwrap();

        assert_eq!(document.options.package_name.as_deref(), Some("io.example"));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "openapi-processor-mapping: v2").unwrap();
        writeln!(file, "map:\n  result: org.x.ResponseEntity").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let document = read_mapping(&path).unwrap().unwrap();

        assert_eq!(document.map.result.as_deref(), Some("org.x.ResponseEntity"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = read_mapping("/does/not/exist/mapping.yaml");
        assert!(matches!(result, Err(AppError::Io(_))));
    }

    #[test]
    fn test_version_checks() {
        for yaml in [
            "openapi-processor-mapping: v1\n",
            "openapi-processor-mapping: 8\n",
            "map:\n  result: plain\n",
        ] {
            let err = read_mapping(yaml).unwrap_err();
            assert!(matches!(err, AppError::MappingFormat(_)));
            assert!(err
                .to_string()
                .contains("please update the mapping to the latest format"));
        }

        assert!(read_mapping("openapi-processor-spring: v2\n").unwrap().is_some());
    }

    #[test]
    fn test_minor_versions() {
        for yaml in [
            "openapi-processor-mapping: v2.1\nmap:\n  result: plain\n",
            "openapi-processor-mapping: v12.0\n",
        ] {
            assert!(read_mapping(yaml).unwrap().is_some());
        }

        for yaml in [
            "openapi-processor-mapping: v1.9\n",
            "openapi-processor-mapping: v2.x\n",
            "openapi-processor-mapping: v2.\n",
            "openapi-processor-mapping: v.2\n",
        ] {
            assert!(matches!(
                read_mapping(yaml),
                Err(AppError::MappingFormat(_))
            ));
        }
    }
}
