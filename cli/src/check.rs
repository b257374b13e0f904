#![deny(missing_docs)]

//! # Check Command
//!
//! Loads a rule document, reports conversion errors and prints a summary of
//! its scopes.

use crate::error::{CliError, CliResult};
use typemap_core::{load, MappingConfig};

/// Arguments for the check command.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Rule document: a `.yaml`/`.yml` file or inline YAML.
    #[clap(long, short, env = "TYPEMAP_MAPPING")]
    pub mapping: String,
}

/// Builds the summary lines of a loaded document.
pub fn summary(config: &MappingConfig) -> Vec<String> {
    let repository = &config.repository;
    let mut lines = vec![
        format!("package: {}", config.options.package_name),
        format!("global: {} rules", repository.global().rule_count()),
    ];

    for (path, endpoint) in repository.endpoints() {
        lines.push(format!(
            "path {}: {} rules{}",
            path,
            endpoint.mappings().rule_count(),
            if endpoint.mappings().is_excluded() {
                " (excluded)"
            } else {
                ""
            }
        ));
        for (method, mappings) in endpoint.methods() {
            lines.push(format!(
                "  {}: {} rules{}",
                method,
                mappings.rule_count(),
                if mappings.is_excluded() { " (excluded)" } else { "" }
            ));
        }
    }

    for name in repository.extension_names() {
        lines.push(format!(
            "extension {}: {} rules",
            name,
            repository.extension(name).len()
        ));
    }
    lines
}

/// Executes the check command.
pub fn execute(args: &CheckArgs) -> CliResult<()> {
    println!("Checking mapping...");

    let config = load(&args.mapping)?
        .ok_or_else(|| CliError::General("the mapping is empty".to_string()))?;

    for line in summary(&config) {
        println!("{}", line);
    }
    println!("Mapping is valid.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const MAPPING: &str = r#"openapi-processor-mapping: v8
options:
  package-name: io.example
map:
  types:
    - type: string:uuid => java.util.UUID
  paths:
    /foo:
      exclude: true
      get:
        result: plain
  extensions:
    x-foo: foo @ io.oap.Foo
"#;

    #[test]
    fn test_summary() {
        let config = load(MAPPING).unwrap().unwrap();

        assert_eq!(
            summary(&config),
            vec![
                "package: io.example",
                "global: 1 rules",
                "path /foo: 0 rules (excluded)",
                "  GET: 0 rules",
                "extension x-foo: 1 rules",
            ]
        );
    }

    #[test]
    fn test_execute_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.yaml");
        fs::write(&path, MAPPING).unwrap();

        let args = CheckArgs {
            mapping: path.to_string_lossy().to_string(),
        };
        assert!(execute(&args).is_ok());
    }

    #[test]
    fn test_execute_rejects_outdated_version() {
        let args = CheckArgs {
            mapping: "openapi-processor-mapping: v1\n".to_string(),
        };
        assert!(matches!(execute(&args), Err(CliError::Mapping(_))));
    }
}
