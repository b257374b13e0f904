#![deny(missing_docs)]

//! # Mapping Trace
//!
//! Records which rules were tried during a lookup and whether they matched.
//!
//! The finder talks to a [`StepRecorder`]. When tracing is enabled it is a
//! [`MappingStep`] tree that is logged after the lookup; otherwise it is the
//! no-op [`NoStep`]. Recording never changes a lookup result.
//!
//! Output format, one line per node, two spaces of indent per level:
//!
//! ```text
//! looking for type mapping name: 'Foo' path: GET '/foo'
//!   +  /foo
//!     +  types
//!       +  Foo => io.oap.Foo
//!   -  global
//!     -  types
//!       -  Bar => io.oap.Bar
//! ```

use crate::mapping::query::{HttpMethod, MappingQuery};
use crate::options::{LogTarget, LoggingOptions};
use std::fmt;

const MATCH: &str = "+  ";
const NO_MATCH: &str = "-  ";

/// Container nodes of the trace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Global scope.
    Global,
    /// Path scope.
    Endpoint(String),
    /// Path+method scope.
    Method(HttpMethod),
    /// `types` bucket.
    Types,
    /// `schemas` bucket.
    Schemas,
    /// `parameters` bucket, with the kind of parameter rule looked for.
    Parameters(String),
    /// `responses` bucket.
    Responses,
    /// Rules of one vendor extension.
    Extension(String),
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Global => write!(f, "global"),
            StepKind::Endpoint(path) => write!(f, "{}", path),
            StepKind::Method(method) => write!(f, "{}", method),
            StepKind::Types => write!(f, "types"),
            StepKind::Schemas => write!(f, "schemas"),
            StepKind::Parameters(kind) => write!(f, "parameters ({})", kind),
            StepKind::Responses => write!(f, "responses"),
            StepKind::Extension(name) => write!(f, "{}", name),
        }
    }
}

/// Receives the decisions taken during a lookup.
pub trait StepRecorder {
    /// Descends into a container node, creating it if it does not exist yet.
    fn enter(&mut self, kind: StepKind) -> &mut dyn StepRecorder;

    /// Records a matcher decision for a single rule.
    fn record(&mut self, mapping: &dyn fmt::Display, matched: bool);

    /// Records a free-form decision, e.g. `exclude: true`.
    fn note(&mut self, text: &str, matched: bool);
}

/// Recorder used when tracing is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStep;

impl StepRecorder for NoStep {
    fn enter(&mut self, _kind: StepKind) -> &mut dyn StepRecorder {
        self
    }

    fn record(&mut self, _mapping: &dyn fmt::Display, _matched: bool) {}

    fn note(&mut self, _text: &str, _matched: bool) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Root { message: String, query: String },
    Container(StepKind),
    Leaf { text: String, matched: bool },
}

/// A node of the trace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingStep {
    node: Node,
    children: Vec<MappingStep>,
}

impl MappingStep {
    /// Creates the root of a trace for one lookup.
    pub fn root(message: impl Into<String>, query: &MappingQuery) -> Self {
        Self {
            node: Node::Root {
                message: message.into(),
                query: query.to_string(),
            },
            children: Vec::new(),
        }
    }

    fn leaf(text: String, matched: bool) -> Self {
        Self {
            node: Node::Leaf { text, matched },
            children: Vec::new(),
        }
    }

    /// Whether this node, or any node below it, is a match.
    pub fn is_match(&self) -> bool {
        match &self.node {
            Node::Leaf { matched, .. } => *matched,
            _ => self.children.iter().any(MappingStep::is_match),
        }
    }

    /// Whether any rule was looked at below this node.
    pub fn has_mappings(&self) -> bool {
        match &self.node {
            Node::Leaf { .. } => true,
            _ => self.children.iter().any(MappingStep::has_mappings),
        }
    }

    /// Renders the trace, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        self.collect_lines("", &mut lines);
        lines
    }

    fn collect_lines(&self, indent: &str, lines: &mut Vec<String>) {
        let child_indent = format!("{}  ", indent);
        match &self.node {
            Node::Root { message, query } => {
                lines.push(format!("{} {}", message, query).trim_end().to_string());
                if !self.has_mappings() {
                    lines.push(format!("{}{}no mappings", child_indent, NO_MATCH));
                    return;
                }
                for child in self.children.iter().filter(|c| c.has_mappings()) {
                    child.collect_lines(&child_indent, lines);
                }
            }
            Node::Container(kind) => {
                if !self.has_mappings() {
                    return;
                }
                lines.push(format!("{}{}{}", indent, marker(self.is_match()), kind));
                for child in &self.children {
                    child.collect_lines(&child_indent, lines);
                }
            }
            Node::Leaf { text, matched } => {
                lines.push(format!("{}{}{}", indent, marker(*matched), text));
            }
        }
    }

    /// Writes the trace to the configured target.
    ///
    /// Does nothing unless mapping logging is enabled.
    pub fn log(&self, options: &LoggingOptions) {
        if !options.mapping {
            return;
        }

        for line in self.lines() {
            match options.mapping_target {
                LogTarget::Logger => log::info!("{}", line),
                LogTarget::Stdout => println!("{}", line),
            }
        }
    }
}

fn marker(matched: bool) -> &'static str {
    if matched {
        MATCH
    } else {
        NO_MATCH
    }
}

impl StepRecorder for MappingStep {
    fn enter(&mut self, kind: StepKind) -> &mut dyn StepRecorder {
        let existing = self
            .children
            .iter()
            .position(|c| matches!(&c.node, Node::Container(k) if *k == kind));

        let index = match existing {
            Some(index) => index,
            None => {
                self.children.push(MappingStep {
                    node: Node::Container(kind),
                    children: Vec::new(),
                });
                self.children.len() - 1
            }
        };

        &mut self.children[index]
    }

    fn record(&mut self, mapping: &dyn fmt::Display, matched: bool) {
        self.children.push(MappingStep::leaf(mapping.to_string(), matched));
    }

    fn note(&mut self, text: &str, matched: bool) {
        self.children.push(MappingStep::leaf(text.to_string(), matched));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn query() -> MappingQuery {
        MappingQuery::new()
            .with_path("/foo")
            .with_method(HttpMethod::Get)
            .with_name("Foo")
    }

    #[test]
    fn test_root_without_mappings() {
        let root = MappingStep::root("looking for type mapping", &query());

        assert!(!root.has_mappings());
        assert_eq!(
            root.lines(),
            vec![
                "looking for type mapping name: 'Foo' path: GET '/foo'".to_string(),
                "  -  no mappings".to_string(),
            ]
        );
    }

    #[test]
    fn test_nested_lines_and_markers() {
        let mut root = MappingStep::root("looking for type mapping", &query());
        root.enter(StepKind::Endpoint("/foo".into()))
            .enter(StepKind::Types)
            .record(&"Foo => io.oap.Foo", true);
        root.enter(StepKind::Global)
            .enter(StepKind::Types)
            .record(&"Bar => io.oap.Bar", false);

        assert!(root.is_match());
        assert_eq!(
            root.lines(),
            vec![
                "looking for type mapping name: 'Foo' path: GET '/foo'",
                "  +  /foo",
                "    +  types",
                "      +  Foo => io.oap.Foo",
                "  -  global",
                "    -  types",
                "      -  Bar => io.oap.Bar",
            ]
        );
    }

    #[test]
    fn test_enter_reuses_equal_containers() {
        let mut root = MappingStep::root("x", &MappingQuery::new());
        root.enter(StepKind::Global).note("exclude: false", false);
        root.enter(StepKind::Global).note("result: plain", true);

        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].children.len(), 2);
    }

    #[test]
    fn test_empty_containers_are_skipped() {
        let mut root = MappingStep::root("x", &MappingQuery::new());
        root.enter(StepKind::Global).enter(StepKind::Schemas);
        root.enter(StepKind::Endpoint("/bar".into()))
            .note("exclude: true", true);

        assert_eq!(root.lines(), vec!["x", "  +  /bar", "    +  exclude: true"]);
    }

    #[test]
    fn test_no_step_ignores_everything() {
        let mut step = NoStep;
        step.enter(StepKind::Global)
            .enter(StepKind::Types)
            .record(&"Foo => io.oap.Foo", true);
        step.note("exclude: true", true);
    }
}
