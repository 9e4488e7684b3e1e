//! Test element identity.

use serde::{Deserialize, Serialize};

/// Opaque, path-like identity of a test element within one engine run.
///
/// Ids are compared as plain strings; the launcher owns their structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(pub String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        ElementId(id.into())
    }

    /// Derive a child id by appending a path segment.
    pub fn child(&self, segment: &str) -> Self {
        ElementId(format!("{}/{}", self.0, segment))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an element groups other elements or is itself executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Container,
    Test,
}

/// A discovered test element, as handed to the core by the launcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestElement {
    pub id: ElementId,
    pub display_name: String,
    pub kind: ElementKind,
}

impl TestElement {
    pub fn test(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        TestElement {
            id: ElementId::new(id),
            display_name: display_name.into(),
            kind: ElementKind::Test,
        }
    }

    pub fn container(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        TestElement {
            id: ElementId::new(id),
            display_name: display_name.into(),
            kind: ElementKind::Container,
        }
    }
}
