//! The launcher-supplied execution context for one test element.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::element::TestElement;
use crate::registry::{FactoryRegistry, PredicateStore};

/// Whether one suite instance spans all test cases or each case gets its own.
///
/// Gates non-static field factories: they are only reachable under
/// `PerSuite`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    PerCase,
    PerSuite,
}

/// Per-(extension, element) key-value store for suspending state across
/// callback phases.
///
/// Keys are `(namespace, key)` pairs so independent extensions never collide.
/// Values are opaque JSON payloads. Concurrent access is safe.
#[derive(Debug, Default)]
pub struct Store {
    entries: Mutex<HashMap<(String, String), Value>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, namespace: &str, key: &str, value: Value) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert((namespace.to_string(), key.to_string()), value);
    }

    pub fn get(&self, namespace: &str, key: &str) -> Option<Value> {
        let entries = self.entries.lock().unwrap();
        entries
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }

    pub fn remove(&self, namespace: &str, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(&(namespace.to_string(), key.to_string()))
    }
}

/// What evaluators and resolvers see of one test element: the element itself,
/// its owning suite and case names, lifecycle, resource lookup root, the
/// cross-phase store, and the capability registries.
#[derive(Debug)]
pub struct ExtensionContext {
    pub element: TestElement,
    /// Owning type path of the element (e.g. `parsing::QuoteTests`).
    pub test_suite: Option<String>,
    /// Test case (method) name, when the element is a test.
    pub test_case: Option<String>,
    pub lifecycle: Lifecycle,
    /// Base directory against which resource-relative paths resolve.
    pub resource_root: Option<PathBuf>,
    pub store: Store,
    pub predicates: PredicateStore,
    pub factories: FactoryRegistry,
}

impl ExtensionContext {
    pub fn new(element: TestElement) -> Self {
        ExtensionContext {
            element,
            test_suite: None,
            test_case: None,
            lifecycle: Lifecycle::PerCase,
            resource_root: None,
            store: Store::new(),
            predicates: PredicateStore::new(),
            factories: FactoryRegistry::new(),
        }
    }

    pub fn with_suite(mut self, suite: impl Into<String>) -> Self {
        self.test_suite = Some(suite.into());
        self
    }

    pub fn with_case(mut self, case: impl Into<String>) -> Self {
        self.test_case = Some(case.into());
        self
    }

    pub fn with_lifecycle(mut self, lifecycle: Lifecycle) -> Self {
        self.lifecycle = lifecycle;
        self
    }

    pub fn with_resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_root = Some(root.into());
        self
    }

    pub fn with_predicates(mut self, predicates: PredicateStore) -> Self {
        self.predicates = predicates;
        self
    }

    pub fn with_factories(mut self, factories: FactoryRegistry) -> Self {
        self.factories = factories;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_store_namespaces_do_not_collide() {
        let store = Store::new();
        store.put("timing", "start", json!(120));
        store.put("logging", "start", json!("ten past"));

        assert_eq!(store.get("timing", "start"), Some(json!(120)));
        assert_eq!(store.get("logging", "start"), Some(json!("ten past")));
        assert_eq!(store.get("timing", "end"), None);
    }

    #[test]
    fn test_store_remove_returns_previous_value() {
        let store = Store::new();
        store.put("timing", "start", json!(1));
        assert_eq!(store.remove("timing", "start"), Some(json!(1)));
        assert_eq!(store.remove("timing", "start"), None);
    }

    #[test]
    fn test_context_builders() {
        let ctx = ExtensionContext::new(TestElement::test("e/t", "t"))
            .with_suite("parsing::QuoteTests")
            .with_case("parses_quoted_fields")
            .with_lifecycle(Lifecycle::PerSuite);
        assert_eq!(ctx.test_suite.as_deref(), Some("parsing::QuoteTests"));
        assert_eq!(ctx.test_case.as_deref(), Some("parses_quoted_fields"));
        assert_eq!(ctx.lifecycle, Lifecycle::PerSuite);
        assert!(ctx.resource_root.is_none());
    }
}
