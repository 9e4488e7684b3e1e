//! In-memory fakes for the environment capability (testing only)

use std::collections::HashMap;

use crate::facts::Environment;

/// Fixed env-var and property maps satisfying [`Environment`] without
/// touching the process environment.
#[derive(Debug, Clone, Default)]
pub struct FakeEnvironment {
    env_vars: HashMap<String, String>,
    properties: HashMap<String, String>,
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(name.into(), value.into());
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }
}

impl Environment for FakeEnvironment {
    fn env_var(&self, name: &str) -> Option<String> {
        self.env_vars.get(name).cloned()
    }

    fn property(&self, name: &str) -> Option<String> {
        self.properties.get(name).cloned()
    }
}
