//! Module descriptors and loaders.
use std::{collections::HashMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::module::Module;

/// Builds a module from positional and keyword arguments.
pub type Factory =
    Arc<dyn Fn(&[Value], &Map<String, Value>) -> Result<Arc<dyn Module>, Error> + Send + Sync>;

/// Factory table, indexed by a stable loader key.
#[derive(Clone, Default)]
pub struct Loaders {
    factories: HashMap<String, Factory>,
}

impl Loaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `key`. Replaces any previous one.
    pub fn register<F>(&mut self, key: &str, factory: F) -> &mut Loaders
    where
        F: Fn(&[Value], &Map<String, Value>) -> Result<Arc<dyn Module>, Error>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(key.to_string(), Arc::new(factory));
        self
    }

    pub fn get(&self, key: &str) -> Option<&Factory> {
        self.factories.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.factories.contains_key(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.factories.keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl fmt::Debug for Loaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loaders")
            .field("keys", &self.keys())
            .finish()
    }
}

/// How to build a module: which loader, with which arguments.
///
/// Two descriptors build the same module iff loader and arguments are equal.
/// The friendly name is only used for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    loader: String,
    friendly_name: String,
    #[serde(default)]
    args: Vec<Value>,
    #[serde(default)]
    kwargs: Map<String, Value>,
}

impl ModuleDescriptor {
    pub fn new(loader: &str, friendly_name: &str) -> Self {
        Self {
            loader: loader.to_string(),
            friendly_name: friendly_name.to_string(),
            args: Vec::new(),
            kwargs: Map::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<Value>) -> Self {
        self.args = args;
        self
    }

    pub fn with_kwarg(mut self, key: &str, value: Value) -> Self {
        self.kwargs.insert(key.to_string(), value);
        self
    }

    /// `true` if both descriptors construct the same module.
    pub fn same_construction(&self, other: &ModuleDescriptor) -> bool {
        self.loader == other.loader && self.args == other.args && self.kwargs == other.kwargs
    }

    pub fn loader(&self) -> &str {
        &self.loader
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }

    pub fn kwargs(&self) -> &Map<String, Value> {
        &self.kwargs
    }
}
