//! Available modules.
use super::descriptor::{Loaders, ModuleDescriptor};

/// A descriptor and the stage names it is reachable by.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub descriptor: ModuleDescriptor,
    pub names: Vec<String>,
}

/// Modules an application makes available, in declaration order,
/// along with the loaders able to build them.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    loaders: Loaders,
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(loaders: Loaders) -> Self {
        Self {
            loaders,
            entries: Vec::new(),
        }
    }

    /// Add a module reachable by `names`.
    pub fn add<S: AsRef<str>>(&mut self, descriptor: ModuleDescriptor, names: &[S]) -> &mut Catalog {
        self.entries.push(CatalogEntry {
            descriptor,
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        });
        self
    }

    pub fn loaders(&self) -> &Loaders {
        &self.loaders
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entry a stage name belongs to. The first declaration wins.
    pub fn entry(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.names.iter().any(|n| n == name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn friendly_name(&self, name: &str) -> Option<&str> {
        self.entry(name).map(|entry| entry.descriptor.friendly_name())
    }

    /// Every stage name, in declaration order.
    pub fn available_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| entry.names.iter().cloned())
            .collect()
    }

    /// Main (first) name and friendly name of each module.
    pub fn friendly_names(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter_map(|entry| {
                entry
                    .names
                    .first()
                    .map(|name| (name.clone(), entry.descriptor.friendly_name().to_string()))
            })
            .collect()
    }
}
