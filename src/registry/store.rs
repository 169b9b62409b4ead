//! Module registry.
//!
//! Holds built modules so that they are constructed at most once.
//! Internally there are two maps: one from stage names to built modules,
//! and one from loader keys to alias groups (stage names sharing a descriptor).
//!
//! The registry is meant to be shared (behind an [Arc]) between pipelines, possibly across threads.
//! Each alias group owns a [OnceCell]: concurrent first requests for the same descriptor
//! wait for a single construction instead of each building their own module.
use std::{
    collections::{HashMap, HashSet},
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

use log::debug;
use once_cell::sync::OnceCell;

use super::{Catalog, CatalogEntry, ModuleDescriptor, Presets};
use crate::error::{Error, ModuleError};
use crate::module::{validate_contract, Module};

type Slot = Arc<OnceCell<Arc<dyn Module>>>;

struct AliasGroup {
    names: Vec<String>,
    descriptor: ModuleDescriptor,
    slot: Slot,
}

#[derive(Default)]
struct State {
    instances: HashMap<String, Arc<dyn Module>>,
    aliases: HashMap<String, Vec<AliasGroup>>,
}

#[derive(Default)]
pub struct ModuleRegistry {
    state: RwLock<State>,
    constructions: AtomicUsize,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<State>, Error> {
        self.state
            .read()
            .map_err(|_| ModuleError::Lock("registry (in read)".to_string()).into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<State>, Error> {
        self.state
            .write()
            .map_err(|_| ModuleError::Lock("registry (in write)".to_string()).into())
    }

    /// Module bound to a stage name, if already built.
    ///
    /// If catalogs sharing this registry bind the name differently, the last one loaded wins.
    pub fn get(&self, name: &str) -> Result<Option<Arc<dyn Module>>, Error> {
        Ok(self.read()?.instances.get(name).cloned())
    }

    /// Number of modules actually constructed by this registry.
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::SeqCst)
    }

    /// Alias groups, as (descriptor, names) pairs, sorted by loader then by first name.
    pub fn alias_groups(&self) -> Result<Vec<(ModuleDescriptor, Vec<String>)>, Error> {
        let state = self.read()?;
        let mut groups: Vec<(ModuleDescriptor, Vec<String>)> = state
            .aliases
            .values()
            .flatten()
            .map(|group| (group.descriptor.clone(), group.names.clone()))
            .collect();
        groups.sort_by(|a, b| {
            (a.0.loader(), a.1.first()).cmp(&(b.0.loader(), b.1.first()))
        });
        Ok(groups)
    }

    /// Resolve presets, then build (or reuse) the modules needed by `stages`.
    ///
    /// Returns the modules keyed by stage name.
    pub fn resolve<S: AsRef<str>>(
        &self,
        stages: &[S],
        catalog: &Catalog,
        presets: &Presets,
    ) -> Result<HashMap<String, Arc<dyn Module>>, Error> {
        let stages = presets.resolve(stages);
        self.load_all(&stages, catalog)
    }

    /// Build (or reuse) the modules needed by `names`. Presets are not expanded.
    pub fn load_all(
        &self,
        names: &[String],
        catalog: &Catalog,
    ) -> Result<HashMap<String, Arc<dyn Module>>, Error> {
        if let Some(unknown) = names.iter().find(|name| !catalog.contains(name)) {
            return Err(ModuleError::NotFound {
                name: unknown.clone(),
                available: catalog.available_names(),
            }
            .into());
        }

        let requested: HashSet<&str> = names.iter().map(String::as_str).collect();
        let selected = catalog
            .entries()
            .iter()
            .filter(|entry| entry.names.iter().any(|n| requested.contains(n.as_str())));

        // modules are taken from what `load` returns: with a shared registry,
        // another catalog may bind the same stage name in the meantime.
        let mut loaded: HashMap<&str, Arc<dyn Module>> = HashMap::new();
        for entry in selected {
            let module = self.load(entry, catalog)?;
            for name in &entry.names {
                loaded
                    .entry(name.as_str())
                    .or_insert_with(|| Arc::clone(&module));
            }
        }

        names
            .iter()
            .map(|name| match loaded.get(name.as_str()) {
                Some(module) => Ok((name.clone(), Arc::clone(module))),
                None => Err(Error::from(ModuleError::NotFound {
                    name: name.clone(),
                    available: catalog.available_names(),
                })),
            })
            .collect()
    }

    /// Build the module of a catalog entry, or reuse the one built for an identical descriptor.
    fn load(&self, entry: &CatalogEntry, catalog: &Catalog) -> Result<Arc<dyn Module>, Error> {
        let descriptor = &entry.descriptor;

        let slot = {
            let mut state = self.write()?;
            let groups = state
                .aliases
                .entry(descriptor.loader().to_string())
                .or_default();

            match groups
                .iter_mut()
                .find(|group| group.descriptor.same_construction(descriptor))
            {
                Some(group) => {
                    for name in &entry.names {
                        if !group.names.contains(name) {
                            debug!("{} is an alias of {:?}", name, group.names);
                            group.names.push(name.clone());
                        }
                    }
                    Arc::clone(&group.slot)
                }
                None => {
                    let slot: Slot = Arc::new(OnceCell::new());
                    groups.push(AliasGroup {
                        names: entry.names.clone(),
                        descriptor: descriptor.clone(),
                        slot: Arc::clone(&slot),
                    });
                    slot
                }
            }
        };

        // the lock is released: building may take a while,
        // and requests for other modules should not wait for it.
        let module = slot
            .get_or_try_init(|| self.construct(entry, catalog))?
            .clone();

        let mut state = self.write()?;
        for name in &entry.names {
            state.instances.insert(name.clone(), Arc::clone(&module));
        }
        Ok(module)
    }

    fn construct(&self, entry: &CatalogEntry, catalog: &Catalog) -> Result<Arc<dyn Module>, Error> {
        let descriptor = &entry.descriptor;
        let factory = catalog.loaders().get(descriptor.loader()).ok_or_else(|| {
            ModuleError::NotFound {
                name: descriptor.loader().to_string(),
                available: catalog.loaders().keys(),
            }
        })?;

        debug!(
            "Building {} ({}) for {:?}",
            descriptor.friendly_name(),
            descriptor.loader(),
            entry.names
        );
        let module = factory(descriptor.args(), descriptor.kwargs())?;
        validate_contract(&entry.names, module.as_ref())?;

        self.constructions.fetch_add(1, Ordering::SeqCst);
        Ok(module)
    }
}

impl fmt::Debug for ModuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleRegistry")
            .field("constructions", &self.constructions())
            .finish()
    }
}
