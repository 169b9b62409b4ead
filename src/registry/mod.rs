/*! Module registry

Everything needed to go from a stage name to a built module:
- [Loaders] map a stable key to a module factory,
- a [Catalog] lists the modules an application makes available, and the names they answer to,
- [Presets] are named stage lists,
- the [ModuleRegistry] builds modules lazily and shares them between names and pipelines.
!*/
mod catalog;
mod descriptor;
mod presets;
mod store;

pub use catalog::{Catalog, CatalogEntry};
pub use descriptor::{Factory, Loaders, ModuleDescriptor};
pub use presets::{Preset, Presets};
pub use store::ModuleRegistry;
