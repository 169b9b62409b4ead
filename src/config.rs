//! Catalog configuration.
//!
//! A JSON document declaring the available modules, the presets and the default pipeline options:
//!
//! ```json
//! {
//!     "modules": [
//!         {"loader": "tokenizer", "friendly_name": "Tokenizer", "names": ["tok"]},
//!         {"loader": "copier", "friendly_name": "Dummy tagger", "args": ["form", "copy"], "names": ["dummy"]}
//!     ],
//!     "presets": {
//!         "default": {"friendly_name": "Tokenize and tag", "stages": ["tok", "dummy"]}
//!     },
//!     "options": {"conll_comments": true}
//! }
//! ```
//!
//! Loaders are referenced by key and must be registered in the [Loaders] the configuration is resolved with.
use std::{fs, path::Path, str::FromStr};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ModuleError};
use crate::pipeline::PipelineOptions;
use crate::registry::{Catalog, Loaders, ModuleDescriptor, Presets};

/// A module declaration and the stage names it is reachable by.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleEntry {
    #[serde(flatten)]
    pub descriptor: ModuleDescriptor,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub modules: Vec<ModuleEntry>,
    #[serde(default)]
    pub presets: Presets,
    #[serde(default)]
    pub options: PipelineOptions,
}

impl CatalogConfig {
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        debug!("reading catalog from {:?}", path);
        fs::read_to_string(path)?.parse()
    }

    /// Resolve the configuration against `loaders`.
    ///
    /// Fails on unknown loader keys, entries without names, and presets naming unknown stages.
    pub fn into_catalog(self, loaders: Loaders) -> Result<(Catalog, Presets), Error> {
        for entry in &self.modules {
            let loader = entry.descriptor.loader();
            if !loaders.contains(loader) {
                return Err(ModuleError::NotFound {
                    name: loader.to_string(),
                    available: loaders.keys(),
                }
                .into());
            }
            if entry.names.is_empty() {
                return Err(Error::Custom(format!(
                    "module {} has no name",
                    entry.descriptor.friendly_name()
                )));
            }
        }

        let mut catalog = Catalog::new(loaders);
        for entry in self.modules {
            catalog.add(entry.descriptor, &entry.names);
        }

        for (name, preset) in self.presets.iter() {
            if let Some(unknown) = preset.stages.iter().find(|stage| !catalog.contains(stage)) {
                return Err(Error::Custom(format!(
                    "preset {} uses unknown stage {}",
                    name, unknown
                )));
            }
        }

        Ok((catalog, self.presets))
    }
}

impl FromStr for CatalogConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::builtin;

    const CONFIG: &str = r#"{
        "modules": [
            {"loader": "tokenizer", "friendly_name": "Tokenizer", "names": ["tok"]},
            {"loader": "copier", "friendly_name": "Dummy tagger", "args": ["form", "copy"], "names": ["dummy", "tag"]}
        ],
        "presets": {
            "default": {"friendly_name": "Tokenize and tag", "stages": ["tok", "dummy"]}
        },
        "options": {"conll_comments": true}
    }"#;

    #[test]
    fn parse_and_resolve() {
        let config: CatalogConfig = CONFIG.parse().unwrap();
        assert!(config.options.conll_comments);
        assert!(config.options.output_header);
        assert_eq!(config.modules[1].descriptor.args().len(), 2);

        let (catalog, presets) = config.into_catalog(builtin::loaders()).unwrap();
        assert_eq!(catalog.available_names(), vec!["tok", "dummy", "tag"]);
        assert_eq!(catalog.friendly_name("tag"), Some("Dummy tagger"));
        assert_eq!(presets.resolve(&["default"]), vec!["tok", "dummy"]);
    }

    #[test]
    fn from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", CONFIG).unwrap();
        let config = CatalogConfig::from_path(file.path()).unwrap();
        assert_eq!(config.modules.len(), 2);
    }

    #[test]
    fn unknown_loader() {
        let config: CatalogConfig =
            r#"{"modules": [{"loader": "parser", "friendly_name": "Parser", "names": ["parse"]}]}"#
                .parse()
                .unwrap();
        assert!(matches!(
            config.into_catalog(builtin::loaders()),
            Err(Error::Module(ModuleError::NotFound { .. }))
        ));
    }

    #[test]
    fn unknown_preset_stage() {
        let config: CatalogConfig = r#"{"presets": {"p": {"friendly_name": "P", "stages": ["tok"]}}}"#
            .parse()
            .unwrap();
        assert!(config.into_catalog(builtin::loaders()).is_err());
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            "{".parse::<CatalogConfig>(),
            Err(Error::Serde(_))
        ));
    }
}
