//! Named stage lists.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A named shortcut for an ordered list of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub friendly_name: String,
    pub stages: Vec<String>,
}

impl Preset {
    pub fn new<S: AsRef<str>>(friendly_name: &str, stages: &[S]) -> Self {
        Self {
            friendly_name: friendly_name.to_string(),
            stages: stages.iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

/// Preset table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Presets {
    presets: BTreeMap<String, Preset>,
}

impl Presets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preset under `name`.
    pub fn register(&mut self, name: &str, preset: Preset) -> &mut Presets {
        self.presets.insert(name.to_string(), preset);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Presets, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Preset)> {
        self.presets.iter()
    }

    /// Expand a stage list.
    ///
    /// Only a list made of exactly one preset name is expanded; anything else is returned as-is.
    pub fn resolve<S: AsRef<str>>(&self, stages: &[S]) -> Vec<String> {
        if let [single] = stages {
            if let Some(preset) = self.get(single.as_ref()) {
                return preset.stages.clone();
            }
        }
        stages.iter().map(|s| s.as_ref().to_string()).collect()
    }
}
