//! Field copier, a stand-in for a tagger.
use std::collections::BTreeSet;

use crate::error::Error;
use crate::module::{Binding, Module, Sentence};

/// Appends a copy of one field, optionally upper-cased.
pub struct FieldCopier {
    source: BTreeSet<String>,
    target: Vec<String>,
    upper: bool,
}

impl FieldCopier {
    pub fn new(source: &str, target: &str, upper: bool) -> Self {
        Self {
            source: [source.to_string()].into_iter().collect(),
            target: vec![target.to_string()],
            upper,
        }
    }
}

impl Module for FieldCopier {
    fn source_fields(&self) -> &BTreeSet<String> {
        &self.source
    }

    fn target_fields(&self) -> &[String] {
        &self.target
    }

    fn process_sentence(&self, sentence: Sentence, fields: &Binding) -> Result<Sentence, Error> {
        let source = self
            .source
            .iter()
            .next()
            .and_then(|name| fields.source(name))
            .ok_or_else(|| Error::Custom(format!("unbound fields {:?}", self.source)))?;

        sentence
            .into_iter()
            .map(|mut row| -> Result<Vec<String>, Error> {
                fields.check_row(&row)?;
                let value = match row.get(source) {
                    Some(value) if self.upper => value.to_uppercase(),
                    Some(value) => value.clone(),
                    None => {
                        return Err(Error::Custom(format!(
                            "no column {} for {:?} in {:?}",
                            source, self.source, row
                        )))
                    }
                };
                row.push(value);
                Ok(row)
            })
            .collect()
    }
}
