//! Headerless TSV import.
use std::collections::BTreeSet;

use crate::error::Error;
use crate::module::{Binding, Module, Sentence};

/// Reads headerless rows whose columns are, in order, the declared target fields.
pub struct FixedOrderImporter {
    source: BTreeSet<String>,
    target: Vec<String>,
}

impl FixedOrderImporter {
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            source: BTreeSet::new(),
            target: columns.iter().map(|c| c.as_ref().to_string()).collect(),
        }
    }
}

impl Module for FixedOrderImporter {
    fn source_fields(&self) -> &BTreeSet<String> {
        &self.source
    }

    fn target_fields(&self) -> &[String] {
        &self.target
    }

    fn fixed_order_tsv_input(&self) -> bool {
        true
    }

    fn process_sentence(&self, sentence: Sentence, fields: &Binding) -> Result<Sentence, Error> {
        // rows already carry every column
        match sentence.iter().find(|row| row.len() != fields.width()) {
            Some(row) => Err(Error::Custom(format!(
                "expected {} columns ({:?}) but the token row has {}: {:?}",
                fields.width(),
                self.target,
                row.len(),
                row
            ))),
            None => Ok(sentence),
        }
    }
}
