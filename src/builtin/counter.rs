//! Sentence and token counter.
use std::collections::BTreeSet;

use log::debug;

use crate::error::Error;
use crate::module::{Binding, Module, Sentence, StageStats};

/// Passes rows through unchanged and emits a summary once the input is exhausted.
///
/// The header is held back, so that the output is not a TSV table anymore:
/// this module is meant to end a pipeline.
///
/// Counts come from the stream being finalized, so concurrent streams
/// through the same instance each get their own summary.
pub struct TokenCounter {
    source: BTreeSet<String>,
    target: Vec<String>,
}

impl TokenCounter {
    pub fn new<S: AsRef<str>>(source: &[S]) -> Self {
        Self {
            source: source.iter().map(|s| s.as_ref().to_string()).collect(),
            target: Vec::new(),
        }
    }
}

impl Module for TokenCounter {
    fn source_fields(&self) -> &BTreeSet<String> {
        &self.source
    }

    fn target_fields(&self) -> &[String] {
        &self.target
    }

    fn pass_header(&self) -> Option<bool> {
        Some(false)
    }

    fn process_sentence(&self, sentence: Sentence, fields: &Binding) -> Result<Sentence, Error> {
        for row in &sentence {
            fields.check_row(row)?;
        }
        Ok(sentence)
    }

    fn final_output(&self, stats: &StageStats) -> Option<Vec<String>> {
        debug!(
            "counted {} sentences, {} tokens",
            stats.sentences, stats.tokens
        );
        Some(vec![format!(
            "# sentences: {}, tokens: {}\n",
            stats.sentences, stats.tokens
        )])
    }
}
