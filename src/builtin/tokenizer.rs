//! Word tokenizer.
//!
//! Reads raw text: each non-blank line is a sentence, tokens are split on Unicode word boundaries.
use std::{collections::BTreeSet, iter, sync::Arc};

use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;
use crate::module::Module;
use crate::tsv::{strip_line_end, LineStream, Lines};

pub struct WordTokenizer {
    source: BTreeSet<String>,
    target: Vec<String>,
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self {
            source: BTreeSet::new(),
            target: vec!["form".to_string()],
        }
    }
}

impl WordTokenizer {
    /// Tokens of `text`, whitespace excluded.
    pub fn tokenize(text: &str) -> Vec<&str> {
        text.split_word_bounds()
            .filter(|token| !token.trim().is_empty())
            .collect()
    }

    /// Token rows of a line followed by a sentence separator. Nothing for blank lines.
    fn sentence(line: &str) -> Vec<Result<String, Error>> {
        let tokens = Self::tokenize(strip_line_end(line));
        if tokens.is_empty() {
            return Vec::new();
        }
        tokens
            .into_iter()
            .map(|token| Ok(format!("{}\n", token)))
            .chain(iter::once(Ok("\n".to_string())))
            .collect()
    }
}

impl Module for WordTokenizer {
    fn source_fields(&self) -> &BTreeSet<String> {
        &self.source
    }

    fn target_fields(&self) -> &[String] {
        &self.target
    }

    fn process_text<'a>(self: Arc<Self>, input: LineStream<'a>) -> Result<Lines<'a>, Error> {
        Ok(Box::new(input.flat_map(|line| match line {
            Ok(line) => Self::sentence(&line),
            Err(e) => vec![Err(e)],
        })))
    }

    fn process_token(&self, token: &str) -> Option<Result<Value, Error>> {
        Some(Ok(Value::from(Self::tokenize(token))))
    }
}
