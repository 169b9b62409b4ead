//! Pipeline options.
use serde::{Deserialize, Serialize};

/// Options shared by every stage of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    /// Keep CoNLL-U style comment lines (`# ...`) found before sentences.
    pub conll_comments: bool,
    /// Emit the header of the last stage.
    pub output_header: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            conll_comments: false,
            output_header: true,
        }
    }
}

impl PipelineOptions {
    pub fn with_conll_comments(mut self, conll_comments: bool) -> Self {
        self.conll_comments = conll_comments;
        self
    }

    pub fn with_output_header(mut self, output_header: bool) -> Self {
        self.output_header = output_header;
        self
    }
}
