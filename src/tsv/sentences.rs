/*! Sentence segmentation.

Cuts the body of a TSV stream into sentences on blank lines.
Optionally keeps CoNLL-U style comments (lines starting with `# `) found *before* a sentence.

```text
# sent_id = 1     <- comment (only if enabled, only before the first token row)
The               <- token rows
dog
                  <- blank line: end of sentence
```
!*/
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use log::warn;

use super::stream::{strip_line_end, LineStream};
use crate::error::Error;
use crate::module::Sentence;

/// Marker opening a comment line.
pub const COMMENT_MARKER: &str = "# ";

/// A sentence and the comment lines preceding it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceBlock {
    pub comments: Vec<String>,
    pub rows: Sentence,
    /// 1-based line number of the first token row.
    pub first_line: usize,
}

/// Non-fatal formatting problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedInput {
    /// Blank line while no sentence was open.
    RedundantBlankLine { line: usize },
    /// Input ended without a blank line closing the last sentence.
    MissingFinalBlankLine,
}

#[derive(Debug, Default)]
struct WarningCounts {
    redundant_blank_lines: AtomicUsize,
    missing_final_blank_lines: AtomicUsize,
}

/// Counts of [MalformedInput] met while reading a stream.
///
/// Clones are handles on the same counts: keep one before handing a stream over
/// to read the counts while or after it is consumed.
#[derive(Debug, Clone, Default)]
pub struct InputWarnings(Arc<WarningCounts>);

impl InputWarnings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, warning: &MalformedInput) {
        let count = match warning {
            MalformedInput::RedundantBlankLine { .. } => &self.0.redundant_blank_lines,
            MalformedInput::MissingFinalBlankLine => &self.0.missing_final_blank_lines,
        };
        count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn redundant_blank_lines(&self) -> usize {
        self.0.redundant_blank_lines.load(Ordering::Relaxed)
    }

    pub fn missing_final_blank_lines(&self) -> usize {
        self.0.missing_final_blank_lines.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.redundant_blank_lines() + self.missing_final_blank_lines()
    }
}

/// Iterator over [SentenceBlock]s.
///
/// Warnings are counted on the handle of the input stream ([LineStream::warnings]).
pub struct Sentences<'a> {
    input: LineStream<'a>,
    conll_comments: bool,
    line_number: usize,
    warnings: InputWarnings,
    done: bool,
}

impl<'a> Sentences<'a> {
    /// `lines_read` is the number of lines already consumed from `input` (the header).
    pub fn new(input: LineStream<'a>, conll_comments: bool, lines_read: usize) -> Self {
        let warnings = input.warnings().clone();
        Self {
            input,
            conll_comments,
            line_number: lines_read,
            warnings,
            done: false,
        }
    }

    /// Warnings counted so far.
    pub fn warnings(&self) -> &InputWarnings {
        &self.warnings
    }

    /// Number of lines read so far, header included.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    fn warn(&mut self, warning: MalformedInput) {
        match &warning {
            MalformedInput::RedundantBlankLine { line } => warn!(
                "Wrong formatted sentences ({}:{}), only one blank line allowed!",
                self.input.name(),
                line
            ),
            MalformedInput::MissingFinalBlankLine => {
                warn!("No blank line before EOF ({})!", self.input.name())
            }
        }
        self.warnings.record(&warning);
    }
}

impl<'a> Iterator for Sentences<'a> {
    type Item = Result<SentenceBlock, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut comments = Vec::new();
        let mut rows = Vec::new();
        let mut first_line = 0;

        loop {
            let line = match self.input.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    if rows.is_empty() {
                        return None;
                    }
                    self.warn(MalformedInput::MissingFinalBlankLine);
                    return Some(Ok(SentenceBlock {
                        comments,
                        rows,
                        first_line,
                    }));
                }
            };
            self.line_number += 1;
            let line = strip_line_end(&line);

            if rows.is_empty() && self.conll_comments && line.starts_with(COMMENT_MARKER) {
                comments.push(line.to_string());
            } else if line.is_empty() {
                if !rows.is_empty() {
                    return Some(Ok(SentenceBlock {
                        comments,
                        rows,
                        first_line,
                    }));
                }
                let line = self.line_number;
                self.warn(MalformedInput::RedundantBlankLine { line });
            } else {
                if rows.is_empty() {
                    first_line = self.line_number;
                }
                rows.push(line.split('\t').map(str::to_string).collect());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(sentence: &SentenceBlock) -> Vec<String> {
        sentence.rows.iter().map(|row| row.join("\t")).collect()
    }

    fn body(text: &str, comments: bool) -> Sentences {
        let mut input = LineStream::from_text(text);
        // skip the header, as the engine does
        input.next();
        Sentences::new(input, comments, 1)
    }

    #[test]
    fn two_sentences_missing_final_blank() {
        let mut s = body("A\nB\n\nC\n", false);
        let sentences: Vec<SentenceBlock> = s.by_ref().map(|s| s.unwrap()).collect();

        assert_eq!(sentences.len(), 2);
        assert_eq!(rows(&sentences[0]), vec!["B"]);
        assert_eq!(rows(&sentences[1]), vec!["C"]);
        assert_eq!(sentences[0].first_line, 2);
        assert_eq!(sentences[1].first_line, 4);
        assert_eq!(s.warnings().missing_final_blank_lines(), 1);
        assert_eq!(s.warnings().total(), 1);
    }

    #[test]
    fn redundant_blank_line() {
        let mut s = body("A\nB\n\n\nC\n\n", false);
        let sentences: Vec<SentenceBlock> = s.by_ref().map(|s| s.unwrap()).collect();

        assert_eq!(sentences.len(), 2);
        assert!(sentences.iter().all(|s| !s.rows.is_empty()));
        assert_eq!(s.warnings().redundant_blank_lines(), 1);
        assert_eq!(s.warnings().total(), 1);
    }

    #[test]
    fn both_warnings() {
        let mut s = body("A\nB\n\n\n\nC\n", false);
        let warnings = s.warnings().clone();
        assert_eq!(s.by_ref().count(), 2);
        assert_eq!(warnings.redundant_blank_lines(), 2);
        assert_eq!(warnings.missing_final_blank_lines(), 1);
    }

    #[test]
    fn comments_enabled() {
        let mut s = body("A\n# tag\nB\n\n", true);
        let sentence = s.next().unwrap().unwrap();
        assert_eq!(sentence.comments, vec!["# tag"]);
        assert_eq!(rows(&sentence), vec!["B"]);
        assert_eq!(sentence.first_line, 3);
        assert!(s.next().is_none());
        assert_eq!(s.warnings().total(), 0);
    }

    #[test]
    fn comments_disabled() {
        let mut s = body("A\n# tag\nB\n\n", false);
        let sentence = s.next().unwrap().unwrap();
        assert!(sentence.comments.is_empty());
        assert_eq!(rows(&sentence), vec!["# tag", "B"]);
    }

    #[test]
    fn comment_after_rows_is_a_token() {
        let mut s = body("A\nB\n# tag\n\n", true);
        let sentence = s.next().unwrap().unwrap();
        assert!(sentence.comments.is_empty());
        assert_eq!(rows(&sentence), vec!["B", "# tag"]);
    }

    #[test]
    fn comment_survives_blank_line() {
        let mut s = body("A\n# tag\n\nB\n\n", true);
        let sentence = s.next().unwrap().unwrap();
        assert_eq!(sentence.comments, vec!["# tag"]);
        assert_eq!(rows(&sentence), vec!["B"]);
        assert_eq!(s.warnings().redundant_blank_lines(), 1);
    }

    #[test]
    fn columns_and_crlf() {
        let mut s = body("form\tlemma\r\ndogs\tdog\r\n\r\n", false);
        let sentence = s.next().unwrap().unwrap();
        assert_eq!(sentence.rows, vec![vec!["dogs", "dog"]]);
        assert_eq!(s.warnings().total(), 0);
    }

    #[test]
    fn empty_body() {
        let mut s = body("A\n", false);
        assert!(s.next().is_none());
        assert!(s.next().is_none());
        assert_eq!(s.line_number(), 1);
    }
}
