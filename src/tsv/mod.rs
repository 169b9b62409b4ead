/*! TSV stream handling

Line streams, sentence segmentation and per-stage processing.

The exchange format is UTF-8 text:
- a header line with tab-separated field names,
- one token per line, columns separated by tabs,
- a single blank line after each sentence.
!*/
mod engine;
mod sentences;
mod stream;

pub use engine::{process, TsvStream};
pub use sentences::{InputWarnings, MalformedInput, SentenceBlock, Sentences, COMMENT_MARKER};
pub use stream::{strip_line_end, LineStream, Lines, INPUT_TEXT};
