/*! Named line streams.

A [LineStream] is a lazy, single-pass sequence of text lines together with a name
used in diagnostics (a file path, `Input Text` or the friendly name of the stage that produced it).

A stream also carries an [InputWarnings] handle. Stages reading it count malformed input there,
and pipelines pass the same handle from one stage to the next.
!*/
use std::{
    fs::File,
    io::{BufRead, BufReader},
    iter,
    path::Path,
};

use super::sentences::InputWarnings;
use crate::error::Error;

/// Boxed line iterator.
pub type Lines<'a> = Box<dyn Iterator<Item = Result<String, Error>> + 'a>;

/// Name given to streams built from in-memory text.
pub const INPUT_TEXT: &str = "Input Text";

pub struct LineStream<'a> {
    name: String,
    lines: Lines<'a>,
    warnings: InputWarnings,
}

impl<'a> LineStream<'a> {
    pub fn new(name: impl Into<String>, lines: Lines<'a>) -> Self {
        Self {
            name: name.into(),
            lines,
            warnings: InputWarnings::new(),
        }
    }

    /// Count warnings on `warnings` instead of a fresh handle.
    pub fn with_warnings(mut self, warnings: InputWarnings) -> Self {
        self.warnings = warnings;
        self
    }

    /// Stream over borrowed text, line endings are kept.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(
            INPUT_TEXT,
            Box::new(text.split_inclusive('\n').map(|line| Ok(line.to_string()))),
        )
    }

    /// Stream over a buffered reader.
    ///
    /// I/O errors are yielded in place of the failing line.
    pub fn from_reader<R>(name: impl Into<String>, reader: R) -> Self
    where
        R: BufRead + 'a,
    {
        Self::new(name, Box::new(reader.lines().map(|line| line.map_err(Error::Io))))
    }

    /// Name of the stream, as shown in error messages.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Malformed input counted while reading this stream and the ones it was built from.
    pub fn warnings(&self) -> &InputWarnings {
        &self.warnings
    }

    /// Put a line back in front of the stream.
    pub fn prepend(self, line: String) -> Self {
        Self {
            name: self.name,
            lines: Box::new(iter::once(Ok(line)).chain(self.lines)),
            warnings: self.warnings,
        }
    }
}

impl LineStream<'static> {
    /// Stream over owned text.
    pub fn from_string(text: String) -> Self {
        let lines: Vec<String> = text.split_inclusive('\n').map(str::to_owned).collect();
        Self::new(INPUT_TEXT, Box::new(lines.into_iter().map(Ok)))
    }

    /// Open a file and stream its lines. The stream is named after the path.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let file = File::open(path)?;
        Ok(Self::from_reader(
            path.to_string_lossy().into_owned(),
            BufReader::new(file),
        ))
    }
}

impl<'a> Iterator for LineStream<'a> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.lines.next()
    }
}

impl std::fmt::Debug for LineStream<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineStream").field("name", &self.name).finish()
    }
}

/// Strip the line terminator (`\n` or `\r\n`).
pub fn strip_line_end(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn text_keeps_line_ends() {
        let lines: Vec<String> = LineStream::from_text("a\tb\nc\n\nd")
            .map(|l| l.unwrap())
            .collect();
        assert_eq!(lines, vec!["a\tb\n", "c\n", "\n", "d"]);
    }

    #[test]
    fn prepend_restores_peeked_line() {
        let mut s = LineStream::from_text("header\nrow\n");
        let header = s.next().unwrap().unwrap();
        let lines: Vec<String> = s.prepend(header).map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["header\n", "row\n"]);
    }

    #[test]
    fn path_names_stream() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "form\nfoo\n\n").unwrap();

        let s = LineStream::from_path(file.path()).unwrap();
        assert_eq!(s.name(), file.path().to_string_lossy());
        let lines: Vec<String> = s.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["form", "foo", ""]);
    }

    #[test]
    fn strip_ends() {
        assert_eq!(strip_line_end("a\tb\r\n"), "a\tb");
        assert_eq!(strip_line_end("a\n"), "a");
        assert_eq!(strip_line_end("a"), "a");
        assert_eq!(strip_line_end("\n"), "");
    }
}
