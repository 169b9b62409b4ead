/*! Stage processing.

[process] runs one module over a line stream and returns the output lines lazily.

Two regimes are supported, depending on the module contract:

- **Tabular**: the module has source fields or reads fixed-order input. The header is read
  (unless fixed-order), checked against the source fields and extended with the target fields.
  The body is cut into sentences that are handed to [Module::process_sentence] one at a time.
- **Raw text**: no source fields. A header made of the target fields is emitted and the
  whole remaining input is handed to [Module::process_text].

In both regimes [Module::final_output] is appended at the end, if any. It is given the
[StageStats] of the stream, so a module shared between concurrent streams reports on each separately.

Malformed input is counted on the [InputWarnings] handle of the input stream,
also reachable through [TsvStream::warnings].
!*/
use std::{collections::VecDeque, sync::Arc};

use itertools::Itertools;
use log::{debug, info};

use super::sentences::{InputWarnings, Sentences};
use super::stream::{LineStream, Lines};
use crate::error::{Error, HeaderError};
use crate::module::{Binding, FieldTable, Module, StageStats};

/// Progress is logged every `PROGRESS_STEP` sentences.
const PROGRESS_STEP: usize = 1000;

enum State<'a> {
    Tabular {
        sentences: Sentences<'a>,
        binding: Binding,
    },
    /// Raw text input, not handed to the module yet.
    RawPending(LineStream<'a>),
    Raw(Lines<'a>),
    Finalize,
    Done,
}

/// Output of a stage. Yields newline-terminated lines.
pub struct TsvStream<'a> {
    source_name: String,
    module: Arc<dyn Module>,
    state: State<'a>,
    queue: VecDeque<String>,
    failure: Option<Error>,
    stats: StageStats,
    warnings: InputWarnings,
}

/// Run `module` over `stream`.
///
/// The header (if any) is read and validated right away, so header errors are returned
/// before any sentence is processed. Everything else happens while the returned stream is consumed.
///
/// The header is emitted if `emit_header` is set, unless the module's [Module::pass_header] says otherwise.
pub fn process<'a>(
    mut stream: LineStream<'a>,
    module: Arc<dyn Module>,
    conll_comments: bool,
    emit_header: bool,
) -> Result<TsvStream<'a>, Error> {
    let source_name = stream.name().to_string();
    let warnings = stream.warnings().clone();
    let fixed_order = module.fixed_order_tsv_input();
    let mut queue = VecDeque::new();

    let state = if !module.source_fields().is_empty() || fixed_order {
        let mut fields: Vec<String> = if fixed_order {
            Vec::new()
        } else {
            match stream.next() {
                Some(header) => header?.trim().split('\t').map(str::to_string).collect(),
                None => return Err(HeaderError::Missing { source_name }.into()),
            }
        };

        let missing: Vec<&String> = module
            .source_fields()
            .iter()
            .filter(|field| !fields.contains(field))
            .collect();
        if !missing.is_empty() {
            debug!("{}: missing fields {:?}", source_name, missing);
            return Err(HeaderError::MissingFields {
                source_name,
                required: module.source_fields().iter().cloned().collect(),
                found: fields,
            }
            .into());
        }

        fields.extend(module.target_fields().iter().cloned());
        let table = FieldTable::new(fields);

        if module.pass_header().unwrap_or(emit_header) && emit_header {
            queue.push_back(table.header_line());
        }

        let binding = module.prepare_fields(&table)?;
        let lines_read = if fixed_order { 0 } else { 1 };

        info!("processing sentences...");
        State::Tabular {
            sentences: Sentences::new(stream, conll_comments, lines_read),
            binding,
        }
    } else {
        queue.push_back(format!("{}\n", module.target_fields().iter().join("\t")));
        State::RawPending(stream)
    };

    Ok(TsvStream {
        source_name,
        module,
        state,
        queue,
        failure: None,
        stats: StageStats::default(),
        warnings,
    })
}

impl<'a> TsvStream<'a> {
    /// Malformed input met so far, in this stage and the stages before it.
    pub fn warnings(&self) -> &InputWarnings {
        &self.warnings
    }

    /// Sentences and tokens processed so far.
    pub fn stats(&self) -> StageStats {
        self.stats
    }

    /// Advance the state machine by one step, filling the queue.
    fn step(&mut self) -> Option<Result<String, Error>> {
        match std::mem::replace(&mut self.state, State::Done) {
            State::Tabular {
                mut sentences,
                binding,
            } => match sentences.next() {
                Some(Ok(sentence)) => {
                    self.queue
                        .extend(sentence.comments.into_iter().map(|c| format!("{}\n", c)));

                    let tokens = sentence.rows.len();
                    match self.module.process_sentence(sentence.rows, &binding) {
                        Ok(rows) => {
                            self.queue.extend(
                                rows.iter().map(|row| format!("{}\n", row.iter().join("\t"))),
                            );
                            self.queue.push_back("\n".to_string());
                            self.stats.sentences += 1;
                            self.stats.tokens += tokens;
                            if self.stats.sentences % PROGRESS_STEP == 0 {
                                info!("{}...", self.stats.sentences);
                            }
                            self.state = State::Tabular { sentences, binding };
                        }
                        Err(e) => {
                            self.failure = Some(e.at(&self.source_name, sentence.first_line));
                        }
                    }
                    None
                }
                Some(Err(e)) => Some(Err(e)),
                None => {
                    info!("{}...done", self.stats.sentences);
                    self.state = State::Finalize;
                    None
                }
            },
            State::RawPending(input) => {
                match Arc::clone(&self.module).process_text(input) {
                    Ok(lines) => self.state = State::Raw(lines),
                    Err(e) => return Some(Err(e)),
                }
                None
            }
            State::Raw(mut lines) => match lines.next() {
                Some(Ok(line)) => {
                    self.state = State::Raw(lines);
                    Some(Ok(line))
                }
                Some(Err(e)) => Some(Err(e)),
                None => {
                    self.state = State::Finalize;
                    None
                }
            },
            State::Finalize => {
                if let Some(lines) = self.module.final_output(&self.stats) {
                    self.queue.extend(lines);
                }
                None
            }
            State::Done => None,
        }
    }

    fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }
}

impl<'a> Iterator for TsvStream<'a> {
    type Item = Result<String, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(line) = self.queue.pop_front() {
                return Some(Ok(line));
            }
            if let Some(e) = self.failure.take() {
                return Some(Err(e));
            }
            if self.is_done() {
                return None;
            }
            if let Some(item) = self.step() {
                return Some(item);
            }
        }
    }
}
