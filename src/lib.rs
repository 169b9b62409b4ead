/*! # xtsv

Chains independently written text processing modules (tokenizers, taggers, parsers...)
into a single streaming pipeline over a shared TSV format.

Each module declares the columns it requires and the columns it appends.
Pipelines are checked against these contracts before any line is processed,
then run lazily: pulling a line from the output pulls just enough input to produce it.

```
use xtsv::{builtin, pipeline::{build_pipeline, PipelineOptions}, tsv::LineStream};

let (catalog, presets) = builtin::catalog();
let output = build_pipeline(
    LineStream::from_text("Hello world!\n"),
    &["tok", "dummy"],
    &catalog,
    &presets,
    None,
    PipelineOptions::default(),
)?;

let lines: Vec<String> = output.collect::<Result<_, _>>()?;
assert_eq!(lines[0], "form\tcopy\n");
assert_eq!(lines[1], "Hello\tHello\n");
# Ok::<(), xtsv::error::Error>(())
```
!*/
pub mod builtin;
pub mod config;
pub mod error;
pub mod module;
pub mod pipeline;
pub mod registry;
pub mod tsv;
