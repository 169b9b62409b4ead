/*! Pipelines.

A pipeline chains stages over a single stream: the output of each stage is the input of the next one.
Stages are named as in a [crate::registry::Catalog], or through a single preset name.

```text
raw text -> [tok] -> form -> [dummy] -> form, copy -> [count] -> summary
```

Field contracts are checked when the pipeline is built. Lines are processed only when pulled
from the returned stream, one sentence at a time per stage.
!*/
mod builder;
mod options;

pub use builder::{build_pipeline, Pipeline};
pub use options::PipelineOptions;
