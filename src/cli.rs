//! Command line arguments and parameters management/parsing.
use std::path::PathBuf;

use structopt::StructOpt;
use xtsv::pipeline::PipelineOptions;

#[derive(Debug, StructOpt)]
#[structopt(name = "xtsv", about = "Run chains of TSV processing modules.")]
/// Pipeline command and parameters.
///
/// ```sh
/// USAGE:
///     xtsv [FLAGS] [OPTIONS] [task]
///
/// ARGS:
///     <task>    stages to run, separated by commas (tok,dummy), or a preset name
/// ```
pub struct Xtsv {
    #[structopt(help = "stages to run, separated by commas (tok,dummy), or a preset name")]
    pub task: Option<String>,
    #[structopt(
        short = "i",
        long = "input",
        parse(from_os_str),
        conflicts_with = "text",
        help = "input file. Default is stdin."
    )]
    pub input: Option<PathBuf>,
    #[structopt(short = "t", long = "text", help = "use the given text as input")]
    pub text: Option<String>,
    #[structopt(
        short = "o",
        long = "output",
        parse(from_os_str),
        help = "output file. Default is stdout."
    )]
    pub output: Option<PathBuf>,
    #[structopt(long = "verbose", help = "show warnings (RUST_LOG takes precedence)")]
    pub verbose: bool,
    #[structopt(long = "conllu-comments", help = "keep comment lines found before sentences")]
    pub conllu_comments: bool,
    #[structopt(long = "no-conllu-comments", help = "treat comment lines as token rows")]
    pub no_conllu_comments: bool,
    #[structopt(long = "output-header", help = "emit the header of the last stage")]
    pub output_header: bool,
    #[structopt(long = "no-output-header", help = "do not emit the header of the last stage")]
    pub no_output_header: bool,
    #[structopt(
        long = "config",
        parse(from_os_str),
        help = "JSON catalog of modules and presets. Default is the built-in catalog."
    )]
    pub config: Option<PathBuf>,
    #[structopt(long = "list", help = "list available modules and presets")]
    pub list: bool,
    #[structopt(long = "token", help = "process a single token with the (only) given stage")]
    pub token: Option<String>,
}

/// `--flag` / `--no-flag` pairs, `--no-flag` winning.
fn switch(on: bool, off: bool, default: bool) -> bool {
    if off {
        false
    } else {
        on || default
    }
}

impl Xtsv {
    /// Stage names of the task, in order.
    pub fn stages(&self) -> Vec<String> {
        self.task
            .as_deref()
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|stage| !stage.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Command line flags applied over `defaults`.
    pub fn options(&self, defaults: PipelineOptions) -> PipelineOptions {
        defaults
            .with_conll_comments(switch(
                self.conllu_comments,
                self.no_conllu_comments,
                defaults.conll_comments,
            ))
            .with_output_header(switch(
                self.output_header,
                self.no_output_header,
                defaults.output_header,
            ))
    }
}
