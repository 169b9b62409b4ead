//! # xtsv
//!
//! Chains independently written text processing modules over a TSV stream.
//!
//! ```sh
//! xtsv 1.0.0
//! Run chains of TSV processing modules.
//!
//! USAGE:
//!     xtsv [FLAGS] [OPTIONS] [task]
//!
//! EXAMPLES:
//!     echo "Hello world!" | xtsv tok,dummy
//!     xtsv -i corpus.tsv -o out.tsv --conllu-comments dummy
//!     xtsv --token "Hello world" tok
//!     xtsv --list
//! ```
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use env_logger::Env;
use log::{debug, info, warn};
use structopt::StructOpt;

use xtsv::{
    builtin,
    config::CatalogConfig,
    error::Error,
    pipeline::{Pipeline, PipelineOptions},
    registry::{Catalog, Presets},
    tsv::{LineStream, INPUT_TEXT},
};

mod cli;

fn list<W: Write>(out: &mut W, catalog: &Catalog, presets: &Presets) -> Result<(), Error> {
    writeln!(out, "Available modules:")?;
    for (name, friendly_name) in catalog.friendly_names() {
        writeln!(out, "  {}\t{}", name, friendly_name)?;
    }
    writeln!(out, "Presets:")?;
    for (name, preset) in presets.iter() {
        writeln!(
            out,
            "  {}\t{} ({})",
            name,
            preset.friendly_name,
            preset.stages.join(",")
        )?;
    }
    Ok(())
}

fn main() -> Result<(), Error> {
    let opt = cli::Xtsv::from_args();
    let level = if opt.verbose { "warn" } else { "error" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
    debug!("cli args\n{:#?}", opt);

    let (catalog, presets, defaults) = match &opt.config {
        Some(path) => {
            let config = CatalogConfig::from_path(path)?;
            let defaults = config.options;
            let (catalog, presets) = config.into_catalog(builtin::loaders())?;
            (catalog, presets, defaults)
        }
        None => {
            let (catalog, presets) = builtin::catalog();
            (catalog, presets, PipelineOptions::default())
        }
    };

    let mut out: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    if opt.list {
        list(&mut out, &catalog, &presets)?;
        out.flush()?;
        return Ok(());
    }

    let stages = opt.stages();
    if stages.is_empty() {
        return Err(Error::Custom(
            "No task given, see --list for available modules".to_string(),
        ));
    }
    let pipeline = Pipeline::new(&catalog, &presets).with_options(opt.options(defaults));

    match &opt.token {
        Some(token) => {
            if stages.len() > 1 {
                warn!("Single token mode uses the first stage only ({})", stages[0]);
            }
            let result = pipeline.process_token(&stages[0], token)?;
            writeln!(out, "{}", serde_json::to_string_pretty(&result)?)?;
        }
        None => {
            let input = match (&opt.input, &opt.text) {
                (Some(path), _) => LineStream::from_path(path)?,
                (None, Some(text)) => LineStream::from_string(text.clone()),
                (None, None) => LineStream::from_reader(INPUT_TEXT, io::stdin().lock()),
            };

            info!("running {} on {}", stages.join(","), input.name());
            for line in pipeline.build(input, &stages)? {
                out.write_all(line?.as_bytes())?;
            }
        }
    }

    out.flush()?;
    Ok(())
}
