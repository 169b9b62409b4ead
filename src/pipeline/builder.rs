//! Pipeline building.
use std::{
    collections::{BTreeSet, HashMap},
    sync::Arc,
};

use log::{debug, info};
use serde_json::{Map, Value};

use super::PipelineOptions;
use crate::error::{Error, ModuleError};
use crate::module::Module;
use crate::registry::{Catalog, ModuleRegistry, Presets};
use crate::tsv::{process, LineStream, INPUT_TEXT};

/// Compose the stages named by `stages` over `input`.
///
/// `stages` is either a list of stage names or a single preset name.
/// Modules are taken from `registry`, or from a registry living only for this call if none is given.
///
/// Field contracts are checked for every stage before anything is processed:
/// a field mismatch fails the whole pipeline without producing a single line.
/// The returned stream is lazy, and is named after the friendly name of the last stage.
/// Its [LineStream::warnings] handle counts the malformed input met by every stage.
pub fn build_pipeline<'a, S: AsRef<str>>(
    input: LineStream<'a>,
    stages: &[S],
    catalog: &Catalog,
    presets: &Presets,
    registry: Option<&ModuleRegistry>,
    options: PipelineOptions,
) -> Result<LineStream<'a>, Error> {
    let stages = presets.resolve(stages);
    if stages.is_empty() {
        return Err(Error::Custom("No stage given to build the pipeline".to_string()));
    }

    let local;
    let registry = match registry {
        Some(registry) => registry,
        None => {
            local = ModuleRegistry::new();
            &local
        }
    };
    let modules = registry.load_all(&stages, catalog)?;
    let chain = stages
        .iter()
        .map(|name| -> Result<(String, Arc<dyn Module>), Error> {
            let module = modules.get(name).cloned().ok_or_else(|| ModuleError::NotFound {
                name: name.clone(),
                available: catalog.available_names(),
            })?;
            let friendly_name = catalog.friendly_name(name).unwrap_or(name).to_string();
            Ok((friendly_name, module))
        })
        .collect::<Result<Vec<_>, Error>>()?;

    // peek the header to get the initial fields
    let mut input = input;
    let mut produced: BTreeSet<String> = BTreeSet::new();
    if let Some(header) = input.next().transpose()? {
        produced.extend(header.trim().split('\t').map(str::to_string));
        input = input.prepend(header);
    }
    if chain[0].1.source_fields().is_empty() {
        produced.clear();
    }

    check_fields(&chain, produced)?;

    info!("running {:?}", stages);
    let last = chain.len() - 1;
    let mut stream = input;
    for (idx, (friendly_name, module)) in chain.into_iter().enumerate() {
        let emit_header = idx != last || options.output_header;
        let output = process(stream, module, options.conll_comments, emit_header)?;
        let warnings = output.warnings().clone();
        stream = LineStream::new(friendly_name, Box::new(output)).with_warnings(warnings);
    }

    Ok(stream)
}

/// Check that every stage finds its source fields in what the previous ones produce.
fn check_fields(
    chain: &[(String, Arc<dyn Module>)],
    mut produced: BTreeSet<String>,
) -> Result<(), Error> {
    let mut previous = INPUT_TEXT;
    for (friendly_name, module) in chain {
        if !module.source_fields().is_subset(&produced) {
            return Err(ModuleError::FieldMismatch {
                stage: friendly_name.clone(),
                required: module.source_fields().iter().cloned().collect(),
                previous: previous.to_string(),
                available: produced.into_iter().collect(),
            }
            .into());
        }
        debug!("{}: {:?} -> {:?}", friendly_name, produced, module.target_fields());
        produced.extend(module.target_fields().iter().cloned());
        previous = friendly_name.as_str();
    }
    Ok(())
}

/// Pipeline factory bound to a catalog, with an optional shared registry.
///
/// Without a registry, each call builds the modules it needs and drops them afterwards.
#[derive(Debug, Clone)]
pub struct Pipeline<'c> {
    catalog: &'c Catalog,
    presets: &'c Presets,
    registry: Option<Arc<ModuleRegistry>>,
    options: PipelineOptions,
}

impl<'c> Pipeline<'c> {
    pub fn new(catalog: &'c Catalog, presets: &'c Presets) -> Self {
        Self {
            catalog,
            presets,
            registry: None,
            options: PipelineOptions::default(),
        }
    }

    /// Share `registry` between every pipeline built from `self`.
    pub fn with_registry(mut self, registry: Arc<ModuleRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> PipelineOptions {
        self.options
    }

    pub fn registry(&self) -> Option<&Arc<ModuleRegistry>> {
        self.registry.as_ref()
    }

    /// See [build_pipeline].
    pub fn build<'a, S: AsRef<str>>(
        &self,
        input: LineStream<'a>,
        stages: &[S],
    ) -> Result<LineStream<'a>, Error> {
        build_pipeline(
            input,
            stages,
            self.catalog,
            self.presets,
            self.registry.as_deref(),
            self.options,
        )
    }

    /// Run the single token operation of `stage` on `token`.
    ///
    /// Returns `{"<token>": <result>}`.
    pub fn process_token(&self, stage: &str, token: &str) -> Result<Value, Error> {
        let local;
        let registry = match &self.registry {
            Some(registry) => registry.as_ref(),
            None => {
                local = ModuleRegistry::new();
                &local
            }
        };

        let mut modules: HashMap<String, Arc<dyn Module>> =
            registry.load_all(&[stage.to_string()], self.catalog)?;
        let module = modules.remove(stage).ok_or_else(|| ModuleError::NotFound {
            name: stage.to_string(),
            available: self.catalog.available_names(),
        })?;

        match module.process_token(token) {
            Some(result) => {
                let mut object = Map::new();
                object.insert(token.to_string(), result?);
                Ok(Value::Object(object))
            }
            None => Err(ModuleError::Unsupported {
                name: stage.to_string(),
                operation: "single token processing",
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::builtin;
    use crate::registry::ModuleDescriptor;

    fn run(stream: LineStream) -> Vec<String> {
        stream.map(|l| l.unwrap()).collect()
    }

    fn build(text: &str, stages: &[&str], options: PipelineOptions) -> Result<Vec<String>, Error> {
        let (catalog, presets) = builtin::catalog();
        let stream = build_pipeline(
            LineStream::from_text(text),
            stages,
            &catalog,
            &presets,
            None,
            options,
        )?;
        Ok(run(stream))
    }

    #[test]
    fn single_stage() {
        let out = build("form\nHello\n\n", &["dummy"], PipelineOptions::default()).unwrap();
        assert_eq!(out, vec!["form\tcopy\n", "Hello\tHello\n", "\n"]);
    }

    #[test]
    fn raw_text_chain() {
        let out = build("Hello world!\n", &["tok", "upper"], PipelineOptions::default()).unwrap();
        assert_eq!(
            out,
            vec![
                "form\tupper_form\n",
                "Hello\tHELLO\n",
                "world\tWORLD\n",
                "!\t!\n",
                "\n"
            ]
        );
    }

    #[test]
    fn preset() {
        let out = build("Hello world!\n", &["full"], PipelineOptions::default()).unwrap();
        assert_eq!(
            out,
            vec![
                "Hello\tHELLO\n",
                "world\tWORLD\n",
                "!\t!\n",
                "\n",
                "# sentences: 1, tokens: 3\n"
            ]
        );
    }

    #[test]
    fn no_output_header() {
        let options = PipelineOptions::default().with_output_header(false);
        let out = build("A dog.\n", &["tok", "dummy"], options).unwrap();
        assert_eq!(out, vec!["A\tA\n", "dog\tdog\n", ".\t.\n", "\n"]);
    }

    #[test]
    fn stream_named_after_last_stage() {
        let (catalog, presets) = builtin::catalog();
        let stream = Pipeline::new(&catalog, &presets)
            .build(LineStream::from_text("Hi\n"), &["tok", "dummy"])
            .unwrap();
        assert_eq!(stream.name(), "Dummy tagger");
    }

    #[test]
    fn field_mismatch_first_stage() {
        let err = build("word\nfoo\n\n", &["count"], PipelineOptions::default())
            .err()
            .unwrap();
        match err {
            Error::Module(ModuleError::FieldMismatch {
                stage,
                required,
                previous,
                available,
            }) => {
                assert_eq!(stage, "Token counter");
                assert_eq!(required, vec!["form"]);
                assert_eq!(previous, "Input Text");
                assert_eq!(available, vec!["word"]);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }

    #[test]
    fn field_mismatch_later_stage() {
        let (mut catalog, presets) = builtin::catalog();
        catalog.add(
            ModuleDescriptor::new("copier", "Lemma copier")
                .with_args(vec![json!("lemma"), json!("lemma2")]),
            &["lemma"],
        );
        let err = build_pipeline(
            LineStream::from_text("Hello\n"),
            &["tok", "dummy", "lemma"],
            &catalog,
            &presets,
            None,
            PipelineOptions::default(),
        )
        .err()
        .unwrap();

        assert_eq!(
            err.to_string(),
            "ERROR: 'Lemma copier' module requires [\"lemma\"] fields \
             but the previous module 'Dummy tagger' has only [\"copy\", \"form\"] fields!"
        );
    }

    #[test]
    fn empty_and_unknown_stages() {
        assert!(matches!(
            build("form\n", &[], PipelineOptions::default()),
            Err(Error::Custom(_))
        ));
        assert!(matches!(
            build("form\n", &["tok", "parse"], PipelineOptions::default()),
            Err(Error::Module(ModuleError::NotFound { .. }))
        ));
    }

    #[test]
    fn shared_registry() {
        let (catalog, presets) = builtin::catalog();
        let registry = Arc::new(ModuleRegistry::new());
        let pipeline = Pipeline::new(&catalog, &presets).with_registry(registry.clone());

        let a = run(pipeline.build(LineStream::from_text("form\nx\n\n"), &["dummy"]).unwrap());
        let b = run(pipeline.build(LineStream::from_text("form\nx\n\n"), &["copy"]).unwrap());
        assert_eq!(a, b);
        assert_eq!(registry.constructions(), 1);
    }

    #[test]
    fn single_token() {
        let (catalog, presets) = builtin::catalog();
        let pipeline = Pipeline::new(&catalog, &presets);
        assert_eq!(
            pipeline.process_token("tok", "Hello world").unwrap(),
            json!({"Hello world": ["Hello", "world"]})
        );
        assert!(matches!(
            pipeline.process_token("dummy", "Hello"),
            Err(Error::Module(ModuleError::Unsupported { .. }))
        ));
    }
}
