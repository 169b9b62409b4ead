/*! Built-in modules

Small modules covering every processing regime:

| loader      | module                 | regime                     |
|-------------|------------------------|----------------------------|
| `tokenizer` | [WordTokenizer]        | raw text                   |
| `copier`    | [FieldCopier]          | sentences                  |
| `counter`   | [TokenCounter]         | sentences, trailing output |
| `fixed`     | [FixedOrderImporter]   | headerless sentences       |

[loaders] builds the factory table, [catalog] the default catalog and presets used by the binary.
!*/
mod copier;
mod counter;
mod fixed;
mod tokenizer;

use std::sync::Arc;

use serde_json::{json, Map, Value};

use crate::error::Error;
use crate::module::Module;
use crate::registry::{Catalog, Loaders, ModuleDescriptor, Preset, Presets};

pub use copier::FieldCopier;
pub use counter::TokenCounter;
pub use fixed::FixedOrderImporter;
pub use tokenizer::WordTokenizer;

/// String arguments of a loader.
fn string_args(loader: &str, args: &[Value]) -> Result<Vec<String>, Error> {
    args.iter()
        .map(|arg| {
            arg.as_str().map(str::to_string).ok_or_else(|| {
                Error::Custom(format!("{}: expected field names, got {}", loader, arg))
            })
        })
        .collect()
}

fn copier(args: &[Value], kwargs: &Map<String, Value>) -> Result<Arc<dyn Module>, Error> {
    match string_args("copier", args)?.as_slice() {
        [source, target] => {
            let upper = kwargs.get("upper").and_then(Value::as_bool).unwrap_or(false);
            Ok(Arc::new(FieldCopier::new(source, target, upper)))
        }
        other => Err(Error::Custom(format!(
            "copier: expected a source and a target field, got {:?}",
            other
        ))),
    }
}

fn counter(args: &[Value], _: &Map<String, Value>) -> Result<Arc<dyn Module>, Error> {
    let fields = string_args("counter", args)?;
    if fields.is_empty() {
        return Err(Error::Custom(
            "counter: at least one source field is needed".to_string(),
        ));
    }
    Ok(Arc::new(TokenCounter::new(&fields)))
}

fn fixed(args: &[Value], _: &Map<String, Value>) -> Result<Arc<dyn Module>, Error> {
    let columns = string_args("fixed", args)?;
    Ok(Arc::new(FixedOrderImporter::new(&columns)))
}

/// Factory table of the built-in modules.
pub fn loaders() -> Loaders {
    let mut loaders = Loaders::new();
    loaders
        .register("tokenizer", |_, _| {
            let module: Arc<dyn Module> = Arc::new(WordTokenizer::default());
            Ok(module)
        })
        .register("copier", copier)
        .register("counter", counter)
        .register("fixed", fixed);
    loaders
}

/// Default catalog and presets.
pub fn catalog() -> (Catalog, Presets) {
    let mut catalog = Catalog::new(loaders());
    catalog
        .add(
            ModuleDescriptor::new("tokenizer", "Tokenizer"),
            &["tok", "tokenize"],
        )
        .add(
            ModuleDescriptor::new("copier", "Upper-caser")
                .with_args(vec![json!("form"), json!("upper_form")])
                .with_kwarg("upper", json!(true)),
            &["upper"],
        )
        .add(
            ModuleDescriptor::new("copier", "Dummy tagger")
                .with_args(vec![json!("form"), json!("copy")]),
            &["dummy"],
        )
        // same construction as `dummy`, so both names share one instance
        .add(
            ModuleDescriptor::new("copier", "Copier").with_args(vec![json!("form"), json!("copy")]),
            &["copy"],
        )
        .add(
            ModuleDescriptor::new("counter", "Token counter").with_args(vec![json!("form")]),
            &["count"],
        )
        .add(
            ModuleDescriptor::new("fixed", "Fixed-order importer")
                .with_args(vec![json!("form"), json!("xpos")]),
            &["fixed"],
        );

    let mut presets = Presets::new();
    presets.register(
        "full",
        Preset::new("Tokenize, upper-case and count", &["tok", "upper", "count"]),
    );
    (catalog, presets)
}
