/*! Module contract.

Every processing module (tokenizer, tagger, parser...) implements [Module] to be useable in pipelines.
A module declares the fields it reads (`source_fields`) and the fields it appends (`target_fields`),
and exposes one of two processing entry points:

- [Module::process_sentence] for modules reading TSV (one sentence at a time),
- [Module::process_text] for modules reading raw text (no source fields, no header).

[Module::process_token] and [Module::final_output] are optional.
!*/
mod fields;

use std::{collections::BTreeSet, sync::Arc};

use serde_json::Value;

use crate::error::{Error, ModuleError};
use crate::tsv::{LineStream, Lines};

pub use fields::{Binding, FieldTable};

/// One token, one value per column.
pub type Row = Vec<String>;

/// Token rows of a sentence, in input order.
pub type Sentence = Vec<Row>;

/// What one stage invocation handed to its module.
///
/// Kept by the stream, not by the module: modules are shared between streams.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageStats {
    /// Sentences processed successfully.
    pub sentences: usize,
    /// Token rows of those sentences.
    pub tokens: usize,
}

pub trait Module: Send + Sync {
    /// Fields the module requires. Empty for modules reading raw text.
    fn source_fields(&self) -> &BTreeSet<String>;

    /// Fields the module appends, in order.
    fn target_fields(&self) -> &[String];

    /// `true` if the module reads headerless TSV with a module-defined column order.
    fn fixed_order_tsv_input(&self) -> bool {
        false
    }

    /// Overrides header emission. `Some(false)` holds the header back even when it is requested.
    fn pass_header(&self) -> Option<bool> {
        None
    }

    /// Bind field names to column indices, once per stage invocation.
    fn prepare_fields(&self, fields: &FieldTable) -> Result<Binding, Error> {
        Binding::new(fields, self.source_fields(), self.target_fields())
    }

    /// Process one sentence, returning its token rows (target columns appended).
    fn process_sentence(&self, sentence: Sentence, fields: &Binding) -> Result<Sentence, Error> {
        let _ = (sentence, fields);
        Err(unsupported::<Self>("sentence processing"))
    }

    /// Process raw text. Returned lines are forwarded as-is and must be newline terminated.
    fn process_text<'a>(self: Arc<Self>, input: LineStream<'a>) -> Result<Lines<'a>, Error> {
        let _ = input;
        Err(unsupported::<Self>("raw text processing"))
    }

    /// Process a single token, if the module supports it.
    fn process_token(&self, token: &str) -> Option<Result<Value, Error>> {
        let _ = token;
        None
    }

    /// Trailing lines, emitted once every sentence of a stream has been processed.
    fn final_output(&self, stats: &StageStats) -> Option<Vec<String>> {
        let _ = stats;
        None
    }
}

fn unsupported<T: ?Sized>(operation: &'static str) -> Error {
    ModuleError::Unsupported {
        name: std::any::type_name::<T>().to_string(),
        operation,
    }
    .into()
}

/// Check that a freshly built module exposes a usable field contract.
///
/// `names` are the stage names the module is built for, used in the error message.
pub fn validate_contract(names: &[String], module: &dyn Module) -> Result<(), Error> {
    let invalid = |reason: String| -> Error {
        ModuleError::InvalidContract {
            names: names.to_vec(),
            reason,
        }
        .into()
    };

    for field in module.source_fields().iter().chain(module.target_fields()) {
        if field.is_empty() {
            return Err(invalid("empty field name".to_string()));
        }
        if field.contains(['\t', '\n', '\r']) {
            return Err(invalid(format!(
                "field name {:?} contains a tab or a line break",
                field
            )));
        }
    }

    if module.fixed_order_tsv_input() && !module.source_fields().is_empty() {
        return Err(invalid(
            "fixed-order input modules read no header and cannot require source fields"
                .to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fields {
        source: BTreeSet<String>,
        target: Vec<String>,
        fixed: bool,
    }

    impl Module for Fields {
        fn source_fields(&self) -> &BTreeSet<String> {
            &self.source
        }
        fn target_fields(&self) -> &[String] {
            &self.target
        }
        fn fixed_order_tsv_input(&self) -> bool {
            self.fixed
        }
    }

    fn module(source: &[&str], target: &[&str], fixed: bool) -> Fields {
        Fields {
            source: source.iter().map(|s| s.to_string()).collect(),
            target: target.iter().map(|s| s.to_string()).collect(),
            fixed,
        }
    }

    #[test]
    fn valid_contracts() {
        let names = vec!["dummy".to_string()];
        assert!(validate_contract(&names, &module(&["form"], &["lemma"], false)).is_ok());
        assert!(validate_contract(&names, &module(&[], &["form"], false)).is_ok());
        assert!(validate_contract(&names, &module(&[], &[], true)).is_ok());
    }

    #[test]
    fn invalid_contracts() {
        let names = vec!["dummy".to_string(), "copy".to_string()];
        let err = validate_contract(&names, &module(&["form"], &["a\tb"], false)).unwrap_err();
        match err {
            Error::Module(ModuleError::InvalidContract { names, .. }) => {
                assert_eq!(names, vec!["dummy", "copy"])
            }
            e => panic!("unexpected error {:?}", e),
        }
        assert!(validate_contract(&names, &module(&[""], &[], false)).is_err());
        assert!(validate_contract(&names, &module(&["form"], &[], true)).is_err());
    }

    #[test]
    fn optional_operations_default() {
        let m = Arc::new(module(&["form"], &[], false));
        assert!(m.process_token("foo").is_none());
        assert!(m.final_output(&StageStats::default()).is_none());
        assert_eq!(m.pass_header(), None);

        let table = FieldTable::new(vec!["form".to_string()]);
        let binding = m.prepare_fields(&table).unwrap();
        assert!(matches!(
            m.process_sentence(vec![vec!["foo".to_string()]], &binding),
            Err(Error::Module(ModuleError::Unsupported { .. }))
        ));
        assert!(m.process_text(LineStream::from_text("foo")).is_err());
    }
}
