//! Field tables and bindings.
use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use crate::error::{Error, ModuleError};

/// Bidirectional mapping between field names and column indices,
/// built from the header a stage actually receives (with its target fields appended).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FieldTable {
    /// Build a table from ordered field names.
    ///
    /// Names are not de-duplicated: if a name appears twice, it maps to its last column.
    pub fn new(names: Vec<String>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();
        Self { names, index }
    }

    /// Column index of a field.
    pub fn index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Field name of a column.
    pub fn name(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Header line (tab separated, newline terminated).
    pub fn header_line(&self) -> String {
        format!("{}\n", self.names.iter().join("\t"))
    }
}

/// Column indices a module resolved from a [FieldTable].
///
/// `input_width` is the number of columns incoming rows carry,
/// `width` is the number of columns once target fields are appended.
/// Source fields are bound within the incoming columns, target fields within the appended ones,
/// so a target field may reuse the name of a source field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    sources: HashMap<String, usize>,
    targets: HashMap<String, usize>,
    input_width: usize,
    width: usize,
}

impl Binding {
    /// Resolve `source_fields` and `target_fields` against `table`.
    ///
    /// Fails if any of them is absent from its part of the table.
    pub fn new(
        table: &FieldTable,
        source_fields: &BTreeSet<String>,
        target_fields: &[String],
    ) -> Result<Self, Error> {
        let width = table.len();
        let input_width = width.saturating_sub(target_fields.len());
        let (incoming, appended) = table.names().split_at(input_width);

        let missing = |name: &String, part: &[String]| -> Error {
            ModuleError::InvalidContract {
                names: vec![name.clone()],
                reason: format!("field '{}' is not in {:?}", name, part),
            }
            .into()
        };

        let mut sources = HashMap::new();
        for name in source_fields {
            match incoming.iter().rposition(|n| n == name) {
                Some(idx) => {
                    sources.insert(name.clone(), idx);
                }
                None => return Err(missing(name, incoming)),
            }
        }

        let mut targets = HashMap::new();
        for name in target_fields {
            match appended.iter().rposition(|n| n == name) {
                Some(idx) => {
                    targets.insert(name.clone(), input_width + idx);
                }
                None => return Err(missing(name, appended)),
            }
        }

        Ok(Self {
            sources,
            targets,
            input_width,
            width,
        })
    }

    /// Column index of a bound field, source fields first.
    pub fn get(&self, name: &str) -> Option<usize> {
        self.source(name).or_else(|| self.target(name))
    }

    /// Column index of a source field, always below [Binding::input_width].
    pub fn source(&self, name: &str) -> Option<usize> {
        self.sources.get(name).copied()
    }

    /// Column index of a target field.
    pub fn target(&self, name: &str) -> Option<usize> {
        self.targets.get(name).copied()
    }

    pub fn input_width(&self) -> usize {
        self.input_width
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Check that a row has the number of columns the header declares.
    pub fn check_row(&self, row: &[String]) -> Result<(), Error> {
        if row.len() == self.input_width {
            Ok(())
        } else {
            Err(Error::Custom(format!(
                "expected {} columns but the token row has {}: {:?}",
                self.input_width,
                row.len(),
                row
            )))
        }
    }
}
