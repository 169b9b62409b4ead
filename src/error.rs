//! Error enum
use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    Serde(serde_json::Error),
    Header(HeaderError),
    Module(ModuleError),
    /// Error raised while a module processed a sentence,
    /// tagged with the stream name and the line where the sentence began.
    Located {
        source_name: String,
        line: usize,
        inner: Box<Error>,
    },
    Custom(String),
}

impl Error {
    /// Wrap `self` with the stream name and (1-based) line number.
    pub fn at(self, source_name: &str, line: usize) -> Error {
        Error::Located {
            source_name: source_name.to_string(),
            line,
            inner: Box::new(self),
        }
    }

    /// Get the innermost error, skipping location wrappers.
    pub fn root(&self) -> &Error {
        match self {
            Error::Located { inner, .. } => inner.root(),
            e => e,
        }
    }
}

/// The input header does not fit the stage reading it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderError {
    /// Stream ended before a header line could be read.
    Missing { source_name: String },
    MissingFields {
        source_name: String,
        required: Vec<String>,
        found: Vec<String>,
    },
}

/// Problems with the requested modules or their contracts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleError {
    NotFound {
        name: String,
        available: Vec<String>,
    },
    InvalidContract {
        names: Vec<String>,
        reason: String,
    },
    FieldMismatch {
        stage: String,
        required: Vec<String>,
        previous: String,
        available: Vec<String>,
    },
    Unsupported {
        name: String,
        operation: &'static str,
    },
    Lock(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Serde(e) => write!(f, "JSON error: {}", e),
            Error::Header(e) => write!(f, "{}", e),
            Error::Module(e) => write!(f, "{}", e),
            Error::Located {
                source_name,
                line,
                inner,
            } => write!(f, "In \"{}\" at {}: {}", source_name, line, inner),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for HeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderError::Missing { source_name } => {
                write!(f, "Input ({}) has no header line", source_name)
            }
            HeaderError::MissingFields {
                source_name,
                required,
                found,
            } => write!(
                f,
                "Input ({}) does not have the required field names ({:?}). \
                 The following field names found: {:?}",
                source_name, required, found
            ),
        }
    }
}

impl fmt::Display for ModuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleError::NotFound { name, available } => write!(
                f,
                "ERROR: '{}' module not found. Available modules: {}",
                name,
                available.join(",")
            ),
            ModuleError::InvalidContract { names, reason } => write!(
                f,
                "Module named {} has an invalid field contract: {}",
                names.join(","),
                reason
            ),
            ModuleError::FieldMismatch {
                stage,
                required,
                previous,
                available,
            } => write!(
                f,
                "ERROR: '{}' module requires {:?} fields but the previous module '{}' has only {:?} fields!",
                stage, required, previous, available
            ),
            ModuleError::Unsupported { name, operation } => {
                write!(f, "Module '{}' does not support {}", name, operation)
            }
            ModuleError::Lock(what) => write!(f, "Problem locking {}", what),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Serde(e) => Some(e),
            Error::Located { inner, .. } => Some(inner.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Error {
        Error::Serde(e)
    }
}

impl From<HeaderError> for Error {
    fn from(e: HeaderError) -> Error {
        Error::Header(e)
    }
}

impl From<ModuleError> for Error {
    fn from(e: ModuleError) -> Error {
        Error::Module(e)
    }
}

impl From<String> for Error {
    fn from(s: String) -> Error {
        Error::Custom(s)
    }
}
