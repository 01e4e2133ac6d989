use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IniError {
    #[error("{message} (line {line})")]
    Format { line: usize, message: String },

    #[error("no linked file specified to sync to")]
    NoLinkedFile,

    #[error("can't open ini file '{path}' for writing: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("required ini file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to parse ini file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: Box<IniError>,
    },

    #[error("failed to read ini file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("ini stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error("failed to deserialize ini content: {0}")]
    Deserialize(#[from] toml::de::Error),
}

impl IniError {
    pub(crate) fn format(line: usize, message: impl Into<String>) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }

    /// The 1-based source line for format errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Format { line, .. } => Some(*line),
            Self::Parse { source, .. } => source.line(),
            _ => None,
        }
    }
}

/// A stored value could not be parsed as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot convert '{text}' to {target}")]
pub struct ConversionError {
    pub text: String,
    pub target: &'static str,
}

impl ConversionError {
    pub fn new<T: ?Sized>(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target: std::any::type_name::<T>(),
        }
    }
}
