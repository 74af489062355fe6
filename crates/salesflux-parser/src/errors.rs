use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("input file {} does not exist", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("data row at line {line} invalid: {message}")]
    DataRow { line: u64, message: String },

    #[error("failed to build transaction table: {message}")]
    Frame { message: String },
}

impl LoadError {
    /// True when the input file was absent, as opposed to present but unreadable or malformed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, LoadError::NotFound { .. })
    }
}

impl From<csv::Error> for LoadError {
    fn from(source: csv::Error) -> Self {
        LoadError::Csv { source }
    }
}
