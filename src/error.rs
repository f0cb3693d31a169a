//! Error type shared by the loaders, classifiers and evaluation helpers.
use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Missing or unreadable file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Delimited text could not be parsed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Model or config file could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File parsed but its content does not follow the expected layout.
    #[error("format error: {0}")]
    Format(String),

    /// A classifier hyperparameter is missing or zero.
    #[error("configuration error: {field} is empty")]
    Config { field: &'static str },

    /// Empty training set, ragged rows, shape mismatches.
    #[error("data error: {0}")]
    Data(String),

    /// `predict` or `save` called before `fit`/`load`.
    #[error("{0}: classifier is not trained")]
    NotTrained(&'static str),
}

impl Error {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        Error::Format(msg.into())
    }

    pub(crate) fn data(msg: impl Into<String>) -> Self {
        Error::Data(msg.into())
    }
}
