//! Error taxonomy shared by every crate in the workspace.
//!
//! All failures are terminal for the current run: nothing here is retried.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A setup field was missing, non-numeric or out of range.
    #[error("invalid input for {field}: {reason}")]
    InvalidExperimenterInput { field: &'static str, reason: String },

    #[error("dataset directory does not exist: {}", .0.display())]
    DatasetDirectoryMissing(PathBuf),

    #[error("no images found in {}", .0.display())]
    EmptyDataset(PathBuf),

    /// Every image in the universe is already part of the study set.
    #[error("cannot draw {needed} new images: all {universe} images are in the study set")]
    InsufficientImages { needed: usize, universe: usize },

    /// A rate was requested over zero trials of its kind.
    #[error("{rate} is undefined: no trials in its denominator")]
    DivisionUndefined { rate: &'static str },

    #[error("mean reaction time is undefined: no valid responses")]
    NoValidResponses,

    /// A stored table could not be parsed back into records.
    #[error("table {}: {message}", path.display())]
    Table { path: PathBuf, message: String },

    #[error("display: {0}")]
    Display(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidExperimenterInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn table(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Table {
            path: path.into(),
            message: message.to_string(),
        }
    }
}
