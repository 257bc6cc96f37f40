//! Error taxonomy shared by every pipeline component.

use std::fmt;

use thiserror::Error;

use crate::data::model::Value;

/// Which of the two input datasets an ingestion failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetRole {
    Training,
    Test,
}

impl fmt::Display for DatasetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetRole::Training => write!(f, "training"),
            DatasetRole::Test => write!(f, "test"),
        }
    }
}

/// Lifecycle state of a [`Pipeline`](crate::pipeline::Pipeline).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Prepared,
    Trained,
    Scored,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Prepared => "prepared",
            Stage::Trained => "trained",
            Stage::Scored => "scored",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Pipeline step during which an error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Prepare,
    Train,
    Score,
    Finish,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Prepare => "prepare",
            Step::Train => "train",
            Step::Score => "score",
            Step::Finish => "finish",
        };
        f.write_str(name)
    }
}

/// Failure raised by a single component (codec, extractor, trainer, decoder).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An input dataset is malformed or does not match the expected schema.
    #[error("{role} dataset rejected: {source}")]
    DataIngestion {
        role: DatasetRole,
        source: Box<Error>,
    },

    /// Empty, mismatched, or wrongly typed data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A required column is absent from the dataset schema.
    #[error("missing column '{column}'")]
    MissingColumn { column: String },

    /// A label that the codec never saw while fitting.
    #[error("unknown label '{label}'")]
    UnknownLabel { label: Value },

    /// A code (or score) that does not map to any fitted label.
    #[error("code {code} does not map to any of the {n_classes} fitted labels")]
    InvalidCode { code: f64, n_classes: usize },

    /// A pipeline step was called from the wrong state.
    #[error("pipeline is {actual}, expected {expected}")]
    OutOfOrder { expected: Stage, actual: Stage },
}

impl Error {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }

    pub(crate) fn ingestion(role: DatasetRole, source: Error) -> Self {
        Error::DataIngestion {
            role,
            source: Box::new(source),
        }
    }
}

/// A component failure tagged with the pipeline step that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("pipeline failed during {step}: {source}")]
pub struct PipelineError {
    pub step: Step,
    #[source]
    pub source: Error,
}

impl PipelineError {
    pub fn new(step: Step, source: Error) -> Self {
        Self { step, source }
    }

    /// The innermost error, looking through ingestion wrappers.
    pub fn root_cause(&self) -> &Error {
        let mut err = &self.source;
        while let Error::DataIngestion { source, .. } = err {
            err = source;
        }
        err
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
