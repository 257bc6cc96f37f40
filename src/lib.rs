//! sales-screen: flag suspicious sales transactions.
//!
//! A linear regression is fitted on the integer-encoded label of a small
//! labeled slice of the transactions, and its rounded output is decoded
//! back to labels for a held-out set.
//!
//! # Key Types
//!
//! - [`Pipeline`] - Prepare / train / score / finish state machine
//! - [`PipelineConfig`] - Columns, training subset size, rounding, trainer params
//! - [`LabelCodec`] - Label ↔ integer code mapping
//! - [`LinearRegression`] / [`LinearModel`] - OLS trainer and fitted model
//! - [`Dataset`] / [`Value`] - In-memory tabular data
//!
//! # Example
//!
//! ```ignore
//! use sales_screen::{Pipeline, PipelineConfig, data::loader::load_file};
//!
//! let training = load_file("datasets/Train.csv".as_ref())?;
//! let test = load_file("datasets/Test.csv".as_ref())?;
//! let predictions = Pipeline::new(PipelineConfig::default()).run(training, test)?;
//! ```

pub mod codec;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod regression;
pub mod report;

pub use codec::LabelCodec;
pub use config::{ConfigError, PipelineConfig};
pub use data::features::{FeatureMatrix, extract};
pub use data::model::{Dataset, Row, Value};
pub use error::{DatasetRole, Error, PipelineError, Stage, Step};
pub use pipeline::{Pipeline, Predictions};
pub use regression::{
    Decoded, LinearModel, LinearRegression, RoundingMode, TrainerParams, decode_predictions,
    predict,
};
