//! Linear regression used as a label classifier.
//!
//! - [`LinearRegression`] / [`TrainerParams`]: closed-form OLS training
//! - [`LinearModel`]: fitted weights and bias
//! - [`predict`], [`decode_predictions`]: scoring and rounding back to labels

mod linalg;
mod model;
mod predict;
mod trainer;

pub use model::LinearModel;
pub use predict::{Decoded, RoundingMode, decode_predictions, predict};
pub use trainer::{LinearRegression, TrainerParams};
