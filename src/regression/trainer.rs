//! Ordinary least squares training.

use ndarray::{Array1, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use super::linalg::lstsq;
use super::model::LinearModel;
use crate::data::features::FeatureMatrix;
use crate::error::{Error, Result};

// =============================================================================
// Parameters
// =============================================================================

/// Parameters for [`LinearRegression`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainerParams {
    /// Fit a bias term. When false the model passes through the origin.
    pub fit_intercept: bool,
    /// Relative singular-value cutoff. Directions of the centered design
    /// matrix with `σ <= rank_tolerance × σmax` are dropped.
    pub rank_tolerance: f64,
}

impl Default for TrainerParams {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            rank_tolerance: 1e-12,
        }
    }
}

// =============================================================================
// Trainer
// =============================================================================

/// Closed-form least squares fit of `target ≈ w·x + b`.
///
/// The weights minimise `‖Xc w − yc‖²` through an SVD of `Xc` (`X` centered
/// on the column means when an intercept is fitted). For full-rank features
/// this is the unique OLS optimum; for rank-deficient features it is the
/// minimum-norm OLS solution.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    params: TrainerParams,
}

impl LinearRegression {
    pub fn new(params: TrainerParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &TrainerParams {
        &self.params
    }

    /// Fit on `features` (one row per sample) and matching `targets`.
    pub fn fit(
        &self,
        features: &FeatureMatrix,
        targets: ArrayView1<'_, f64>,
    ) -> Result<LinearModel> {
        let x = features.view();
        let (n_samples, n_features) = x.dim();

        if n_samples == 0 {
            return Err(Error::invalid_input("cannot fit on zero samples"));
        }
        if n_samples != targets.len() {
            return Err(Error::invalid_input(format!(
                "{n_samples} feature rows but {} targets",
                targets.len()
            )));
        }
        if n_features == 0 {
            return Err(Error::invalid_input("cannot fit without feature columns"));
        }
        if x.iter().chain(targets.iter()).any(|v| !v.is_finite()) {
            return Err(Error::invalid_input("features and targets must be finite"));
        }

        let (x_mean, y_mean) = if self.params.fit_intercept {
            (
                x.mean_axis(Axis(0)).unwrap_or_else(|| Array1::zeros(n_features)),
                targets.mean().unwrap_or(0.0),
            )
        } else {
            (Array1::zeros(n_features), 0.0)
        };

        let xc = &x - &x_mean;
        let yc = &targets - y_mean;

        let solution = lstsq(xc.view(), yc.view(), self.params.rank_tolerance);

        let weights = solution.x;
        let bias = if self.params.fit_intercept {
            y_mean - weights.dot(&x_mean)
        } else {
            0.0
        };

        if solution.rank < n_features {
            log::debug!(
                "Feature matrix is rank-deficient (rank {} of {}); using the minimum-norm solution",
                solution.rank,
                n_features
            );
        }
        log::debug!("Fitted linear model on {n_samples} samples: weights={weights}, bias={bias}");

        Ok(LinearModel::new(
            weights,
            bias,
            features.names().to_vec(),
            solution.rank,
        ))
    }
}
