//! Scoring and decoding of continuous regression output back to labels.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::model::LinearModel;
use crate::codec::LabelCodec;
use crate::data::features::FeatureMatrix;
use crate::data::model::Value;
use crate::error::{Error, Result};

/// How a continuous score is rounded to an integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Ties go to the even neighbour (`0.5 → 0`, `1.5 → 2`), as NumPy does.
    #[default]
    HalfEven,
    /// Ties go towards positive infinity (`0.5 → 1`, `-0.5 → 0`).
    HalfUp,
}

impl RoundingMode {
    pub fn round(self, x: f64) -> f64 {
        match self {
            RoundingMode::HalfEven => x.round_ties_even(),
            RoundingMode::HalfUp => (x + 0.5).floor(),
        }
    }
}

/// Compute `w·x + b` for every row of `features`.
pub fn predict(model: &LinearModel, features: &FeatureMatrix) -> Result<Array1<f64>> {
    if features.n_features() != model.n_features() {
        return Err(Error::invalid_input(format!(
            "model expects {} features, got {}",
            model.n_features(),
            features.n_features()
        )));
    }
    Ok(features.view().dot(&model.weights()) + model.bias())
}

/// Labels decoded from scores, plus how many scores had to be clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub labels: Vec<Value>,
    pub clamped: usize,
}

/// Round each score to a code, clamp it into `[0, K-1]`, and decode it.
///
/// Linear regression output is unbounded, so out-of-range codes are clamped
/// rather than rejected. Non-finite scores have no nearest code and fail with
/// [`Error::InvalidCode`].
pub fn decode_predictions(
    scores: &[f64],
    codec: &LabelCodec,
    rounding: RoundingMode,
) -> Result<Decoded> {
    let n_classes = codec.n_classes();
    let max_code = n_classes.saturating_sub(1) as f64;
    let mut clamped = 0;

    let labels = scores
        .iter()
        .map(|&score| {
            if !score.is_finite() {
                return Err(Error::InvalidCode {
                    code: score,
                    n_classes,
                });
            }
            let rounded = rounding.round(score);
            let code = rounded.clamp(0.0, max_code);
            if code != rounded {
                clamped += 1;
            }
            codec
                .label_of(code as usize)
                .cloned()
                .ok_or(Error::InvalidCode { code, n_classes })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Decoded { labels, clamped })
}
