use ndarray::{Array1, ArrayView1};

/// A fitted linear model `y = w·x + b`.
///
/// Produced by [`LinearRegression::fit`](super::LinearRegression::fit) and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    weights: Array1<f64>,
    bias: f64,
    feature_names: Vec<String>,
    rank: usize,
}

impl LinearModel {
    pub(crate) fn new(
        weights: Array1<f64>,
        bias: f64,
        feature_names: Vec<String>,
        rank: usize,
    ) -> Self {
        Self {
            weights,
            bias,
            feature_names,
            rank,
        }
    }

    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn n_features(&self) -> usize {
        self.weights.len()
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Numerical rank of the (centered) feature matrix seen during fitting.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// Whether the fit fell back to the minimum-norm solution.
    pub fn is_rank_deficient(&self) -> bool {
        self.rank < self.n_features()
    }

    /// Score a single feature vector.
    pub fn score(&self, x: ArrayView1<'_, f64>) -> f64 {
        self.weights.dot(&x) + self.bias
    }
}
