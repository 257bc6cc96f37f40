//! Least squares on the design matrix through `nalgebra`'s SVD.
//!
//! The SVD is taken of `X` itself rather than of `XᵀX`, so the rank cutoff
//! applies to singular values and the conditioning of the problem is not
//! squared.

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, ArrayView1, ArrayView2};

/// Result of a minimum-norm least squares solve.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub x: Array1<f64>,
    /// Number of singular values kept.
    pub rank: usize,
}

/// Minimise `‖A x − b‖²`, returning the minimum-norm `x` among all optima.
///
/// Singular values at or below `rel_tol × σmax` count as zero. For a
/// full-rank `A` this is the unique least squares solution.
pub fn lstsq(a: ArrayView2<'_, f64>, b: ArrayView1<'_, f64>, rel_tol: f64) -> LeastSquares {
    let (rows, cols) = a.dim();
    debug_assert_eq!(rows, b.len());

    let a = DMatrix::from_fn(rows, cols, |i, j| a[(i, j)]);
    let b = DVector::from_iterator(rows, b.iter().copied());

    let svd = a.svd(true, true);
    let sigma_max = svd.singular_values.max();
    let eps = rel_tol.max(0.0) * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();

    // U and Vᵀ were requested above, so `solve` only fails on a negative eps.
    let x = match svd.solve(&b, eps) {
        Ok(x) => Array1::from_iter(x.iter().copied()),
        Err(_) => Array1::zeros(cols),
    };
    LeastSquares { x, rank }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array2, array};

    #[test]
    fn solves_square_full_rank_system() {
        let a = array![[2.0, 1.0], [1.0, 3.0]];
        let b = array![3.0, 5.0];
        let sol = lstsq(a.view(), b.view(), 1e-12);
        assert_eq!(sol.rank, 2);
        assert_abs_diff_eq!(sol.x[0], 0.8, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.x[1], 1.4, epsilon = 1e-12);
    }

    #[test]
    fn overdetermined_system_gets_least_squares() {
        // Best slope through the origin for (1,1), (2,2), (3,2): 11 / 14.
        let a = array![[1.0], [2.0], [3.0]];
        let b = array![1.0, 2.0, 2.0];
        let sol = lstsq(a.view(), b.view(), 1e-12);
        assert_eq!(sol.rank, 1);
        assert_abs_diff_eq!(sol.x[0], 11.0 / 14.0, epsilon = 1e-12);
    }

    #[test]
    fn singular_system_gets_minimum_norm() {
        // Only x0 + x1 is determined; the shortest solution splits it evenly.
        let a = array![[1.0, 1.0], [2.0, 2.0]];
        let b = array![1.0, 2.0];
        let sol = lstsq(a.view(), b.view(), 1e-12);
        assert_eq!(sol.rank, 1);
        assert_abs_diff_eq!(sol.x[0], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(sol.x[1], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn zero_matrix_gives_zero() {
        let a = Array2::<f64>::zeros((3, 2));
        let b = array![1.0, 0.0, 2.0];
        let sol = lstsq(a.view(), b.view(), 1e-12);
        assert_eq!(sol.rank, 0);
        assert_eq!(sol.x, array![0.0, 0.0]);
    }

    #[test]
    fn keeps_columns_of_very_different_scale() {
        let a = array![[1.0, 0.0], [0.0, 1e7], [1.0, 1e7]];
        let b = array![2.0, 3e7, 2.0 + 3e7];
        let sol = lstsq(a.view(), b.view(), 1e-12);
        assert_eq!(sol.rank, 2);
        assert_abs_diff_eq!(sol.x[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(sol.x[1], 3.0, epsilon = 1e-9);
    }
}
