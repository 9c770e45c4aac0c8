// =============================================================================
// Dense Linear Algebra Primitives
// =============================================================================
//
// The small set of numeric leaf utilities the conditionals are built on:
//
//   - ndarray ↔ nalgebra conversion (ndarray stores, nalgebra solves)
//   - back-substitution for upper-triangular systems R·x = b
//   - element-wise equality within an absolute tolerance
//   - plain-text formatting used by the diagnostic `print` dumps
//
// BACK-SUBSTITUTION
// -----------------
// For upper-triangular R the last unknown is determined by the last row
// alone, and every earlier row only involves unknowns that are already known:
//
//     x[n-1] = b[n-1] / R[n-1,n-1]
//     x[i]   = (b[i] - Σ_{j>i} R[i,j]·x[j]) / R[i,i]
//
// Only the upper triangle of R is read. The division is why every pivot
// R[i,i] must be bounded away from zero; pivots are checked up front so the
// caller gets the offending row rather than a vector full of inf/NaN.
//
// =============================================================================

use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};

use crate::error::{GaussBayesError, Result};

// =============================================================================
// ndarray → nalgebra
// =============================================================================

/// Convert an ndarray Array2 to a nalgebra DMatrix.
///
/// Works for any memory layout since entries are read by index.
#[inline]
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Convert an ndarray Array1 to a nalgebra DVector.
#[inline]
pub fn to_dvector(v: &Array1<f64>) -> DVector<f64> {
    DVector::from_iterator(v.len(), v.iter().copied())
}

// =============================================================================
// nalgebra → ndarray
// =============================================================================

/// Convert a nalgebra DVector to an ndarray Array1.
#[inline]
pub fn to_array1(v: &DVector<f64>) -> Array1<f64> {
    Array1::from_vec(v.as_slice().to_vec())
}

// =============================================================================
// Triangular solve
// =============================================================================

/// Solve R·x = rhs for upper-triangular R.
///
/// # Arguments
/// * `r` - Square upper-triangular matrix (the strict lower triangle is ignored)
/// * `rhs` - Right-hand side, one entry per row of `r`
/// * `pivot_tolerance` - Pivots with |R[i,i]| <= tolerance count as zero
///
/// # Errors
/// * `NotSquare` if `r` is not square
/// * `DimensionMismatch` if `rhs` does not match the row count of `r`
/// * `SingularSystem` for the first (lowest-index) pivot that is zero,
///   within tolerance of zero, or NaN
pub fn back_substitute(r: &Array2<f64>, rhs: &Array1<f64>, pivot_tolerance: f64) -> Result<Array1<f64>> {
    let n = r.nrows();
    if r.ncols() != n {
        return Err(GaussBayesError::NotSquare {
            rows: n,
            cols: r.ncols(),
        });
    }
    if rhs.len() != n {
        return Err(GaussBayesError::dimension_mismatch(format!(
            "rhs has {} elements but R is {}x{}",
            rhs.len(),
            n,
            n
        )));
    }
    if n == 0 {
        return Ok(Array1::zeros(0));
    }

    for i in 0..n {
        let pivot = r[[i, i]];
        // Written so that a NaN pivot is rejected too
        if !(pivot.abs() > pivot_tolerance) {
            return Err(GaussBayesError::SingularSystem {
                row: i,
                pivot,
                tolerance: pivot_tolerance,
            });
        }
    }

    let r_nalg = to_dmatrix(r);
    let rhs_nalg = to_dvector(rhs);

    match r_nalg.solve_upper_triangular(&rhs_nalg) {
        Some(x) => Ok(to_array1(&x)),
        None => Err(GaussBayesError::SingularSystem {
            row: 0,
            pivot: r[[0, 0]],
            tolerance: pivot_tolerance,
        }),
    }
}

// =============================================================================
// Tolerance equality
// =============================================================================

/// Scalar comparison shared by the vector and matrix versions.
///
/// Two NaNs compare equal so that `equals` stays reflexive; a NaN never equals
/// a number. Equal infinities compare equal.
#[inline]
fn scalar_equal(a: f64, b: f64, tol: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b || (a - b).abs() <= tol
}

/// True when `a` and `b` have the same length and every pair of entries is
/// within `tol` of each other.
pub fn vector_equal_with_abs_tol(a: &Array1<f64>, b: &Array1<f64>, tol: f64) -> bool {
    a.len() == b.len() && a.iter().zip(b.iter()).all(|(&x, &y)| scalar_equal(x, y, tol))
}

/// True when `a` and `b` have the same shape and every pair of entries is
/// within `tol` of each other.
pub fn matrix_equal_with_abs_tol(a: &Array2<f64>, b: &Array2<f64>, tol: f64) -> bool {
    a.dim() == b.dim() && a.iter().zip(b.iter()).all(|(&x, &y)| scalar_equal(x, y, tol))
}

// =============================================================================
// Formatting
// =============================================================================

/// Render a matrix as `label = [ a b; c d ]`, one row per line.
pub fn format_matrix(a: &Array2<f64>, label: &str) -> String {
    let mut out = format!("{} = [\n", label);
    for row in a.rows() {
        let cells: Vec<String> = row.iter().map(|v| format!("{:>12.6}", v)).collect();
        out.push_str(&format!("  {};\n", cells.join(" ")));
    }
    out.push_str("];\n");
    out
}

/// Render a vector as `label = [ a b c ]` on one line.
pub fn format_vector(v: &Array1<f64>, label: &str) -> String {
    let cells: Vec<String> = v.iter().map(|x| format!("{:.6}", x)).collect();
    format!("{} = [ {} ]\n", label, cells.join(" "))
}

// =============================================================================
// Tests
// =============================================================================
