// =============================================================================
// ConditionalGaussian: one node of a Gaussian Bayes network
// =============================================================================
//
// Eliminating a variable x from a linear Gaussian factor graph leaves behind
// a conditional density p(x | y, z, ...) on x given the variables it was
// connected to. In square-root information form that density is
//
//     -log p(x | y, z, ...) ∝ ‖ R·x + S·y + T·z + ... - d ‖²
//
// where:
//   - R is square upper-triangular (dim × dim), produced by QR/Cholesky
//   - d is the right-hand side (dim)
//   - S, T, ... connect x to its parents; each has dim rows and as many
//     columns as its parent has dimensions
//   - precisions holds the per-row inverse variances (dim)
//
// SOLVING
// -------
// Once values for all parents are known, the most probable x is found by
// moving the parent terms to the right-hand side and back-substituting:
//
//     x = R \ (d - S·y - T·z - ...)
//
// A Bayes network does exactly this for every node, last-eliminated first.
//
// PRECISIONS
// ----------
// The precisions are carried along, validated, compared and serialized, but
// `solve` does not apply them: it performs the unweighted back-substitution.
// How they should scale R and d is left to the elimination that produced
// the node.
//
// =============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use ndarray::{Array1, Array2};

use crate::conditional::Conditional;
use crate::config::SolveConfig;
use crate::error::{GaussBayesError, Result};
use crate::linalg::{
    back_substitute, format_matrix, format_vector, matrix_equal_with_abs_tol,
    vector_equal_with_abs_tol,
};
use crate::vector_config::VectorConfig;

/// Parent key → matrix connecting the parent to this node's variable.
pub type Parents = BTreeMap<String, Array2<f64>>;

/// Gaussian density on one variable conditioned on its parents.
///
/// Build one with [`new`](Self::new), [`with_parent`](Self::with_parent),
/// [`with_two_parents`](Self::with_two_parents) or
/// [`with_parents`](Self::with_parents); all four validate dimensions and end
/// up in the same representation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalGaussian {
    key: String,
    /// Upper-triangular square-root information matrix
    r: Array2<f64>,
    /// Right-hand side
    d: Array1<f64>,
    precisions: Array1<f64>,
    parents: Parents,
}

// =============================================================================
// Construction
// =============================================================================

impl ConditionalGaussian {
    /// Conditional with no parents: ‖R·x - d‖².
    pub fn new(
        key: impl Into<String>,
        d: Array1<f64>,
        r: Array2<f64>,
        precisions: Array1<f64>,
    ) -> Result<Self> {
        Self::with_parents(key, d, r, Parents::new(), precisions)
    }

    /// Conditional with one parent: ‖R·x + S·y - d‖².
    pub fn with_parent(
        key: impl Into<String>,
        d: Array1<f64>,
        r: Array2<f64>,
        name1: impl Into<String>,
        s: Array2<f64>,
        precisions: Array1<f64>,
    ) -> Result<Self> {
        let mut parents = Parents::new();
        parents.insert(name1.into(), s);
        Self::with_parents(key, d, r, parents, precisions)
    }

    /// Conditional with two parents: ‖R·x + S·y + T·z - d‖².
    ///
    /// If both names are the same, the second matrix wins.
    #[allow(clippy::too_many_arguments)]
    pub fn with_two_parents(
        key: impl Into<String>,
        d: Array1<f64>,
        r: Array2<f64>,
        name1: impl Into<String>,
        s: Array2<f64>,
        name2: impl Into<String>,
        t: Array2<f64>,
        precisions: Array1<f64>,
    ) -> Result<Self> {
        let mut parents = Parents::new();
        parents.insert(name1.into(), s);
        parents.insert(name2.into(), t);
        Self::with_parents(key, d, r, parents, precisions)
    }

    /// Conditional with any number of parents: ‖R·x + Σ Aj·xj - d‖².
    ///
    /// # Errors
    /// * `NotSquare` if R is not square
    /// * `DimensionMismatch` if d, precisions or any parent matrix does not
    ///   have one row per row of R
    pub fn with_parents(
        key: impl Into<String>,
        d: Array1<f64>,
        r: Array2<f64>,
        parents: Parents,
        precisions: Array1<f64>,
    ) -> Result<Self> {
        let node = Self {
            key: key.into(),
            r,
            d,
            precisions,
            parents,
        };
        node.validate()?;
        Ok(node)
    }

    fn validate(&self) -> Result<()> {
        let (rows, cols) = self.r.dim();
        if rows != cols {
            return Err(GaussBayesError::NotSquare { rows, cols });
        }
        if self.d.len() != rows {
            return Err(GaussBayesError::dimension_mismatch(format!(
                "conditional on '{}': d has {} elements but R is {}x{}",
                self.key,
                self.d.len(),
                rows,
                cols
            )));
        }
        if self.precisions.len() != rows {
            return Err(GaussBayesError::dimension_mismatch(format!(
                "conditional on '{}': precisions has {} elements but R is {}x{}",
                self.key,
                self.precisions.len(),
                rows,
                cols
            )));
        }
        for (name, matrix) in &self.parents {
            if matrix.nrows() != rows {
                return Err(GaussBayesError::dimension_mismatch(format!(
                    "conditional on '{}': parent '{}' matrix has {} rows but R has {}",
                    self.key,
                    name,
                    matrix.nrows(),
                    rows
                )));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Accessors
// =============================================================================

impl ConditionalGaussian {
    /// Dimension of the variable this node is a density on.
    pub fn dim(&self) -> usize {
        self.r.ncols()
    }

    pub fn r(&self) -> &Array2<f64> {
        &self.r
    }

    pub fn d(&self) -> &Array1<f64> {
        &self.d
    }

    pub fn precisions(&self) -> &Array1<f64> {
        &self.precisions
    }

    /// Number of parents.
    pub fn nr_parents(&self) -> usize {
        self.parents.len()
    }

    /// Whether `key` is one of this node's parents.
    pub fn contains(&self, key: &str) -> bool {
        self.parents.contains_key(key)
    }

    /// Matrix connecting parent `key` to this node, if it is a parent.
    pub fn parent(&self, key: &str) -> Option<&Array2<f64>> {
        self.parents.get(key)
    }

    /// (parent key, matrix) pairs.
    pub fn parents_iter(&self) -> impl Iterator<Item = (&str, &Array2<f64>)> {
        self.parents.iter().map(|(k, m)| (k.as_str(), m))
    }

    /// Insert or overwrite the edge to parent `key`, last write wins.
    ///
    /// Dimensions are not checked here. A matrix that does not fit is
    /// reported by `solve` as `DimensionMismatch`.
    ///
    /// Returns the matrix previously registered for `key`, if any.
    pub fn add(&mut self, key: impl Into<String>, matrix: Array2<f64>) -> Option<Array2<f64>> {
        let key = key.into();
        let previous = self.parents.insert(key.clone(), matrix);
        if previous.is_some() {
            tracing::debug!(node = %self.key, parent = %key, "overwrote parent matrix");
        }
        previous
    }
}

// =============================================================================
// Solve
// =============================================================================

impl ConditionalGaussian {
    /// Solve for this node's variable given values for all of its parents,
    /// using the default [`SolveConfig`].
    pub fn solve(&self, x: &VectorConfig) -> Result<Array1<f64>> {
        self.solve_with(x, &SolveConfig::default())
    }

    /// x = R \ (d - Σ Aj·xj)
    ///
    /// # Errors
    /// * `MissingParentValue` if `x` has no value for a parent
    /// * `DimensionMismatch` if a parent value or matrix does not fit
    /// * `SingularSystem` if a pivot of R is within `config.pivot_tolerance` of zero
    pub fn solve_with(&self, x: &VectorConfig, config: &SolveConfig) -> Result<Array1<f64>> {
        tracing::trace!(
            node = %self.key,
            dim = self.dim(),
            parents = self.parents.len(),
            "solving conditional"
        );

        let mut rhs = self.d.clone();
        for (name, a) in &self.parents {
            let value = x.get(name)?;
            if a.ncols() != value.len() || a.nrows() != rhs.len() {
                return Err(GaussBayesError::dimension_mismatch(format!(
                    "conditional on '{}': parent '{}' matrix is {}x{} but its value has {} elements and d has {}",
                    self.key,
                    name,
                    a.nrows(),
                    a.ncols(),
                    value.len(),
                    rhs.len()
                )));
            }
            rhs -= &a.dot(value);
        }

        back_substitute(&self.r, &rhs, config.pivot_tolerance)
    }
}

// =============================================================================
// Equality and printing
// =============================================================================

impl ConditionalGaussian {
    fn content_equals(&self, other: &ConditionalGaussian, tol: f64) -> bool {
        if self.parents.len() != other.parents.len() {
            return false;
        }
        if !matrix_equal_with_abs_tol(&self.r, &other.r, tol) {
            return false;
        }
        if !vector_equal_with_abs_tol(&self.d, &other.d, tol) {
            return false;
        }
        if !vector_equal_with_abs_tol(&self.precisions, &other.precisions, tol) {
            return false;
        }
        self.parents.iter().all(|(name, matrix)| {
            other
                .parents
                .get(name)
                .is_some_and(|theirs| matrix_equal_with_abs_tol(matrix, theirs, tol))
        })
    }

    /// Diagnostic dump of R, the parent matrices, d and the precisions to stdout.
    pub fn print(&self, label: &str) {
        print!("{}", self.render(label));
    }

    /// Same dump as [`print`](Self::print), written to `writer`.
    pub fn write_to<W: io::Write>(&self, writer: &mut W, label: &str) -> io::Result<()> {
        writer.write_all(self.render(label).as_bytes())
    }

    fn render(&self, label: &str) -> String {
        let mut out = format!("{}:\n", label);
        out.push_str(&format_matrix(&self.r, "R"));
        for (name, matrix) in &self.parents {
            out.push_str(&format_matrix(matrix, &format!("A[{}]", name)));
        }
        out.push_str(&format_vector(&self.d, "d"));
        out.push_str(&format_vector(&self.precisions, "precisions"));
        out
    }
}

impl Conditional for ConditionalGaussian {
    fn key(&self) -> &str {
        &self.key
    }

    fn equals(&self, other: &dyn Conditional, tol: f64) -> bool {
        if !self.same_identity(other) {
            return false;
        }
        match other.as_gaussian() {
            Some(other) => self.content_equals(other, tol),
            None => false,
        }
    }

    fn parents(&self) -> Vec<&str> {
        self.parents.keys().map(String::as_str).collect()
    }

    fn as_gaussian(&self) -> Option<&ConditionalGaussian> {
        Some(self)
    }
}

impl fmt::Display for ConditionalGaussian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(&format!("ConditionalGaussian({})", self.key)))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOLERANCE;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn two_parent_node() -> ConditionalGaussian {
        ConditionalGaussian::with_two_parents(
            "x",
            array![1.0, 2.0],
            array![[2.0, 1.0], [0.0, 4.0]],
            "y",
            array![[1.0, 0.0], [0.0, 1.0]],
            "z",
            array![[0.5], [0.25]],
            array![1.0, 1.0],
        )
        .unwrap()
    }

    #[test]
    fn test_no_parent_scenario() {
        let node = ConditionalGaussian::new(
            "x",
            array![4.0, 6.0],
            array![[2.0, 0.0], [0.0, 2.0]],
            array![1.0, 1.0],
        )
        .unwrap();

        let x = node.solve(&VectorConfig::new()).unwrap();
        assert_abs_diff_eq!(x[0], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_no_parent_solve_ignores_assignment() {
        let node = ConditionalGaussian::new(
            "x",
            array![4.0, 6.0],
            array![[2.0, 1.0], [0.0, 2.0]],
            array![1.0, 1.0],
        )
        .unwrap();

        let empty = node.solve(&VectorConfig::new()).unwrap();
        let noisy = node
            .solve(&VectorConfig::new().with("y", array![100.0, -3.0]).with("x", array![9.0, 9.0]))
            .unwrap();
        let direct = back_substitute(node.r(), node.d(), 1e-12).unwrap();
        assert_eq!(empty, direct);
        assert_eq!(noisy, direct);
    }

    #[test]
    fn test_single_parent_scenario() {
        let node = ConditionalGaussian::with_parent(
            "x",
            array![5.0, 5.0],
            Array2::eye(2),
            "y",
            Array2::eye(2),
            array![1.0, 1.0],
        )
        .unwrap();

        let x = node.solve(&VectorConfig::new().with("y", array![1.0, 1.0])).unwrap();
        assert_abs_diff_eq!(x[0], 4.0, epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_single_parent_matches_manual_back_substitution() {
        let r = array![[3.0, 1.0], [0.0, 2.0]];
        let d = array![1.0, -2.0];
        let s = array![[1.0, 2.0, 0.0], [0.0, -1.0, 3.0]];
        let v = array![0.5, 1.5, -1.0];
        let node = ConditionalGaussian::with_parent("x", d.clone(), r.clone(), "y", s.clone(), array![1.0, 1.0])
            .unwrap();

        let x = node.solve(&VectorConfig::new().with("y", v.clone())).unwrap();
        let expected = back_substitute(&r, &(&d - &s.dot(&v)), 1e-12).unwrap();
        assert_abs_diff_eq!(x[0], expected[0], epsilon = 1e-12);
        assert_abs_diff_eq!(x[1], expected[1], epsilon = 1e-12);
    }

    #[test]
    fn test_two_parent_solve() {
        let node = two_parent_node();
        let values = VectorConfig::new()
            .with("y", array![1.0, 2.0])
            .with("z", array![4.0]);

        // rhs = [1 - 1 - 2, 2 - 2 - 1] = [-2, -1]; x1 = -0.25, x0 = (-2 + 0.25) / 2
        let x = node.solve(&values).unwrap();
        assert_abs_diff_eq!(x[1], -0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(x[0], -0.875, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_missing_parent() {
        let node = two_parent_node();
        let values = VectorConfig::new().with("y", array![1.0, 2.0]);
        match node.solve(&values) {
            Err(GaussBayesError::MissingParentValue { key }) => assert_eq!(key, "z"),
            other => panic!("expected MissingParentValue, got {:?}", other),
        }
    }

    #[test]
    fn test_solve_parent_value_wrong_length() {
        let node = two_parent_node();
        let values = VectorConfig::new()
            .with("y", array![1.0, 2.0])
            .with("z", array![4.0, 5.0]);
        assert!(matches!(
            node.solve(&values).unwrap_err(),
            GaussBayesError::DimensionMismatch(_)
        ));
    }

    #[test]
    fn test_solve_singular() {
        let node = ConditionalGaussian::new(
            "x",
            array![1.0, 1.0],
            array![[1.0, 0.0], [0.0, 0.0]],
            array![1.0, 1.0],
        )
        .unwrap();
        assert!(matches!(
            node.solve(&VectorConfig::new()).unwrap_err(),
            GaussBayesError::SingularSystem { row: 1, .. }
        ));
    }

    #[test]
    fn test_solve_with_pivot_tolerance() {
        let node = ConditionalGaussian::new("x", array![1.0], array![[1e-4]], array![1.0]).unwrap();
        assert!(node.solve(&VectorConfig::new()).is_ok());
        let strict = SolveConfig::default().with_pivot_tolerance(1e-3);
        assert!(matches!(
            node.solve_with(&VectorConfig::new(), &strict).unwrap_err(),
            GaussBayesError::SingularSystem { .. }
        ));
    }

    #[test]
    fn test_constructor_rejects_bad_dimensions() {
        let err = ConditionalGaussian::new("x", array![1.0, 2.0], Array2::eye(2), array![1.0]).unwrap_err();
        assert!(matches!(err, GaussBayesError::DimensionMismatch(_)));

        let err = ConditionalGaussian::new("x", array![1.0], Array2::eye(2), array![1.0, 1.0]).unwrap_err();
        assert!(matches!(err, GaussBayesError::DimensionMismatch(_)));

        let err = ConditionalGaussian::new("x", array![1.0, 2.0], Array2::zeros((2, 3)), array![1.0, 1.0])
            .unwrap_err();
        assert!(matches!(err, GaussBayesError::NotSquare { rows: 2, cols: 3 }));

        let err = ConditionalGaussian::with_parent(
            "x",
            array![1.0, 2.0],
            Array2::eye(2),
            "y",
            Array2::eye(3),
            array![1.0, 1.0],
        )
        .unwrap_err();
        assert!(matches!(err, GaussBayesError::DimensionMismatch(_)));
    }

    #[test]
    fn test_constructors_normalize_to_same_node() {
        let s = array![[1.0], [2.0]];
        let t = array![[3.0, 4.0], [5.0, 6.0]];
        let d = array![1.0, 2.0];
        let r = array![[1.0, 0.5], [0.0, 2.0]];
        let p = array![1.0, 4.0];

        let two = ConditionalGaussian::with_two_parents(
            "x", d.clone(), r.clone(), "y", s.clone(), "z", t.clone(), p.clone(),
        )
        .unwrap();

        let mut parents = Parents::new();
        parents.insert("z".to_string(), t.clone());
        parents.insert("y".to_string(), s.clone());
        let many = ConditionalGaussian::with_parents("x", d.clone(), r.clone(), parents, p.clone()).unwrap();

        let mut grown = ConditionalGaussian::with_parent("x", d, r, "y", s, p).unwrap();
        grown.add("z", t);

        assert_eq!(two, many);
        assert_eq!(two, grown);
        assert!(two.equals(&many, 0.0));
    }

    #[test]
    fn test_accessors() {
        let node = two_parent_node();
        assert_eq!(node.dim(), 2);
        assert_eq!(node.nr_parents(), 2);
        assert!(node.contains("y"));
        assert!(node.contains("z"));
        assert!(!node.contains("x"));
        assert_eq!(node.parent("z").unwrap().dim(), (2, 1));
        assert!(node.parent("w").is_none());
        assert_eq!(node.key(), "x");

        let mut parents = Conditional::parents(&node);
        parents.sort();
        assert_eq!(parents, vec!["y", "z"]);
        assert_eq!(node.parents_iter().count(), 2);
    }

    #[test]
    fn test_add_overwrites_last_write_wins() {
        let mut node = ConditionalGaussian::new("x", array![1.0], array![[1.0]], array![1.0]).unwrap();
        assert!(node.add("y", array![[1.0]]).is_none());
        let previous = node.add("y", array![[7.0]]);

        assert_eq!(previous, Some(array![[1.0]]));
        assert_eq!(node.nr_parents(), 1);
        assert_eq!(node.parent("y").unwrap(), &array![[7.0]]);

        let x = node.solve(&VectorConfig::new().with("y", array![1.0])).unwrap();
        assert_abs_diff_eq!(x[0], -6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_add_with_bad_shape_surfaces_at_solve() {
        let mut node = ConditionalGaussian::new("x", array![1.0, 1.0], Array2::eye(2), array![1.0, 1.0]).unwrap();
        node.add("y", Array2::eye(3));
        let values = VectorConfig::new().with("y", array![1.0, 1.0, 1.0]);
        assert!(matches!(
            node.solve(&values).unwrap_err(),
            GaussBayesError::DimensionMismatch(_)
        ));
    }

    #[test]
    fn test_equals_detects_differences() {
        let a = two_parent_node();
        assert!(a.equals(&a, 0.0));
        assert!(a.equals(&a.clone(), DEFAULT_TOLERANCE));

        // Different key
        let mut other = a.clone();
        other.key = "w".into();
        assert!(!a.equals(&other, 1e9));

        // Parent set sizes differ
        let mut other = a.clone();
        other.parents.remove("z");
        assert!(!a.equals(&other, 1e9));
        assert!(!other.equals(&a, 1e9));

        // Same size, different parent key
        let mut other = a.clone();
        let z = other.parents.remove("z").unwrap();
        other.parents.insert("q".into(), z);
        assert!(!a.equals(&other, 1e9));
        assert!(!other.equals(&a, 1e9));

        // Parent matrix shape differs
        let mut other = a.clone();
        other.parents.insert("z".into(), array![[0.5, 0.0], [0.25, 0.0]]);
        assert!(!a.equals(&other, 1e9));
    }

    #[test]
    fn test_equals_tolerance_on_precisions() {
        let a = two_parent_node();
        let mut b = a.clone();
        b.precisions[1] += 1e-6;
        assert!(a.equals(&b, 1e-5));
        assert!(!a.equals(&b, 1e-7));
    }

    #[test]
    fn test_render_contains_all_pieces() {
        let node = two_parent_node();
        let text = node.render("node");
        assert!(text.starts_with("node:\n"));
        assert!(text.contains("R = ["));
        assert!(text.contains("A[y] = ["));
        assert!(text.contains("A[z] = ["));
        assert!(text.contains("d = [ 1.000000 2.000000 ]"));
        assert!(text.contains("precisions = [ 1.000000 1.000000 ]"));

        let mut buffer = Vec::new();
        node.write_to(&mut buffer, "node").unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), text);
        assert!(node.to_string().starts_with("ConditionalGaussian(x):"));
    }

    // -------------------------------------------------------------------------
    // Property tests for the equality contract
    // -------------------------------------------------------------------------

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn arb_node() -> impl Strategy<Value = ConditionalGaussian> {
            (1usize..4, prop::collection::vec(1usize..3, 0..4))
                .prop_flat_map(|(dim, parent_dims)| {
                    let parent_data: Vec<_> = parent_dims
                        .iter()
                        .map(|&pd| prop::collection::vec(-10.0f64..10.0, dim * pd))
                        .collect();
                    (
                        Just(dim),
                        Just(parent_dims),
                        prop::collection::vec(-10.0f64..10.0, dim * dim),
                        prop::collection::vec(0.5f64..10.0, dim),
                        prop::collection::vec(-10.0f64..10.0, dim),
                        prop::collection::vec(0.1f64..10.0, dim),
                        parent_data,
                    )
                })
                .prop_map(|(dim, parent_dims, r, diag, d, precisions, parent_data)| {
                    let mut r = Array2::from_shape_vec((dim, dim), r).unwrap();
                    for i in 0..dim {
                        for j in 0..i {
                            r[[i, j]] = 0.0;
                        }
                        r[[i, i]] = diag[i];
                    }
                    let parents: Parents = parent_dims
                        .iter()
                        .zip(parent_data)
                        .enumerate()
                        .map(|(k, (&pd, data))| {
                            (format!("p{}", k), Array2::from_shape_vec((dim, pd), data).unwrap())
                        })
                        .collect();
                    ConditionalGaussian::with_parents(
                        "x",
                        Array1::from_vec(d),
                        r,
                        parents,
                        Array1::from_vec(precisions),
                    )
                    .unwrap()
                })
        }

        fn slot_count(node: &ConditionalGaussian) -> usize {
            node.r.len() + node.d.len() + node.precisions.len()
                + node.parents.values().map(|m| m.len()).sum::<usize>()
        }

        /// Copy of `node` with exactly one stored number shifted by `delta`.
        fn perturb(node: &ConditionalGaussian, slot: usize, delta: f64) -> ConditionalGaussian {
            let mut out = node.clone();
            let mut slot = slot;
            let dim = node.dim();

            if slot < out.r.len() {
                out.r[[slot / dim, slot % dim]] += delta;
                return out;
            }
            slot -= out.r.len();
            if slot < dim {
                out.d[slot] += delta;
                return out;
            }
            slot -= dim;
            if slot < dim {
                out.precisions[slot] += delta;
                return out;
            }
            slot -= dim;
            for matrix in out.parents.values_mut() {
                if slot < matrix.len() {
                    let cols = matrix.ncols();
                    matrix[[slot / cols, slot % cols]] += delta;
                    return out;
                }
                slot -= matrix.len();
            }
            out
        }

        proptest! {
            #[test]
            fn equals_is_reflexive(node in arb_node(), tol in 0.0f64..1.0) {
                prop_assert!(node.equals(&node, tol));
                prop_assert!(node.equals(&node.clone(), 0.0));
            }

            #[test]
            fn equals_is_symmetric(a in arb_node(), b in arb_node(), tol in 0.0f64..25.0) {
                prop_assert_eq!(a.equals(&b, tol), b.equals(&a, tol));
            }

            #[test]
            fn perturbation_beyond_tolerance_is_detected(
                node in arb_node(),
                index in any::<prop::sample::Index>(),
                tol in 1e-6f64..1e-2,
                negative in any::<bool>(),
            ) {
                let slot = index.index(slot_count(&node));
                let sign = if negative { -1.0 } else { 1.0 };

                let far = perturb(&node, slot, sign * 2.0 * tol);
                prop_assert!(!node.equals(&far, tol));
                prop_assert!(!far.equals(&node, tol));

                let near = perturb(&node, slot, sign * 0.5 * tol);
                prop_assert!(node.equals(&near, tol));
                prop_assert!(near.equals(&node, tol));
            }
        }
    }
}
