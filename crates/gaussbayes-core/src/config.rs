// =============================================================================
// Solve Configuration
// =============================================================================
//
// Knobs for back-substitution. The defaults are fine for well-conditioned
// factors coming out of QR/Cholesky elimination; loosen or tighten the pivot
// tolerance when the producer is known to emit tiny diagonals.
//
// =============================================================================

/// Default absolute tolerance for `equals` comparisons, used by
/// `Conditional::equals_default`.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Configuration options for solving a conditional.
#[derive(Debug, Clone)]
pub struct SolveConfig {
    /// A diagonal entry of R with |R[i,i]| <= pivot_tolerance is treated as
    /// a zero pivot and the solve fails with `SingularSystem`.
    /// Default: 1e-12
    pub pivot_tolerance: f64,
}

impl Default for SolveConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: 1e-12,
        }
    }
}

impl SolveConfig {
    /// Same config with a different pivot tolerance.
    pub fn with_pivot_tolerance(mut self, pivot_tolerance: f64) -> Self {
        self.pivot_tolerance = pivot_tolerance;
        self
    }
}
