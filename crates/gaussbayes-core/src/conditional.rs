//! Base identity contract shared by every conditional density.
//!
//! A conditional is identified by the key of the variable it is a density on.
//! Equality between two conditionals always checks that identity first and
//! only then compares variant-specific content. Variants expose themselves
//! through capability accessors such as [`Conditional::as_gaussian`], so a
//! comparison against a different variant simply finds no capability and
//! yields `false`.

use std::fmt::Debug;

use crate::conditional_gaussian::ConditionalGaussian;
use crate::config::DEFAULT_TOLERANCE;

/// A density on one variable conditioned on zero or more parent variables.
pub trait Conditional: Debug {
    /// Key of the variable this conditional is a density on.
    fn key(&self) -> &str;

    /// Base-level equality: both conditionals are on the same variable.
    fn same_identity(&self, other: &dyn Conditional) -> bool {
        self.key() == other.key()
    }

    /// Full equality within an absolute tolerance. Never fails, mismatches
    /// of any kind are `false`.
    fn equals(&self, other: &dyn Conditional, tol: f64) -> bool;

    /// `equals` at [`DEFAULT_TOLERANCE`].
    fn equals_default(&self, other: &dyn Conditional) -> bool {
        self.equals(other, DEFAULT_TOLERANCE)
    }

    /// Keys of the parent variables.
    fn parents(&self) -> Vec<&str>;

    /// The Gaussian view of this conditional, if it is one.
    fn as_gaussian(&self) -> Option<&ConditionalGaussian> {
        None
    }
}
