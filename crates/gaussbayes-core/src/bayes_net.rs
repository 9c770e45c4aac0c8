// =============================================================================
// Gaussian Bayes Network
// =============================================================================
//
// The output of sequential variable elimination: one ConditionalGaussian per
// eliminated variable, stored in elimination order. A conditional can only
// have parents that were eliminated after it, so the last conditional has no
// parents at all.
//
// BACK-SUBSTITUTION
// -----------------
// Walking the network in reverse elimination order, every conditional's
// parents are already solved by the time it is reached:
//
//     values = {}
//     for each conditional, last to first:
//         values[key] = conditional.solve(values)
//
// The result is the most probable assignment of the whole network.
//
// =============================================================================

use crate::conditional::Conditional;
use crate::conditional_gaussian::ConditionalGaussian;
use crate::config::SolveConfig;
use crate::error::{GaussBayesError, Result};
use crate::vector_config::VectorConfig;

/// Conditionals in elimination order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaussianBayesNet {
    conditionals: Vec<ConditionalGaussian>,
}

impl GaussianBayesNet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a conditional eliminated after every one already present.
    pub fn push_back(&mut self, conditional: ConditionalGaussian) {
        self.conditionals.push(conditional);
    }

    /// Prepend a conditional eliminated before every one already present.
    pub fn push_front(&mut self, conditional: ConditionalGaussian) {
        self.conditionals.insert(0, conditional);
    }

    pub fn len(&self) -> usize {
        self.conditionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditionals.is_empty()
    }

    /// Conditionals in elimination order.
    pub fn iter(&self) -> std::slice::Iter<'_, ConditionalGaussian> {
        self.conditionals.iter()
    }

    /// Keys in elimination order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.conditionals.iter().map(|c| c.key())
    }

    /// The conditional on `key`.
    pub fn get(&self, key: &str) -> Result<&ConditionalGaussian> {
        self.conditionals
            .iter()
            .find(|c| c.key() == key)
            .ok_or_else(|| GaussBayesError::UnknownVariable(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.conditionals.iter().any(|c| c.key() == key)
    }

    /// Total dimension of all variables in the network.
    pub fn dim(&self) -> usize {
        self.conditionals.iter().map(|c| c.dim()).sum()
    }

    /// Back-substitute with the default [`SolveConfig`].
    pub fn optimize(&self) -> Result<VectorConfig> {
        self.optimize_with(&SolveConfig::default())
    }

    /// Solve every conditional in reverse elimination order, feeding each
    /// solution into the values used by the conditionals before it.
    ///
    /// Fails on the first conditional that cannot be solved.
    pub fn optimize_with(&self, config: &SolveConfig) -> Result<VectorConfig> {
        tracing::debug!(conditionals = self.len(), dim = self.dim(), "back-substituting");

        let mut values = VectorConfig::new();
        for conditional in self.conditionals.iter().rev() {
            let x = conditional.solve_with(&values, config)?;
            tracing::trace!(node = %conditional.key(), "solved");
            values.insert(conditional.key(), x);
        }
        Ok(values)
    }

    /// Same length, same order, and conditional-wise equal within `tol`.
    pub fn equals(&self, other: &GaussianBayesNet, tol: f64) -> bool {
        self.conditionals.len() == other.conditionals.len()
            && self
                .conditionals
                .iter()
                .zip(other.conditionals.iter())
                .all(|(a, b)| a.equals(b, tol))
    }

    /// Diagnostic dump of every conditional, in elimination order.
    pub fn print(&self, label: &str) {
        println!("{}:", label);
        for conditional in &self.conditionals {
            conditional.print(conditional.key());
        }
    }
}

impl FromIterator<ConditionalGaussian> for GaussianBayesNet {
    fn from_iter<I: IntoIterator<Item = ConditionalGaussian>>(iter: I) -> Self {
        Self {
            conditionals: iter.into_iter().collect(),
        }
    }
}
