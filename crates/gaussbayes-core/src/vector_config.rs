// =============================================================================
// VectorConfig: variable name → current value
// =============================================================================
//
// The assignment a conditional is solved against. During back-substitution a
// Bayes network fills one of these in reverse elimination order, so by the
// time a node is solved every one of its parents already has a value here.
//
// Lookups of absent keys are errors (`MissingParentValue`), never defaults:
// silently treating a missing parent as zero would produce a plausible but
// wrong solution.
//
// =============================================================================

use std::collections::BTreeMap;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{GaussBayesError, Result};
use crate::linalg::{format_vector, vector_equal_with_abs_tol};

/// Mapping from variable key to its numeric value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorConfig {
    values: BTreeMap<String, Array1<f64>>,
}

impl VectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the value of `key`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: Array1<f64>) -> Option<Array1<f64>> {
        self.values.insert(key.into(), value)
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: Array1<f64>) -> Self {
        self.insert(key, value);
        self
    }

    /// Value of `key`, or `MissingParentValue` if it has none.
    pub fn get(&self, key: &str) -> Result<&Array1<f64>> {
        self.values
            .get(key)
            .ok_or_else(|| GaussBayesError::missing_parent_value(key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Dimension of the value stored for `key`.
    pub fn dim_of(&self, key: &str) -> Result<usize> {
        self.get(key).map(|v| v.len())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<f64>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Same key set and every value equal within `tol`.
    pub fn equals(&self, other: &VectorConfig, tol: f64) -> bool {
        self.values.len() == other.values.len()
            && self.values.iter().all(|(key, value)| {
                other
                    .values
                    .get(key)
                    .is_some_and(|theirs| vector_equal_with_abs_tol(value, theirs, tol))
            })
    }

    /// Diagnostic dump to stdout.
    pub fn print(&self, label: &str) {
        print!("{}", self.render(label));
    }

    fn render(&self, label: &str) -> String {
        let mut out = format!("{}:\n", label);
        for (key, value) in &self.values {
            out.push_str(&format_vector(value, key));
        }
        out
    }
}

impl FromIterator<(String, Array1<f64>)> for VectorConfig {
    fn from_iter<I: IntoIterator<Item = (String, Array1<f64>)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
