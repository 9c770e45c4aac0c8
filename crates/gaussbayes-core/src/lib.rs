// =============================================================================
// GaussBayes Core Library
// =============================================================================
//
// Conditional Gaussian densities in square-root information form: the nodes
// a Gaussian Bayes network is made of once a linear factor graph has been
// eliminated, and the back-substitution that turns such a network into the
// most probable assignment of its variables.
//
// STRUCTURE:
// ----------
//   - error:                Error types used throughout the library
//   - config:               Solve configuration and default tolerances
//   - linalg:               Triangular solve, tolerance equality, formatting
//   - vector_config:        Variable name → value assignments
//   - conditional:          Identity contract shared by all conditionals
//   - conditional_gaussian: The conditional Gaussian node itself
//   - bayes_net:            Ordered conditionals and back-substitution
//   - codec:                JSON encode/decode of nodes and networks
//
// WHAT IS NOT HERE:
// -----------------
// Elimination (producing conditionals from factors) and elimination
// ordering live with the factor graph. This crate only consumes their
// output.
//
// =============================================================================

pub mod bayes_net;
pub mod codec;
pub mod conditional;
pub mod conditional_gaussian;
pub mod config;
pub mod error;
pub mod linalg;
pub mod vector_config;

// Re-export commonly used items at the top level
pub use bayes_net::GaussianBayesNet;
pub use codec::{decode_bayes_net_json, decode_json, encode_bayes_net_json, encode_json};
pub use conditional::Conditional;
pub use conditional_gaussian::{ConditionalGaussian, Parents};
pub use config::{SolveConfig, DEFAULT_TOLERANCE};
pub use error::{GaussBayesError, Result};
pub use linalg::{back_substitute, matrix_equal_with_abs_tol, vector_equal_with_abs_tol};
pub use vector_config::VectorConfig;
