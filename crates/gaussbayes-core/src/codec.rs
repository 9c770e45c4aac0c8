// =============================================================================
// Persisted Form
// =============================================================================
//
// The wire representation of a conditional is an explicit record, not a dump
// of the in-memory struct:
//
//     {
//       "key": "x",
//       "r": { "rows": 2, "cols": 2, "data": [..row-major..] },
//       "d": [..],
//       "precisions": [..],
//       "parents": [ { "name": "y", "matrix": { "rows": .., "cols": .., "data": [..] } } ]
//     }
//
// Parents are written sorted by name. Decoding goes through the normal
// constructor, so a payload with inconsistent dimensions is rejected the same
// way a bad constructor call would be.
//
// JSON numbers are written with shortest round-trip formatting and parsed
// with serde_json's `float_roundtrip` feature, so encode → decode is
// bit-exact for every finite value. NaN and infinities have no JSON
// representation and fail to decode.
//
// =============================================================================

use std::collections::btree_map::Entry;

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::bayes_net::GaussianBayesNet;
use crate::conditional::Conditional;
use crate::conditional_gaussian::{ConditionalGaussian, Parents};
use crate::error::{GaussBayesError, Result};

/// Row-major dense matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixRecord {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<f64>,
}

impl From<&Array2<f64>> for MatrixRecord {
    fn from(a: &Array2<f64>) -> Self {
        Self {
            rows: a.nrows(),
            cols: a.ncols(),
            data: a.iter().copied().collect(),
        }
    }
}

impl TryFrom<MatrixRecord> for Array2<f64> {
    type Error = GaussBayesError;

    fn try_from(record: MatrixRecord) -> Result<Self> {
        let expected = record.rows.checked_mul(record.cols).ok_or_else(|| {
            GaussBayesError::Codec(format!(
                "{}x{} matrix has more entries than can be addressed",
                record.rows, record.cols
            ))
        })?;
        let found = record.data.len();
        Array2::from_shape_vec((record.rows, record.cols), record.data).map_err(|_| {
            GaussBayesError::Codec(format!(
                "{}x{} matrix needs {} entries, found {}",
                record.rows, record.cols, expected, found
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    pub name: String,
    pub matrix: MatrixRecord,
}

/// Serialized form of a [`ConditionalGaussian`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalGaussianRecord {
    pub key: String,
    pub r: MatrixRecord,
    pub d: Vec<f64>,
    pub precisions: Vec<f64>,
    pub parents: Vec<ParentRecord>,
}

impl From<&ConditionalGaussian> for ConditionalGaussianRecord {
    fn from(node: &ConditionalGaussian) -> Self {
        Self {
            key: node.key().to_string(),
            r: MatrixRecord::from(node.r()),
            d: node.d().to_vec(),
            precisions: node.precisions().to_vec(),
            parents: node
                .parents_iter()
                .map(|(name, matrix)| ParentRecord {
                    name: name.to_string(),
                    matrix: MatrixRecord::from(matrix),
                })
                .collect(),
        }
    }
}

impl TryFrom<ConditionalGaussianRecord> for ConditionalGaussian {
    type Error = GaussBayesError;

    fn try_from(record: ConditionalGaussianRecord) -> Result<Self> {
        let mut parents = Parents::new();
        for parent in record.parents {
            match parents.entry(parent.name) {
                Entry::Occupied(entry) => {
                    return Err(GaussBayesError::Codec(format!(
                        "conditional on '{}' lists parent '{}' twice",
                        record.key,
                        entry.key()
                    )));
                }
                Entry::Vacant(entry) => {
                    entry.insert(Array2::try_from(parent.matrix)?);
                }
            }
        }
        ConditionalGaussian::with_parents(
            record.key,
            record.d.into(),
            Array2::try_from(record.r)?,
            parents,
            record.precisions.into(),
        )
    }
}

/// Serialize one conditional to JSON.
pub fn encode_json(node: &ConditionalGaussian) -> Result<String> {
    Ok(serde_json::to_string(&ConditionalGaussianRecord::from(node))?)
}

/// Read one conditional back from JSON produced by [`encode_json`].
pub fn decode_json(json: &str) -> Result<ConditionalGaussian> {
    let record: ConditionalGaussianRecord = serde_json::from_str(json)?;
    ConditionalGaussian::try_from(record)
}

/// Serialize a Bayes network to JSON, conditionals in elimination order.
pub fn encode_bayes_net_json(net: &GaussianBayesNet) -> Result<String> {
    let records: Vec<ConditionalGaussianRecord> =
        net.iter().map(ConditionalGaussianRecord::from).collect();
    Ok(serde_json::to_string(&records)?)
}

/// Read a Bayes network back from JSON produced by [`encode_bayes_net_json`].
pub fn decode_bayes_net_json(json: &str) -> Result<GaussianBayesNet> {
    let records: Vec<ConditionalGaussianRecord> = serde_json::from_str(json)?;
    let mut net = GaussianBayesNet::new();
    for record in records {
        net.push_back(ConditionalGaussian::try_from(record)?);
    }
    Ok(net)
}
