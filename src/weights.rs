/////////////////////////////////////////////////////////////////////////////////////////////
//
// Resolves per-destination interpolation stencils from a triangulation backend.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Resolves per-destination interpolation stencils from a triangulation backend.

use crate::error::{InterpolationError, InterpolationResult};
use crate::triangulation::PlanarTriangulator;
use faer::MatRef;
use serde::{Deserialize, Serialize};

/// Absolute tolerance on the sum of a weight set around 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Interpolation stencil for one destination point: parallel lists of source
/// point indices and weights summing to 1.0.
///
/// Computed once at construction of a [`crate::PlanarInterpolator`] and
/// immutable afterwards. Indices refer to the original source point order;
/// perturbation never changes index identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    indices: Vec<usize>,
    weights: Vec<f64>,
}

impl WeightSet {
    pub(crate) fn new(indices: Vec<usize>, weights: Vec<f64>) -> Self {
        debug_assert_eq!(indices.len(), weights.len());
        Self { indices, weights }
    }

    /// Source point indices of the stencil.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Weights of the stencil, summing to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of entries in the stencil.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// True when the stencil has no entries.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates over `(source index, weight)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.indices.iter().copied().zip(self.weights.iter().copied())
    }
}

/// Builds one [`WeightSet`] per destination point from the (already
/// perturbed) projected source points.
///
/// The backend sees the perturbed coordinates but its vertex indices map 1:1
/// onto the original source point order. Every returned set is validated to
/// sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`]; a violation is an internal
/// consistency failure of the backend integration and is surfaced as
/// [`InterpolationError::WeightSum`], never renormalized.
pub(crate) fn resolve_weights(
    triangulator: &dyn PlanarTriangulator,
    source: MatRef<f64>,
    dest: MatRef<f64>,
) -> InterpolationResult<Vec<WeightSet>> {
    let n_source = source.nrows();
    let mesh = triangulator.triangulate(source);

    let mut sets = Vec::with_capacity(dest.nrows());
    for i in 0..dest.nrows() {
        let query = [*dest.get(i, 0), *dest.get(i, 1)];
        let (indices, weights) = triangulator.locate(&mesh, query);

        assert_eq!(
            indices.len(),
            weights.len(),
            "triangulation backend returned {} indices but {} weights",
            indices.len(),
            weights.len()
        );
        for &v in &indices {
            assert!(
                v < n_source,
                "triangulation backend returned vertex index {} for {} source points",
                v,
                n_source
            );
        }

        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(InterpolationError::WeightSum {
                dest_index: i,
                sum,
                tolerance: WEIGHT_SUM_TOLERANCE,
            });
        }

        sets.push(WeightSet::new(indices, weights));
    }

    Ok(sets)
}
