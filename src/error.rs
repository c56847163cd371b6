/////////////////////////////////////////////////////////////////////////////////////////////
//
// Declares the error types shared by frame fitting, weight resolution, and interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Declares the error types shared by frame fitting, weight resolution, and interpolation.

use std::fmt;

/// Result alias used throughout the crate.
pub type InterpolationResult<T> = std::result::Result<T, InterpolationError>;

/// Errors that can occur while constructing or applying a planar interpolator.
///
/// All variants carry the offending input so failures can be diagnosed without
/// re-running the construction. A failed time-bracket search is *not* an error
/// and is reported as `None` by [`crate::time::find_bracket`].
#[derive(Debug, Clone, PartialEq)]
pub enum InterpolationError {
    /// The input point set cannot span a plane: fewer than three points, or
    /// every candidate triple is collinear.
    ///
    /// Fatal to construction. There is no fallback plane.
    DegenerateInput { detail: String },

    /// A weight set returned by the triangulation backend does not sum to one
    /// within tolerance.
    ///
    /// This indicates a bug in the backend integration and is surfaced
    /// immediately, never silently renormalized.
    WeightSum {
        dest_index: usize,
        sum: f64,
        tolerance: f64,
    },

    /// A value array does not match the source point count recorded at
    /// construction. Recoverable by fixing the call.
    SizeMismatch {
        expected: usize,
        actual: usize,
        context: &'static str,
    },
}

impl fmt::Display for InterpolationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterpolationError::DegenerateInput { detail } => {
                write!(f, "degenerate input: {}", detail)
            }
            InterpolationError::WeightSum {
                dest_index,
                sum,
                tolerance,
            } => {
                write!(
                    f,
                    "weights for destination point {} sum to {} (tolerance {} around 1.0)",
                    dest_index, sum, tolerance
                )
            }
            InterpolationError::SizeMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "{}: expected {} source values, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for InterpolationError {}
