/////////////////////////////////////////////////////////////////////////////////////////////
//
// Applies a deterministic, bounding-box-scaled jitter to projected source points.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Applies a deterministic, bounding-box-scaled jitter to projected source points.
//!
//! Regular or structured source grids produce exactly co-circular or co-linear
//! 2D point configurations that make a Delaunay triangulation ambiguous. A tiny
//! jitter, seeded identically every run, removes the ambiguity while staying
//! reproducible and negligible relative to the interpolation error. Only source
//! points are perturbed; destination points never are.

use faer::{Mat, MatRef};
use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fixed seed for the perturbation generator, identical in every process.
pub(crate) const PERTURB_SEED: u64 = 123456;

/// Axis-aligned bounding box of a 2D point set, as `(min, max)` corners.
pub(crate) fn bounding_box(points: MatRef<f64>) -> ([f64; 2], [f64; 2]) {
    let mut min = [f64::INFINITY; 2];
    let mut max = [f64::NEG_INFINITY; 2];
    for i in 0..points.nrows() {
        for j in 0..2 {
            let v = *points.get(i, j);
            if v < min[j] {
                min[j] = v;
            }
            if v > max[j] {
                max[j] = v;
            }
        }
    }
    (min, max)
}

/// Perturbs 2D points in place by `fraction` of a seeded uniform position
/// inside their bounding box, measured from the box midpoint.
///
/// Coordinates with zero extent are left untouched. The same seed always
/// produces the same jitter for the same input, so the downstream
/// triangulation and weights are bit-reproducible.
pub(crate) fn perturb_points(points: &mut Mat<f64>, fraction: f64, seed: u64) {
    assert!(
        points.ncols() == 2,
        "points must be (N x 2), got (N x {})",
        points.ncols()
    );

    if points.nrows() == 0 {
        return;
    }

    let (min, max) = bounding_box(points.as_ref());
    let mid = [(min[0] + max[0]) / 2.0, (min[1] + max[1]) / 2.0];

    debug!(
        "perturbing {} points with {} of a random position inside {:?}..{:?}",
        points.nrows(),
        fraction,
        min,
        max
    );

    let mut rng = StdRng::seed_from_u64(seed);
    points.row_iter_mut().for_each(|row| {
        row.iter_mut().enumerate().for_each(|(j, coord)| {
            let sample = match max[j] > min[j] {
                true => rng.random_range(min[j]..=max[j]),
                false => mid[j],
            };
            *coord += fraction * (sample - mid[j]);
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn grid_points(n: usize) -> Mat<f64> {
        Mat::from_fn(n * n, 2, |i, j| match j {
            0 => (i % n) as f64,
            _ => (i / n) as f64,
        })
    }

    #[test]
    fn bounding_box_of_grid() {
        let points = grid_points(4);
        let (min, max) = bounding_box(points.as_ref());
        assert_eq!(min, [0.0, 0.0]);
        assert_eq!(max, [3.0, 3.0]);
    }

    #[test]
    fn perturbation_is_deterministic() {
        let mut a = grid_points(5);
        let mut b = grid_points(5);
        perturb_points(&mut a, 1e-5, PERTURB_SEED);
        perturb_points(&mut b, 1e-5, PERTURB_SEED);

        for i in 0..a.nrows() {
            for j in 0..2 {
                assert_eq!(*a.get(i, j), *b.get(i, j));
            }
        }
    }

    #[test]
    fn perturbation_stays_small() {
        let original = grid_points(5);
        let mut perturbed = original.clone();
        let fraction = 1e-5;
        perturb_points(&mut perturbed, fraction, PERTURB_SEED);

        // Displacement is bounded by fraction * half the box extent (4.0 here).
        let bound = fraction * 2.0 + f64::EPSILON;
        let mut moved = false;
        for i in 0..original.nrows() {
            for j in 0..2 {
                let d = (*perturbed.get(i, j) - *original.get(i, j)).abs();
                assert!(d <= bound, "displacement {} exceeds bound {}", d, bound);
                moved |= d > 0.0;
            }
        }
        assert!(moved);
    }

    #[test]
    fn zero_extent_coordinate_is_untouched() {
        // All points on the line y = 2.
        let mut points = Mat::from_fn(6, 2, |i, j| match j {
            0 => i as f64,
            _ => 2.0,
        });
        perturb_points(&mut points, 1e-5, PERTURB_SEED);
        for i in 0..points.nrows() {
            assert_eq!(*points.get(i, 1), 2.0);
        }
    }
}
