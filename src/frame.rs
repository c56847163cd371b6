/////////////////////////////////////////////////////////////////////////////////////////////
//
// Fits a well-conditioned local coordinate plane through a 3D point set and projects into it.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Fits a well-conditioned local coordinate plane through a 3D point set and projects into it.

use crate::error::{InterpolationError, InterpolationResult};
use faer::{Mat, MatRef};
use log::debug;
use serde::{Deserialize, Serialize};

/// A local planar coordinate system fitted to a 3D point cloud.
///
/// The frame consists of an origin, a unit plane normal, and a unit in-plane
/// axis orthogonal to the normal. The second in-plane axis is derived as
/// `normal x axis`, giving a right-handed local basis. A frame is created once
/// (fitted from points, or supplied externally) and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateFrame {
    origin: [f64; 3],
    normal: [f64; 3],
    axis: [f64; 3],
}

impl CoordinateFrame {
    /// Creates a frame from externally supplied components.
    ///
    /// The normal is normalized and the axis is re-orthogonalized against it,
    /// so callers may pass approximately orthogonal directions. Useful when
    /// several related interpolators must share one consistent frame.
    ///
    /// # Errors
    /// Returns [`InterpolationError::DegenerateInput`] if the normal has zero
    /// length or the axis is parallel to the normal.
    pub fn new(origin: [f64; 3], normal: [f64; 3], axis: [f64; 3]) -> InterpolationResult<Self> {
        let normal_mag = norm3(normal);
        if normal_mag <= 0.0 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!("frame normal {:?} has zero length", normal),
            });
        }
        let normal = scale3(normal, 1.0 / normal_mag);

        let mut e1 = axis;
        let along = dot3(e1, normal);
        for k in 0..3 {
            e1[k] -= along * normal[k];
        }
        let e1_mag = norm3(e1);
        if e1_mag <= 0.0 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!(
                    "frame axis {:?} is parallel to normal {:?}",
                    axis, normal
                ),
            });
        }

        Ok(Self {
            origin,
            normal,
            axis: scale3(e1, 1.0 / e1_mag),
        })
    }

    /// Fits a frame to an unordered 3D point set (one row per point, 3 columns).
    ///
    /// Uses two-stage farthest-point selection to maximize the conditioning of
    /// the fitted plane: `p0` is the first point, `p1` maximizes the distance
    /// from `p0` (defining the in-plane axis `e1`), and `p2` maximizes the
    /// magnitude of its component orthogonal to `e1`. The normal is
    /// `e1 x (p2 - p0)`, normalized. The origin is `p0`.
    ///
    /// # Errors
    /// Returns [`InterpolationError::DegenerateInput`] if fewer than three
    /// points are given, or if the best orthogonal component magnitude is
    /// non-positive (all points collinear or coincident).
    pub fn fit(points: MatRef<f64>) -> InterpolationResult<Self> {
        let n = points.nrows();
        if n < 3 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!(
                    "only {} point(s) provided; need at least three non-collinear points",
                    n
                ),
            });
        }

        let p0 = row3(points, 0);

        // Farthest point from p0 defines the in-plane axis.
        let mut e1 = [0.0; 3];
        let mut index1 = 0usize;
        let mut max_dist = 0.0;
        for i in 1..n {
            let d = sub3(row3(points, i), p0);
            let mag = norm3(d);
            if mag > max_dist {
                e1 = scale3(d, 1.0 / mag);
                index1 = i;
                max_dist = mag;
            }
        }
        if index1 == 0 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!("all {} points coincide with {:?}", n, p0),
            });
        }

        // Point with the largest component orthogonal to e1 completes the plane.
        let mut index2 = 0usize;
        let mut max_orth = 0.0;
        for i in 1..n {
            if i == index1 {
                continue;
            }
            let mut e2 = sub3(row3(points, i), p0);
            let along = dot3(e2, e1);
            for k in 0..3 {
                e2[k] -= along * e1[k];
            }
            let mag = norm3(e2);
            if mag > max_orth {
                index2 = i;
                max_orth = mag;
            }
        }
        if max_orth <= 0.0 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!(
                    "cannot find a point spanning a plane with {:?} and {:?}; \
                     all {} points are collinear",
                    p0,
                    row3(points, index1),
                    n
                ),
            });
        }

        let normal = cross3(e1, sub3(row3(points, index2), p0));
        let normal = scale3(normal, 1.0 / norm3(normal));

        debug!(
            "fit frame from points {:?}, {:?}, {:?} with normal {:?}",
            p0,
            row3(points, index1),
            row3(points, index2),
            normal
        );

        Ok(Self {
            origin: p0,
            normal,
            axis: e1,
        })
    }

    /// Origin of the frame (one of the fitting points).
    pub fn origin(&self) -> [f64; 3] {
        self.origin
    }

    /// Unit plane normal.
    pub fn normal(&self) -> [f64; 3] {
        self.normal
    }

    /// First unit in-plane axis, orthogonal to the normal.
    pub fn axis(&self) -> [f64; 3] {
        self.axis
    }

    /// Second in-plane axis, `normal x axis`.
    pub fn second_axis(&self) -> [f64; 3] {
        cross3(self.normal, self.axis)
    }

    /// Projects 3D points (N x 3) into the frame's plane, returning the two
    /// in-plane coordinates (N x 2). Pure and deterministic given the frame.
    pub fn local_position(&self, points: MatRef<f64>) -> Mat<f64> {
        assert!(
            points.ncols() == 3,
            "points must be (N x 3), got (N x {})",
            points.ncols()
        );

        let e2 = self.second_axis();
        Mat::from_fn(points.nrows(), 2, |i, j| {
            let d = sub3(row3(points, i), self.origin);
            match j {
                0 => dot3(d, self.axis),
                _ => dot3(d, e2),
            }
        })
    }
}

fn row3(points: MatRef<f64>, i: usize) -> [f64; 3] {
    [
        *points.get(i, 0),
        *points.get(i, 1),
        *points.get(i, 2),
    ]
}

fn sub3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale3(a: [f64; 3], s: f64) -> [f64; 3] {
    [a[0] * s, a[1] * s, a[2] * s]
}

fn dot3(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross3(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm3(a: [f64; 3]) -> f64 {
    dot3(a, a).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn points_from_rows(rows: &[[f64; 3]]) -> Mat<f64> {
        Mat::from_fn(rows.len(), 3, |i, j| rows[i][j])
    }

    #[test]
    fn fitted_frame_is_orthonormal() {
        let mut rng = StdRng::seed_from_u64(11);
        // Random cloud on the plane z = 0.3 x - 0.7 y + 2.
        let points = Mat::from_fn(50, 3, |_, _| rng.random_range(-1.0..1.0));
        let points = Mat::from_fn(50, 3, |i, j| match j {
            2 => 0.3 * *points.get(i, 0) - 0.7 * *points.get(i, 1) + 2.0,
            _ => *points.get(i, j),
        });

        let frame = CoordinateFrame::fit(points.as_ref()).unwrap();

        assert!((norm3(frame.normal()) - 1.0).abs() < 1e-12);
        assert!((norm3(frame.axis()) - 1.0).abs() < 1e-12);
        assert!(dot3(frame.normal(), frame.axis()).abs() < 1e-12);
        assert!((norm3(frame.second_axis()) - 1.0).abs() < 1e-12);

        // The fitted normal must be parallel to the true plane normal.
        let true_normal = scale3([-0.3, 0.7, 1.0], 1.0 / norm3([-0.3, 0.7, 1.0]));
        assert!(dot3(frame.normal(), true_normal).abs() > 1.0 - 1e-9);
    }

    #[test]
    fn fit_picks_well_separated_points() {
        // A cluster near the origin plus two distant points. The fit must use
        // the distant points for conditioning, not the first three rows.
        let points = points_from_rows(&[
            [0.0, 0.0, 0.0],
            [1e-6, 0.0, 0.0],
            [0.0, 1e-6, 0.0],
            [10.0, 0.0, 0.0],
            [0.0, 10.0, 0.0],
        ]);

        let frame = CoordinateFrame::fit(points.as_ref()).unwrap();
        assert!((frame.axis()[0].abs() - 1.0).abs() < 1e-12);
        assert!(dot3(frame.normal(), [0.0, 0.0, 1.0]).abs() > 1.0 - 1e-12);
    }

    #[test]
    fn too_few_points_fail() {
        let points = points_from_rows(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0]]);
        let err = CoordinateFrame::fit(points.as_ref()).unwrap_err();
        assert!(matches!(err, InterpolationError::DegenerateInput { .. }));
    }

    #[test]
    fn collinear_points_fail() {
        let points = points_from_rows(&[
            [0.0, 0.0, 0.0],
            [1.0, 1.0, 1.0],
            [2.0, 2.0, 2.0],
            [3.0, 3.0, 3.0],
        ]);
        let err = CoordinateFrame::fit(points.as_ref()).unwrap_err();
        assert!(matches!(err, InterpolationError::DegenerateInput { .. }));
    }

    #[test]
    fn coincident_points_fail() {
        let points = points_from_rows(&[[1.0, 2.0, 3.0]; 4]);
        let err = CoordinateFrame::fit(points.as_ref()).unwrap_err();
        assert!(matches!(err, InterpolationError::DegenerateInput { .. }));
    }

    #[test]
    fn external_frame_is_reorthogonalized() {
        // Axis deliberately not orthogonal to the normal.
        let frame =
            CoordinateFrame::new([0.0, 0.0, 1.0], [0.0, 0.0, 2.0], [1.0, 0.0, 0.5]).unwrap();
        assert!((norm3(frame.normal()) - 1.0).abs() < 1e-12);
        assert!((norm3(frame.axis()) - 1.0).abs() < 1e-12);
        assert!(dot3(frame.normal(), frame.axis()).abs() < 1e-12);
    }

    #[test]
    fn external_frame_rejects_parallel_axis() {
        let err =
            CoordinateFrame::new([0.0; 3], [0.0, 0.0, 1.0], [0.0, 0.0, -3.0]).unwrap_err();
        assert!(matches!(err, InterpolationError::DegenerateInput { .. }));
    }

    #[test]
    fn local_position_recovers_plane_coordinates() {
        let frame =
            CoordinateFrame::new([1.0, 2.0, 3.0], [0.0, 0.0, 1.0], [1.0, 0.0, 0.0]).unwrap();
        let points = points_from_rows(&[[1.0, 2.0, 3.0], [2.5, 2.0, 3.0], [1.0, 4.0, 7.0]]);
        let local = frame.local_position(points.as_ref());

        assert_eq!(local.nrows(), 3);
        assert_eq!(local.ncols(), 2);
        assert!((*local.get(0, 0)).abs() < 1e-12);
        assert!((*local.get(0, 1)).abs() < 1e-12);
        assert!((*local.get(1, 0) - 1.5).abs() < 1e-12);
        assert!((*local.get(1, 1)).abs() < 1e-12);
        // Out-of-plane offsets do not affect in-plane coordinates.
        assert!((*local.get(2, 0)).abs() < 1e-12);
        assert!((*local.get(2, 1) - 2.0).abs() < 1e-12);
    }
}
