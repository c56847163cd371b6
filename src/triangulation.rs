/////////////////////////////////////////////////////////////////////////////////////////////
//
// Defines the pluggable 2D triangulation capability and the delaunator-backed default.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Defines the pluggable 2D triangulation capability and the delaunator-backed default.
//!
//! The interpolator core only requires two operations from a triangulation
//! engine: build a triangulation covering the convex hull of a 2D point set,
//! and produce an interpolation stencil (vertex indices plus weights summing
//! to one) for an arbitrary query point. [`PlanarTriangulator`] captures that
//! contract so the engine can be swapped or mocked without touching the core.

use faer::{Mat, MatRef};

/// Barycentric coordinates down to this value still count as inside, so
/// queries on triangle edges and vertices resolve to the adjacent triangle.
const INSIDE_TOLERANCE: f64 = -1e-12;

/// A 2D triangle mesh: vertex coordinates (N x 2) plus triangle index triples.
///
/// Vertex order matches the point set handed to
/// [`PlanarTriangulator::triangulate`], so triangle indices are valid indices
/// into the caller's original point set.
#[derive(Debug, Clone)]
pub struct TriangleMesh {
    points: Mat<f64>,
    triangles: Vec<[usize; 3]>,
}

impl TriangleMesh {
    /// Creates a mesh from vertices (N x 2) and triangle index triples.
    pub fn new(points: Mat<f64>, triangles: Vec<[usize; 3]>) -> Self {
        assert!(
            points.ncols() == 2,
            "mesh vertices must be (N x 2), got (N x {})",
            points.ncols()
        );
        Self { points, triangles }
    }

    /// Vertex coordinates, one row per vertex.
    pub fn points(&self) -> MatRef<f64> {
        self.points.as_ref()
    }

    /// Triangle vertex indices.
    pub fn triangles(&self) -> &[[usize; 3]] {
        &self.triangles
    }

    fn vertex(&self, v: usize) -> [f64; 2] {
        [*self.points.get(v, 0), *self.points.get(v, 1)]
    }

    /// Index of the vertex closest to `query`. Ties keep the lowest index.
    fn nearest_vertex(&self, query: [f64; 2]) -> usize {
        debug_assert!(self.points.nrows() > 0);

        let mut nearest = 0;
        let mut best = f64::INFINITY;
        for i in 0..self.points.nrows() {
            let dx = *self.points.get(i, 0) - query[0];
            let dy = *self.points.get(i, 1) - query[1];
            let dist_sq = dx * dx + dy * dy;
            if dist_sq < best {
                best = dist_sq;
                nearest = i;
            }
        }
        nearest
    }

    /// Interpolation stencil for `query`: vertex indices and weights that sum
    /// to one.
    ///
    /// If the query falls inside a triangle, returns that triangle's three
    /// vertices with barycentric weights. Outside the convex hull (or when the
    /// mesh has no triangles at all, e.g. collinear input) the policy is a
    /// nearest-vertex clamp: a single vertex with weight 1.0.
    pub fn interpolation_stencil(&self, query: [f64; 2]) -> (Vec<usize>, Vec<f64>) {
        for tri in &self.triangles {
            let a = self.vertex(tri[0]);
            let b = self.vertex(tri[1]);
            let c = self.vertex(tri[2]);

            let det = cross2(sub2(b, a), sub2(c, a));
            if det == 0.0 {
                // Zero-area sliver, cannot interpolate from it.
                continue;
            }

            let wa = cross2(sub2(b, query), sub2(c, query)) / det;
            let wb = cross2(sub2(c, query), sub2(a, query)) / det;
            let wc = 1.0 - wa - wb;

            if wa >= INSIDE_TOLERANCE && wb >= INSIDE_TOLERANCE && wc >= INSIDE_TOLERANCE {
                return (vec![tri[0], tri[1], tri[2]], vec![wa, wb, wc]);
            }
        }

        (vec![self.nearest_vertex(query)], vec![1.0])
    }
}

/// External 2D triangulation capability.
///
/// Implementations must build a triangulation covering the convex hull of the
/// given points without reordering them: triangle indices refer to the input
/// rows. The provided [`locate`](PlanarTriangulator::locate) walks the mesh
/// with barycentric point location and clamps to the nearest vertex outside
/// the hull; backends with their own location structures may override it.
pub trait PlanarTriangulator {
    /// Triangulates a 2D point set (N x 2). Point order is preserved.
    fn triangulate(&self, points: MatRef<f64>) -> TriangleMesh;

    /// Interpolation stencil for one query point; weights must sum to one.
    fn locate(&self, mesh: &TriangleMesh, query: [f64; 2]) -> (Vec<usize>, Vec<f64>) {
        mesh.interpolation_stencil(query)
    }
}

/// Default triangulation backend, built on the `delaunator` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DelaunayTriangulator;

impl PlanarTriangulator for DelaunayTriangulator {
    fn triangulate(&self, points: MatRef<f64>) -> TriangleMesh {
        let input: Vec<delaunator::Point> = (0..points.nrows())
            .map(|i| delaunator::Point {
                x: *points.get(i, 0),
                y: *points.get(i, 1),
            })
            .collect();

        let triangulation = delaunator::triangulate(&input);
        let triangles = triangulation
            .triangles
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();

        TriangleMesh::new(points.to_owned(), triangles)
    }
}

fn sub2(a: [f64; 2], b: [f64; 2]) -> [f64; 2] {
    [a[0] - b[0], a[1] - b[1]]
}

fn cross2(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use faer::Mat;

    fn unit_square() -> Mat<f64> {
        Mat::from_fn(4, 2, |i, j| match (i, j) {
            (0, _) => 0.0,
            (1, 0) => 1.0,
            (1, 1) => 0.0,
            (2, 0) => 1.0,
            (2, 1) => 1.0,
            (3, 0) => 0.0,
            _ => 1.0,
        })
    }

    #[test]
    fn triangulates_square_into_two_triangles() {
        let mesh = DelaunayTriangulator.triangulate(unit_square().as_ref());
        assert_eq!(mesh.triangles().len(), 2);
        assert_eq!(mesh.points().nrows(), 4);
    }

    #[test]
    fn interior_query_gets_barycentric_weights() {
        let mesh = DelaunayTriangulator.triangulate(unit_square().as_ref());
        let (indices, weights) = mesh.interpolation_stencil([0.3, 0.2]);

        assert_eq!(indices.len(), 3);
        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert!(weights.iter().all(|&w| w >= -1e-12));

        // The stencil must reproduce the query position.
        let mut x = 0.0;
        let mut y = 0.0;
        for (&v, &w) in indices.iter().zip(&weights) {
            x += w * *mesh.points().get(v, 0);
            y += w * *mesh.points().get(v, 1);
        }
        assert!((x - 0.3).abs() < 1e-12);
        assert!((y - 0.2).abs() < 1e-12);
    }

    #[test]
    fn vertex_query_gets_unit_weight() {
        let mesh = DelaunayTriangulator.triangulate(unit_square().as_ref());
        let (indices, weights) = mesh.interpolation_stencil([1.0, 1.0]);

        let sum: f64 = weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);

        let mut on_vertex = 0.0;
        for (&v, &w) in indices.iter().zip(&weights) {
            if v == 2 {
                on_vertex = w;
            } else {
                assert!(w.abs() < 1e-12);
            }
        }
        assert!((on_vertex - 1.0).abs() < 1e-12);
    }

    #[test]
    fn outside_hull_clamps_to_nearest_vertex() {
        let mesh = DelaunayTriangulator.triangulate(unit_square().as_ref());
        let (indices, weights) = mesh.interpolation_stencil([2.0, 2.1]);
        assert_eq!(indices, vec![2]);
        assert_eq!(weights, vec![1.0]);
    }

    #[test]
    fn collinear_input_falls_back_to_nearest_vertex() {
        let points = Mat::from_fn(5, 2, |i, j| match j {
            0 => i as f64,
            _ => 0.0,
        });
        let mesh = DelaunayTriangulator.triangulate(points.as_ref());
        assert!(mesh.triangles().is_empty());

        let (indices, weights) = mesh.interpolation_stencil([3.2, 1.0]);
        assert_eq!(indices, vec![3]);
        assert_eq!(weights, vec![1.0]);
    }
}
