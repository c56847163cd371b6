/////////////////////////////////////////////////////////////////////////////////////////////
//
// Exposes the public API and high-level documentation for planar point-to-point interpolation.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! # Planar point-to-point interpolation.
//!
//! Maps scalar or vector data known at one irregular set of 3D points (the
//! *source* points) onto a different set of 3D points (the *destination*
//! points) that do not coincide with the source locations. Typical use is
//! applying externally supplied, non-matching boundary data — measured or
//! previously computed values on an arbitrary point cloud — onto the face
//! centres of a computational surface, interpolated in time as a simulation
//! advances.
//!
//! Construction works in four steps:
//!
//! - **Frame fitting** — a well-conditioned local coordinate plane is fitted
//!   through the source points by two-stage farthest-point selection
//!   ([`CoordinateFrame::fit`]), or supplied externally.
//! - **Projection and perturbation** — both point sets are projected into the
//!   plane; the projected source points get a tiny jitter, seeded identically
//!   every run, so regular grids cannot produce ambiguous triangulations and
//!   results stay bit-reproducible.
//! - **Triangulation** — a 2D Delaunay triangulation of the perturbed source
//!   points is built via the [`delaunator`] crate (swappable through the
//!   [`PlanarTriangulator`] trait) and each destination point resolves to a
//!   small set of `(source index, weight)` pairs summing to one. Outside the
//!   convex hull the nearest source vertex is used with weight 1.
//! - **Caching** — the weight sets are validated and stored; applying the
//!   interpolator to data afterwards is a pure weighted sum.
//!
//! A separate time-bracket search ([`find_bracket`]) resolves which pair of
//! time-indexed snapshots surrounds a query time, with a caller-threaded
//! cursor that makes monotonically advancing queries amortized O(1).
//!
//! # Example
//!
//! ```
//! use faer::Mat;
//! use ferreus_planar::{generate_random_points, PlanarInterpolator};
//!
//! // Source points scattered on the z = 0 plane, with one value per point.
//! let xy = generate_random_points(64, 2, Some(42));
//! let source = Mat::from_fn(64, 3, |i, j| match j < 2 {
//!     true => *xy.get(i, j),
//!     false => 0.0,
//! });
//! let values = Mat::from_fn(64, 1, |i, _| {
//!     1.0 + 2.0 * *source.get(i, 0) - *source.get(i, 1)
//! });
//!
//! // Destination points in the interior of the cloud.
//! let dest = Mat::from_fn(16, 3, |i, j| match j {
//!     0 => 0.25 + 0.5 * (i % 4) as f64 / 3.0,
//!     1 => 0.25 + 0.5 * (i / 4) as f64 / 3.0,
//!     _ => 0.0,
//! });
//!
//! let interp = PlanarInterpolator::builder(source, dest).build()?;
//! let mapped = interp.interpolate(values.as_ref())?;
//! assert_eq!(mapped.nrows(), 16);
//! # Ok::<(), ferreus_planar::InterpolationError>(())
//! ```

pub mod time;

pub mod triangulation;

mod common;

mod error;

mod frame;

mod interpolator;

mod mesh_io;

mod perturb;

mod weights;

pub use {
    common::generate_random_points,
    error::{InterpolationError, InterpolationResult},
    frame::CoordinateFrame,
    interpolator::{
        ModelIOError, PlanarInterpolator, PlanarInterpolatorBuilder, DEFAULT_PERTURB,
    },
    mesh_io::{save_points_obj, save_triangulation_obj},
    time::{find_bracket, time_names, TimeBracket, TimeInstant},
    triangulation::{DelaunayTriangulator, PlanarTriangulator, TriangleMesh},
    weights::{WeightSet, WEIGHT_SUM_TOLERANCE},
};
