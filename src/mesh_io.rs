/////////////////////////////////////////////////////////////////////////////////////////////
//
// Writes projected point sets and 2D triangulations to OBJ files for visual inspection.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

//! Writes projected point sets and 2D triangulations to OBJ files for visual inspection.
//!
//! Diagnostics only; nothing in the interpolation pipeline depends on these.

use crate::triangulation::TriangleMesh;
use faer::MatRef;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::io::{Error, ErrorKind, Result};
use std::path::Path;

/// Write a 2D triangulation to an OBJ file, with the plane embedded at z = 0.
///
/// - `name`: object name to write as `o <name>`
/// - `mesh`: triangulation to dump (vertices plus 0-based triangles)
///
/// # Errors
/// - `InvalidInput` if the mesh has no vertices.
/// - `InvalidData` if any triangle index is out of range.
pub fn save_triangulation_obj<P: AsRef<Path>>(
    path: P,
    name: &str,
    mesh: &TriangleMesh,
) -> Result<()> {
    let verts = mesh.points();
    let nv = verts.nrows();

    if nv == 0 {
        return Err(Error::new(ErrorKind::InvalidInput, "mesh has no vertices"));
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# planar triangulation")?;
    writeln!(w, "\no {}", name)?;

    for r in 0..nv {
        writeln!(w, "v {} {} 0", verts.get(r, 0), verts.get(r, 1))?;
    }

    // OBJ is 1-based indexing.
    for (r, tri) in mesh.triangles().iter().enumerate() {
        let [a, b, c] = *tri;
        if a >= nv || b >= nv || c >= nv {
            return Err(Error::new(
                ErrorKind::InvalidData,
                format!("triangle {r}: index out of bounds (nv = {nv})"),
            ));
        }
        writeln!(w, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }

    w.flush()
}

/// Write projected 2D points (N x 2) to an OBJ file as vertices at z = 0.
///
/// # Errors
/// - `InvalidInput` if `points` is not (N x 2).
pub fn save_points_obj<P: AsRef<Path>>(path: P, name: &str, points: MatRef<f64>) -> Result<()> {
    if points.ncols() != 2 {
        return Err(Error::new(
            ErrorKind::InvalidInput,
            format!("points must be (N x 2), got (N x {})", points.ncols()),
        ));
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# projected points")?;
    writeln!(w, "\no {}", name)?;
    for r in 0..points.nrows() {
        writeln!(w, "v {} {} 0", points.get(r, 0), points.get(r, 1))?;
    }

    w.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::triangulation::{DelaunayTriangulator, PlanarTriangulator};
    use faer::Mat;

    #[test]
    fn obj_dump_round_trips_counts() {
        let points = Mat::from_fn(4, 2, |i, j| match (i, j) {
            (1, 0) | (2, 0) | (2, 1) | (3, 1) => 1.0,
            _ => 0.0,
        });
        let mesh = DelaunayTriangulator.triangulate(points.as_ref());

        let path = std::env::temp_dir().join(format!(
            "ferreus_planar_tri_{}.obj",
            std::process::id()
        ));
        save_triangulation_obj(&path, "triangulation", &mesh).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert_eq!(
            text.lines().filter(|l| l.starts_with("f ")).count(),
            mesh.triangles().len()
        );
    }

    #[test]
    fn wrong_width_points_are_rejected() {
        let points = Mat::<f64>::zeros(3, 3);
        let err = save_points_obj("unused.obj", "points", points.as_ref()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}
