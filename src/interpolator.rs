/////////////////////////////////////////////////////////////////////////////////////////////
//
// Implements the planar point-to-point interpolator facade and its model persistence.
//
// Created on: 15 Nov 2025     Author: Daniel Owen
//
// Copyright (c) 2025, Maptek Pty Ltd. All rights reserved. Licensed under the MIT License.
//
/////////////////////////////////////////////////////////////////////////////////////////////

use crate::error::{InterpolationError, InterpolationResult};
use crate::frame::CoordinateFrame;
use crate::perturb;
use crate::triangulation::{DelaunayTriangulator, PlanarTriangulator};
use crate::weights::{self, WeightSet};
use log::debug;
use serde::{Deserialize, Serialize};

use faer::{Mat, MatRef};
use std::{
    fmt,
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Default perturbation fraction applied to projected source points.
pub const DEFAULT_PERTURB: f64 = 1e-5;

const JSON_FORMAT_NAME: &str = "ferreus_planar.interpolator";
const JSON_VERSION: u32 = 1;

/// Convenience builder for constructing a [`PlanarInterpolator`].
///
/// Provides the optional knobs on top of the two required point sets: the
/// perturbation fraction, an externally fitted reference frame (so several
/// related interpolators can share one consistent frame), and a replacement
/// triangulation backend.
///
/// The builder should be called via the [`PlanarInterpolator::builder`] method.
pub struct PlanarInterpolatorBuilder {
    source_points: Mat<f64>,
    dest_points: Mat<f64>,
    perturb: f64,
    reference_frame: Option<CoordinateFrame>,
    triangulator: Box<dyn PlanarTriangulator>,
}

impl PlanarInterpolatorBuilder {
    /// Creates a new builder from the source points (where data is known) and
    /// destination points (where data is requested), both (N x 3).
    fn new(source_points: Mat<f64>, dest_points: Mat<f64>) -> Self {
        Self {
            source_points,
            dest_points,
            perturb: DEFAULT_PERTURB,
            reference_frame: None,
            triangulator: Box::new(DelaunayTriangulator),
        }
    }

    /// Sets the perturbation fraction (default [`DEFAULT_PERTURB`]).
    pub fn perturb(mut self, perturb: f64) -> Self {
        self.perturb = perturb;
        self
    }

    /// Supplies an externally fitted coordinate frame instead of fitting one
    /// from the source points.
    pub fn reference_frame(mut self, frame: CoordinateFrame) -> Self {
        self.reference_frame = Some(frame);
        self
    }

    /// Replaces the default Delaunay backend with another
    /// [`PlanarTriangulator`] implementation.
    pub fn triangulator(mut self, triangulator: Box<dyn PlanarTriangulator>) -> Self {
        self.triangulator = triangulator;
        self
    }

    /// Builds the interpolator, fitting the frame and computing all weight
    /// sets eagerly.
    ///
    /// # Errors
    /// - [`InterpolationError::DegenerateInput`] if fewer than three source
    ///   points are given or no frame can be fitted from them.
    /// - [`InterpolationError::WeightSum`] if the triangulation backend
    ///   returns an inconsistent weight set.
    pub fn build(self) -> InterpolationResult<PlanarInterpolator> {
        PlanarInterpolator::new(
            self.source_points,
            self.dest_points,
            self.perturb,
            self.reference_frame,
            self.triangulator,
        )
    }
}

/// Interpolates data from one irregular 3D point set onto another via a
/// fitted local plane.
///
/// Construction projects both point sets into the fitted (or supplied) frame,
/// applies a small deterministic jitter to the projected source points to
/// break geometric ties, triangulates them, and caches one [`WeightSet`] per
/// destination point. After construction the interpolator is immutable;
/// applying it to data is a pure weighted sum, so sharing one instance across
/// threads for concurrent reads is safe.
///
/// Determinism: the jitter is seeded with a fixed process-wide constant, so
/// identical inputs always produce bit-identical weight sets.
#[derive(Debug, Serialize, Deserialize)]
pub struct PlanarInterpolator {
    /// Local coordinate system the points were projected into.
    frame: CoordinateFrame,

    /// Fraction of the source bounding box used for tie-breaking jitter.
    perturb: f64,

    /// Number of source points recorded at construction; value arrays passed
    /// to [`interpolate`](Self::interpolate) must have this many rows.
    n_points: usize,

    /// One interpolation stencil per destination point.
    weights: Vec<WeightSet>,
}

impl PlanarInterpolator {
    /// Creates a new [`PlanarInterpolatorBuilder`] for the given source and
    /// destination point sets, both (N x 3).
    ///
    /// This is the way to construct an interpolator.
    pub fn builder(source_points: Mat<f64>, dest_points: Mat<f64>) -> PlanarInterpolatorBuilder {
        PlanarInterpolatorBuilder::new(source_points, dest_points)
    }

    fn new(
        source_points: Mat<f64>,
        dest_points: Mat<f64>,
        perturb_fraction: f64,
        reference_frame: Option<CoordinateFrame>,
        triangulator: Box<dyn PlanarTriangulator>,
    ) -> InterpolationResult<Self> {
        assert!(
            source_points.ncols() == 3,
            "source points must be (N x 3), got (N x {})",
            source_points.ncols()
        );
        assert!(
            dest_points.ncols() == 3,
            "destination points must be (N x 3), got (N x {})",
            dest_points.ncols()
        );

        // Checked here as well as in `fit`, so an external frame cannot smuggle
        // an under-sized source set past the triangulation.
        if source_points.nrows() < 3 {
            return Err(InterpolationError::DegenerateInput {
                detail: format!(
                    "only {} source point(s) provided; need at least three to interpolate",
                    source_points.nrows()
                ),
            });
        }

        let frame = match reference_frame {
            Some(frame) => frame,
            None => CoordinateFrame::fit(source_points.as_ref())?,
        };

        let mut local_source = frame.local_position(source_points.as_ref());
        perturb::perturb_points(&mut local_source, perturb_fraction, perturb::PERTURB_SEED);

        let local_dest = frame.local_position(dest_points.as_ref());

        let weights = weights::resolve_weights(
            triangulator.as_ref(),
            local_source.as_ref(),
            local_dest.as_ref(),
        )?;

        debug!(
            "planar interpolation from {} source points onto {} destination points",
            source_points.nrows(),
            dest_points.nrows()
        );

        Ok(Self {
            frame,
            perturb: perturb_fraction,
            n_points: source_points.nrows(),
            weights,
        })
    }

    /// The coordinate frame the interpolator projects into.
    pub fn reference_frame(&self) -> &CoordinateFrame {
        &self.frame
    }

    /// The perturbation fraction used at construction.
    pub fn perturb(&self) -> f64 {
        self.perturb
    }

    /// Number of source points recorded at construction.
    pub fn n_source_points(&self) -> usize {
        self.n_points
    }

    /// Number of destination points.
    pub fn n_dest_points(&self) -> usize {
        self.weights.len()
    }

    /// The cached interpolation stencils, one per destination point.
    pub fn weights(&self) -> &[WeightSet] {
        &self.weights
    }

    fn check_values(
        &self,
        source_values: MatRef<f64>,
        context: &'static str,
    ) -> InterpolationResult<()> {
        match source_values.nrows() == self.n_points {
            true => Ok(()),
            false => Err(InterpolationError::SizeMismatch {
                expected: self.n_points,
                actual: source_values.nrows(),
                context,
            }),
        }
    }

    /// Interpolates values known at the source points onto all destination
    /// points.
    ///
    /// `source_values` has one row per source point; multiple columns carry
    /// the components of vector data. Returns one row per destination point.
    ///
    /// # Errors
    /// [`InterpolationError::SizeMismatch`] if `source_values` does not have
    /// exactly as many rows as there were source points at construction.
    pub fn interpolate(&self, source_values: MatRef<f64>) -> InterpolationResult<Mat<f64>> {
        self.check_values(source_values, "interpolate")?;

        let n_cols = source_values.ncols();
        let mut out = Mat::zeros(self.weights.len(), n_cols);
        for (i, set) in self.weights.iter().enumerate() {
            for (index, weight) in set.iter() {
                for col in 0..n_cols {
                    out[(i, col)] += weight * *source_values.get(index, col);
                }
            }
        }
        Ok(out)
    }

    /// Interpolates values onto a single destination point, returning one
    /// value per column of `source_values`.
    ///
    /// # Errors
    /// [`InterpolationError::SizeMismatch`] as for
    /// [`interpolate`](Self::interpolate).
    ///
    /// # Panics
    /// If `dest_index` is out of range.
    pub fn interpolate_at(
        &self,
        source_values: MatRef<f64>,
        dest_index: usize,
    ) -> InterpolationResult<Vec<f64>> {
        self.check_values(source_values, "interpolate_at")?;
        assert!(
            dest_index < self.weights.len(),
            "destination index {} out of range ({} destination points)",
            dest_index,
            self.weights.len()
        );

        let mut out = vec![0.0; source_values.ncols()];
        for (index, weight) in self.weights[dest_index].iter() {
            for (col, acc) in out.iter_mut().enumerate() {
                *acc += weight * *source_values.get(index, col);
            }
        }
        Ok(out)
    }

    /// Saves the interpolator to a versioned JSON envelope.
    ///
    /// # Errors
    /// Returns `ModelIOError::{Create, Serialize, Flush}` on I/O or
    /// serialization failures.
    pub fn save_model<P: AsRef<Path>>(&self, path: P) -> ModelIOResult<()> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|e| ModelIOError::Create {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let mut w = BufWriter::new(file);

        let env = JsonEnvelopeRef {
            format: JSON_FORMAT_NAME,
            version: JSON_VERSION,
            model: self,
        };

        serde_json::to_writer_pretty(&mut w, &env).map_err(|e| ModelIOError::Serialize {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        w.flush().map_err(|e| ModelIOError::Flush {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }

    /// Loads an interpolator from a versioned JSON envelope, validating the
    /// format name and version.
    ///
    /// # Errors
    /// Returns `ModelIOError::{Open, Parse, FormatMismatch, VersionMismatch}`
    /// as appropriate.
    pub fn load_model<P: AsRef<Path>>(path: P) -> ModelIOResult<Self> {
        let path_ref = path.as_ref();

        let file = File::open(path_ref).map_err(|e| ModelIOError::Open {
            path: path_ref.to_path_buf(),
            source: e,
        })?;
        let reader = BufReader::new(file);

        let env: JsonEnvelopeOwned<Self> =
            serde_json::from_reader(reader).map_err(|e| ModelIOError::Parse {
                path: path_ref.to_path_buf(),
                source: e,
            })?;

        if env.format != JSON_FORMAT_NAME {
            return Err(ModelIOError::FormatMismatch {
                path: path_ref.to_path_buf(),
                found: env.format,
                expected: JSON_FORMAT_NAME,
            });
        }
        if env.version != JSON_VERSION {
            return Err(ModelIOError::VersionMismatch {
                path: path_ref.to_path_buf(),
                found: env.version,
                expected: JSON_VERSION,
            });
        }

        Ok(env.model)
    }
}

#[derive(Serialize)]
struct JsonEnvelopeRef<'a, T> {
    format: &'static str,
    version: u32,
    model: &'a T,
}

#[derive(Deserialize)]
struct JsonEnvelopeOwned<T> {
    format: String,
    version: u32,
    model: T,
}

type ModelIOResult<T> = std::result::Result<T, ModelIOError>;

/// Errors from persisting a [`PlanarInterpolator`].
///
/// Saving writes the fitted frame and cached weight tables into a JSON
/// envelope tagged with a format name and version; loading validates both
/// tags before accepting the model. Variants wrap the underlying I/O or JSON
/// failure together with the file path.
#[derive(Debug)]
pub enum ModelIOError {
    /// The target file for a saved model could not be created.
    Create { path: PathBuf, source: io::Error },
    /// The model file could not be opened for reading.
    Open { path: PathBuf, source: io::Error },
    /// Buffered output could not be flushed after writing the model.
    Flush { path: PathBuf, source: io::Error },
    /// The frame and weight tables could not be serialized to JSON.
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The model file is not valid JSON or lacks the envelope fields.
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// The envelope names something other than a planar interpolator model.
    FormatMismatch {
        path: PathBuf,
        found: String,
        expected: &'static str,
    },
    /// The envelope was written by an unsupported model version.
    VersionMismatch {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}

impl fmt::Display for ModelIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelIOError::Create { path, source } => {
                write!(f, "creating {}: {}", path.display(), source)
            }
            ModelIOError::Open { path, source } => {
                write!(f, "opening {}: {}", path.display(), source)
            }
            ModelIOError::Flush { path, source } => {
                write!(f, "flushing {}: {}", path.display(), source)
            }
            ModelIOError::Serialize { path, source } => {
                write!(f, "serializing {}: {}", path.display(), source)
            }
            ModelIOError::Parse { path, source } => {
                write!(f, "parsing {}: {}", path.display(), source)
            }
            ModelIOError::FormatMismatch {
                path,
                found,
                expected,
            } => {
                write!(
                    f,
                    "{}: format {:?} does not match expected {:?}",
                    path.display(),
                    found,
                    expected
                )
            }
            ModelIOError::VersionMismatch {
                path,
                found,
                expected,
            } => {
                write!(
                    f,
                    "{}: version {} does not match expected {}",
                    path.display(),
                    found,
                    expected
                )
            }
        }
    }
}

impl std::error::Error for ModelIOError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelIOError::Create { source, .. }
            | ModelIOError::Open { source, .. }
            | ModelIOError::Flush { source, .. } => Some(source),
            ModelIOError::Serialize { source, .. } | ModelIOError::Parse { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
