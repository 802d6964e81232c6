//! Graduated registration optimizer.

use crate::error::{AlignError, AlignResult};
use crate::objective;
use crate::params::{AlignParams, KernelWidth};
use crate::sample::{sample_surface, SampleSet, MIN_SURFACE_AREA};
use mesh_surface::{NearestSurface, SurfaceIndex};
use mesh_types::{Point3, TriangleMesh, Vector3};
use nalgebra::DVector;
use solver_lbfgs::Lbfgs;
use tracing::debug;

/// Per-call observer hooks into the alignment pipeline.
///
/// Both methods default to no-ops; implement the ones you need. There is
/// no process-wide debug or visualization state - every call configures
/// its own observer.
///
/// The unit type `()` is the silent observer.
pub trait AlignObserver {
    /// Called once, after the moving mesh's surface has been sampled.
    fn on_sample(&mut self, points: &[Point3<f64>], cell_size: f64) {
        let _ = (points, cell_size);
    }

    /// Called after each optimization pass with the pass index and the
    /// translation it produced.
    fn on_pass(&mut self, pass: usize, delta: Vector3<f64>) {
        let _ = (pass, delta);
    }
}

impl AlignObserver for () {}

/// Minimizer capability contract.
///
/// Any bounded quasi-Newton (or otherwise locally convergent) minimizer
/// over 3-vectors can drive the registration passes; [`Lbfgs`] is the
/// default implementation.
pub trait TranslationSolver {
    /// Minimize `objective` starting from `start`, to an absolute
    /// `tolerance` already scaled to the problem's physical size.
    fn solve(
        &self,
        objective: &mut dyn FnMut(Vector3<f64>) -> f64,
        start: Vector3<f64>,
        tolerance: f64,
    ) -> SolverRun;
}

/// Outcome of one minimization pass.
#[derive(Debug, Clone, Copy)]
pub struct SolverRun {
    /// The locally optimal translation.
    pub point: Vector3<f64>,
    /// Objective evaluations spent.
    pub evaluations: usize,
}

impl TranslationSolver for Lbfgs {
    fn solve(
        &self,
        objective: &mut dyn FnMut(Vector3<f64>) -> f64,
        start: Vector3<f64>,
        tolerance: f64,
    ) -> SolverRun {
        let start = DVector::from_column_slice(start.as_slice());
        let minimum = self.minimize(
            |x: &DVector<f64>| objective(Vector3::new(x[0], x[1], x[2])),
            &start,
            tolerance,
        );
        SolverRun {
            point: Vector3::new(minimum.point[0], minimum.point[1], minimum.point[2]),
            evaluations: minimum.evaluations,
        }
    }
}

/// Result of aligning two meshes.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Translation that aligns the moving mesh to the stationary mesh.
    /// Apply it with [`TriangleMesh::translated`].
    pub translation: Vector3<f64>,

    /// Total objective evaluations across all passes. A diagnostic, not a
    /// correctness check: passes that exhaust their iteration budget
    /// still contribute their last iterate.
    pub evaluations: usize,

    /// Number of surface samples actually used (approximately the
    /// requested count).
    pub sample_count: usize,

    /// Sampling grid spacing.
    pub cell_size: f64,
}

/// Align `moving` onto `stationary`, returning the translation.
///
/// Builds a [`SurfaceIndex`] for each mesh and runs the graduated
/// schedule from [`AlignParams`] with the default [`Lbfgs`] solver. The
/// result is a pure function of the inputs: same meshes and parameters
/// always produce the same translation.
///
/// # Errors
///
/// Returns an error for precondition violations (empty or degenerate
/// meshes, invalid parameters). A poor alignment - for example when the
/// meshes do not actually overlap - is *not* detected; validate the
/// residual against the part size if you need that guarantee.
///
/// # Example
///
/// ```
/// use mesh_align::{align, AlignParams};
/// use mesh_types::{uv_sphere, Vector3};
///
/// let stationary = uv_sphere(1.0, 12, 24);
/// let moving = stationary.translated(Vector3::new(0.2, 0.0, -0.1));
///
/// let params = AlignParams::default().with_sample_count(500);
/// let result = align(&stationary, &moving, &params).unwrap();
///
/// let error = result.translation + Vector3::new(0.2, 0.0, -0.1);
/// assert!(error.norm() < 1e-3);
/// ```
pub fn align(
    stationary: &TriangleMesh,
    moving: &TriangleMesh,
    params: &AlignParams,
) -> AlignResult<Alignment> {
    if stationary.is_empty() {
        return Err(AlignError::EmptyStationary);
    }
    if moving.is_empty() {
        return Err(AlignError::EmptyMoving);
    }

    let stationary_surface = SurfaceIndex::build(stationary)?;
    let moving_surface = SurfaceIndex::build(moving)?;

    align_with(
        stationary,
        &stationary_surface,
        moving,
        &moving_surface,
        params,
        &Lbfgs::default(),
        &mut (),
    )
}

/// Fully parameterized alignment.
///
/// Accepts the nearest-surface oracles and the minimizer as capability
/// arguments, so conforming substitutes (a different spatial index, a
/// different quasi-Newton solver) can drive the same algorithm, plus an
/// [`AlignObserver`] for per-call introspection.
///
/// The algorithm:
///
/// 1. `size` = stationary bounding-box diagonal, the natural length scale.
/// 2. Sample the moving surface once ([`sample_surface`]); the sample set
///    is reused unchanged by every pass.
/// 3. Seed the translation with the centroid difference - a cheap,
///    shape-agnostic coarse guess.
/// 4. One minimization pass per schedule entry, each seeded with the
///    previous result, with tolerance `tol_rel * size`.
///
/// # Errors
///
/// Same conditions as [`align`].
pub fn align_with<Stat, Mov, Solver>(
    stationary: &TriangleMesh,
    stationary_surface: &Stat,
    moving: &TriangleMesh,
    moving_surface: &Mov,
    params: &AlignParams,
    solver: &Solver,
    observer: &mut dyn AlignObserver,
) -> AlignResult<Alignment>
where
    Stat: NearestSurface + ?Sized,
    Mov: NearestSurface + ?Sized,
    Solver: TranslationSolver + ?Sized,
{
    params.validate()?;
    if stationary.is_empty() {
        return Err(AlignError::EmptyStationary);
    }
    if moving.is_empty() {
        return Err(AlignError::EmptyMoving);
    }
    let stationary_area = stationary.surface_area();
    if stationary_area.is_nan() || stationary_area <= MIN_SURFACE_AREA {
        return Err(AlignError::DegenerateSurface {
            area: stationary_area,
        });
    }

    let size = stationary.bounds().diagonal();
    let tolerance = params.tol_rel * size;

    let SampleSet { points, cell_size } =
        sample_surface(moving, moving_surface, params.sample_count)?;
    observer.on_sample(&points, cell_size);

    // Coarse seed: make the vertex centroids coincide
    let mut delta = stationary.centroid() - moving.centroid();
    let mut evaluations = 0;

    for (pass, width) in params.schedule.iter().enumerate() {
        debug!(pass, ?width, ?delta, "starting pass");

        let run = match *width {
            KernelWidth::Unbounded => solver.solve(
                &mut |d| {
                    objective::least_squares(&objective::squared_distances(
                        d,
                        &points,
                        stationary_surface,
                    ))
                },
                delta,
                tolerance,
            ),
            KernelWidth::Percent(pct) => {
                let sqwidth = (size * pct / 100.0).powi(2);
                solver.solve(
                    &mut |d| {
                        objective::robust(
                            &objective::squared_distances(d, &points, stationary_surface),
                            sqwidth,
                        )
                    },
                    delta,
                    tolerance,
                )
            }
        };

        delta = run.point;
        evaluations += run.evaluations;
        debug!(pass, evaluations = run.evaluations, ?delta, "pass complete");
        observer.on_pass(pass, delta);
    }

    Ok(Alignment {
        translation: delta,
        evaluations,
        sample_count: points.len(),
        cell_size,
    })
}
