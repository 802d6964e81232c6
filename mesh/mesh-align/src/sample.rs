//! Area-uniform surface sampling.

use crate::error::{AlignError, AlignResult};
use mesh_surface::NearestSurface;
use mesh_types::{Point3, TriangleMesh};
use tracing::debug;

/// Surface area below which a mesh is rejected as degenerate.
pub(crate) const MIN_SURFACE_AREA: f64 = 1e-12;

/// An area-uniform sample of points on a mesh surface.
///
/// Produced once per alignment and read-only afterwards; only the
/// translation changes between optimization passes.
#[derive(Debug, Clone)]
pub struct SampleSet {
    /// Points lying on the sampled surface.
    pub points: Vec<Point3<f64>>,
    /// Grid spacing used to generate the sample.
    pub cell_size: f64,
}

/// Place approximately `n` sample points on the mesh surface.
///
/// The sample gives roughly equal weight to all parts of the surface by
/// area. Sampling works by snapping a regular 3D grid onto the surface:
///
/// 1. `cell_size = sqrt(total_area / n)`, so that tiling the surface at
///    this spacing yields about `n` cells.
/// 2. Grid points spaced `cell_size` apart cover the bounding box, with
///    at least one extra row past the max corner per axis.
/// 3. One batched oracle query maps every grid point to its closest
///    surface point.
/// 4. A surface point is kept only if it stays within `cell_size / 2` of
///    its grid point on every axis. A farther hit means the grid point's
///    own neighborhood contains no surface and the returned point belongs
///    to some other region of the mesh, which would bias the sample.
///
/// The returned points are surface points, not grid points, and need not
/// coincide with mesh vertices. The count is close to but not exactly
/// `n`; occasional near-duplicate points (two grid cells snapping to the
/// same surface feature) are kept as harmless redundancy.
///
/// # Errors
///
/// - [`AlignError::ZeroSampleCount`] if `n` is zero
/// - [`AlignError::DegenerateSurface`] if the mesh's total area is
///   effectively zero
pub fn sample_surface<S>(mesh: &TriangleMesh, surface: &S, n: usize) -> AlignResult<SampleSet>
where
    S: NearestSurface + ?Sized,
{
    if n == 0 {
        return Err(AlignError::ZeroSampleCount);
    }

    let total_area = mesh.surface_area();
    if total_area.is_nan() || total_area <= MIN_SURFACE_AREA {
        return Err(AlignError::DegenerateSurface { area: total_area });
    }

    #[allow(clippy::cast_precision_loss)]
    let cell_size = (total_area / n as f64).sqrt();
    let bounds = mesh.bounds();
    debug!(cell_size, "sampling cell size");

    let mut grid = Vec::new();
    let mut x = bounds.min.x;
    while x < bounds.max.x + cell_size {
        let mut y = bounds.min.y;
        while y < bounds.max.y + cell_size {
            let mut z = bounds.min.z;
            while z < bounds.max.z + cell_size {
                grid.push(Point3::new(x, y, z));
                z += cell_size;
            }
            y += cell_size;
        }
        x += cell_size;
    }
    debug!(grid_points = grid.len(), "sampling grid built");

    let closest = surface.nearest_points(&grid);

    let half = cell_size / 2.0;
    let points: Vec<Point3<f64>> = grid
        .iter()
        .zip(closest)
        .filter(|(g, p)| {
            (p.x - g.x).abs() <= half && (p.y - g.y).abs() <= half && (p.z - g.z).abs() <= half
        })
        .map(|(_, p)| p)
        .collect();

    debug!(samples = points.len(), "kept surface samples");

    Ok(SampleSet { points, cell_size })
}
