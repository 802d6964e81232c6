//! Distance objective underlying every optimization pass.

use mesh_surface::NearestSurface;
use mesh_types::{Point3, Vector3};

/// Squared distance from each translated sample point to the stationary
/// surface.
///
/// Every call translates the full sample set by `delta` and issues one
/// batched oracle query; nothing is cached between calls, since a new
/// `delta` changes every query point. The result preserves sample order.
pub fn squared_distances<S>(
    delta: Vector3<f64>,
    samples: &[Point3<f64>],
    stationary: &S,
) -> Vec<f64>
where
    S: NearestSurface + ?Sized,
{
    let translated: Vec<Point3<f64>> = samples.iter().map(|p| *p + delta).collect();
    let closest = stationary.nearest_points(&translated);
    translated
        .iter()
        .zip(&closest)
        .map(|(p, c)| (*c - *p).norm_squared())
        .collect()
}

/// Least-squares pass objective: the sum of squared distances.
pub(crate) fn least_squares(sqdists: &[f64]) -> f64 {
    sqdists.iter().sum()
}

/// Robust pass objective: negative sum of Gaussian weights.
///
/// Each point contributes `exp(-sqdist / sqwidth)`, so points within the
/// kernel width pull the optimum toward themselves while points far
/// beyond it have vanishing influence on the gradient.
pub(crate) fn robust(sqdists: &[f64], sqwidth: f64) -> f64 {
    -sqdists.iter().map(|d| (-d / sqwidth).exp()).sum::<f64>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_surface::SurfaceIndex;
    use mesh_types::unit_cube;

    #[test]
    fn zero_delta_on_surface_points_gives_zero_distances() {
        let cube = unit_cube();
        let index = SurfaceIndex::build(&cube).unwrap();

        let samples = vec![
            Point3::new(0.5, 0.5, 0.0),
            Point3::new(0.0, 0.25, 0.75),
            Point3::new(1.0, 1.0, 1.0),
        ];
        let sqdists = squared_distances(Vector3::zeros(), &samples, &index);
        assert_eq!(sqdists.len(), 3);
        for d in sqdists {
            assert!(d < 1e-18);
        }
    }

    #[test]
    fn translated_point_reports_squared_offset() {
        let cube = unit_cube();
        let index = SurfaceIndex::build(&cube).unwrap();

        // Push a top-face point straight up by 0.5
        let samples = vec![Point3::new(0.5, 0.5, 1.0)];
        let sqdists = squared_distances(Vector3::new(0.0, 0.0, 0.5), &samples, &index);
        assert!((sqdists[0] - 0.25).abs() < 1e-12);
    }

    #[test]
    fn least_squares_sums() {
        assert!((least_squares(&[1.0, 2.0, 3.0]) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn robust_kernel_saturates() {
        let sqwidth = 1.0;
        // A perfectly matched point contributes -1
        assert!((robust(&[0.0], sqwidth) + 1.0).abs() < 1e-12);
        // A far outlier contributes almost nothing
        assert!(robust(&[100.0], sqwidth).abs() < 1e-12);
        // More matched points means lower (better) objective
        assert!(robust(&[0.0, 0.0], sqwidth) < robust(&[0.0], sqwidth));
    }

    #[test]
    fn robust_approaches_least_squares_ordering_for_wide_kernels() {
        // With a very wide kernel the robust objective ranks candidate
        // deltas the same way least squares does
        let near = [0.01, 0.02, 0.03];
        let far = [0.5, 0.6, 0.7];
        let sqwidth = 1e6;
        assert!(robust(&near, sqwidth) < robust(&far, sqwidth));
        assert!(least_squares(&near) < least_squares(&far));
    }
}
