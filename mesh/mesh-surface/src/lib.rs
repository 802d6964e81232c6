//! Nearest-surface-point queries for partdiff.
//!
//! Registration measures how far a translated sample point is from the
//! other mesh's *surface* - not from its nearest vertex. A kd-tree over
//! vertices would over-report distances wherever triangles are large, so
//! this crate indexes triangles in a bounding-volume hierarchy and answers
//! exact closest-point queries, including points in the middle of a face.
//!
//! # Quick Start
//!
//! ```
//! use mesh_surface::SurfaceIndex;
//! use mesh_types::{unit_cube, Point3};
//!
//! let cube = unit_cube();
//! let index = SurfaceIndex::build(&cube).unwrap();
//!
//! // Closest point to a query outside the +X face lies on that face
//! let p = index.nearest_point(&Point3::new(2.0, 0.5, 0.5));
//! assert!((p.x - 1.0).abs() < 1e-12);
//! ```
//!
//! Batched queries ([`SurfaceIndex::nearest_points`]) are parallelized
//! with rayon and preserve input order, which is what the registration
//! objective calls once per evaluation.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bvh;
mod error;
mod query;

pub use bvh::SurfaceIndex;
pub use error::{SurfaceError, SurfaceResult};
pub use query::closest_point_on_triangle;

use nalgebra::Point3;

/// Capability contract for nearest-surface-point lookup.
///
/// The registration core consumes the oracle only through this trait, so
/// any conforming spatial structure can stand in for [`SurfaceIndex`].
pub trait NearestSurface {
    /// For each query point, the closest point on the indexed surface.
    ///
    /// The result has the same length and order as `queries`.
    fn nearest_points(&self, queries: &[Point3<f64>]) -> Vec<Point3<f64>>;
}

impl NearestSurface for SurfaceIndex {
    fn nearest_points(&self, queries: &[Point3<f64>]) -> Vec<Point3<f64>> {
        Self::nearest_points(self, queries)
    }
}
