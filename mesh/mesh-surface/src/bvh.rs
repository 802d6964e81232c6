//! Bounding-volume hierarchy over mesh triangles.
//!
//! The hierarchy answers exact nearest-surface-point queries: a descent
//! visits the child whose box is nearer first and prunes any subtree whose
//! box lower bound cannot beat the best distance found so far.

use crate::error::{SurfaceError, SurfaceResult};
use crate::query::closest_point_on_triangle;
use mesh_types::{Aabb, Triangle, TriangleMesh};
use nalgebra::Point3;
use rayon::prelude::*;
use smallvec::SmallVec;
use std::cmp::Ordering;
use tracing::debug;

/// Maximum triangles per leaf node.
const MAX_LEAF_SIZE: usize = 8;

/// BVH node containing either leaf triangles or two children.
#[derive(Debug)]
enum Node {
    Leaf {
        bounds: Aabb,
        triangles: SmallVec<[u32; 8]>,
    },
    Branch {
        bounds: Aabb,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn bounds(&self) -> &Aabb {
        match self {
            Self::Leaf { bounds, .. } | Self::Branch { bounds, .. } => bounds,
        }
    }
}

/// Spatial index over a mesh's triangles for nearest-surface-point queries.
///
/// Building is O(n log n); a single query is O(log n) for well-shaped
/// meshes. The index stores resolved triangle positions, so the source
/// mesh may be dropped or mutated after [`SurfaceIndex::build`] returns.
///
/// # Example
///
/// ```
/// use mesh_surface::SurfaceIndex;
/// use mesh_types::{unit_cube, Point3};
///
/// let index = SurfaceIndex::build(&unit_cube()).unwrap();
///
/// // A point inside the cube maps to the nearest face
/// let p = index.nearest_point(&Point3::new(0.5, 0.5, 0.1));
/// assert!(p.z.abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct SurfaceIndex {
    triangles: Vec<Triangle>,
    root: Node,
}

impl SurfaceIndex {
    /// Build an index over a mesh's triangles.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::EmptyMesh`] if the mesh has no faces.
    pub fn build(mesh: &TriangleMesh) -> SurfaceResult<Self> {
        if mesh.is_empty() {
            return Err(SurfaceError::EmptyMesh);
        }

        let triangles: Vec<Triangle> = mesh.triangles().collect();
        let boxes: Vec<Aabb> = triangles.iter().map(Triangle::bounds).collect();
        let centers: Vec<Point3<f64>> = triangles.iter().map(Triangle::centroid).collect();

        #[allow(clippy::cast_possible_truncation)]
        // Truncation: face indices are u32 throughout mesh-types
        let indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let root = build_recursive(&boxes, &centers, indices);

        debug!(triangles = triangles.len(), "built surface index");

        Ok(Self { triangles, root })
    }

    /// Number of indexed triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Bounding box of the indexed surface.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        self.root.bounds()
    }

    /// Closest point on the surface to a query point.
    ///
    /// The result is exact and may lie at a vertex, on an edge, or in the
    /// interior of a face.
    #[must_use]
    pub fn nearest_point(&self, query: &Point3<f64>) -> Point3<f64> {
        let mut best = *query;
        let mut best_dist_sq = f64::INFINITY;
        self.descend(&self.root, query, &mut best, &mut best_dist_sq);
        best
    }

    /// Closest surface points for a batch of queries.
    ///
    /// Parallelized with rayon; the result has the same length and order
    /// as the input. This is the call the registration objective makes
    /// once per evaluation.
    #[must_use]
    pub fn nearest_points(&self, queries: &[Point3<f64>]) -> Vec<Point3<f64>> {
        queries
            .par_iter()
            .map(|q| self.nearest_point(q))
            .collect()
    }

    fn descend(
        &self,
        node: &Node,
        query: &Point3<f64>,
        best: &mut Point3<f64>,
        best_dist_sq: &mut f64,
    ) {
        match node {
            Node::Leaf { triangles, .. } => {
                for &i in triangles {
                    let tri = &self.triangles[i as usize];
                    let p = closest_point_on_triangle(*query, tri.v0, tri.v1, tri.v2);
                    let dist_sq = (p - query).norm_squared();
                    if dist_sq < *best_dist_sq {
                        *best_dist_sq = dist_sq;
                        *best = p;
                    }
                }
            }
            Node::Branch { left, right, .. } => {
                let left_bound = left.bounds().distance_squared_to(query);
                let right_bound = right.bounds().distance_squared_to(query);

                // Visit the nearer child first so the far child is more
                // likely to be pruned entirely.
                let (near, near_bound, far, far_bound) = if left_bound <= right_bound {
                    (left, left_bound, right, right_bound)
                } else {
                    (right, right_bound, left, left_bound)
                };

                if near_bound < *best_dist_sq {
                    self.descend(near, query, best, best_dist_sq);
                }
                if far_bound < *best_dist_sq {
                    self.descend(far, query, best, best_dist_sq);
                }
            }
        }
    }
}

fn build_recursive(boxes: &[Aabb], centers: &[Point3<f64>], mut indices: Vec<u32>) -> Node {
    let mut bounds = Aabb::empty();
    for &i in &indices {
        bounds = bounds.union(&boxes[i as usize]);
    }

    if indices.len() <= MAX_LEAF_SIZE {
        return Node::Leaf {
            bounds,
            triangles: indices.into_iter().collect(),
        };
    }

    // Median split along the axis where triangle centroids spread widest
    let centroid_bounds = Aabb::from_points(indices.iter().map(|&i| &centers[i as usize]));
    let axis = centroid_bounds.longest_axis();
    indices.sort_by(|&a, &b| {
        centers[a as usize][axis]
            .partial_cmp(&centers[b as usize][axis])
            .unwrap_or(Ordering::Equal)
    });

    let right_indices = indices.split_off(indices.len() / 2);
    let left = build_recursive(boxes, centers, indices);
    let right = build_recursive(boxes, centers, right_indices);

    Node::Branch {
        bounds,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mesh_types::{unit_cube, uv_sphere};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Reference implementation: scan every triangle.
    fn brute_force_nearest(mesh: &TriangleMesh, query: &Point3<f64>) -> f64 {
        mesh.triangles()
            .map(|t| {
                let p = closest_point_on_triangle(*query, t.v0, t.v1, t.v2);
                (p - query).norm_squared()
            })
            .fold(f64::INFINITY, f64::min)
    }

    #[test]
    fn build_empty_mesh_fails() {
        let mesh = TriangleMesh::new();
        assert!(matches!(
            SurfaceIndex::build(&mesh),
            Err(SurfaceError::EmptyMesh)
        ));
    }

    #[test]
    fn build_single_triangle() {
        let mesh = TriangleMesh::from_raw(
            &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            &[0, 1, 2],
        );
        let index = SurfaceIndex::build(&mesh).unwrap();
        assert_eq!(index.triangle_count(), 1);

        let p = index.nearest_point(&Point3::new(0.25, 0.25, 3.0));
        assert!(p.z.abs() < 1e-12);
    }

    #[test]
    fn cube_face_queries() {
        let cube = unit_cube();
        let index = SurfaceIndex::build(&cube).unwrap();

        // Outside the +X face
        let p = index.nearest_point(&Point3::new(5.0, 0.5, 0.5));
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
        assert!((p.z - 0.5).abs() < 1e-12);

        // Inside the cube, closest to the bottom face
        let p = index.nearest_point(&Point3::new(0.5, 0.5, 0.05));
        assert!(p.z.abs() < 1e-12);

        // A point already on the surface maps to itself
        let on_surface = Point3::new(0.3, 0.0, 0.7);
        let p = index.nearest_point(&on_surface);
        assert!((p - on_surface).norm() < 1e-12);
    }

    #[test]
    fn matches_brute_force_on_sphere() {
        let sphere = uv_sphere(1.0, 12, 24);
        let index = SurfaceIndex::build(&sphere).unwrap();

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let q = Point3::new(
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
                rng.gen_range(-2.0..2.0),
            );
            let p = index.nearest_point(&q);
            let dist_sq = (p - q).norm_squared();
            let expected = brute_force_nearest(&sphere, &q);
            assert!(
                (dist_sq - expected).abs() < 1e-12,
                "index distance {dist_sq} != brute force {expected} at {q:?}"
            );
        }
    }

    #[test]
    fn sphere_queries_land_on_surface() {
        let sphere = uv_sphere(2.0, 16, 32);
        let index = SurfaceIndex::build(&sphere).unwrap();

        // Far outside: closest point radius equals the sphere radius
        // (within tessellation chord error)
        let p = index.nearest_point(&Point3::new(10.0, 0.0, 0.0));
        assert!((p.coords.norm() - 2.0).abs() < 0.05);
    }

    #[test]
    fn batched_matches_sequential() {
        let sphere = uv_sphere(1.0, 8, 16);
        let index = SurfaceIndex::build(&sphere).unwrap();

        let mut rng = StdRng::seed_from_u64(99);
        let queries: Vec<Point3<f64>> = (0..64)
            .map(|_| {
                Point3::new(
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                    rng.gen_range(-1.5..1.5),
                )
            })
            .collect();

        let batched = index.nearest_points(&queries);
        assert_eq!(batched.len(), queries.len());
        for (q, b) in queries.iter().zip(&batched) {
            let single = index.nearest_point(q);
            assert!((single - b).norm() < 1e-15);
        }
    }

    #[test]
    fn index_bounds_cover_mesh() {
        let cube = unit_cube();
        let index = SurfaceIndex::build(&cube).unwrap();
        let b = index.bounds();
        assert!(b.contains(&Point3::new(0.0, 0.0, 0.0)));
        assert!(b.contains(&Point3::new(1.0, 1.0, 1.0)));
    }
}
