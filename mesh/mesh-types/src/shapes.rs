//! Procedural test meshes.
//!
//! Registration tests and benches need watertight meshes with known
//! geometry; these constructors avoid any dependency on file loading.

use crate::TriangleMesh;
use nalgebra::Point3;
use std::f64::consts::PI;

/// Create a unit cube mesh.
///
/// The cube spans (0,0,0) to (1,1,1) with outward-facing normals.
///
/// # Example
///
/// ```
/// use mesh_types::unit_cube;
///
/// let cube = unit_cube();
/// assert_eq!(cube.vertex_count(), 8);
/// assert_eq!(cube.face_count(), 12);
/// assert!((cube.surface_area() - 6.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn unit_cube() -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(8, 12);

    // 8 vertices of the cube
    mesh.vertices.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.vertices.push(Point3::new(1.0, 0.0, 0.0)); // 1
    mesh.vertices.push(Point3::new(1.0, 1.0, 0.0)); // 2
    mesh.vertices.push(Point3::new(0.0, 1.0, 0.0)); // 3
    mesh.vertices.push(Point3::new(0.0, 0.0, 1.0)); // 4
    mesh.vertices.push(Point3::new(1.0, 0.0, 1.0)); // 5
    mesh.vertices.push(Point3::new(1.0, 1.0, 1.0)); // 6
    mesh.vertices.push(Point3::new(0.0, 1.0, 1.0)); // 7

    // 12 triangles (2 per face), CCW winding when viewed from outside

    // Bottom face (z=0) - normal points -Z
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);

    // Top face (z=1) - normal points +Z
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);

    // Front face (y=0) - normal points -Y
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);

    // Back face (y=1) - normal points +Y
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);

    // Left face (x=0) - normal points -X
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);

    // Right face (x=1) - normal points +X
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}

/// Create a UV sphere mesh centered at the origin.
///
/// `rings` counts latitude bands from pole to pole (minimum 2) and
/// `segments` counts longitude steps (minimum 3). Vertex count is
/// `(rings - 1) * segments + 2`.
///
/// # Example
///
/// ```
/// use mesh_types::uv_sphere;
/// use std::f64::consts::PI;
///
/// let sphere = uv_sphere(2.0, 24, 48);
/// let expected = 4.0 * PI * 4.0;
/// // Tessellated area approaches the analytic sphere area
/// assert!((sphere.surface_area() - expected).abs() / expected < 0.02);
/// ```
#[must_use]
#[allow(clippy::cast_possible_truncation)]
// Truncation: vertex counts for any reasonable tessellation fit in u32
pub fn uv_sphere(radius: f64, rings: usize, segments: usize) -> TriangleMesh {
    let rings = rings.max(2);
    let segments = segments.max(3);

    let mut mesh = TriangleMesh::with_capacity(
        (rings - 1) * segments + 2,
        2 * segments * (rings - 1),
    );

    // North pole, latitude rings, south pole
    mesh.vertices.push(Point3::new(0.0, 0.0, radius));
    for i in 1..rings {
        #[allow(clippy::cast_precision_loss)]
        let phi = PI * i as f64 / rings as f64;
        let z = radius * phi.cos();
        let ring_radius = radius * phi.sin();
        for j in 0..segments {
            #[allow(clippy::cast_precision_loss)]
            let theta = 2.0 * PI * j as f64 / segments as f64;
            mesh.vertices.push(Point3::new(
                ring_radius * theta.cos(),
                ring_radius * theta.sin(),
                z,
            ));
        }
    }
    mesh.vertices.push(Point3::new(0.0, 0.0, -radius));

    let ring_start = |i: usize| 1 + (i - 1) * segments;
    let south = (ring_start(rings - 1) + segments) as u32;

    // North cap
    for j in 0..segments {
        let a = (ring_start(1) + j) as u32;
        let b = (ring_start(1) + (j + 1) % segments) as u32;
        mesh.faces.push([0, a, b]);
    }

    // Latitude bands
    for i in 1..rings - 1 {
        for j in 0..segments {
            let a = (ring_start(i) + j) as u32;
            let b = (ring_start(i) + (j + 1) % segments) as u32;
            let c = (ring_start(i + 1) + j) as u32;
            let d = (ring_start(i + 1) + (j + 1) % segments) as u32;
            mesh.faces.push([a, c, d]);
            mesh.faces.push([a, d, b]);
        }
    }

    // South cap
    for j in 0..segments {
        let a = (ring_start(rings - 1) + j) as u32;
        let b = (ring_start(rings - 1) + (j + 1) % segments) as u32;
        mesh.faces.push([south, b, a]);
    }

    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_cube_counts() {
        let cube = unit_cube();
        assert_eq!(cube.vertex_count(), 8);
        assert_eq!(cube.face_count(), 12);
    }

    #[test]
    fn unit_cube_surface_area() {
        let cube = unit_cube();
        assert!((cube.surface_area() - 6.0).abs() < 1e-10);
    }

    #[test]
    fn unit_cube_bounds() {
        let cube = unit_cube();
        let b = cube.bounds();
        assert!((b.diagonal() - 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn sphere_counts() {
        let sphere = uv_sphere(1.0, 8, 16);
        assert_eq!(sphere.vertex_count(), 7 * 16 + 2);
        assert_eq!(sphere.face_count(), 2 * 16 * 7);
    }

    #[test]
    fn sphere_area_approaches_analytic() {
        let sphere = uv_sphere(1.5, 32, 64);
        let expected = 4.0 * PI * 1.5 * 1.5;
        let area = sphere.surface_area();
        assert!(
            (area - expected).abs() / expected < 0.01,
            "tessellated area {area} too far from {expected}"
        );
        // Tessellation inscribes the sphere, so it underestimates
        assert!(area < expected);
    }

    #[test]
    fn sphere_vertices_on_surface() {
        let sphere = uv_sphere(2.0, 12, 24);
        for v in &sphere.vertices {
            assert!((v.coords.norm() - 2.0).abs() < 1e-12);
        }
    }

    #[test]
    fn sphere_centroid_at_origin() {
        let sphere = uv_sphere(1.0, 16, 32);
        let c = sphere.centroid();
        assert!(c.coords.norm() < 1e-12);
    }

    #[test]
    fn sphere_degenerate_params_clamped() {
        let sphere = uv_sphere(1.0, 0, 0);
        assert!(!sphere.is_empty());
        assert!(sphere.surface_area() > 0.0);
    }
}
