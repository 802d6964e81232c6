//! Indexed triangle mesh.

use crate::{Aabb, Triangle};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// This is the primary mesh type for partdiff. Vertex positions and faces
/// are stored separately, with faces referencing vertices by index.
///
/// Registration treats meshes as immutable inputs; the only mutation the
/// pipeline ever asks for is applying the resulting translation via
/// [`TriangleMesh::translate`] or [`TriangleMesh::translated`].
///
/// # Memory Layout
///
/// - `vertices`: `Vec<Point3<f64>>` - Vertex positions
/// - `faces`: `Vec<[u32; 3]>` - Triangle faces as vertex indices
///
/// # Example
///
/// ```
/// use mesh_types::{TriangleMesh, Point3};
///
/// let mut mesh = TriangleMesh::new();
/// mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
/// mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
/// mesh.faces.push([0, 1, 2]);
///
/// assert_eq!(mesh.vertex_count(), 3);
/// assert_eq!(mesh.face_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from raw coordinate and index data.
    ///
    /// # Arguments
    ///
    /// * `positions` - Flat array of vertex positions `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - Flat array of face indices `[v0a, v1a, v2a, v0b, v1b, v2b, ...]`
    ///
    /// Returns an empty mesh if either array's length is not divisible by 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let vertices = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        let faces = indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect();

        Self { vertices, faces }
    }

    /// Get the number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces (triangles).
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh has no renderable surface.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Get a triangle by face index with resolved vertex positions.
    ///
    /// Returns `None` if the face index is out of bounds.
    #[must_use]
    pub fn triangle(&self, face_index: usize) -> Option<Triangle> {
        self.faces.get(face_index).map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize],
            v1: self.vertices[i1 as usize],
            v2: self.vertices[i2 as usize],
        })
    }

    /// Iterate over all triangles with resolved vertex positions.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(|&[i0, i1, i2]| Triangle {
            v0: self.vertices[i0 as usize],
            v1: self.vertices[i1 as usize],
            v2: self.vertices[i2 as usize],
        })
    }

    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if the mesh has no vertices.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.triangles().map(|tri| tri.area()).sum()
    }

    /// Compute the mean of the vertex positions.
    ///
    /// This is the coarse alignment seed used by registration: translating
    /// one mesh so the centroids coincide is a cheap, shape-agnostic first
    /// guess. Returns the origin for a mesh with no vertices.
    ///
    /// Note this is the vertex centroid, not the area centroid; dense
    /// regions of a mesh pull it toward themselves.
    #[must_use]
    pub fn centroid(&self) -> Point3<f64> {
        if self.vertices.is_empty() {
            return Point3::origin();
        }

        let mut sum = Vector3::zeros();
        for v in &self.vertices {
            sum += v.coords;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.vertices.len() as f64;
        Point3::from(sum / count)
    }

    /// Translate the mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for v in &mut self.vertices {
            *v += offset;
        }
    }

    /// Return a translated copy of the mesh.
    ///
    /// This is how a caller applies the delta produced by registration.
    #[must_use]
    pub fn translated(&self, offset: Vector3<f64>) -> Self {
        let mut mesh = self.clone();
        mesh.translate(offset);
        mesh
    }

    /// Scale the mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for v in &mut self.vertices {
            v.coords *= factor;
        }
    }
}
