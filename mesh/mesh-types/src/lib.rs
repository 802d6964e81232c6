//! Core mesh types for partdiff.
//!
//! This crate provides the foundational geometry for comparing two
//! revisions of a part:
//!
//! - [`TriangleMesh`] - A triangulated surface with indexed faces
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//! Downstream crates (mesh-surface, mesh-align) inherit whatever unit the
//! input meshes carry; tolerances there are expressed relative to the
//! bounding-box diagonal, so the choice of unit does not matter.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system**. Face winding is
//! counter-clockwise (CCW) when viewed from outside; normals follow the
//! right-hand rule. Registration itself never depends on winding - only
//! areas and distances - so meshes with inconsistent winding still align.
//!
//! # Example
//!
//! ```
//! use mesh_types::{TriangleMesh, Point3};
//!
//! let mut mesh = TriangleMesh::new();
//! mesh.vertices.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.vertices.push(Point3::new(0.0, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.face_count(), 1);
//! assert!((mesh.surface_area() - 0.5).abs() < 1e-12);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod bounds;
mod mesh;
mod shapes;
mod triangle;

pub use bounds::Aabb;
pub use mesh::TriangleMesh;
pub use shapes::{unit_cube, uv_sphere};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
