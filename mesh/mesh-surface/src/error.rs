//! Error types for surface queries.

use thiserror::Error;

/// Errors that can occur while building or querying a surface index.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The mesh has no faces, so there is no surface to query.
    #[error("mesh has no faces to index")]
    EmptyMesh,
}

/// Result type for surface operations.
pub type SurfaceResult<T> = Result<T, SurfaceError>;
