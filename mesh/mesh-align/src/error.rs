//! Error types for mesh registration.

use mesh_surface::SurfaceError;
use thiserror::Error;

/// Errors that can occur during mesh registration.
///
/// All of these are precondition violations: once inputs pass validation,
/// alignment always produces a result. A pass that exhausts its iteration
/// budget is not an error - the last iterate is carried forward and the
/// evaluation count is reported as a diagnostic.
#[derive(Debug, Error)]
pub enum AlignError {
    /// Stationary mesh has no faces.
    #[error("stationary mesh has no faces")]
    EmptyStationary,

    /// Moving mesh has no faces.
    #[error("moving mesh has no faces")]
    EmptyMoving,

    /// Mesh surface area is too small to sample.
    #[error("mesh surface area {area} is too small to sample")]
    DegenerateSurface {
        /// The offending total surface area.
        area: f64,
    },

    /// Requested sample count was zero.
    #[error("sample count must be positive")]
    ZeroSampleCount,

    /// The kernel schedule has no passes.
    #[error("kernel schedule is empty")]
    EmptySchedule,

    /// A kernel width percentage was zero, negative, or not finite.
    #[error("kernel width must be a positive percentage, got {pct}")]
    KernelWidthNotPositive {
        /// The offending percentage.
        pct: f64,
    },

    /// The relative tolerance was zero, negative, or not finite.
    #[error("relative tolerance must be positive, got {tol_rel}")]
    ToleranceNotPositive {
        /// The offending tolerance.
        tol_rel: f64,
    },

    /// A surface-index failure from the oracle.
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// Result type for registration operations.
pub type AlignResult<T> = Result<T, AlignError>;
