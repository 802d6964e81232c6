//! Translation-only mesh registration for partdiff.
//!
//! Given a "stationary" mesh and a "moving" mesh that approximately
//! overlap - typically two revisions of the same manufactured part - this
//! crate computes the translation that best aligns the moving mesh's
//! surface to the stationary mesh's surface. Rotation is deliberately not
//! estimated: part revisions exported from the same CAD setup share an
//! orientation, and a pure translation keeps the optimization cheap and
//! predictable.
//!
//! # How it works
//!
//! 1. **Sampling** - the moving mesh's surface is sampled approximately
//!    area-uniformly ([`sample_surface`]). Using mesh vertices instead
//!    would wildly over-weight regions of high detail.
//! 2. **Graduated optimization** - a sequence of minimization passes over
//!    the translation, each scoring the sampled points against the
//!    stationary surface. The first pass is plain least squares; later
//!    passes weight each point by a Gaussian kernel whose width shrinks
//!    per the [`KernelWidth`] schedule, so poorly matching regions
//!    (design changes, partial overlap) progressively lose influence.
//!
//! # Quick Start
//!
//! ```
//! use mesh_align::{align, AlignParams};
//! use mesh_types::{unit_cube, Vector3};
//!
//! let stationary = unit_cube();
//! let moving = stationary.translated(Vector3::new(0.3, -0.1, 0.2));
//!
//! let params = AlignParams::default().with_sample_count(400);
//! let result = align(&stationary, &moving, &params).unwrap();
//!
//! // Applying the translation overlays the meshes again
//! let error = result.translation + Vector3::new(0.3, -0.1, 0.2);
//! assert!(error.norm() < 1e-3);
//! ```
//!
//! # Limitations
//!
//! If the meshes do not overlap at all, the optimizer still converges to
//! *some* local optimum; no error is reported. Callers needing a
//! guarantee should check the residual distance of the aligned meshes
//! against the part size. The default kernel schedule is an empirical
//! choice and can misbehave on very elongated parts - pass a custom
//! schedule through [`AlignParams`] in that case.

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod align;
mod error;
mod objective;
mod params;
mod sample;

pub use align::{
    align, align_with, AlignObserver, Alignment, SolverRun, TranslationSolver,
};
pub use error::{AlignError, AlignResult};
pub use objective::squared_distances;
pub use params::{AlignParams, KernelWidth};
pub use sample::{sample_surface, SampleSet};
