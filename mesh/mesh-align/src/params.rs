//! Registration parameters.

use crate::error::{AlignError, AlignResult};

/// Robust-kernel width for one minimization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KernelWidth {
    /// Flat weighting: the pass minimizes the plain sum of squared
    /// distances. Every sample point counts equally, which is globally
    /// informative but sensitive to outlier regions. This is the
    /// `width -> infinity` limit of the Gaussian kernel.
    Unbounded,

    /// Gaussian kernel whose width is this percentage of the stationary
    /// mesh's bounding-box diagonal. Sample points whose distance is
    /// small relative to the width contribute strongly; points far beyond
    /// it contribute almost nothing.
    Percent(f64),
}

/// Parameters for [`align`](crate::align).
///
/// # Example
///
/// ```
/// use mesh_align::{AlignParams, KernelWidth};
///
/// let params = AlignParams::default()
///     .with_sample_count(5000)
///     .with_schedule(vec![KernelWidth::Unbounded, KernelWidth::Percent(4.0)]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AlignParams {
    /// Target number of surface samples on the moving mesh
    /// (default: 2000). The actual count is approximate.
    pub sample_count: usize,

    /// Kernel schedule: one minimization pass per entry, each seeded with
    /// the previous pass's result.
    ///
    /// The default `[Unbounded, 8%, 2%, 0.5%]` encodes: coarse global fit
    /// first, then progressively tighten focus to the well-aligned core
    /// of the shape. The widths were tuned empirically; they are not
    /// optimal for every geometry.
    pub schedule: Vec<KernelWidth>,

    /// Convergence tolerance for each pass, relative to the stationary
    /// mesh's bounding-box diagonal (default: 1e-5). The same relative
    /// precision applies regardless of object scale.
    pub tol_rel: f64,
}

impl Default for AlignParams {
    fn default() -> Self {
        Self {
            sample_count: 2000,
            schedule: vec![
                KernelWidth::Unbounded,
                KernelWidth::Percent(8.0),
                KernelWidth::Percent(2.0),
                KernelWidth::Percent(0.5),
            ],
            tol_rel: 1e-5,
        }
    }
}

impl AlignParams {
    /// Creates parameters with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the target sample count.
    #[must_use]
    pub const fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    /// Sets the kernel schedule.
    #[must_use]
    pub fn with_schedule(mut self, schedule: Vec<KernelWidth>) -> Self {
        self.schedule = schedule;
        self
    }

    /// Sets the relative convergence tolerance.
    #[must_use]
    pub const fn with_tol_rel(mut self, tol_rel: f64) -> Self {
        self.tol_rel = tol_rel;
        self
    }

    /// Rejects parameter combinations the algorithm cannot run with.
    pub(crate) fn validate(&self) -> AlignResult<()> {
        if self.sample_count == 0 {
            return Err(AlignError::ZeroSampleCount);
        }
        if self.schedule.is_empty() {
            return Err(AlignError::EmptySchedule);
        }
        for width in &self.schedule {
            if let KernelWidth::Percent(pct) = *width {
                if pct <= 0.0 || !pct.is_finite() {
                    return Err(AlignError::KernelWidthNotPositive { pct });
                }
            }
        }
        if self.tol_rel <= 0.0 || !self.tol_rel.is_finite() {
            return Err(AlignError::ToleranceNotPositive {
                tol_rel: self.tol_rel,
            });
        }
        Ok(())
    }
}
