//! Limited-memory BFGS minimization for small black-box objectives.
//!
//! Registration objectives are expensive (every evaluation is a batched
//! surface query over thousands of points) and derivative-free, so the
//! solver here is chosen for a low evaluation count: a quasi-Newton
//! method with gradients approximated by forward finite differences.
//!
//! # Algorithm
//!
//! - Two-loop L-BFGS recursion over a bounded history of `(s, y)` pairs
//! - Initial Hessian scaling `s·y / y·y` after each accepted step
//! - Armijo backtracking line search
//! - Stops on relative objective decrease or gradient infinity-norm
//!   falling below the caller's tolerance
//!
//! Exhausting the iteration budget is **not** an error: the last iterate
//! is returned with [`Minimum::converged`] set to `false`, and the caller
//! can inspect [`Minimum::evaluations`] as a diagnostic.
//!
//! # Example
//!
//! ```
//! use solver_lbfgs::Lbfgs;
//! use nalgebra::DVector;
//!
//! // Minimize a shifted quadratic bowl
//! let objective = |x: &DVector<f64>| {
//!     (x[0] - 3.0).powi(2) + (x[1] + 1.0).powi(2)
//! };
//!
//! let start = DVector::from_vec(vec![0.0, 0.0]);
//! let result = Lbfgs::default().minimize(objective, &start, 1e-10);
//!
//! assert!(result.converged);
//! assert!((result.point[0] - 3.0).abs() < 1e-4);
//! assert!((result.point[1] + 1.0).abs() < 1e-4);
//! ```

// Safety: Deny unwrap/expect in library code. Tests may use them.
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use nalgebra::DVector;
use std::collections::VecDeque;
use tracing::trace;

/// Configuration for the L-BFGS minimizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lbfgs {
    /// Number of `(s, y)` correction pairs kept for the Hessian
    /// approximation.
    pub memory: usize,

    /// Maximum number of outer iterations.
    pub max_iterations: usize,

    /// Armijo sufficient-decrease constant for the line search.
    pub armijo_c1: f64,

    /// Step-length shrink factor per backtrack (0-1).
    pub backtrack_factor: f64,

    /// Maximum backtracking steps before the line search gives up.
    pub max_backtracks: usize,
}

impl Default for Lbfgs {
    fn default() -> Self {
        Self {
            memory: 8,
            max_iterations: 100,
            armijo_c1: 1e-4,
            backtrack_factor: 0.5,
            max_backtracks: 30,
        }
    }
}

impl Lbfgs {
    /// Creates a minimizer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the correction-pair history length.
    #[must_use]
    pub const fn with_memory(mut self, memory: usize) -> Self {
        self.memory = memory;
        self
    }

    /// Sets the maximum number of iterations.
    #[must_use]
    pub const fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Minimize `objective` starting from `start`.
    ///
    /// `tolerance` is an absolute threshold applied both to the
    /// per-iteration objective decrease (scaled by `max(1, |f|)`) and to
    /// the gradient infinity-norm. Callers with a physical length scale
    /// should pass a tolerance proportional to it.
    pub fn minimize<F>(&self, objective: F, start: &DVector<f64>, tolerance: f64) -> Minimum
    where
        F: FnMut(&DVector<f64>) -> f64,
    {
        let mut eval = Evaluator {
            objective,
            count: 0,
        };

        let mut x = start.clone();
        let mut fx = eval.call(&x);
        let mut history: VecDeque<Correction> = VecDeque::with_capacity(self.memory);
        let mut gamma = 1.0;
        let mut converged = false;
        let mut iterations = 0;

        for iter in 0..self.max_iterations {
            iterations = iter + 1;

            let grad = forward_gradient(&mut eval, &x, fx);
            let grad_norm = grad.amax();
            if grad_norm <= tolerance {
                converged = true;
                break;
            }

            // Search direction from the two-loop recursion; fall back to
            // steepest descent if the approximation has lost descent.
            let mut direction = two_loop_direction(&grad, &history, gamma);
            let mut slope = direction.dot(&grad);
            if slope >= 0.0 {
                direction = -&grad;
                slope = -grad.norm_squared();
            }

            // First step has no curvature information; keep it short
            // relative to the gradient magnitude.
            let initial_step = if history.is_empty() {
                (1.0 / grad_norm).min(1.0)
            } else {
                1.0
            };

            let Some((step, x_next, fx_next)) =
                self.line_search(&mut eval, &x, fx, &direction, slope, initial_step)
            else {
                // No acceptable step: the iterate is as good as the
                // line search can make it.
                break;
            };

            trace!(iter, step, fx_next, "accepted step");

            let s = &x_next - &x;
            let y = forward_gradient(&mut eval, &x_next, fx_next) - &grad;
            let sy = s.dot(&y);
            if sy > f64::EPSILON * s.norm() * y.norm() {
                gamma = sy / y.norm_squared();
                if history.len() == self.memory {
                    history.pop_front();
                }
                history.push_back(Correction { s, y, rho: 1.0 / sy });
            }

            let decrease = fx - fx_next;
            x = x_next;
            fx = fx_next;

            if decrease <= tolerance * fx.abs().max(1.0) {
                converged = true;
                break;
            }
        }

        Minimum {
            point: x,
            value: fx,
            evaluations: eval.count,
            iterations,
            converged,
        }
    }

    /// Armijo backtracking from `initial_step`.
    ///
    /// Returns `(step, x + step * direction, f(x + step * direction))`,
    /// or `None` if no step satisfied the sufficient-decrease condition.
    fn line_search<F>(
        &self,
        eval: &mut Evaluator<F>,
        x: &DVector<f64>,
        fx: f64,
        direction: &DVector<f64>,
        slope: f64,
        initial_step: f64,
    ) -> Option<(f64, DVector<f64>, f64)>
    where
        F: FnMut(&DVector<f64>) -> f64,
    {
        let mut step = initial_step;
        for _ in 0..self.max_backtracks {
            let candidate = x + direction * step;
            let f_candidate = eval.call(&candidate);
            if f_candidate <= self.armijo_c1.mul_add(step * slope, fx) {
                return Some((step, candidate, f_candidate));
            }
            step *= self.backtrack_factor;
        }
        None
    }
}

/// Result of a minimization run.
#[derive(Debug, Clone)]
pub struct Minimum {
    /// The best point found.
    pub point: DVector<f64>,
    /// Objective value at [`Minimum::point`].
    pub value: f64,
    /// Total objective evaluations, including line search and finite
    /// differences.
    pub evaluations: usize,
    /// Outer iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met before the iteration
    /// budget ran out.
    pub converged: bool,
}

/// One L-BFGS correction pair.
#[derive(Debug)]
struct Correction {
    s: DVector<f64>,
    y: DVector<f64>,
    rho: f64,
}

/// Wraps the objective to count evaluations.
struct Evaluator<F> {
    objective: F,
    count: usize,
}

impl<F> Evaluator<F>
where
    F: FnMut(&DVector<f64>) -> f64,
{
    fn call(&mut self, x: &DVector<f64>) -> f64 {
        self.count += 1;
        (self.objective)(x)
    }
}

/// Forward finite-difference gradient.
///
/// Uses a per-component step relative to the coordinate magnitude, with
/// `sqrt(machine epsilon)` as the base step.
fn forward_gradient<F>(eval: &mut Evaluator<F>, x: &DVector<f64>, fx: f64) -> DVector<f64>
where
    F: FnMut(&DVector<f64>) -> f64,
{
    let base = f64::EPSILON.sqrt();
    let mut grad = DVector::zeros(x.len());
    let mut probe = x.clone();
    for i in 0..x.len() {
        let h = base * (1.0 + x[i].abs());
        probe[i] = x[i] + h;
        grad[i] = (eval.call(&probe) - fx) / h;
        probe[i] = x[i];
    }
    grad
}

/// Two-loop recursion: approximates `-H * grad` from the correction
/// history, scaling the initial Hessian by `gamma`.
fn two_loop_direction(
    grad: &DVector<f64>,
    history: &VecDeque<Correction>,
    gamma: f64,
) -> DVector<f64> {
    let mut q = grad.clone();
    let mut alphas = Vec::with_capacity(history.len());

    for c in history.iter().rev() {
        let alpha = c.rho * c.s.dot(&q);
        q -= &c.y * alpha;
        alphas.push(alpha);
    }

    q *= gamma;

    for (c, &alpha) in history.iter().zip(alphas.iter().rev()) {
        let beta = c.rho * c.y.dot(&q);
        q += &c.s * (alpha - beta);
    }

    -q
}
