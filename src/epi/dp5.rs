// SPDX-License-Identifier: AGPL-3.0-or-later
//! Dormand–Prince 5(4) adaptive ODE integrator with dense grid output.
//!
//! Embedded Runge–Kutta pair with FSAL (first-same-as-last), the classic
//! workhorse for non-stiff to mildly stiff low-dimensional systems. The
//! solver chooses its own internal step size from the embedded 4th-order
//! error estimate; the caller's output grid only determines where the
//! solution is sampled. Grid points interior to an accepted step are
//! filled by cubic Hermite interpolation from the step endpoints and
//! their derivatives.
//!
//! Matches `scripts/dp5_baseline.py` step for step: same tableau, same
//! Hairer/Wanner initial-step heuristic, same RMS error norm, so Rust
//! and Python baselines differ only in RHS rounding order.
//!
//! # Example
//!
//! ```
//! use wetspring_equateur::epi::dp5::{dp5_integrate, SolverOptions};
//!
//! // Exponential decay: dy/dt = -0.5 y
//! let grid = [0.0, 5.0, 10.0];
//! let r = dp5_integrate(
//!     |y, _t| vec![-0.5 * y[0]],
//!     &[1.0],
//!     &grid,
//!     &SolverOptions::default(),
//! )
//! .unwrap();
//! assert!((r.y[2][0] - (-5.0_f64).exp()).abs() < 1e-6);
//! ```

use crate::error::{Error, Result};

// ── Dormand–Prince 5(4) tableau ───────────────────────────────

const STAGES: usize = 7;

/// Node coefficients c.
const C: [f64; STAGES] = [0.0, 1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

/// Runge–Kutta matrix a (row s feeds stage s). Row 6 equals the 5th-order
/// weights b, so stage 7 evaluates the accepted solution (FSAL).
const A: [[f64; 6]; STAGES] = [
    [0.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [1.0 / 5.0, 0.0, 0.0, 0.0, 0.0, 0.0],
    [3.0 / 40.0, 9.0 / 40.0, 0.0, 0.0, 0.0, 0.0],
    [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0, 0.0, 0.0, 0.0],
    [
        19372.0 / 6561.0,
        -25360.0 / 2187.0,
        64448.0 / 6561.0,
        -212.0 / 729.0,
        0.0,
        0.0,
    ],
    [
        9017.0 / 3168.0,
        -355.0 / 33.0,
        46732.0 / 5247.0,
        49.0 / 176.0,
        -5103.0 / 18656.0,
        0.0,
    ],
    [
        35.0 / 384.0,
        0.0,
        500.0 / 1113.0,
        125.0 / 192.0,
        -2187.0 / 6784.0,
        11.0 / 84.0,
    ],
];

/// Error coefficients b − b̂ (5th-order minus embedded 4th-order weights).
const E: [f64; STAGES] = [
    71.0 / 57600.0,
    0.0,
    -71.0 / 16695.0,
    71.0 / 1920.0,
    -17253.0 / 339_200.0,
    22.0 / 525.0,
    -1.0 / 40.0,
];

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

/// Step-control exponent: −1/(order+1) for the embedded 4th-order estimate.
const ERR_EXPONENT: f64 = -0.2;

/// Error tolerances and step ceiling for one integration.
///
/// Defaults are fixed and documented (rtol 1e-6, atol 1e-9, unbounded
/// max step). Results near threshold parameter regimes (R0 ≈ 1) are
/// tolerance-sensitive, so retry policy — rerunning with tighter
/// tolerances or a smaller `max_step` — belongs to the caller, never to
/// the solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverOptions {
    /// Relative error tolerance (per step, RMS norm).
    pub rtol: f64,
    /// Absolute error tolerance (per step, RMS norm).
    pub atol: f64,
    /// Upper bound on the internal step size.
    pub max_step: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: 1e-6,
            atol: 1e-9,
            max_step: f64::INFINITY,
        }
    }
}

impl SolverOptions {
    fn validate(&self) -> Result<()> {
        if !(self.rtol.is_finite() && self.rtol > 0.0) {
            return Err(Error::InvalidInput(format!("rtol = {} must be > 0", self.rtol)));
        }
        if !(self.atol.is_finite() && self.atol >= 0.0) {
            return Err(Error::InvalidInput(format!("atol = {} must be >= 0", self.atol)));
        }
        if self.max_step.is_nan() || self.max_step <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "max_step = {} must be > 0",
                self.max_step
            )));
        }
        Ok(())
    }
}

/// Raw integrator output: one state row per grid point plus work counters.
#[derive(Debug, Clone)]
pub struct Integration {
    /// State vectors, `y[i]` at `grid[i]`. `y[0]` is the initial state,
    /// bitwise unchanged.
    pub y: Vec<Vec<f64>>,
    /// Accepted internal steps.
    pub steps: usize,
    /// Right-hand-side evaluations.
    pub nfev: usize,
}

/// Scaled RMS norm of the embedded error estimate.
fn error_norm(err: &[f64], y_old: &[f64], y_new: &[f64], rtol: f64, atol: f64) -> f64 {
    let n = err.len();
    let mut sum = 0.0;
    for i in 0..n {
        let scale = atol + rtol * y_old[i].abs().max(y_new[i].abs());
        let r = err[i] / scale;
        sum += r * r;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / n as f64;
    mean.sqrt()
}

fn scaled_rms(v: &[f64], scale: &[f64]) -> f64 {
    let mut sum = 0.0;
    for (x, s) in v.iter().zip(scale) {
        let r = x / s;
        sum += r * r;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = sum / v.len() as f64;
    mean.sqrt()
}

/// Automatic initial step size (Hairer & Wanner, Solving ODEs I, §II.4).
fn initial_step<F>(f: &F, t0: f64, y0: &[f64], f0: &[f64], opts: &SolverOptions) -> f64
where
    F: Fn(&[f64], f64) -> Vec<f64>,
{
    let scale: Vec<f64> = y0
        .iter()
        .map(|&yi| opts.atol + opts.rtol * yi.abs())
        .collect();
    let d0 = scaled_rms(y0, &scale);
    let d1 = scaled_rms(f0, &scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    };

    let y1: Vec<f64> = y0.iter().zip(f0).map(|(&yi, &fi)| yi + h0 * fi).collect();
    let f1 = f(&y1, t0 + h0);
    let df: Vec<f64> = f1.iter().zip(f0).map(|(&a, &b)| a - b).collect();
    let d2 = scaled_rms(&df, &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(0.2)
    };
    (100.0 * h0).min(h1).min(opts.max_step)
}

/// Cubic Hermite interpolation on `[t0, t1]` from endpoint values and
/// derivatives.
fn hermite(t: f64, t0: f64, y0: &[f64], f0: &[f64], t1: f64, y1: &[f64], f1: &[f64]) -> Vec<f64> {
    let h = t1 - t0;
    let theta = (t - t0) / h;
    let t2 = theta * theta;
    let t3 = t2 * theta;
    let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
    let h10 = t3 - 2.0 * t2 + theta;
    let h01 = -2.0 * t3 + 3.0 * t2;
    let h11 = t3 - t2;
    (0..y0.len())
        .map(|i| h00 * y0[i] + h10 * h * f0[i] + h01 * y1[i] + h11 * h * f1[i])
        .collect()
}

fn validate_inputs(y0: &[f64], grid: &[f64]) -> Result<()> {
    if y0.is_empty() {
        return Err(Error::InvalidInput("empty initial state".to_string()));
    }
    if let Some(bad) = y0.iter().find(|y| !y.is_finite()) {
        return Err(Error::InvalidInput(format!(
            "non-finite initial state component {bad}"
        )));
    }
    if grid.len() < 2 {
        return Err(Error::InvalidInput(format!(
            "time grid needs >= 2 points, got {}",
            grid.len()
        )));
    }
    for w in grid.windows(2) {
        if !(w[0].is_finite() && w[1].is_finite() && w[1] > w[0]) {
            return Err(Error::InvalidInput(format!(
                "time grid must be finite and strictly ascending ({} then {})",
                w[0], w[1]
            )));
        }
    }
    Ok(())
}

/// Integrate `dy/dt = f(y, t)` over `grid`, sampling one state per point.
///
/// - `f`: right-hand side (autonomous systems ignore `t`)
/// - `y0`: initial state at `grid[0]`, copied bitwise into the output
/// - `grid`: finite, strictly ascending, length ≥ 2
///
/// # Errors
///
/// - [`Error::InvalidInput`] for a malformed grid, non-finite or empty
///   initial state, or bad tolerances — raised before any integration.
/// - [`Error::Integration`] if step control underflows the floor
///   `10·|t|·ε` before reaching the grid end (no automatic retry).
#[allow(clippy::many_single_char_names)]
pub fn dp5_integrate<F>(f: F, y0: &[f64], grid: &[f64], opts: &SolverOptions) -> Result<Integration>
where
    F: Fn(&[f64], f64) -> Vec<f64>,
{
    opts.validate()?;
    validate_inputs(y0, grid)?;

    let t_end = grid[grid.len() - 1];
    let mut t = grid[0];
    let mut y = y0.to_vec();
    let mut fcur = f(&y, t);
    let mut nfev = 1;
    let mut h = initial_step(&f, t, &y, &fcur, opts);
    nfev += 1;

    let mut out = Vec::with_capacity(grid.len());
    out.push(y0.to_vec());
    let mut gi = 1;
    let mut steps = 0;

    while gi < grid.len() && t < t_end {
        h = h.min(opts.max_step).min(t_end - t);

        let h_floor = 10.0 * t.abs() * f64::EPSILON;
        let y_new: Vec<f64>;
        let f_new: Vec<f64>;
        let factor: f64;
        loop {
            if h < h_floor || h <= 0.0 {
                return Err(Error::Integration(format!("step underflow at t = {t}")));
            }

            let mut k: Vec<Vec<f64>> = Vec::with_capacity(STAGES);
            k.push(fcur.clone());
            let mut ys = Vec::new();
            for s in 1..STAGES {
                ys = (0..y.len())
                    .map(|i| {
                        let incr: f64 = (0..s).map(|j| A[s][j] * k[j][i]).sum();
                        y[i] + h * incr
                    })
                    .collect();
                k.push(f(&ys, t + C[s] * h));
            }
            nfev += STAGES - 1;

            // Stage 7 input is the 5th-order solution (FSAL): its
            // evaluation doubles as next step's first stage.
            let y_cand = ys;
            let err: Vec<f64> = (0..y.len())
                .map(|i| h * (0..STAGES).map(|j| E[j] * k[j][i]).sum::<f64>())
                .collect();
            let en = error_norm(&err, &y, &y_cand, opts.rtol, opts.atol);

            if en <= 1.0 {
                factor = if en == 0.0 {
                    MAX_FACTOR
                } else {
                    MAX_FACTOR.min(SAFETY * en.powf(ERR_EXPONENT))
                };
                f_new = k.swap_remove(STAGES - 1);
                y_new = y_cand;
                break;
            }
            // NaN error norms also land here: f64::max ignores NaN, so
            // the step shrinks by MIN_FACTOR until the floor trips.
            h *= MIN_FACTOR.max(SAFETY * en.powf(ERR_EXPONENT));
        }

        let t_new = t + h;

        // Fill grid points covered by this step. The snap width absorbs
        // the ULP-level mismatch between t + (t_end − t) and t_end.
        let snap = 1e-12 * t_new.abs().max(1.0);
        while gi < grid.len() && grid[gi] <= t_new + snap {
            let tg = grid[gi];
            if (tg - t_new).abs() <= snap {
                out.push(y_new.clone());
            } else {
                out.push(hermite(tg, t, &y, &fcur, t_new, &y_new, &f_new));
            }
            gi += 1;
        }

        y = y_new;
        fcur = f_new;
        t = t_new;
        h *= factor;
        steps += 1;
    }

    if out.len() != grid.len() {
        return Err(Error::Integration(format!(
            "grid sampling stalled at t = {t} ({} of {} points filled)",
            out.len(),
            grid.len()
        )));
    }
    Ok(Integration { y: out, steps, nfev })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(clippy::cast_precision_loss)]
    fn daily(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    #[test]
    fn exponential_decay_matches_analytic() {
        let grid = daily(11);
        let r = dp5_integrate(
            |y, _t| vec![-0.5 * y[0]],
            &[1.0],
            &grid,
            &SolverOptions::default(),
        )
        .unwrap();
        for (i, row) in r.y.iter().enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let expected = (-0.5 * i as f64).exp();
            // Interior grid points are Hermite-sampled, one order below
            // the pair itself.
            assert!(
                (row[0] - expected).abs() < 1e-4,
                "t = {i}: got {}, expected {expected}",
                row[0]
            );
        }
    }

    #[test]
    fn constant_rhs_is_near_exact() {
        // Zero error estimate: every step accepted at the max factor.
        let grid = [0.0, 2.5, 7.0];
        let r = dp5_integrate(|_y, _t| vec![2.0], &[1.0], &grid, &SolverOptions::default())
            .unwrap();
        assert!((r.y[1][0] - 6.0).abs() < 1e-12);
        assert!((r.y[2][0] - 15.0).abs() < 1e-12);
    }

    #[test]
    fn circular_orbit_preserves_radius() {
        let grid = [0.0, std::f64::consts::TAU];
        let r = dp5_integrate(
            |y, _t| vec![-y[1], y[0]],
            &[1.0, 0.0],
            &grid,
            &SolverOptions::default(),
        )
        .unwrap();
        let radius = r.y[1][0].hypot(r.y[1][1]);
        assert!((radius - 1.0).abs() < 1e-5, "radius drifted to {radius}");
    }

    #[test]
    fn first_row_is_bitwise_initial_state() {
        let y0 = [0.95, 0.03, 0.02, 0.0];
        let grid = daily(366);
        let r = dp5_integrate(
            |y, _t| vec![-0.3 * y[0] * y[2], 0.3 * y[0] * y[2] - 0.1 * y[1], 0.1 * y[1] - 0.07 * y[2], 0.07 * y[2]],
            &y0,
            &grid,
            &SolverOptions::default(),
        )
        .unwrap();
        for (a, b) in r.y[0].iter().zip(&y0) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
        assert_eq!(r.y.len(), grid.len());
    }

    #[test]
    fn tighter_tolerance_improves_accuracy() {
        let grid = daily(21);
        let loose = dp5_integrate(
            |y, _t| vec![-0.5 * y[0]],
            &[1.0],
            &grid,
            &SolverOptions {
                rtol: 1e-3,
                atol: 1e-6,
                max_step: f64::INFINITY,
            },
        )
        .unwrap();
        let tight = dp5_integrate(
            |y, _t| vec![-0.5 * y[0]],
            &[1.0],
            &grid,
            &SolverOptions {
                rtol: 1e-10,
                atol: 1e-12,
                max_step: f64::INFINITY,
            },
        )
        .unwrap();
        let exact = (-10.0_f64).exp();
        let err_loose = (loose.y[20][0] - exact).abs();
        let err_tight = (tight.y[20][0] - exact).abs();
        assert!(err_tight < err_loose, "{err_tight} !< {err_loose}");
        assert!(loose.steps < tight.steps);
    }

    #[test]
    fn max_step_bounds_internal_steps() {
        let grid = [0.0, 10.0];
        let r = dp5_integrate(
            |_y, _t| vec![1.0],
            &[0.0],
            &grid,
            &SolverOptions {
                max_step: 0.5,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(r.steps >= 20, "expected >= 20 capped steps, got {}", r.steps);
    }

    #[test]
    fn fsal_evaluation_count() {
        let grid = [0.0, 1.0];
        let r = dp5_integrate(|_y, _t| vec![1.0], &[0.0], &grid, &SolverOptions::default())
            .unwrap();
        // 2 startup evals + 6 per attempt; no rejections for constant RHS.
        assert_eq!(r.nfev, 2 + 6 * r.steps);
    }

    #[test]
    fn rejects_short_grid() {
        let err = dp5_integrate(|y, _t| vec![-y[0]], &[1.0], &[0.0], &SolverOptions::default());
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_descending_grid() {
        let err = dp5_integrate(
            |y, _t| vec![-y[0]],
            &[1.0],
            &[0.0, 2.0, 1.0],
            &SolverOptions::default(),
        );
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_non_finite_state() {
        let err = dp5_integrate(
            |y, _t| vec![-y[0]],
            &[f64::NAN],
            &[0.0, 1.0],
            &SolverOptions::default(),
        );
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_bad_tolerances() {
        let err = dp5_integrate(
            |y, _t| vec![-y[0]],
            &[1.0],
            &[0.0, 1.0],
            &SolverOptions {
                rtol: 0.0,
                ..Default::default()
            },
        );
        assert!(matches!(err, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn nan_rhs_reports_integration_error() {
        let err = dp5_integrate(
            |_y, _t| vec![f64::NAN],
            &[1.0],
            &[0.0, 1.0],
            &SolverOptions::default(),
        );
        assert!(matches!(err, Err(Error::Integration(_))));
    }

    #[test]
    fn dense_output_between_internal_steps() {
        // Large max-factor steps force Hermite interpolation at most
        // grid points; the cubic tracks exp decay well inside a step.
        let grid: Vec<f64> = (0..=100).map(|i| f64::from(i) * 0.1).collect();
        let r = dp5_integrate(
            |y, _t| vec![-y[0]],
            &[1.0],
            &grid,
            &SolverOptions::default(),
        )
        .unwrap();
        for (tg, row) in grid.iter().zip(&r.y) {
            let expected = (-tg).exp();
            assert!(
                (row[0] - expected).abs() < 1e-4,
                "t = {tg}: got {}, expected {expected}",
                row[0]
            );
        }
    }
}
