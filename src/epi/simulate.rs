// SPDX-License-Identifier: AGPL-3.0-or-later
//! Simulation entry points: run a model over a time grid, package the
//! trajectory, and derive peak/final summaries.
//!
//! These are the two operations the dashboard layer calls. Parameters are
//! validated and rates derived once per run, before any integration work;
//! the derivative functions then receive the frozen [`Rates`] value.
//!
//! # Example
//!
//! ```
//! use wetspring_equateur::epi::dp5::SolverOptions;
//! use wetspring_equateur::epi::params::ModelParameters;
//! use wetspring_equateur::epi::simulate::{daily_grid, simulate_without_intervention, summarize};
//!
//! let grid = daily_grid(365);
//! let traj = simulate_without_intervention(
//!     &ModelParameters::default(),
//!     &[0.95, 0.03, 0.02, 0.0],
//!     &grid,
//!     &SolverOptions::default(),
//! )
//! .unwrap();
//! let summary = summarize(&traj);
//! assert!(summary.infectious_peak.value > traj.y[0][2]);
//! ```

use super::dp5::{dp5_integrate, SolverOptions};
use super::model::{seir_rhs, seirv_rhs, SEIRV_DIM, SEIR_DIM};
use super::params::{ModelParameters, Rates};
use crate::error::{Error, Result};

/// Compartment column indices shared by both variants.
pub const SUSCEPTIBLE: usize = 0;
/// Exposed column.
pub const EXPOSED: usize = 1;
/// Infectious column.
pub const INFECTIOUS: usize = 2;
/// Recovered column.
pub const RECOVERED: usize = 3;
/// Vaccinated column (intervention variant only).
pub const VACCINATED: usize = 4;

/// One simulation run's output: the grid and one state row per point.
///
/// Exists only as a value returned to the caller — nothing is persisted.
#[derive(Debug, Clone)]
pub struct Trajectory {
    /// Time grid (copied from the caller's request).
    pub t: Vec<f64>,
    /// State rows, `y[i]` at `t[i]`; `y[0]` equals the supplied initial
    /// conditions bitwise.
    pub y: Vec<Vec<f64>>,
    /// Accepted internal solver steps.
    pub steps: usize,
    /// Right-hand-side evaluations.
    pub nfev: usize,
}

impl Trajectory {
    /// Extract one compartment's time series as a column.
    #[must_use]
    pub fn series(&self, compartment: usize) -> Vec<f64> {
        self.y.iter().map(|row| row[compartment]).collect()
    }

    /// Number of compartments per state row.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.y.first().map_or(0, Vec::len)
    }
}

/// Peak of one compartment series: value and grid index (day, for the
/// reference daily grid).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Peak {
    /// Maximum value over the trajectory.
    pub value: f64,
    /// Grid index where the maximum occurs (first occurrence).
    pub day_index: usize,
}

/// Derived run summary: E/I peaks and final compartment values.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Peak of the Exposed series.
    pub exposed_peak: Peak,
    /// Peak of the Infectious series.
    pub infectious_peak: Peak,
    /// Last-grid-point value for every compartment.
    pub final_state: Vec<f64>,
}

fn argmax(series: &[f64]) -> Peak {
    let mut best = Peak {
        value: f64::NEG_INFINITY,
        day_index: 0,
    };
    for (i, &x) in series.iter().enumerate() {
        if x > best.value {
            best = Peak {
                value: x,
                day_index: i,
            };
        }
    }
    best
}

/// Compute E/I peaks and final values from a finished trajectory.
///
/// # Panics
///
/// Panics if the trajectory is empty, which [`dp5_integrate`] never
/// produces (grids have ≥ 2 points).
#[must_use]
pub fn summarize(traj: &Trajectory) -> RunSummary {
    let final_state = traj.y.last().expect("trajectory has >= 2 rows").clone();
    RunSummary {
        exposed_peak: argmax(&traj.series(EXPOSED)),
        infectious_peak: argmax(&traj.series(INFECTIOUS)),
        final_state,
    }
}

/// Build the reference daily grid `0, 1, …, days` (days + 1 points).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn daily_grid(days: usize) -> Vec<f64> {
    (0..=days).map(|d| d as f64).collect()
}

fn check_dim(actual: usize, expected: usize, variant: &str) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{variant} expects {expected} compartments, got {actual}"
        )))
    }
}

fn run<F>(rhs: F, rates: Rates, y0: &[f64], grid: &[f64], opts: &SolverOptions) -> Result<Trajectory>
where
    F: Fn(&[f64], f64, &Rates) -> Vec<f64>,
{
    let out = dp5_integrate(|y, t| rhs(y, t, &rates), y0, grid, opts)?;
    Ok(Trajectory {
        t: grid.to_vec(),
        y: out.y,
        steps: out.steps,
        nfev: out.nfev,
    })
}

/// Simulate the baseline SEIR model (no intervention).
///
/// `initial` is `[S, E, I, R]` as proportions; `grid` is finite and
/// strictly ascending with ≥ 2 points.
///
/// # Errors
///
/// [`Error::InvalidInput`] for out-of-domain parameters, wrong
/// compartment count, or a malformed grid — raised before integration.
/// [`Error::Integration`] if the solver underflows its step floor.
pub fn simulate_without_intervention(
    params: &ModelParameters,
    initial: &[f64],
    grid: &[f64],
    opts: &SolverOptions,
) -> Result<Trajectory> {
    check_dim(initial.len(), SEIR_DIM, "SEIR")?;
    let rates = Rates::derive(params)?;
    run(seir_rhs, rates, initial, grid, opts)
}

/// Simulate the SEIRV model with vaccination.
///
/// `initial` is `[S, E, I, R, V]` as proportions. The superset system is
/// integrated even when `vaccination_rate` is zero, so degenerate runs
/// stay on the same code path as intervention runs.
///
/// # Errors
///
/// Same taxonomy as [`simulate_without_intervention`].
pub fn simulate_with_intervention(
    params: &ModelParameters,
    initial: &[f64],
    grid: &[f64],
    opts: &SolverOptions,
) -> Result<Trajectory> {
    check_dim(initial.len(), SEIRV_DIM, "SEIRV")?;
    let rates = Rates::derive(params)?;
    run(seirv_rhs, rates, initial, grid, opts)
}
