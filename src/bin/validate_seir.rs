// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation: baseline SEIR mpox dynamics vs Python baseline.
//!
//! Validates the no-intervention model over the reference one-year daily
//! grid: epidemic burnout scenario, demography-enabled run, and
//! derivative-level mass balance.
//!
//! # Provenance
//!
//! | Field | Value |
//! |-------|-------|
//! | Baseline script | `scripts/dp5_baseline.py` |
//! | Baseline integrator | DP5(4), rtol 1e-6, atol 1e-9 |
//! | Reference integrator | same method, rtol 1e-12, atol 1e-14 |
//! | Scenario | R0 2.4, infectious 14 d, incubation 8 d, δ 0.064 |
//! | Initial state | S 0.95, E 0.03, I 0.02, R 0.0 |
//! | Grid | 366 daily points, 0..365 |
//! | Python version | 3.10.12 |
//! | Exact command | `python3 scripts/dp5_baseline.py` |

use wetspring_equateur::epi::model::seir_rhs;
use wetspring_equateur::epi::params::{ModelParameters, Rates};
use wetspring_equateur::epi::dp5::SolverOptions;
use wetspring_equateur::epi::simulate::{
    daily_grid, simulate_without_intervention, summarize, INFECTIOUS, RECOVERED, SUSCEPTIBLE,
};
use wetspring_equateur::tolerances;
use wetspring_equateur::validation::Validator;

const INITIAL: [f64; 4] = [0.95, 0.03, 0.02, 0.0];

fn main() {
    let mut v = Validator::new("SEIR baseline dynamics vs Python DP5 baseline");
    let grid = daily_grid(365);
    let opts = SolverOptions::default();

    // ── Scenario 1: no demography, epidemic burns out ────────────────
    v.section("── Scenario 1: R0 2.4, no vaccination, no demography ──");
    let p = ModelParameters::default();
    let traj = simulate_without_intervention(&p, &INITIAL, &grid, &opts)
        .expect("scenario 1 must integrate");
    let s = summarize(&traj);

    v.check(
        "S1: S final",
        s.final_state[SUSCEPTIBLE],
        0.113_042_519,
        tolerances::DP5_BASELINE,
    );
    v.check(
        "S1: E peak",
        s.exposed_peak.value,
        0.129_695_623,
        tolerances::DP5_BASELINE,
    );
    v.check_index("S1: E peak day", s.exposed_peak.day_index, 37);
    v.check(
        "S1: I peak",
        s.infectious_peak.value,
        0.113_331_590,
        tolerances::DP5_BASELINE,
    );
    v.check_index("S1: I peak day", s.infectious_peak.day_index, 43);
    v.check(
        "S1: R final",
        s.final_state[RECOVERED],
        0.467_804_578,
        tolerances::DP5_BASELINE,
    );
    v.check_property(
        "S1: epidemic extinct by day 365",
        s.final_state[INFECTIOUS].abs() < tolerances::EPIDEMIC_EXTINCT,
    );
    v.check_property(
        "S1: I rises before it decays",
        s.infectious_peak.value > INITIAL[INFECTIOUS] && s.infectious_peak.day_index > 0,
    );

    // ── Scenario D: demography enabled (42/9 per 1000 per year) ──────
    v.section("── Scenario D: birth 42, death 9 per 1000/year ──");
    let pd = ModelParameters {
        birth_rate: 42.0,
        natural_death_rate: 9.0,
        ..Default::default()
    };
    let traj = simulate_without_intervention(&pd, &INITIAL, &grid, &opts)
        .expect("demography scenario must integrate");
    let s = summarize(&traj);

    v.check(
        "D: S final",
        s.final_state[SUSCEPTIBLE],
        0.145_571_832,
        tolerances::DP5_BASELINE,
    );
    v.check(
        "D: E peak",
        s.exposed_peak.value,
        0.130_429_808,
        tolerances::DP5_BASELINE,
    );
    v.check_index("D: E peak day", s.exposed_peak.day_index, 37);
    v.check(
        "D: I peak",
        s.infectious_peak.value,
        0.113_939_784,
        tolerances::DP5_BASELINE,
    );
    v.check_index("D: I peak day", s.infectious_peak.day_index, 43);
    v.check(
        "D: R final",
        s.final_state[RECOVERED],
        0.467_974_740,
        tolerances::DP5_BASELINE,
    );
    let r_series = traj.series(RECOVERED);
    let r_peak = r_series
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    v.check("D: R peak", r_peak, 0.469_995_689, tolerances::DP5_BASELINE);

    // ── Derivative-level mass balance ────────────────────────────────
    v.section("── Mass balance at the initial state ──");
    let r = Rates::derive(&p).expect("default parameters are valid");
    let d = seir_rhs(&INITIAL, 0.0, &r);
    let sum: f64 = d.iter().sum();
    v.check(
        "ΣdY + δ·I0 (closed population)",
        sum + r.delta * INITIAL[INFECTIOUS],
        0.0,
        tolerances::MASS_BALANCE,
    );
    let rd = Rates::derive(&pd).expect("demography parameters are valid");
    let d = seir_rhs(&INITIAL, 0.0, &rd);
    let n: f64 = INITIAL.iter().sum();
    let sum: f64 = d.iter().sum();
    v.check(
        "ΣdY − (π − μN − δI0) (open population)",
        sum - (rd.pi - rd.mu * n - rd.delta * INITIAL[INFECTIOUS]),
        0.0,
        tolerances::MASS_BALANCE,
    );

    v.finish();
}
