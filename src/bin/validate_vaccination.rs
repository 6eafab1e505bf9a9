// SPDX-License-Identifier: AGPL-3.0-or-later
//! Validation: SEIRV vaccination dynamics vs Python baseline.
//!
//! Validates the intervention model: imperfect vaccination (v 0.005,
//! e 0.85), full-efficacy mass campaign (v 0.9, e 1.0), the degenerate
//! v = 0 run against the baseline SEIR variant, and a vaccination-rate
//! sweep.
//!
//! # Provenance
//!
//! | Field | Value |
//! |-------|-------|
//! | Baseline script | `scripts/dp5_baseline.py` |
//! | Baseline integrator | DP5(4), rtol 1e-6, atol 1e-9 |
//! | Scenario | R0 2.4, infectious 14 d, incubation 8 d, δ 0.064 |
//! | Initial state | S 0.95, E 0.03, I 0.02, R 0.0, V 0.0 |
//! | Grid | 366 daily points, 0..365 |
//! | Python version | 3.10.12 |
//! | Exact command | `python3 scripts/dp5_baseline.py` |

use wetspring_equateur::epi::dp5::SolverOptions;
use wetspring_equateur::epi::params::ModelParameters;
use wetspring_equateur::epi::simulate::{
    daily_grid, simulate_with_intervention, simulate_without_intervention, summarize, RECOVERED,
    VACCINATED,
};
use wetspring_equateur::tolerances;
use wetspring_equateur::validation::Validator;

const INITIAL_4: [f64; 4] = [0.95, 0.03, 0.02, 0.0];
const INITIAL_5: [f64; 5] = [0.95, 0.03, 0.02, 0.0, 0.0];

fn params(v: f64, e: f64) -> ModelParameters {
    ModelParameters {
        vaccination_rate: v,
        vaccine_efficacy: e,
        ..Default::default()
    }
}

fn main() {
    let mut val = Validator::new("SEIRV vaccination dynamics vs Python DP5 baseline");
    let grid = daily_grid(365);
    let opts = SolverOptions::default();

    let baseline =
        simulate_without_intervention(&ModelParameters::default(), &INITIAL_4, &grid, &opts)
            .expect("baseline must integrate");
    let baseline_peak = summarize(&baseline).infectious_peak;

    // ── Scenario 2: imperfect vaccination v 0.005, e 0.85 ────────────
    val.section("── Scenario 2: v 0.005, e 0.85 ──");
    let traj = simulate_with_intervention(&params(0.005, 0.85), &INITIAL_5, &grid, &opts)
        .expect("scenario 2 must integrate");
    let s = summarize(&traj);

    val.check(
        "S2: E peak",
        s.exposed_peak.value,
        0.106_594_836,
        tolerances::DP5_BASELINE,
    );
    val.check_index("S2: E peak day", s.exposed_peak.day_index, 34);
    val.check(
        "S2: I peak",
        s.infectious_peak.value,
        0.093_495_328,
        tolerances::DP5_BASELINE,
    );
    val.check_index("S2: I peak day", s.infectious_peak.day_index, 41);
    val.check(
        "S2: R final",
        s.final_state[RECOVERED],
        0.395_714_637,
        tolerances::DP5_BASELINE,
    );
    val.check(
        "S2: V final",
        s.final_state[VACCINATED],
        0.224_425_107,
        tolerances::DP5_BASELINE,
    );
    val.check_property(
        "S2: vaccination attenuates the I peak",
        s.infectious_peak.value < baseline_peak.value,
    );

    // ── Scenario 3: full efficacy mass campaign v 0.9, e 1.0 ─────────
    val.section("── Scenario 3: v 0.9, e 1.0 ──");
    let traj = simulate_with_intervention(&params(0.9, 1.0), &INITIAL_5, &grid, &opts)
        .expect("scenario 3 must integrate");
    let s = summarize(&traj);

    val.check(
        "S3: E peak",
        s.exposed_peak.value,
        0.030_342_702,
        tolerances::DP5_BASELINE,
    );
    val.check_index("S3: E peak day", s.exposed_peak.day_index, 1);
    val.check(
        "S3: I peak",
        s.infectious_peak.value,
        0.022_244_470,
        tolerances::DP5_BASELINE,
    );
    val.check_index("S3: I peak day", s.infectious_peak.day_index, 4);
    val.check(
        "S3: V final",
        s.final_state[VACCINATED],
        0.942_872_395,
        tolerances::DP5_BASELINE,
    );
    val.check(
        "S3: R final",
        s.final_state[RECOVERED],
        0.030_130_593,
        tolerances::DP5_BASELINE,
    );
    let v7 = traj.y[7][VACCINATED];
    val.check_property("S3: V approaches S(0) within a week", v7 > 0.9 * INITIAL_5[0]);

    // ── Degenerate variant parity: v 0, e 0 ──────────────────────────
    val.section("── Degenerate: SEIRV(v=0, e=0) vs SEIR ──");
    let sup = simulate_with_intervention(&params(0.0, 0.0), &INITIAL_5, &grid, &opts)
        .expect("degenerate run must integrate");
    let mut max_diff = 0.0_f64;
    let mut max_v = 0.0_f64;
    for (row4, row5) in baseline.y.iter().zip(&sup.y) {
        for k in 0..4 {
            max_diff = max_diff.max((row4[k] - row5[k]).abs());
        }
        max_v = max_v.max(row5[VACCINATED].abs());
    }
    val.check(
        "max |SEIRV − SEIR| over grid",
        max_diff,
        0.0,
        tolerances::VARIANT_PARITY,
    );
    val.check("max |V| over grid", max_v, 0.0, tolerances::EXACT);

    // ── Vaccination-rate sweep, e 0.85 ───────────────────────────────
    val.section("── Sweep: v ∈ {0.0025, 0.01, 0.02}, e 0.85 ──");
    let expected = [
        (0.0025, 0.102_710_801, 42, 0.129_938, 0.430_529),
        (0.01, 0.078_719_816, 38, 0.360_380, 0.334_510),
        (0.02, 0.059_910_897, 33, 0.534_020, 0.245_659),
    ];
    let mut prev_peak = baseline_peak.value;
    for (v, i_peak, i_day, v_final, r_final) in expected {
        let traj = simulate_with_intervention(&params(v, 0.85), &INITIAL_5, &grid, &opts)
            .expect("sweep run must integrate");
        let s = summarize(&traj);
        val.check(
            &format!("v={v}: I peak"),
            s.infectious_peak.value,
            i_peak,
            tolerances::DP5_BASELINE,
        );
        val.check_index(&format!("v={v}: I peak day"), s.infectious_peak.day_index, i_day);
        val.check(
            &format!("v={v}: V final"),
            s.final_state[VACCINATED],
            v_final,
            tolerances::DP5_BASELINE,
        );
        val.check(
            &format!("v={v}: R final"),
            s.final_state[RECOVERED],
            r_final,
            tolerances::DP5_BASELINE,
        );
        val.check_property(
            &format!("v={v}: peak strictly below previous rate"),
            s.infectious_peak.value < prev_peak,
        );
        prev_peak = s.infectious_peak.value;
    }

    val.finish();
}
