// SPDX-License-Identifier: AGPL-3.0-or-later
//! SEIR/SEIRV derivative functions — mpox transmission dynamics.
//!
//! Pure right-hand sides: state and [`Rates`] in, derivative vector out.
//! The systems are time-autonomous (the `t` argument is ignored) and the
//! functions hold no state, so they are safe to call concurrently.
//!
//! # State variables (population proportions)
//!
//! | Index | Variable | Description |
//! |-------|----------|-------------|
//! | 0 | S | Susceptible |
//! | 1 | E | Exposed (infected, not yet infectious) |
//! | 2 | I | Infectious |
//! | 3 | R | Recovered |
//! | 4 | V | Vaccinated (intervention variant only) |
//!
//! Mass balance: the infection, progression, and recovery flows move
//! proportion between compartments and cancel in the sum, leaving
//! ΣdY = π − μ·N − δ·I (births in, natural deaths out, disease deaths
//! out of I). Each flow is computed once and reused so the cancellation
//! is exact in f64.

use super::params::Rates;

/// Compartment count for the baseline SEIR model.
pub const SEIR_DIM: usize = 4;

/// Compartment count for the vaccination SEIRV model.
pub const SEIRV_DIM: usize = 5;

/// Baseline SEIR right-hand side.
///
/// ```text
/// dS = π − βSI − μS
/// dE = βSI − (α+μ)E
/// dI = αE − (γ+δ+μ)I
/// dR = γI − μR
/// ```
#[must_use]
pub fn seir_rhs(y: &[f64], _t: f64, r: &Rates) -> Vec<f64> {
    let (s, e, i, rec) = (y[0], y[1], y[2], y[3]);

    let infection = r.beta * s * i;
    let progression = r.alpha * e;
    let recovery = r.gamma * i;

    vec![
        r.pi - infection - r.mu * s,
        infection - progression - r.mu * e,
        progression - recovery - (r.delta + r.mu) * i,
        recovery - r.mu * rec,
    ]
}

/// SEIRV right-hand side with imperfect vaccination.
///
/// ```text
/// dS = π − (βI + μ + v)S
/// dE = βSI + (1−e)βVI − (α+μ)E
/// dI = αE − (γ+δ+μ)I
/// dR = γI − μR
/// dV = vS − (1−e)βVI − μV
/// ```
///
/// Vaccinated individuals retain a force of infection scaled by (1−e);
/// at e = 1 the breakthrough term is exactly zero, and at v = 0 the
/// system reduces to [`seir_rhs`] with V frozen. The superset system is
/// always integrated as-is — no dispatch to the baseline variant.
#[must_use]
pub fn seirv_rhs(y: &[f64], _t: f64, r: &Rates) -> Vec<f64> {
    let (s, e, i, rec, vac) = (y[0], y[1], y[2], y[3], y[4]);

    let infection = r.beta * s * i;
    let breakthrough = (1.0 - r.e) * r.beta * vac * i;
    let progression = r.alpha * e;
    let recovery = r.gamma * i;

    vec![
        r.pi - infection - (r.mu + r.v) * s,
        infection + breakthrough - progression - r.mu * e,
        progression - recovery - (r.delta + r.mu) * i,
        recovery - r.mu * rec,
        r.v * s - breakthrough - r.mu * vac,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epi::params::ModelParameters;
    use crate::tolerances;

    fn rates(birth: f64, death: f64, delta: f64, v: f64, e: f64) -> Rates {
        Rates::derive(&ModelParameters {
            disease_death_rate: delta,
            birth_rate: birth,
            natural_death_rate: death,
            vaccination_rate: v,
            vaccine_efficacy: e,
            ..Default::default()
        })
        .unwrap()
    }

    const Y4: [f64; 4] = [0.95, 0.03, 0.02, 0.0];
    const Y5: [f64; 5] = [0.65, 0.03, 0.02, 0.1, 0.2];

    #[test]
    fn seir_mass_balance_closed_population() {
        // π = μ = δ = 0: strict conservation.
        let r = rates(0.0, 0.0, 0.0, 0.0, 0.0);
        let d = seir_rhs(&Y4, 0.0, &r);
        let sum: f64 = d.iter().sum();
        assert!(sum.abs() < tolerances::MASS_BALANCE, "Σd = {sum}");
    }

    #[test]
    fn seir_mass_balance_with_demography() {
        let r = rates(42.0, 9.0, 0.064, 0.0, 0.0);
        let y = [0.4, 0.2, 0.2, 0.2];
        let d = seir_rhs(&y, 0.0, &r);
        let n: f64 = y.iter().sum();
        let expected = r.pi - r.mu * n - r.delta * y[2];
        let sum: f64 = d.iter().sum();
        assert!((sum - expected).abs() < tolerances::MASS_BALANCE);
    }

    #[test]
    fn seirv_mass_balance_with_demography() {
        let r = rates(42.0, 9.0, 0.064, 0.2, 0.85);
        let d = seirv_rhs(&Y5, 0.0, &r);
        let n: f64 = Y5.iter().sum();
        let expected = r.pi - r.mu * n - r.delta * Y5[2];
        let sum: f64 = d.iter().sum();
        assert!((sum - expected).abs() < tolerances::MASS_BALANCE);
    }

    #[test]
    fn derivatives_finite_at_domain_corners() {
        let corners = [
            ModelParameters {
                r0: 1.0,
                infectious_period: 1.0,
                incubation_period: 1.0,
                disease_death_rate: 0.0,
                birth_rate: 0.0,
                natural_death_rate: 0.0,
                vaccination_rate: 0.0,
                vaccine_efficacy: 0.0,
            },
            ModelParameters {
                r0: 5.0,
                infectious_period: 30.0,
                incubation_period: 20.0,
                disease_death_rate: 0.2,
                birth_rate: 100.0,
                natural_death_rate: 50.0,
                vaccination_rate: 0.9,
                vaccine_efficacy: 1.0,
            },
        ];
        for p in corners {
            let r = Rates::derive(&p).unwrap();
            for d in seir_rhs(&Y4, 0.0, &r) {
                assert!(d.is_finite());
            }
            for d in seirv_rhs(&Y5, 0.0, &r) {
                assert!(d.is_finite());
            }
        }
    }

    #[test]
    fn full_efficacy_zeroes_breakthrough_exactly() {
        // e = 1: (1−e)βVI must be an exact IEEE zero, so dV carries only
        // inflow vS and natural death.
        let r = rates(0.0, 0.0, 0.064, 0.9, 1.0);
        let d = seirv_rhs(&Y5, 0.0, &r);
        let infection = r.beta * Y5[0] * Y5[2];
        assert_eq!(d[1].to_bits(), (infection - r.alpha * Y5[1]).to_bits());
        assert_eq!(d[4].to_bits(), (r.v * Y5[0]).to_bits());
    }

    #[test]
    fn unvaccinated_seirv_matches_seir_derivatives() {
        let r = rates(42.0, 9.0, 0.064, 0.0, 0.0);
        let y5 = [0.95, 0.03, 0.02, 0.0, 0.0];
        let d4 = seir_rhs(&Y4, 0.0, &r);
        let d5 = seirv_rhs(&y5, 0.0, &r);
        for k in 0..SEIR_DIM {
            assert!(
                (d4[k] - d5[k]).abs() < tolerances::ANALYTICAL_F64,
                "compartment {k}: {} vs {}",
                d4[k],
                d5[k]
            );
        }
        assert_eq!(d5[4], 0.0);
    }

    #[test]
    fn time_autonomous() {
        let r = rates(0.0, 0.0, 0.064, 0.005, 0.85);
        let a = seir_rhs(&Y4, 0.0, &r);
        let b = seir_rhs(&Y4, 123.0, &r);
        assert_eq!(a, b);
        let a = seirv_rhs(&Y5, 0.0, &r);
        let b = seirv_rhs(&Y5, 123.0, &r);
        assert_eq!(a, b);
    }
}
