// SPDX-License-Identifier: AGPL-3.0-or-later
//! Model parameters and derived per-day rates.
//!
//! [`ModelParameters`] holds the externally meaningful inputs exactly as
//! the dashboard collects them (periods in days, demography per 1000 per
//! year). [`Rates`] holds the per-day rates the differential equations
//! consume. Rates are re-derived on every simulation setup so a changed
//! parameter can never be paired with a stale β.
//!
//! # Parameter domains
//!
//! | Field | Meaning | Domain |
//! |-------|---------|--------|
//! | `r0` | basic reproduction number | [1, 5] |
//! | `infectious_period` | mean days infectious | [1, 30] |
//! | `incubation_period` | mean days latent | [1, 20] |
//! | `disease_death_rate` | δ, per day | [0, 0.2] |
//! | `birth_rate` | per 1000 per year | [0, 100] |
//! | `natural_death_rate` | per 1000 per year | [0, 50] |
//! | `vaccination_rate` | v, fraction of S per day | [0, 0.9] |
//! | `vaccine_efficacy` | e, fractional protection | [0, 1] |
//!
//! Domains are enforced once at [`Rates::derive`], not per derivative
//! call. Demography defaults to zero (the dashboard keeps the birth and
//! death inputs disabled); both code paths are kept live.

use crate::error::{Error, Result};

/// Epidemiological inputs for one simulation run.
///
/// Immutable per run and always passed explicitly — derivative functions
/// never read ambient state, so concurrent runs with different parameter
/// sets cannot interfere.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    /// Basic reproduction number R0.
    pub r0: f64,
    /// Mean infectious period in days.
    pub infectious_period: f64,
    /// Mean incubation (latent) period in days.
    pub incubation_period: f64,
    /// Disease-induced death rate δ (per day).
    pub disease_death_rate: f64,
    /// Population birth rate (per 1000 per year).
    pub birth_rate: f64,
    /// Natural death rate (per 1000 per year).
    pub natural_death_rate: f64,
    /// Fraction of susceptibles vaccinated per day (intervention only).
    pub vaccination_rate: f64,
    /// Fractional reduction in susceptibility while vaccinated
    /// (intervention only).
    pub vaccine_efficacy: f64,
}

impl Default for ModelParameters {
    /// Dashboard reference defaults: mpox in Equateur Province, zero
    /// demography, v = 0.005 / e = 0.85 when intervention is enabled.
    fn default() -> Self {
        Self {
            r0: 2.4,
            infectious_period: 14.0,
            incubation_period: 8.0,
            disease_death_rate: 0.064,
            birth_rate: 0.0,
            natural_death_rate: 0.0,
            vaccination_rate: 0.005,
            vaccine_efficacy: 0.85,
        }
    }
}

fn in_domain(name: &str, value: f64, lo: f64, hi: f64) -> Result<()> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "{name} = {value} outside [{lo}, {hi}]"
        )))
    }
}

impl ModelParameters {
    /// Check every field against its documented domain.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        in_domain("R0", self.r0, 1.0, 5.0)?;
        in_domain("infectious_period", self.infectious_period, 1.0, 30.0)?;
        in_domain("incubation_period", self.incubation_period, 1.0, 20.0)?;
        in_domain("disease_death_rate", self.disease_death_rate, 0.0, 0.2)?;
        in_domain("birth_rate", self.birth_rate, 0.0, 100.0)?;
        in_domain("natural_death_rate", self.natural_death_rate, 0.0, 50.0)?;
        in_domain("vaccination_rate", self.vaccination_rate, 0.0, 0.9)?;
        in_domain("vaccine_efficacy", self.vaccine_efficacy, 0.0, 1.0)?;
        Ok(())
    }
}

/// Per-day rates consumed by the derivative functions.
///
/// β is always implied by R0, δ, γ (β = R0·(δ+γ)) — it is never set
/// independently, so R0 stays the single externally meaningful input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rates {
    /// Exposed → infectious progression rate, α = 1/incubation.
    pub alpha: f64,
    /// Infectious → recovered recovery rate, γ = 1/infectious.
    pub gamma: f64,
    /// Transmission rate, β = R0·(δ+γ).
    pub beta: f64,
    /// Disease-induced death rate δ (per day, pass-through).
    pub delta: f64,
    /// Birth inflow π = `birth_rate`/1000/365 (per day).
    pub pi: f64,
    /// Natural death rate μ = `natural_death_rate`/1000/365 (per day).
    pub mu: f64,
    /// Vaccination rate v (per day, pass-through).
    pub v: f64,
    /// Vaccine efficacy e (pass-through).
    pub e: f64,
}

impl Rates {
    /// Validate `p` and derive the per-day rates.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInput`] if any parameter is outside its domain.
    pub fn derive(p: &ModelParameters) -> Result<Self> {
        p.validate()?;
        let gamma = 1.0 / p.infectious_period;
        Ok(Self {
            alpha: 1.0 / p.incubation_period,
            gamma,
            beta: p.r0 * (p.disease_death_rate + gamma),
            delta: p.disease_death_rate,
            pi: p.birth_rate / 1000.0 / 365.0,
            mu: p.natural_death_rate / 1000.0 / 365.0,
            v: p.vaccination_rate,
            e: p.vaccine_efficacy,
        })
    }
}
