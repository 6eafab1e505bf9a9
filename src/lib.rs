// SPDX-License-Identifier: AGPL-3.0-or-later
//! wetSpring Equateur — Compartmental Epidemic Dynamics
//!
//! Rust implementation of the SEIR/SEIRV mpox transmission models for the
//! Equateur outbreak response:
//! - Baseline SEIR dynamics (no intervention)
//! - SEIRV dynamics with imperfect vaccination (rate v, efficacy e)
//! - Dormand–Prince 5(4) adaptive integration with dense grid output
//!
//! The simulation core is pure: parameters in, trajectory out. The
//! Streamlit-style dashboard layer owns parameter widgets and plotting and
//! is not part of this crate. Every model is validated against the Python
//! baseline (`scripts/dp5_baseline.py`) before replacing it.

pub mod epi;
pub mod error;
pub mod tolerances;
pub mod validation;

pub use error::{Error, Result};
