// SPDX-License-Identifier: AGPL-3.0-or-later
//! Epidemic dynamics: SEIR/SEIRV models and trajectory integration.

pub mod dp5;
pub mod model;
pub mod params;
pub mod simulate;
