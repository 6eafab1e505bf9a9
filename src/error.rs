// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for epidemic simulation.
//!
//! All failures use [`Error`], one variant per failure mode. No external
//! error crates — zero-dependency error type. Every failure is recoverable
//! at the call site by adjusting inputs; nothing is fatal.

use std::fmt;

/// Errors produced by model setup and integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid input: parameter outside its documented domain, wrong
    /// compartment count, or malformed time grid. Raised before any
    /// integration work starts.
    InvalidInput(String),
    /// Solver non-convergence: step size fell below the floor before the
    /// grid end was reached. No automatic retry — callers may rerun with
    /// looser tolerances or a smaller `max_step`.
    Integration(String),
}

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::Integration(msg) => write!(f, "integration error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_input() {
        let err = Error::InvalidInput("R0 = 7.2 outside [1, 5]".to_string());
        assert_eq!(err.to_string(), "invalid input: R0 = 7.2 outside [1, 5]");
    }

    #[test]
    fn display_integration() {
        let err = Error::Integration("step underflow at t = 12.5".to_string());
        assert_eq!(err.to_string(), "integration error: step underflow at t = 12.5");
    }

    #[test]
    fn error_trait_object() {
        let err: Box<dyn std::error::Error> = Box::new(Error::Integration(String::new()));
        assert!(err.source().is_none());
    }
}
