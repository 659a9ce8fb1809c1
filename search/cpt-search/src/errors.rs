//! Failure modes for the search drivers.

/// Errors raised while searching for a cantus firmus, a contrapunctus,
/// or while running the evolutionary driver.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The depth-first driver exhausted its cantus-firmus search space
    /// without finding an assignment that satisfies the melody-CF
    /// rules and the last-four-bars feasibility check.
    #[error("no cantus firmus satisfies the melody rules")]
    NoCantusFirmus,
    /// The depth-first driver exhausted its contrapunctus search space
    /// for the given (possibly externally supplied) cantus firmus.
    #[error("no contrapunctus satisfies the melody and harmony rules for this cantus firmus")]
    NoContrapunctus,
    /// An externally supplied cantus firmus failed the last-four-bars
    /// feasibility check before any contrapunctus search was attempted.
    #[error("no contrapunctus is feasible for the supplied cantus firmus")]
    InfeasibleCantusFirmus,
    /// Propagated from genome or phenotype construction.
    #[error(transparent)]
    Gene(#[from] cpt_engine::GeneError),
}
