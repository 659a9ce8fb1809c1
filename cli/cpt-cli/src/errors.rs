//! Top-level error type for the command-line front end.

/// Failure modes raised at the CLI boundary, as opposed to library
/// errors from `cpt-engine`/`cpt-search`/`cpt-score`, which are wrapped
/// via `anyhow::Context` instead.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// An incompatible combination of flags was given.
    #[error("{0}")]
    InvalidArgument(String),
    /// The search exhausted its space without finding a tune.
    #[error("{0}")]
    Infeasible(String),
}
