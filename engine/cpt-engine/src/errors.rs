//! Failure modes for genome construction, gene-file I/O, and phenotype
//! materialization.

use std::io;

/// Errors raised while building or importing a genome, or while turning
/// one into a concrete [`cpt_score::Tune`].
#[derive(Debug, thiserror::Error)]
pub enum GeneError {
    /// `tune_length` was not large enough to leave any searched bars
    /// (the first CF bar and the last two CF/CP bars are always fixed).
    #[error("tune length {0} must be greater than 3 bars")]
    TuneTooShort(usize),
    /// A gene file's allele count didn't match the genome shape implied
    /// by its own `tune_length`/`has_cantus_firmus` fields.
    #[error("gene file has {found} alleles, expected {expected} for a tune of length {tune_length}")]
    AlleleCountMismatch { found: usize, expected: usize, tune_length: usize },
    /// No voice with the given id exists in a phenotype tune.
    #[error("no {0:?} voice in the phenotype")]
    MissingVoice(&'static str),
    /// A `%#`-prefixed trace line was malformed.
    #[error("malformed gene trace line: {0:?}")]
    InvalidTrace(String),
    /// Propagated from bar insertion during phenotype construction.
    #[error(transparent)]
    Score(#[from] cpt_score::ScoreError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}
