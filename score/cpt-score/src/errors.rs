//! Error types for the score model and its notation codec.

use thiserror::Error;

/// Failures raised while building or mutating a [`crate::Tune`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreError {
    /// A bar `add` would push the cumulative duration past capacity.
    #[error("bar {bar_idx} overfull: {sum} + {added} > {capacity}")]
    OverfullBar {
        /// Index of the offending bar within its voice.
        bar_idx: usize,
        /// Cumulative duration already committed to the bar.
        sum: u32,
        /// Duration of the object that would have overflowed it.
        added: u32,
        /// The bar's declared capacity.
        capacity: u32,
    },
    /// A unit-rescaling would produce a non-integer duration.
    #[error("cannot rescale unit: duration would become non-integer")]
    NonIntegerRescale,
}

/// Failures raised while parsing the line-oriented text notation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotationError {
    /// An unrecognized single-letter header field.
    #[error("unknown header field {0:?} on line {1}")]
    UnknownField(char, usize),
    /// A body token did not match `[accidental]?letter[octave-mark]*[digits]?[-]?`.
    #[error("ill-formed token {0:?} on line {1}")]
    IllFormedToken(String, usize),
    /// A meter string did not match `N/D`, `C`, or `C|`.
    #[error("ill-formed meter {0:?}")]
    IllFormedMeter(String),
    /// A voice body line referenced an undeclared voice id.
    #[error("undeclared voice id {0:?} on line {1}")]
    UndeclaredVoice(String, usize),
    /// Building the resulting score failed.
    #[error(transparent)]
    Score(#[from] ScoreError),
    /// An unknown pitch name.
    #[error(transparent)]
    Pitch(#[from] cpt_pitch::PitchError),
}
