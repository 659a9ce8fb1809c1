//! Error types for halftone/key parsing.

use thiserror::Error;

/// Failures that can occur while parsing pitch-algebra text forms.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PitchError {
    /// A halftone name did not match any known symbol stem.
    #[error("unknown halftone symbol: {0:?}")]
    UnknownHalftone(String),
    /// A key name did not match any known gregorian/major/minor table entry.
    #[error("unknown key name: {0:?}")]
    UnknownKey(String),
}
