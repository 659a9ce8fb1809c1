//! Halftone and key arithmetic: ABC-style pitch names, enharmonics, and
//! circle-of-fifths transposition.
//!
//! This crate has no notion of bars, voices, or rhythm; it is pure pitch
//! algebra, shared by every other crate that needs to name or transpose a
//! tone.

#![forbid(unsafe_code)]

mod errors;
mod halftone;
mod key;
mod tables;

pub use errors::PitchError;
pub use halftone::{halftone, Halftone};
pub use key::{Key, Mode};
