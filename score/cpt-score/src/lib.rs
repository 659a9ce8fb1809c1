//! Tone/Pause/Bar/Voice/Tune score model, with cross-bar neighbor
//! navigation and the line-oriented text notation codec.

#![forbid(unsafe_code)]

mod bar;
mod errors;
mod fraction;
mod meter;
mod notation;
mod tune;
mod voice;

pub use bar::{Bar, BarObject, BarObjectKind};
pub use errors::{NotationError, ScoreError};
pub use fraction::Fraction;
pub use meter::Meter;
pub use notation::{emit, parse};
pub use tune::Tune;
pub use voice::{ObjectRef, Voice};
