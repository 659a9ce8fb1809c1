//! The top-level score: meter, key, unit, and voices.

use cpt_pitch::Key;
use tracing::instrument;

use crate::errors::ScoreError;
use crate::fraction::Fraction;
use crate::meter::Meter;
use crate::voice::Voice;

/// A complete score: header metadata plus an ordered list of voices.
///
/// Changing the unit ([`Tune::set_unit`]) rescales every duration in
/// every bar of every voice by a rational factor. The operation is
/// atomic: a dry run on a clone checks every bar can rescale to an
/// integer duration before any voice is mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tune {
    meter: Meter,
    key: Key,
    unit: Fraction,
    comment: String,
    voices: Vec<Voice>,
}

impl Tune {
    /// Start a new, voiceless tune.
    #[must_use]
    pub fn new(meter: Meter, key: Key, unit: Fraction) -> Self {
        Self { meter, key, unit, comment: String::new(), voices: Vec::new() }
    }

    /// The tune's meter.
    #[must_use]
    pub fn meter(&self) -> Meter {
        self.meter
    }

    /// The tune's key.
    #[must_use]
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The note-length one duration unit represents (e.g. `1/8`).
    #[must_use]
    pub fn unit(&self) -> Fraction {
        self.unit
    }

    /// Free-form header comment block.
    #[must_use]
    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Set the header comment block.
    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// The tune's voices, in declaration order.
    #[must_use]
    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    /// Mutable access to the tune's voices.
    pub fn voices_mut(&mut self) -> &mut Vec<Voice> {
        &mut self.voices
    }

    /// Append a new, empty voice and return its index.
    pub fn add_voice(&mut self, id: impl Into<String>) -> usize {
        let idx = self.voices.len();
        self.voices.push(Voice::new(id));
        idx
    }

    /// Rescale every bar in every voice to a new unit, atomically: a
    /// dry run on a clone must succeed before any voice is mutated.
    ///
    /// # Errors
    /// Returns [`ScoreError::NonIntegerRescale`] if any bar's capacity
    /// or any object's duration would become non-integer under the new
    /// unit, leaving `self` unchanged.
    #[instrument(skip(self))]
    pub fn set_unit(&mut self, new_unit: Fraction) -> Result<(), ScoreError> {
        let factor = self.unit.div(new_unit);
        let mut trial = self.voices.clone();
        for voice in &mut trial {
            for bar in voice.bars_mut() {
                bar.rescale(factor)?;
            }
        }
        self.voices = trial;
        self.unit = new_unit;
        Ok(())
    }

    /// Transpose every tone in every voice by `steps` semitones, and the
    /// key by the matching number of fifths.
    #[instrument(skip(self))]
    pub fn transpose(&mut self, steps: i32) {
        let nfifth = cpt_pitch_steps_to_fifth(steps);
        for voice in &mut self.voices {
            voice.transpose(steps, &self.key);
        }
        self.key = self.key.transpose(nfifth);
    }
}

fn cpt_pitch_steps_to_fifth(steps: i32) -> i32 {
    let mut n = (7 * steps).rem_euclid(12);
    if n > 6 {
        n -= 12;
    }
    n
}
