//! Gregorian mode ambitus and scale-degree indexing.
//!
//! A [`GregorianMode`] synthesizes tones outside its written seven-tone
//! ambitus dynamically by wrapping the index modulo seven and transposing
//! the result by whole octaves, the way plainchant theory treats a mode's
//! ambitus as a template repeated at every octave rather than a fixed
//! seven-note range.

#![forbid(unsafe_code)]

use cpt_pitch::{halftone, Halftone};

/// One of the seven authentic Gregorian modes, or its plagal (hypo-)
/// variant reached via a `-3` indexing offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeName {
    /// Ionian (finalis C in the standard tuning).
    Ionian,
    /// Dorian (finalis D).
    Dorian,
    /// Phrygian (finalis E).
    Phrygian,
    /// Lydian (finalis F).
    Lydian,
    /// Mixolydian (finalis G).
    Mixolydian,
    /// Aeolian (finalis A).
    Aeolian,
    /// Locrian (finalis B).
    Locrian,
}

impl ModeName {
    fn ambitus_names(self) -> [&'static str; 7] {
        match self {
            ModeName::Ionian => ["C", "D", "E", "F", "G", "A", "B"],
            ModeName::Dorian => ["D", "E", "F", "G", "A", "B", "c"],
            ModeName::Phrygian => ["E", "F", "G", "A", "B", "c", "d"],
            ModeName::Lydian => ["F", "G", "A", "B", "c", "d", "e"],
            ModeName::Mixolydian => ["G", "A", "B", "c", "d", "e", "f"],
            ModeName::Aeolian => ["A", "B", "c", "d", "e", "f", "g"],
            ModeName::Locrian => ["B", "c", "d", "e", "f", "g", "a"],
        }
    }
}

/// A Gregorian mode's seven-tone ambitus plus an indexing offset that
/// selects the authentic form (`offset = 0`, finalis at scale-degree 0)
/// or the plagal/hypo form (`offset = -3`, finalis a fourth above the
/// bottom of the ambitus).
#[derive(Debug, Clone)]
pub struct GregorianMode {
    ambitus: [Halftone; 7],
    offset: i32,
}

impl GregorianMode {
    /// Build the authentic form of `name`.
    #[must_use]
    pub fn authentic(name: ModeName) -> Self {
        Self::with_ambitus(name.ambitus_names(), 0)
    }

    /// Build the plagal (hypo-) form of `name`, sharing the authentic
    /// form's ambitus but indexed starting a third below it.
    #[must_use]
    pub fn plagal(name: ModeName) -> Self {
        Self::with_ambitus(name.ambitus_names(), -3)
    }

    fn with_ambitus(names: [&str; 7], offset: i32) -> Self {
        let ambitus = names.map(halftone);
        Self { ambitus, offset }
    }

    /// The finalis: the mode's resting tone, `self[0]`.
    #[must_use]
    pub fn finalis(&self) -> Halftone {
        self.ambitus[0].clone()
    }

    /// The second scale degree above the finalis, `self[1]`.
    #[must_use]
    pub fn step2(&self) -> Halftone {
        self.ambitus[1].clone()
    }

    /// The leading tone: the seventh scale degree raised a semitone.
    #[must_use]
    pub fn subsemitonium(&self) -> Halftone {
        let seventh = self.get(7);
        let key = cpt_pitch::Key::new(0);
        seventh.transpose(-1, &key)
    }

    /// Fetch the halftone at scale-degree `idx`, synthesizing tones
    /// outside the written ambitus by wrapping modulo seven and
    /// transposing the remainder by the resulting number of octaves.
    #[must_use]
    pub fn get(&self, idx: i32) -> Halftone {
        let index = idx + self.offset;
        if (0..self.ambitus.len() as i32).contains(&index) {
            return self.ambitus[index as usize].clone();
        }
        let d = index.div_euclid(7);
        let m = index.rem_euclid(7);
        self.ambitus[m as usize].transpose_octaves(d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dorian_matches_original_doctest() {
        let d = GregorianMode::authentic(ModeName::Dorian);
        assert_eq!(d.get(0), halftone("D"));
        assert_eq!(d.finalis(), halftone("D"));
        assert_eq!(d.step2(), halftone("E"));
        assert_eq!(d.get(12), halftone("b"));
        assert_eq!(d.get(13), halftone("c'"));
        assert_eq!(d.get(15), halftone("e'"));
        assert_eq!(d.get(22), halftone("e''"));
        assert_eq!(d.get(-1), halftone("C"));
        assert_eq!(d.subsemitonium(), halftone("^c"));
    }

    #[test]
    fn hypo_variant_shares_ambitus_with_finalis_offset() {
        let d = GregorianMode::authentic(ModeName::Dorian);
        let hd = GregorianMode::plagal(ModeName::Dorian);
        assert_eq!(hd.get(3), d.finalis());
    }
}
