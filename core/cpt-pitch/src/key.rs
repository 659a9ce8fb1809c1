//! Key signatures as a signed circle-of-fifths offset, with mode-specific
//! naming tables and derived accidentals.

use std::fmt;

use crate::errors::PitchError;
use crate::halftone::{halftone, Halftone};

/// The seven diatonic modes a [`Key`] can be named in, matching the column
/// headers of the original mode-name tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Major / Ionian.
    Ionian,
    /// Natural minor / Aeolian.
    Aeolian,
    /// Mixolydian (major with a flat seventh).
    Mixolydian,
    /// Dorian (minor with a raised sixth).
    Dorian,
    /// Phrygian (minor with a flat second).
    Phrygian,
    /// Lydian (major with a raised fourth).
    Lydian,
    /// Locrian (diminished-fifth tonic).
    Locrian,
}

/// Name table for one mode, indexed by `offset + 7` (offsets run `-7..=7`).
const IONIAN: [&str; 15] = [
    "Cb", "Gb", "Db", "Ab", "Eb", "Bb", "F", "C", "G", "D", "A", "E", "B", "F#", "C#",
];
const AEOLIAN: [&str; 15] = [
    "Abm", "Ebm", "Bbm", "Fm", "Cm", "Gm", "Dm", "Am", "Em", "Bm", "F#m", "C#m", "G#m", "D#m", "A#m",
];
const MIXOLYDIAN: [&str; 15] = [
    "GbMix", "DbMix", "AbMix", "EbMix", "BbMix", "FMix", "CMix", "GMix", "DMix", "AMix", "EMix", "BMix",
    "F#Mix", "C#Mix", "G#Mix",
];
const DORIAN: [&str; 15] = [
    "DbDor", "AbDor", "EbDor", "BbDor", "FDor", "CDor", "GDor", "DDor", "ADor", "EDor", "BDor", "F#Dor",
    "C#Dor", "G#Dor", "D#Dor",
];
const PHRYGIAN: [&str; 15] = [
    "EbPhr", "BbPhr", "FPhr", "CPhr", "GPhr", "DPhr", "APhr", "EPhr", "BPhr", "F#Phr", "C#Phr", "G#Phr",
    "D#Phr", "A#Phr", "E#Phr",
];
const LYDIAN: [&str; 15] = [
    "FbLyd", "CbLyd", "GbLyd", "DbLyd", "AbLyd", "EbLyd", "BbLyd", "FLyd", "CLyd", "GLyd", "DLyd", "ALyd",
    "ELyd", "BLyd", "F#Lyd",
];
const LOCRIAN: [&str; 15] = [
    "BbLoc", "FLoc", "CLoc", "GLoc", "DLoc", "ALoc", "ELoc", "BLoc", "F#Loc", "C#Loc", "G#Loc", "D#Loc",
    "A#Loc", "E#Loc", "B#Loc",
];

fn table_for(mode: Mode) -> &'static [&'static str; 15] {
    match mode {
        Mode::Ionian => &IONIAN,
        Mode::Aeolian => &AEOLIAN,
        Mode::Mixolydian => &MIXOLYDIAN,
        Mode::Dorian => &DORIAN,
        Mode::Phrygian => &PHRYGIAN,
        Mode::Lydian => &LYDIAN,
        Mode::Locrian => &LOCRIAN,
    }
}

/// The seven natural letter names, in fifths order starting from `F`
/// (the order in which sharps/flats are added to a key signature).
const FIFTHS_ORDER: [&str; 7] = ["F", "C", "G", "D", "A", "E", "B"];

/// A key signature: a signed count of sharps (positive) or flats
/// (negative) around the circle of fifths, clamped to `-7..=7`.
///
/// No key ever carries all seven sharps or flats in practice (the
/// fifth/seventh scale degree would have to double back on itself), so
/// [`Key::transpose`] renormalizes `+-7` results to the enharmonic `+-6`
/// side before they are ever surfaced.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    offset: i32,
}

impl Key {
    /// Build a key from a raw fifths offset, clamped to `-7..=7`.
    #[must_use]
    pub fn new(offset: i32) -> Self {
        Self { offset: offset.clamp(-7, 7) }
    }

    /// The signed fifths offset (negative = flats, positive = sharps).
    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Parse a conventional key name (`"C"`, `"F#"`, `"Bb"`, `"DDor"`,
    /// `"Ebm"`, ...) by scanning every mode's name table.
    ///
    /// # Errors
    /// Returns [`PitchError::UnknownKey`] if `name` matches no table entry.
    pub fn parse(name: &str) -> Result<Self, PitchError> {
        for mode in [
            Mode::Ionian,
            Mode::Aeolian,
            Mode::Mixolydian,
            Mode::Dorian,
            Mode::Phrygian,
            Mode::Lydian,
            Mode::Locrian,
        ] {
            if let Some(idx) = table_for(mode).iter().position(|&n| n == name) {
                return Ok(Self::new(idx as i32 - 7));
            }
        }
        Err(PitchError::UnknownKey(name.to_string()))
    }

    /// The conventional name of this key in the given mode.
    #[must_use]
    pub fn name(&self, mode: Mode) -> &'static str {
        table_for(mode)[(self.offset + 7) as usize]
    }

    /// Shift the key by `n_fifth` steps around the circle of fifths.
    ///
    /// Mirrors the +-6 boundary behavior of [`crate::halftone::Halftone::transpose_fifth`]:
    /// an upward shift that would land on +7 wraps to -6 (and symmetrically
    /// for a downward shift landing on -7), so a key signature is never
    /// reported with all seven letters accidented.
    #[must_use]
    pub fn transpose(&self, n_fifth: i32) -> Self {
        let raw = self.offset + n_fifth;
        let wrapped = if raw > 6 {
            raw - 12
        } else if raw < -6 {
            raw + 12
        } else {
            raw
        };
        Self::new(wrapped)
    }

    /// The accidentals this key signature applies, as halftone letter
    /// names (e.g. `["^F"]` for one sharp, `["_B", "_E"]` for two flats).
    ///
    /// Derived by transposing the seven natural letters, taken in
    /// fifths order starting at `F`, by this key's fifths offset.
    #[must_use]
    pub fn accidentals(&self) -> Vec<Halftone> {
        let count = self.offset.unsigned_abs() as usize;
        if self.offset > 0 {
            FIFTHS_ORDER[..count]
                .iter()
                .map(|s| halftone(s).transpose_fifth(self.offset, &Key::new(0)))
                .collect()
        } else {
            FIFTHS_ORDER
                .iter()
                .rev()
                .take(count)
                .map(|s| halftone(s).transpose_fifth(self.offset, &Key::new(0)))
                .collect()
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name(Mode::Ionian))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_offset_is_c_major() {
        assert_eq!(Key::new(0).name(Mode::Ionian), "C");
    }

    #[test]
    fn parses_conventional_names() {
        assert_eq!(Key::parse("F#").unwrap().offset(), 6);
        assert_eq!(Key::parse("Bb").unwrap().offset(), -2);
        assert_eq!(Key::parse("DDor").unwrap().offset(), 0);
    }

    #[test]
    fn transpose_wraps_at_the_six_boundary() {
        let key = Key::new(6);
        assert_eq!(key.transpose(1).offset(), -5);
    }

    #[test]
    fn one_sharp_accidental_is_f_sharp() {
        let key = Key::new(1);
        let acc = key.accidentals();
        assert_eq!(acc.len(), 1);
        assert_eq!(acc[0].stem(), "f");
    }
}
