//! Halftone value objects and their circle-of-fifths / octave arithmetic.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};

use crate::errors::PitchError;
use crate::key::Key;
use crate::tables;

/// A single named pitch class at a specific octave, e.g. `C`, `^f`, `_B,`.
///
/// Halftones are interned: two halftones with the same text name always
/// compare equal and share their backing string. Equality and ordering are
/// defined on [`Halftone::offset`], matching the original implementation's
/// `__eq__`/`__lt__` semantics (two spellings of the same pitch, such as
/// `^C` and `_D`, are equal).
#[derive(Debug, Clone)]
pub struct Halftone {
    name: Arc<str>,
    offset: i32,
}

impl Halftone {
    /// Look up or intern the halftone named `name`.
    ///
    /// # Errors
    /// Returns [`PitchError::UnknownHalftone`] if `name` does not resolve to
    /// a known symbol stem under any amount of octave-shift decoration.
    pub fn parse(name: &str) -> Result<Self, PitchError> {
        if let Some(ht) = registry().lock().unwrap_or_else(|e| e.into_inner()).get(name) {
            return Ok(ht.clone());
        }
        let offset = offset_of(name).ok_or_else(|| PitchError::UnknownHalftone(name.to_string()))?;
        let ht = Halftone { name: Arc::from(name), offset };
        registry().lock().unwrap_or_else(|e| e.into_inner()).insert(name.to_string(), ht.clone());
        Ok(ht)
    }

    /// Look up or intern a halftone whose name is known to be well-formed
    /// (an internally produced name, such as a table lookup result).
    ///
    /// # Panics
    /// Panics if `name` does not resolve to a known symbol stem; only call
    /// this with names derived from [`tables`] or from an existing
    /// `Halftone::name`.
    #[must_use]
    pub(crate) fn intern(name: &str) -> Self {
        match Self::parse(name) {
            Ok(ht) => ht,
            Err(_) => unreachable!("internally produced halftone name {name:?} must be well-formed"),
        }
    }

    /// The textual spelling, e.g. `"^f"` or `"_B,"`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signed semitone offset from `A` in the base octave (0).
    #[must_use]
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// The accidental prefix, if any (`"^"`, `"_"`, or `""`).
    #[must_use]
    pub fn prefix(&self) -> &str {
        let s = self.name.as_ref();
        if s.starts_with('^') || s.starts_with('_') { &s[..1] } else { "" }
    }

    /// The bare letter stem without accidental or octave marks, e.g. `"c"`.
    #[must_use]
    pub fn stem(&self) -> &str {
        let s = self.name.as_ref();
        let s = s.strip_prefix(['^', '_']).unwrap_or(s);
        s.trim_matches(|c| c == ',' || c == '\'')
    }

    /// Shift by whole octaves (positive up, negative down).
    #[must_use]
    pub fn transpose_octaves(&self, octaves: i32) -> Self {
        let mut n = self.name.to_string();
        if octaves > 0 {
            for _ in 0..octaves {
                if n.ends_with(',') {
                    n.pop();
                } else if n.chars().any(|c| c.is_ascii_uppercase()) {
                    n = n.to_lowercase();
                } else {
                    n.push('\'');
                }
            }
        } else {
            for _ in 0..(-octaves) {
                if n.ends_with('\'') {
                    n.pop();
                } else if n.chars().any(|c| c.is_ascii_lowercase()) {
                    n = n.to_uppercase();
                } else {
                    n.push(',');
                }
            }
        }
        Self::intern(&n)
    }

    /// The enharmonic spelling of this halftone (e.g. `^C` <-> `_D`).
    ///
    /// Halftones with no accidental are returned unchanged.
    #[must_use]
    pub fn enharmonic_equivalent(&self) -> Self {
        let name = self.name.as_ref();
        if !name.starts_with('^') && !name.starts_with('_') {
            return self.clone();
        }
        if let Some(target) = tables::enharmonic_lookup(name) {
            return Self::intern(target);
        }
        let (oct, off) = div_mod_12(self.offset);
        let mut oct = oct;
        let mut off = off;
        while off > 2 {
            off -= 12;
            oct += 1;
        }
        let base = self.transpose_octaves(-oct);
        base.enharmonic_equivalent_base().transpose_octaves(oct)
    }

    fn enharmonic_equivalent_base(&self) -> Self {
        let name = self.name.as_ref();
        tables::enharmonic_lookup(name).map_or_else(|| self.clone(), Self::intern)
    }

    /// Shift by `fifth` steps around the circle of fifths, tracking the
    /// active key so the result stays within the +/-6-sharp/flat window.
    #[must_use]
    pub fn transpose_fifth(&self, fifth: i32, key: &Key) -> Self {
        let mut ht = self.clone();
        let mut key = key.clone();
        let mut remaining = fifth;
        let mut oct = 0;
        while remaining != 0 {
            let step = remaining.signum();
            if (key.offset() >= 6 && step > 0) || (key.offset() <= -6 && step < 0) {
                ht = ht.enharmonic_equivalent();
            }
            if ht.name.contains(',') || ht.name.contains('\'') || ht.offset > 3 {
                let (oc, _) = div_mod_12(ht.offset);
                oct += oc;
                ht = ht.transpose_octaves(-oc);
                if ht.offset > 8 {
                    ht = ht.transpose_octaves(-1);
                    oct += 1;
                }
            }
            let name = if step < 0 {
                tables::lookup(tables::FIFTH_DOWN, &ht.name)
                    .or_else(|| tables::fifth_up_inv().get(ht.name.as_ref()).copied())
            } else {
                tables::lookup(tables::FIFTH_UP, &ht.name)
                    .or_else(|| tables::fifth_down_inv().get(ht.name.as_ref()).copied())
            };
            let Some(name) = name else { break };
            ht = Self::intern(name);
            key = key.transpose(step);
            remaining -= step;
        }
        ht.transpose_octaves(oct)
    }

    /// Transpose by `steps` semitones within `key`, following the circle of
    /// fifths rather than raw semitone arithmetic so enharmonic spelling
    /// stays idiomatic to the key.
    #[must_use]
    pub fn transpose(&self, steps: i32, key: &Key) -> Self {
        let nfifth = transpose_steps_to_fifth(steps);
        let oct = -(nfifth * 7 - steps) / 12;
        let shifted = self.transpose_octaves(oct).transpose_fifth(nfifth, key);
        let resulting_key = key.transpose(nfifth);
        if resulting_key.offset() == 6 && nfifth < 0 {
            shifted.enharmonic_equivalent()
        } else {
            shifted
        }
    }
}

impl PartialEq for Halftone {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset
    }
}
impl Eq for Halftone {}

impl PartialOrd for Halftone {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Halftone {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.offset.cmp(&other.offset)
    }
}

impl fmt::Display for Halftone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

fn div_mod_12(n: i32) -> (i32, i32) {
    (n.div_euclid(12), n.rem_euclid(12))
}

/// `7*s mod 12`, renormalized to the range `[-5, 6]`: the number of fifths
/// that reproduce a `steps`-semitone transposition, since 7 is its own
/// inverse mod 12.
fn transpose_steps_to_fifth(steps: i32) -> i32 {
    let mut n = (7 * steps).rem_euclid(12);
    if n > 6 {
        n -= 12;
    }
    n
}

fn offset_of(name: &str) -> Option<i32> {
    let mut stem_end = name.len();
    while stem_end > 0 {
        let c = name.as_bytes()[stem_end - 1];
        if c == b',' || c == b'\'' {
            stem_end -= 1;
        } else {
            break;
        }
    }
    let (stem, suffix) = name.split_at(stem_end);
    let base = tables::symbol_offset(stem)?;
    let mut off = base;
    for c in suffix.chars() {
        match c {
            ',' => off -= 12,
            '\'' => off += 12,
            _ => return None,
        }
    }
    Some(off)
}

type Registry = Mutex<HashMap<String, Halftone>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Parse and intern a halftone name, panicking on failure.
///
/// Convenience for call sites that already know the name is well-formed
/// (table constants, tests).
#[must_use]
pub fn halftone(name: &str) -> Halftone {
    Halftone::intern(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    #[test]
    fn parses_known_symbols() {
        assert_eq!(Halftone::parse("_C").unwrap().offset(), -10);
        assert_eq!(Halftone::parse("C").unwrap().offset(), -9);
        assert_eq!(Halftone::parse("A").unwrap().offset(), 0);
    }

    #[test]
    fn rejects_unknown_symbols() {
        assert!(Halftone::parse("H").is_err());
        assert!(Halftone::parse("_H").is_err());
    }

    #[test]
    fn octave_shift_round_trips() {
        let c = halftone("C");
        let up = c.transpose_octaves(2);
        let back = up.transpose_octaves(-2);
        assert_eq!(c, back);
    }

    #[test]
    fn enharmonic_is_involutive() {
        let cs = halftone("^C");
        let df = cs.enharmonic_equivalent();
        assert_eq!(df.offset(), cs.offset());
        assert_eq!(df.enharmonic_equivalent(), cs);
    }

    #[test]
    fn tritone_transposition_swaps_enharmonic_side() {
        let c = halftone("C");
        let key = Key::new(0);
        let up = c.transpose(6, &key);
        assert_eq!(up, halftone("^F"));

        let c_low = halftone("c");
        let down = c_low.transpose(-6, &key);
        assert_eq!(down, halftone("_G"));
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(halftone("^f").to_string(), "^f");
    }
}
