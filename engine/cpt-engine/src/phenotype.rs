//! Decode a [`Genome`] into a concrete two-voice [`Tune`].

use cpt_modes::GregorianMode;
use cpt_pitch::Key;
use cpt_score::{BarObjectKind, Fraction, Meter, Tune, Voice};

use crate::errors::GeneError;
use crate::genome::{Genome, BOFF_LUT};

/// Id of the cantus-firmus voice, matching the original's `V:CantusFirmus`.
pub const CANTUS_FIRMUS: &str = "CantusFirmus";
/// Id of the contrapunctus voice, matching the original's `V:Contrapunctus`.
pub const CONTRAPUNCTUS: &str = "Contrapunctus";

/// The pair of modes a genome is decoded against: the cantus-firmus
/// voice reads from `cf` (conventionally the plagal/hypo form), the
/// contrapunctus voice from `cp` (conventionally the authentic form).
#[derive(Debug, Clone)]
pub struct Modes {
    /// Mode the cantus-firmus voice's pitch alleles index into.
    pub cf: GregorianMode,
    /// Mode the contrapunctus voice's pitch alleles index into.
    pub cp: GregorianMode,
}

/// Decode `genome` into a `Tune` in the key of D Dorian, 4/4, eighth-note
/// unit, matching the original's fixed scoring conventions.
///
/// If `cantus_firmus` is given, it is copied in verbatim (the genome is
/// expected to have `cflength() == 0`) rather than generated from
/// alleles. `maxidx` bounds how many alleles have been committed so
/// far: decoding stops and returns the partial tune as soon as it would
/// need an allele beyond that index, the mechanism the depth-first
/// driver uses to materialize a tune incrementally during search.
///
/// # Errors
/// Propagates [`cpt_score::ScoreError`] from bar insertion (unreachable
/// in practice: every bar here is built to exactly its 8-eighth
/// capacity).
pub fn phenotype(genome: &Genome, modes: &Modes, cantus_firmus: Option<&Voice>, maxidx: Option<usize>) -> Result<Tune, GeneError> {
    let key = Key::parse("DDor").unwrap_or_else(|_| Key::new(0));
    let mut tune = Tune::new(Meter { numerator: 4, denominator: 4 }, key, Fraction::new(1, 8));
    tune.set_comment("(Contrapunctus) (CantusFirmus)");

    let generate_cf = cantus_firmus.is_none();
    let (mut cf, truncated) = build_cantus_firmus(genome, modes, cantus_firmus, maxidx)?;
    if truncated {
        tune.voices_mut().push(cf);
        return Ok(tune);
    }
    if generate_cf {
        append_bar(&mut cf, BarObjectKind::Tone(modes.cf.step2()), 8)?;
        append_bar(&mut cf, BarObjectKind::Tone(modes.cf.finalis()), 8)?;
    }
    tune.voices_mut().push(cf);

    let mut cp = Voice::new(CONTRAPUNCTUS);
    for i in 0..genome.cplength() {
        let off = i * 11 + genome.cflength();
        let v: [i32; 11] = std::array::from_fn(|j| genome.get_fixed_allele(j + off));
        let bar_idx = cp.add_bar(8);
        let mut boff = 0u32;
        loop {
            if BOFF_LUT[boff as usize].is_none() {
                break;
            }
            let (duration, pitch_idx) = match boff {
                0 => (1 << v[0], 1),
                2 => (1 << v[2], 3),
                3 => (1, 4),
                4 => (1 << v[5], 6),
                6 => (1 << v[8], 9),
                7 => (1, 10),
                _ => unreachable!("boff {boff} has no BOFF_LUT entry"),
            };
            if maxidx.is_some_and(|idx| off + pitch_idx > idx) {
                tune.voices_mut().push(cp);
                return Ok(tune);
            }
            cp.add(bar_idx, BarObjectKind::Tone(modes.cp.get(v[pitch_idx])), duration, false)?;
            boff += duration;
            if boff >= 8 {
                break;
            }
        }
    }
    append_bar(&mut cp, BarObjectKind::Tone(modes.cp.subsemitonium()), 8)?;
    append_bar(&mut cp, BarObjectKind::Tone(modes.cp.get(7)), 8)?;
    tune.voices_mut().push(cp);

    Ok(tune)
}

/// Builds the cantus-firmus voice. The returned `bool` is whether
/// `maxidx` cut the voice short of its full, generated length (in
/// which case the caller must not append the fixed step2/finalis
/// tail: those bars haven't been "reached" by the search yet).
fn build_cantus_firmus(genome: &Genome, modes: &Modes, cantus_firmus: Option<&Voice>, maxidx: Option<usize>) -> Result<(Voice, bool), GeneError> {
    if let Some(given) = cantus_firmus {
        return Ok((given.clone(), false));
    }
    let mut cf = Voice::new(CANTUS_FIRMUS);
    cf.set_property("name", "Cantus Firmus");
    append_bar(&mut cf, BarObjectKind::Tone(modes.cf.finalis()), 8)?;
    for i in 0..genome.cflength() {
        if maxidx.is_some_and(|idx| i > idx) {
            return Ok((cf, true));
        }
        let a = genome.get_fixed_allele(i);
        append_bar(&mut cf, BarObjectKind::Tone(modes.cf.get(a)), 8)?;
    }
    Ok((cf, false))
}

fn append_bar(voice: &mut Voice, kind: BarObjectKind, duration: u32) -> Result<(), GeneError> {
    let bar_idx = voice.add_bar(duration);
    voice.add(bar_idx, kind, duration, false)?;
    Ok(())
}
