//! Two-phase depth-first search: cantus-firmus alleles first, then the
//! boff-indexed contrapunctus recursion.

use cpt_engine::{phenotype, Genome, Modes, BOFF_LUT, CANTUS_FIRMUS, CONTRAPUNCTUS};
use cpt_rules::{Battery, HarmonyCtx, MelodyCtx};
use cpt_score::{ObjectRef, Tune, Voice};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::errors::SearchError;

/// Backtracking search over a [`Genome`]'s alleles, one cantus-firmus
/// bar at a time and then one contrapunctus metrical position at a
/// time, pruning branches that violate the rule battery.
pub struct DepthFirstSearch {
    modes: Modes,
    battery: Battery,
    rng: StdRng,
    /// Whether to run melody-CF rules at all (the `--no-check-cf`
    /// escape hatch; meaningless, and ignored, when an external
    /// cantus firmus is supplied).
    pub check_cf: bool,
    /// When off, any non-zero ugliness also prunes a branch; when on,
    /// only `badness > 0` violations do.
    pub allow_ugliness: bool,
    tune_length: usize,
}

impl DepthFirstSearch {
    /// Build a driver seeded from `random_seed`, searching against
    /// `battery` and decoding alleles through `modes`.
    #[must_use]
    pub fn new(modes: Modes, battery: Battery, random_seed: u64) -> Self {
        Self { modes, battery, rng: StdRng::seed_from_u64(random_seed), check_cf: true, allow_ugliness: false, tune_length: 0 }
    }

    /// Search for a complete tune of `tune_length` bars.
    ///
    /// If `cantus_firmus` is given, phase 1 (cantus-firmus allele
    /// search) is skipped entirely and phase 2 searches directly
    /// against it: the original's separate last-four-bars feasibility
    /// pre-check (`run_cf_end_checks`) is folded into this same
    /// search rather than duplicated as a standalone probe, since
    /// phase 2's own backtracking already answers the same question
    /// (does some contrapunctus exist for this cantus firmus) by
    /// construction.
    ///
    /// # Errors
    /// Returns [`SearchError::NoCantusFirmus`] if phase 1 exhausts its
    /// search space, [`SearchError::NoContrapunctus`] /
    /// [`SearchError::InfeasibleCantusFirmus`] if phase 2 does
    /// (the latter when the cantus firmus was supplied externally),
    /// or propagates [`cpt_engine::GeneError`] from genome/phenotype
    /// construction.
    pub fn run(&mut self, tune_length: usize, cantus_firmus: Option<Voice>) -> Result<(Tune, Genome), SearchError> {
        self.tune_length = tune_length;
        let has_cf = cantus_firmus.is_some();
        let mut genome = Genome::new(tune_length, has_cf)?;

        if !has_cf && !self.find_cantus_firmus(&mut genome, 0)? {
            return Err(SearchError::NoCantusFirmus);
        }

        if !self.find_contrapunctus(&mut genome, cantus_firmus.as_ref(), 0, 0)? {
            return Err(if has_cf { SearchError::InfeasibleCantusFirmus } else { SearchError::NoContrapunctus });
        }

        let tune = phenotype(&genome, &self.modes, cantus_firmus.as_ref(), None)?;
        Ok((tune, genome))
    }

    fn find_cantus_firmus(&mut self, genome: &mut Genome, idx: usize) -> Result<bool, SearchError> {
        if idx == genome.cflength() {
            return Ok(true);
        }
        let range = genome.range(idx);
        let mut values: Vec<i32> = (range.min..=range.max).collect();
        values.shuffle(&mut self.rng);

        for a in values {
            genome.set_allele(idx, a);
            let tune = phenotype(genome, &self.modes, None, Some(idx))?;
            let Some(cf) = tune.voices().iter().find(|v| v.id() == CANTUS_FIRMUS) else { continue };

            if self.check_cf && !run_cf_checks(cf, idx, genome.cflength(), &mut self.battery, self.allow_ugliness) {
                continue;
            }
            tracing::trace!(idx, allele = a, "cantus firmus bar accepted");
            if self.find_cantus_firmus(genome, idx + 1)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn find_contrapunctus(&mut self, genome: &mut Genome, cantus_firmus: Option<&Voice>, off: usize, boff: u32) -> Result<bool, SearchError> {
        if off >= genome.cplength() {
            return Ok(true);
        }
        let Some(slot) = BOFF_LUT[boff as usize] else {
            unreachable!("boff {boff} has no BOFF_LUT entry");
        };
        let aidx = genome.cflength() + 11 * off + slot;

        if matches!(boff, 3 | 5 | 7) {
            let range = genome.range(aidx);
            let mut pitches: Vec<i32> = (range.min..=range.max).collect();
            pitches.shuffle(&mut self.rng);
            for a in pitches {
                genome.set_allele(aidx, a);
                let tune = phenotype(genome, &self.modes, cantus_firmus, Some(aidx))?;
                if !run_cp_checks(&tune, off, genome.cplength(), self.tune_length, &mut self.battery, self.allow_ugliness) {
                    continue;
                }
                let (noff, nboff) = advance(off, boff + 1);
                if self.find_contrapunctus(genome, cantus_firmus, noff, nboff)? {
                    return Ok(true);
                }
            }
        } else {
            let dur_range = genome.range(aidx);
            let mut durations: Vec<i32> = (dur_range.min..=dur_range.max).collect();
            durations.shuffle(&mut self.rng);
            for a1 in durations {
                genome.set_allele(aidx, a1);
                let pitch_range = genome.range(aidx + 1);
                let mut pitches: Vec<i32> = (pitch_range.min..=pitch_range.max).collect();
                pitches.shuffle(&mut self.rng);
                for a2 in pitches {
                    genome.set_allele(aidx + 1, a2);
                    let tune = phenotype(genome, &self.modes, cantus_firmus, Some(aidx + 1))?;
                    if !run_cp_checks(&tune, off, genome.cplength(), self.tune_length, &mut self.battery, self.allow_ugliness) {
                        continue;
                    }
                    let step: u32 = 1 << u32::try_from(a1).unwrap_or(0);
                    let (noff, nboff) = advance(off, boff + step);
                    if self.find_contrapunctus(genome, cantus_firmus, noff, nboff)? {
                        return Ok(true);
                    }
                }
            }
        }
        Ok(false)
    }
}

fn advance(off: usize, boff: u32) -> (usize, u32) {
    if boff > 7 {
        (off + 1, 0)
    } else {
        (off, boff)
    }
}

/// Run melody-CF rules over the window `[idx-1, idx+2)` (widened to
/// the fixed step2/finalis tail once the last middle bar is reached),
/// bailing out on the first violation.
fn run_cf_checks(cf: &Voice, idx: usize, cflength: usize, battery: &mut Battery, allow_ugliness: bool) -> bool {
    for rule in &mut battery.melody_cf {
        rule.reset();
    }
    let end = if idx + 1 >= cflength { cflength + 3 } else { idx + 2 };
    let start = idx.saturating_sub(1);

    for bar_idx in start..end.min(cf.bars().len()) {
        for obj_idx in 0..cf.bars()[bar_idx].objects().len() {
            let r = ObjectRef { bar: bar_idx, obj: obj_idx };
            let ctx = MelodyCtx::new(cf, r);
            for rule in &mut battery.melody_cf {
                let result = rule.check(&ctx);
                if result.badness != 0.0 || (!allow_ugliness && result.ugliness != 0.0) {
                    return false;
                }
            }
        }
    }
    true
}

/// Run melody-CP and harmony rules over the window `[off-2, off+1)`
/// (widened to the tune's full length once the last generated bar is
/// reached), bailing out on the first violation.
fn run_cp_checks(tune: &Tune, off: usize, cplength: usize, tune_length: usize, battery: &mut Battery, allow_ugliness: bool) -> bool {
    let Some(cf_voice) = tune.voices().iter().find(|v| v.id() == CANTUS_FIRMUS) else { return false };
    let Some(cp_voice) = tune.voices().iter().find(|v| v.id() == CONTRAPUNCTUS) else { return false };
    let start = off.saturating_sub(2);
    let end = if off + 1 >= cplength { tune_length } else { off + 1 };

    for rule in &mut battery.melody_cp {
        rule.reset();
    }
    for bar_idx in start..end.min(cp_voice.bars().len()) {
        for obj_idx in 0..cp_voice.bars()[bar_idx].objects().len() {
            let r = ObjectRef { bar: bar_idx, obj: obj_idx };
            let ctx = MelodyCtx::new(cp_voice, r);
            for rule in &mut battery.melody_cp {
                let result = rule.check(&ctx);
                if result.badness != 0.0 || (!allow_ugliness && result.ugliness != 0.0) {
                    return false;
                }
            }
        }
    }

    for rule in &mut battery.harmony {
        rule.reset();
    }
    let bar_end = end.min(cp_voice.bars().len()).min(cf_voice.bars().len());
    for bar_idx in start..bar_end {
        let cf_ref = ObjectRef { bar: bar_idx, obj: 0 };
        for obj_idx in 0..cp_voice.bars()[bar_idx].objects().len() {
            let cp_ref = ObjectRef { bar: bar_idx, obj: obj_idx };
            let ctx = HarmonyCtx::new(cf_voice, cf_ref, cp_voice, cp_ref);
            for rule in &mut battery.harmony {
                let result = rule.check(&ctx);
                if result.badness != 0.0 || (!allow_ugliness && result.ugliness != 0.0) {
                    return false;
                }
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use cpt_modes::ModeName;
    use cpt_rules::Battery;

    use super::*;

    fn modes() -> Modes {
        Modes { cf: cpt_modes::GregorianMode::plagal(ModeName::Dorian), cp: cpt_modes::GregorianMode::authentic(ModeName::Dorian) }
    }

    fn empty_battery() -> Battery {
        Battery { melody_cf: vec![], melody_cp: vec![], harmony: vec![] }
    }

    #[test]
    fn an_unconstrained_search_always_finds_a_tune() {
        let mut dfs = DepthFirstSearch::new(modes(), empty_battery(), 42);
        let (tune, _genome) = dfs.run(6, None).unwrap();
        assert_eq!(tune.voices().len(), 2);
    }

    #[test]
    fn default_battery_is_satisfiable_for_a_short_tune() {
        let mut dfs = DepthFirstSearch::new(modes(), cpt_rules::default_battery(), 7);
        let (tune, _genome) = dfs.run(6, None).unwrap();
        let cp = tune.voices().iter().find(|v| v.id() == CONTRAPUNCTUS).unwrap();
        assert_eq!(cp.bars().len(), 6);
    }

    #[test]
    fn an_externally_supplied_cantus_firmus_is_reused_verbatim() {
        let mut cf = Voice::new(CANTUS_FIRMUS);
        for name in ["D", "F", "E", "D"] {
            let bar = cf.add_bar(8);
            cf.add(bar, cpt_score::BarObjectKind::Tone(cpt_pitch::halftone(name)), 8, false).unwrap();
        }
        let mut dfs = DepthFirstSearch::new(modes(), empty_battery(), 1);
        let (tune, _genome) = dfs.run(4, Some(cf)).unwrap();
        let decoded_cf = tune.voices().iter().find(|v| v.id() == CANTUS_FIRMUS).unwrap();
        assert_eq!(decoded_cf.bars().len(), 4);
    }
}
