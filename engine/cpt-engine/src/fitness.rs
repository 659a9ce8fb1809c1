//! Walk a decoded [`Tune`] against a rule [`Battery`] and reduce it to a
//! single fitness score.

use cpt_rules::{Battery, HarmonyCtx, MelodyCtx};
use cpt_score::{ObjectRef, Tune, Voice};

use crate::errors::GeneError;
use crate::phenotype::{CANTUS_FIRMUS, CONTRAPUNCTUS};

/// Walk the contrapunctus voice in order, pairing each of its objects
/// with the cantus-firmus object whose bar range contains it.
///
/// The cantus firmus always contributes exactly one whole-bar object
/// per bar, so this is equivalent to (and simpler than) a general
/// merge over the union of both voices' onset timestamps: every
/// contrapunctus onset already falls within some cantus-firmus object's
/// range, and consecutive contrapunctus objects in the same bar are
/// naturally paired with the same cantus-firmus object.
fn voices_iter<'a>(cf: &'a Voice, cp: &'a Voice) -> impl Iterator<Item = (ObjectRef, ObjectRef)> + 'a {
    cp.bars().iter().enumerate().flat_map(move |(bar_idx, bar)| {
        (0..bar.objects().len()).filter_map(move |obj_idx| {
            let cp_ref = ObjectRef { bar: bar_idx, obj: obj_idx };
            let offset = cp.get(cp_ref).offset();
            let cf_ref = cf.get_by_offset(bar_idx, offset)?;
            Some((cf_ref, cp_ref))
        })
    })
}

/// Reduce `tune` to a single fitness score under `battery`.
///
/// `check_cf` gates whether the cantus-firmus melody rules run at all
/// (the `--no-check-cf` escape hatch); harmony and contrapunctus-melody
/// rules always run.
///
/// A tune with zero violations scores exactly `1.0`: `badness` starts
/// at `1.0` and only ever multiplies by a per-visit sum that is
/// guaranteed `> 1` when any rule fires, `ugliness` starts at `1.0` and
/// only ever adds non-negative per-visit costs.
///
/// # Errors
/// Returns [`GeneError::MissingVoice`] if `tune` lacks either voice.
#[tracing::instrument(skip(tune, battery), fields(voices = tune.voices().len()))]
pub fn evaluate(tune: &Tune, battery: &mut Battery, check_cf: bool) -> Result<f64, GeneError> {
    let cf_voice = tune.voices().iter().find(|v| v.id() == CANTUS_FIRMUS).ok_or(GeneError::MissingVoice("CantusFirmus"))?;
    let cp_voice = tune.voices().iter().find(|v| v.id() == CONTRAPUNCTUS).ok_or(GeneError::MissingVoice("Contrapunctus"))?;

    battery.reset();

    let unit = tune.unit();
    let unit_inv = unit.den as f64 / unit.num as f64;

    let mut badness = 1.0_f64;
    let mut ugliness = 1.0_f64;
    let mut last_cf: Option<ObjectRef> = None;
    let mut last_cp: Option<ObjectRef> = None;

    for (cf_ref, cp_ref) in voices_iter(cf_voice, cp_voice) {
        if check_cf && last_cf != Some(cf_ref) {
            last_cf = Some(cf_ref);
            let ctx = MelodyCtx::new(cf_voice, cf_ref);
            for rule in &mut battery.melody_cf {
                let result = rule.check(&ctx);
                if result.badness != 0.0 {
                    badness *= result.badness;
                }
                ugliness += result.ugliness;
            }
        }

        let weight = f64::from(cp_voice.get(cp_ref).duration()).powi(2) * unit_inv;
        let mut bsum = 0.0_f64;
        let mut usum = 0.0_f64;

        if last_cp != Some(cp_ref) {
            last_cp = Some(cp_ref);
            let ctx = MelodyCtx::new(cp_voice, cp_ref);
            for rule in &mut battery.melody_cp {
                let result = rule.check(&ctx);
                bsum += result.badness * weight;
                usum += result.ugliness * weight;
            }
        }

        let hctx = HarmonyCtx::new(cf_voice, cf_ref, cp_voice, cp_ref);
        for rule in &mut battery.harmony {
            let result = rule.check(&hctx);
            bsum += result.badness * weight;
            usum += result.ugliness * weight;
        }

        ugliness += usum;
        if bsum != 0.0 {
            badness *= bsum;
        }
    }

    let score = ugliness * badness;
    tracing::trace!(score, badness, ugliness, "tune evaluated");
    Ok(score)
}

/// A single rule firing, reported by [`explain`].
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Bar/object of the contrapunctus side of the pair that triggered this.
    pub cp_object: ObjectRef,
    /// Which rule list the firing rule belongs to.
    pub kind: ExplanationKind,
    /// `Debug` rendering of the rule that fired (its variant and state).
    pub rule: String,
    /// The rule's result; never `(0.0, 0.0)`.
    pub result: cpt_rules::CheckResult,
}

/// Which rule list produced an [`Explanation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplanationKind {
    /// A melody-CF rule.
    MelodyCf,
    /// A melody-CP rule.
    MelodyCp,
    /// A harmony rule.
    Harmony,
}

/// Like [`evaluate`], but also returns one [`Explanation`] per rule
/// firing, in visit order, for `--explain-cp-cf`-style reporting.
///
/// # Errors
/// Returns [`GeneError::MissingVoice`] if `tune` lacks either voice.
#[tracing::instrument(skip(tune, battery))]
pub fn explain(tune: &Tune, battery: &mut Battery, check_cf: bool) -> Result<(f64, Vec<Explanation>), GeneError> {
    let cf_voice = tune.voices().iter().find(|v| v.id() == CANTUS_FIRMUS).ok_or(GeneError::MissingVoice("CantusFirmus"))?;
    let cp_voice = tune.voices().iter().find(|v| v.id() == CONTRAPUNCTUS).ok_or(GeneError::MissingVoice("Contrapunctus"))?;

    battery.reset();

    let unit = tune.unit();
    let unit_inv = unit.den as f64 / unit.num as f64;

    let mut badness = 1.0_f64;
    let mut ugliness = 1.0_f64;
    let mut last_cf: Option<ObjectRef> = None;
    let mut last_cp: Option<ObjectRef> = None;
    let mut log = Vec::new();

    for (cf_ref, cp_ref) in voices_iter(cf_voice, cp_voice) {
        if check_cf && last_cf != Some(cf_ref) {
            last_cf = Some(cf_ref);
            let ctx = MelodyCtx::new(cf_voice, cf_ref);
            for rule in &mut battery.melody_cf {
                let result = rule.check(&ctx);
                if result.badness != 0.0 {
                    badness *= result.badness;
                }
                ugliness += result.ugliness;
                if result.badness != 0.0 || result.ugliness != 0.0 {
                    log.push(Explanation { cp_object: cp_ref, kind: ExplanationKind::MelodyCf, rule: format!("{rule:?}"), result });
                }
            }
        }

        let weight = f64::from(cp_voice.get(cp_ref).duration()).powi(2) * unit_inv;
        let mut bsum = 0.0_f64;
        let mut usum = 0.0_f64;

        if last_cp != Some(cp_ref) {
            last_cp = Some(cp_ref);
            let ctx = MelodyCtx::new(cp_voice, cp_ref);
            for rule in &mut battery.melody_cp {
                let result = rule.check(&ctx);
                bsum += result.badness * weight;
                usum += result.ugliness * weight;
                if result.badness != 0.0 || result.ugliness != 0.0 {
                    log.push(Explanation { cp_object: cp_ref, kind: ExplanationKind::MelodyCp, rule: format!("{rule:?}"), result });
                }
            }
        }

        let hctx = HarmonyCtx::new(cf_voice, cf_ref, cp_voice, cp_ref);
        for rule in &mut battery.harmony {
            let result = rule.check(&hctx);
            bsum += result.badness * weight;
            usum += result.ugliness * weight;
            if result.badness != 0.0 || result.ugliness != 0.0 {
                log.push(Explanation { cp_object: cp_ref, kind: ExplanationKind::Harmony, rule: format!("{rule:?}"), result });
            }
        }

        ugliness += usum;
        if bsum != 0.0 {
            badness *= bsum;
        }
    }

    let score = ugliness * badness;
    tracing::debug!(score, violations = log.len(), "tune explained");
    Ok((score, log))
}

#[cfg(test)]
mod tests {
    use cpt_modes::{GregorianMode, ModeName};
    use cpt_pitch::Key;
    use cpt_rules::default_battery;
    use cpt_score::{BarObjectKind, Meter};

    use super::*;
    use crate::genome::Genome;
    use crate::phenotype::{phenotype, Modes};

    fn modes() -> Modes {
        Modes { cf: GregorianMode::plagal(ModeName::Dorian), cp: GregorianMode::authentic(ModeName::Dorian) }
    }

    #[test]
    fn a_clean_hand_built_tune_scores_exactly_one() {
        let mut tune = Tune::new(Meter { numerator: 4, denominator: 4 }, Key::new(-2), cpt_score::Fraction::new(1, 8));
        let mut cf = Voice::new(CANTUS_FIRMUS);
        let bar = cf.add_bar(8);
        cf.add(bar, BarObjectKind::Tone(cpt_pitch::halftone("D")), 8, false).unwrap();
        let mut cp = Voice::new(CONTRAPUNCTUS);
        let bar = cp.add_bar(8);
        cp.add(bar, BarObjectKind::Tone(cpt_pitch::halftone("D")), 8, false).unwrap();
        tune.voices_mut().push(cf);
        tune.voices_mut().push(cp);

        let mut battery = default_battery();
        let score = evaluate(&tune, &mut battery, true).unwrap();
        assert!((score - 1.0).abs() < 1e-9, "expected a clean unison tune to score 1.0, got {score}");
    }

    #[test]
    fn missing_voice_is_reported() {
        let tune = Tune::new(Meter { numerator: 4, denominator: 4 }, Key::new(-2), cpt_score::Fraction::new(1, 8));
        let mut battery = default_battery();
        assert!(matches!(evaluate(&tune, &mut battery, true), Err(GeneError::MissingVoice("CantusFirmus"))));
    }

    #[test]
    fn explain_matches_evaluate_and_logs_nothing_for_a_clean_tune() {
        let mut tune = Tune::new(Meter { numerator: 4, denominator: 4 }, Key::new(-2), cpt_score::Fraction::new(1, 8));
        let mut cf = Voice::new(CANTUS_FIRMUS);
        let bar = cf.add_bar(8);
        cf.add(bar, BarObjectKind::Tone(cpt_pitch::halftone("D")), 8, false).unwrap();
        let mut cp = Voice::new(CONTRAPUNCTUS);
        let bar = cp.add_bar(8);
        cp.add(bar, BarObjectKind::Tone(cpt_pitch::halftone("D")), 8, false).unwrap();
        tune.voices_mut().push(cf);
        tune.voices_mut().push(cp);

        let mut battery = default_battery();
        let (score, log) = explain(&tune, &mut battery, true).unwrap();
        assert!((score - 1.0).abs() < 1e-9);
        assert!(log.is_empty());
    }

    #[test]
    fn a_generated_phenotype_evaluates_without_error() {
        let genome = Genome::new(6, false).unwrap();
        let tune = phenotype(&genome, &modes(), None, None).unwrap();
        let mut battery = default_battery();
        let score = evaluate(&tune, &mut battery, true).unwrap();
        assert!(score.is_finite() && score >= 1.0);
    }
}
