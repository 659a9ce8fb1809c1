//! Concrete melodic and harmonic checks.
//!
//! Each check returns `(badness, ugliness)`: both zero when the rule is
//! satisfied, non-zero when it fires. History-aware checks additionally
//! need [`reset`](MelodyInterval::reset)-like hooks invoked once per tune
//! walk.

use std::collections::HashSet;

use crate::context::{HarmonyCtx, MelodyCtx};

/// The outcome of a single check: zero on a satisfied rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckResult {
    /// Hard-rule strength; multiplies into the running fitness.
    pub badness: f64,
    /// Soft-rule cost; adds into the running fitness.
    pub ugliness: f64,
}

impl CheckResult {
    /// The zero result: rule satisfied.
    pub const NONE: Self = Self { badness: 0.0, ugliness: 0.0 };
}

fn sgn(i: i32) -> i32 {
    i.signum()
}

/// Forbidden-interval check between a bar object and its predecessor.
#[derive(Debug, Clone)]
pub struct MelodyInterval {
    /// Human-readable description, used in explanation output.
    pub desc: String,
    interval: HashSet<i32>,
    badness: f64,
    ugliness: f64,
    signed: bool,
    octave: bool,
}

impl MelodyInterval {
    /// Build a melody-interval check forbidding any value in `interval`.
    #[must_use]
    pub fn new(desc: impl Into<String>, interval: impl IntoIterator<Item = i32>, badness: f64, ugliness: f64, signed: bool, octave: bool) -> Self {
        Self { desc: desc.into(), interval: interval.into_iter().collect(), badness, ugliness, signed, octave }
    }

    fn interval_value(&self, ctx: &MelodyCtx<'_>) -> Option<i32> {
        let mut d = ctx.raw_interval()?;
        if !self.signed {
            d = d.abs();
        }
        if self.octave {
            d = d.rem_euclid(12);
        }
        Some(d)
    }

    /// Run the check; fires when the interval is in the forbidden set and
    /// the previous tone is not tied into the current one.
    pub fn check(&self, ctx: &MelodyCtx<'_>) -> CheckResult {
        if ctx.prev().is_none() {
            return CheckResult::NONE;
        }
        let Some(d) = self.interval_value(ctx) else { return CheckResult::NONE };
        if self.interval.contains(&d) && !ctx.prev_is_bound() {
            CheckResult { badness: self.badness, ugliness: self.ugliness }
        } else {
            CheckResult::NONE
        }
    }
}

/// [`MelodyInterval`] that only fires on the *second* consecutive match;
/// bound (tied) tones don't update the history.
#[derive(Debug, Clone)]
pub struct MelodyHistory {
    inner: MelodyInterval,
    prev_match: bool,
}

impl MelodyHistory {
    /// Wrap a melody-interval check with history tracking.
    #[must_use]
    pub fn new(inner: MelodyInterval) -> Self {
        Self { inner, prev_match: false }
    }

    /// Clear the history bit; call once before each tune walk.
    pub fn reset(&mut self) {
        self.prev_match = false;
    }

    /// Run the underlying check, firing only on the second consecutive hit.
    pub fn check(&mut self, ctx: &MelodyCtx<'_>) -> CheckResult {
        let result = self.inner.check(ctx);
        let matched = result != CheckResult::NONE;
        if ctx.prev_is_bound() {
            return if self.prev_match && matched { result } else { CheckResult::NONE };
        }
        let fires = self.prev_match && matched;
        self.prev_match = matched;
        if fires { result } else { CheckResult::NONE }
    }
}

/// A leap larger than `limit` semitones, with a state machine tracking
/// same-direction follow-through.
#[derive(Debug, Clone)]
pub struct MelodyJump {
    /// Human-readable description.
    pub desc: String,
    badness: f64,
    ugliness: f64,
    limit: i32,
    prev_sign: i32,
}

impl MelodyJump {
    /// Build a jump check; `limit` defaults to `2` (major second) in the
    /// rule batteries below.
    #[must_use]
    pub fn new(desc: impl Into<String>, badness: f64, ugliness: f64, limit: i32) -> Self {
        Self { desc: desc.into(), badness, ugliness, limit, prev_sign: 0 }
    }

    /// Clear the jump-direction memory; call once before each tune walk.
    pub fn reset(&mut self) {
        self.prev_sign = 0;
    }

    /// Run the state machine for one step.
    pub fn check(&mut self, ctx: &MelodyCtx<'_>) -> CheckResult {
        if ctx.prev().is_none() {
            return CheckResult::NONE;
        }
        let Some(d) = ctx.raw_interval() else { return CheckResult::NONE };
        let fires = if d.abs() > self.limit {
            let fires = self.prev_sign != 0;
            self.prev_sign = sgn(d);
            fires
        } else {
            let fires = self.prev_sign != 0 && self.prev_sign == sgn(d);
            self.prev_sign = 0;
            fires
        };
        if fires {
            CheckResult { badness: self.badness, ugliness: self.ugliness }
        } else {
            CheckResult::NONE
        }
    }
}

/// Forbidden-interval check between a synchronized CF/CP pair.
#[derive(Debug, Clone)]
pub struct HarmonyInterval {
    /// Human-readable description.
    pub desc: String,
    interval: HashSet<i32>,
    badness: f64,
    ugliness: f64,
    octave: bool,
    signed: bool,
    not_first: bool,
    not_last: bool,
}

impl HarmonyInterval {
    /// Build a harmony-interval check forbidding any value in `interval`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        desc: impl Into<String>,
        interval: impl IntoIterator<Item = i32>,
        badness: f64,
        ugliness: f64,
        octave: bool,
        signed: bool,
        not_first: bool,
        not_last: bool,
    ) -> Self {
        Self { desc: desc.into(), interval: interval.into_iter().collect(), badness, ugliness, octave, signed, not_first, not_last }
    }

    fn interval_value(&self, ctx: &HarmonyCtx<'_>) -> Option<i32> {
        let mut d = ctx.raw_interval()?;
        if !self.signed {
            d = d.abs();
        }
        if self.octave {
            d = d.rem_euclid(12);
        }
        Some(d)
    }

    /// Run the check.
    pub fn check(&self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        let cf_first = ctx.cf_voice.is_first(ctx.cf);
        let cp_first = ctx.cp_voice.is_first(ctx.cp);
        let cf_last = ctx.cf_voice.is_last(ctx.cf);
        let cp_last = ctx.cp_voice.is_last(ctx.cp);
        if self.not_first && cf_first && cp_first {
            return CheckResult::NONE;
        }
        if self.not_last && cp_last && cf_last {
            return CheckResult::NONE;
        }
        let Some(d) = self.interval_value(ctx) else { return CheckResult::NONE };
        if self.interval.contains(&d) {
            CheckResult { badness: self.badness, ugliness: self.ugliness }
        } else {
            CheckResult::NONE
        }
    }
}

/// Inverted-membership harmony check applying only at the first
/// non-pause position of the tune: only intervals in `interval` are
/// *allowed* there.
#[derive(Debug, Clone)]
pub struct HarmonyFirstInterval {
    inner: HarmonyInterval,
}

impl HarmonyFirstInterval {
    /// Build the check. `inner`'s `not_first`/`not_last` flags are ignored.
    #[must_use]
    pub fn new(inner: HarmonyInterval) -> Self {
        Self { inner }
    }

    /// Human-readable description.
    #[must_use]
    pub fn desc(&self) -> &str {
        &self.inner.desc
    }

    /// Run the check.
    pub fn check(&self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        if ctx.cf_voice.get(ctx.cf).is_pause() || ctx.cp_voice.get(ctx.cp).is_pause() {
            return CheckResult::NONE;
        }
        let cpp = HarmonyCtx::is_first_non_pause(ctx.cp_voice, ctx.cp, None);
        let cfp = HarmonyCtx::is_first_non_pause(ctx.cf_voice, ctx.cf, None);
        if !cpp && !cfp {
            return CheckResult::NONE;
        }
        let cp_offset = (ctx.cp.bar, ctx.cp_voice.get(ctx.cp).offset());
        let cf_offset = (ctx.cf.bar, ctx.cf_voice.get(ctx.cf).offset());
        if cpp && !cfp && !HarmonyCtx::is_first_non_pause(ctx.cf_voice, ctx.cf, Some(cp_offset)) {
            return CheckResult::NONE;
        }
        if cfp && !cpp && !HarmonyCtx::is_first_non_pause(ctx.cp_voice, ctx.cp, Some(cf_offset)) {
            return CheckResult::NONE;
        }
        let Some(d) = ctx.raw_interval() else { return CheckResult::NONE };
        if self.inner.interval.contains(&d) {
            CheckResult::NONE
        } else {
            CheckResult { badness: self.inner.badness, ugliness: self.inner.ugliness }
        }
    }
}

/// Fires when the signed harmony interval exceeds `maximum`.
#[derive(Debug, Clone)]
pub struct HarmonyIntervalMax {
    /// Human-readable description.
    pub desc: String,
    maximum: i32,
    badness: f64,
    ugliness: f64,
}

impl HarmonyIntervalMax {
    /// Build the check.
    #[must_use]
    pub fn new(desc: impl Into<String>, maximum: i32, badness: f64, ugliness: f64) -> Self {
        Self { desc: desc.into(), maximum, badness, ugliness }
    }

    /// Run the check.
    pub fn check(&self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        match ctx.raw_interval() {
            Some(d) if d > self.maximum => CheckResult { badness: self.badness, ugliness: self.ugliness },
            _ => CheckResult::NONE,
        }
    }
}

/// Fires when the signed harmony interval falls below `minimum`.
#[derive(Debug, Clone)]
pub struct HarmonyIntervalMin {
    /// Human-readable description.
    pub desc: String,
    minimum: i32,
    badness: f64,
    ugliness: f64,
}

impl HarmonyIntervalMin {
    /// Build the check.
    #[must_use]
    pub fn new(desc: impl Into<String>, minimum: i32, badness: f64, ugliness: f64) -> Self {
        Self { desc: desc.into(), minimum, badness, ugliness }
    }

    /// Run the check.
    pub fn check(&self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        match ctx.raw_interval() {
            Some(d) if d < self.minimum => CheckResult { badness: self.badness, ugliness: self.ugliness },
            _ => CheckResult::NONE,
        }
    }
}

/// Fires when both voices jump (by more than `limit` semitones) between
/// the same pair of neighboring positions.
#[derive(Debug, Clone)]
pub struct MelodyJump2 {
    /// Human-readable description.
    pub desc: String,
    limit: i32,
    badness: f64,
    ugliness: f64,
}

impl MelodyJump2 {
    /// Build the check.
    #[must_use]
    pub fn new(desc: impl Into<String>, limit: i32, badness: f64, ugliness: f64) -> Self {
        Self { desc: desc.into(), limit, badness, ugliness }
    }

    /// Run the check.
    pub fn check(&self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        let Some(p_cp) = ctx.cp_prev() else { return CheckResult::NONE };
        let Some(p_cf) = ctx.aligned_in_cf(p_cp) else { return CheckResult::NONE };
        let (Some(cf_h), Some(p_cf_h), Some(cp_h), Some(p_cp_h)) = (
            ctx.cf_voice.get(ctx.cf).halftone(),
            ctx.cf_voice.get(p_cf).halftone(),
            ctx.cp_voice.get(ctx.cp).halftone(),
            ctx.cp_voice.get(p_cp).halftone(),
        ) else {
            return CheckResult::NONE;
        };
        let d1 = cf_h.offset() - p_cf_h.offset();
        let d2 = cp_h.offset() - p_cp_h.offset();
        if d1 > self.limit && d2 > self.limit {
            CheckResult { badness: self.badness, ugliness: self.ugliness }
        } else {
            CheckResult::NONE
        }
    }
}

/// [`HarmonyInterval`] that only fires on the second consecutive match
/// (used to forbid parallel perfect consonances).
#[derive(Debug, Clone)]
pub struct HarmonyHistory {
    inner: HarmonyInterval,
    prev_match: bool,
}

impl HarmonyHistory {
    /// Wrap a harmony-interval check with history tracking.
    #[must_use]
    pub fn new(inner: HarmonyInterval) -> Self {
        Self { inner, prev_match: false }
    }

    /// Clear the history bit; call once before each tune walk.
    pub fn reset(&mut self) {
        self.prev_match = false;
    }

    /// Run the underlying check, firing only on the second consecutive hit.
    pub fn check(&mut self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        let result = self.inner.check(ctx);
        let matched = result != CheckResult::NONE;
        let fires = self.prev_match && matched;
        self.prev_match = matched;
        if fires { result } else { CheckResult::NONE }
    }
}

/// Direction in which the two voices are required to move, relative to
/// each other, for [`HarmonyMelodyDirection`] to consider firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Both voices move in the same direction (and neither is stationary).
    Same,
    /// The voices move in different directions.
    Different,
    /// Both voices repeat their previous pitch.
    Zero,
}

/// Checks the harmonic interval *and* the relative direction of approach
/// of the two voices (e.g. to forbid parallel fifths/octaves reached by
/// similar motion).
#[derive(Debug, Clone)]
pub struct HarmonyMelodyDirection {
    /// Human-readable description.
    pub desc: String,
    interval: HashSet<i32>,
    badness: f64,
    ugliness: f64,
    octave: bool,
    dir: Direction,
    only_repeat: bool,
    prev_match: bool,
}

impl HarmonyMelodyDirection {
    /// Build the check.
    #[must_use]
    pub fn new(desc: impl Into<String>, interval: impl IntoIterator<Item = i32>, badness: f64, ugliness: f64, octave: bool, dir: Direction, only_repeat: bool) -> Self {
        Self { desc: desc.into(), interval: interval.into_iter().collect(), badness, ugliness, octave, dir, only_repeat, prev_match: false }
    }

    /// Clear the `only_repeat` memory; call once before each tune walk.
    pub fn reset(&mut self) {
        self.prev_match = false;
    }

    fn interval_value(&self, ctx: &HarmonyCtx<'_>) -> Option<i32> {
        let mut d = ctx.raw_interval()?;
        if self.octave {
            d = d.rem_euclid(12);
        }
        Some(d)
    }

    /// Run the check.
    pub fn check(&mut self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        let mut p_cp = ctx.cp_prev();
        let mut p_cf = ctx.cf_prev();
        if p_cp.is_none() && p_cf.is_none() {
            return CheckResult::NONE;
        }
        if p_cp.is_none() {
            p_cp = ctx.aligned_in_cp(p_cf.expect("checked above"));
        } else if p_cf.is_none() {
            p_cf = ctx.aligned_in_cf(p_cp.expect("checked above"));
        } else {
            let cp_key = (p_cp.expect("some").bar, ctx.cp_voice.get(p_cp.expect("some")).offset());
            let cf_key = (p_cf.expect("some").bar, ctx.cf_voice.get(p_cf.expect("some")).offset());
            if cp_key < cf_key {
                p_cp = ctx.aligned_in_cp(p_cf.expect("some"));
            } else {
                p_cf = ctx.aligned_in_cf(p_cp.expect("some"));
            }
        }
        let (Some(p_cp), Some(p_cf)) = (p_cp, p_cf) else { return CheckResult::NONE };
        let (Some(cf_h), Some(p_cf_h), Some(cp_h), Some(p_cp_h)) = (
            ctx.cf_voice.get(ctx.cf).halftone(),
            ctx.cf_voice.get(p_cf).halftone(),
            ctx.cp_voice.get(ctx.cp).halftone(),
            ctx.cp_voice.get(p_cp).halftone(),
        ) else {
            return CheckResult::NONE;
        };
        let Some(d) = self.interval_value(ctx) else { return CheckResult::NONE };
        let dir_cf = sgn(cf_h.offset() - p_cf_h.offset());
        let dir_cp = sgn(cp_h.offset() - p_cp_h.offset());
        let dir_ok = match self.dir {
            Direction::Same => dir_cf != 0 && dir_cf == dir_cp,
            Direction::Different => dir_cf == dir_cp,
            Direction::Zero => dir_cf == 0 && dir_cp == 0,
        };
        if (self.interval.is_empty() || self.interval.contains(&d)) && dir_ok {
            if !self.only_repeat || self.prev_match {
                self.prev_match = true;
                return CheckResult { badness: self.badness, ugliness: self.ugliness };
            }
        }
        CheckResult::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_pitch::halftone;
    use cpt_score::{BarObjectKind, Voice};

    fn tone(name: &str) -> BarObjectKind {
        BarObjectKind::Tone(halftone(name))
    }

    #[test]
    fn tritone_step_fires() {
        let mut v = Voice::new("cp");
        v.add_bar(8);
        v.add(0, tone("C"), 4, false).unwrap();
        let second = v.add(0, tone("^F"), 4, false).unwrap();
        let check = MelodyInterval::new("no tritone", [6], 10.0, 0.0, false, true);
        let ctx = MelodyCtx::new(&v, second);
        let result = check.check(&ctx);
        assert_eq!(result, CheckResult { badness: 10.0, ugliness: 0.0 });
    }

    #[test]
    fn tied_predecessor_suppresses_the_check() {
        let mut v = Voice::new("cp");
        v.add_bar(8);
        v.add(0, tone("C"), 4, true).unwrap();
        let second = v.add(0, tone("^F"), 4, false).unwrap();
        let check = MelodyInterval::new("no tritone", [6], 10.0, 0.0, false, true);
        let ctx = MelodyCtx::new(&v, second);
        assert_eq!(check.check(&ctx), CheckResult::NONE);
    }

    #[test]
    fn jump_fires_only_on_second_consecutive_jump() {
        let mut v = Voice::new("cp");
        v.add_bar(16);
        let a = v.add(0, tone("C"), 4, false).unwrap();
        let b = v.add(0, tone("A"), 4, false).unwrap();
        let c = v.add(0, tone("F"), 4, false).unwrap();
        let mut check = MelodyJump::new("Jump", 10.0, 0.0, 2);
        assert_eq!(check.check(&MelodyCtx::new(&v, a)), CheckResult::NONE);
        assert_eq!(check.check(&MelodyCtx::new(&v, b)), CheckResult::NONE);
        let result = check.check(&MelodyCtx::new(&v, c));
        assert_eq!(result, CheckResult { badness: 10.0, ugliness: 0.0 });
    }
}
