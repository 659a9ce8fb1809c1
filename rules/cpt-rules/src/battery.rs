//! Named rule batteries: `default` and `special`, each bundling a
//! melody-CF list, a melody-CP list, and a harmony list.

use crate::checks::{
    CheckResult, Direction, HarmonyFirstInterval, HarmonyHistory, HarmonyInterval, HarmonyIntervalMax, HarmonyIntervalMin, HarmonyMelodyDirection,
    MelodyHistory, MelodyInterval, MelodyJump, MelodyJump2,
};
use crate::context::{HarmonyCtx, MelodyCtx};

/// A melody-rule slot: either a plain interval check, a history-wrapped
/// one, or the jump state machine. Grouped behind one enum so a battery
/// can hold a flat, ordered `Vec` the way the original's rule lists do.
#[derive(Debug, Clone)]
pub enum MelodyRule {
    /// A forbidden-interval check.
    Interval(MelodyInterval),
    /// A forbidden-interval check that only fires on repetition.
    History(MelodyHistory),
    /// The jump/same-direction-after-jump state machine.
    Jump(MelodyJump),
}

impl MelodyRule {
    /// Run the rule, updating any internal history state.
    pub fn check(&mut self, ctx: &MelodyCtx<'_>) -> CheckResult {
        match self {
            MelodyRule::Interval(r) => r.check(ctx),
            MelodyRule::History(r) => r.check(ctx),
            MelodyRule::Jump(r) => r.check(ctx),
        }
    }

    /// Clear per-evaluation history state, if any.
    pub fn reset(&mut self) {
        match self {
            MelodyRule::Interval(_) => {}
            MelodyRule::History(r) => r.reset(),
            MelodyRule::Jump(r) => r.reset(),
        }
    }
}

/// A harmony-rule slot, analogous to [`MelodyRule`].
#[derive(Debug, Clone)]
pub enum HarmonyRule {
    /// A forbidden-interval check.
    Interval(HarmonyInterval),
    /// The inverted-membership first-interval check.
    First(HarmonyFirstInterval),
    /// A signed-interval upper bound.
    Max(HarmonyIntervalMax),
    /// A signed-interval lower bound.
    Min(HarmonyIntervalMin),
    /// The two-voices-jump-together check.
    Jump2(MelodyJump2),
    /// A forbidden-interval check that only fires on repetition (parallel
    /// perfect consonances).
    History(HarmonyHistory),
    /// An interval + relative-direction check.
    Direction(HarmonyMelodyDirection),
}

impl HarmonyRule {
    /// Run the rule, updating any internal history state.
    pub fn check(&mut self, ctx: &HarmonyCtx<'_>) -> CheckResult {
        match self {
            HarmonyRule::Interval(r) => r.check(ctx),
            HarmonyRule::First(r) => r.check(ctx),
            HarmonyRule::Max(r) => r.check(ctx),
            HarmonyRule::Min(r) => r.check(ctx),
            HarmonyRule::Jump2(r) => r.check(ctx),
            HarmonyRule::History(r) => r.check(ctx),
            HarmonyRule::Direction(r) => r.check(ctx),
        }
    }

    /// Clear per-evaluation history state, if any.
    pub fn reset(&mut self) {
        match self {
            HarmonyRule::History(r) => r.reset(),
            HarmonyRule::Direction(r) => r.reset(),
            _ => {}
        }
    }
}

/// A named battery: melody rules for the CF voice, melody rules for the
/// CP voice, and harmony rules relating the two.
#[derive(Debug, Clone)]
pub struct Battery {
    /// Rules applied to each new cantus-firmus object.
    pub melody_cf: Vec<MelodyRule>,
    /// Rules applied to each new contrapunctus object.
    pub melody_cp: Vec<MelodyRule>,
    /// Rules applied to each synchronized CF/CP pair.
    pub harmony: Vec<HarmonyRule>,
}

impl Battery {
    /// Reset every history-aware rule in the battery. Call once before
    /// each tune walk.
    #[tracing::instrument(skip(self))]
    pub fn reset(&mut self) {
        for r in &mut self.melody_cf {
            r.reset();
        }
        for r in &mut self.melody_cp {
            r.reset();
        }
        for r in &mut self.harmony {
            r.reset();
        }
    }
}

/// The `default` battery, reproducing `old_melody_checks_cf`,
/// `old_melody_checks_cp`, and `old_harmony_checks`.
///
/// 0.1.2: "Permitted melodic intervals are the perfect fourth, fifth, and
/// octave, as well as the major and minor second, major and minor third,
/// and ascending minor sixth." Forbidden halftone steps: unison, tritone,
/// major/minor seventh.
#[must_use]
pub fn default_battery() -> Battery {
    let melody_cf = vec![
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no seventh (Septime)", [10, 11], 10.0, 0.0, false, true)),
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no Devils interval", [6], 10.0, 0.0, false, true)),
        MelodyRule::Interval(MelodyInterval::new("0.1.2: No unison (Prim) allowed", [0], 10.0, 0.0, false, false)),
        MelodyRule::Interval(MelodyInterval::new("5 or 7", [5, 7], 0.0, 1.0, false, false)),
        MelodyRule::Interval(MelodyInterval::new("8 or 9", [8, 9], 0.0, 10.0, false, false)),
        MelodyRule::Interval(MelodyInterval::new("Octave", [12], 0.0, 2.0, false, false)),
        MelodyRule::Jump(MelodyJump::new("Jump", 10.0, 0.0, 2)),
    ];
    let melody_cp = vec![
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no seventh (Septime)", [10, 11], 10.0, 0.0, false, true)),
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no Devils interval", [6], 10.0, 0.0, false, true)),
        MelodyRule::History(MelodyHistory::new(MelodyInterval::new("0.1.2: No consecutive unison (Prim) allowed", [0], 10.0, 0.0, false, false))),
        MelodyRule::Jump(MelodyJump::new("Jump", 10.0, 0.0, 2)),
    ];
    let harmony = vec![
        HarmonyRule::Interval(HarmonyInterval::new("1.2: Use no unisons except at the beginning or end", [0], 10.0, 0.0, false, false, true, true)),
        HarmonyRule::Interval(HarmonyInterval::new("No Sekund", [1, 2], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Interval(HarmonyInterval::new("Magdalena: 5/6 verboten", [5, 6], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Interval(HarmonyInterval::new("Magdalena: 10/11 verboten", [10, 11], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Max(HarmonyIntervalMax::new("max. 16", 16, 10.0, 0.0)),
        HarmonyRule::Max(HarmonyIntervalMax::new("Magdalena: intervals above octave should be avoided", 12, 0.0, 1.0)),
        HarmonyRule::Min(HarmonyIntervalMin::new("Contrapunctus voice must be *up*", 0, 10.0, 0.0)),
        HarmonyRule::First(HarmonyFirstInterval::new(HarmonyInterval::new(
            "1.1. Begin and end on either unison, octave, fifth, unless the added part is underneath, in which case begin and end only on unison or octave.",
            [0, 7, 12],
            100.0,
            0.0,
            false,
            false,
            false,
            false,
        ))),
        HarmonyRule::Jump2(MelodyJump2::new("Not both voices may jump", 2, 10.0, 0.0)),
    ];
    Battery { melody_cf, melody_cp, harmony }
}

/// The `special` battery, reproducing `magi_melody_checks_cf`,
/// `magi_harmony_checks`, and the well-defined prefix of
/// `magi_melody_checks_cp` (the original also references
/// `Check_Melody_laMotte_Jump` / `Check_Melody_Avoid_Eighth_Jump` /
/// `Check_Melody_Quarter_Jump` / `Check_Passing_Tone`, which are never
/// defined in the source and the module containing them does not even
/// parse — that tail is dropped here, not ported).
#[must_use]
pub fn special_battery() -> Battery {
    let melody_cf = default_battery().melody_cf;
    let melody_cp = vec![
        MelodyRule::Interval(MelodyInterval::new("no big sixth, no downwards little sixth", [9, -8], 1.5, 0.0, true, false)),
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no Devils interval", [6], 1.7, 0.0, false, true)),
        MelodyRule::History(MelodyHistory::new(MelodyInterval::new("0.1.2: No consecutive unison (Prim) allowed", [0], 1.1, 0.0, false, false))),
        MelodyRule::Interval(MelodyInterval::new("0.1.2: no seventh (Septime)", [10, 11], 1.5, 0.0, false, true)),
    ];
    let harmony = vec![
        HarmonyRule::Interval(HarmonyInterval::new("1.2: Use no unisons except at the beginning or end", [0], 10.0, 0.0, false, false, true, true)),
        HarmonyRule::Interval(HarmonyInterval::new("No Sekund", [1, 2], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Interval(HarmonyInterval::new("Magdalena: 5/6 verboten", [5, 6], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Interval(HarmonyInterval::new("Magdalena: 10/11 verboten", [10, 11], 10.0, 0.0, true, false, false, false)),
        HarmonyRule::Max(HarmonyIntervalMax::new("Distance between voices should not exceed Duodezime", 19, 10.0, 0.0)),
        HarmonyRule::First(HarmonyFirstInterval::new(HarmonyInterval::new(
            "1.1. Begin and end on either unison, octave, fifth, unless the added part is underneath, in which case begin and end only on unison or octave.",
            [0, 7, 12, -12],
            100.0,
            0.0,
            false,
            false,
            false,
            false,
        ))),
        HarmonyRule::Jump2(MelodyJump2::new("Both voices may not jump", 2, 10.0, 0.0)),
        HarmonyRule::Direction(HarmonyMelodyDirection::new(
            "Magdalena: Ensure that the last direction (from where is the fifth or octave approached) is different.",
            [0, 7, 12],
            9.0,
            0.0,
            false,
            Direction::Same,
            false,
        )),
        HarmonyRule::History(HarmonyHistory::new(HarmonyInterval::new("Magdalena: Avoid parallel unison, octaves, fifths", [0, 7, 12], 9.0, 0.0, false, false, false, false))),
    ];
    Battery { melody_cf, melody_cp, harmony }
}

/// Look up a battery by the name used on the CLI (`"default"` or
/// `"special"`).
#[must_use]
pub fn named(name: &str) -> Option<Battery> {
    match name {
        "default" => Some(default_battery()),
        "special" => Some(special_battery()),
        _ => {
            tracing::debug!(name, "no rule battery registered under this name");
            None
        }
    }
}
