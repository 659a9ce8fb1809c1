//! Views over a [`cpt_score::Voice`] that the checks operate on.

use cpt_score::{ObjectRef, Voice};

/// A single bar object being checked, plus its voice.
#[derive(Debug, Clone, Copy)]
pub struct MelodyCtx<'a> {
    /// The voice the object belongs to.
    pub voice: &'a Voice,
    /// The object currently under examination.
    pub current: ObjectRef,
}

impl<'a> MelodyCtx<'a> {
    /// Build a melody context.
    #[must_use]
    pub fn new(voice: &'a Voice, current: ObjectRef) -> Self {
        Self { voice, current }
    }

    /// The previous object in the voice, crossing bar boundaries.
    #[must_use]
    pub fn prev(&self) -> Option<ObjectRef> {
        self.voice.prev(self.current)
    }

    /// `current.halftone.offset - prev.halftone.offset`, `None` if either
    /// side is a pause or there is no predecessor.
    #[must_use]
    pub fn raw_interval(&self) -> Option<i32> {
        let prev = self.prev()?;
        let cur_h = self.voice.get(self.current).halftone()?;
        let prev_h = self.voice.get(prev).halftone()?;
        Some(cur_h.offset() - prev_h.offset())
    }

    /// Whether the previous object is tied into `current`.
    #[must_use]
    pub fn prev_is_bound(&self) -> bool {
        self.prev().is_some_and(|p| self.voice.get(p).bind())
    }
}

/// A synchronized cantus-firmus / contrapunctus pair being checked.
#[derive(Debug, Clone, Copy)]
pub struct HarmonyCtx<'a> {
    /// The cantus-firmus voice.
    pub cf_voice: &'a Voice,
    /// The cantus-firmus object paired at this instant.
    pub cf: ObjectRef,
    /// The contrapunctus voice.
    pub cp_voice: &'a Voice,
    /// The contrapunctus object paired at this instant.
    pub cp: ObjectRef,
}

impl<'a> HarmonyCtx<'a> {
    /// Build a harmony context. Callers must ensure `cf` and `cp` overlap.
    #[must_use]
    pub fn new(cf_voice: &'a Voice, cf: ObjectRef, cp_voice: &'a Voice, cp: ObjectRef) -> Self {
        Self { cf_voice, cf, cp_voice, cp }
    }

    /// `cp.halftone.offset - cf.halftone.offset`, `None` if either side is
    /// a pause.
    #[must_use]
    pub fn raw_interval(&self) -> Option<i32> {
        let cf_h = self.cf_voice.get(self.cf).halftone()?;
        let cp_h = self.cp_voice.get(self.cp).halftone()?;
        Some(cp_h.offset() - cf_h.offset())
    }

    /// The CP's predecessor, crossing bar boundaries in the CP voice.
    #[must_use]
    pub fn cp_prev(&self) -> Option<ObjectRef> {
        self.cp_voice.prev(self.cp)
    }

    /// The CF's predecessor, crossing bar boundaries in the CF voice.
    #[must_use]
    pub fn cf_prev(&self) -> Option<ObjectRef> {
        self.cf_voice.prev(self.cf)
    }

    /// Locate, in the other voice's bar with the same index as `of`'s
    /// bar, the object whose range contains `of`'s offset. CF and CP
    /// share bar indices even when their internal grids differ.
    #[must_use]
    pub fn aligned_in_cf(&self, of: ObjectRef) -> Option<ObjectRef> {
        let offset = self.cp_voice.get(of).offset();
        self.cf_voice.get_by_offset(of.bar, offset)
    }

    /// Symmetric to [`Self::aligned_in_cf`], locating into the CP voice.
    #[must_use]
    pub fn aligned_in_cp(&self, of: ObjectRef) -> Option<ObjectRef> {
        let offset = self.cf_voice.get(of).offset();
        self.cp_voice.get_by_offset(of.bar, offset)
    }

    /// Whether `obj` is the first non-pause object of its voice, optionally
    /// bounded to not look past `(bar, offset)` in the other voice's timeline.
    #[must_use]
    pub fn is_first_non_pause(voice: &Voice, obj: ObjectRef, bound: Option<(usize, u32)>) -> bool {
        if voice.get(obj).is_pause() {
            return false;
        }
        let mut p = obj;
        loop {
            if voice.is_first(p) {
                return true;
            }
            if let Some((bar, offset)) = bound {
                let p_off = voice.get(p).offset();
                if p.bar < bar || (p.bar == bar && p_off <= offset) {
                    return true;
                }
            }
            let Some(prev) = voice.prev(p) else { return false };
            if !voice.get(prev).is_pause() {
                return false;
            }
            p = prev;
        }
    }
}
