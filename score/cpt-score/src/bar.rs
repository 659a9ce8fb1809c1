//! Bars and the bar objects (tones, pauses) they contain.

use cpt_pitch::Halftone;

use crate::errors::ScoreError;
use crate::fraction::Fraction;

/// What a [`BarObject`] is: a sounding tone or a silent pause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarObjectKind {
    /// A sounding tone at the given pitch.
    Tone(Halftone),
    /// A silent pause.
    Pause,
}

/// One event within a [`Bar`]: a tone or pause, its duration in bar
/// units, and whether it is tied (`bind`) to the following object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarObject {
    kind: BarObjectKind,
    duration: u32,
    bind: bool,
    idx: usize,
    offset: u32,
}

impl BarObject {
    /// The tone or pause this object represents.
    #[must_use]
    pub fn kind(&self) -> &BarObjectKind {
        &self.kind
    }

    /// The halftone sounded, or `None` for a pause.
    #[must_use]
    pub fn halftone(&self) -> Option<&Halftone> {
        match &self.kind {
            BarObjectKind::Tone(h) => Some(h),
            BarObjectKind::Pause => None,
        }
    }

    /// Duration in units of the bar's capacity.
    #[must_use]
    pub fn duration(&self) -> u32 {
        self.duration
    }

    /// Whether this object is a pause rather than a sounding tone.
    #[must_use]
    pub fn is_pause(&self) -> bool {
        matches!(self.kind, BarObjectKind::Pause)
    }

    /// Whether this object is tied to the next.
    #[must_use]
    pub fn bind(&self) -> bool {
        self.bind
    }

    /// Index within its bar, assigned at insertion.
    #[must_use]
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Sum of durations of every preceding object in the bar.
    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Absolute length in tune-units: `duration / unit`.
    #[must_use]
    pub fn abslen(&self, unit_den: u32) -> f64 {
        f64::from(self.duration) / f64::from(unit_den)
    }

    /// Replace the sounding pitch of a [`BarObjectKind::Tone`] in place,
    /// e.g. after transposition. No-op on a pause.
    pub fn set_halftone(&mut self, halftone: Halftone) {
        if matches!(self.kind, BarObjectKind::Tone(_)) {
            self.kind = BarObjectKind::Tone(halftone);
        }
    }
}

/// An ordered sequence of [`BarObject`]s whose durations sum to
/// `capacity`. Objects are appended via [`Bar::add`]; their `offset`
/// and `idx` are assigned exactly once, at insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bar {
    capacity: u32,
    objects: Vec<BarObject>,
    idx: usize,
}

impl Bar {
    pub(crate) fn new(capacity: u32, idx: usize) -> Self {
        Self { capacity, objects: Vec::new(), idx }
    }

    /// Bar capacity in duration units.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Index of this bar within its voice.
    #[must_use]
    pub fn idx(&self) -> usize {
        self.idx
    }

    /// Sum of durations committed so far.
    #[must_use]
    pub fn dur_sum(&self) -> u32 {
        self.objects.last().map_or(0, |o| o.offset + o.duration)
    }

    /// Whether the bar's duration sum equals its capacity.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.dur_sum() == self.capacity
    }

    /// The bar's objects in insertion order.
    #[must_use]
    pub fn objects(&self) -> &[BarObject] {
        &self.objects
    }

    /// Mutable access to the bar's objects, e.g. for in-place transposition.
    pub fn objects_mut(&mut self) -> &mut [BarObject] {
        &mut self.objects
    }

    /// Append a tone or pause. Fails with [`ScoreError::OverfullBar`] if
    /// the cumulative duration would exceed [`Bar::capacity`].
    pub fn add(&mut self, kind: BarObjectKind, duration: u32, bind: bool) -> Result<usize, ScoreError> {
        let sum = self.dur_sum();
        if sum + duration > self.capacity {
            return Err(ScoreError::OverfullBar { bar_idx: self.idx, sum, added: duration, capacity: self.capacity });
        }
        let idx = self.objects.len();
        self.objects.push(BarObject { kind, duration, bind, idx, offset: sum });
        Ok(idx)
    }

    /// Locate, via binary search on strictly ascending `offset`, the
    /// rightmost object whose time range contains `offset` (i.e. the
    /// last object with `object.offset <= offset`).
    #[must_use]
    pub fn get_by_offset(&self, offset: u32) -> Option<usize> {
        if self.objects.is_empty() {
            return None;
        }
        match self.objects.binary_search_by_key(&offset, BarObject::offset) {
            Ok(idx) => Some(idx),
            Err(0) => None,
            Err(idx) => Some(idx - 1),
        }
    }

    /// Rescale every duration (and the capacity) by `factor`, failing if
    /// any would become non-integer. Called on a clone during the dry-run
    /// phase of [`crate::Tune::set_unit`].
    pub(crate) fn rescale(&mut self, factor: Fraction) -> Result<(), ScoreError> {
        if !factor.scales_to_integer(i64::from(self.capacity)) {
            return Err(ScoreError::NonIntegerRescale);
        }
        self.capacity = factor.scale(i64::from(self.capacity)) as u32;
        let mut offset = 0u32;
        for obj in &mut self.objects {
            if !factor.scales_to_integer(i64::from(obj.duration)) {
                return Err(ScoreError::NonIntegerRescale);
            }
            obj.duration = factor.scale(i64::from(obj.duration)) as u32;
            obj.offset = offset;
            offset += obj.duration;
        }
        Ok(())
    }
}
