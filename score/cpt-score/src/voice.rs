//! Voices: ordered sequences of bars, with neighbor navigation that
//! transparently crosses bar boundaries.

use std::collections::HashMap;

use crate::bar::{Bar, BarObject, BarObjectKind};
use crate::errors::ScoreError;

/// A non-owning handle to one [`BarObject`] within a [`Voice`]: a
/// `(bar index, object index)` pair. Cheap to copy, and the natural
/// substitute for the original's `prev`/`next` pointers, which would
/// otherwise form reference cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectRef {
    /// Index of the bar within the voice.
    pub bar: usize,
    /// Index of the object within that bar.
    pub obj: usize,
}

/// An ordered sequence of [`Bar`]s plus an id and a property map
/// (clef, name, short name, ...) taken from the voice's `V:` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    id: String,
    properties: HashMap<String, String>,
    bars: Vec<Bar>,
}

impl Voice {
    /// Start a new, empty voice.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), properties: HashMap::new(), bars: Vec::new() }
    }

    /// The voice's id, as declared in its `V:` header.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Property map (`clef`, `name`, `snm`, ...).
    #[must_use]
    pub fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Set a property, as parsed from the voice's `V:` header.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    /// This voice's bars, in order.
    #[must_use]
    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub(crate) fn bars_mut(&mut self) -> &mut [Bar] {
        &mut self.bars
    }

    /// Append a new, empty bar of the given capacity and return its index.
    pub fn add_bar(&mut self, capacity: u32) -> usize {
        let idx = self.bars.len();
        self.bars.push(Bar::new(capacity, idx));
        idx
    }

    /// Append an object to the bar at `bar_idx`.
    ///
    /// # Errors
    /// Propagates [`ScoreError::OverfullBar`] from the target bar.
    pub fn add(&mut self, bar_idx: usize, kind: BarObjectKind, duration: u32, bind: bool) -> Result<ObjectRef, ScoreError> {
        let obj = self.bars[bar_idx].add(kind, duration, bind)?;
        Ok(ObjectRef { bar: bar_idx, obj })
    }

    /// Resolve a handle to its object.
    #[must_use]
    pub fn get(&self, r: ObjectRef) -> &BarObject {
        &self.bars[r.bar].objects()[r.obj]
    }

    /// The in-voice predecessor of `r`, crossing bar boundaries: at the
    /// start of a bar this is the last object of the previous bar (or
    /// `None` if that bar is empty or `r` is the voice's first bar).
    #[must_use]
    pub fn prev(&self, r: ObjectRef) -> Option<ObjectRef> {
        if r.obj > 0 {
            return Some(ObjectRef { bar: r.bar, obj: r.obj - 1 });
        }
        if r.bar == 0 {
            return None;
        }
        let prev_bar = &self.bars[r.bar - 1];
        let last = prev_bar.objects().len().checked_sub(1)?;
        Some(ObjectRef { bar: r.bar - 1, obj: last })
    }

    /// The in-voice successor of `r`, crossing bar boundaries
    /// symmetrically to [`Voice::prev`].
    #[must_use]
    pub fn next(&self, r: ObjectRef) -> Option<ObjectRef> {
        let bar = &self.bars[r.bar];
        if r.obj + 1 < bar.objects().len() {
            return Some(ObjectRef { bar: r.bar, obj: r.obj + 1 });
        }
        let next_bar = self.bars.get(r.bar + 1)?;
        if next_bar.objects().is_empty() {
            return None;
        }
        Some(ObjectRef { bar: r.bar + 1, obj: 0 })
    }

    /// Whether `r` is the very first object of the voice.
    #[must_use]
    pub fn is_first(&self, r: ObjectRef) -> bool {
        self.prev(r).is_none()
    }

    /// Whether `r` is the very last object of the voice.
    #[must_use]
    pub fn is_last(&self, r: ObjectRef) -> bool {
        self.next(r).is_none()
    }

    /// Locate, in bar `bar_idx`, the object whose time-range contains
    /// `offset`, via [`Bar::get_by_offset`].
    #[must_use]
    pub fn get_by_offset(&self, bar_idx: usize, offset: u32) -> Option<ObjectRef> {
        self.bars[bar_idx].get_by_offset(offset).map(|obj| ObjectRef { bar: bar_idx, obj })
    }

    /// Whether the time ranges of `a` (in `self`) and `b` (in `other`)
    /// overlap, comparing `(bar index, offset)` pairs as a single
    /// timeline (valid because every bar starts at offset zero).
    #[must_use]
    pub fn overlaps(&self, a: ObjectRef, other: &Voice, b: ObjectRef) -> bool {
        let ao = self.get(a);
        let bo = other.get(b);
        let a_start = (a.bar, ao.offset());
        let a_end = (a.bar, ao.offset() + ao.duration());
        let b_start = (b.bar, bo.offset());
        let b_end = (b.bar, bo.offset() + bo.duration());
        a_start < b_end && b_start < a_end
    }

    /// Transpose every tone in this voice by `steps` semitones, spelled
    /// relative to `key`. The same per-tone transformation
    /// [`crate::Tune::transpose`] applies to every voice of a tune at
    /// once; this lets a standalone voice (e.g. an externally supplied
    /// cantus firmus, before it joins a tune) be transposed on its own.
    pub fn transpose(&mut self, steps: i32, key: &cpt_pitch::Key) {
        for bar in &mut self.bars {
            for obj in bar.objects_mut() {
                if let BarObjectKind::Tone(h) = obj.kind() {
                    let new_tone = h.transpose(steps, key);
                    obj.set_halftone(new_tone);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpt_pitch::halftone;

    fn tone(name: &str) -> BarObjectKind {
        BarObjectKind::Tone(halftone(name))
    }

    #[test]
    fn neighbors_cross_bar_boundaries() {
        let mut v = Voice::new("1");
        v.add_bar(8);
        v.add_bar(8);
        let a = v.add(0, tone("C"), 8, false).unwrap();
        let b = v.add(1, tone("D"), 8, false).unwrap();
        assert_eq!(v.next(a), Some(b));
        assert_eq!(v.prev(b), Some(a));
        assert!(v.is_first(a));
        assert!(v.is_last(b));
    }

    #[test]
    fn empty_neighboring_bar_yields_none() {
        let mut v = Voice::new("1");
        v.add_bar(8);
        v.add_bar(8);
        let a = v.add(0, tone("C"), 8, false).unwrap();
        assert_eq!(v.next(a), None);
    }

    #[test]
    fn transpose_shifts_every_tone_in_the_voice() {
        let mut v = Voice::new("1");
        v.add_bar(8);
        let a = v.add(0, tone("C"), 8, false).unwrap();
        v.transpose(2, &cpt_pitch::Key::new(0));
        assert_eq!(v.get(a).halftone(), Some(&halftone("D")));
    }

    #[test]
    fn get_by_offset_takes_rightmost_at_or_below() {
        let mut v = Voice::new("1");
        v.add_bar(8);
        v.add(0, tone("C"), 4, false).unwrap();
        v.add(0, tone("D"), 4, false).unwrap();
        assert_eq!(v.get_by_offset(0, 0).map(|r| r.obj), Some(0));
        assert_eq!(v.get_by_offset(0, 3).map(|r| r.obj), Some(0));
        assert_eq!(v.get_by_offset(0, 4).map(|r| r.obj), Some(1));
    }
}
