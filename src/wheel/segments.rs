//! Segment model and the bounded, ordered segment set
//!
//! Raw input (persisted JSON, share payloads, editor rows) is loosely typed;
//! `SegmentSet::normalize` coerces it into full segments with unique ids and
//! palette colors. Validity is a separate predicate - editing transiently
//! allows blank labels, spinning does not.

use crate::consts::*;

/// Fixed wedge palette, cycled by segment index
pub const PALETTE: [&str; 12] = [
    "#6366f1", "#22c55e", "#f97316", "#ec4899", "#06b6d4", "#f59e0b", "#a855f7", "#10b981",
    "#ef4444", "#3b82f6", "#84cc16", "#fb7185",
];

/// One selectable option on the wheel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: u32,
    pub text: String,
    pub color: &'static str,
    /// Countdown assigned to this option, clamped [MIN_SECONDS, MAX_SECONDS]
    pub seconds: u32,
}

/// Loosely-typed input accepted by [`SegmentSet::normalize`]
#[derive(Debug, Clone, Default)]
pub struct RawSegment {
    pub id: Option<u32>,
    pub text: String,
    pub seconds: Option<u32>,
}

impl RawSegment {
    /// Empty slot (blank label, default duration)
    pub fn blank() -> Self {
        Self::default()
    }

    /// Label only; duration defaults
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            id: None,
            text: text.into(),
            seconds: None,
        }
    }

    /// Label with an explicit duration
    pub fn timed(text: impl Into<String>, seconds: u32) -> Self {
        Self {
            id: None,
            text: text.into(),
            seconds: Some(seconds),
        }
    }
}

impl From<&Segment> for RawSegment {
    fn from(seg: &Segment) -> Self {
        Self {
            id: Some(seg.id),
            text: seg.text.clone(),
            seconds: Some(seg.seconds),
        }
    }
}

/// Ordered collection of segments, length clamped [MIN_SEGMENTS, MAX_SEGMENTS]
/// by the operations that build it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentSet {
    segments: Vec<Segment>,
    next_id: u32,
}

impl SegmentSet {
    /// Coerce loose input into full segments: trim and cap labels, substitute
    /// the default duration for absent/zero ones, clamp the rest, cycle the
    /// palette, allocate ids where missing.
    pub fn normalize(raw: Vec<RawSegment>) -> Self {
        let mut next_id = raw
            .iter()
            .filter_map(|r| r.id)
            .max()
            .map_or(1, |max| max + 1);

        let segments = raw
            .into_iter()
            .enumerate()
            .map(|(index, r)| {
                let id = r.id.unwrap_or_else(|| {
                    let id = next_id;
                    next_id += 1;
                    id
                });
                Segment {
                    id,
                    text: clip_text(&r.text),
                    color: PALETTE[index % PALETTE.len()],
                    seconds: match r.seconds {
                        None | Some(0) => DEFAULT_SECONDS,
                        Some(s) => s.clamp(MIN_SECONDS, MAX_SECONDS),
                    },
                }
            })
            .collect();

        Self { segments, next_id }
    }

    /// A fresh all-blank set of `count` slots
    pub fn blank(count: usize) -> Self {
        let count = count.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        Self::normalize(vec![RawSegment::blank(); count])
    }

    /// Change the slot count: keep entries by position, pad with blanks,
    /// truncate extras. The count is clamped into range first.
    pub fn resize(&self, new_count: usize) -> Self {
        let count = new_count.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        let raw = (0..count)
            .map(|i| self.segments.get(i).map_or_else(RawSegment::blank, RawSegment::from))
            .collect();
        Self::normalize(raw)
    }

    /// True when the set is spinnable: enough slots, no blank labels, every
    /// duration at least the minimum
    pub fn validate(&self) -> bool {
        self.segments.len() >= MIN_SEGMENTS
            && self.segments.iter().all(|s| !s.text.trim().is_empty())
            && self.segments.iter().all(|s| s.seconds >= MIN_SECONDS)
    }

    /// Remove one slot; refused (and untouched) when that would leave fewer
    /// than the minimum
    pub fn delete(&mut self, index: usize) -> bool {
        if self.segments.len() <= MIN_SEGMENTS || index >= self.segments.len() {
            return false;
        }
        self.segments.remove(index);
        self.recolor();
        true
    }

    /// Replace one label in place (capped, not trimmed - editing may leave
    /// transient blanks)
    pub fn set_text(&mut self, index: usize, text: &str) -> bool {
        match self.segments.get_mut(index) {
            Some(seg) => {
                seg.text = text.chars().take(MAX_TEXT_CHARS).collect();
                true
            }
            None => false,
        }
    }

    /// Replace one duration in place; `None` (unparseable input) falls back
    /// to the default, everything else is clamped
    pub fn set_seconds(&mut self, index: usize, seconds: Option<u32>) -> bool {
        match self.segments.get_mut(index) {
            Some(seg) => {
                seg.seconds = match seconds {
                    None | Some(0) => DEFAULT_SECONDS,
                    Some(s) => s.clamp(MIN_SECONDS, MAX_SECONDS),
                };
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    pub fn as_slice(&self) -> &[Segment] {
        &self.segments
    }

    /// Reassign palette colors after a structural change
    fn recolor(&mut self) {
        for (index, seg) in self.segments.iter_mut().enumerate() {
            seg.color = PALETTE[index % PALETTE.len()];
        }
    }
}

/// Trim, then cap at the label length limit (char-wise, labels may be
/// non-ASCII)
fn clip_text(raw: &str) -> String {
    raw.trim().chars().take(MAX_TEXT_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_defaults() {
        let set = SegmentSet::normalize(vec![
            RawSegment::text("  padded  "),
            RawSegment::timed("timed", 120),
            RawSegment::timed("zero", 0),
            RawSegment::timed("huge", 10_000),
            RawSegment::blank(),
            RawSegment::text("a"),
            RawSegment::text("b"),
            RawSegment::text("c"),
        ]);

        assert_eq!(set.len(), 8);
        assert_eq!(set.get(0).unwrap().text, "padded");
        assert_eq!(set.get(0).unwrap().seconds, DEFAULT_SECONDS);
        assert_eq!(set.get(1).unwrap().seconds, 120);
        assert_eq!(set.get(2).unwrap().seconds, DEFAULT_SECONDS);
        assert_eq!(set.get(3).unwrap().seconds, MAX_SECONDS);
        assert_eq!(set.get(4).unwrap().text, "");
        for (i, seg) in set.iter().enumerate() {
            assert_eq!(seg.color, PALETTE[i % PALETTE.len()]);
        }
    }

    #[test]
    fn test_normalize_caps_label_length() {
        let long = "x".repeat(MAX_TEXT_CHARS + 40);
        let set = SegmentSet::normalize(vec![RawSegment::text(long); 8]);
        assert_eq!(set.get(0).unwrap().text.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_normalize_unique_ids() {
        let set = SegmentSet::blank(12);
        let mut ids: Vec<u32> = set.iter().map(|s| s.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn test_resize_preserves_by_position() {
        let set = SegmentSet::normalize(
            (0..10).map(|i| RawSegment::timed(format!("opt {i}"), 30)).collect(),
        );
        let kept_ids: Vec<u32> = set.iter().take(8).map(|s| s.id).collect();

        let shrunk = set.resize(8);
        assert_eq!(shrunk.len(), 8);
        assert_eq!(shrunk.iter().map(|s| s.id).collect::<Vec<_>>(), kept_ids);

        let grown = set.resize(14);
        assert_eq!(grown.len(), 14);
        assert_eq!(grown.get(9).unwrap().text, "opt 9");
        assert_eq!(grown.get(10).unwrap().text, "");
        assert_eq!(grown.get(10).unwrap().seconds, DEFAULT_SECONDS);
    }

    #[test]
    fn test_validate() {
        let mut set = SegmentSet::normalize(
            (0..8).map(|i| RawSegment::timed(format!("opt {i}"), 30)).collect(),
        );
        assert!(set.validate());

        set.set_text(3, "   ");
        assert!(!set.validate());

        set.set_text(3, "back");
        assert!(set.validate());

        assert!(!SegmentSet::blank(8).validate());
    }

    #[test]
    fn test_delete_rejected_at_minimum() {
        let mut set = SegmentSet::normalize(
            (0..8).map(|i| RawSegment::text(format!("opt {i}"))).collect(),
        );
        let before = set.clone();
        assert!(!set.delete(3));
        assert_eq!(set, before);
        assert_eq!(set.len(), 8);
    }

    #[test]
    fn test_delete_recolors() {
        let mut set = SegmentSet::normalize(
            (0..9).map(|i| RawSegment::text(format!("opt {i}"))).collect(),
        );
        assert!(set.delete(0));
        assert_eq!(set.len(), 8);
        for (i, seg) in set.iter().enumerate() {
            assert_eq!(seg.color, PALETTE[i % PALETTE.len()]);
        }
    }

    #[test]
    fn test_set_seconds_clamps() {
        let mut set = SegmentSet::blank(8);
        set.set_seconds(0, Some(3));
        assert_eq!(set.get(0).unwrap().seconds, MIN_SECONDS);
        set.set_seconds(0, Some(9999));
        assert_eq!(set.get(0).unwrap().seconds, MAX_SECONDS);
        set.set_seconds(0, None);
        assert_eq!(set.get(0).unwrap().seconds, DEFAULT_SECONDS);
        assert!(!set.set_seconds(99, Some(10)));
    }

    proptest! {
        #[test]
        fn prop_resize_length_colors_ids(start in 8usize..=20, target in 0usize..40) {
            let set = SegmentSet::blank(start);
            let resized = set.resize(target);

            let expected = target.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
            prop_assert_eq!(resized.len(), expected);

            let mut ids: Vec<u32> = resized.iter().map(|s| s.id).collect();
            ids.sort_unstable();
            ids.dedup();
            prop_assert_eq!(ids.len(), expected);

            for (i, seg) in resized.iter().enumerate() {
                prop_assert_eq!(seg.color, PALETTE[i % PALETTE.len()]);
            }
        }
    }
}
