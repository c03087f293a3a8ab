//! Spin planning, per-frame tick detection, and winner resolution
//!
//! The engine owns the cumulative rotation (degrees, only ever growing) and
//! the spin-in-flight flag. The visual transition and the frame clock live
//! outside; they consume the [`SpinPlan`] and feed elapsed time back into the
//! [`TickTracker`].

use rand::Rng;

use super::segments::{Segment, SegmentSet};
use crate::consts::*;
use crate::normalize_deg;

/// Source of spin magnitudes, injected so outcomes are reproducible under test
pub trait RandomSource {
    /// Degrees the next spin should travel
    fn spin_magnitude(&mut self) -> f64;
}

/// Draws uniformly from [SPIN_MIN_DEG, SPIN_MAX_DEG)
pub struct UniformSpin<R>(pub R);

impl<R: Rng> RandomSource for UniformSpin<R> {
    fn spin_magnitude(&mut self) -> f64 {
        self.0.random_range(SPIN_MIN_DEG..SPIN_MAX_DEG)
    }
}

/// Easing the visual rotation transition applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Easing {
    CubicOut,
}

impl Easing {
    /// Eased progress for linear progress `p` in [0, 1]
    pub fn apply(self, p: f64) -> f64 {
        match self {
            Easing::CubicOut => 1.0 - (1.0 - p).powi(3),
        }
    }
}

/// Immutable description of one spin, handed to the transition mechanism
#[derive(Debug, Clone, PartialEq)]
pub struct SpinPlan {
    /// Cumulative rotation the wheel must end up at
    pub target_rotation: f64,
    /// Degrees this spin travels
    pub magnitude: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

/// Cumulative rotation state and the spin-in-flight flag
#[derive(Debug, Clone)]
pub struct SpinEngine {
    rotation: f64,
    spinning: bool,
}

impl SpinEngine {
    /// Start from a restored rotation (0 on first run)
    pub fn new(rotation: f64) -> Self {
        Self {
            rotation: rotation.max(0.0),
            spinning: false,
        }
    }

    /// Total signed rotation accrued across all spins
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Draw a magnitude, advance the cumulative rotation, and return the plan.
    /// `None` while a spin is in flight or for a degenerate wheel.
    pub fn start_spin(
        &mut self,
        count: usize,
        rng: &mut dyn RandomSource,
    ) -> Option<SpinPlan> {
        if self.spinning || count < 2 {
            return None;
        }
        let magnitude = rng.spin_magnitude();
        self.rotation += magnitude;
        self.spinning = true;
        Some(SpinPlan {
            target_rotation: self.rotation,
            magnitude,
            duration_ms: SPIN_DURATION_MS,
            easing: Easing::CubicOut,
        })
    }

    /// The segment under the pointer at the current rotation. Clears the
    /// spin-in-flight flag; call only once the rotation transition has
    /// finished.
    pub fn resolve_winner<'a>(&mut self, set: &'a SegmentSet) -> &'a Segment {
        self.spinning = false;
        &set.as_slice()[winning_index(self.rotation, set.len())]
    }
}

/// Map a cumulative rotation to the slice under the fixed top pointer.
///
/// Slices are laid out clockwise from the top while rotation turns the wheel
/// clockwise past the pointer, so the winning angle runs opposite the
/// rotation: `(360 - rotation mod 360) mod 360`, divided by the slice angle.
pub fn winning_index(rotation: f64, count: usize) -> usize {
    let deg = normalize_deg(rotation);
    let winning = (360.0 - deg) % 360.0;
    let slice = 360.0 / count as f64;
    ((winning / slice) as usize).min(count - 1)
}

/// Per-frame tick detection: emits at most one tick cue per frame as the
/// eased rotation crosses slice boundaries, and goes inert at the end of the
/// planned duration.
#[derive(Debug, Clone)]
pub struct TickTracker {
    magnitude: f64,
    duration_ms: f64,
    easing: Easing,
    slice_deg: f64,
    last_index: u32,
    done: bool,
}

impl TickTracker {
    pub fn new(plan: &SpinPlan, count: usize) -> Self {
        Self {
            magnitude: plan.magnitude,
            duration_ms: plan.duration_ms,
            easing: plan.easing,
            slice_deg: 360.0 / count.max(1) as f64,
            last_index: 0,
            done: false,
        }
    }

    /// Advance to `elapsed_ms` since the spin began; true when a tick cue is
    /// due. Calls after the duration has elapsed are ignored.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if self.done {
            return false;
        }
        if elapsed_ms >= self.duration_ms {
            self.done = true;
            return false;
        }
        let p = (elapsed_ms / self.duration_ms).clamp(0.0, 1.0);
        let travelled = self.magnitude * self.easing.apply(p);
        let expected = (travelled / self.slice_deg) as u32;
        if expected > self.last_index {
            self.last_index = expected;
            true
        } else {
            false
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wheel::segments::{RawSegment, SegmentSet};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Test double with a scripted magnitude
    struct FixedSpin(f64);

    impl RandomSource for FixedSpin {
        fn spin_magnitude(&mut self) -> f64 {
            self.0
        }
    }

    fn eight_blanks() -> SegmentSet {
        SegmentSet::blank(8)
    }

    #[test]
    fn test_start_spin_advances_rotation() {
        let mut engine = SpinEngine::new(0.0);
        let plan = engine.start_spin(8, &mut FixedSpin(1800.0)).unwrap();

        assert_eq!(plan.magnitude, 1800.0);
        assert_eq!(plan.target_rotation, 1800.0);
        assert_eq!(plan.duration_ms, SPIN_DURATION_MS);
        assert_eq!(plan.easing, Easing::CubicOut);
        assert_eq!(engine.rotation(), 1800.0);
        assert!(engine.is_spinning());
    }

    #[test]
    fn test_start_spin_rejected_while_spinning() {
        let mut engine = SpinEngine::new(0.0);
        assert!(engine.start_spin(8, &mut FixedSpin(2000.0)).is_some());
        assert!(engine.start_spin(8, &mut FixedSpin(2000.0)).is_none());
        // Rotation untouched by the rejected call
        assert_eq!(engine.rotation(), 2000.0);
    }

    #[test]
    fn test_start_spin_rejected_for_degenerate_wheel() {
        let mut engine = SpinEngine::new(0.0);
        assert!(engine.start_spin(1, &mut FixedSpin(2000.0)).is_none());
        assert!(!engine.is_spinning());
    }

    #[test]
    fn test_uniform_spin_window() {
        let mut rng = UniformSpin(Pcg32::seed_from_u64(42));
        for _ in 0..100 {
            let m = rng.spin_magnitude();
            assert!((SPIN_MIN_DEG..SPIN_MAX_DEG).contains(&m));
        }
    }

    #[test]
    fn test_winner_at_full_turn_boundary() {
        // Exact multiples of 360 leave the top slice under the pointer
        assert_eq!(winning_index(720.0, 8), 0);
        assert_eq!(winning_index(0.0, 8), 0);
        assert_eq!(winning_index(1800.0, 8), 0);
    }

    #[test]
    fn test_winner_quarter_turn() {
        // 90 degrees clockwise brings the last quarter's slice to the top
        assert_eq!(winning_index(90.0, 4), 3);
        assert_eq!(winning_index(450.0, 4), 3);
    }

    #[test]
    fn test_resolve_winner_clears_flag() {
        let set = eight_blanks();
        let mut engine = SpinEngine::new(0.0);
        engine.start_spin(set.len(), &mut FixedSpin(1800.0)).unwrap();

        let winner = engine.resolve_winner(&set);
        assert_eq!(winner.id, set.get(0).unwrap().id);
        assert!(!engine.is_spinning());
    }

    #[test]
    fn test_tick_tracker_emits_once_per_boundary() {
        let plan = SpinPlan {
            target_rotation: 1800.0,
            magnitude: 1800.0,
            duration_ms: SPIN_DURATION_MS,
            easing: Easing::CubicOut,
        };
        let mut tracker = TickTracker::new(&plan, 8);

        // Early frame: eased travel has already crossed a 45-degree boundary
        assert!(tracker.advance(100.0));
        // Same elapsed time again: no new boundary, no tick
        assert!(!tracker.advance(100.0));
        // Later frame crosses more boundaries but emits a single cue
        assert!(tracker.advance(400.0));
    }

    #[test]
    fn test_tick_tracker_terminates() {
        let plan = SpinPlan {
            target_rotation: 1800.0,
            magnitude: 1800.0,
            duration_ms: SPIN_DURATION_MS,
            easing: Easing::CubicOut,
        };
        let mut tracker = TickTracker::new(&plan, 8);

        assert!(!tracker.advance(SPIN_DURATION_MS));
        assert!(tracker.is_done());
        assert!(!tracker.advance(SPIN_DURATION_MS + 500.0));
        assert!(!tracker.advance(100.0));
    }

    proptest! {
        #[test]
        fn prop_winning_index_in_range(rotation in 0.0f64..36_000.0, count in 8usize..=20) {
            prop_assert!(winning_index(rotation, count) < count);
        }

        #[test]
        fn prop_winning_index_period_360(rotation in 0.0f64..3600.0, count in 8usize..=20) {
            prop_assert_eq!(
                winning_index(rotation, count),
                winning_index(rotation + 360.0, count)
            );
        }

        #[test]
        fn prop_resolution_deterministic(rotation in 0.0f64..36_000.0, count in 8usize..=20) {
            let set = SegmentSet::normalize(
                (0..count).map(|i| RawSegment::text(format!("opt {i}"))).collect(),
            );
            let mut a = SpinEngine::new(rotation);
            let mut b = SpinEngine::new(rotation);
            prop_assert_eq!(a.resolve_winner(&set).id, b.resolve_winner(&set).id);
        }
    }
}
