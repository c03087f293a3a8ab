//! Spin Wheel - a challenge picker with per-option countdown timers
//!
//! Core modules:
//! - `wheel`: Deterministic core (segments, spin resolution, session/timer state)
//! - `renderer`: Pure wheel drawing (display list + adaptive label fitting)
//! - `share`: URL-safe configuration tokens
//! - `storage`: Best-effort LocalStorage persistence
//! - `audio`: Procedural tick/win sound cues

pub mod audio;
pub mod renderer;
pub mod share;
pub mod storage;
pub mod wheel;

pub use audio::{AudioManager, SoundEffect};
pub use wheel::segments::{PALETTE, RawSegment, Segment, SegmentSet};
pub use wheel::session::{Session, SessionState};
pub use wheel::spin::{RandomSource, SpinEngine, SpinPlan, TickTracker, UniformSpin};
pub use wheel::timer::Timer;

/// Wheel configuration constants
pub mod consts {
    /// Segment count bounds
    pub const MIN_SEGMENTS: usize = 8;
    pub const MAX_SEGMENTS: usize = 20;

    /// Per-segment countdown bounds (seconds)
    pub const MIN_SECONDS: u32 = 5;
    pub const MAX_SECONDS: u32 = 600;
    /// Substituted when a duration is absent or unusable
    pub const DEFAULT_SECONDS: u32 = 60;

    /// Label length cap (chars)
    pub const MAX_TEXT_CHARS: usize = 100;

    /// Visual rotation transition length
    pub const SPIN_DURATION_MS: f64 = 5000.0;
    /// Spin magnitude window: 5 to 10 full turns
    pub const SPIN_MIN_DEG: f64 = 1800.0;
    pub const SPIN_MAX_DEG: f64 = 3600.0;
}

/// Normalize a cumulative rotation to [0, 360)
#[inline]
pub fn normalize_deg(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}
