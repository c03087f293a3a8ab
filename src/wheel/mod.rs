//! Deterministic wheel core
//!
//! Everything here is plain state and math: no DOM, no schedulers, no audio.
//! The platform layer drives it through explicit events and carries out the
//! cues it requests.

pub mod segments;
pub mod session;
pub mod spin;
pub mod timer;

pub use segments::{PALETTE, RawSegment, Segment, SegmentSet};
pub use session::{Session, SessionEvent, SessionState, step};
pub use spin::{
    Easing, RandomSource, SpinEngine, SpinPlan, TickTracker, UniformSpin, winning_index,
};
pub use timer::{Timer, TimerTick, format_clock};
