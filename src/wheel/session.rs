//! Session orchestration: view flow, spin lifecycle, winner countdown
//!
//! The session value is the only shared mutable state in the system. Every
//! transition goes through the pure [`step`] function; the [`Session`]
//! orchestrator applies engine side effects only after a transition is
//! accepted, so callbacks can never leave the two halves disagreeing.

use super::segments::{Segment, SegmentSet};
use super::spin::{RandomSource, SpinEngine, SpinPlan};
use super::timer::Timer;

/// Where the session is; `WinnerShown` owns the per-winner timer
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Editing segments; spinning disabled
    Setup,
    /// Wheel visible, idle
    Wheel,
    /// Rotation transition in flight; everything but completion is locked
    Spinning,
    /// Winner revealed with its countdown
    WinnerShown { winner: Segment, timer: Timer },
}

/// Inputs the state machine reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    EnterWheel,
    Back,
    SpinStarted,
    SpinCompleted(Segment),
    Dismiss,
}

/// Pure transition function; `None` is a rejected event
pub fn step(state: &SessionState, event: SessionEvent) -> Option<SessionState> {
    use SessionEvent::*;
    use SessionState::*;

    match (state, event) {
        (Setup, EnterWheel) => Some(Wheel),
        // Back works from the wheel and from a shown winner, never mid-spin
        (Wheel | WinnerShown { .. }, Back) => Some(Setup),
        // Spinning again from a shown winner dismisses it implicitly
        (Wheel | WinnerShown { .. }, SpinStarted) => Some(Spinning),
        (Spinning, SpinCompleted(winner)) => {
            let timer = Timer::for_seconds(winner.seconds);
            Some(WinnerShown { winner, timer })
        }
        (WinnerShown { .. }, Dismiss) => Some(Wheel),
        _ => None,
    }
}

/// Owns the segment set, the spin engine, and the session state
#[derive(Debug)]
pub struct Session {
    pub segments: SegmentSet,
    pub engine: SpinEngine,
    state: SessionState,
}

impl Session {
    pub fn new(segments: SegmentSet, rotation: f64) -> Self {
        Self {
            segments,
            engine: SpinEngine::new(rotation),
            state: SessionState::Setup,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_spinning(&self) -> bool {
        matches!(self.state, SessionState::Spinning)
    }

    /// Setup -> wheel view; refused until the set validates
    pub fn enter_wheel(&mut self) -> bool {
        if !self.segments.validate() {
            return false;
        }
        self.apply(SessionEvent::EnterWheel)
    }

    /// Back navigation; refused while spinning
    pub fn back(&mut self) -> bool {
        self.apply(SessionEvent::Back)
    }

    /// Start a spin. `None` in setup, while already spinning, or for a
    /// degenerate wheel.
    pub fn spin(&mut self, rng: &mut dyn RandomSource) -> Option<SpinPlan> {
        if !matches!(
            self.state,
            SessionState::Wheel | SessionState::WinnerShown { .. }
        ) {
            return None;
        }
        let plan = self.engine.start_spin(self.segments.len(), rng)?;
        self.apply(SessionEvent::SpinStarted);
        Some(plan)
    }

    /// The rotation-transition completion signal: resolve and reveal the
    /// winner. `None` when no spin is in flight (stale or duplicate signals).
    pub fn transition_complete(&mut self) -> Option<Segment> {
        if !self.is_spinning() {
            return None;
        }
        let winner = self.engine.resolve_winner(&self.segments).clone();
        self.apply(SessionEvent::SpinCompleted(winner.clone()));
        Some(winner)
    }

    /// Dismiss the winner banner; its timer is discarded with it
    pub fn dismiss(&mut self) -> bool {
        self.apply(SessionEvent::Dismiss)
    }

    /// Winner currently shown, if any
    pub fn winner(&self) -> Option<&Segment> {
        match &self.state {
            SessionState::WinnerShown { winner, .. } => Some(winner),
            _ => None,
        }
    }

    pub fn timer(&self) -> Option<&Timer> {
        match &self.state {
            SessionState::WinnerShown { timer, .. } => Some(timer),
            _ => None,
        }
    }

    pub fn timer_mut(&mut self) -> Option<&mut Timer> {
        match &mut self.state {
            SessionState::WinnerShown { timer, .. } => Some(timer),
            _ => None,
        }
    }

    /// Wholesale replacement (import, resize); refused mid-spin
    pub fn replace_segments(&mut self, segments: SegmentSet) -> bool {
        if self.is_spinning() {
            return false;
        }
        self.segments = segments;
        true
    }

    fn apply(&mut self, event: SessionEvent) -> bool {
        match step(&self.state, event) {
            Some(next) => {
                self.state = next;
                true
            }
            None => false,
        }
    }
}
