//! Per-winner countdown timer
//!
//! Pure sub-machine; the 1 Hz interval itself belongs to the platform layer,
//! which calls [`Timer::tick`] and honors the returned signal.

use crate::consts::DEFAULT_SECONDS;

/// Outcome of one 1-second tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not running; nothing happened
    Idle,
    /// Decremented, still counting
    Counting,
    /// Reached zero: auto-stopped, win cue due
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    remaining: u32,
    base: u32,
    running: bool,
}

impl Timer {
    /// Timer for a freshly revealed winner; a zero duration falls back to the
    /// default
    pub fn for_seconds(seconds: u32) -> Self {
        let base = if seconds == 0 { DEFAULT_SECONDS } else { seconds };
        Self {
            remaining: base,
            base,
            running: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Begin counting; refused when already running or nothing remains.
    /// Returns whether the caller should arm the interval.
    pub fn start(&mut self) -> bool {
        if self.remaining == 0 || self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Idempotent; the caller cancels the interval either way
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stop and restore the full duration
    pub fn reset(&mut self) {
        self.stop();
        self.remaining = self.base;
    }

    /// Returns whether the timer is running afterwards
    pub fn toggle(&mut self) -> bool {
        if self.running {
            self.stop();
            false
        } else {
            self.start()
        }
    }

    /// One second elapsed on the external interval
    pub fn tick(&mut self) -> TimerTick {
        if !self.running {
            return TimerTick::Idle;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            TimerTick::Finished
        } else {
            TimerTick::Counting
        }
    }
}

/// `m:ss` clock display
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_duration_falls_back() {
        let timer = Timer::for_seconds(0);
        assert_eq!(timer.base(), DEFAULT_SECONDS);
        assert_eq!(timer.remaining(), DEFAULT_SECONDS);
    }

    #[test]
    fn test_tick_counts_down_and_finishes() {
        let mut timer = Timer::for_seconds(2);
        assert!(timer.start());
        assert_eq!(timer.tick(), TimerTick::Counting);
        assert_eq!(timer.remaining(), 1);
        assert_eq!(timer.tick(), TimerTick::Finished);
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.is_running());
        // Inert after auto-stop
        assert_eq!(timer.tick(), TimerTick::Idle);
    }

    #[test]
    fn test_stop_idempotent() {
        let mut timer = Timer::for_seconds(10);
        timer.start();
        timer.tick();
        timer.stop();
        let after_one = timer.clone();
        timer.stop();
        assert_eq!(timer, after_one);
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 9);
    }

    #[test]
    fn test_start_refused_at_zero() {
        let mut timer = Timer::for_seconds(1);
        timer.start();
        timer.tick();
        assert_eq!(timer.remaining(), 0);
        assert!(!timer.start());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_start_refused_while_running() {
        let mut timer = Timer::for_seconds(10);
        assert!(timer.start());
        assert!(!timer.start());
    }

    #[test]
    fn test_reset_restores_base() {
        let mut timer = Timer::for_seconds(30);
        timer.start();
        timer.tick();
        timer.tick();
        timer.reset();
        assert_eq!(timer.remaining(), 30);
        assert!(!timer.is_running());
    }

    #[test]
    fn test_toggle() {
        let mut timer = Timer::for_seconds(10);
        assert!(timer.toggle());
        assert!(timer.is_running());
        assert!(!timer.toggle());
        assert!(!timer.is_running());
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(60), "1:00");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(125), "2:05");
    }
}
