//! Spin/winner sound cues using the Web Audio API
//!
//! Procedurally synthesized oscillators - no audio assets. Native builds
//! accept the same requests and drop them.

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, GainNode, OscillatorNode};

/// Cue kinds the core requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// One slice boundary crossed during the spin
    SpinTick,
    /// Winner revealed, or the countdown ran out
    Win,
}

/// Owns the audio context and the user's mute preference
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    enabled: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    #[cfg(target_arch = "wasm32")]
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx, enabled: true }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Sound toggle; silences both cues
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Resume the context (browsers require a user gesture first)
    #[cfg(target_arch = "wasm32")]
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn resume(&self) {}

    /// Play a cue
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        if !self.enabled {
            return;
        }
        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::SpinTick => self.play_tick(ctx),
            SoundEffect::Win => self.play_win(ctx),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _effect: SoundEffect) {}

    /// Oscillator wired through a gain node to the output
    #[cfg(target_arch = "wasm32")]
    fn create_osc(&self, ctx: &AudioContext) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Faint 500 Hz blip, one per slice boundary
    #[cfg(target_arch = "wasm32")]
    fn play_tick(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value(500.0);
        gain.gain().set_value(0.05);

        osc.start().ok();
        osc.stop_with_when(t + 0.05).ok();
    }

    /// Rising 400 to 800 Hz sweep for the winner
    #[cfg(target_arch = "wasm32")]
    fn play_win(&self, ctx: &AudioContext) {
        let Some((osc, gain)) = self.create_osc(ctx) else {
            return;
        };
        let t = ctx.current_time();

        osc.frequency().set_value_at_time(400.0, t).ok();
        osc.frequency()
            .linear_ramp_to_value_at_time(800.0, t + 0.3)
            .ok();
        gain.gain().set_value(0.2);

        osc.start().ok();
        osc.stop_with_when(t + 0.6).ok();
    }
}
