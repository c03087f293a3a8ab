//! Best-effort LocalStorage persistence
//!
//! Three independent entries: slot count, the segment array, and the
//! cumulative rotation. Reads fall back to defaults on absence or
//! corruption; writes are fire-and-forget. Native builds carry no store and
//! always start from defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::wheel::segments::SegmentSet;

/// LocalStorage keys (used only in wasm32)
#[allow(dead_code)]
const KEY_COUNT: &str = "wheel_count_v2";
#[allow(dead_code)]
const KEY_SEGMENTS: &str = "wheel_segments_v2";
#[allow(dead_code)]
const KEY_ROTATION: &str = "wheel_rotation_v2";

/// Persisted per-segment form
#[derive(Debug, Serialize, Deserialize)]
struct StoredSegment {
    text: String,
    #[serde(default)]
    seconds: u32,
}

/// Everything restored at startup
#[derive(Debug, Clone)]
pub struct StoredConfig {
    pub segments: SegmentSet,
    pub rotation: f64,
}

impl Default for StoredConfig {
    fn default() -> Self {
        Self {
            segments: SegmentSet::blank(MIN_SEGMENTS),
            rotation: 0.0,
        }
    }
}

/// Load persisted state (WASM only)
#[cfg(target_arch = "wasm32")]
pub fn load() -> StoredConfig {
    use crate::wheel::segments::RawSegment;

    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();
    let Some(storage) = storage else {
        return StoredConfig::default();
    };

    let mut count = MIN_SEGMENTS;
    if let Ok(Some(raw)) = storage.get_item(KEY_COUNT) {
        if let Ok(n) = raw.trim().parse::<usize>() {
            count = n.clamp(MIN_SEGMENTS, MAX_SEGMENTS);
        }
    }

    let mut segments = None;
    if let Ok(Some(json)) = storage.get_item(KEY_SEGMENTS) {
        if let Ok(stored) = serde_json::from_str::<Vec<StoredSegment>>(&json) {
            if stored.len() >= MIN_SEGMENTS {
                let raw = stored
                    .into_iter()
                    .map(|s| RawSegment::timed(s.text, s.seconds))
                    .collect();
                segments = Some(SegmentSet::normalize(raw));
            }
        }
    }
    let segments = segments.unwrap_or_else(|| SegmentSet::blank(count));

    let mut rotation = 0.0;
    if let Ok(Some(raw)) = storage.get_item(KEY_ROTATION) {
        if let Ok(r) = raw.trim().parse::<f64>() {
            if r.is_finite() {
                rotation = r.max(0.0);
            }
        }
    }

    log::info!(
        "Restored {} segments, rotation {:.1} degrees",
        segments.len(),
        rotation
    );
    StoredConfig { segments, rotation }
}

/// Persist the full configuration (WASM only); failures are swallowed
#[cfg(target_arch = "wasm32")]
pub fn save(segments: &SegmentSet, rotation: f64) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();
    let Some(storage) = storage else { return };

    let _ = storage.set_item(KEY_COUNT, &segments.len().to_string());

    let stored: Vec<StoredSegment> = segments
        .iter()
        .map(|s| StoredSegment {
            text: s.text.clone(),
            seconds: s.seconds,
        })
        .collect();
    if let Ok(json) = serde_json::to_string(&stored) {
        let _ = storage.set_item(KEY_SEGMENTS, &json);
    }

    let _ = storage.set_item(KEY_ROTATION, &rotation.to_string());
}

/// Persist only the rotation (spins save their target immediately)
#[cfg(target_arch = "wasm32")]
pub fn save_rotation(rotation: f64) {
    let storage = web_sys::window()
        .and_then(|w| w.local_storage().ok())
        .flatten();
    if let Some(storage) = storage {
        let _ = storage.set_item(KEY_ROTATION, &rotation.to_string());
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub fn load() -> StoredConfig {
    StoredConfig::default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save(_segments: &SegmentSet, _rotation: f64) {
    // No-op for native
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_rotation(_rotation: f64) {
    // No-op for native
}
