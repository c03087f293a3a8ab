//! Wheel rendering as a pure display list
//!
//! [`render`] maps a surface size and a segment set to drawing primitives.
//! It knows nothing about canvases or rotation: the platform layer replays
//! the list onto whatever surface it has, and the rotation transition spins
//! that surface underneath the fixed top pointer. Identical inputs always
//! produce an identical [`WheelDrawing`].

pub mod text;

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;

use crate::wheel::segments::SegmentSet;
use text::{TextMeasure, fit_label};

/// Styling shared with whatever replays the drawing
pub const BACKDROP_COLOR: &str = "#0f172a";
pub const SEPARATOR_COLOR: &str = "rgba(255,255,255,.92)";
pub const SEPARATOR_WIDTH: f32 = 4.0;
pub const HUB_COLOR: &str = "rgba(255,255,255,.08)";
pub const LABEL_COLOR: &str = "white";
pub const LABEL_SHADOW_COLOR: &str = "rgba(0,0,0,.28)";
pub const LABEL_SHADOW_BLUR: f32 = 6.0;

/// Layout fractions of the wheel radius
const RADIUS_FRACTION: f32 = 0.48;
const BACKDROP_MARGIN: f32 = 8.0;
const HUB_FRACTION: f32 = 0.08;
const LABEL_OFFSET_FRACTION: f32 = 0.60;
const LABEL_MAX_WIDTH_FRACTION: f32 = 0.70;

/// A filled disc
#[derive(Debug, Clone, PartialEq)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
    pub color: &'static str,
}

/// A fitted slice label, anchored along the slice's angular midpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    /// Post-fit text; may be empty for blank slots
    pub text: String,
    /// Angular midpoint of the slice (radians)
    pub angle: f32,
    /// Radial distance of the anchor from the center
    pub offset: f32,
    pub font_px: f32,
}

/// One colored slice with its label
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    /// Start angle in radians; slice 0 opens at the top pointer
    pub start_angle: f32,
    pub end_angle: f32,
    pub color: &'static str,
    pub label: Label,
}

/// Everything needed to paint one frame of the (unrotated) wheel
#[derive(Debug, Clone, PartialEq)]
pub struct WheelDrawing {
    pub center: Vec2,
    pub radius: f32,
    pub backdrop: Disc,
    pub wedges: Vec<Wedge>,
    pub hub: Disc,
}

/// Label size steps down once the wheel gets crowded
pub fn font_px(count: usize) -> f32 {
    if count > 8 { 22.0 } else { 26.0 }
}

/// Glyph budget for truncated labels, ellipsis included
fn glyph_budget(count: usize) -> usize {
    if count > 10 { 14 } else { 18 }
}

/// Produce the display list for `set` on a `size` surface
pub fn render(size: (f32, f32), set: &SegmentSet, measure: &dyn TextMeasure) -> WheelDrawing {
    let (w, h) = size;
    let center = Vec2::new(w / 2.0, h / 2.0);
    let radius = w.min(h) * RADIUS_FRACTION;

    let count = set.len().max(1);
    let slice = TAU / count as f32;
    let font = font_px(count);
    let budget = glyph_budget(count);
    let max_width = radius * LABEL_MAX_WIDTH_FRACTION;

    let wedges = set
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let start = i as f32 * slice - FRAC_PI_2;
            let end = start + slice;
            Wedge {
                start_angle: start,
                end_angle: end,
                color: seg.color,
                label: Label {
                    text: fit_label(measure, &seg.text, max_width, font, budget),
                    angle: (start + end) / 2.0,
                    offset: radius * LABEL_OFFSET_FRACTION,
                    font_px: font,
                },
            }
        })
        .collect();

    WheelDrawing {
        center,
        radius,
        backdrop: Disc {
            center,
            radius: radius + BACKDROP_MARGIN,
            color: BACKDROP_COLOR,
        },
        wedges,
        hub: Disc {
            center,
            radius: radius * HUB_FRACTION,
            color: HUB_COLOR,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::text::{ELLIPSIS, HeuristicMeasure};
    use super::*;
    use crate::wheel::segments::{RawSegment, SegmentSet};

    fn set_of(count: usize) -> SegmentSet {
        SegmentSet::normalize(
            (0..count).map(|i| RawSegment::text(format!("opt {i}"))).collect(),
        )
    }

    #[test]
    fn test_slice_zero_opens_at_top() {
        let drawing = render((500.0, 500.0), &set_of(8), &HeuristicMeasure);
        assert_eq!(drawing.wedges.len(), 8);

        let first = &drawing.wedges[0];
        assert!((first.start_angle - (-FRAC_PI_2)).abs() < 1e-6);
        let slice = TAU / 8.0;
        assert!((first.end_angle - first.start_angle - slice).abs() < 1e-6);

        // Slices tile the full circle
        let last = drawing.wedges.last().unwrap();
        assert!((last.end_angle - (TAU - FRAC_PI_2)).abs() < 1e-4);
    }

    #[test]
    fn test_layout_fractions() {
        let drawing = render((500.0, 400.0), &set_of(8), &HeuristicMeasure);
        let radius = 400.0 * RADIUS_FRACTION;
        assert!((drawing.radius - radius).abs() < 1e-6);
        assert!((drawing.backdrop.radius - (radius + BACKDROP_MARGIN)).abs() < 1e-6);
        assert!((drawing.hub.radius - radius * HUB_FRACTION).abs() < 1e-6);
        assert!((drawing.wedges[0].label.offset - radius * LABEL_OFFSET_FRACTION).abs() < 1e-6);
        assert_eq!(drawing.center, Vec2::new(250.0, 200.0));
    }

    #[test]
    fn test_font_steps_down_when_crowded() {
        let eight = render((500.0, 500.0), &set_of(8), &HeuristicMeasure);
        assert_eq!(eight.wedges[0].label.font_px, 26.0);

        let twelve = render((500.0, 500.0), &set_of(12), &HeuristicMeasure);
        assert_eq!(twelve.wedges[0].label.font_px, 22.0);
    }

    #[test]
    fn test_crowded_wheel_truncates_long_labels() {
        let mut set = set_of(12);
        set.set_text(0, "an exceptionally long challenge label");
        let drawing = render((500.0, 500.0), &set, &HeuristicMeasure);

        let label = &drawing.wedges[0].label;
        assert!(label.text.chars().count() <= 14);
        assert!(label.text.ends_with(ELLIPSIS));
        // Short labels on the same wheel stay intact
        assert_eq!(drawing.wedges[1].label.text, "opt 1");
    }

    #[test]
    fn test_wedge_colors_follow_segments() {
        let set = set_of(8);
        let drawing = render((500.0, 500.0), &set, &HeuristicMeasure);
        for (wedge, seg) in drawing.wedges.iter().zip(set.iter()) {
            assert_eq!(wedge.color, seg.color);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let set = set_of(12);
        let a = render((640.0, 480.0), &set, &HeuristicMeasure);
        let b = render((640.0, 480.0), &set, &HeuristicMeasure);
        assert_eq!(a, b);
    }
}
