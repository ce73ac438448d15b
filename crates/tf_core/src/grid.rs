//! Grid snapping for the tile editor.
//!
//! Snapping floors a continuous coordinate to the nearest lower multiple
//! of a pitch. The cursor indicator and tile placement snap with two
//! independent pitches: they default to the same value, but a coarser
//! cursor pitch is a supported configuration rather than an accident of
//! which code path computed it.

use glam::Vec2;

/// Pitches used by the editor, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    /// Pitch tile placement and removal snap to.
    pub placement_pitch: f32,
    /// Pitch the hover cursor indicator snaps to.
    pub cursor_pitch: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            placement_pitch: 32.0,
            cursor_pitch: 32.0,
        }
    }
}

/// Floor `value` to the nearest lower multiple of `pitch`.
pub fn snap(value: f32, pitch: f32) -> f32 {
    (value / pitch).floor() * pitch
}

/// Snap both components of a point to the given pitch.
pub fn snap_point(point: Vec2, pitch: f32) -> Vec2 {
    Vec2::new(snap(point.x, pitch), snap(point.y, pitch))
}
