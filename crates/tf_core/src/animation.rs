//! Sprite-sheet animation state machine for atlas-packed characters.
//!
//! Every animated sprite owns a base cell in the shared atlas. The idle,
//! run and hit strips live on the same row, reached by column offset from
//! that base cell (columns 0..4 idle, 4..8 run, 8..12 hit), so one
//! `AtlasRect` fully describes a character.
//!
//! The frame index cycles with period 4 and advances only on even global
//! frame counts, halving the apparent animation rate relative to the tick
//! rate. Hit is a one-shot: sampling the hit strip clears the flag, so a
//! hit is visible for exactly one rendered frame.

/// A rectangle into the shared texture atlas, in atlas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl AtlasRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// The cell `columns` cell-widths to the right of this one.
    fn shifted(self, columns: usize) -> Self {
        Self {
            x: self.x + columns as f32 * self.w,
            ..self
        }
    }
}

/// Horizontal draw orientation. Only affects mirroring at draw time,
/// never which cell is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

/// What a sprite sheet actually contains. A sheet without a run strip
/// stays on the idle strip no matter what the state flags say; same for
/// hit. Degrading is policy, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub can_run: bool,
    pub can_hit: bool,
}

impl Capabilities {
    pub const FULL: Self = Self {
        can_run: true,
        can_hit: true,
    };

    pub const RUN_ONLY: Self = Self {
        can_run: true,
        can_hit: false,
    };

    pub const STATIC: Self = Self {
        can_run: false,
        can_hit: false,
    };
}

const FRAME_CYCLE: usize = 4;
const RUN_COLUMN_OFFSET: usize = 4;
const HIT_COLUMN_OFFSET: usize = 8;

/// Per-entity animation state: behavioural mode, cycling frame index and
/// facing, bound to one base cell of the atlas.
#[derive(Debug, Clone)]
pub struct SpriteAnimator {
    base: AtlasRect,
    caps: Capabilities,
    frame_index: usize,
    running: bool,
    hit: bool,
    facing: Facing,
}

impl SpriteAnimator {
    pub fn new(base: AtlasRect, caps: Capabilities) -> Self {
        Self {
            base,
            caps,
            frame_index: 0,
            running: false,
            hit: false,
            facing: Facing::default(),
        }
    }

    /// Source cell dimensions, before any draw-time scaling.
    pub fn cell_size(&self) -> (f32, f32) {
        (self.base.w, self.base.h)
    }

    /// Enter the running mode, keeping the current facing.
    pub fn run(&mut self) {
        self.running = true;
    }

    /// Enter the running mode facing the given way.
    pub fn run_facing(&mut self, facing: Facing) {
        self.running = true;
        self.facing = facing;
    }

    pub fn idle(&mut self) {
        self.running = false;
    }

    /// Arm the one-shot hit. The next `sample` on a hit-capable sheet
    /// returns a hit cell and disarms it.
    pub fn trigger_hit(&mut self) {
        self.hit = true;
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the quad should be drawn horizontally mirrored.
    pub fn mirrored(&self) -> bool {
        self.facing == Facing::Left
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Step the frame index for this tick. Only even global frame counts
    /// advance, so the strip plays at half the tick rate.
    pub fn advance(&mut self, frame_count: u64) {
        if frame_count % 2 == 0 {
            self.frame_index = (self.frame_index + 1) % FRAME_CYCLE;
        }
    }

    /// The atlas cell to draw this tick. Sampling a hit cell clears the
    /// hit flag, which is what makes the hit a one-shot.
    pub fn sample(&mut self) -> AtlasRect {
        if self.caps.can_hit && self.hit {
            self.hit = false;
            self.base.shifted(self.frame_index + HIT_COLUMN_OFFSET)
        } else if self.caps.can_run && self.running {
            self.base.shifted(self.frame_index + RUN_COLUMN_OFFSET)
        } else {
            self.base.shifted(self.frame_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> AtlasRect {
        AtlasRect::new(128.0, 64.0, 16.0, 28.0)
    }

    fn animator(caps: Capabilities) -> SpriteAnimator {
        SpriteAnimator::new(base(), caps)
    }

    #[test]
    fn idle_samples_base_strip() {
        let mut anim = animator(Capabilities::FULL);
        let rect = anim.sample();
        assert_eq!(rect, base());
    }

    #[test]
    fn advance_only_on_even_frame_counts() {
        let mut anim = animator(Capabilities::FULL);
        let mut advances = 0;
        let mut last = anim.sample().x;
        for frame_count in 1..=10u64 {
            anim.advance(frame_count);
            let x = anim.sample().x;
            if x != last {
                advances += 1;
            }
            last = x;
        }
        // Frame counts 2, 4, 6, 8, 10 advance; odd counts do not.
        assert_eq!(advances, 5);
    }

    #[test]
    fn frame_index_cycles_with_period_four() {
        let mut anim = animator(Capabilities::FULL);
        let start = anim.sample();
        for frame_count in [2u64, 4, 6, 8] {
            anim.advance(frame_count);
        }
        // Four advances bring the index back to where it started.
        assert_eq!(anim.sample(), start);
    }

    #[test]
    fn running_uses_second_strip() {
        let mut anim = animator(Capabilities::FULL);
        anim.run();
        let rect = anim.sample();
        assert_eq!(rect.x, base().x + 4.0 * base().w);
        assert_eq!(rect.y, base().y);
    }

    #[test]
    fn hit_uses_third_strip_and_clears() {
        let mut anim = animator(Capabilities::FULL);
        anim.trigger_hit();
        let rect = anim.sample();
        assert_eq!(rect.x, base().x + 8.0 * base().w);
        // One-shot: the very next sample is back on the idle strip.
        assert_eq!(anim.sample(), base());
    }

    #[test]
    fn hit_clears_back_to_running_when_running() {
        let mut anim = animator(Capabilities::FULL);
        anim.run();
        anim.trigger_hit();
        let hit = anim.sample();
        assert_eq!(hit.x, base().x + 8.0 * base().w);
        let after = anim.sample();
        assert_eq!(after.x, base().x + 4.0 * base().w);
    }

    #[test]
    fn run_without_capability_degrades_to_idle() {
        let mut anim = animator(Capabilities::STATIC);
        anim.run();
        assert_eq!(anim.sample(), base());
    }

    #[test]
    fn hit_without_capability_degrades() {
        let mut anim = animator(Capabilities::RUN_ONLY);
        anim.trigger_hit();
        assert_eq!(anim.sample(), base());
        anim.run();
        anim.trigger_hit();
        let rect = anim.sample();
        assert_eq!(rect.x, base().x + 4.0 * base().w);
    }

    #[test]
    fn facing_changes_mirroring_not_cell() {
        let mut anim = animator(Capabilities::FULL);
        anim.run_facing(Facing::Left);
        assert!(anim.mirrored());
        let left = anim.sample();
        anim.run_facing(Facing::Right);
        assert!(!anim.mirrored());
        let right = anim.sample();
        assert_eq!(left, right);
    }

    #[test]
    fn run_keeps_previous_facing() {
        let mut anim = animator(Capabilities::FULL);
        anim.run_facing(Facing::Left);
        anim.idle();
        anim.run();
        assert_eq!(anim.facing(), Facing::Left);
    }
}
