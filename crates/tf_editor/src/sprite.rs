//! Puppet sprites: the on-screen animated characters and enemies.
//!
//! A puppet's position lives in world coordinates (y grows upward); the
//! destination rectangle flips it against the window height at draw time,
//! so moving "up" moves up the screen.

use glam::Vec2;

use tf_core::animation::SpriteAnimator;

use crate::batch::{DestRect, SceneBatch};
use crate::catalog::SheetDefinition;
use crate::tiles::PIXEL_SCALE;

pub struct PuppetSprite {
    pub name: String,
    pub pos: Vec2,
    pub animator: SpriteAnimator,
}

impl PuppetSprite {
    pub fn new(def: &SheetDefinition, pos: Vec2) -> Self {
        Self {
            name: def.name.clone(),
            pos,
            animator: SpriteAnimator::new(def.rect, def.caps),
        }
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.pos = pos;
    }

    /// Screen-space destination, anchored at the puppet's position and
    /// flipped against the window height.
    pub fn dest_rect(&self, win_height: f32) -> DestRect {
        let (w, h) = self.animator.cell_size();
        DestRect {
            x: self.pos.x,
            y: win_height - (self.pos.y + h) * PIXEL_SCALE,
            w: w * PIXEL_SCALE,
            h: h * PIXEL_SCALE,
        }
    }

    /// Depth key for splicing the puppet into the wall pass: the top edge
    /// of its destination rectangle, the same convention wall cells use.
    pub fn depth(&self, win_height: f32) -> f32 {
        self.dest_rect(win_height).y
    }

    /// Advance the animation for this tick and emit the puppet's quad.
    pub fn render(
        &mut self,
        frame_count: u64,
        win_height: f32,
        atlas_size: (u32, u32),
        batch: &mut SceneBatch,
    ) {
        self.animator.advance(frame_count);
        let src = self.animator.sample();
        let dest = self.dest_rect(win_height);
        batch.push_sprite(atlas_size, src, dest, self.animator.mirrored());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tf_core::animation::{AtlasRect, Capabilities, Facing};

    fn sheet() -> SheetDefinition {
        SheetDefinition {
            name: "knight".to_string(),
            rect: AtlasRect::new(128.0, 68.0, 16.0, 28.0),
            caps: Capabilities::FULL,
        }
    }

    #[test]
    fn dest_rect_flips_world_y_to_screen_y() {
        let puppet = PuppetSprite::new(&sheet(), Vec2::new(100.0, 100.0));
        let dest = puppet.dest_rect(720.0);
        assert_eq!(dest.x, 100.0);
        assert_eq!(dest.y, 720.0 - (100.0 + 28.0) * 2.0);
        assert_eq!(dest.w, 32.0);
        assert_eq!(dest.h, 56.0);
    }

    #[test]
    fn moving_up_in_world_space_moves_up_the_screen() {
        let low = PuppetSprite::new(&sheet(), Vec2::new(0.0, 50.0));
        let high = PuppetSprite::new(&sheet(), Vec2::new(0.0, 150.0));
        assert!(high.depth(720.0) < low.depth(720.0));
    }

    #[test]
    fn render_emits_one_mirrored_quad_when_facing_left() {
        let mut puppet = PuppetSprite::new(&sheet(), Vec2::new(10.0, 10.0));
        puppet.animator.run_facing(Facing::Left);
        let mut batch = SceneBatch::new();
        puppet.render(1, 720.0, (512, 512), &mut batch);
        assert_eq!(batch.quad_count(), 1);
        // Mirrored: the left edge samples a higher u than the right edge.
        assert!(batch.vertices[0].tex_coords[0] > batch.vertices[1].tex_coords[0]);
    }
}
