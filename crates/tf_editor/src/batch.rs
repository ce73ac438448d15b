//! CPU-side quad batching for the scene pass.
//!
//! The whole scene (ground tiles, walls, puppets, cursor) is rebuilt as
//! one vertex/index mesh every frame and streamed into GPU buffers. Draw
//! calls are recorded per texture run and merged when consecutive quads
//! share a texture, so a fully atlas-textured scene renders in one
//! `draw_indexed` plus one more for the cursor outline.

use tf_core::animation::AtlasRect;
use tf_render::SpriteVertex;

/// A screen-space destination rectangle, y-down, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Which texture a draw-call run samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureSlot {
    Atlas,
    White,
}

/// A contiguous run of indices sharing one texture binding.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall {
    pub slot: TextureSlot,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Default)]
pub struct SceneBatch {
    pub vertices: Vec<SpriteVertex>,
    pub indices: Vec<u32>,
    pub draw_calls: Vec<DrawCall>,
}

const NO_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

impl SceneBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    /// One textured quad sampling `src` (atlas pixels) into `dest`
    /// (screen pixels). Mirroring swaps the horizontal texture
    /// coordinates, leaving the destination untouched.
    pub fn push_sprite(
        &mut self,
        atlas_size: (u32, u32),
        src: AtlasRect,
        dest: DestRect,
        mirror: bool,
    ) {
        let (aw, ah) = (atlas_size.0 as f32, atlas_size.1 as f32);
        let mut u0 = src.x / aw;
        let mut u1 = (src.x + src.w) / aw;
        let v0 = src.y / ah;
        let v1 = (src.y + src.h) / ah;
        if mirror {
            std::mem::swap(&mut u0, &mut u1);
        }
        self.push_quad(TextureSlot::Atlas, dest, [u0, v0, u1, v1], NO_TINT);
    }

    /// Unfilled rectangle built from four thin quads of the white texel.
    /// Used for the grid cursor indicator.
    pub fn push_rect_outline(&mut self, rect: DestRect, thickness: f32, color: [f32; 4]) {
        let DestRect { x, y, w, h } = rect;
        let t = thickness.min(w * 0.5).min(h * 0.5);
        let uv = [0.0, 0.0, 1.0, 1.0];
        self.push_quad(TextureSlot::White, DestRect { x, y, w, h: t }, uv, color);
        self.push_quad(
            TextureSlot::White,
            DestRect {
                x,
                y: y + h - t,
                w,
                h: t,
            },
            uv,
            color,
        );
        self.push_quad(
            TextureSlot::White,
            DestRect {
                x,
                y: y + t,
                w: t,
                h: h - 2.0 * t,
            },
            uv,
            color,
        );
        self.push_quad(
            TextureSlot::White,
            DestRect {
                x: x + w - t,
                y: y + t,
                w: t,
                h: h - 2.0 * t,
            },
            uv,
            color,
        );
    }

    fn push_quad(&mut self, slot: TextureSlot, dest: DestRect, uv: [f32; 4], color: [f32; 4]) {
        let [u0, v0, u1, v1] = uv;
        let base_index = self.vertices.len() as u32;

        self.vertices.push(SpriteVertex {
            position: [dest.x, dest.y],
            tex_coords: [u0, v0],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [dest.x + dest.w, dest.y],
            tex_coords: [u1, v0],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [dest.x + dest.w, dest.y + dest.h],
            tex_coords: [u1, v1],
            color,
        });
        self.vertices.push(SpriteVertex {
            position: [dest.x, dest.y + dest.h],
            tex_coords: [u0, v1],
            color,
        });

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(slot, draw_start, 6);
    }

    /// Merge with the previous draw call when the texture matches and the
    /// index ranges are contiguous. Quads are emitted in draw order, so
    /// consecutive atlas sprites collapse into a single call.
    fn push_draw_call(&mut self, slot: TextureSlot, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.slot == slot && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            slot,
            index_start,
            index_count,
        });
    }
}
