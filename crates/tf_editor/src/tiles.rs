//! Tile definitions: an immutable atlas cell plus how it occupies the grid.

use crate::batch::DestRect;
use tf_core::animation::AtlasRect;

/// Atlas cells are authored at 16px and drawn at 2x, so one grid cell is
/// 32 screen pixels.
pub const PIXEL_SCALE: f32 = 2.0;

/// Vertical extent of a tile on the grid. `Double` tiles (tall terrain)
/// occupy two cells, bottom-aligned to the cell they were placed in, so
/// their upper half overhangs the cell above.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileSpan {
    Single,
    Double,
}

/// One entry of the tile catalog. Immutable after load; placements share
/// it by reference.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDefinition {
    pub name: String,
    pub rect: AtlasRect,
    pub span: TileSpan,
}

impl TileDefinition {
    pub fn new(name: impl Into<String>, rect: AtlasRect, span: TileSpan) -> Self {
        Self {
            name: name.into(),
            rect,
            span,
        }
    }

    /// Destination rectangle for this tile placed at `cell` (a snapped
    /// screen coordinate), on a grid of the given pitch.
    pub fn dest_rect(&self, cell_x: f32, cell_y: f32, pitch: f32) -> DestRect {
        let w = self.rect.w * PIXEL_SCALE;
        let h = match self.span {
            TileSpan::Single => self.rect.h * PIXEL_SCALE,
            TileSpan::Double => self.rect.h * PIXEL_SCALE * 2.0,
        };
        DestRect {
            x: cell_x,
            y: cell_y + pitch - h,
            w,
            h,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect() -> AtlasRect {
        AtlasRect::new(16.0, 64.0, 16.0, 16.0)
    }

    #[test]
    fn single_span_fills_its_cell() {
        let tile = TileDefinition::new("floor", rect(), TileSpan::Single);
        let dest = tile.dest_rect(32.0, 64.0, 32.0);
        assert_eq!(
            dest,
            DestRect {
                x: 32.0,
                y: 64.0,
                w: 32.0,
                h: 32.0
            }
        );
    }

    #[test]
    fn double_span_overhangs_the_cell_above() {
        let tile = TileDefinition::new("wall_tall", rect(), TileSpan::Double);
        let dest = tile.dest_rect(32.0, 64.0, 32.0);
        // Bottom edge stays on the placed cell's bottom edge.
        assert_eq!(dest.y + dest.h, 64.0 + 32.0);
        assert_eq!(dest.h, 64.0);
        assert_eq!(dest.y, 32.0);
    }
}
