//! The editable scene: two independent tile layers and the draw-order
//! resolver.
//!
//! Both layers are sparse lists, so the map has no fixed extent. The
//! ground layer keeps insertion order, which is stable frame to frame for
//! a static map. The wall layer is re-sorted by ascending cell y every
//! frame (entries come and go under editing) and the player puppet is
//! spliced into that pass by depth, giving painter's-algorithm occlusion
//! against walls without a full per-object sort.

use std::sync::Arc;

use glam::Vec2;

use crate::tiles::TileDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileLayer {
    Ground,
    Wall,
}

/// A tile definition placed at a grid cell. Identity is (cell, layer);
/// the cell is a snapped screen coordinate, so exact float comparison is
/// well defined.
#[derive(Debug, Clone)]
pub struct PlacedTile {
    pub def: Arc<TileDefinition>,
    pub cell: Vec2,
}

#[derive(Default)]
pub struct TileScene {
    ground: Vec<PlacedTile>,
    walls: Vec<PlacedTile>,
}

/// One slot of the wall pass: either a wall tile or the point where the
/// player puppet is drawn.
#[derive(Debug)]
pub enum DrawItem<'a> {
    Tile(&'a PlacedTile),
    Player,
}

impl TileScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ground(&self) -> &[PlacedTile] {
        &self.ground
    }

    pub fn walls(&self) -> &[PlacedTile] {
        &self.walls
    }

    /// Place a tile, replacing whatever occupied the cell on that layer.
    /// Remove-then-insert keeps the invariant of at most one tile per
    /// (cell, layer) and moves the replaced cell to the end of the
    /// layer's iteration order.
    pub fn place(&mut self, layer: TileLayer, cell: Vec2, def: Arc<TileDefinition>) {
        let tiles = self.layer_mut(layer);
        tiles.retain(|tile| tile.cell != cell);
        tiles.push(PlacedTile { def, cell });
    }

    /// Remove the tile at (cell, layer). Removing from an empty cell is a
    /// no-op, not an error.
    pub fn remove(&mut self, layer: TileLayer, cell: Vec2) {
        self.layer_mut(layer).retain(|tile| tile.cell != cell);
    }

    pub fn tile_at(&self, layer: TileLayer, cell: Vec2) -> Option<&PlacedTile> {
        self.layer(layer).iter().find(|tile| tile.cell == cell)
    }

    pub fn layer(&self, layer: TileLayer) -> &[PlacedTile] {
        match layer {
            TileLayer::Ground => &self.ground,
            TileLayer::Wall => &self.walls,
        }
    }

    fn layer_mut(&mut self, layer: TileLayer) -> &mut Vec<PlacedTile> {
        match layer {
            TileLayer::Ground => &mut self.ground,
            TileLayer::Wall => &mut self.walls,
        }
    }

    /// Re-sort walls by ascending cell y. Called once per frame before
    /// `wall_pass`; sorting an already-sorted layer is a no-op.
    pub fn sort_walls(&mut self) {
        self.walls.sort_by(|lhs, rhs| {
            lhs.cell
                .y
                .partial_cmp(&rhs.cell.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// The wall-layer draw order with the player puppet spliced in:
    /// the puppet goes immediately before the first wall whose cell y
    /// exceeds `player_depth`, or after every wall when none does.
    /// Assumes `sort_walls` ran this frame.
    pub fn wall_pass(&self, player_depth: f32) -> Vec<DrawItem<'_>> {
        let mut items = Vec::with_capacity(self.walls.len() + 1);
        let mut player_emitted = false;
        for tile in &self.walls {
            if !player_emitted && tile.cell.y > player_depth {
                player_emitted = true;
                items.push(DrawItem::Player);
            }
            items.push(DrawItem::Tile(tile));
        }
        if !player_emitted {
            items.push(DrawItem::Player);
        }
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::TileSpan;
    use tf_core::animation::AtlasRect;

    fn def(name: &str) -> Arc<TileDefinition> {
        Arc::new(TileDefinition::new(
            name,
            AtlasRect::new(16.0, 64.0, 16.0, 16.0),
            TileSpan::Single,
        ))
    }

    fn cell(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    #[test]
    fn placement_is_last_write_wins() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Ground, cell(0.0, 0.0), def("a"));
        scene.place(TileLayer::Ground, cell(0.0, 0.0), def("b"));
        assert_eq!(scene.ground().len(), 1);
        assert_eq!(scene.ground()[0].def.name, "b");
    }

    #[test]
    fn layers_do_not_collide() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Ground, cell(0.0, 0.0), def("a"));
        scene.place(TileLayer::Wall, cell(0.0, 0.0), def("b"));
        assert_eq!(scene.ground().len(), 1);
        assert_eq!(scene.walls().len(), 1);
        assert_eq!(
            scene
                .tile_at(TileLayer::Wall, cell(0.0, 0.0))
                .expect("wall present")
                .def
                .name,
            "b"
        );
    }

    #[test]
    fn remove_on_empty_cell_is_a_no_op() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Wall, cell(0.0, 0.0), def("a"));
        scene.remove(TileLayer::Wall, cell(160.0, 160.0));
        assert_eq!(scene.walls().len(), 1);
    }

    #[test]
    fn remove_clears_the_cell() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Ground, cell(32.0, 32.0), def("a"));
        scene.remove(TileLayer::Ground, cell(32.0, 32.0));
        assert!(scene.ground().is_empty());
        assert!(scene.tile_at(TileLayer::Ground, cell(32.0, 32.0)).is_none());
    }

    #[test]
    fn replacement_moves_cell_to_end_of_iteration_order() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Ground, cell(0.0, 0.0), def("a"));
        scene.place(TileLayer::Ground, cell(32.0, 0.0), def("b"));
        scene.place(TileLayer::Ground, cell(0.0, 0.0), def("c"));
        let names: Vec<_> = scene.ground().iter().map(|t| t.def.name.as_str()).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn sort_walls_orders_by_ascending_y_and_is_idempotent() {
        let mut scene = TileScene::new();
        for y in [96.0, 0.0, 64.0, 32.0] {
            scene.place(TileLayer::Wall, cell(0.0, y), def("w"));
        }
        scene.sort_walls();
        let ys: Vec<_> = scene.walls().iter().map(|t| t.cell.y).collect();
        assert_eq!(ys, [0.0, 32.0, 64.0, 96.0]);

        scene.sort_walls();
        let again: Vec<_> = scene.walls().iter().map(|t| t.cell.y).collect();
        assert_eq!(ys, again);
    }

    #[test]
    fn sort_survives_interleaved_edits() {
        let mut scene = TileScene::new();
        for y in [64.0, 0.0] {
            scene.place(TileLayer::Wall, cell(0.0, y), def("w"));
        }
        scene.sort_walls();
        scene.place(TileLayer::Wall, cell(0.0, 32.0), def("w"));
        scene.remove(TileLayer::Wall, cell(0.0, 64.0));
        scene.sort_walls();
        let ys: Vec<_> = scene.walls().iter().map(|t| t.cell.y).collect();
        assert_eq!(ys, [0.0, 32.0]);
    }

    #[test]
    fn wall_pass_splices_player_before_first_deeper_wall() {
        let mut scene = TileScene::new();
        for y in [0.0, 32.0, 64.0] {
            scene.place(TileLayer::Wall, cell(0.0, y), def("w"));
        }
        scene.sort_walls();
        let pass = scene.wall_pass(40.0);
        let positions: Vec<_> = pass
            .iter()
            .map(|item| match item {
                DrawItem::Tile(tile) => format!("wall{}", tile.cell.y),
                DrawItem::Player => "player".to_string(),
            })
            .collect();
        assert_eq!(positions, ["wall0", "wall32", "player", "wall64"]);
    }

    #[test]
    fn wall_pass_emits_player_last_when_no_wall_is_deeper() {
        let mut scene = TileScene::new();
        scene.place(TileLayer::Wall, cell(0.0, 0.0), def("w"));
        scene.sort_walls();
        let pass = scene.wall_pass(500.0);
        assert!(matches!(pass.last(), Some(DrawItem::Player)));
        assert_eq!(pass.len(), 2);
    }

    #[test]
    fn wall_pass_emits_player_exactly_once() {
        let mut scene = TileScene::new();
        for y in [64.0, 96.0, 128.0] {
            scene.place(TileLayer::Wall, cell(0.0, y), def("w"));
        }
        scene.sort_walls();
        // Every wall is deeper than the player; the guard must keep the
        // puppet from being emitted before each of them.
        let pass = scene.wall_pass(0.0);
        let players = pass
            .iter()
            .filter(|item| matches!(item, DrawItem::Player))
            .count();
        assert_eq!(players, 1);
        assert!(matches!(pass.first(), Some(DrawItem::Player)));
    }

    #[test]
    fn wall_pass_on_empty_scene_is_just_the_player() {
        let scene = TileScene::new();
        let pass = scene.wall_pass(0.0);
        assert_eq!(pass.len(), 1);
        assert!(matches!(pass[0], DrawItem::Player));
    }
}
