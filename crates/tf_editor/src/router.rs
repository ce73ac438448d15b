//! Routing of raw input to overlay, editor, or gameplay handling.
//!
//! Events are classified per the precedence the editor has always had:
//! an event claimed by the overlay UI is fully consumed (and the grid
//! cursor hidden); quit requests flip the terminal `done` flag no matter
//! the mode; in edit mode pointer clicks place or erase tiles and do not
//! fall through; everything else reaches gameplay handling, which today
//! means the hit key. Continuous movement is not event-driven: once per
//! accepted tick `apply_movement` maps the keyboard snapshot to the
//! player's polar velocity and the puppet's run/idle/facing state.

use std::sync::Arc;

use glam::Vec2;

use tf_core::animation::{Facing, SpriteAnimator};
use tf_core::grid::{self, GridConfig};
use tf_core::input::{InputState, Key, PointerButton};

use crate::player::{Player, PLAYER_SPEED};
use crate::scene::{TileLayer, TileScene};
use crate::tiles::TileDefinition;

/// Raw input events after the winit boundary, in window pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    PointerDown { button: PointerButton, x: f32, y: f32 },
    KeyDown(Key),
    KeyUp(Key),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Edit,
    Play,
}

/// Scene-side state an event may mutate.
pub struct RouteTarget<'a> {
    pub mode: EditorMode,
    pub wall_layer: bool,
    pub selected_tile: &'a Arc<TileDefinition>,
    pub scene: &'a mut TileScene,
    /// Animator of the currently selected character puppet.
    pub character: &'a mut SpriteAnimator,
}

pub struct Router {
    pub grid: GridConfig,
    pub done: bool,
    /// Snapped cursor cell to indicate, or None while the overlay owns
    /// the pointer (or the editor is in play mode).
    pub cursor: Option<Vec2>,
}

impl Router {
    pub fn new(grid: GridConfig) -> Self {
        Self {
            grid,
            done: false,
            cursor: None,
        }
    }

    /// Recompute the cursor indicator from the pointer position. Called
    /// once per tick; `visible` is false while the overlay wants the
    /// pointer or the editor is not in edit mode.
    pub fn update_cursor(&mut self, pointer: Vec2, visible: bool) {
        self.cursor = visible.then(|| grid::snap_point(pointer, self.grid.cursor_pitch));
    }

    /// Route one event. `overlay_claimed` marks events the overlay UI
    /// already consumed; they touch nothing but the cursor indicator.
    pub fn route(&mut self, event: InputEvent, overlay_claimed: bool, target: &mut RouteTarget) {
        if overlay_claimed {
            self.cursor = None;
            return;
        }

        match event {
            InputEvent::Quit => {
                self.done = true;
            }
            InputEvent::PointerDown { button, x, y } => {
                if target.mode == EditorMode::Edit {
                    self.route_edit_click(button, Vec2::new(x, y), target);
                }
            }
            InputEvent::KeyDown(Key::A) => {
                target.character.trigger_hit();
            }
            _ => {}
        }
    }

    fn route_edit_click(&mut self, button: PointerButton, raw: Vec2, target: &mut RouteTarget) {
        let cell = grid::snap_point(raw, self.grid.placement_pitch);
        let layer = if target.wall_layer {
            TileLayer::Wall
        } else {
            TileLayer::Ground
        };
        match button {
            PointerButton::Left => {
                target
                    .scene
                    .place(layer, cell, target.selected_tile.clone());
            }
            PointerButton::Right => {
                target.scene.remove(layer, cell);
            }
        }
    }
}

/// Map the instantaneous keyboard snapshot to the player's velocity and
/// the selected puppet's animation state. Eight directions; vertical-only
/// movement keeps the puppet's previous facing.
pub fn apply_movement(input: &InputState, player: &mut Player, character: &mut SpriteAnimator) {
    if input.is_held(Key::Up) {
        player.set_speed(PLAYER_SPEED);
        if input.is_held(Key::Left) {
            player.set_angle(135f32.to_radians());
            character.run_facing(Facing::Left);
        } else if input.is_held(Key::Right) {
            player.set_angle(45f32.to_radians());
            character.run_facing(Facing::Right);
        } else {
            player.set_angle(90f32.to_radians());
            character.run();
        }
    } else if input.is_held(Key::Down) {
        player.set_speed(PLAYER_SPEED);
        if input.is_held(Key::Left) {
            player.set_angle(225f32.to_radians());
            character.run_facing(Facing::Left);
        } else if input.is_held(Key::Right) {
            player.set_angle(315f32.to_radians());
            character.run_facing(Facing::Right);
        } else {
            player.set_angle(270f32.to_radians());
            character.run();
        }
    } else if input.is_held(Key::Left) {
        player.set_speed(PLAYER_SPEED);
        player.set_angle(180f32.to_radians());
        character.run_facing(Facing::Left);
    } else if input.is_held(Key::Right) {
        player.set_speed(PLAYER_SPEED);
        player.set_angle(0.0);
        character.run_facing(Facing::Right);
    } else {
        player.set_speed(0.0);
        character.idle();
    }
}
