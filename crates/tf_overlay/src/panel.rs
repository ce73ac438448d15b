//! Editor panel rendered via egui on top of the scene.
//!
//! Integration pattern: egui requires a three-phase render split because
//! `egui_wgpu::Renderer::render()` needs a `RenderPass<'static>`, while
//! `begin_render_pass` borrows the encoder. The phases are:
//!
//!   1. `prepare()` -- run egui UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers (borrows encoder mutably)
//!   3. `paint()`   -- render into a new render pass with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references
//!
//! The panel mutates `PanelState` in place; the frame controller reads it
//! afterwards. `handle_window_event` reports whether egui claimed the
//! event, which is what lets the pointer router ignore clicks that landed
//! on a widget.

use crate::selection::Selector;
use winit::window::Window;

/// Read-only numbers shown in the panel.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayStats {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub ground_tiles: u32,
    pub wall_tiles: u32,
}

/// Display names backing the selector combos. Borrowed from the catalog,
/// which is immutable after load.
pub struct PanelContent<'a> {
    pub characters: &'a [String],
    pub enemies: &'a [String],
    pub tiles: &'a [String],
}

/// Everything the operator chooses through the panel.
pub struct PanelState {
    pub edit_mode: bool,
    pub wall_layer: bool,
    pub enemy_running: bool,
    pub character: Selector,
    pub enemy: Selector,
    pub tile: Selector,
}

impl PanelState {
    pub fn new(character: Selector, enemy: Selector, tile: Selector) -> Self {
        Self {
            edit_mode: true,
            wall_layer: false,
            enemy_running: false,
            character,
            enemy,
            tile,
        }
    }
}

pub struct EditorOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
}

impl EditorOverlay {
    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat, window: &Window) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
        }
    }

    /// Feed a window event to egui. Returns true when egui claimed it.
    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        response.consumed
    }

    /// Whether the pointer currently belongs to the panel. While true the
    /// grid cursor indicator is suppressed.
    pub fn wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input()
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        stats: OverlayStats,
        content: PanelContent<'_>,
        state: &mut PanelState,
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            egui::Window::new("Scene")
                .default_pos([10.0, 10.0])
                .show(ctx, |ui| {
                    ui.label(format!("frame ms: {:.2}", stats.frame_time_ms));
                    ui.label(format!("FPS: {:.1}", stats.fps));
                    ui.label(format!(
                        "tiles: {} ground / {} wall",
                        stats.ground_tiles, stats.wall_tiles
                    ));
                    ui.separator();

                    ui.checkbox(&mut state.edit_mode, "editor mode");

                    combo(ui, "Character", &mut state.character, content.characters);
                    combo(ui, "Enemy", &mut state.enemy, content.enemies);
                    ui.checkbox(&mut state.enemy_running, "running");
                    ui.separator();

                    combo(ui, "Tile", &mut state.tile, content.tiles);
                    ui.checkbox(&mut state.wall_layer, "wall");
                });
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn combo(ui: &mut egui::Ui, label: &str, selector: &mut Selector, names: &[String]) {
    let mut index = selector.get();
    egui::ComboBox::from_label(label).show_index(ui, &mut index, selector.len(), |i| {
        names.get(i).cloned().unwrap_or_default()
    });
    selector.set(index);
}
