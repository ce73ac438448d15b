//! Tileforge -- tile-scene editor and sprite-preview main loop.
//!
//! Architecture: winit drives the event loop via `ApplicationHandler`; all
//! per-frame work happens inside `RedrawRequested`:
//!
//!   1. `FrameClock::try_tick()` -- rejects polls faster than the tick cap
//!   2. Minimized windows sleep briefly and skip the frame entirely
//!   3. The keyboard snapshot steers the player; puppets sync to it
//!   4. Ground tiles, the depth-spliced wall pass, the enemy preview and
//!      the grid cursor are rebuilt into one quad mesh and streamed to
//!      the GPU, then the egui panel is composited on top
//!
//! Editor clicks and the hit key are routed as the events arrive (see
//! `router`); the frame only consumes their accumulated effects. One
//! `EditorState` exclusively owns the window, the GPU context and all
//! scene state -- components borrow what they draw with per call.

mod batch;
mod catalog;
mod config;
mod player;
mod router;
mod scene;
mod sprite;
mod tiles;

use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use tf_core::input::{InputState, Key, PointerButton};
use tf_core::time::FrameClock;
use tf_overlay::{EditorOverlay, OverlayStats, PanelContent, PanelState, Selector};
use tf_platform::window::PlatformConfig;
use tf_render::{GpuContext, ScreenCamera, SpritePipeline, SpriteVertex, Texture};

use batch::{DestRect, SceneBatch, TextureSlot};
use catalog::Catalog;
use config::{load_config, EditorConfig};
use player::Player;
use router::{EditorMode, InputEvent, RouteTarget, Router};
use scene::{DrawItem, TileScene};
use sprite::PuppetSprite;

const CONFIG_PATH: &str = "assets/editor.json";
const CURSOR_COLOR: [f32; 4] = [0.588, 0.588, 0.588, 1.0];
const CURSOR_THICKNESS: f32 = 2.0;

struct GpuTexture {
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable editor state. Constructed lazily in
/// `ApplicationHandler::resumed` once the window and GPU surface exist.
struct EditorState {
    window: Arc<Window>,
    gpu: GpuContext,
    clock: FrameClock,
    input: InputState,
    camera: ScreenCamera,
    sprite_pipeline: SpritePipeline,
    overlay: EditorOverlay,
    panel: PanelState,
    config: EditorConfig,

    // --- Content ---------------------------------------------------------
    catalog: Catalog,
    character_names: Vec<String>,
    enemy_names: Vec<String>,
    tile_names: Vec<String>,
    characters: Vec<PuppetSprite>,
    enemies: Vec<PuppetSprite>,
    scene: TileScene,
    player: Player,
    router: Router,

    // --- Per-frame GPU mesh state ----------------------------------------
    // The scene mesh is rebuilt on the CPU each frame, then streamed into
    // these buffers. Buffers grow (power-of-two) but never shrink.
    atlas: GpuTexture,
    white: GpuTexture,
    batch: SceneBatch,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
}

impl EditorState {
    fn new(window: Arc<Window>, config: EditorConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let overlay = EditorOverlay::new(&gpu.device, gpu.surface_format, &window);

        let catalog = Catalog::load(Path::new(&config.catalog_path)).unwrap_or_else(|err| {
            log::error!("{err}");
            std::process::exit(1);
        });
        let atlas_texture = Texture::from_path(&gpu.device, &gpu.queue, Path::new(&config.atlas_path))
            .unwrap_or_else(|err| {
                log::error!("{err}");
                std::process::exit(1);
            });
        log::info!(
            "Loaded atlas {} ({}x{}) and catalog {} ({} tiles, {} characters, {} enemies)",
            config.atlas_path,
            atlas_texture.size.0,
            atlas_texture.size.1,
            config.catalog_path,
            catalog.tiles.len(),
            catalog.characters.len(),
            catalog.enemies.len()
        );

        let atlas_bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &atlas_texture);
        let atlas = GpuTexture {
            texture: atlas_texture,
            bind_group: atlas_bind_group,
        };
        let white_texture =
            Texture::from_rgba8(&gpu.device, &gpu.queue, &[255, 255, 255, 255], 1, 1, "white");
        let white_bind_group = sprite_pipeline.create_texture_bind_group(&gpu.device, &white_texture);
        let white = GpuTexture {
            texture: white_texture,
            bind_group: white_bind_group,
        };

        let character_names: Vec<String> =
            catalog.characters.iter().map(|c| c.name.clone()).collect();
        let enemy_names: Vec<String> = catalog.enemies.iter().map(|e| e.name.clone()).collect();
        let tile_names: Vec<String> = catalog.tiles.iter().map(|t| t.name.clone()).collect();

        let spawn = Vec2::from(config.player_spawn);
        let enemy_preview = Vec2::from(config.enemy_preview);
        let characters: Vec<PuppetSprite> = catalog
            .characters
            .iter()
            .map(|def| PuppetSprite::new(def, spawn))
            .collect();
        let enemies: Vec<PuppetSprite> = catalog
            .enemies
            .iter()
            .map(|def| PuppetSprite::new(def, enemy_preview))
            .collect();

        // Catalog validation guarantees non-empty groups, which is what
        // keeps these selectors in bounds without runtime checks.
        let non_empty = |len: usize| {
            NonZeroUsize::new(len).expect("catalog groups are validated non-empty")
        };
        let panel = PanelState::new(
            Selector::new(non_empty(catalog.characters.len())),
            Selector::new(non_empty(catalog.enemies.len())),
            Selector::new(non_empty(catalog.tiles.len())),
        );

        let camera = ScreenCamera::new(gpu.size.0, gpu.size.1);
        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group = sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let clock = FrameClock::new(config.tick_rate);
        let router = Router::new(config.grid());
        let player = Player::new(spawn);

        Self {
            window,
            gpu,
            clock,
            input: InputState::new(),
            camera,
            sprite_pipeline,
            overlay,
            panel,
            config,
            catalog,
            character_names,
            enemy_names,
            tile_names,
            characters,
            enemies,
            scene: TileScene::new(),
            player,
            router,
            atlas,
            white,
            batch: SceneBatch::new(),
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 1,
            mesh_index_capacity: 1,
        }
    }

    /// Feed one routed event through the mode router with the current
    /// panel selections.
    fn route(&mut self, event: InputEvent, overlay_claimed: bool) {
        let Self {
            router,
            scene,
            characters,
            catalog,
            panel,
            ..
        } = self;
        let mode = if panel.edit_mode {
            EditorMode::Edit
        } else {
            EditorMode::Play
        };
        let mut target = RouteTarget {
            mode,
            wall_layer: panel.wall_layer,
            selected_tile: &catalog.tiles[panel.tile.get()],
            scene,
            character: &mut characters[panel.character.get()].animator,
        };
        router.route(event, overlay_claimed, &mut target);
    }

    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(tick) = self.clock.try_tick() else {
            return;
        };

        if tf_platform::window::is_minimized(&self.window) {
            // Rendering is suspended while minimized; a short stall keeps
            // the process from spinning. The done flag still exits.
            std::thread::sleep(Duration::from_millis(self.config.minimized_delay_ms));
            if self.router.done {
                event_loop.exit();
            }
            return;
        }

        if self.input.is_just_pressed(Key::Escape) {
            self.router.done = true;
        }

        // Steer the player from the keyboard snapshot and advance it.
        let character_index = self.panel.character.get();
        router::apply_movement(
            &self.input,
            &mut self.player,
            &mut self.characters[character_index].animator,
        );
        self.player.update(tick.delta_ms);
        self.characters[character_index].set_pos(self.player.pos);

        // The enemy preview is a static puppet: pinned every tick, its
        // run state driven by the panel checkbox.
        let enemy_index = self.panel.enemy.get();
        let enemy = &mut self.enemies[enemy_index];
        enemy.set_pos(Vec2::from(self.config.enemy_preview));
        if self.panel.enemy_running {
            enemy.animator.run();
        } else {
            enemy.animator.idle();
        }

        let pointer = Vec2::new(self.input.pointer_position.0, self.input.pointer_position.1);
        let cursor_visible = self.panel.edit_mode && !self.overlay.wants_pointer();
        self.router.update_cursor(pointer, cursor_visible);

        // Rebuild this frame's mesh: ground, depth-spliced walls, enemy
        // preview, cursor.
        self.scene.sort_walls();
        let win_height = self.gpu.size.1 as f32;
        let atlas_size = self.atlas.texture.size;
        let placement_pitch = self.config.placement_pitch;
        let cursor_pitch = self.config.cursor_pitch;
        {
            let Self {
                scene,
                characters,
                enemies,
                batch,
                router,
                ..
            } = self;
            batch.clear();
            for tile in scene.ground() {
                batch.push_sprite(
                    atlas_size,
                    tile.def.rect,
                    tile.def.dest_rect(tile.cell.x, tile.cell.y, placement_pitch),
                    false,
                );
            }
            let depth = characters[character_index].depth(win_height);
            for item in scene.wall_pass(depth) {
                match item {
                    DrawItem::Tile(tile) => batch.push_sprite(
                        atlas_size,
                        tile.def.rect,
                        tile.def.dest_rect(tile.cell.x, tile.cell.y, placement_pitch),
                        false,
                    ),
                    DrawItem::Player => characters[character_index].render(
                        tick.frame_count,
                        win_height,
                        atlas_size,
                        batch,
                    ),
                }
            }
            enemies[enemy_index].render(tick.frame_count, win_height, atlas_size, batch);
            if let Some(cursor) = router.cursor {
                batch.push_rect_outline(
                    DestRect {
                        x: cursor.x,
                        y: cursor.y,
                        w: cursor_pitch,
                        h: cursor_pitch,
                    },
                    CURSOR_THICKNESS,
                    CURSOR_COLOR,
                );
            }
        }

        self.ensure_mesh_capacity(self.batch.vertices.len(), self.batch.indices.len());
        if !self.batch.vertices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.vertex_buffer,
                0,
                bytemuck::cast_slice(&self.batch.vertices),
            );
            self.gpu.queue.write_buffer(
                &self.index_buffer,
                0,
                bytemuck::cast_slice(&self.batch.indices),
            );
        }
        let camera_uniform = self.camera.build_uniform();
        self.gpu
            .queue
            .write_buffer(&self.camera_buffer, 0, bytemuck::cast_slice(&[camera_uniform]));

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = OverlayStats {
            fps: self.clock.smoothed_fps,
            frame_time_ms: self.clock.smoothed_frame_time_ms,
            ground_tiles: self.scene.ground().len() as u32,
            wall_tiles: self.scene.walls().len() as u32,
        };
        let content = PanelContent {
            characters: &self.character_names,
            enemies: &self.enemy_names,
            tiles: &self.tile_names,
        };
        let (egui_primitives, egui_textures_delta) =
            self.overlay
                .prepare(&self.window, stats, content, &mut self.panel);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            let mut bound_slot: Option<TextureSlot> = None;
            for draw in &self.batch.draw_calls {
                if bound_slot != Some(draw.slot) {
                    let bind_group = match draw.slot {
                        TextureSlot::Atlas => &self.atlas.bind_group,
                        TextureSlot::White => &self.white.bind_group,
                    };
                    render_pass.set_bind_group(1, bind_group, &[]);
                    bound_slot = Some(draw.slot);
                }
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Overlay Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.input.end_frame();
        if self.router.done {
            event_loop.exit();
        }
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }
}

struct App {
    config: EditorConfig,
    state: Option<EditorState>,
}

impl App {
    fn new() -> Self {
        let config = load_config(Path::new(CONFIG_PATH)).unwrap_or_else(|err| {
            log::error!("{err}");
            std::process::exit(1);
        });
        Self {
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform = PlatformConfig {
            title: self.config.title.clone(),
            width: self.config.width,
            height: self.config.height,
        };
        let window = tf_platform::window::create_window(event_loop, &platform);
        self.state = Some(EditorState::new(window, self.config.clone()));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_claimed = state.overlay.handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                state.route(InputEvent::Quit, false);
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::KeyboardInput { event, .. } if !egui_claimed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => {
                                state.input.key_down(key);
                                state.route(InputEvent::KeyDown(key), false);
                            }
                            ElementState::Released => {
                                state.input.key_up(key);
                                state.route(InputEvent::KeyUp(key), false);
                            }
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.pointer_position = (position.x as f32, position.y as f32);
            }

            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button,
                ..
            } => {
                if let Some(button) = map_pointer_button(button) {
                    let (x, y) = state.input.pointer_position;
                    state.route(InputEvent::PointerDown { button, x, y }, egui_claimed);
                }
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }
                state.frame(event_loop);
            }

            _ => {}
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Scene Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::Escape => Some(Key::Escape),
        _ => None,
    }
}

fn map_pointer_button(button: MouseButton) -> Option<PointerButton> {
    match button {
        MouseButton::Left => Some(PointerButton::Left),
        MouseButton::Right => Some(PointerButton::Right),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Tileforge starting...");

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app).expect("Event loop error");
}
