//! Meadow Viewer
//!
//! Orbit around the generated grass field at sunset. Click the ground to drop
//! an impact; drops also fall on their own every few seconds.
//!
//! Usage: `meadow_viewer [config.json]`

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Instant;

use meadow_engine::camera::{OrbitCamera, OrbitMouseButton, RaycastConfig};
use meadow_engine::impact::{DEFAULT_IMPACT_STRENGTH, DropScheduler, ImpactBus, ImpactEvent};
use meadow_engine::render::{CloudImage, GpuContext, GpuContextConfig, MeadowRenderer};
use meadow_engine::{MeadowConfig, MeadowError, MeadowField, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

// ============================================================================
// CONSTANTS
// ============================================================================

const DEFAULT_CONFIG_PATH: &str = "meadow.json";

/// Seconds between automatic drops.
const DROP_INTERVAL: f32 = 3.0;
/// Height above the terrain drops start from.
const DROP_HEIGHT: f32 = 12.0;
/// Cursor travel (pixels) below which a left press counts as a click.
const CLICK_SLOP: f32 = 4.0;

// ============================================================================
// APPLICATION STATE
// ============================================================================

struct MeadowViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<MeadowRenderer>,
    field: MeadowField,
    camera: OrbitCamera,
    drops: DropScheduler,
    drops_enabled: bool,
    bus: ImpactBus,
    impacts_rx: Receiver<ImpactEvent>,
    start_time: Instant,
    last_frame: Instant,
    frame_count: u32,
    last_fps_update: Instant,
    init_error: Option<MeadowError>,
}

impl MeadowViewerApp {
    fn new(config: MeadowConfig) -> Self {
        let drop_radius = config.field.field_size * 0.5;
        let field = MeadowField::generate(config);

        let mut bus = ImpactBus::new();
        let impacts_rx = bus.subscribe();

        let now = Instant::now();
        Self {
            window: None,
            gpu: None,
            renderer: None,
            field,
            camera: OrbitCamera::new(16.0 / 9.0),
            drops: DropScheduler::new(DROP_INTERVAL, DROP_HEIGHT, drop_radius),
            drops_enabled: true,
            bus,
            impacts_rx,
            start_time: now,
            last_frame: now,
            frame_count: 0,
            last_fps_update: now,
            init_error: None,
        }
    }

    fn initialize(&mut self, window: Arc<Window>) -> Result<()> {
        let visual = &self.field.config.visual;
        let gpu = GpuContext::new(
            Arc::clone(&window),
            GpuContextConfig {
                vsync: visual.vsync,
                ..Default::default()
            },
        )?;

        let cloud = CloudImage::load_or_generate(
            visual.cloud_texture.as_deref(),
            self.field.config.terrain.seed,
        );
        let renderer = MeadowRenderer::new(
            &gpu,
            &self.field.grass,
            &self.field.ground,
            &cloud,
            visual.draw_mirror,
        );

        let (width, height) = gpu.dimensions();
        self.camera.resize(width, height);

        self.window = Some(window);
        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::KeyM => {
                if let Some(renderer) = &mut self.renderer {
                    renderer.draw_mirror = !renderer.draw_mirror;
                    log::info!("Mirror pass: {}", renderer.draw_mirror);
                }
            }
            KeyCode::KeyD => {
                self.drops_enabled = !self.drops_enabled;
                log::info!("Automatic drops: {}", self.drops_enabled);
            }
            KeyCode::KeyR => self.camera.reset(),
            KeyCode::Space => {
                let target = self.camera.target;
                self.bus.emit(target.x, target.z, DEFAULT_IMPACT_STRENGTH);
            }
            _ => {}
        }
    }

    /// Drop an impact where the cursor meets the terrain.
    fn click_impact(&mut self) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let (width, height) = gpu.dimensions();
        let [mx, my] = self.camera.cursor();
        // Window y grows downwards, raycast uv has (0,0) at the bottom-left
        let uv = (mx / width as f32, 1.0 - my / height as f32);

        let raycast = RaycastConfig {
            aspect_ratio: self.camera.aspect,
            fov: self.camera.fov.to_radians(),
            ..Default::default()
        };
        match raycast.pick_terrain(
            self.camera.eye_position(),
            self.camera.target,
            uv,
            &self.field.terrain,
        ) {
            Some(hit) => {
                log::debug!("Click impact at ({:.2}, {:.2})", hit.x, hit.z);
                self.bus.emit(hit.x, hit.z, DEFAULT_IMPACT_STRENGTH);
            }
            None => log::debug!("Click missed the terrain"),
        }
    }

    fn update(&mut self, delta_time: f32) {
        self.field.update(self.start_time.elapsed().as_secs_f32());

        if self.drops_enabled {
            for (point, strength) in self.drops.update(delta_time, &self.field.terrain) {
                self.bus.emit(point.x, point.z, strength);
            }
        }

        while let Ok(event) = self.impacts_rx.try_recv() {
            self.field.handle_event(event);
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(renderer)) = (&mut self.gpu, &self.renderer) else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.reconfigure();
                return;
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                return;
            }
            Err(e) => {
                log::warn!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let view_proj = self.camera.view_projection().to_cols_array_2d();
        let eye = self.camera.eye_position().to_array();
        let top = self.field.uniforms(view_proj, eye, false);
        let mirror = self.field.uniforms(view_proj, eye, true);
        renderer.update_uniforms(&gpu.queue, &top, &mirror);

        let [r, g, b] = self.field.config.visual.clear_color;
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Meadow Encoder"),
            });
        renderer.render(
            &mut encoder,
            &view,
            &gpu.depth_view,
            wgpu::Color { r, g, b, a: 1.0 },
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

// ============================================================================
// EVENT LOOP
// ============================================================================

impl ApplicationHandler for MeadowViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title("Meadow")
            .with_inner_size(PhysicalSize::new(1280, 720));
        let result = event_loop
            .create_window(attrs)
            .map_err(|e| MeadowError::Window(e.to_string()))
            .and_then(|window| self.initialize(Arc::new(window)));

        if let Err(e) = result {
            log::error!("Failed to start viewer: {}", e);
            self.init_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if event.state != ElementState::Pressed {
                        return;
                    }
                    if key == KeyCode::Escape {
                        event_loop.exit();
                        return;
                    }
                    self.handle_key(key);
                }
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let pressed = state == ElementState::Pressed;
                let orbit_btn = match button {
                    MouseButton::Left => Some(OrbitMouseButton::Left),
                    MouseButton::Right => Some(OrbitMouseButton::Right),
                    _ => None,
                };
                if let Some(btn) = orbit_btn {
                    self.camera.handle_mouse_drag(btn, pressed);
                }
                // A left press released without dragging is a click
                if button == MouseButton::Left && !pressed && self.camera.drag_travel() < CLICK_SLOP
                {
                    self.click_impact();
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.camera
                    .handle_mouse_move(position.x as f32, position.y as f32);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.camera.handle_scroll(scroll);
            }

            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                }
                self.camera.resize(new_size.width, new_size.height);
            }

            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                let delta_time = now.duration_since(self.last_frame).as_secs_f32();
                self.last_frame = now;

                self.frame_count += 1;
                let since_fps = now.duration_since(self.last_fps_update).as_secs_f32();
                if since_fps >= 1.0 {
                    log::trace!(
                        "{:.0} fps, {} live impacts, {} drops falling",
                        self.frame_count as f32 / since_fps,
                        self.field.live_impacts().len(),
                        self.drops.in_flight()
                    );
                    self.frame_count = 0;
                    self.last_fps_update = now;
                }

                self.update(delta_time);
                self.render();
            }

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

// ============================================================================
// MAIN
// ============================================================================

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = MeadowConfig::load_or_default(&config_path)?;

    println!("Controls:");
    println!("  Left drag: Orbit");
    println!("  Right drag: Pan");
    println!("  Scroll wheel: Zoom");
    println!("  Left click: Drop an impact");
    println!("  Space: Impact at camera target");
    println!("  M: Toggle mirrored underside");
    println!("  D: Toggle automatic drops");
    println!("  R: Reset camera");
    println!("  ESC: Exit");

    let event_loop = EventLoop::new().map_err(|e| MeadowError::Window(e.to_string()))?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = MeadowViewerApp::new(config);
    event_loop
        .run_app(&mut app)
        .map_err(|e| MeadowError::Window(e.to_string()))?;

    match app.init_error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
