//! Platform layer: windowing, event loop and input translation.
//!
//! Owns the per-frame drive: accumulated input deltas are pushed into the
//! camera strictly before the renderer reads its matrices for that frame.
//! Mouse-look is active only while the left button is held, matching the
//! click-to-orbit behavior of the viewer.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, MouseScrollDelta,
        WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use asset::MeshData;
use corelib::{FlyCamera, ModelPose, MoveDirection};
use renderer::GpuState;

/// Model spin rate, degrees per second (the viewer slowly rotates the mesh).
const SPIN_DEG_PER_SEC: f32 = 50.0;
/// Uniform model scale applied to loaded meshes.
const MODEL_SCALE: f32 = 0.2;

const KEY_BINDINGS: [(KeyCode, MoveDirection); 6] = [
    (KeyCode::KeyW, MoveDirection::Forward),
    (KeyCode::KeyS, MoveDirection::Backward),
    (KeyCode::KeyA, MoveDirection::Left),
    (KeyCode::KeyD, MoveDirection::Right),
    (KeyCode::Space, MoveDirection::Up),
    (KeyCode::ShiftLeft, MoveDirection::Down),
];

/// Run the viewer loop to completion. Returns when the window is closed
/// (clean quit) or with the stored error if GPU init or rendering failed.
pub fn run(mesh: MeshData, backends: wgpu::Backends, width: u32, height: u32) -> Result<()> {
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = ViewerApp::new(mesh, backends, width, height);
    event_loop.run_app(&mut app).context("Event loop error")?;

    if let Some(err) = app.fatal.take() {
        return Err(err);
    }
    log::info!("Window closed. Exiting event loop.");
    Ok(())
}

struct ViewerApp {
    backends: wgpu::Backends,
    width: u32,
    height: u32,
    mesh: MeshData,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,

    camera: FlyCamera,
    model: ModelPose,
    held: HashSet<KeyCode>,
    look_active: bool,
    lit: bool,
    last_frame: Instant,

    fatal: Option<anyhow::Error>,
}

impl ViewerApp {
    fn new(mesh: MeshData, backends: wgpu::Backends, width: u32, height: u32) -> Self {
        Self {
            backends,
            width,
            height,
            mesh,
            window: None,
            gpu: None,
            camera: FlyCamera::default(),
            model: ModelPose::new(MODEL_SCALE),
            held: HashSet::new(),
            look_active: false,
            lit: true,
            last_frame: Instant::now(),
            fatal: None,
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        // Polled key state: each held direction accumulates independently.
        for (code, direction) in KEY_BINDINGS {
            if self.held.contains(&code) {
                self.camera.apply_move(direction, dt);
            }
        }
        self.model.spin(SPIN_DEG_PER_SEC.to_radians(), dt);

        match gpu.render(&self.camera, &self.model, self.lit) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("Surface lost; reconfiguring.");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                self.fatal = Some(anyhow::anyhow!("GPU out of memory"));
                event_loop.exit();
            }
            Err(err) => {
                log::warn!("Frame skipped: {err:?}");
            }
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("meshview")
            .with_inner_size(PhysicalSize::new(self.width, self.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                self.fatal = Some(anyhow::Error::from(err).context("Failed to create window"));
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        match pollster::block_on(GpuState::new(window.clone(), self.backends, &self.mesh)) {
            Ok(gpu) => {
                self.gpu = Some(gpu);
                self.window = Some(window);
                self.last_frame = Instant::now();
            }
            Err(err) => {
                self.fatal = Some(err.context("Failed to initialize GPU state"));
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.look_active = state == ElementState::Pressed;
                if let Some(window) = self.window.as_ref() {
                    window.set_cursor_visible(!self.look_active);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.camera.apply_scroll(scroll_amount(delta));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => {
                    if code == KeyCode::KeyN && !repeat {
                        self.lit = !self.lit;
                        log::info!(
                            "Shading mode: {}",
                            if self.lit { "lit" } else { "normals" }
                        );
                    }
                    self.held.insert(code);
                }
                ElementState::Released => {
                    self.held.remove(&code);
                }
            },
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.look_active {
                // Screen y grows downward; the camera expects up-positive.
                self.camera.apply_look(dx as f32, -(dy as f32));
            }
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

/// Normalize the two wheel delta encodings into "lines scrolled".
fn scroll_amount(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.05,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn scroll_amount_handles_both_encodings() {
        assert_eq!(scroll_amount(MouseScrollDelta::LineDelta(0.0, 2.0)), 2.0);
        let px = scroll_amount(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));
        assert!((px - 2.0).abs() < 1e-6);
    }

    #[test]
    fn key_bindings_cover_all_six_directions() {
        let dirs: HashSet<MoveDirection> = KEY_BINDINGS.iter().map(|(_, d)| *d).collect();
        assert_eq!(dirs.len(), 6);
        let keys: HashSet<KeyCode> = KEY_BINDINGS.iter().map(|(k, _)| *k).collect();
        assert_eq!(keys.len(), 6);
    }
}
