//! Window creation, event dispatch, and the per-frame loop.
//!
//! [`OrreryApp`] implements winit's [`ApplicationHandler`]: `resumed` creates
//! the window, initializes the GPU and loads the scene; `window_event` routes
//! input to the camera and hotkey actions and drives one frame per
//! `RedrawRequested`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use orrery_camera::{CameraMode, OrbitCamera, chase_view, perspective_projection};
use orrery_config::Config;
use orrery_input::{Action, KeyBinding, KeyMap, MouseState};
use orrery_lighting::{LightRig, LightRole, sun_light};
use orrery_render::{Renderer, SurfaceError, init_render_context_blocking};
use orrery_scene::{
    ActorRegistry, FrameContext, MAX_CAR_SPEED, MIN_CAR_SPEED, ModeState, SPEED_STEP, SimClock,
    bump_speed, update_car_angle,
};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::window::{Window, WindowAttributes, WindowId};

use crate::scene;

/// Frames between debug overlay log lines.
const OVERLAY_LOG_INTERVAL: u64 = 120;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Apply `action name -> key name` overrides from the config file.
///
/// Names use the RON spellings of [`Action`] variants and winit `KeyCode`
/// debug names (e.g. `"TogglePause": "Space"`). Unknown names are logged
/// and skipped so a typo never loses the default binding.
fn apply_keybinding_overrides(keymap: &mut KeyMap, overrides: &HashMap<String, String>) {
    for (action_name, key_name) in overrides {
        let Ok(action) = ron::from_str::<Action>(action_name) else {
            warn!("unknown action in keybindings: {action_name}");
            continue;
        };
        match ron::from_str::<KeyBinding>(&format!("(\"{key_name}\")")) {
            Ok(binding) => keymap.set_binding(action, binding.0),
            Err(_) => warn!("unknown key in keybindings: {key_name}"),
        }
    }
}

/// Application state that owns the window, the renderer, and the scene.
pub struct OrreryApp {
    config: Config,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    clock: SimClock,
    modes: ModeState,
    camera: OrbitCamera,
    camera_mode: CameraMode,
    mouse: MouseState,
    keymap: KeyMap,
    registry: ActorRegistry,
    rig: LightRig,
    car_speed: f32,
    start: Instant,
    frame_count: u64,
}

impl OrreryApp {
    /// Build the pre-window state from a configuration.
    pub fn new(config: Config) -> Self {
        let mut modes = ModeState::new();
        if config.scene.bloom {
            modes.toggle_bloom();
        }
        if config.scene.headlights {
            modes.toggle_headlights();
        }
        if config.debug.show_overlay {
            modes.toggle_debug_overlay();
        }

        let mut keymap = KeyMap::default();
        apply_keybinding_overrides(&mut keymap, &config.input.keybindings);

        let car_speed = config.scene.car_speed.clamp(MIN_CAR_SPEED, MAX_CAR_SPEED);

        Self {
            config,
            window: None,
            renderer: None,
            clock: SimClock::new(),
            modes,
            camera: OrbitCamera::new(),
            camera_mode: CameraMode::default(),
            mouse: MouseState::new(),
            keymap,
            registry: ActorRegistry::new(),
            rig: LightRig::new(),
            car_speed,
            start: Instant::now(),
            frame_count: 0,
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::TogglePause => self.modes.toggle_pause(),
            Action::ToggleBloom => self.modes.toggle_bloom(),
            Action::ToggleShading => self.modes.toggle_shading(),
            Action::ToggleHeadlights => {
                let on = self.modes.toggle_headlights();
                self.rig.toggle_headlights(on);
            }
            Action::ChaseFront => self.camera_mode.toggle_front(),
            Action::ChaseBack => self.camera_mode.toggle_back(),
            Action::SpeedUp => {
                if self.car_speed < MAX_CAR_SPEED {
                    self.change_speed(SPEED_STEP);
                }
            }
            Action::SpeedDown => {
                if self.car_speed > MIN_CAR_SPEED {
                    self.change_speed(-SPEED_STEP);
                }
            }
            Action::ToggleDebugOverlay => self.modes.toggle_debug_overlay(),
        }
    }

    /// Change the car speed by one step.
    ///
    /// The heading is rebased first so the distance travelled under the old
    /// speed is anchored before the new speed takes effect.
    fn change_speed(&mut self, delta: f32) {
        let ctx = self.simulation_context();
        update_car_angle(&ctx, &mut self.registry.vehicle);
        self.car_speed = bump_speed(self.car_speed, delta);
        info!("car speed set to {:.1}", self.car_speed);
    }

    /// Context carrying only simulation state, for updates that run outside
    /// the frame cadence or before the view matrix exists.
    fn simulation_context(&self) -> FrameContext {
        FrameContext {
            sim_time: self.clock.sim_time_f32(),
            view: glam::Mat4::IDENTITY,
            scene_view: glam::Mat4::IDENTITY,
            projection: glam::Mat4::IDENTITY,
            ambient_light_color: FrameContext::AMBIENT,
            flat_shading: false,
            car_speed: self.car_speed,
            vehicle_heading: self.registry.vehicle_heading(),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frame_count += 1;
        self.clock
            .advance(self.start.elapsed().as_secs_f64(), self.modes.paused());

        let sensitivity = self.config.input.mouse_sensitivity;
        if let Some((delta, pan)) = self.mouse.drag() {
            self.camera
                .on_drag(delta.x * sensitivity, delta.y * sensitivity, pan);
        }
        // winit's wheel is positive scrolling up; the zoom convention is
        // positive zooms out, so the sign flips here.
        let scroll = self.mouse.scroll();
        if scroll != 0.0 {
            self.camera.on_wheel(-scroll);
        }

        let toggles = self.modes.snapshot();

        // Actors advance first with a simulation-only context; the frame
        // context is then built from the post-update heading.
        let sim_ctx = self.simulation_context();
        self.registry.update_all(&sim_ctx);

        let heading = self.registry.vehicle_heading();
        let view =
            chase_view(self.camera_mode, heading).unwrap_or_else(|| self.camera.view_matrix());

        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        let (width, height) = renderer.surface_size();
        let ctx = FrameContext {
            sim_time: self.clock.sim_time_f32(),
            view,
            scene_view: view,
            projection: perspective_projection(width, height),
            ambient_light_color: FrameContext::AMBIENT,
            flat_shading: toggles.flat_shading,
            car_speed: self.car_speed,
            vehicle_heading: heading,
        };

        for (_, light) in self.rig.iter_mut() {
            light.update_simulation(&ctx);
        }

        match renderer.render(&ctx, toggles, &self.registry, &self.rig) {
            Ok(()) => {}
            Err(SurfaceError::OutOfMemory) => {
                error!("surface out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(err) => warn!("frame dropped: {err}"),
        }

        if toggles.debug_overlay && self.frame_count.is_multiple_of(OVERLAY_LOG_INTERVAL) {
            info!(
                "overlay: t={:.1}s speed={:.1} lights={} camera={:?}",
                self.clock.sim_time(),
                self.car_speed,
                self.rig.len(),
                self.camera_mode,
            );
        }

        self.mouse.clear_transients();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for OrreryApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("window creation failed: {err}");
                event_loop.exit();
                return;
            }
        };

        let context = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(context) => context,
            Err(err) => {
                error!("GPU initialization failed: {err}");
                event_loop.exit();
                return;
            }
        };
        let mut renderer = Renderer::new(context, self.config.render.shadow_map_resolution);

        let asset_dir = scene::default_asset_dir();
        match scene::build_scene(&mut renderer, &asset_dir, self.car_speed) {
            Ok(registry) => self.registry = registry,
            Err(err) => {
                error!("scene loading failed: {err}");
                event_loop.exit();
                return;
            }
        }

        self.rig.insert(LightRole::Sun, sun_light());
        self.rig.toggle_headlights(self.modes.headlights());

        info!(
            "scene ready: {} plain, {} procedural, {} bloom actors, {} lights",
            self.registry.plain.len(),
            self.registry.procedural.len(),
            self.registry.bloom.len(),
            self.rig.len()
        );

        window.request_redraw();
        self.renderer = Some(renderer);
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(size.width, size.height);
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.mouse.on_modifiers(modifiers.state().shift_key());
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && let PhysicalKey::Code(code) = event.physical_key
                    && let Some(action) = self.keymap.action_for(code)
                {
                    self.handle_action(action);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Build the event loop and run the viewer until exit.
pub fn run_with_config(config: Config) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = OrreryApp::new(config);
    event_loop.run_app(&mut app).expect("Event loop failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_config_seeds_toggles() {
        let mut config = Config::default();
        config.scene.bloom = true;
        config.scene.headlights = true;
        config.debug.show_overlay = true;
        let app = OrreryApp::new(config);
        let toggles = app.modes.snapshot();
        assert!(toggles.bloom);
        assert!(toggles.headlights);
        assert!(toggles.debug_overlay);
        assert!(!toggles.paused);
    }

    #[test]
    fn test_config_speed_is_clamped() {
        let mut config = Config::default();
        config.scene.car_speed = 5.0;
        let app = OrreryApp::new(config);
        assert_eq!(app.car_speed, MAX_CAR_SPEED);
    }

    #[test]
    fn test_keybinding_override_applied() {
        let mut config = Config::default();
        config
            .input
            .keybindings
            .insert("TogglePause".to_string(), "Space".to_string());
        let app = OrreryApp::new(config);
        assert_eq!(
            app.keymap.action_for(KeyCode::Space),
            Some(Action::TogglePause)
        );
        assert_eq!(app.keymap.action_for(KeyCode::KeyP), None);
    }

    #[test]
    fn test_bad_keybinding_override_keeps_default() {
        let mut config = Config::default();
        config
            .input
            .keybindings
            .insert("TogglePause".to_string(), "NotAKey".to_string());
        let app = OrreryApp::new(config);
        assert_eq!(
            app.keymap.action_for(KeyCode::KeyP),
            Some(Action::TogglePause)
        );
    }

    #[test]
    fn test_speed_keys_respect_range_guards() {
        let mut config = Config::default();
        config.scene.car_speed = MAX_CAR_SPEED;
        let mut app = OrreryApp::new(config);
        app.handle_action(Action::SpeedUp);
        assert_eq!(app.car_speed, MAX_CAR_SPEED);

        app.car_speed = MIN_CAR_SPEED;
        app.handle_action(Action::SpeedDown);
        assert_eq!(app.car_speed, MIN_CAR_SPEED);

        app.handle_action(Action::SpeedUp);
        assert!((app.car_speed - SPEED_STEP).abs() < 1e-6);
    }

    #[test]
    fn test_headlight_action_mirrors_into_rig() {
        let mut app = OrreryApp::new(Config::default());
        assert!(!app.rig.contains(LightRole::HeadlightLeft));
        app.handle_action(Action::ToggleHeadlights);
        assert!(app.rig.contains(LightRole::HeadlightLeft));
        assert!(app.rig.contains(LightRole::HeadlightRight));
        app.handle_action(Action::ToggleHeadlights);
        assert!(!app.rig.contains(LightRole::HeadlightLeft));
    }

    #[test]
    fn test_pointer_drag_end_to_end_adds_half_radian_of_azimuth() {
        let mut app = OrreryApp::new(Config::default());
        let start = app.camera.azimuth;

        app.mouse.on_cursor_moved(200.0, 100.0);
        app.mouse.clear_transients();
        app.mouse
            .on_button(winit::event::MouseButton::Left, ElementState::Pressed);
        app.mouse.on_cursor_moved(300.0, 100.0);

        let sensitivity = app.config.input.mouse_sensitivity;
        let (delta, pan) = app.mouse.drag().unwrap();
        app.camera
            .on_drag(delta.x * sensitivity, delta.y * sensitivity, pan);

        // 100 px at 0.005 rad/px.
        assert!((app.camera.azimuth - start - 0.5).abs() < 1e-5);
        assert!(!pan);
    }

    #[test]
    fn test_chase_keys_toggle_through_orbit() {
        let mut app = OrreryApp::new(Config::default());
        app.handle_action(Action::ChaseFront);
        assert_eq!(app.camera_mode, CameraMode::ChaseFront);
        app.handle_action(Action::ChaseFront);
        assert_eq!(app.camera_mode, CameraMode::Orbit);
        app.handle_action(Action::ChaseBack);
        assert_eq!(app.camera_mode, CameraMode::ChaseBack);
    }
}
