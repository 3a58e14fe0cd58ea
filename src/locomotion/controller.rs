use std::f32::consts::PI;

use glam::{Vec2, Vec3};
use serde::Serialize;

use super::applier::PoseApplier;
use super::console::WaypointConsole;
use super::path::{PathVisuals, Waypoint, WaypointPath};
use crate::camera::{Camera, CameraPose, RotationOrder};
use crate::config::ControllerConfig;
use crate::core::input::{Button, ButtonState, InputEvent, InputTracker, Shortcut};
use crate::core::pointer::PointerCapture;
use crate::core::timer::Countdown;
use crate::error::ControllerError;
use crate::frame::FrameInfo;
use crate::terrain::{sampler_for, HeightSampler, TerrainModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Inactive,
    Manual,
    FollowingPath,
}

/// First-person walker over a terrain model
///
/// The host owns the camera and the terrain and passes them into every call.
/// Device callbacks go to [`handle_input`](Self::handle_input), which only
/// records state; the camera moves in [`update`](Self::update), once per frame.
pub struct FirstPersonController {
    config: ControllerConfig,
    saved_pose: Option<CameraPose>,
    target: Vec3,
    last_move: Vec3,
    walk_clock: f32,
    bob_offset: f32,
    grounded: bool,
    input: InputTracker,
    path: WaypointPath,
    sampler: Box<dyn HeightSampler>,
    applier: PoseApplier,
    pointer: Box<dyn PointerCapture>,
    capture_timer: Countdown,
    terrain_missing_logged: bool,
}

impl FirstPersonController {
    pub fn new(config: ControllerConfig, pointer: Box<dyn PointerCapture>, visuals: Box<dyn PathVisuals>) -> Self {
        let sampler = sampler_for(&config.sampler, config.ray_headroom);
        Self::with_sampler(config, pointer, visuals, sampler)
    }

    /// Use a custom height strategy instead of the one named in the config
    pub fn with_sampler(
        config: ControllerConfig,
        pointer: Box<dyn PointerCapture>,
        visuals: Box<dyn PathVisuals>,
        sampler: Box<dyn HeightSampler>,
    ) -> Self {
        Self {
            applier: PoseApplier::new(config.smoothing_factor),
            capture_timer: Countdown::new(config.pointer_capture_delay_secs()),
            config,
            saved_pose: None,
            target: Vec3::ZERO,
            last_move: Vec3::ZERO,
            walk_clock: 0.0,
            bob_offset: 0.0,
            grounded: false,
            input: InputTracker::new(),
            path: WaypointPath::new(visuals),
            sampler,
            pointer,
            terrain_missing_logged: false,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.saved_pose.is_some()
    }

    pub fn mode(&self) -> Mode {
        match (self.is_active(), self.path.is_following()) {
            (false, _) => Mode::Inactive,
            (true, false) => Mode::Manual,
            (true, true) => Mode::FollowingPath,
        }
    }

    /// Position the live camera is chasing
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Ground contact from the last height sample
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_pointer_captured(&self) -> bool {
        self.pointer.is_captured()
    }

    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Enter first person: snapshot the pose and stand on the terrain center facing -Z
    pub fn activate(&mut self, camera: &mut Camera, terrain: Option<&dyn TerrainModel>) -> Result<(), ControllerError> {
        if self.is_active() {
            return Err(ControllerError::AlreadyActive);
        }
        let Some((terrain, bounds)) = terrain.and_then(|t| t.bounds().map(|b| (t, b))) else {
            log::warn!("Cannot enter first person: terrain model is not loaded");
            return Err(ControllerError::MissingTerrain);
        };

        self.saved_pose = Some(camera.pose());
        // Always enter in manual mode; a follow armed while inactive is dropped
        self.path.stop();

        self.sampler.reset();
        self.sampler.prepare(terrain);
        let center = bounds.center();
        let sample = self.sampler.sample(Some(terrain), Vec3::new(center.x, bounds.max.y, center.z));

        camera.rotation_order = RotationOrder::YawPitch;
        camera.position = Vec3::new(center.x, sample.height + self.config.elevation_offset, center.z);
        camera.yaw = PI;
        camera.pitch = 0.0;

        self.target = camera.position;
        self.last_move = Vec3::ZERO;
        self.walk_clock = 0.0;
        self.bob_offset = 0.0;
        self.grounded = sample.grounded;
        self.terrain_missing_logged = false;
        self.input.clear();
        self.capture_timer.start();

        log::info!(
            "First person activated at ({:.2}, {:.2}, {:.2}). Click the view to look around; WASD walks, Shift+P/C/F edit and follow the path",
            camera.position.x,
            camera.position.y,
            camera.position.z
        );
        Ok(())
    }

    /// Leave first person, restoring the pose saved at activation
    pub fn deactivate(&mut self, camera: &mut Camera) -> Result<(), ControllerError> {
        let Some(pose) = self.saved_pose.take() else {
            return Err(ControllerError::NotActive);
        };

        self.applier.restore(camera, pose);
        self.path.clear();
        self.capture_timer.cancel();
        self.pointer.release_capture();
        self.input.clear();
        self.sampler.reset();
        self.last_move = Vec3::ZERO;
        self.bob_offset = 0.0;

        log::info!("First person deactivated");
        Ok(())
    }

    /// Flip between inactive and active, returning the new mode
    pub fn toggle(&mut self, camera: &mut Camera, terrain: Option<&dyn TerrainModel>) -> Result<Mode, ControllerError> {
        if self.is_active() {
            self.deactivate(camera)?;
        } else {
            self.activate(camera, terrain)?;
        }
        Ok(self.mode())
    }

    /// Device callback. Records state only; ignored while inactive.
    pub fn handle_input(&mut self, event: InputEvent) {
        if !self.is_active() {
            return;
        }
        match event {
            InputEvent::Click => self.request_capture(),
            event => {
                if let Some(shortcut) = self.input.record(event) {
                    log::debug!("Queued shortcut {:?}", shortcut);
                }
            }
        }
    }

    /// The host lost the pointer (focus change); a click re-acquires it
    pub fn release_pointer(&mut self) {
        self.pointer.release_capture();
        self.input.clear();
    }

    fn request_capture(&mut self) {
        if self.pointer.is_captured() {
            return;
        }
        match self.pointer.request_capture() {
            Ok(()) => log::debug!("Pointer captured"),
            Err(e) => log::warn!("{}, mouse look disabled until the next click", e),
        }
    }

    /// One locomotion step followed by one apply step
    pub fn update(&mut self, camera: &mut Camera, terrain: Option<&dyn TerrainModel>, frame: &FrameInfo) {
        if !self.is_active() {
            return;
        }
        let dt = frame.delta;

        if self.capture_timer.tick(dt) {
            self.request_capture();
        }

        for shortcut in self.input.drain_shortcuts() {
            if self.run_shortcut(shortcut, camera) {
                return;
            }
        }

        self.apply_mouse_look(camera);

        let Some(terrain) = terrain.filter(|t| t.bounds().is_some()) else {
            if !self.terrain_missing_logged {
                log::warn!("Terrain model is not loaded, first person movement paused");
                self.terrain_missing_logged = true;
            }
            return;
        };
        self.terrain_missing_logged = false;

        if self.path.is_following() {
            self.step_path(camera, terrain, dt);
        } else {
            self.step_manual(camera, terrain, dt);
        }

        self.applier.apply(camera, self.target);
    }

    /// Returns true when the walker was switched off
    fn run_shortcut(&mut self, shortcut: Shortcut, camera: &mut Camera) -> bool {
        match shortcut {
            Shortcut::Exit => {
                // Active was checked by the caller
                let _ = self.deactivate(camera);
                return true;
            }
            Shortcut::AddWaypointHere => {
                self.add_current_position(camera);
            }
            Shortcut::ClearWaypoints => self.clear_waypoints(),
            Shortcut::ToggleFollow => {
                if self.path.is_following() {
                    self.stop_following_path();
                } else {
                    // An empty path is logged and ignored
                    let _ = self.follow_path(0);
                }
            }
        }
        false
    }

    fn apply_mouse_look(&mut self, camera: &mut Camera) {
        let delta = self.input.take_mouse_delta();
        if delta == Vec2::ZERO || !self.pointer.is_captured() {
            return;
        }
        let scale = self.config.turn_speed * self.config.mouse_sensitivity;
        let limit = self.config.pitch_limit;
        camera.yaw -= delta.x * scale;
        camera.pitch = (camera.pitch - delta.y * scale).clamp(-limit, limit);
    }

    /// Blend a fresh step with the previous one
    fn blend_step(&mut self, step: Vec3) -> Vec3 {
        let blended = step.lerp(self.last_move, self.config.move_blend);
        self.last_move = blended;
        blended
    }

    fn advance_bob(&mut self, dt: f32) {
        self.walk_clock += dt;
        self.bob_offset = (self.walk_clock * self.config.bob_frequency).sin() * self.config.bob_amplitude;
    }

    fn walk_to(&mut self, terrain: &dyn TerrainModel, next: Vec3) {
        let sample = self.sampler.sample(Some(terrain), next);
        self.grounded = sample.grounded;
        self.target = Vec3::new(
            next.x,
            sample.height + self.config.elevation_offset + self.bob_offset,
            next.z,
        );
    }

    fn step_manual(&mut self, camera: &Camera, terrain: &dyn TerrainModel, dt: f32) {
        let forward = camera.horizontal_forward();
        let right = camera.horizontal_right();

        let mut direction = Vec3::ZERO;
        if self.input.is_down(Button::KeyW) {
            direction += forward;
        }
        if self.input.is_down(Button::KeyS) {
            direction -= forward;
        }
        if self.input.is_down(Button::KeyA) {
            direction -= right;
        }
        if self.input.is_down(Button::KeyD) {
            direction += right;
        }

        let direction = direction.normalize_or_zero();
        if direction == Vec3::ZERO {
            self.last_move *= self.config.residual_decay;
            self.bob_offset *= self.config.bob_decay;
            self.target = Vec3::new(
                camera.position.x,
                self.sampler.last_height() + self.config.elevation_offset + self.bob_offset,
                camera.position.z,
            );
            return;
        }

        let step = self.blend_step(direction * self.config.walk_speed * dt);
        self.advance_bob(dt);
        self.walk_to(terrain, camera.position + step);
    }

    fn step_path(&mut self, camera: &mut Camera, terrain: &dyn TerrainModel, dt: f32) {
        let Some(waypoint) = self.path.current_target() else {
            return;
        };

        let to_waypoint = Vec2::new(waypoint.x - camera.position.x, waypoint.z - camera.position.z);
        if to_waypoint.length() < self.config.arrival_threshold {
            if let Some(next) = self.path.advance(self.config.loop_path) {
                log::info!("Reached waypoint, heading to waypoint {}", next);
                if let Some(next) = self.path.get(next) {
                    camera.look_at(Vec3::new(next.x, camera.position.y, next.z));
                }
            }
            // Target holds this frame
            return;
        }

        let direction = Vec3::new(to_waypoint.x, 0.0, to_waypoint.y).normalize_or_zero();
        let step = self.blend_step(direction * self.config.walk_speed * dt);
        self.advance_bob(dt);
        self.walk_to(terrain, camera.position + step);

        camera.look_at(Vec3::new(waypoint.x, camera.position.y, waypoint.z));
    }

    /// Height used for waypoints added without an explicit y
    pub fn default_waypoint_height(&self) -> f32 {
        self.sampler.last_height() + self.config.elevation_offset
    }

    pub fn add_waypoint(&mut self, position: Vec3) -> usize {
        self.path.add(position)
    }

    /// Waypoint at (x, z); a missing y stands at walking height
    pub fn add_waypoint_xz(&mut self, x: f32, y: Option<f32>, z: f32) -> usize {
        let y = y.unwrap_or_else(|| self.default_waypoint_height());
        self.path.add(Vec3::new(x, y, z))
    }

    pub fn add_current_position(&mut self, camera: &Camera) -> usize {
        self.path.add(camera.position)
    }

    pub fn clear_waypoints(&mut self) {
        self.path.clear();
    }

    pub fn follow_path(&mut self, start: usize) -> Result<usize, ControllerError> {
        self.path.follow(start)
    }

    pub fn stop_following_path(&mut self) {
        self.path.stop();
    }

    pub fn waypoints(&self) -> Vec<Waypoint> {
        self.path.get_all()
    }

    /// Command object for a debugging console, bound to the live camera
    pub fn console<'a>(&'a mut self, camera: &'a Camera) -> WaypointConsole<'a> {
        WaypointConsole::new(self, camera)
    }
}

impl std::fmt::Debug for FirstPersonController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirstPersonController")
            .field("mode", &self.mode())
            .field("target", &self.target)
            .field("grounded", &self.grounded)
            .field("path", &self.path)
            .finish()
    }
}
