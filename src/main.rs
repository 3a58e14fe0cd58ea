use std::io::BufRead;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use castro_walk::camera::Camera;
use castro_walk::cli::{Cli, Command};
use castro_walk::config::ControllerConfig;
use castro_walk::core::clock::Clock;
use castro_walk::core::input_adapter::WinitInput;
use castro_walk::core::pointer::WindowPointer;
use castro_walk::core::timer::FixedHz;
use castro_walk::loaders::{load_gltf_terrain, load_waypoints, save_waypoints};
use castro_walk::locomotion::{FirstPersonController, Mode, NoVisuals};
use castro_walk::replay::replay_path;
use castro_walk::terrain::{Heightfield, MeshTerrain, TerrainModel};

// === Constants ===

const HUD_HZ: f32 = 4.0;
const HEADLAND_SIZE: f32 = 400.0;
const HEADLAND_RESOLUTION: usize = 128;
const INITIAL_WINDOW_WIDTH: u32 = 1280;
const INITIAL_WINDOW_HEIGHT: u32 = 720;
const TITLE: &str = "Castro Walk";

// === Application ===

struct App {
    config: ControllerConfig,
    show_hud: bool,
    terrain: Option<MeshTerrain>,
    camera: Camera,
    window: Option<Arc<Window>>,
    controller: Option<FirstPersonController>,
    input: WinitInput,
    clock: Clock,
    hud: FixedHz,
}

impl App {
    fn new(config: ControllerConfig, terrain: Option<MeshTerrain>, show_hud: bool) -> Self {
        Self {
            config,
            show_hud,
            terrain,
            camera: Camera::default(),
            window: None,
            controller: None,
            input: WinitInput::new(),
            clock: Clock::new(),
            hud: FixedHz::new(HUD_HZ),
        }
    }

    fn is_first_person(&self) -> bool {
        self.controller.as_ref().is_some_and(|c| c.is_active())
    }

    fn toggle_first_person(&mut self) {
        let terrain = self.terrain.as_ref().map(|t| t as &dyn TerrainModel);
        let Some(controller) = self.controller.as_mut() else {
            return;
        };
        match controller.toggle(&mut self.camera, terrain) {
            Ok(mode) => log::debug!("Walker mode: {:?}", mode),
            Err(e) => log::warn!("{}", e),
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        let Some(window) = &self.window else {
            return;
        };
        if !self.show_hud {
            return;
        }
        let title = match self.controller.as_ref() {
            Some(controller) if controller.mode() != Mode::Inactive => {
                let p = self.camera.position;
                format!(
                    "{} | X: {:.2} Y: {:.2} Z: {:.2} | {:?}{}",
                    TITLE,
                    p.x,
                    p.y,
                    p.z,
                    controller.mode(),
                    if controller.is_grounded() { "" } else { " (off ground)" }
                )
            }
            _ => TITLE.to_string(),
        };
        window.set_title(&title);
    }

    /// One line typed on stdin
    fn run_console_line(&mut self, line: &str) {
        let Some(controller) = self.controller.as_mut() else {
            return;
        };

        let reply = match line.trim().split_once(' ') {
            Some(("save", path)) => save_waypoints(path.trim(), &controller.waypoints())
                .map(|()| format!("saved to {}", path.trim()))
                .map_err(|e| format!("{:#}", e)),
            Some(("load", path)) => match load_waypoints(path.trim()) {
                Ok(points) => {
                    controller.clear_waypoints();
                    for point in &points {
                        controller.add_waypoint(*point);
                    }
                    Ok(format!("loaded {} waypoints", points.len()))
                }
                Err(e) => Err(format!("{:#}", e)),
            },
            _ => controller.console(&self.camera).execute(line).map_err(|e| e.to_string()),
        };

        match reply {
            Ok(text) if text.is_empty() => {}
            Ok(text) => println!("{}", text),
            Err(e) => eprintln!("{}", e),
        }
    }
}

impl ApplicationHandler<String> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window = match event_loop.create_window(
                Window::default_attributes()
                    .with_title(TITLE)
                    .with_inner_size(winit::dpi::LogicalSize::new(
                        INITIAL_WINDOW_WIDTH,
                        INITIAL_WINDOW_HEIGHT,
                    )),
            ) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    eprintln!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            self.controller = Some(FirstPersonController::new(
                self.config.clone(),
                Box::new(WindowPointer::new(window.clone())),
                Box::new(NoVisuals::default()),
            ));
            self.window = Some(window);
            self.clock.reset();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Tab | KeyCode::F1),
                        repeat: false,
                        ..
                    },
                ..
            } => self.toggle_first_person(),
            WindowEvent::KeyboardInput { event, .. }
                if quits_app(event.state, event.physical_key, event.repeat, self.is_first_person()) =>
            {
                event_loop.exit()
            }
            WindowEvent::Focused(false) => {
                if let Some(controller) = self.controller.as_mut() {
                    controller.release_pointer();
                }
            }
            WindowEvent::RedrawRequested => {
                let frame = self.clock.next_frame();
                let terrain = self.terrain.as_ref().map(|t| t as &dyn TerrainModel);
                if let Some(controller) = self.controller.as_mut() {
                    controller.update(&mut self.camera, terrain, &frame);
                }
                if self.hud.tick(frame.delta) {
                    self.refresh_title();
                }
            }
            event => {
                if let (Some(input), Some(controller)) = (self.input.window_event(&event), self.controller.as_mut()) {
                    controller.handle_input(input);
                }
            }
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        if let (Some(input), Some(controller)) = (self.input.device_event(&event), self.controller.as_mut()) {
            controller.handle_input(input);
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, line: String) {
        self.run_console_line(&line);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

/// Escape quits only on a fresh press outside first person. Auto-repeat from
/// the press that left first person must not close the window.
fn quits_app(state: ElementState, key: PhysicalKey, repeat: bool, first_person: bool) -> bool {
    state == ElementState::Pressed && key == PhysicalKey::Code(KeyCode::Escape) && !repeat && !first_person
}

// === Startup ===

fn load_terrain(cli: &Cli) -> Option<MeshTerrain> {
    match &cli.terrain {
        Some(path) => match load_gltf_terrain(path) {
            Ok(terrain) => Some(terrain),
            Err(e) => {
                log::error!("{:#}", e);
                None
            }
        },
        None => {
            log::info!("No terrain given, generating the coastal headland");
            Some(Heightfield::coastal_headland(HEADLAND_SIZE, HEADLAND_RESOLUTION).into_terrain())
        }
    }
}

/// Forward stdin lines to the event loop as console commands
fn spawn_console(proxy: EventLoopProxy<String>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if proxy.send_event(line).is_err() {
                break;
            }
        }
    });
}

fn run_replay(config: ControllerConfig, terrain: Option<&MeshTerrain>, waypoints: &std::path::Path, frames: usize, dt: f32) -> Result<()> {
    let terrain = terrain.context("Replay needs a terrain model")?;
    let waypoints = load_waypoints(waypoints)?;
    let trace = replay_path(config, terrain, &waypoints, frames, dt)?;
    for sample in &trace {
        println!("{}", serde_json::to_string(sample)?);
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ControllerConfig::load(path)?,
        None => ControllerConfig::default(),
    };
    if let Some(kind) = cli.sampler {
        config.sampler = kind.to_config();
    }
    let terrain = load_terrain(&cli);

    if let Some(Command::Replay { waypoints, frames, dt }) = &cli.command {
        return run_replay(config, terrain.as_ref(), waypoints, *frames, *dt);
    }

    let event_loop = EventLoop::<String>::with_user_event().build()?;
    if !cli.no_ui {
        spawn_console(event_loop.create_proxy());
    }
    let mut app = App::new(config, terrain, !cli.no_ui);

    println!("Castro Walk - Tab/F1: first person, WASD: walk, Shift+P/C/F: add/clear/follow path, Escape: leave");
    if !cli.no_ui {
        println!("Console: add <x> [y] <z> | here | clear | follow [i] | stop | list | save <file> | load <file>");
    }
    event_loop.run_app(&mut app)?;

    Ok(())
}
