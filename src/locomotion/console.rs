use crate::camera::Camera;
use crate::error::{ConsoleError, ControllerError};

use super::controller::FirstPersonController;
use super::path::Waypoint;

/// Waypoint operations exposed to a debugging console, one method per command
pub trait WaypointCommands {
    /// `y` defaults to walking height over the terrain
    fn add_waypoint(&mut self, x: f32, y: Option<f32>, z: f32) -> usize;
    fn add_current_position(&mut self) -> usize;
    fn clear_waypoints(&mut self);
    fn follow_path(&mut self, start: usize) -> Result<usize, ControllerError>;
    fn stop_following_path(&mut self);
    fn get_waypoints(&self) -> Vec<Waypoint>;
}

/// Controller plus the live camera, borrowed for one console command
pub struct WaypointConsole<'a> {
    controller: &'a mut FirstPersonController,
    camera: &'a Camera,
}

impl<'a> WaypointConsole<'a> {
    pub fn new(controller: &'a mut FirstPersonController, camera: &'a Camera) -> Self {
        Self { controller, camera }
    }

    pub fn execute(&mut self, line: &str) -> Result<String, ConsoleError> {
        execute(self, line)
    }
}

impl WaypointCommands for WaypointConsole<'_> {
    fn add_waypoint(&mut self, x: f32, y: Option<f32>, z: f32) -> usize {
        self.controller.add_waypoint_xz(x, y, z)
    }

    fn add_current_position(&mut self) -> usize {
        self.controller.add_current_position(self.camera)
    }

    fn clear_waypoints(&mut self) {
        self.controller.clear_waypoints();
    }

    fn follow_path(&mut self, start: usize) -> Result<usize, ControllerError> {
        self.controller.follow_path(start)
    }

    fn stop_following_path(&mut self) {
        self.controller.stop_following_path();
    }

    fn get_waypoints(&self) -> Vec<Waypoint> {
        self.controller.waypoints()
    }
}

const ADD_USAGE: &str = "add <x> [y] <z>";
const FOLLOW_USAGE: &str = "follow [start]";

fn number(token: &str) -> Result<f32, ConsoleError> {
    token
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ConsoleError::BadNumber(token.to_string()))
}

/// Parse one console line and run it. Returns the text to echo back.
///
/// ```text
/// add <x> [y] <z>   append a waypoint
/// here              append the camera position
/// clear             remove all waypoints
/// follow [start]    walk the path from `start` (default 0)
/// stop              stop walking the path
/// list              waypoints as JSON
/// ```
pub fn execute<C: WaypointCommands + ?Sized>(commands: &mut C, line: &str) -> Result<String, ConsoleError> {
    let mut tokens = line.split_whitespace();
    let Some(command) = tokens.next() else {
        return Ok(String::new());
    };
    let args: Vec<&str> = tokens.collect();

    match command {
        "add" => {
            let (x, y, z) = match args.as_slice() {
                [x, z] => (number(x)?, None, number(z)?),
                [x, y, z] => (number(x)?, Some(number(y)?), number(z)?),
                _ => return Err(ConsoleError::Usage(ADD_USAGE)),
            };
            Ok(format!("waypoint {}", commands.add_waypoint(x, y, z)))
        }
        "here" => Ok(format!("waypoint {}", commands.add_current_position())),
        "clear" => {
            commands.clear_waypoints();
            Ok("cleared".to_string())
        }
        "follow" => {
            let start = match args.as_slice() {
                [] => 0,
                [start] => start
                    .parse::<usize>()
                    .map_err(|_| ConsoleError::BadNumber(start.to_string()))?,
                _ => return Err(ConsoleError::Usage(FOLLOW_USAGE)),
            };
            let index = commands.follow_path(start)?;
            Ok(format!("following from waypoint {}", index))
        }
        "stop" => {
            commands.stop_following_path();
            Ok("stopped".to_string())
        }
        "list" => {
            let waypoints = commands.get_waypoints();
            serde_json::to_string(&waypoints).map_err(|e| ConsoleError::Format(e.to_string()))
        }
        other => Err(ConsoleError::UnknownCommand(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Records calls without a controller
    #[derive(Default)]
    struct Recorder {
        points: Vec<(f32, Option<f32>, f32)>,
        here: usize,
        following: Option<usize>,
    }

    impl WaypointCommands for Recorder {
        fn add_waypoint(&mut self, x: f32, y: Option<f32>, z: f32) -> usize {
            self.points.push((x, y, z));
            self.points.len() - 1
        }

        fn add_current_position(&mut self) -> usize {
            self.here += 1;
            self.points.push((0.0, Some(0.0), 0.0));
            self.points.len() - 1
        }

        fn clear_waypoints(&mut self) {
            self.points.clear();
        }

        fn follow_path(&mut self, start: usize) -> Result<usize, ControllerError> {
            if self.points.is_empty() {
                return Err(ControllerError::EmptyPath);
            }
            let index = start.min(self.points.len() - 1);
            self.following = Some(index);
            Ok(index)
        }

        fn stop_following_path(&mut self) {
            self.following = None;
        }

        fn get_waypoints(&self) -> Vec<Waypoint> {
            self.points
                .iter()
                .enumerate()
                .map(|(index, &(x, y, z))| Waypoint {
                    index,
                    position: Vec3::new(x, y.unwrap_or(0.0), z),
                })
                .collect()
        }
    }

    #[test]
    fn test_add_with_and_without_y() {
        let mut rec = Recorder::default();
        assert_eq!(execute(&mut rec, "add 1 2").unwrap(), "waypoint 0");
        assert_eq!(execute(&mut rec, "add 1 5 2").unwrap(), "waypoint 1");
        assert_eq!(rec.points, vec![(1.0, None, 2.0), (1.0, Some(5.0), 2.0)]);
    }

    #[test]
    fn test_add_usage_and_bad_numbers() {
        let mut rec = Recorder::default();
        assert_eq!(execute(&mut rec, "add 1"), Err(ConsoleError::Usage(ADD_USAGE)));
        assert_eq!(
            execute(&mut rec, "add x 2"),
            Err(ConsoleError::BadNumber("x".to_string()))
        );
        assert_eq!(
            execute(&mut rec, "add NaN 2"),
            Err(ConsoleError::BadNumber("NaN".to_string()))
        );
        assert!(rec.points.is_empty());
    }

    #[test]
    fn test_follow_and_stop() {
        let mut rec = Recorder::default();
        assert_eq!(
            execute(&mut rec, "follow"),
            Err(ConsoleError::Controller(ControllerError::EmptyPath))
        );

        execute(&mut rec, "here").unwrap();
        execute(&mut rec, "add 3 4").unwrap();
        assert_eq!(execute(&mut rec, "follow 7").unwrap(), "following from waypoint 1");
        assert_eq!(rec.following, Some(1));

        execute(&mut rec, "stop").unwrap();
        assert_eq!(rec.following, None);
        assert_eq!(rec.here, 1);
    }

    #[test]
    fn test_list_is_json() {
        let mut rec = Recorder::default();
        execute(&mut rec, "add 1 2 3").unwrap();
        let json = execute(&mut rec, "list").unwrap();
        let parsed: Vec<Waypoint> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0].position, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_unknown_and_empty_lines() {
        let mut rec = Recorder::default();
        assert_eq!(execute(&mut rec, "   ").unwrap(), "");
        assert_eq!(
            execute(&mut rec, "jump"),
            Err(ConsoleError::UnknownCommand("jump".to_string()))
        );
        execute(&mut rec, "add 1 1").unwrap();
        execute(&mut rec, "clear").unwrap();
        assert!(rec.points.is_empty());
    }
}
