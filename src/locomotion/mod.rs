//! First-person walking: input to target, target to camera, waypoint paths.

pub mod applier;
pub mod console;
pub mod controller;
pub mod path;

pub use applier::PoseApplier;
pub use console::{execute, WaypointCommands, WaypointConsole};
pub use controller::{FirstPersonController, Mode};
pub use path::{
    LineStyle, MarkerStyle, NoVisuals, PathVisuals, Rgb, VisualHandle, Waypoint, WaypointPath, PATH_LINE,
    WAYPOINT_MARKER,
};
