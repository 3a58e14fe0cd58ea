pub mod gltf_terrain;
pub mod waypoints;

pub use gltf_terrain::load_gltf_terrain;
pub use waypoints::{load_waypoints, save_waypoints, WaypointFile};
