use anyhow::{Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::locomotion::Waypoint;

/// On-disk path: plain positions in traversal order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaypointFile {
    pub waypoints: Vec<Vec3>,
}

impl WaypointFile {
    pub fn from_waypoints(waypoints: &[Waypoint]) -> Self {
        Self {
            waypoints: waypoints.iter().map(|w| w.position).collect(),
        }
    }
}

pub fn load_waypoints(path: impl AsRef<Path>) -> Result<Vec<Vec3>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read waypoints {:?}", path))?;
    let file: WaypointFile =
        serde_json::from_str(&text).with_context(|| format!("Failed to parse waypoints {:?}", path))?;
    log::info!("Loaded {} waypoints from {:?}", file.waypoints.len(), path);
    Ok(file.waypoints)
}

pub fn save_waypoints(path: impl AsRef<Path>, waypoints: &[Waypoint]) -> Result<()> {
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(&WaypointFile::from_waypoints(waypoints))?;
    std::fs::write(path, text).with_context(|| format!("Failed to write waypoints {:?}", path))?;
    log::info!("Saved {} waypoints to {:?}", waypoints.len(), path);
    Ok(())
}
