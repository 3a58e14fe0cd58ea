use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ControllerError;

/// Opaque id of something the host drew for the path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// Linear RGB
pub type Rgb = [f32; 3];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub radius: f32,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Rgb,
}

pub const WAYPOINT_MARKER: MarkerStyle = MarkerStyle {
    radius: 0.5,
    color: [1.0, 0.0, 0.0],
};

pub const PATH_LINE: LineStyle = LineStyle { color: [1.0, 1.0, 0.0] };

/// Scene side of the path: spheres at the waypoints and a polyline through them
pub trait PathVisuals {
    fn spawn_marker(&mut self, position: Vec3, style: &MarkerStyle) -> VisualHandle;
    fn spawn_line(&mut self, points: &[Vec3], style: &LineStyle) -> VisualHandle;
    fn despawn(&mut self, handle: VisualHandle);
}

/// Visuals sink for headless hosts
#[derive(Debug, Default)]
pub struct NoVisuals {
    next: u64,
}

impl PathVisuals for NoVisuals {
    fn spawn_marker(&mut self, _position: Vec3, _style: &MarkerStyle) -> VisualHandle {
        self.next += 1;
        VisualHandle(self.next)
    }

    fn spawn_line(&mut self, _points: &[Vec3], _style: &LineStyle) -> VisualHandle {
        self.next += 1;
        VisualHandle(self.next)
    }

    fn despawn(&mut self, _handle: VisualHandle) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub index: usize,
    pub position: Vec3,
}

/// Recorded waypoints, their visuals and the follow cursor
///
/// `current` is `None` until following starts and stays put on stop, so a
/// later `follow` can resume. While `following` is set `current` is always a
/// valid index.
pub struct WaypointPath {
    waypoints: Vec<Vec3>,
    visuals: Box<dyn PathVisuals>,
    markers: Vec<VisualHandle>,
    line: Option<VisualHandle>,
    current: Option<usize>,
    following: bool,
}

impl WaypointPath {
    pub fn new(visuals: Box<dyn PathVisuals>) -> Self {
        Self {
            waypoints: Vec::new(),
            visuals,
            markers: Vec::new(),
            line: None,
            current: None,
            following: false,
        }
    }

    /// Append a waypoint and return its index
    pub fn add(&mut self, position: Vec3) -> usize {
        let index = self.waypoints.len();
        self.waypoints.push(position);
        self.markers.push(self.visuals.spawn_marker(position, &WAYPOINT_MARKER));
        self.rebuild_line();
        log::info!(
            "Waypoint {} added at ({:.2}, {:.2}, {:.2})",
            index,
            position.x,
            position.y,
            position.z
        );
        index
    }

    fn rebuild_line(&mut self) {
        if let Some(line) = self.line.take() {
            self.visuals.despawn(line);
        }
        if self.waypoints.len() >= 2 {
            self.line = Some(self.visuals.spawn_line(&self.waypoints, &PATH_LINE));
        }
    }

    /// Remove every waypoint and visual, reset the follow cursor
    pub fn clear(&mut self) {
        for marker in self.markers.drain(..) {
            self.visuals.despawn(marker);
        }
        if let Some(line) = self.line.take() {
            self.visuals.despawn(line);
        }
        let removed = self.waypoints.len();
        self.waypoints.clear();
        self.current = None;
        self.following = false;
        if removed > 0 {
            log::info!("Cleared {} waypoints", removed);
        }
    }

    /// Snapshot copy; later mutation of the path does not affect it
    pub fn get_all(&self) -> Vec<Waypoint> {
        self.waypoints
            .iter()
            .enumerate()
            .map(|(index, &position)| Waypoint { index, position })
            .collect()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.waypoints
    }

    pub fn get(&self, index: usize) -> Option<Vec3> {
        self.waypoints.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Start following at `start`, clamped to the last waypoint
    pub fn follow(&mut self, start: usize) -> Result<usize, ControllerError> {
        if self.waypoints.is_empty() {
            log::warn!("No waypoints defined to follow");
            return Err(ControllerError::EmptyPath);
        }
        let last = self.waypoints.len() - 1;
        if start > last {
            log::warn!("Start index {} out of range, clamping to {}", start, last);
        }
        let index = start.min(last);
        self.current = Some(index);
        self.following = true;
        log::info!("Following path from waypoint {}", index);
        Ok(index)
    }

    /// Stop following; the cursor is kept
    pub fn stop(&mut self) {
        if self.following {
            log::info!("Stopped following path");
        }
        self.following = false;
    }

    pub fn is_following(&self) -> bool {
        self.following
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Waypoint being walked to, while following
    pub fn current_target(&self) -> Option<Vec3> {
        if !self.following {
            return None;
        }
        self.current.and_then(|i| self.get(i))
    }

    /// Move the cursor past the reached waypoint. Returns the new index, or
    /// `None` when the end was reached without looping (following stops).
    pub fn advance(&mut self, loop_path: bool) -> Option<usize> {
        let current = self.current?;
        let next = current + 1;
        if next < self.waypoints.len() {
            self.current = Some(next);
        } else if loop_path {
            self.current = Some(0);
        } else {
            log::info!("Reached end of path");
            self.following = false;
            return None;
        }
        log::debug!("Reached waypoint {}, heading to {:?}", current, self.current);
        self.current
    }
}

impl std::fmt::Debug for WaypointPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WaypointPath")
            .field("waypoints", &self.waypoints)
            .field("current", &self.current)
            .field("following", &self.following)
            .finish()
    }
}
