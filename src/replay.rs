//! Headless path walk: drive the controller with a fixed clock and record the pose.

use glam::Vec3;
use serde::Serialize;

use crate::camera::Camera;
use crate::config::ControllerConfig;
use crate::core::pointer::NoPointer;
use crate::error::ControllerError;
use crate::frame::FixedFrames;
use crate::locomotion::{FirstPersonController, Mode, NoVisuals};
use crate::terrain::TerrainModel;

/// Camera state after one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TraceSample {
    pub frame: u64,
    pub time: f32,
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub mode: Mode,
    pub waypoint: Option<usize>,
    pub grounded: bool,
}

/// Activate on `terrain`, follow `waypoints` from the first and record `frames` frames
pub fn replay_path(
    config: ControllerConfig,
    terrain: &dyn TerrainModel,
    waypoints: &[Vec3],
    frames: usize,
    delta: f32,
) -> Result<Vec<TraceSample>, ControllerError> {
    let mut camera = Camera::default();
    let mut controller = FirstPersonController::new(config, Box::new(NoPointer), Box::new(NoVisuals::default()));

    controller.activate(&mut camera, Some(terrain))?;
    for &waypoint in waypoints {
        controller.add_waypoint(waypoint);
    }
    controller.follow_path(0)?;

    let trace = FixedFrames::new(delta)
        .take(frames)
        .map(|frame| {
            controller.update(&mut camera, Some(terrain), &frame);
            TraceSample {
                frame: frame.number,
                time: frame.time,
                position: camera.position,
                yaw: camera.yaw,
                pitch: camera.pitch,
                mode: controller.mode(),
                waypoint: controller.path().current_index(),
                grounded: controller.is_grounded(),
            }
        })
        .collect();

    controller.deactivate(&mut camera)?;
    Ok(trace)
}
