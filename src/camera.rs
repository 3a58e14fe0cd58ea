use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Order in which yaw and pitch are composed. Roll is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RotationOrder {
    /// Pitch about X first, then yaw (the renderer default)
    #[default]
    PitchYaw,
    /// Yaw about Y first, then pitch; used for first person so the two never couple
    YawPitch,
}

/// Snapshot of everything the walker may change on the live camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub rotation_order: RotationOrder,
}

/// Host-owned live camera. Yaw 0 looks down +Z, yaw PI looks down -Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub rotation_order: RotationOrder,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f32, pitch: f32) -> Self {
        Self {
            position,
            yaw,
            pitch,
            rotation_order: RotationOrder::default(),
        }
    }

    /// Camera at `position` facing `target`
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self::new(position, 0.0, 0.0);
        camera.look_at(target);
        camera
    }

    pub fn orientation(&self) -> Quat {
        let yaw = Quat::from_rotation_y(self.yaw);
        let pitch = Quat::from_rotation_x(-self.pitch);
        match self.rotation_order {
            RotationOrder::YawPitch => yaw * pitch,
            RotationOrder::PitchYaw => pitch * yaw,
        }
    }

    pub fn forward(&self) -> Vec3 {
        (self.orientation() * Vec3::Z).normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize_or_zero()
    }

    pub fn up(&self) -> Vec3 {
        Vec3::Y
    }

    /// Forward flattened onto the ground plane
    pub fn horizontal_forward(&self) -> Vec3 {
        let f = self.forward();
        Vec3::new(f.x, 0.0, f.z).normalize_or_zero()
    }

    /// Right flattened onto the ground plane
    pub fn horizontal_right(&self) -> Vec3 {
        let r = self.right();
        Vec3::new(r.x, 0.0, r.z).normalize_or_zero()
    }

    /// Point the camera at `target`. No-op when the target is the eye position.
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.position;
        if dir.length_squared() < 1e-12 {
            return;
        }
        let horizontal = (dir.x * dir.x + dir.z * dir.z).sqrt();
        self.yaw = dir.x.atan2(dir.z);
        self.pitch = dir.y.atan2(horizontal);
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), Vec3::Y)
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            yaw: self.yaw,
            pitch: self.pitch,
            rotation_order: self.rotation_order,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.yaw = pose.yaw;
        self.pitch = pose.pitch;
        self.rotation_order = pose.rotation_order;
    }
}

impl Default for Camera {
    /// Overview of the fort from the north-east, as the site viewer opens
    fn default() -> Self {
        Self::looking_at(Vec3::new(200.0, -5.0, -50.0), Vec3::new(150.0, -5.65, -104.44))
    }
}
