pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod frame;
pub mod loaders;
pub mod locomotion;
pub mod math;
pub mod replay;
pub mod terrain;

pub use camera::{Camera, CameraPose, RotationOrder};
pub use config::ControllerConfig;
pub use error::{ConfigError, ConsoleError, ControllerError, PointerCaptureError};
pub use locomotion::{FirstPersonController, Mode};
