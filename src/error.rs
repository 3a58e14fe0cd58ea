use thiserror::Error;

/// Requests the walker refuses. All of them are recoverable: the caller logs
/// and carries on, controller state is left as it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControllerError {
    #[error("terrain model is not loaded")]
    MissingTerrain,
    #[error("first person mode is already active")]
    AlreadyActive,
    #[error("first person mode is not active")]
    NotActive,
    #[error("no waypoints defined to follow")]
    EmptyPath,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PointerCaptureError {
    #[error("pointer capture rejected: {0}")]
    Rejected(String),
    #[error("pointer capture is not available on this host")]
    Unsupported,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f32,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConsoleError {
    #[error("unknown command '{0}' (try: add, here, clear, follow, stop, list)")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("could not format waypoints: {0}")]
    Format(String),
    #[error(transparent)]
    Controller(#[from] ControllerError),
}
