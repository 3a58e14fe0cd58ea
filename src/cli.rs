// cli.rs - Command-line interface configuration
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::config::SamplerConfig;

#[derive(Parser, Debug, Clone)]
#[command(name = "castro-walk")]
#[command(about = "Walk the Castro headland in first person", long_about = None)]
pub struct Cli {
    /// Terrain model (.glb/.gltf). A procedural headland is used when omitted.
    #[arg(long)]
    pub terrain: Option<PathBuf>,

    /// Controller settings as JSON
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the height sampler from the config
    #[arg(long, value_enum)]
    pub sampler: Option<SamplerKind>,

    /// Disable the title-bar HUD and console input
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Follow a saved path headless and print the pose trace as JSON lines
    Replay {
        /// Waypoint file written by the `save` console command
        #[arg(long)]
        waypoints: PathBuf,

        #[arg(long, default_value_t = 600)]
        frames: usize,

        /// Seconds per frame
        #[arg(long, default_value_t = 1.0 / 60.0)]
        dt: f32,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerKind {
    /// Downward ray for every step
    Ray,
    /// Terrain bounding box, fixed height
    Bounds,
}

impl SamplerKind {
    pub fn to_config(self) -> SamplerConfig {
        match self {
            SamplerKind::Ray => SamplerConfig::Ray,
            SamplerKind::Bounds => SamplerConfig::bounds(),
        }
    }
}
