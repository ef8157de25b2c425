use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, ensure};
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use simbot_kinematics::DifferentialDrive;
use simbot_map::{GridTransform, MapStyle};
use tracing::{error, info};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
const ENV_PREFIX: &str = "SIMBOT";
const METERS_PER_FOOT: f64 = 0.3048;

/// Robot geometry and sprite.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RobotSection {
    pub wheel_radius_m: f64,
    pub wheelbase_m: f64,
    pub max_rpm: f64,
    /// Drawn robot size, in pixels.
    pub width_px: f64,
    /// Optional sprite; a triangle is drawn when absent or unreadable.
    pub image: Option<PathBuf>,
}

impl Default for RobotSection {
    fn default() -> Self {
        Self {
            wheel_radius_m: 0.0508,
            wheelbase_m: 0.2286,
            max_rpm: 200.0,
            width_px: 60.0,
            image: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BoardSection {
    pub pixels_per_foot: f64,
    pub tile_width_feet: f64,
    pub x_tiles: u32,
    pub y_tiles: u32,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            pixels_per_foot: 60.0,
            tile_width_feet: 2.0,
            x_tiles: 5,
            y_tiles: 4,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapSection {
    pub file: PathBuf,
    pub cube_width_px: f64,
    pub box_width_in: f64,
    pub z_spacing_px: f64,
}

impl Default for MapSection {
    fn default() -> Self {
        Self {
            file: PathBuf::from("maps/2024_map.txt"),
            cube_width_px: 20.0,
            box_width_in: 20.0,
            z_spacing_px: 8.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSection {
    /// Lower bound on the tick rate; the longest accepted tick is its inverse.
    pub min_frame_rate: f64,
    pub command_channel_capacity: usize,
    /// Read `left right` drive commands from stdin.
    pub stdin_commands: bool,
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            min_frame_rate: 50.0,
            command_channel_capacity: 16,
            stdin_commands: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub robot: RobotSection,
    pub board: BoardSection,
    pub map: MapSection,
    pub simulation: SimulationSection,
}

impl SimConfig {
    pub fn pixels_per_meter(&self) -> f64 {
        self.board.pixels_per_foot / METERS_PER_FOOT
    }

    pub fn transform(&self) -> GridTransform {
        GridTransform::from_board(self.board.pixels_per_foot, self.board.tile_width_feet)
    }

    pub fn map_style(&self) -> MapStyle {
        MapStyle {
            cube_width: self.map.cube_width_px,
            box_width: self.map.box_width_in * self.board.pixels_per_foot / 12.0,
            z_spacing: self.map.z_spacing_px,
        }
    }

    pub fn drive(&self) -> anyhow::Result<DifferentialDrive> {
        DifferentialDrive::new(
            self.robot.wheel_radius_m,
            self.robot.wheelbase_m,
            self.robot.max_rpm,
            self.pixels_per_meter(),
        )
        .context("invalid [robot] geometry")
    }

    /// Longest elapsed time a single tick may integrate.
    pub fn max_tick(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.simulation.min_frame_rate)
    }

    /// Checks values that would otherwise panic or divide by zero later.
    pub fn validate(&self) -> anyhow::Result<()> {
        let rate = self.simulation.min_frame_rate;
        ensure!(rate > 0.0 && rate.is_finite(), "simulation.min_frame_rate must be positive, got {rate}");
        ensure!(
            Duration::try_from_secs_f64(1.0 / rate).is_ok(),
            "simulation.min_frame_rate {rate} is too small for a tick length"
        );
        ensure!(
            self.board.pixels_per_foot > 0.0 && self.board.tile_width_feet > 0.0,
            "board.pixels_per_foot and board.tile_width_feet must be positive"
        );
        ensure!(
            self.simulation.command_channel_capacity > 0,
            "simulation.command_channel_capacity must be at least 1"
        );
        Ok(())
    }
}

/// `SIMBOT__SECTION__KEY` overrides, e.g. `SIMBOT__MAP__FILE`.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true)
}

pub fn load_config() -> Result<SimConfig, ConfigError> {
    info!("Attempting to load configuration from {}", DEFAULT_CONFIG_PATH);

    let settings = Config::builder()
        .add_source(File::new(DEFAULT_CONFIG_PATH, FileFormat::Toml).required(true))
        .add_source(environment())
        .build()
        .and_then(|config| config.try_deserialize::<SimConfig>());

    match settings {
        Ok(config) => {
            info!(?config, "Successfully loaded configuration");
            Ok(config)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            Err(e)
        }
    }
}
