mod blackboard;   // shared controller behind a lock
mod bus;          // broadcast topics
mod drive;        // drive task and stdin command source
mod graphics;     // macroquad renderer
mod settings;     // TOML + environment configuration
mod simulation;   // simulation controller
mod teleop;       // WASD keyboard commands

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use macroquad::Window;
use simbot_kinematics::DriveCommand;
use simbot_map::MapModel;
use tracing::{error, info};
use tracing_subscriber::{self, EnvFilter};

use blackboard::new_blackboard;
use bus::Topic;
use graphics::{RendererSettings, window_conf};
use simulation::{SimulationController, TickClock};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("simbot starting.");

    let config = settings::load_config().context("loading configuration")?;
    config.validate()?;
    let drive = config.drive()?;
    let map = MapModel::load(&config.map.file, &config.transform(), &config.map_style())
        .with_context(|| format!("loading map {}", config.map.file.display()))?;
    let controller = SimulationController::new(Arc::new(map), drive);
    match controller.initial_pose() {
        Some(pose) => info!(%pose, %drive, "Robot spawned."),
        None => info!("Map has no robot spawn; drive commands will not move anything."),
    }

    let bb = new_blackboard(controller);
    let drive_topic: Topic<DriveCommand> = Topic::new(config.simulation.command_channel_capacity);

    let tokio_rt = tokio::runtime::Runtime::new().context("starting tokio runtime")?;

    tokio_rt.spawn({
        let bb = Arc::clone(&bb);
        let command_rx = drive_topic.subscribe();
        let clock = TickClock::new(config.max_tick(), Instant::now());
        async move {
            if let Err(e) = drive::drive_task(bb, command_rx, clock).await {
                error!("Drive task failed: {:?}", e);
            }
        }
    });

    if config.simulation.stdin_commands {
        let stdin_topic = drive_topic.clone();
        tokio_rt.spawn(async move {
            if let Err(e) = drive::stdin_commands(stdin_topic).await {
                error!("stdin command source failed: {:?}", e);
            }
        });
    }

    Window::from_config(
        window_conf(&config),
        graphics::run_visualization_loop(Arc::clone(&bb), drive_topic, RendererSettings::from_config(&config)),
    );

    // stdin reads block a runtime thread; don't wait for them.
    tokio_rt.shutdown_background();

    let sim = bb.read();
    info!(
        phase = ?sim.phase(),
        ticks = sim.ticks(),
        sim_time = sim.sim_time(),
        pose = ?sim.current_pose(),
        last_command = ?sim.last_command(),
        "simbot stopped."
    );
    Ok(())
}
