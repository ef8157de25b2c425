use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, anyhow, bail};
use simbot_kinematics::DriveCommand;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, trace, warn};

use crate::blackboard::Blackboard;
use crate::bus::Topic;
use crate::simulation::TickClock;

/// Applies every drive command from the topic to the shared controller.
///
/// Runs until the topic closes. Rejected ticks are logged and skipped.
pub async fn drive_task(
    bb: Blackboard,
    mut command_rx: broadcast::Receiver<Arc<DriveCommand>>,
    mut clock: TickClock,
) -> anyhow::Result<()> {
    info!("Drive task started.");

    loop {
        let command = match command_rx.recv().await {
            Ok(command) => command,
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "Drive command receiver lagged, continuing with newest commands.");
                continue;
            }
            Err(RecvError::Closed) => {
                info!("Drive command topic closed. Exiting drive task.");
                return Ok(());
            }
        };

        let elapsed = clock.tick(Instant::now());
        if let Err(e) = bb.write().on_drive_command(command.left, command.right, elapsed) {
            warn!(%command, elapsed, "Rejected drive command: {}", e);
        }
    }
}

/// Reads `left right` (or `left,right`) lines from stdin and publishes them.
///
/// Blank lines and `#` comments are ignored; bad lines are logged and skipped.
pub async fn stdin_commands(topic: Topic<DriveCommand>) -> anyhow::Result<()> {
    info!("Reading drive commands from stdin.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match parse_command_line(&line) {
            Ok(Some(command)) => {
                trace!(%command, "stdin command");
                topic.publish(command);
            }
            Ok(None) => {}
            Err(e) => warn!(line = %line.trim(), "Ignoring stdin command: {:#}", e),
        }
    }

    info!("stdin closed, no more external drive commands.");
    Ok(())
}

pub fn parse_command_line(line: &str) -> anyhow::Result<Option<DriveCommand>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let fields: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 2 {
        bail!("expected two wheel speeds, found {} fields", fields.len());
    }

    let speed = |field: &str| -> anyhow::Result<f64> {
        let value: f64 = field.parse().with_context(|| format!("`{field}` is not a number"))?;
        if !value.is_finite() {
            return Err(anyhow!("`{field}` is not finite"));
        }
        Ok(value)
    };
    Ok(Some(DriveCommand::new(speed(fields[0])?, speed(fields[1])?)))
}
