use std::sync::Arc;
use std::time::{Duration, Instant};

use simbot_kinematics::{DifferentialDrive, DriveCommand, Pose};
use simbot_map::MapModel;
use thiserror::Error;
use tracing::{debug, info, trace};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid tick input: {0}")]
    InvalidTickInput(String),
}

/// Where the controller is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimPhase {
    /// Map loaded, no tick yet.
    Idle,
    /// At least one tick since construction or the last reset.
    Running,
    /// Pose restored to the spawn; the next tick resumes `Running`.
    Reset,
}

/// What the renderer needs for one frame. Owned, so it can leave the lock.
#[derive(Debug, Clone)]
pub struct RenderState {
    pub map: Arc<MapModel>,
    pub pose: Option<Pose>,
    pub phase: SimPhase,
    pub last_command: Option<DriveCommand>,
    pub ticks: u64,
    pub sim_time: f64,
}

/// Owns the live robot pose for one loaded map.
///
/// Not thread-safe on its own: share it behind a lock (see `blackboard`).
/// Elapsed time is always supplied by the caller, so the same inputs produce
/// the same poses.
#[derive(Debug, Clone)]
pub struct SimulationController {
    map: Arc<MapModel>,
    drive: DifferentialDrive,
    current_pose: Option<Pose>,
    initial_pose: Option<Pose>,
    last_command: Option<DriveCommand>,
    phase: SimPhase,
    ticks: u64,
    sim_time: f64,
}

impl SimulationController {
    pub fn new(map: Arc<MapModel>, drive: DifferentialDrive) -> Self {
        let initial_pose = map.initial_pose();
        Self {
            map,
            drive,
            current_pose: initial_pose,
            initial_pose,
            last_command: None,
            phase: SimPhase::Idle,
            ticks: 0,
            sim_time: 0.0,
        }
    }

    /// Applies a drive command for `elapsed` seconds.
    ///
    /// Finite speeds outside `[-1, 1]` are clamped. Without a robot on the map
    /// the command is recorded and nothing moves.
    pub fn on_drive_command(&mut self, left: f64, right: f64, elapsed: f64) -> Result<(), SimulationError> {
        if !elapsed.is_finite() {
            return Err(SimulationError::InvalidTickInput(format!("elapsed time {elapsed} is not finite")));
        }
        if elapsed < 0.0 {
            return Err(SimulationError::InvalidTickInput(format!("elapsed time {elapsed} is negative")));
        }
        let requested = DriveCommand::new(left, right);
        if !requested.is_finite() {
            return Err(SimulationError::InvalidTickInput(format!("wheel speeds {requested} are not finite")));
        }
        let command = requested.clamped();
        if command != requested {
            debug!(%requested, %command, "Clamped drive command");
        }

        if let Some(pose) = self.current_pose {
            let next = self
                .drive
                .update_pose_from_command(pose, command, elapsed)
                .map_err(|e| SimulationError::InvalidTickInput(e.to_string()))?;
            if !(next.x.is_finite() && next.y.is_finite() && next.heading.is_finite()) {
                return Err(SimulationError::InvalidTickInput(format!(
                    "elapsed time {elapsed} overflows the pose ({next})"
                )));
            }
            trace!(%command, elapsed, pose = %next, "Tick");
            self.current_pose = Some(next);
        }

        self.last_command = Some(command);
        self.phase = SimPhase::Running;
        self.ticks += 1;
        self.sim_time += elapsed;
        Ok(())
    }

    /// Puts the robot back on its spawn and forgets the last command.
    pub fn reset(&mut self) {
        self.current_pose = self.initial_pose;
        self.last_command = None;
        self.phase = SimPhase::Reset;
        info!(pose = ?self.current_pose, "Simulation reset");
    }

    pub fn render_state(&self) -> RenderState {
        RenderState {
            map: Arc::clone(&self.map),
            pose: self.current_pose,
            phase: self.phase,
            last_command: self.last_command,
            ticks: self.ticks,
            sim_time: self.sim_time,
        }
    }

    pub fn current_pose(&self) -> Option<Pose> {
        self.current_pose
    }

    pub fn initial_pose(&self) -> Option<Pose> {
        self.initial_pose
    }

    pub fn last_command(&self) -> Option<DriveCommand> {
        self.last_command
    }

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Sum of all accepted elapsed times, in seconds.
    pub fn sim_time(&self) -> f64 {
        self.sim_time
    }
}

/// Turns wall-clock instants into tick lengths, capped at `max_tick`.
///
/// The cap keeps a stalled command source from teleporting the robot.
#[derive(Debug, Clone)]
pub struct TickClock {
    max_tick: Duration,
    last: Instant,
}

impl TickClock {
    pub fn new(max_tick: Duration, now: Instant) -> Self {
        Self { max_tick, last: now }
    }

    /// Seconds since the previous call (or construction), capped.
    pub fn tick(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last);
        self.last = now;
        elapsed.min(self.max_tick).as_secs_f64()
    }
}
