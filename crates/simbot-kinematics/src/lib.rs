#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![doc = "A `no_std` library for differential-drive robot kinematics in display space."]
#![doc = ""]
#![doc = "This crate converts normalized wheel-speed commands into chassis velocities"]
#![doc = "and integrates a clockwise-positive display pose over elapsed time."]

use core::f64::consts::PI;
use core::fmt;
use libm::{cos, sin};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::KinematicsError;

/// A display-space pose `(x, y, heading)`.
///
/// Position is in display units (pixels). Heading is in degrees, clockwise
/// positive, and is never wrapped: it accumulates across any number of turns.
/// Consumers that need a bounded angle should reduce it at the point of use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Pose {
    /// Display-space x position.
    pub x: f64,
    /// Display-space y position.
    pub y: f64,
    /// Heading in degrees, clockwise positive, unbounded.
    pub heading: f64,
}

impl Pose {
    /// Construct a new pose.
    ///
    /// # Arguments
    ///
    /// * `x`: Display-space x position.
    /// * `y`: Display-space y position.
    /// * `heading`: Heading in degrees.
    pub const fn new(x: f64, y: f64, heading: f64) -> Self {
        Pose { x, y, heading }
    }

    /// Heading converted to radians.
    pub fn heading_radians(&self) -> f64 {
        self.heading.to_radians()
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(x: {:.2} px, y: {:.2} px, heading: {:.2}°)", self.x, self.y, self.heading)
    }
}

/// A normalized wheel-speed command.
///
/// Each side is expected in `[-1, 1]`, where `1` is the configured maximum RPM
/// forward. Commands are plain values: a newer command replaces an older one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DriveCommand {
    /// Left wheel speed, normalized.
    pub left: f64,
    /// Right wheel speed, normalized.
    pub right: f64,
}

impl DriveCommand {
    /// Both wheels stopped.
    pub const STOP: DriveCommand = DriveCommand::new(0.0, 0.0);

    /// Construct a drive command.
    pub const fn new(left: f64, right: f64) -> Self {
        DriveCommand { left, right }
    }

    /// Returns `true` when both sides are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.left.is_finite() && self.right.is_finite()
    }

    /// Returns a copy with both sides saturated into `[-1, 1]`.
    pub fn clamped(self) -> Self {
        DriveCommand {
            left: self.left.clamp(-1.0, 1.0),
            right: self.right.clamp(-1.0, 1.0),
        }
    }
}

impl fmt::Display for DriveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(L: {:.2}, R: {:.2})", self.left, self.right)
    }
}

/// Left and right wheel angular velocities.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WheelSpeeds {
    /// Left wheel angular velocity (rad/s).
    pub omega_l: f64,
    /// Right wheel angular velocity (rad/s).
    pub omega_r: f64,
}

impl WheelSpeeds {
    /// Construct wheel speeds.
    ///
    /// # Arguments
    ///
    /// * `omega_l`: Left wheel angular velocity (rad/s).
    /// * `omega_r`: Right wheel angular velocity (rad/s).
    pub const fn new(omega_l: f64, omega_r: f64) -> Self {
        WheelSpeeds { omega_l, omega_r }
    }
}

impl fmt::Display for WheelSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(ωL: {:.2} rad/s, ωR: {:.2} rad/s)", self.omega_l, self.omega_r)
    }
}

/// Linear and angular chassis velocities.
///
/// `omega` follows the physical convention (counter-clockwise positive). The
/// display heading is clockwise positive, so [`DifferentialDrive::update_pose`]
/// negates it before integrating.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChassisSpeeds {
    /// Linear speed of the chassis center (display units/s).
    pub v: f64,
    /// Angular speed of the chassis (rad/s, CCW positive).
    pub omega: f64,
}

impl ChassisSpeeds {
    /// Construct chassis speeds.
    ///
    /// # Arguments
    ///
    /// * `v`: Linear speed of the chassis center (display units/s).
    /// * `omega`: Angular speed of the chassis (rad/s).
    pub const fn new(v: f64, omega: f64) -> Self {
        ChassisSpeeds { v, omega }
    }
}

impl fmt::Display for ChassisSpeeds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(v: {:.2} px/s, ω: {:.2} rad/s)", self.v, self.omega)
    }
}

fn positive_finite(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

/// Differential-drive kinematics helper.
///
/// Holds the robot geometry (wheel radius, wheelbase), the motor limit used
/// to scale normalized commands, and the meters-to-display-units factor.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifferentialDrive {
    /// Wheel radius (m).
    wheel_radius: f64,
    /// Distance between the wheel contact points (m).
    wheelbase: f64,
    /// Wheel RPM reached at a normalized speed of `1.0`.
    max_rpm: f64,
    /// Display units per meter.
    units_per_meter: f64,
}

impl DifferentialDrive {
    /// Construct a new differential-drive kinematics helper.
    ///
    /// # Arguments
    ///
    /// * `wheel_radius`: The radius of the robot's wheels in meters.
    /// * `wheelbase`: The distance between the two drive wheels in meters.
    /// * `max_rpm`: Wheel RPM at full normalized speed.
    /// * `units_per_meter`: Display units per meter of travel.
    ///
    /// # Errors
    ///
    /// Returns the matching `KinematicsError::Invalid*` variant if any argument
    /// is not a positive finite number.
    pub fn new(
        wheel_radius: f64,
        wheelbase: f64,
        max_rpm: f64,
        units_per_meter: f64,
    ) -> Result<Self, KinematicsError> {
        if !positive_finite(wheel_radius) {
            return Err(KinematicsError::InvalidWheelRadius("must be positive"));
        }
        if !positive_finite(wheelbase) {
            return Err(KinematicsError::InvalidWheelbase("must be positive"));
        }
        if !positive_finite(max_rpm) {
            return Err(KinematicsError::InvalidMaxRpm("must be positive"));
        }
        if !positive_finite(units_per_meter) {
            return Err(KinematicsError::InvalidUnitScale("must be positive"));
        }
        Ok(DifferentialDrive {
            wheel_radius,
            wheelbase,
            max_rpm,
            units_per_meter,
        })
    }

    /// Returns the wheel radius.
    pub fn wheel_radius(&self) -> f64 {
        self.wheel_radius
    }

    /// Returns the wheelbase.
    pub fn wheelbase(&self) -> f64 {
        self.wheelbase
    }

    /// Returns the maximum wheel RPM.
    pub fn max_rpm(&self) -> f64 {
        self.max_rpm
    }

    /// Returns the display units per meter.
    pub fn units_per_meter(&self) -> f64 {
        self.units_per_meter
    }

    /// Wheel angular rate (rad/s) at full normalized speed.
    pub fn max_angular_rate(&self) -> f64 {
        self.max_rpm * PI / 30.0
    }

    /// Scales one normalized wheel speed to an angular rate (rad/s).
    pub fn normalized_to_angular_rate(&self, speed: f64) -> f64 {
        speed * self.max_angular_rate()
    }

    /// Converts a normalized command into wheel angular rates.
    pub fn wheel_speeds(&self, command: DriveCommand) -> WheelSpeeds {
        WheelSpeeds::new(
            self.normalized_to_angular_rate(command.left),
            self.normalized_to_angular_rate(command.right),
        )
    }

    /// Calculates the chassis speeds from the wheel speeds.
    ///
    /// Linear speed is returned in display units per second; angular speed in
    /// rad/s, counter-clockwise positive.
    pub fn forward_kinematics(&self, wheel_speeds: WheelSpeeds) -> ChassisSpeeds {
        let v = self.wheel_radius / 2.0
            * (wheel_speeds.omega_r + wheel_speeds.omega_l)
            * self.units_per_meter;
        let omega = self.wheel_radius / self.wheelbase * (wheel_speeds.omega_r - wheel_speeds.omega_l);

        ChassisSpeeds::new(v, omega)
    }

    /// Chassis speeds for a pair of normalized wheel speeds.
    ///
    /// Equal inputs yield exactly zero angular speed; opposite inputs yield
    /// exactly zero linear speed.
    pub fn compute_velocity(&self, left: f64, right: f64) -> ChassisSpeeds {
        self.forward_kinematics(self.wheel_speeds(DriveCommand::new(left, right)))
    }

    /// Advances a display pose by `dt` seconds at constant chassis speeds.
    ///
    /// The angular speed is negated for the clockwise-positive display heading.
    /// Translation uses the heading at the middle of the step, which keeps arcs
    /// much closer to the true path than using the starting heading. The
    /// resulting heading is not wrapped.
    ///
    /// # Errors
    ///
    /// Returns `Err(KinematicsError::NegativeTimeDelta)` if `dt` is negative and
    /// `Err(KinematicsError::NonFiniteTimeDelta)` if it is NaN or infinite.
    pub fn update_pose(
        &self,
        current_pose: Pose,
        chassis_speeds: ChassisSpeeds,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        if !dt.is_finite() {
            return Err(KinematicsError::NonFiniteTimeDelta("must be finite"));
        }
        if dt < 0.0 {
            return Err(KinematicsError::NegativeTimeDelta("must be non-negative"));
        }

        let delta_heading = -chassis_speeds.omega * dt;
        let mid_heading = current_pose.heading_radians() + delta_heading / 2.0;
        let distance = chassis_speeds.v * dt;

        Ok(Pose {
            x: current_pose.x + distance * sin(mid_heading),
            y: current_pose.y + distance * cos(mid_heading),
            heading: current_pose.heading + delta_heading.to_degrees(),
        })
    }

    /// Convenience function to update a pose directly from a normalized command.
    ///
    /// # Errors
    ///
    /// Propagates the time-delta errors of [`DifferentialDrive::update_pose`].
    pub fn update_pose_from_command(
        &self,
        current_pose: Pose,
        command: DriveCommand,
        dt: f64,
    ) -> Result<Pose, KinematicsError> {
        let chassis_speeds = self.compute_velocity(command.left, command.right);
        self.update_pose(current_pose, chassis_speeds, dt)
    }
}

impl fmt::Display for DifferentialDrive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DifferentialDrive (r: {:.4} m, B: {:.4} m, max: {:.0} rpm)",
            self.wheel_radius, self.wheelbase, self.max_rpm
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    // 2 in wheels, 9 in wheelbase, 200 rpm, 60 px per foot.
    fn robot() -> DifferentialDrive {
        DifferentialDrive::new(0.0508, 0.2286, 200.0, 60.0 / 0.3048).unwrap()
    }

    #[test]
    fn test_constructor_rejects_bad_geometry() {
        assert!(matches!(
            DifferentialDrive::new(0.0, 0.2, 200.0, 100.0),
            Err(KinematicsError::InvalidWheelRadius("must be positive"))
        ));
        assert!(matches!(
            DifferentialDrive::new(0.05, -0.2, 200.0, 100.0),
            Err(KinematicsError::InvalidWheelbase("must be positive"))
        ));
        assert!(matches!(
            DifferentialDrive::new(0.05, 0.2, f64::NAN, 100.0),
            Err(KinematicsError::InvalidMaxRpm("must be positive"))
        ));
        assert!(matches!(
            DifferentialDrive::new(0.05, 0.2, 200.0, f64::INFINITY),
            Err(KinematicsError::InvalidUnitScale("must be positive"))
        ));
    }

    #[test]
    fn test_max_angular_rate_from_rpm() {
        let kinematics = robot();
        // 200 rpm = 200 * 2π / 60 rad/s
        assert!((kinematics.max_angular_rate() - 200.0 * 2.0 * PI / 60.0).abs() < EPSILON);
        assert!((kinematics.normalized_to_angular_rate(-0.5) + kinematics.max_angular_rate() / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_straight_drive_has_no_rotation() {
        let kinematics = robot();
        for speed in [-1.0, -0.6, -0.1, 0.0, 0.3, 0.6, 1.0] {
            let chassis = kinematics.compute_velocity(speed, speed);
            assert_eq!(chassis.omega, 0.0);
        }
    }

    #[test]
    fn test_opposite_wheels_have_no_translation() {
        let kinematics = robot();
        for speed in [-1.0, -0.4, 0.0, 0.25, 0.4, 1.0] {
            let chassis = kinematics.compute_velocity(-speed, speed);
            assert_eq!(chassis.v, 0.0);
        }
    }

    #[test]
    fn test_forward_kinematics_full_speed() {
        let kinematics = robot();
        let chassis = kinematics.compute_velocity(1.0, 1.0);
        // v = r * ω * px/m
        let expected = 0.0508 * kinematics.max_angular_rate() * (60.0 / 0.3048);
        assert!((chassis.v - expected).abs() < EPSILON);
    }

    #[test]
    fn test_forward_kinematics_pivot_is_ccw_positive() {
        let kinematics = robot();
        let chassis = kinematics.compute_velocity(-1.0, 1.0);
        let expected = 0.0508 / 0.2286 * 2.0 * kinematics.max_angular_rate();
        assert!((chassis.omega - expected).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_straight_along_heading() {
        let kinematics = robot();
        let current_pose = Pose::new(100.0, 100.0, 90.0); // sin(90°) = 1, moves along +x
        let chassis = ChassisSpeeds::new(200.0, 0.0);

        let new_pose = kinematics.update_pose(current_pose, chassis, 0.5).unwrap();
        assert!((new_pose.x - 200.0).abs() < EPSILON);
        assert!((new_pose.y - 100.0).abs() < EPSILON);
        assert!((new_pose.heading - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_zero_heading_moves_along_y() {
        let kinematics = robot();
        let new_pose = kinematics
            .update_pose(Pose::new(0.0, 0.0, 0.0), ChassisSpeeds::new(10.0, 0.0), 1.0)
            .unwrap();
        assert!((new_pose.x - 0.0).abs() < EPSILON);
        assert!((new_pose.y - 10.0).abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_flips_rotation_direction() {
        let kinematics = robot();
        let chassis = ChassisSpeeds::new(0.0, PI / 2.0); // CCW quarter turn per second
        let new_pose = kinematics.update_pose(Pose::new(0.0, 0.0, 0.0), chassis, 1.0).unwrap();
        assert!((new_pose.heading - (-90.0)).abs() < EPSILON);
        assert!(new_pose.x.abs() < EPSILON);
        assert!(new_pose.y.abs() < EPSILON);
    }

    #[test]
    fn test_update_pose_uses_mid_step_heading() {
        let kinematics = robot();
        let chassis = ChassisSpeeds::new(100.0, -PI / 2.0); // clockwise in display space
        let dt = 1.0;

        // Heading goes 0 -> 90°, so displacement follows the 45° midpoint.
        let new_pose = kinematics.update_pose(Pose::default(), chassis, dt).unwrap();
        let leg = 100.0 * (PI / 4.0).sin();
        assert!((new_pose.x - leg).abs() < EPSILON);
        assert!((new_pose.y - leg).abs() < EPSILON);
        assert!((new_pose.heading - 90.0).abs() < EPSILON);
    }

    #[test]
    fn test_heading_is_not_wrapped() {
        let kinematics = robot();
        let chassis = ChassisSpeeds::new(0.0, -2.0 * PI); // one clockwise turn per second
        let mut pose = Pose::new(0.0, 0.0, 180.0);
        for _ in 0..3 {
            pose = kinematics.update_pose(pose, chassis, 1.0).unwrap();
        }
        assert!((pose.heading - (180.0 + 3.0 * 360.0)).abs() < 1e-6);
    }

    #[test]
    fn test_zero_dt_leaves_pose_unchanged() {
        let kinematics = robot();
        let pose = Pose::new(12.5, -3.0, 270.0);
        let new_pose = kinematics.update_pose_from_command(pose, DriveCommand::new(1.0, -0.3), 0.0).unwrap();
        assert_eq!(new_pose, pose);
    }

    #[test]
    fn test_update_pose_rejects_bad_dt() {
        let kinematics = robot();
        let chassis = ChassisSpeeds::new(1.0, 0.0);
        assert!(matches!(
            kinematics.update_pose(Pose::default(), chassis, -0.1),
            Err(KinematicsError::NegativeTimeDelta("must be non-negative"))
        ));
        assert!(matches!(
            kinematics.update_pose(Pose::default(), chassis, f64::NAN),
            Err(KinematicsError::NonFiniteTimeDelta("must be finite"))
        ));
    }

    #[test]
    fn test_integration_is_deterministic() {
        let kinematics = robot();
        let script = [(0.6, 0.6, 0.02), (0.4, -0.4, 0.016), (-0.2, 0.9, 0.02), (1.0, 0.5, 0.007)];
        let run = || {
            let mut pose = Pose::new(60.0, 60.0, 90.0);
            for _ in 0..50 {
                for (left, right, dt) in script {
                    pose = kinematics
                        .update_pose_from_command(pose, DriveCommand::new(left, right), dt)
                        .unwrap();
                }
            }
            pose
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_drive_command_clamped() {
        let command = DriveCommand::new(1.7, -3.0).clamped();
        assert_eq!(command, DriveCommand::new(1.0, -1.0));
        assert!(!DriveCommand::new(f64::NAN, 0.0).is_finite());
    }
}
