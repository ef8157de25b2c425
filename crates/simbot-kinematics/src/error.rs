//! Error types for the kinematics library.
//!
//! These errors come from constructing a drive model with impossible geometry
//! or from asking it to integrate over an invalid time step.

use core::fmt;

/// Errors that can occur in kinematic calculations.
#[derive(Debug, Clone, PartialEq)]
pub enum KinematicsError {
    /// Returned when a wheel radius is provided that is not positive and finite.
    InvalidWheelRadius(&'static str),
    /// Returned when a wheelbase is provided that is not positive and finite.
    InvalidWheelbase(&'static str),
    /// Returned when the maximum wheel RPM is not positive and finite.
    InvalidMaxRpm(&'static str),
    /// Returned when the meters-to-display-units scale is not positive and finite.
    InvalidUnitScale(&'static str),
    /// Returned when a negative time delta is used for pose updates.
    NegativeTimeDelta(&'static str),
    /// Returned when the time delta is NaN or infinite.
    NonFiniteTimeDelta(&'static str),
}

impl fmt::Display for KinematicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KinematicsError::InvalidWheelRadius(msg) => write!(f, "Invalid wheel radius: {}", msg),
            KinematicsError::InvalidWheelbase(msg) => write!(f, "Invalid wheelbase: {}", msg),
            KinematicsError::InvalidMaxRpm(msg) => write!(f, "Invalid max RPM: {}", msg),
            KinematicsError::InvalidUnitScale(msg) => write!(f, "Invalid unit scale: {}", msg),
            KinematicsError::NegativeTimeDelta(msg) => write!(f, "Negative time delta: {}", msg),
            KinematicsError::NonFiniteTimeDelta(msg) => write!(f, "Non-finite time delta: {}", msg),
        }
    }
}

impl core::error::Error for KinematicsError {}
