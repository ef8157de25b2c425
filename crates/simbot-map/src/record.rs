//! Typed map records, one variant per record tag.

use std::fmt;

use crate::point_types::GridPoint;

/// Team color carried by cubes and AprilTags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TagColor {
    /// Red team.
    Red,
    /// Green team.
    Green,
}

impl TagColor {
    /// Reads a color field: `R` in any case is red, anything else is green.
    pub fn from_field(field: &str) -> Self {
        if field.eq_ignore_ascii_case("r") {
            TagColor::Red
        } else {
            TagColor::Green
        }
    }
}

/// One parsed line of a map description, still in grid coordinates.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MapRecord {
    /// `W,x1,y1,x2,y2`: a wall segment.
    Wall {
        /// First endpoint.
        p1: GridPoint,
        /// Second endpoint.
        p2: GridPoint,
    },
    /// `B,x,y`: a square bounding box drawn around `center`.
    BoundingBoxCenter {
        /// Box center.
        center: GridPoint,
    },
    /// `R,x,y,heading`: the robot spawn, heading as written in the file.
    RobotSpawn {
        /// Robot center.
        position: GridPoint,
        /// Raw heading in degrees.
        heading_degrees: f64,
    },
    /// `C,x,y,layer,color`: a cube, possibly stacked on others.
    Cube {
        /// Cube center on the floor.
        position: GridPoint,
        /// Stack layer, `1` for a cube resting on the floor.
        layer: i32,
        /// Cube color.
        color: TagColor,
    },
    /// `P,x1,y1,x2,y2`: a raised platform edge.
    Platform {
        /// First endpoint.
        p1: GridPoint,
        /// Second endpoint.
        p2: GridPoint,
    },
    /// `A,x,y,color`: an AprilTag marker.
    AprilTag {
        /// Tag center.
        position: GridPoint,
        /// Tag color.
        color: TagColor,
    },
}

impl MapRecord {
    /// The single-character tag this record is written with.
    pub fn tag(&self) -> char {
        match self {
            MapRecord::Wall { .. } => 'W',
            MapRecord::BoundingBoxCenter { .. } => 'B',
            MapRecord::RobotSpawn { .. } => 'R',
            MapRecord::Cube { .. } => 'C',
            MapRecord::Platform { .. } => 'P',
            MapRecord::AprilTag { .. } => 'A',
        }
    }
}

impl fmt::Display for MapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = |c: &TagColor| match c {
            TagColor::Red => "R",
            TagColor::Green => "G",
        };
        match self {
            MapRecord::Wall { p1, p2 } | MapRecord::Platform { p1, p2 } => {
                write!(f, "{},{},{},{},{}", self.tag(), p1.x, p1.y, p2.x, p2.y)
            }
            MapRecord::BoundingBoxCenter { center } => write!(f, "B,{},{}", center.x, center.y),
            MapRecord::RobotSpawn { position, heading_degrees } => {
                write!(f, "R,{},{},{}", position.x, position.y, heading_degrees)
            }
            MapRecord::Cube { position, layer, color: c } => {
                write!(f, "C,{},{},{},{}", position.x, position.y, layer, color(c))
            }
            MapRecord::AprilTag { position, color: c } => {
                write!(f, "A,{},{},{}", position.x, position.y, color(c))
            }
        }
    }
}
