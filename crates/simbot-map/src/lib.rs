//! Tile-based map descriptions for the simbot simulator.
//!
//! A map file is a line-oriented list of records (walls, platforms, cubes,
//! AprilTags, bounding boxes and the robot spawn). [`parser`] turns the text
//! into typed [`MapRecord`]s and [`model`] resolves them, once, into
//! display-space primitives ready for a renderer.

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod parser;
pub mod point_types;
pub mod record;
pub mod transform;

pub use error::MapError;
pub use model::{MapModel, MapStyle, Primitive, PrimitiveKind, Rgb, Shape};
pub use parser::{parse_map, parse_records};
pub use point_types::{DisplayPoint, GridPoint};
pub use record::{MapRecord, TagColor};
pub use transform::GridTransform;
