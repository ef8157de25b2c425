//! Map description parser.
//!
//! The format is one record per line, comma separated, with a single-letter
//! tag in the first field:
//!
//! ```text
//! # comment
//! W,0,0,5,0        wall from (0,0) to (5,0)
//! B,2,2            bounding box centered on (2,2)
//! R,1,1,90         robot at (1,1), heading 90
//! C,3,1,2,R        red cube on layer 2 at (3,1)
//! P,0,4,1,4        platform edge
//! A,0.5,0,G        green AprilTag
//! ```
//!
//! Blank lines and lines starting with `#` are skipped. Any other line that
//! does not parse aborts the whole load.

use tracing::trace;

use crate::error::MapError;
use crate::model::{MapModel, MapStyle};
use crate::point_types::GridPoint;
use crate::record::{MapRecord, TagColor};
use crate::transform::GridTransform;

/// Parses map text into records, in file order.
///
/// # Errors
///
/// Returns [`MapError::UnrecognizedRecordType`] for an unknown tag and
/// [`MapError::MalformedRecord`] when a record's fields do not fit its tag.
pub fn parse_records(text: &str) -> Result<Vec<MapRecord>, MapError> {
    let mut records = Vec::new();

    for (index, raw) in text.lines().enumerate() {
        let row = raw.trim();
        if row.is_empty() || row.starts_with('#') {
            continue;
        }
        let record = parse_row(index + 1, row)?;
        trace!(line = index + 1, %record, "parsed map record");
        records.push(record);
    }

    Ok(records)
}

/// Parses map text and resolves it into a [`MapModel`].
///
/// # Errors
///
/// Propagates every error of [`parse_records`].
pub fn parse_map(text: &str, transform: &GridTransform, style: &MapStyle) -> Result<MapModel, MapError> {
    let records = parse_records(text)?;
    Ok(MapModel::from_records(&records, transform, style))
}

/// Fields of one row after the tag, with line context for error reporting.
struct Fields<'a> {
    line: usize,
    row: &'a str,
    values: Vec<&'a str>,
}

impl Fields<'_> {
    fn malformed(&self, reason: impl Into<String>) -> MapError {
        MapError::MalformedRecord {
            line: self.line,
            record: self.row.to_string(),
            reason: reason.into(),
        }
    }

    fn exactly(&self, count: usize) -> Result<(), MapError> {
        if self.values.len() == count {
            Ok(())
        } else {
            Err(self.malformed(format!("expected {count} fields, found {}", self.values.len())))
        }
    }

    fn at_least(&self, count: usize) -> Result<(), MapError> {
        if self.values.len() >= count {
            Ok(())
        } else {
            Err(self.malformed(format!("expected at least {count} fields, found {}", self.values.len())))
        }
    }

    fn number(&self, index: usize) -> Result<f64, MapError> {
        let field = self.values[index];
        match field.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            Ok(_) => Err(self.malformed(format!("field {} `{field}` is not finite", index + 1))),
            Err(_) => Err(self.malformed(format!("field {} `{field}` is not a number", index + 1))),
        }
    }

    fn point(&self, index: usize) -> Result<GridPoint, MapError> {
        Ok(GridPoint::new(self.number(index)?, self.number(index + 1)?))
    }

    fn layer(&self, index: usize) -> Result<i32, MapError> {
        let value = self.number(index)?;
        if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
            return Err(self.malformed(format!("layer `{}` is not an integer", self.values[index])));
        }
        Ok(value as i32)
    }

    fn color(&self, index: usize) -> TagColor {
        TagColor::from_field(self.values[index])
    }
}

fn parse_row(line: usize, row: &str) -> Result<MapRecord, MapError> {
    let mut parts = row.split(',').map(str::trim);
    let tag = parts.next().unwrap_or_default();
    let fields = Fields {
        line,
        row,
        values: parts.collect(),
    };

    match tag {
        "W" => {
            fields.exactly(4)?;
            Ok(MapRecord::Wall {
                p1: fields.point(0)?,
                p2: fields.point(2)?,
            })
        }
        "B" => {
            fields.exactly(2)?;
            Ok(MapRecord::BoundingBoxCenter { center: fields.point(0)? })
        }
        "R" => {
            fields.at_least(3)?;
            Ok(MapRecord::RobotSpawn {
                position: fields.point(0)?,
                heading_degrees: fields.number(2)?,
            })
        }
        "C" => {
            fields.at_least(4)?;
            Ok(MapRecord::Cube {
                position: fields.point(0)?,
                layer: fields.layer(2)?,
                color: fields.color(3),
            })
        }
        "P" => {
            fields.exactly(4)?;
            Ok(MapRecord::Platform {
                p1: fields.point(0)?,
                p2: fields.point(2)?,
            })
        }
        "A" => {
            fields.at_least(3)?;
            Ok(MapRecord::AprilTag {
                position: fields.point(0)?,
                color: fields.color(2),
            })
        }
        other => Err(MapError::UnrecognizedRecordType {
            line,
            tag: other.to_string(),
        }),
    }
}
