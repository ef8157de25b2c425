//! Render-ready map model.
//!
//! A [`MapModel`] is built once from parsed records and never changes. All
//! geometry is already in display coordinates, so a renderer only has to walk
//! [`MapModel::draw_order`] and paint each primitive.

use std::fs;
use std::path::Path;

use simbot_kinematics::Pose;
use tracing::{info, warn};

use crate::error::MapError;
use crate::parser::parse_map;
use crate::point_types::DisplayPoint;
use crate::record::{MapRecord, TagColor};
use crate::transform::GridTransform;

/// Line width of walls, in display units.
pub const WALL_WIDTH: f64 = 2.0;
/// Line width of bounding box edges, in display units.
pub const BOX_LINE_WIDTH: f64 = 1.0;
/// Line width of platform edges, in display units.
pub const PLATFORM_WIDTH: f64 = 10.0;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Board background.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    /// Grid dots.
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    /// Red cubes.
    pub const RED: Rgb = Rgb::new(237, 54, 26);
    /// Green cubes and bounding boxes.
    pub const GREEN: Rgb = Rgb::new(19, 217, 9);
    /// Walls.
    pub const BLUE: Rgb = Rgb::new(61, 175, 219);
    /// Platforms.
    pub const GRAY: Rgb = Rgb::new(227, 221, 107);
    /// Red AprilTags.
    pub const LIGHT_RED: Rgb = Rgb::new(255, 135, 135);
    /// Green AprilTags.
    pub const LIGHT_GREEN: Rgb = Rgb::new(199, 224, 164);
}

/// Size parameters for the primitives derived from records.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapStyle {
    /// Side of a cube or AprilTag square, in display units.
    pub cube_width: f64,
    /// Side of a bounding box, in display units.
    pub box_width: f64,
    /// Parallax shift per stacked cube layer, in display units.
    pub z_spacing: f64,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            cube_width: 20.0,
            box_width: 20.0 * 60.0 / 12.0,
            z_spacing: 8.0,
        }
    }
}

/// Which record a primitive came from.
///
/// The declaration order is the draw order: later kinds paint over earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PrimitiveKind {
    /// Wall segment.
    Wall,
    /// One edge of a bounding box.
    BoundingBox,
    /// Cube square.
    Cube,
    /// Platform edge.
    Platform,
    /// AprilTag square.
    AprilTag,
}

/// Geometry of a primitive, in display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Shape {
    /// A stroked line segment.
    Segment {
        /// Start point.
        start: DisplayPoint,
        /// End point.
        end: DisplayPoint,
        /// Stroke width.
        width: f64,
    },
    /// A filled axis-aligned rectangle.
    Rect {
        /// Top-left corner.
        origin: DisplayPoint,
        /// Width.
        width: f64,
        /// Height.
        height: f64,
    },
}

/// A colored static shape on the board.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Primitive {
    /// Originating record kind.
    pub kind: PrimitiveKind,
    /// Fill or stroke color.
    pub color: Rgb,
    /// Geometry.
    pub shape: Shape,
}

impl Primitive {
    fn segment(kind: PrimitiveKind, color: Rgb, start: DisplayPoint, end: DisplayPoint, width: f64) -> Self {
        Self {
            kind,
            color,
            shape: Shape::Segment { start, end, width },
        }
    }

    fn square(kind: PrimitiveKind, color: Rgb, center: DisplayPoint, side: f64) -> Self {
        Self {
            kind,
            color,
            shape: Shape::Rect {
                origin: center.offset(-side / 2.0, -side / 2.0),
                width: side,
                height: side,
            },
        }
    }
}

/// Static map geometry plus the robot's starting pose.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapModel {
    primitives: Vec<Primitive>,
    initial_pose: Option<Pose>,
}

impl MapModel {
    /// Resolves records into display-space primitives.
    ///
    /// Primitives keep record order; a bounding box contributes its four edges
    /// as top, right, bottom, left. The spawn heading is stored as
    /// `180 - heading` so that the file's convention maps onto the display's
    /// clockwise-positive heading. If several spawns are present the last wins.
    pub fn from_records(records: &[MapRecord], transform: &GridTransform, style: &MapStyle) -> Self {
        let mut primitives = Vec::with_capacity(records.len());
        let mut initial_pose = None;

        for record in records {
            match *record {
                MapRecord::Wall { p1, p2 } => primitives.push(Primitive::segment(
                    PrimitiveKind::Wall,
                    Rgb::BLUE,
                    transform.grid_to_display(p1),
                    transform.grid_to_display(p2),
                    WALL_WIDTH,
                )),
                MapRecord::BoundingBoxCenter { center } => {
                    let c = transform.grid_to_display(center);
                    let h = style.box_width / 2.0;
                    let corners = [
                        c.offset(-h, -h),
                        c.offset(h, -h),
                        c.offset(h, h),
                        c.offset(-h, h),
                    ];
                    for i in 0..corners.len() {
                        primitives.push(Primitive::segment(
                            PrimitiveKind::BoundingBox,
                            Rgb::GREEN,
                            corners[i],
                            corners[(i + 1) % corners.len()],
                            BOX_LINE_WIDTH,
                        ));
                    }
                }
                MapRecord::RobotSpawn { position, heading_degrees } => {
                    if initial_pose.is_some() {
                        warn!(%record, "multiple robot spawns in map, the last one wins");
                    }
                    let p = transform.grid_to_display(position);
                    initial_pose = Some(Pose::new(p.x, p.y, 180.0 - heading_degrees));
                }
                MapRecord::Cube { position, layer, color } => {
                    let lift = (f64::from(layer) - 1.0) * style.z_spacing;
                    let center = transform.grid_to_display(position).offset(lift, -lift);
                    let color = match color {
                        TagColor::Red => Rgb::RED,
                        TagColor::Green => Rgb::GREEN,
                    };
                    primitives.push(Primitive::square(PrimitiveKind::Cube, color, center, style.cube_width));
                }
                MapRecord::Platform { p1, p2 } => primitives.push(Primitive::segment(
                    PrimitiveKind::Platform,
                    Rgb::GRAY,
                    transform.grid_to_display(p1),
                    transform.grid_to_display(p2),
                    PLATFORM_WIDTH,
                )),
                MapRecord::AprilTag { position, color } => {
                    let color = match color {
                        TagColor::Red => Rgb::LIGHT_RED,
                        TagColor::Green => Rgb::LIGHT_GREEN,
                    };
                    primitives.push(Primitive::square(
                        PrimitiveKind::AprilTag,
                        color,
                        transform.grid_to_display(position),
                        style.cube_width,
                    ));
                }
            }
        }

        Self { primitives, initial_pose }
    }

    /// Reads and parses a map file.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MapFileUnreadable`] if the file cannot be read, and
    /// any parse error from [`parse_map`].
    pub fn load(path: impl AsRef<Path>, transform: &GridTransform, style: &MapStyle) -> Result<Self, MapError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| MapError::MapFileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let model = parse_map(&text, transform, style)?;

        info!(
            path = %path.display(),
            walls = model.primitives_of(PrimitiveKind::Wall).count(),
            box_edges = model.primitives_of(PrimitiveKind::BoundingBox).count(),
            cubes = model.primitives_of(PrimitiveKind::Cube).count(),
            platforms = model.primitives_of(PrimitiveKind::Platform).count(),
            april_tags = model.primitives_of(PrimitiveKind::AprilTag).count(),
            robot = model.initial_pose.is_some(),
            "Loaded map"
        );
        Ok(model)
    }

    /// All primitives, in record order.
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// Primitives of one kind, in record order.
    pub fn primitives_of(&self, kind: PrimitiveKind) -> impl Iterator<Item = &Primitive> {
        self.primitives.iter().filter(move |p| p.kind == kind)
    }

    /// Primitives sorted for painting: by kind, then record order.
    pub fn draw_order(&self) -> Vec<&Primitive> {
        let mut ordered: Vec<&Primitive> = self.primitives.iter().collect();
        ordered.sort_by_key(|p| p.kind);
        ordered
    }

    /// Where the robot starts, if the map spawns one.
    pub fn initial_pose(&self) -> Option<Pose> {
        self.initial_pose
    }

    /// Number of primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Returns `true` if the map has no static geometry.
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> (GridTransform, MapStyle) {
        (GridTransform::from_board(60.0, 2.0), MapStyle::default())
    }

    fn parse(text: &str) -> MapModel {
        let (transform, style) = board();
        parse_map(text, &transform, &style).unwrap()
    }

    fn segment(p: &Primitive) -> (DisplayPoint, DisplayPoint, f64) {
        match p.shape {
            Shape::Segment { start, end, width } => (start, end, width),
            Shape::Rect { .. } => panic!("expected a segment, got {p:?}"),
        }
    }

    fn rect(p: &Primitive) -> (DisplayPoint, f64, f64) {
        match p.shape {
            Shape::Rect { origin, width, height } => (origin, width, height),
            Shape::Segment { .. } => panic!("expected a rect, got {p:?}"),
        }
    }

    #[test]
    fn test_wall_then_box_yields_five_segments_in_order() {
        let model = parse("W,0,0,1,0\nB,2,2");
        let kinds: Vec<_> = model.primitives().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveKind::Wall,
                PrimitiveKind::BoundingBox,
                PrimitiveKind::BoundingBox,
                PrimitiveKind::BoundingBox,
                PrimitiveKind::BoundingBox,
            ]
        );

        let (start, end, width) = segment(&model.primitives()[0]);
        assert_eq!(start, DisplayPoint::new(60.0, 60.0));
        assert_eq!(end, DisplayPoint::new(180.0, 60.0));
        assert_eq!(width, WALL_WIDTH);
        assert_eq!(model.primitives()[0].color, Rgb::BLUE);
    }

    #[test]
    fn test_box_edges_are_top_right_bottom_left() {
        let model = parse("B,2,2");
        // center (300, 300), half width 50
        let edges: Vec<_> = model.primitives().iter().map(segment).collect();
        assert_eq!((edges[0].0, edges[0].1), (DisplayPoint::new(250.0, 250.0), DisplayPoint::new(350.0, 250.0)));
        assert_eq!((edges[1].0, edges[1].1), (DisplayPoint::new(350.0, 250.0), DisplayPoint::new(350.0, 350.0)));
        assert_eq!((edges[2].0, edges[2].1), (DisplayPoint::new(350.0, 350.0), DisplayPoint::new(250.0, 350.0)));
        assert_eq!((edges[3].0, edges[3].1), (DisplayPoint::new(250.0, 350.0), DisplayPoint::new(250.0, 250.0)));
        assert!(edges.iter().all(|e| e.2 == BOX_LINE_WIDTH));
    }

    #[test]
    fn test_robot_spawn_inverts_heading() {
        let model = parse("R,1,1,90");
        let pose = model.initial_pose().unwrap();
        assert_eq!(pose.heading, 90.0);
        assert_eq!((pose.x, pose.y), (180.0, 180.0));
        assert!(model.is_empty());
    }

    #[test]
    fn test_last_robot_spawn_wins() {
        let model = parse("R,1,1,90\nR,2,3,0");
        assert_eq!(model.initial_pose(), Some(Pose::new(300.0, 420.0, 180.0)));
    }

    #[test]
    fn test_no_spawn_means_no_pose() {
        assert_eq!(parse("W,0,0,1,0").initial_pose(), None);
    }

    #[test]
    fn test_cube_layers_shift_for_parallax() {
        let model = parse("C,1,1,1,R\nC,1,1,3,G");
        let (floor, w, h) = rect(&model.primitives()[0]);
        assert_eq!(floor, DisplayPoint::new(170.0, 170.0));
        assert_eq!((w, h), (20.0, 20.0));
        assert_eq!(model.primitives()[0].color, Rgb::RED);

        let (stacked, _, _) = rect(&model.primitives()[1]);
        assert_eq!(stacked, DisplayPoint::new(186.0, 154.0));
        assert_eq!(model.primitives()[1].color, Rgb::GREEN);
    }

    #[test]
    fn test_april_tag_square() {
        let model = parse("A,0,0.5,R");
        let (origin, w, _) = rect(&model.primitives()[0]);
        assert_eq!(origin, DisplayPoint::new(50.0, 110.0));
        assert_eq!(w, 20.0);
        assert_eq!(model.primitives()[0].color, Rgb::LIGHT_RED);
    }

    #[test]
    fn test_draw_order_groups_by_kind() {
        let model = parse("A,0,0,G\nP,0,4,1,4\nW,0,0,1,0\nC,1,1,1,R\nW,1,0,2,0");
        let kinds: Vec<_> = model.draw_order().iter().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![
                PrimitiveKind::Wall,
                PrimitiveKind::Wall,
                PrimitiveKind::Cube,
                PrimitiveKind::Platform,
                PrimitiveKind::AprilTag,
            ]
        );
        // Stable within a kind.
        let (first_wall, _, _) = segment(model.draw_order()[0]);
        assert_eq!(first_wall, DisplayPoint::new(60.0, 60.0));
    }

    #[test]
    fn test_load_sample_map() {
        let (transform, style) = board();
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../maps/2024_map.txt");
        let model = MapModel::load(path, &transform, &style).unwrap();

        assert_eq!(model.primitives_of(PrimitiveKind::Wall).count(), 5);
        assert_eq!(model.primitives_of(PrimitiveKind::BoundingBox).count(), 4);
        assert_eq!(model.primitives_of(PrimitiveKind::Cube).count(), 7);
        assert_eq!(model.primitives_of(PrimitiveKind::Platform).count(), 2);
        assert_eq!(model.primitives_of(PrimitiveKind::AprilTag).count(), 3);
        assert_eq!(model.len(), 21);
        // R,0.5,3.5,0
        assert_eq!(model.initial_pose(), Some(Pose::new(120.0, 480.0, 180.0)));
    }

    #[test]
    fn test_load_missing_file_is_unreadable() {
        let (transform, style) = board();
        let err = MapModel::load("does/not/exist.txt", &transform, &style).unwrap_err();
        assert!(matches!(err, MapError::MapFileUnreadable { .. }));
    }
}
