//! Point types for the two coordinate spaces of a map.

/// A point in grid coordinates (tile units, fractional values allowed).
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridPoint {
    /// Column position in tiles.
    pub x: f64,
    /// Row position in tiles.
    pub y: f64,
}

impl GridPoint {
    /// Creates a new `GridPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in display coordinates (pixels, y pointing down).
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DisplayPoint {
    /// Horizontal position in display units.
    pub x: f64,
    /// Vertical position in display units.
    pub y: f64,
}

impl DisplayPoint {
    /// Creates a new `DisplayPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}
