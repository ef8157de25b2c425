//! Grid-to-display coordinate transform.
//!
//! Map records are written in tile units. Everything drawn on screen is in
//! display units: one tile spans `tile_size` display units and the whole board
//! is shifted by `offset` so that grid lines sit half a tile inside the window.

use crate::point_types::{DisplayPoint, GridPoint};

/// Linear mapping between grid and display coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridTransform {
    /// Display units per tile.
    pub tile_size: f64,
    /// Display position of grid `(0, 0)`.
    pub offset: DisplayPoint,
}

impl GridTransform {
    /// Creates a transform from an explicit tile size and offset.
    #[must_use]
    pub const fn new(tile_size: f64, offset: DisplayPoint) -> Self {
        Self { tile_size, offset }
    }

    /// Creates the board transform from a pixel density and tile width.
    ///
    /// The offset is half a tile on both axes, leaving a half-tile margin.
    #[must_use]
    pub fn from_board(pixels_per_foot: f64, tile_width_feet: f64) -> Self {
        let tile_size = tile_width_feet * pixels_per_foot;
        Self::new(tile_size, DisplayPoint::new(tile_size / 2.0, tile_size / 2.0))
    }

    /// Maps a grid point to display coordinates.
    #[must_use]
    pub fn grid_to_display(&self, grid: GridPoint) -> DisplayPoint {
        DisplayPoint::new(
            grid.x * self.tile_size + self.offset.x,
            grid.y * self.tile_size + self.offset.y,
        )
    }

    /// Maps a display point back to grid coordinates.
    #[must_use]
    pub fn display_to_grid(&self, display: DisplayPoint) -> GridPoint {
        GridPoint::new(
            (display.x - self.offset.x) / self.tile_size,
            (display.y - self.offset.y) / self.tile_size,
        )
    }

    /// Window size needed for a board of `x_tiles` by `y_tiles`, margins included.
    #[must_use]
    pub fn board_size(&self, x_tiles: u32, y_tiles: u32) -> (f64, f64) {
        (
            f64::from(x_tiles) * self.tile_size + 2.0 * self.offset.x,
            f64::from(y_tiles) * self.tile_size + 2.0 * self.offset.y,
        )
    }

    /// Display positions of every grid intersection on the board.
    ///
    /// Yields `(x_tiles + 1) * (y_tiles + 1)` points, column by column.
    pub fn grid_dots(&self, x_tiles: u32, y_tiles: u32) -> impl Iterator<Item = DisplayPoint> + '_ {
        (0..=x_tiles).flat_map(move |gx| {
            (0..=y_tiles).map(move |gy| self.grid_to_display(GridPoint::new(f64::from(gx), f64::from(gy))))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    const EPSILON: f64 = 1e-9;

    #[test]
    fn test_from_board_uses_half_tile_margin() {
        let transform = GridTransform::from_board(60.0, 2.0);
        assert_eq!(transform.tile_size, 120.0);
        assert_eq!(transform.offset, DisplayPoint::new(60.0, 60.0));
    }

    #[test]
    fn test_grid_to_display() {
        let transform = GridTransform::from_board(60.0, 2.0);
        assert_eq!(transform.grid_to_display(GridPoint::new(0.0, 0.0)), DisplayPoint::new(60.0, 60.0));
        assert_eq!(transform.grid_to_display(GridPoint::new(2.0, 1.5)), DisplayPoint::new(300.0, 240.0));
        assert_eq!(transform.grid_to_display(GridPoint::new(-0.5, 0.0)), DisplayPoint::new(0.0, 60.0));
    }

    #[test]
    fn test_display_to_grid_inverts_grid_to_display() {
        let transform = GridTransform::new(37.5, DisplayPoint::new(11.0, -4.0));
        let grid = GridPoint::new(3.25, -1.75);
        let back = transform.display_to_grid(transform.grid_to_display(grid));
        assert!((back.x - grid.x).abs() < EPSILON);
        assert!((back.y - grid.y).abs() < EPSILON);
    }

    #[test]
    fn test_board_size() {
        let transform = GridTransform::from_board(60.0, 2.0);
        assert_eq!(transform.board_size(5, 4), (720.0, 600.0));
    }

    #[test]
    fn test_grid_dots_cover_every_intersection() {
        let transform = GridTransform::from_board(60.0, 2.0);
        let dots: Vec<_> = transform.grid_dots(5, 4).collect();
        assert_eq!(dots.len(), 6 * 5);
        assert_eq!(dots[0], DisplayPoint::new(60.0, 60.0));
        assert_eq!(dots[dots.len() - 1], DisplayPoint::new(660.0, 540.0));
    }
}
