use serde::{Deserialize, Serialize};

/// Position in the rendered grid.
///
/// `x` is the active column index, adjusted for horizontal scrolling past the
/// fixed columns (negative for the reserved row-handle and tree columns).
/// `y` is the vertical grid row, unaffected by subgrids and row scrolling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridCellCoord {
    pub x: i32,
    pub y: i32,
}

/// Position in the underlying data model.
///
/// `x` is the column's data index, unaffected by column scrolling.
/// `y` is the row index within the subgrid, adjusted for row scrolling past
/// the fixed rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DataCellCoord {
    pub x: i32,
    pub y: i32,
}

/// Data position of the cell whose value is displayed.
///
/// Same as [`DataCellCoord`] unless the cell is covered by a merge whose
/// anchor has scrolled out of view, in which case it points at the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ValueCellCoord {
    pub x: i32,
    pub y: i32,
}

impl From<DataCellCoord> for ValueCellCoord {
    fn from(d: DataCellCoord) -> Self {
        Self { x: d.x, y: d.y }
    }
}

/// Pixel bounds of a rendered cell, including span extension.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// A highlighted match inside a formatted value (byte offsets, `to` exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightRange {
    pub from: usize,
    pub to: usize,
}

impl Bounds {
    /// Whether `point` lies inside, left and top edges inclusive.
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x
            && point.x < self.x + self.width
            && self.y <= point.y
            && point.y < self.y + self.height
    }
}

/// A pixel position, relative to whatever the caller anchors it to.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}
