//! Pre-computed column/row geometry and the scroll viewport.
//!
//! Positions are cumulative sums computed once, so span extents and hit
//! testing are O(1) and O(log n).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Default column width in pixels.
pub const DEFAULT_COL_WIDTH: f32 = 100.0;

/// Default row height in pixels.
pub const DEFAULT_ROW_HEIGHT: f32 = 20.0;

/// Pre-computed geometry of the data columns and data rows.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Cumulative column positions (`col_positions[i]` = x of column i's left edge)
    pub col_positions: Vec<f32>,
    /// Cumulative row positions (`row_positions[i]` = y of data row i's top edge)
    pub row_positions: Vec<f32>,
    pub col_widths: Vec<f32>,
    pub row_heights: Vec<f32>,
    /// Height of every row outside the data subgrid
    pub header_row_height: f32,
    /// Width of the row-number handle column
    pub handle_width: f32,
    /// Width of the tree column
    pub tree_width: f32,
}

fn cumulative(sizes: &[f32]) -> Vec<f32> {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut edge = 0.0;
    for size in sizes {
        positions.push(edge);
        edge += size;
    }
    positions.push(edge); // Final edge
    positions
}

impl GridLayout {
    /// Build a layout for `col_count` columns and `row_count` data rows.
    ///
    /// Sizes missing from the maps use the defaults.
    pub fn new(
        col_count: usize,
        row_count: usize,
        col_widths_map: &HashMap<usize, f32>,
        row_heights_map: &HashMap<usize, f32>,
    ) -> Self {
        let col_widths: Vec<f32> = (0..col_count)
            .map(|c| col_widths_map.get(&c).copied().unwrap_or(DEFAULT_COL_WIDTH))
            .collect();
        let row_heights: Vec<f32> = (0..row_count)
            .map(|r| row_heights_map.get(&r).copied().unwrap_or(DEFAULT_ROW_HEIGHT))
            .collect();

        Self {
            col_positions: cumulative(&col_widths),
            row_positions: cumulative(&row_heights),
            col_widths,
            row_heights,
            header_row_height: DEFAULT_ROW_HEIGHT,
            handle_width: 40.0,
            tree_width: DEFAULT_COL_WIDTH,
        }
    }

    pub fn col_count(&self) -> usize {
        self.col_widths.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_heights.len()
    }

    /// Width of a data column (default for unknown columns).
    pub fn col_width(&self, col: usize) -> f32 {
        self.col_widths
            .get(col)
            .copied()
            .unwrap_or(DEFAULT_COL_WIDTH)
    }

    /// Height of a data row (default for unknown rows).
    pub fn row_height(&self, row: usize) -> f32 {
        self.row_heights
            .get(row)
            .copied()
            .unwrap_or(DEFAULT_ROW_HEIGHT)
    }

    /// Total width of `count` columns starting at `first`, clamped to the sheet.
    pub fn span_width(&self, first: usize, count: usize) -> f32 {
        span(&self.col_positions, first, count)
    }

    /// Total height of `count` data rows starting at `first`, clamped to the sheet.
    pub fn span_height(&self, first: usize, count: usize) -> f32 {
        span(&self.row_positions, first, count)
    }

    pub fn total_width(&self) -> f32 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f32 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }
}

fn span(positions: &[f32], first: usize, count: usize) -> f32 {
    let last = positions.len().saturating_sub(1);
    let start = first.min(last);
    let end = first.saturating_add(count).min(last);
    let (Some(a), Some(b)) = (positions.get(start), positions.get(end)) else {
        return 0.0;
    };
    b - a
}

/// Visible area, scrolled in whole columns and rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Viewport {
    /// First scrollable column shown after the fixed columns
    pub scroll_col: usize,
    /// First scrollable data row shown after the fixed rows
    pub scroll_row: usize,
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_col: 0,
            scroll_row: 0,
            width: 800.0,
            height: 600.0,
        }
    }
}

impl Viewport {
    /// Clamp scroll position to valid range.
    ///
    /// Scrolling starts at the fixed boundary; the last column/row can always
    /// be scrolled to the leading edge.
    pub fn clamp_scroll(
        &mut self,
        (col_count, row_count): (usize, usize),
        (fixed_cols, fixed_rows): (usize, usize),
    ) {
        let max_col = col_count.saturating_sub(1).max(fixed_cols);
        let max_row = row_count.saturating_sub(1).max(fixed_rows);
        self.scroll_col = self.scroll_col.clamp(fixed_cols, max_col);
        self.scroll_row = self.scroll_row.clamp(fixed_rows, max_row);
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn uniform(cols: usize, rows: usize) -> GridLayout {
        GridLayout::new(cols, rows, &HashMap::new(), &HashMap::new())
    }

    #[test]
    fn test_basic_layout() {
        let layout = uniform(5, 10);
        assert_eq!(layout.total_width(), DEFAULT_COL_WIDTH * 5.0);
        assert_eq!(layout.total_height(), DEFAULT_ROW_HEIGHT * 10.0);
        assert_eq!(layout.col_count(), 5);
        assert_eq!(layout.row_count(), 10);
    }

    #[test]
    fn test_custom_widths_and_spans() {
        let widths: HashMap<usize, f32> = [(1, 50.0), (2, 70.0)].into_iter().collect();
        let layout = GridLayout::new(4, 3, &widths, &HashMap::new());

        assert_eq!(layout.col_width(1), 50.0);
        assert_eq!(layout.col_positions[2], DEFAULT_COL_WIDTH + 50.0);
        assert_eq!(layout.span_width(1, 2), 120.0);
        // Clamped at the last column
        assert_eq!(layout.span_width(3, 5), DEFAULT_COL_WIDTH);
        assert_eq!(layout.span_width(9, 1), 0.0);
    }

    #[test]
    fn test_clamp_scroll_respects_fixed_boundary() {
        let mut viewport = Viewport {
            scroll_col: 0,
            scroll_row: 100,
            ..Viewport::default()
        };
        viewport.clamp_scroll((10, 50), (2, 1));
        assert_eq!(viewport.scroll_col, 2);
        assert_eq!(viewport.scroll_row, 49);
    }
}
