//! Merged cell tests
//!
//! A covered cell shows its anchor's value only when the neighbor between
//! them has scrolled out of view; otherwise it keeps its own coordinates and
//! reports that rendering can be skipped.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use cellcursor::{DataCellCoord, ValueCellCoord};
use common::{cursor_at, cursor_at_data, grid, merged_grid};
use serde_json::json;

#[test]
fn test_covered_cell_shows_anchor_when_neighbor_scrolled_out() {
    let grid = merged_grid();
    grid.scroll_to(3, 0);

    let cursor = cursor_at_data(&grid, 3, 5);
    assert_eq!(cursor.data_cell(), DataCellCoord { x: 3, y: 5 });
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 1, y: 5 });
    assert_eq!(cursor.value(), json!("r5c1"));
    assert_eq!(&*cursor.formatted_value(), "r5c1");
    // The anchor itself is drawable
    assert!(!cursor.is_render_skip_needed());
    // Span queries stay on the data cell
    assert!(cursor.is_colspaned_by_left_column());
    assert_eq!(cursor.colspan(), 0);
}

#[test]
fn test_covered_cell_located_by_grid_coordinates() {
    let grid = merged_grid();
    grid.scroll_to(3, 0);

    // Active order equals data order, and the header takes grid row 0
    let cursor = cursor_at(&grid, 3, 6);
    assert_eq!(cursor.data_cell(), DataCellCoord { x: 3, y: 5 });
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 1, y: 5 });
    assert_eq!(cursor.value(), json!("r5c1"));
    assert!(!cursor.is_render_skip_needed());

    grid.scroll_to(0, 0);
    let cursor = cursor_at(&grid, 3, 6);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 3, y: 5 });
    assert!(cursor.is_render_skip_needed());
}

#[test]
fn test_covered_cell_keeps_coordinates_when_neighbor_visible() {
    let grid = merged_grid();

    let cursor = cursor_at_data(&grid, 3, 5);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 3, y: 5 });
    assert_eq!(cursor.value(), json!("r5c3"));
    assert!(cursor.is_render_skip_needed());
    assert_eq!(cursor.colspan_main_column_name().as_deref(), Some("c1"));
    assert_eq!(cursor.rowspan_main_row(), None);
}

#[test]
fn test_cells_outside_merges_are_not_redirected() {
    let grid = merged_grid();
    grid.scroll_to(3, 0);

    let cursor = cursor_at_data(&grid, 4, 5);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 4, y: 5 });
    assert!(!cursor.is_render_skip_needed());

    let cursor = cursor_at_data(&grid, 3, 6);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 3, y: 6 });
}

#[test]
fn test_anchor_resolution_is_idempotent() {
    let grid = merged_grid();
    grid.scroll_to(3, 0);

    let covered = cursor_at_data(&grid, 3, 5);
    let anchor = covered.value_cell();

    // The anchor column is scrolled out; reach it off-screen
    let mut cursor = grid.cursor();
    assert!(cursor.retarget_from_grid_column_data_row(anchor.x, anchor.y, None, true));
    assert_eq!(cursor.value_cell(), anchor);
    assert_eq!(cursor.value(), covered.value());
}

#[test]
fn test_anchor_spans_and_bounds() {
    let grid = merged_grid();

    let cursor = cursor_at_data(&grid, 1, 5);
    assert_eq!(cursor.colspan(), 2);
    assert_eq!(cursor.rowspan(), 0);
    assert!(!cursor.is_render_skip_needed());
    assert_eq!(cursor.additional_width(), 200.0);
    assert_eq!(cursor.additional_height(), 0.0);

    let bounds = cursor.bounds();
    // Handle column (40) + c0 (100)
    assert_eq!(bounds.x, 140.0);
    // Header row (20) + five data rows
    assert_eq!(bounds.y, 120.0);
    assert_eq!(bounds.width, 300.0);
    assert_eq!(bounds.height, 20.0);
}

#[test]
fn test_row_span_redirects_when_row_above_scrolled_out() {
    let grid = merged_grid();
    grid.scroll_to(0, 12);

    let cursor = cursor_at_data(&grid, 2, 12);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 2, y: 10 });
    assert_eq!(cursor.value(), json!("r10c2"));
    assert!(cursor.is_rowspaned_by_row());
    assert_eq!(cursor.rowspan_main_row(), Some(10));

    // Row 12 is on screen, so row 13 draws nothing of its own
    let below = cursor_at_data(&grid, 2, 13);
    assert_eq!(below.value_cell(), ValueCellCoord { x: 2, y: 13 });
    assert!(below.is_render_skip_needed());
}

#[test]
fn test_row_span_anchor_height() {
    let grid = merged_grid();
    grid.scroll_to(0, 0);

    let cursor = cursor_at_data(&grid, 2, 10);
    assert_eq!(cursor.rowspan(), 3);
    assert_eq!(cursor.additional_height(), 60.0);
    assert_eq!(cursor.bounds().height, 80.0);
}

#[test]
fn test_hidden_column_between_anchor_and_cell() {
    // Column c2 is not an active column at all
    let grid = grid(json!({
        "columns": common::columns(5),
        "columnOrder": [0, 1, 3, 4],
        "subgrids": [
            { "kind": "header" },
            {
                "kind": "data",
                "rows": common::rows(5, 5),
                "merges": [{ "startRow": 1, "startCol": 1, "endRow": 1, "endCol": 3 }]
            }
        ]
    }));

    let cursor = cursor_at_data(&grid, 3, 1);
    // Grid x counts active columns, data x does not
    assert_eq!(cursor.grid_cell().x, 2);
    assert_eq!(cursor.data_cell().x, 3);
    assert_eq!(cursor.value_cell(), ValueCellCoord { x: 1, y: 1 });
    assert_eq!(cursor.value(), json!("r1c1"));
}

#[test]
fn test_header_merges_use_header_geometry() {
    let grid = grid(json!({
        "columns": common::columns(4),
        "headerRowHeight": 30,
        "subgrids": [
            {
                "kind": "header",
                "rows": [{ "c0": "Group", "c1": "", "c2": "", "c3": "Other" },
                         { "c0": "a", "c1": "b", "c2": "c", "c3": "d" }],
                "merges": [{ "startRow": 0, "startCol": 0, "endRow": 0, "endCol": 2 }]
            },
            { "kind": "data", "rows": common::rows(3, 4) }
        ]
    }));

    let mut cursor = grid.cursor();
    assert!(cursor.retarget_from_grid(0, 0));
    assert!(cursor.is_header_row());
    assert_eq!(cursor.colspan(), 2);
    assert_eq!(cursor.bounds().width, 300.0);
    assert_eq!(cursor.bounds().height, 30.0);

    assert!(cursor.retarget_from_grid(1, 0));
    assert!(cursor.is_render_skip_needed());
}

#[test]
fn test_merge_past_the_grid_edge_is_ignored() {
    let grid = grid(json!({
        "columns": common::columns(4),
        "subgrids": [
            { "kind": "header" },
            {
                "kind": "data",
                "rows": common::rows(3, 4),
                "merges": [
                    { "startRow": 0, "startCol": 1, "endRow": 500, "endCol": 50 },
                    { "startRow": 0, "startCol": 0, "endRow": 4000000000u64, "endCol": 0 },
                    { "startRow": 2, "startCol": 0, "endRow": 2, "endCol": 1 }
                ]
            }
        ]
    }));

    let cursor = cursor_at(&grid, 1, 1);
    assert_eq!(cursor.colspan(), 0);
    assert_eq!(cursor.rowspan(), 0);
    assert!(!cursor.is_render_skip_needed());
    assert!(!cursor_at(&grid, 2, 1).is_colspaned_by_left_column());
    assert_eq!(cursor_at(&grid, 0, 1).rowspan(), 0);

    // Ranges inside the grid still register
    assert_eq!(cursor_at(&grid, 0, 3).colspan(), 1);
}
