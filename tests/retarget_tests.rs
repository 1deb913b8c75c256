//! Cursor retargeting tests
//!
//! Covers the four lookup entry points, failed lookups, off-screen synthesis,
//! copies, the pointer position and the generation counter.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

mod common;

use cellcursor::{
    CellCursor, CursorError, DataCellCoord, GridCellCoord, Point, SubgridKind, OFFSCREEN,
};
use common::{cursor_at, grid, simple_grid};
use serde_json::json;

#[test]
fn test_retarget_from_grid_sets_all_coordinates() {
    let grid = simple_grid(10, 4);
    let cursor = cursor_at(&grid, 2, 3);

    assert_eq!(cursor.grid_cell(), GridCellCoord { x: 2, y: 3 });
    // Grid row 0 is the header row
    assert_eq!(cursor.data_cell(), DataCellCoord { x: 2, y: 2 });
    assert_eq!(cursor.value_cell().x, 2);
    assert_eq!(cursor.value_cell().y, 2);
    assert_eq!(cursor.subgrid_kind(), Some(SubgridKind::Data));
    assert_eq!(cursor.value(), json!("r2c2"));
    assert_eq!(cursor.column().map(|c| c.name.as_str()), Some("c2"));
}

#[test]
fn test_at_grid_constructor() {
    let grid = simple_grid(3, 2);
    assert!(CellCursor::at_grid(grid.context(), 1, 1).is_some());
    assert!(CellCursor::at_grid(grid.context(), 9, 1).is_none());
}

#[test]
fn test_round_trip_grid_to_data() {
    let grid = simple_grid(10, 4);
    let rows = i32::try_from(grid.visible_rows().len()).unwrap();

    for grid_y in 0..rows {
        for grid_x in 0..4 {
            let mut cursor = cursor_at(&grid, grid_x, grid_y);
            let data = cursor.data_cell();
            let kind = cursor.subgrid_kind();
            let expected = cursor.grid_cell();

            assert!(cursor.retarget_from_data(data.x, data.y, kind));
            assert_eq!(cursor.grid_cell(), expected, "data cell {data:?} of {kind:?}");
        }
    }
}

#[test]
fn test_retarget_is_idempotent() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 1, 4);
    let first = cursor.snapshot();

    assert!(cursor.retarget_from_grid(1, 4));
    assert_eq!(cursor.snapshot(), first);
}

#[test]
fn test_retarget_from_grid_xy_uses_slots() {
    let grid = simple_grid(10, 12);
    grid.scroll_to(2, 0);

    let mut cursor = grid.cursor();
    assert!(cursor.retarget_from_grid_xy(0, 1));
    assert_eq!(cursor.grid_cell().x, 2);
    assert_eq!(cursor.visible_column().map(|c| c.index), Some(0));

    // Reserved columns keep their index as their slot
    assert!(cursor.retarget_from_grid_xy(-2, 1));
    assert!(cursor.is_handle_column());
}

#[test]
fn test_failed_retarget_leaves_cursor_untouched() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 1, 2);
    let before = cursor.snapshot();
    let generation = cursor.generation();

    assert!(!cursor.retarget_from_grid(99, 2));
    assert!(!cursor.retarget_from_grid(1, 99));
    assert!(!cursor.retarget_from_grid_xy(50, 2));
    assert!(!cursor.retarget_from_data(1, 500, None));
    assert!(!cursor.retarget_from_data(1, 0, Some(SubgridKind::Filter)));
    assert!(!cursor.retarget_from_grid_column_data_row(1, 500, None, false));

    assert_eq!(cursor.snapshot(), before);
    assert_eq!(cursor.generation(), generation);
}

#[test]
fn test_untargeted_cursor_is_inert() {
    let grid = simple_grid(3, 2);
    let cursor = grid.cursor();

    assert!(!cursor.is_targeted());
    assert!(!cursor.is_data_cell());
    assert!(!cursor.is_header_row());
    assert!(!cursor.is_handle_column());
    assert_eq!(cursor.value(), serde_json::Value::Null);
    assert_eq!(cursor.bounds().width, 0.0);
    assert!(cursor.properties().is_empty());
    assert!(cursor.editor().is_none());
}

#[test]
fn test_use_all_cells_synthesizes_offscreen_row() {
    let grid = simple_grid(100, 4);
    let mut cursor = grid.cursor();

    assert!(!cursor.retarget_from_grid_column_data_row(1, 80, None, false));
    assert!(cursor.retarget_from_grid_column_data_row(1, 80, None, true));

    assert_eq!(cursor.grid_cell(), GridCellCoord { x: 1, y: OFFSCREEN });
    assert_eq!(cursor.data_cell(), DataCellCoord { x: 1, y: 80 });
    assert_eq!(cursor.value(), json!("r80c1"));
    assert!(cursor.is_column_visible());
    assert!(!cursor.is_row_visible());
    assert!(!cursor.is_cell_visible());
    assert!(cursor.is_data_row());
    assert_eq!(cursor.bounds().height, 0.0);
}

#[test]
fn test_use_all_cells_synthesizes_offscreen_column() {
    let grid = simple_grid(10, 20);
    let mut cursor = grid.cursor();

    assert!(cursor.retarget_from_grid_column_data_row(15, 3, Some(SubgridKind::Data), true));
    assert_eq!(cursor.visible_column().map(|c| c.index), Some(OFFSCREEN));
    assert_eq!(cursor.column().map(|c| c.name.as_str()), Some("c15"));
    assert_eq!(cursor.value(), json!("r3c15"));
    assert!(!cursor.is_column_visible());
    assert!(cursor.is_row_visible());
}

#[test]
fn test_use_all_cells_needs_the_subgrid() {
    let grid = simple_grid(10, 4);
    let mut cursor = grid.cursor();
    assert!(!cursor.retarget_from_grid_column_data_row(1, 0, Some(SubgridKind::Filter), true));
    assert!(!cursor.is_targeted());
}

#[test]
fn test_generation_advances_on_retarget() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 0, 1);
    let first = cursor.generation();
    cursor.assert_generation(first);

    assert!(cursor.retarget_from_grid(0, 2));
    assert_ne!(cursor.generation(), first);
    assert!(cursor.generation().get() > first.get());
}

#[test]
fn test_duplicate_without_own_overrides() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 1, 2);
    cursor.set_own_attribute("editorValue", json!("draft"));

    let copy = cursor.duplicate(false);
    assert_eq!(copy.grid_cell(), cursor.grid_cell());
    assert_eq!(copy.data_cell(), cursor.data_cell());
    assert_eq!(copy.value_cell(), cursor.value_cell());
    assert_eq!(copy.snapshot(), cursor.snapshot());
    assert!(copy.own_attributes().is_empty());
}

#[test]
fn test_duplicate_with_own_overrides_survives_retarget() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 1, 2);
    cursor.set_own_attribute("editorValue", json!("draft"));
    cursor.set_full_value(json!("full text"));

    let copy = cursor.duplicate(true);
    assert!(cursor.retarget_from_grid(3, 5));

    assert_eq!(copy.grid_cell(), GridCellCoord { x: 1, y: 2 });
    assert_eq!(copy.value(), json!("r1c1"));
    assert_eq!(copy.own_attributes().get_str("editorValue"), Some("draft"));
    assert_eq!(copy.to_str_full_value(), "full text");
    // The source cursor's fetched value does not follow it to the new cell
    assert!(cursor.full_value().is_none());
}

#[test]
fn test_editor_seed_carries_column_and_attributes() {
    let grid = simple_grid(10, 4);
    let mut cursor = cursor_at(&grid, 2, 1);
    cursor.set_own_attribute("mode", json!("inline"));

    let seed = cursor.editor_seed();
    assert_eq!(seed.column.as_ref().map(|c| c.name.as_str()), Some("c2"));
    assert_eq!(seed.attributes.get_str("mode"), Some("inline"));
    assert_eq!(seed.grid_cell, cursor.grid_cell());
    assert_eq!(seed.data_cell, cursor.data_cell());
    assert_eq!(seed.editor, cursor.editor());
}

#[test]
fn test_edit_point_is_removed() {
    let grid = simple_grid(3, 2);
    let cursor = cursor_at(&grid, 0, 1);

    let err = cursor.edit_point().unwrap_err();
    assert!(matches!(err, CursorError::RemovedField { field: "edit_point", .. }));
    let message = err.to_string();
    assert!(message.contains("grid_cell().x"));
    assert!(message.contains("data_cell().y"));
}

#[test]
fn test_data_column_excludes_reserved_columns() {
    let grid = simple_grid(3, 2);
    let handle = cursor_at(&grid, -2, 1);
    assert!(handle.column().is_some());
    assert!(handle.data_column().is_none());

    let cell = cursor_at(&grid, 0, 1);
    assert_eq!(cell.data_column().map(|c| c.name.as_str()), Some("c0"));
}

#[test]
fn test_set_value_refreshes_formatted_value() {
    let grid = simple_grid(3, 2);
    let mut cursor = cursor_at(&grid, 0, 1);
    assert_eq!(&*cursor.formatted_value(), "r0c0");

    cursor.set_value(json!("changed"));
    assert_eq!(&*cursor.formatted_value(), "changed");
    assert_eq!(cursor_at(&grid, 0, 1).value(), json!("changed"));
}

#[test]
fn test_pointer_hit_test() {
    let grid = simple_grid(5, 3);
    let column = grid.visible_columns().into_iter().find(|c| c.column_index == 1).unwrap();
    let row = grid.visible_rows()[2].clone();

    let cursor = grid.cursor_at_point(column.left + 10.0, row.top + 5.0).unwrap();
    assert_eq!(cursor.grid_cell(), GridCellCoord { x: 1, y: 2 });
    assert_eq!(cursor.mouse_point(), Some(Point { x: 10.0, y: 5.0 }));
    assert!(grid.cursor_at_point(-1.0, 5.0).is_none());
}

#[test]
fn test_mouse_point_in_click_rect() {
    let grid = simple_grid(5, 3);
    let column = grid.visible_columns().into_iter().find(|c| c.column_index == 0).unwrap();
    let row = grid.visible_rows()[1].clone();
    let mut cursor = grid.cursor_at_point(column.left + 10.0, row.top + 5.0).unwrap();

    // No rect anywhere: every point counts
    assert!(cursor.mouse_point_in_click_rect());

    cursor.set_own_attribute("clickRect", json!({ "x": 0, "y": 0, "width": 8, "height": 8 }));
    assert!(!cursor.mouse_point_in_click_rect());
    cursor.set_own_attribute("clickRect", json!({ "x": 10, "y": 5, "width": 1, "height": 1 }));
    assert!(cursor.mouse_point_in_click_rect());
    cursor.set_own_attribute("clickRect", json!({ "x": 0, "y": 0, "width": 10, "height": 10 }));
    // Right edge is exclusive
    assert!(!cursor.mouse_point_in_click_rect());

    let copy = cursor.duplicate(true);
    assert_eq!(copy.mouse_point(), cursor.mouse_point());

    // Retargeting drops the pointer; a rect then rejects every point
    assert!(cursor.retarget_from_grid(1, 1));
    assert_eq!(cursor.mouse_point(), None);
    assert!(!cursor.mouse_point_in_click_rect());

    // A null own rect hides the property rect
    cursor.set_own_attribute("clickRect", json!(null));
    assert!(cursor.mouse_point_in_click_rect());
}

#[test]
fn test_click_rect_from_column_property() {
    let grid = grid(json!({
        "columns": [
            { "name": "c0", "properties": { "base": { "clickRect": { "x": 0, "y": 0, "width": 16, "height": 16 } } } },
            { "name": "c1" }
        ],
        "subgrids": [{ "kind": "data", "rows": common::rows(2, 2) }]
    }));
    let column = grid.visible_columns().into_iter().find(|c| c.column_index == 0).unwrap();

    let mut cursor = grid.cursor_at_point(column.left + 4.0, 4.0).unwrap();
    assert!(cursor.mouse_point_in_click_rect());
    cursor.set_mouse_point(Some(Point { x: 20.0, y: 4.0 }));
    assert!(!cursor.mouse_point_in_click_rect());

    cursor.set_own_attribute("clickRect", json!(null));
    assert!(cursor.mouse_point_in_click_rect());
}
