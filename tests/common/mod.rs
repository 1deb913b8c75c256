//! Common test utilities: grid builders and cursor helpers.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::rc::Rc;

use cellcursor::local::{GridConfig, LocalGrid};
use cellcursor::CellCursor;
use serde_json::{json, Map, Value};

/// Build a grid from a JSON description, panicking on invalid input.
#[must_use]
pub fn grid(config: Value) -> Rc<LocalGrid> {
    let config: GridConfig = serde_json::from_value(config).expect("valid grid config");
    Rc::new(LocalGrid::from_config(config).expect("valid grid"))
}

/// Column descriptions `c0..c{cols}` with default properties.
#[must_use]
pub fn columns(cols: usize) -> Vec<Value> {
    (0..cols).map(|c| json!({ "name": format!("c{c}") })).collect()
}

/// Data rows where cell (x, y) holds the string `r{y}c{x}`.
#[must_use]
pub fn rows(rows: usize, cols: usize) -> Vec<Value> {
    (0..rows)
        .map(|r| {
            let row: Map<String, Value> = (0..cols)
                .map(|c| (format!("c{c}"), json!(format!("r{r}c{c}"))))
                .collect();
            Value::Object(row)
        })
        .collect()
}

/// A header + data grid of `rows` x `cols` string cells.
#[must_use]
pub fn simple_grid(row_count: usize, cols: usize) -> Rc<LocalGrid> {
    grid(json!({
        "columns": columns(cols),
        "subgrids": [
            { "kind": "header" },
            { "kind": "data", "rows": rows(row_count, cols) }
        ]
    }))
}

/// 40 x 6 grid with one fixed column and a merge over row 5, columns 1-3.
#[must_use]
pub fn merged_grid() -> Rc<LocalGrid> {
    grid(json!({
        "properties": { "fixedColumnCount": 1 },
        "columns": columns(6),
        "subgrids": [
            { "kind": "header" },
            {
                "kind": "data",
                "rows": rows(40, 6),
                "merges": [
                    { "startRow": 5, "startCol": 1, "endRow": 5, "endCol": 3 },
                    { "startRow": 10, "startCol": 2, "endRow": 13, "endCol": 2 }
                ]
            }
        ]
    }))
}

/// Cursor pointed at a rendered grid cell.
#[must_use]
pub fn cursor_at(grid: &Rc<LocalGrid>, grid_x: i32, grid_y: i32) -> CellCursor {
    let mut cursor = grid.cursor();
    assert!(
        cursor.retarget_from_grid(grid_x, grid_y),
        "grid cell ({grid_x}, {grid_y}) is not rendered"
    );
    cursor
}

/// Cursor pointed at a rendered cell of the data subgrid.
#[must_use]
pub fn cursor_at_data(grid: &Rc<LocalGrid>, data_x: i32, data_y: i32) -> CellCursor {
    let mut cursor = grid.cursor();
    assert!(
        cursor.retarget_from_data(data_x, data_y, None),
        "data cell ({data_x}, {data_y}) is not rendered"
    );
    cursor
}
