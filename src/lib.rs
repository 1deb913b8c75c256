//! cellcursor - cell address resolution for virtualized grids
//!
//! A renderer drawing thousands of cells per frame keeps one [`CellCursor`]
//! per grid and retargets it for every visible cell:
//! - Three coordinate spaces (grid, data, value) with merged-cell redirection
//! - Classification (data/header/filter/summary rows, handle/tree columns,
//!   fixed, selected, hovered)
//! - Four-tier property inheritance with per-cell overrides
//! - Formatted values, overflow and editor selection, all lazily cached
//!
//! The cursor reads grid state through the traits in [`context`].
//! [`local::LocalGrid`] implements all of them in memory.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { resolve_cells } from 'cellcursor';
//! await init();
//! const cells = resolve_cells(JSON.stringify(gridConfig));
//! ```

pub mod context;
pub mod cursor;
pub mod error;
pub mod local;
pub mod types;
pub mod value;

use std::rc::Rc;

use wasm_bindgen::prelude::*;

pub use context::{
    Behavior, CursorContext, GridHost, GridProperties, Renderer, SelectionModel, Subgrid,
    VisibleColumn, VisibleRow,
};
pub use cursor::{CellCursor, CellFlags, CellSnapshot, EditorSeed, Generation, OFFSCREEN};
pub use error::{CursorError, Result};
pub use types::*;

/// Snapshots of every rendered cell of a grid description.
///
/// # Errors
/// Returns an error if the description is not valid JSON or is structurally
/// invalid.
pub fn resolve_grid(config_json: &str) -> Result<Vec<CellSnapshot>> {
    let grid = Rc::new(local::LocalGrid::from_json(config_json)?);
    Ok(grid.snapshot_all())
}

/// Resolve every rendered cell of a JSON grid description to a JSON string.
///
/// # Errors
/// Returns an error if the description is invalid.
#[wasm_bindgen]
pub fn resolve_cells_json(config_json: &str) -> std::result::Result<String, JsValue> {
    console_error_panic_hook::set_once();
    let cells = resolve_grid(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(&cells)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Resolve every rendered cell of a JSON grid description to a `JsValue`.
///
/// This is more efficient than `resolve_cells_json` when the result will be
/// used directly in JavaScript.
///
/// # Errors
/// Returns an error if the description is invalid.
#[wasm_bindgen]
pub fn resolve_cells(config_json: &str) -> std::result::Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();
    let cells = resolve_grid(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_wasm_bindgen::to_value(&cells)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
